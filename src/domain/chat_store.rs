//! Client-side state folded from server events.
//!
//! Every setter replaces or appends into one keyed slot and leaves every other
//! slot untouched. Reads are unrestricted; writes come from the store wiring
//! and from UI actions on the shell orchestrator.

use std::collections::{BTreeMap, HashMap};

use super::{
    conversation::{conversation_key, ActiveChat},
    model::{Group, Message, User},
};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChatStore {
    current_user: Option<User>,
    is_connected: bool,
    dark_mode: bool,
    active_chat: ActiveChat,
    users: Vec<User>,
    groups: Vec<Group>,
    private_messages: HashMap<String, Vec<Message>>,
    group_messages: HashMap<String, Vec<Message>>,
    typing_users: BTreeMap<String, bool>,
    group_typing_users: HashMap<String, BTreeMap<String, bool>>,
}

impl ChatStore {
    pub fn new(dark_mode: bool) -> Self {
        Self {
            dark_mode,
            ..Self::default()
        }
    }

    pub fn current_user(&self) -> Option<&User> {
        self.current_user.as_ref()
    }

    pub fn is_connected(&self) -> bool {
        self.is_connected
    }

    pub fn is_dark_mode(&self) -> bool {
        self.dark_mode
    }

    pub fn active_chat(&self) -> &ActiveChat {
        &self.active_chat
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Roster without the current user.
    pub fn other_users(&self) -> impl Iterator<Item = &User> {
        let me = self.current_user.as_ref().map(|user| user.id.as_str());
        self.users
            .iter()
            .filter(move |user| Some(user.id.as_str()) != me)
    }

    pub fn user(&self, user_id: &str) -> Option<&User> {
        self.users.iter().find(|user| user.id == user_id)
    }

    pub fn group(&self, group_id: &str) -> Option<&Group> {
        self.groups.iter().find(|group| group.id == group_id)
    }

    /// Messages exchanged with `peer_id`; empty before login.
    pub fn private_messages_with(&self, peer_id: &str) -> &[Message] {
        let Some(me) = self.current_user.as_ref() else {
            return &[];
        };

        self.private_messages
            .get(&conversation_key(&me.id, peer_id))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn group_messages(&self, group_id: &str) -> &[Message] {
        self.group_messages
            .get(group_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn is_typing(&self, user_id: &str) -> bool {
        self.typing_users.get(user_id).copied().unwrap_or(false)
    }

    /// Ids of users typing in `group_id`, excluding the current user.
    pub fn group_typing_members(&self, group_id: &str) -> Vec<&str> {
        let me = self.current_user.as_ref().map(|user| user.id.as_str());

        self.group_typing_users
            .get(group_id)
            .into_iter()
            .flatten()
            .filter(|(user_id, typing)| **typing && Some(user_id.as_str()) != me)
            .map(|(user_id, _)| user_id.as_str())
            .collect()
    }

    /// Display title of the active chat; empty when the target is unknown.
    pub fn active_chat_title(&self) -> &str {
        match &self.active_chat {
            ActiveChat::None => "",
            ActiveChat::Private(user_id) => self
                .user(user_id)
                .map(|user| user.username.as_str())
                .unwrap_or_default(),
            ActiveChat::Group(group_id) => self
                .group(group_id)
                .map(|group| group.name.as_str())
                .unwrap_or_default(),
        }
    }

    pub fn set_current_user(&mut self, user: User) {
        self.current_user = Some(user);
    }

    pub fn set_users(&mut self, users: Vec<User>) {
        self.users = users;
    }

    pub fn set_groups(&mut self, groups: Vec<Group>) {
        self.groups = groups;
    }

    pub fn set_active_chat(&mut self, chat: ActiveChat) {
        self.active_chat = chat;
    }

    /// Appends a private message to its conversation.
    ///
    /// Ignored before login or when the message names no peer.
    pub fn add_private_message(&mut self, message: Message) {
        let Some(me) = self.current_user.as_ref() else {
            return;
        };
        let Some(peer) = message.peer_of(&me.id) else {
            return;
        };

        let key = conversation_key(&me.id, peer);
        self.private_messages.entry(key).or_default().push(message);
    }

    /// Replaces the whole conversation with `peer_id`.
    pub fn set_private_history(&mut self, peer_id: &str, messages: Vec<Message>) {
        let Some(me) = self.current_user.as_ref() else {
            return;
        };

        let key = conversation_key(&me.id, peer_id);
        self.private_messages.insert(key, messages);
    }

    /// Appends a group message; messages without a group id are ignored.
    pub fn add_group_message(&mut self, message: Message) {
        let Some(group_id) = message.group_id.clone() else {
            return;
        };

        self.group_messages
            .entry(group_id)
            .or_default()
            .push(message);
    }

    pub fn set_group_history(&mut self, group_id: &str, messages: Vec<Message>) {
        self.group_messages.insert(group_id.to_owned(), messages);
    }

    pub fn set_typing_status(&mut self, user_id: &str, is_typing: bool) {
        self.typing_users.insert(user_id.to_owned(), is_typing);
    }

    pub fn set_group_typing_status(&mut self, group_id: &str, user_id: &str, is_typing: bool) {
        self.group_typing_users
            .entry(group_id.to_owned())
            .or_default()
            .insert(user_id.to_owned(), is_typing);
    }

    pub fn set_connected(&mut self, connected: bool) {
        self.is_connected = connected;
    }

    pub fn set_dark_mode(&mut self, dark_mode: bool) {
        self.dark_mode = dark_mode;
    }

    /// Drops everything learned from the server, keeping the theme.
    pub fn reset_session(&mut self) {
        *self = Self::new(self.dark_mode);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::fixtures::*;

    fn logged_in(id: &str) -> ChatStore {
        let mut store = ChatStore::new(false);
        store.set_current_user(user(id, "me"));
        store
    }

    #[test]
    fn roster_keeps_delivery_order() {
        let mut store = ChatStore::default();

        store.set_users(vec![user("s2", "bob"), user("s1", "alice")]);

        let names: Vec<_> = store.users().iter().map(|u| u.username.as_str()).collect();
        assert_eq!(names, vec!["bob", "alice"]);
    }

    #[test]
    fn other_users_skips_current_user() {
        let mut store = logged_in("s1");
        store.set_users(vec![user("s1", "me"), user("s2", "bob")]);

        let ids: Vec<_> = store.other_users().map(|u| u.id.as_str()).collect();
        assert_eq!(ids, vec!["s2"]);
    }

    #[test]
    fn private_messages_append_under_order_independent_key() {
        let mut store = logged_in("alice");

        store.add_private_message(private_message("m1", "bob", "alice", "hi"));
        store.add_private_message(private_message("m2", "alice", "bob", "hey"));

        let ids: Vec<_> = store
            .private_messages_with("bob")
            .iter()
            .map(|m| m.id.as_str())
            .collect();
        assert_eq!(ids, vec!["m1", "m2"]);
    }

    #[test]
    fn private_history_replaces_previous_entries() {
        let mut store = logged_in("alice");
        store.add_private_message(private_message("old", "bob", "alice", "stale"));

        store.set_private_history("bob", vec![private_message("new", "bob", "alice", "fresh")]);

        let ids: Vec<_> = store
            .private_messages_with("bob")
            .iter()
            .map(|m| m.id.as_str())
            .collect();
        assert_eq!(ids, vec!["new"]);
    }

    #[test]
    fn private_updates_are_ignored_before_login() {
        let mut store = ChatStore::default();

        store.add_private_message(private_message("m1", "bob", "alice", "hi"));
        store.set_private_history("bob", vec![private_message("m2", "bob", "alice", "x")]);

        assert_eq!(store, ChatStore::default());
    }

    #[test]
    fn group_messages_append_and_history_replaces() {
        let mut store = logged_in("alice");
        store.set_group_history("g1", vec![group_message("h1", "bob", "g1", "a")]);

        store.add_group_message(group_message("m1", "bob", "g1", "b"));
        assert_eq!(store.group_messages("g1").len(), 2);

        store.set_group_history("g1", vec![group_message("h2", "bob", "g1", "c")]);
        let ids: Vec<_> = store.group_messages("g1").iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["h2"]);
    }

    #[test]
    fn message_never_lands_under_both_private_and_group_keys() {
        let mut store = logged_in("alice");

        store.add_group_message(group_message("m1", "bob", "g1", "hi"));
        store.add_private_message(group_message("m2", "bob", "g1", "hi"));

        assert!(store.private_messages_with("bob").is_empty());
        assert_eq!(store.group_messages("g1").len(), 1);
    }

    #[test]
    fn group_history_leaves_other_groups_untouched() {
        let mut store = logged_in("alice");
        store.add_group_message(group_message("m1", "bob", "g1", "hi"));

        store.set_group_history("g2", vec![]);

        assert_eq!(store.group_messages("g1").len(), 1);
        assert!(store.group_messages("g2").is_empty());
    }

    #[test]
    fn typing_flags_are_overwritten_per_signal() {
        let mut store = logged_in("alice");

        store.set_typing_status("bob", true);
        assert!(store.is_typing("bob"));
        store.set_typing_status("bob", false);
        assert!(!store.is_typing("bob"));
    }

    #[test]
    fn group_typing_members_exclude_self_and_idle_users() {
        let mut store = logged_in("alice");

        store.set_group_typing_status("g1", "alice", true);
        store.set_group_typing_status("g1", "bob", true);
        store.set_group_typing_status("g1", "carol", false);
        store.set_group_typing_status("g2", "dave", true);

        assert_eq!(store.group_typing_members("g1"), vec!["bob"]);
    }

    #[test]
    fn active_chat_title_resolves_user_and_group_names() {
        let mut store = logged_in("alice");
        store.set_users(vec![user("bob", "Bobby")]);
        store.set_groups(vec![group("g1", "Ops", &["alice", "bob"])]);

        store.set_active_chat(ActiveChat::Private("bob".to_owned()));
        assert_eq!(store.active_chat_title(), "Bobby");

        store.set_active_chat(ActiveChat::Group("g1".to_owned()));
        assert_eq!(store.active_chat_title(), "Ops");

        store.set_active_chat(ActiveChat::Group("gone".to_owned()));
        assert_eq!(store.active_chat_title(), "");
    }

    #[test]
    fn reset_session_keeps_theme_only() {
        let mut store = logged_in("alice");
        store.set_dark_mode(true);
        store.set_connected(true);
        store.set_users(vec![user("bob", "bob")]);

        store.reset_session();

        assert_eq!(store, ChatStore::new(true));
    }
}
