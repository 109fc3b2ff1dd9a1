use crate::{
    domain::{
        chat_store::ChatStore, conversation::ActiveChat, sidebar_state::SidebarEntry,
        typing_signal::TypingSignal,
    },
    usecases::{contracts::ChatGateway, typing::stop_typing},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenChatOutcome {
    Opened,
    /// The entry points at the current user.
    Ignored,
}

/// Makes `entry` the active chat and asks the server for its history.
///
/// The previous chat's typing burst is ended first. History arrives later and
/// replaces whatever the store holds for the conversation.
pub fn open_chat(
    gateway: &mut dyn ChatGateway,
    store: &mut ChatStore,
    typing: &mut TypingSignal,
    entry: &SidebarEntry,
) -> OpenChatOutcome {
    let me = store.current_user().map(|user| user.id.clone());
    if let SidebarEntry::User { id, .. } = entry {
        if me.as_deref() == Some(id.as_str()) {
            return OpenChatOutcome::Ignored;
        }
    }

    stop_typing(gateway, store.active_chat(), typing);

    match entry {
        SidebarEntry::User { id, .. } => {
            store.set_active_chat(ActiveChat::Private(id.clone()));
            gateway.request_private_history(id);
        }
        SidebarEntry::Group { id, .. } => {
            store.set_active_chat(ActiveChat::Group(id.clone()));
            gateway.request_group_history(id);
        }
    }

    tracing::debug!(chat_id = entry.id(), "chat opened");
    OpenChatOutcome::Opened
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;
    use crate::{
        domain::model::fixtures::user,
        session::{client::fakes::connected_session, protocol::ClientCommand},
    };

    fn logged_in_store() -> ChatStore {
        let mut store = ChatStore::default();
        store.set_current_user(user("s1", "alice"));
        store
    }

    #[test]
    fn opening_user_requests_private_history() {
        let (mut session, transport) = connected_session("s1");
        let mut store = logged_in_store();
        let entry = SidebarEntry::User {
            id: "s2".to_owned(),
            username: "bob".to_owned(),
        };

        let outcome = open_chat(&mut session, &mut store, &mut TypingSignal::default(), &entry);

        assert_eq!(outcome, OpenChatOutcome::Opened);
        assert_eq!(store.active_chat(), &ActiveChat::Private("s2".to_owned()));
        assert_eq!(
            transport.sent(),
            vec![ClientCommand::GetPrivateHistory {
                with_id: "s2".to_owned()
            }]
        );
    }

    #[test]
    fn opening_group_stops_previous_typing_first() {
        let (mut session, transport) = connected_session("s1");
        let mut store = logged_in_store();
        store.set_active_chat(ActiveChat::Private("s2".to_owned()));
        let mut typing = TypingSignal::default();
        typing.on_keystroke(Instant::now());
        let entry = SidebarEntry::Group {
            id: "g1".to_owned(),
            name: "team".to_owned(),
        };

        open_chat(&mut session, &mut store, &mut typing, &entry);

        assert_eq!(
            transport.sent(),
            vec![
                ClientCommand::Typing {
                    to: "s2".to_owned(),
                    is_typing: false,
                },
                ClientCommand::GetGroupHistory {
                    group_id: "g1".to_owned()
                },
            ]
        );
        assert_eq!(store.active_chat(), &ActiveChat::Group("g1".to_owned()));
    }

    #[test]
    fn selecting_yourself_is_ignored() {
        let (mut session, transport) = connected_session("s1");
        let mut store = logged_in_store();
        let entry = SidebarEntry::User {
            id: "s1".to_owned(),
            username: "alice".to_owned(),
        };

        let outcome = open_chat(&mut session, &mut store, &mut TypingSignal::default(), &entry);

        assert_eq!(outcome, OpenChatOutcome::Ignored);
        assert_eq!(store.active_chat(), &ActiveChat::None);
        assert!(transport.sent().is_empty());
    }
}
