//! Connects the chat store to the session's event streams.
//!
//! Wiring consumes an [`UnwiredStore`], so a store can only ever be wired once
//! and no event is applied twice.

use std::{cell::RefCell, rc::Rc};

use crate::{
    domain::chat_store::ChatStore,
    session::{
        client::{ChatSession, ConnectionStatus},
        listeners::Subscription,
        transport::Transport,
    },
};

pub type SharedStore = Rc<RefCell<ChatStore>>;

#[derive(Debug)]
pub struct UnwiredStore {
    store: SharedStore,
}

impl UnwiredStore {
    pub fn new(store: ChatStore) -> Self {
        Self {
            store: Rc::new(RefCell::new(store)),
        }
    }
}

#[derive(Debug)]
pub struct WiredStore {
    store: SharedStore,
    subscriptions: Vec<Subscription>,
}

impl WiredStore {
    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }

    /// Detaches the store from the session so it can be wired again.
    #[cfg_attr(not(test), allow(dead_code))]
    pub fn unwire(self) -> UnwiredStore {
        for subscription in self.subscriptions {
            subscription.unsubscribe();
        }

        UnwiredStore { store: self.store }
    }
}

pub fn wire<T: Transport>(unwired: UnwiredStore, session: &ChatSession<T>) -> WiredStore {
    let store = unwired.store;
    let handle = || Rc::clone(&store);

    let subscriptions = vec![
        {
            let store = handle();
            session.on_connection_change(move |status| {
                store.borrow_mut().set_connected(status.is_connected());
                if let ConnectionStatus::Failed { reason } = status {
                    tracing::debug!(reason = %reason, "store marked disconnected after failure");
                }
            })
        },
        {
            let store = handle();
            session.on_user_list(move |users| store.borrow_mut().set_users(users.clone()))
        },
        {
            let store = handle();
            session.on_group_list(move |groups| store.borrow_mut().set_groups(groups.clone()))
        },
        {
            let store = handle();
            session.on_private_message(move |message| {
                store.borrow_mut().add_private_message(message.clone())
            })
        },
        {
            let store = handle();
            session.on_group_message(move |message| {
                store.borrow_mut().add_group_message(message.clone())
            })
        },
        {
            let store = handle();
            session.on_private_history(move |history| {
                store
                    .borrow_mut()
                    .set_private_history(&history.with_id, history.messages.clone())
            })
        },
        {
            let store = handle();
            session.on_group_history(move |history| {
                store
                    .borrow_mut()
                    .set_group_history(&history.group_id, history.messages.clone())
            })
        },
        {
            let store = handle();
            session.on_user_typing(move |update| {
                store
                    .borrow_mut()
                    .set_typing_status(&update.from, update.is_typing)
            })
        },
        {
            let store = handle();
            session.on_user_group_typing(move |update| {
                store.borrow_mut().set_group_typing_status(
                    &update.group_id,
                    &update.from,
                    update.is_typing,
                )
            })
        },
    ];

    tracing::debug!(
        subscriptions = subscriptions.len(),
        "chat store wired to session"
    );

    WiredStore {
        store,
        subscriptions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::model::fixtures::*,
        session::{
            client::fakes::FakeTransport,
            protocol::{GroupHistory, PrivateHistory, ServerEvent, TypingUpdate},
            transport::TransportEvent,
        },
    };

    fn wired() -> (ChatSession<FakeTransport>, FakeTransport, WiredStore) {
        let transport = FakeTransport::default();
        let session = ChatSession::new(transport.clone(), "http://127.0.0.1:3000");
        let wired = wire(UnwiredStore::new(ChatStore::default()), &session);
        (session, transport, wired)
    }

    fn connect_as(
        session: &mut ChatSession<FakeTransport>,
        transport: &FakeTransport,
        wired: &WiredStore,
        id: &str,
    ) {
        session.connect();
        transport.push(TransportEvent::Connected {
            socket_id: id.to_owned(),
        });
        session.pump();
        wired
            .store()
            .borrow_mut()
            .set_current_user(user(id, "me"));
    }

    #[test]
    fn registers_one_listener_per_event_class() {
        let (_session, _transport, wired) = wired();

        assert_eq!(wired.subscription_count(), 9);
    }

    #[test]
    fn user_list_after_connect_fills_roster_in_order() {
        let (mut session, transport, wired) = wired();
        connect_as(&mut session, &transport, &wired, "s1");
        assert!(wired.store().borrow().is_connected());

        transport.push(TransportEvent::Event(ServerEvent::UserList(vec![
            user("s2", "bob"),
            user("s1", "alice"),
        ])));
        session.pump();

        let store = wired.store().borrow();
        let names: Vec<&str> = store.users().iter().map(|u| u.username.as_str()).collect();
        assert_eq!(names, vec!["bob", "alice"]);
    }

    #[test]
    fn history_replaces_and_live_messages_append() {
        let (mut session, transport, wired) = wired();
        connect_as(&mut session, &transport, &wired, "s1");

        session.dispatch(&ServerEvent::PrivateMessage(private_message(
            "m0", "s2", "s1", "stale",
        )));
        session.dispatch(&ServerEvent::PrivateHistory(PrivateHistory {
            with_id: "s2".to_owned(),
            messages: vec![private_message("m1", "s2", "s1", "hello")],
        }));
        session.dispatch(&ServerEvent::PrivateMessage(private_message(
            "m2", "s1", "s2", "hi back",
        )));

        let store = wired.store().borrow();
        let ids: Vec<&str> = store
            .private_messages_with("s2")
            .iter()
            .map(|m| m.id.as_str())
            .collect();
        assert_eq!(ids, vec!["m1", "m2"]);
    }

    #[test]
    fn group_events_update_group_slots_only() {
        let (session, _transport, wired) = wired();

        session.dispatch(&ServerEvent::GroupHistory(GroupHistory {
            group_id: "g1".to_owned(),
            messages: vec![group_message("m1", "s2", "g1", "first")],
        }));
        session.dispatch(&ServerEvent::GroupMessage(group_message(
            "m2", "s3", "g1", "second",
        )));

        let store = wired.store().borrow();
        assert_eq!(store.group_messages("g1").len(), 2);
        assert!(store.users().is_empty());
    }

    #[test]
    fn typing_events_set_flags() {
        let (session, _transport, wired) = wired();

        session.dispatch(&ServerEvent::UserTyping(TypingUpdate {
            from: "s2".to_owned(),
            is_typing: true,
        }));

        assert!(wired.store().borrow().is_typing("s2"));
    }

    #[test]
    fn disconnect_clears_connected_flag() {
        let (mut session, transport, wired) = wired();
        connect_as(&mut session, &transport, &wired, "s1");

        session.disconnect();

        assert!(!wired.store().borrow().is_connected());
    }

    #[test]
    fn unwire_stops_updates() {
        let (session, _transport, wired) = wired();
        let unwired = wired.unwire();

        session.dispatch(&ServerEvent::UserList(vec![user("s2", "bob")]));

        let rewired = wire(unwired, &session);
        assert!(rewired.store().borrow().users().is_empty());
    }
}
