use chrono::{DateTime, Utc};

use crate::{
    domain::{
        chat_store::ChatStore,
        login_form::{LoginFormState, UsernameError, CONNECT_FAILED_MESSAGE},
        model::User,
    },
    usecases::contracts::ChatGateway,
};

const LOGIN_CONNECT_FAILED: &str = "LOGIN_CONNECT_FAILED";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginProgress {
    /// No join in flight.
    Idle,
    /// Waiting for the server handshake.
    Pending,
    Joined(User),
    Failed,
}

/// Validates the username and starts connecting; nothing is sent yet.
pub fn begin_login(
    form: &mut LoginFormState,
    gateway: &mut dyn ChatGateway,
) -> Result<(), UsernameError> {
    if form.is_joining() {
        return Ok(());
    }

    let username = form.submit()?;
    tracing::info!(username = %username, "joining chat");
    gateway.connect();
    Ok(())
}

/// Moves a pending join forward once the connection settles.
///
/// On success the user is registered under the socket id the server assigned
/// and becomes the store's current user.
pub fn advance_login(
    form: &mut LoginFormState,
    gateway: &mut dyn ChatGateway,
    store: &mut ChatStore,
    now: DateTime<Utc>,
) -> LoginProgress {
    if !form.is_joining() {
        return LoginProgress::Idle;
    }

    if let Some(socket_id) = gateway.socket_id().map(str::to_owned) {
        let Some(username) = form.finish_join() else {
            return LoginProgress::Idle;
        };

        gateway.register_user(&username);
        let user = User {
            id: socket_id,
            username,
            joined_at: now,
        };
        store.set_current_user(user.clone());
        return LoginProgress::Joined(user);
    }

    if gateway.has_connection() {
        return LoginProgress::Pending;
    }

    tracing::warn!(code = LOGIN_CONNECT_FAILED, "connection ended before join completed");
    form.fail_join(CONNECT_FAILED_MESSAGE);
    LoginProgress::Failed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::model::fixtures::at,
        session::{
            client::{fakes::FakeTransport, ChatSession},
            protocol::ClientCommand,
            transport::TransportEvent,
        },
    };

    fn form_with(text: &str) -> LoginFormState {
        let mut form = LoginFormState::default();
        for ch in text.chars() {
            form.input_mut().insert_char(ch);
        }
        form
    }

    fn session() -> (ChatSession<FakeTransport>, FakeTransport) {
        let transport = FakeTransport::default();
        (
            ChatSession::new(transport.clone(), "http://127.0.0.1:3000"),
            transport,
        )
    }

    #[test]
    fn short_username_is_rejected_without_connecting() {
        let (mut session, transport) = session();
        let mut form = form_with("ab");

        let result = begin_login(&mut form, &mut session);

        assert_eq!(result, Err(UsernameError::TooShort));
        assert_eq!(form.error(), Some("Username must be at least 3 characters"));
        assert_eq!(transport.opened.get(), 0);
    }

    #[test]
    fn successful_join_registers_and_sets_current_user() {
        let (mut session, transport) = session();
        let mut store = ChatStore::default();
        let mut form = form_with("  alice ");

        begin_login(&mut form, &mut session).expect("valid username");
        assert_eq!(
            advance_login(&mut form, &mut session, &mut store, at(0)),
            LoginProgress::Pending
        );

        transport.push(TransportEvent::Connected {
            socket_id: "s1".to_owned(),
        });
        session.pump();
        let progress = advance_login(&mut form, &mut session, &mut store, at(5));

        assert!(matches!(progress, LoginProgress::Joined(ref user) if user.id == "s1"));
        assert_eq!(
            transport.sent(),
            vec![ClientCommand::Register {
                username: "alice".to_owned()
            }]
        );
        let current = store.current_user().expect("current user");
        assert_eq!(current.username, "alice");
        assert_eq!(current.joined_at, at(5));
        assert!(!form.is_joining());
    }

    #[test]
    fn failed_connection_shows_retry_message() {
        let (mut session, transport) = session();
        let mut store = ChatStore::default();
        let mut form = form_with("alice");
        begin_login(&mut form, &mut session).expect("valid username");

        transport.push(TransportEvent::Failed {
            reason: "connection refused".to_owned(),
        });
        session.pump();

        assert_eq!(
            advance_login(&mut form, &mut session, &mut store, at(0)),
            LoginProgress::Failed
        );
        assert_eq!(form.error(), Some(CONNECT_FAILED_MESSAGE));
        assert!(!form.is_joining());
        assert!(store.current_user().is_none());
    }

    #[test]
    fn second_submit_while_joining_does_not_reconnect() {
        let (mut session, transport) = session();
        let mut form = form_with("alice");

        begin_login(&mut form, &mut session).expect("valid username");
        begin_login(&mut form, &mut session).expect("still joining");

        assert_eq!(transport.opened.get(), 1);
    }
}
