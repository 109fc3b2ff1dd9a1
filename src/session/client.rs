use std::sync::mpsc::{self, Receiver, TryRecvError};

use crate::domain::model::{Group, Message, User};

use super::{
    listeners::{Listeners, Subscription},
    protocol::{
        ClientCommand, GroupHistory, GroupTypingUpdate, PrivateHistory, ServerEvent, TypingUpdate,
    },
    transport::{Link, Transport, TransportEvent},
};

const SESSION_CONNECT_SKIPPED: &str = "SESSION_CONNECT_SKIPPED";
const SESSION_CONNECT_REJECTED: &str = "SESSION_CONNECT_REJECTED";
const SESSION_SEND_SKIPPED: &str = "SESSION_SEND_SKIPPED";
const SESSION_SEND_FAILED: &str = "SESSION_SEND_FAILED";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionStatus {
    Connected { socket_id: String },
    Disconnected,
    Failed { reason: String },
}

impl ConnectionStatus {
    pub fn is_connected(&self) -> bool {
        matches!(self, Self::Connected { .. })
    }
}

#[derive(Default)]
struct SessionListeners {
    connection: Listeners<ConnectionStatus>,
    user_list: Listeners<Vec<User>>,
    group_list: Listeners<Vec<Group>>,
    private_message: Listeners<Message>,
    group_message: Listeners<Message>,
    private_history: Listeners<PrivateHistory>,
    group_history: Listeners<GroupHistory>,
    user_typing: Listeners<TypingUpdate>,
    user_group_typing: Listeners<GroupTypingUpdate>,
}

struct Connection {
    link: Box<dyn Link>,
    events: Receiver<TransportEvent>,
    socket_id: Option<String>,
}

/// Client side of one chat server session.
///
/// Holds at most one connection. Sends are fire-and-forget and silently do
/// nothing without a connection. Inbound traffic is queued by the transport
/// and delivered to listeners on the caller's thread by [`ChatSession::pump`].
pub struct ChatSession<T> {
    transport: T,
    server_url: String,
    connection: Option<Connection>,
    listeners: SessionListeners,
}

impl<T: Transport> ChatSession<T> {
    pub fn new(transport: T, server_url: impl Into<String>) -> Self {
        Self {
            transport,
            server_url: server_url.into(),
            connection: None,
            listeners: SessionListeners::default(),
        }
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    /// True while a connection handle exists, including during the handshake.
    pub fn has_connection(&self) -> bool {
        self.connection.is_some()
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn is_connected(&self) -> bool {
        self.socket_id().is_some()
    }

    pub fn socket_id(&self) -> Option<&str> {
        self.connection
            .as_ref()
            .and_then(|connection| connection.socket_id.as_deref())
    }

    pub fn connect(&mut self) {
        if self.connection.is_some() {
            tracing::debug!(
                code = SESSION_CONNECT_SKIPPED,
                "connect ignored; connection already exists"
            );
            return;
        }

        let (events_tx, events_rx) = mpsc::channel();
        match self.transport.open(&self.server_url, events_tx) {
            Ok(link) => {
                self.connection = Some(Connection {
                    link,
                    events: events_rx,
                    socket_id: None,
                });
            }
            Err(error) => {
                tracing::warn!(
                    code = SESSION_CONNECT_REJECTED,
                    server_url = %self.server_url,
                    error = %error,
                    "transport rejected connection attempt"
                );
                self.listeners.connection.emit(&ConnectionStatus::Failed {
                    reason: error.to_string(),
                });
            }
        }
    }

    pub fn disconnect(&mut self) {
        let Some(mut connection) = self.connection.take() else {
            return;
        };

        connection.link.close();
        tracing::info!(
            socket_id = connection.socket_id.as_deref().unwrap_or("-"),
            "chat session disconnected"
        );
        self.listeners
            .connection
            .emit(&ConnectionStatus::Disconnected);
    }

    pub fn register_user(&mut self, username: &str) {
        self.emit_command(ClientCommand::Register {
            username: username.to_owned(),
        });
    }

    pub fn send_private_message(&mut self, to: &str, content: &str) {
        self.emit_command(ClientCommand::PrivateMessage {
            to: to.to_owned(),
            content: content.to_owned(),
        });
    }

    pub fn send_group_message(&mut self, group_id: &str, content: &str) {
        self.emit_command(ClientCommand::GroupMessage {
            group_id: group_id.to_owned(),
            content: content.to_owned(),
        });
    }

    pub fn create_group(&mut self, name: &str, members: &[String]) {
        self.emit_command(ClientCommand::CreateGroup {
            name: name.to_owned(),
            members: members.to_vec(),
        });
    }

    pub fn request_private_history(&mut self, with_id: &str) {
        self.emit_command(ClientCommand::GetPrivateHistory {
            with_id: with_id.to_owned(),
        });
    }

    pub fn request_group_history(&mut self, group_id: &str) {
        self.emit_command(ClientCommand::GetGroupHistory {
            group_id: group_id.to_owned(),
        });
    }

    pub fn send_typing_status(&mut self, to: &str, is_typing: bool) {
        self.emit_command(ClientCommand::Typing {
            to: to.to_owned(),
            is_typing,
        });
    }

    pub fn send_group_typing_status(&mut self, group_id: &str, is_typing: bool) {
        self.emit_command(ClientCommand::GroupTyping {
            group_id: group_id.to_owned(),
            is_typing,
        });
    }

    /// Drains queued transport events and dispatches them in arrival order.
    pub fn pump(&mut self) -> usize {
        let mut handled = 0;

        loop {
            let Some(connection) = self.connection.as_ref() else {
                break;
            };

            let event = match connection.events.try_recv() {
                Ok(event) => event,
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => TransportEvent::Disconnected {
                    reason: "transport task ended".to_owned(),
                },
            };

            self.handle_transport_event(event);
            handled += 1;
        }

        handled
    }

    /// Delivers an inbound event to the listeners of its class.
    pub fn dispatch(&self, event: &ServerEvent) {
        let listeners = &self.listeners;
        match event {
            ServerEvent::UserList(users) => listeners.user_list.emit(users),
            ServerEvent::GroupList(groups) => listeners.group_list.emit(groups),
            ServerEvent::PrivateMessage(message) => listeners.private_message.emit(message),
            ServerEvent::GroupMessage(message) => listeners.group_message.emit(message),
            ServerEvent::PrivateHistory(history) => listeners.private_history.emit(history),
            ServerEvent::GroupHistory(history) => listeners.group_history.emit(history),
            ServerEvent::UserTyping(update) => listeners.user_typing.emit(update),
            ServerEvent::UserGroupTyping(update) => listeners.user_group_typing.emit(update),
        };
    }

    pub fn on_connection_change(
        &self,
        callback: impl FnMut(&ConnectionStatus) + 'static,
    ) -> Subscription {
        self.listeners.connection.subscribe(callback)
    }

    pub fn on_user_list(&self, callback: impl FnMut(&Vec<User>) + 'static) -> Subscription {
        self.listeners.user_list.subscribe(callback)
    }

    pub fn on_group_list(&self, callback: impl FnMut(&Vec<Group>) + 'static) -> Subscription {
        self.listeners.group_list.subscribe(callback)
    }

    pub fn on_private_message(&self, callback: impl FnMut(&Message) + 'static) -> Subscription {
        self.listeners.private_message.subscribe(callback)
    }

    pub fn on_group_message(&self, callback: impl FnMut(&Message) + 'static) -> Subscription {
        self.listeners.group_message.subscribe(callback)
    }

    pub fn on_private_history(
        &self,
        callback: impl FnMut(&PrivateHistory) + 'static,
    ) -> Subscription {
        self.listeners.private_history.subscribe(callback)
    }

    pub fn on_group_history(
        &self,
        callback: impl FnMut(&GroupHistory) + 'static,
    ) -> Subscription {
        self.listeners.group_history.subscribe(callback)
    }

    pub fn on_user_typing(&self, callback: impl FnMut(&TypingUpdate) + 'static) -> Subscription {
        self.listeners.user_typing.subscribe(callback)
    }

    pub fn on_user_group_typing(
        &self,
        callback: impl FnMut(&GroupTypingUpdate) + 'static,
    ) -> Subscription {
        self.listeners.user_group_typing.subscribe(callback)
    }

    fn emit_command(&mut self, command: ClientCommand) {
        let Some(connection) = self.connection.as_mut() else {
            tracing::debug!(
                code = SESSION_SEND_SKIPPED,
                event = command.event_name(),
                "outbound event dropped without a connection"
            );
            return;
        };

        let event = command.event_name();
        if let Err(error) = connection.link.send(command) {
            tracing::warn!(
                code = SESSION_SEND_FAILED,
                event,
                error = %error,
                "failed to queue outbound event"
            );
        }
    }

    fn handle_transport_event(&mut self, event: TransportEvent) {
        match event {
            TransportEvent::Connected { socket_id } => {
                if let Some(connection) = self.connection.as_mut() {
                    connection.socket_id = Some(socket_id.clone());
                }
                tracing::info!(socket_id = %socket_id, "chat session connected");
                self.listeners
                    .connection
                    .emit(&ConnectionStatus::Connected { socket_id });
            }
            TransportEvent::Event(event) => self.dispatch(&event),
            TransportEvent::Disconnected { reason } => {
                self.drop_connection();
                tracing::info!(reason = %reason, "chat session lost its connection");
                self.listeners
                    .connection
                    .emit(&ConnectionStatus::Disconnected);
            }
            TransportEvent::Failed { reason } => {
                self.drop_connection();
                self.listeners
                    .connection
                    .emit(&ConnectionStatus::Failed { reason });
            }
        }
    }

    fn drop_connection(&mut self) {
        if let Some(mut connection) = self.connection.take() {
            connection.link.close();
        }
    }
}
