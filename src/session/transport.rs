use std::sync::mpsc::Sender;

use thiserror::Error;

use super::protocol::{ClientCommand, ProtocolError, ServerEvent};

#[derive(Debug, Error)]
pub enum TransportError {
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
    #[error("failed to start transport runtime: {0}")]
    Runtime(#[source] std::io::Error),
    #[error("connection is closed")]
    LinkClosed,
}

/// Everything a live connection reports back to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// Namespace handshake completed; carries the server-assigned socket id.
    Connected { socket_id: String },
    Event(ServerEvent),
    /// An established connection ended from the server side or the network.
    Disconnected { reason: String },
    /// The connection never completed its handshake.
    Failed { reason: String },
}

/// Opens connections to a chat server.
pub trait Transport {
    fn open(
        &self,
        server_url: &str,
        events: Sender<TransportEvent>,
    ) -> Result<Box<dyn Link>, TransportError>;
}

/// Outbound half of one open connection.
pub trait Link {
    fn send(&mut self, command: ClientCommand) -> Result<(), TransportError>;

    fn close(&mut self);
}
