use std::{sync::mpsc::Sender, time::Duration};

use futures_util::{SinkExt, StreamExt};
use thiserror::Error;
use tokio::{
    net::TcpStream,
    runtime::{Builder, Runtime},
    sync::{mpsc, watch},
};
use tokio_tungstenite::{
    connect_async, tungstenite::Message as WsMessage, MaybeTlsStream, WebSocketStream,
};

use super::{
    protocol::{self, ClientCommand, EnginePacket, ServerEvent, SocketPacket},
    transport::{Link, Transport, TransportError, TransportEvent},
};

const CONNECTION_STARTED: &str = "SESSION_CONNECTION_STARTED";
const CONNECTION_ESTABLISHED: &str = "SESSION_CONNECTION_ESTABLISHED";
const CONNECTION_FAILED: &str = "SESSION_CONNECTION_FAILED";
const CONNECTION_CLOSED: &str = "SESSION_CONNECTION_CLOSED";
const CONNECTION_STOPPED: &str = "SESSION_CONNECTION_STOPPED";
const FRAME_DECODE_FAILED: &str = "SESSION_FRAME_DECODE_FAILED";
const COMMAND_ENCODE_FAILED: &str = "SESSION_COMMAND_ENCODE_FAILED";

type SocketStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

#[derive(Debug, Error)]
enum ConnectError {
    #[error("websocket error: {0}")]
    Socket(#[from] tokio_tungstenite::tungstenite::Error),
    #[error("server refused the connection: {0}")]
    Refused(String),
    #[error("connection closed during handshake")]
    ClosedDuringHandshake,
    #[error("handshake timed out after {0:?}")]
    TimedOut(Duration),
}

/// Socket.IO client transport over tokio-tungstenite.
///
/// Owns a small background runtime; every connection runs as one task that
/// reports through the std channel handed to [`Transport::open`].
pub struct WebSocketTransport {
    runtime: Runtime,
    handshake_timeout: Option<Duration>,
}

impl WebSocketTransport {
    pub fn new(handshake_timeout: Option<Duration>) -> Result<Self, TransportError> {
        let runtime = Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("lanchat-transport")
            .enable_all()
            .build()
            .map_err(TransportError::Runtime)?;

        Ok(Self {
            runtime,
            handshake_timeout,
        })
    }
}

impl Transport for WebSocketTransport {
    fn open(
        &self,
        server_url: &str,
        events: Sender<TransportEvent>,
    ) -> Result<Box<dyn Link>, TransportError> {
        let endpoint = protocol::socket_io_endpoint(server_url)?;
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (stop_tx, stop_rx) = watch::channel(false);

        tracing::info!(
            code = CONNECTION_STARTED,
            endpoint = %endpoint,
            "opening chat server connection"
        );

        self.runtime.spawn(run_connection(
            endpoint.to_string(),
            self.handshake_timeout,
            command_rx,
            stop_rx,
            events,
        ));

        Ok(Box::new(WebSocketLink {
            commands: command_tx,
            stop_tx: Some(stop_tx),
        }))
    }
}

struct WebSocketLink {
    commands: mpsc::UnboundedSender<ClientCommand>,
    stop_tx: Option<watch::Sender<bool>>,
}

impl Link for WebSocketLink {
    fn send(&mut self, command: ClientCommand) -> Result<(), TransportError> {
        self.commands
            .send(command)
            .map_err(|_| TransportError::LinkClosed)
    }

    fn close(&mut self) {
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(true);
        }
    }
}

impl Drop for WebSocketLink {
    fn drop(&mut self) {
        self.close();
    }
}

enum ConnectionEnd {
    Stopped,
    Closed(String),
    Failed(String),
}

async fn run_connection(
    endpoint: String,
    handshake_timeout: Option<Duration>,
    commands: mpsc::UnboundedReceiver<ClientCommand>,
    mut stop_rx: watch::Receiver<bool>,
    events: Sender<TransportEvent>,
) {
    let connected = tokio::select! {
        _ = stop_rx.changed() => Err(None),
        result = connect_with_timeout(&endpoint, handshake_timeout) => result.map_err(Some),
    };

    let end = match connected {
        Ok((stream, socket_id)) => {
            tracing::info!(
                code = CONNECTION_ESTABLISHED,
                socket_id = %socket_id,
                "chat server connection established"
            );
            if events.send(TransportEvent::Connected { socket_id }).is_err() {
                ConnectionEnd::Stopped
            } else {
                serve(stream, commands, stop_rx, &events).await
            }
        }
        Err(None) => ConnectionEnd::Stopped,
        Err(Some(error)) => ConnectionEnd::Failed(error.to_string()),
    };

    let event = match end {
        ConnectionEnd::Stopped => {
            tracing::info!(code = CONNECTION_STOPPED, "chat server connection stopped");
            return;
        }
        ConnectionEnd::Closed(reason) => {
            tracing::warn!(code = CONNECTION_CLOSED, reason = %reason, "chat server connection closed");
            TransportEvent::Disconnected { reason }
        }
        ConnectionEnd::Failed(reason) => {
            tracing::warn!(code = CONNECTION_FAILED, reason = %reason, "chat server connection failed");
            TransportEvent::Failed { reason }
        }
    };

    let _ = events.send(event);
}

async fn connect_with_timeout(
    endpoint: &str,
    timeout: Option<Duration>,
) -> Result<(SocketStream, String), ConnectError> {
    match timeout {
        Some(limit) => tokio::time::timeout(limit, handshake(endpoint))
            .await
            .map_err(|_| ConnectError::TimedOut(limit))?,
        None => handshake(endpoint).await,
    }
}

/// Completes the engine open and the default namespace connect.
async fn handshake(endpoint: &str) -> Result<(SocketStream, String), ConnectError> {
    let (mut stream, _response) = connect_async(endpoint).await?;
    let mut engine_sid = None;

    while let Some(frame) = stream.next().await {
        let text = match frame? {
            WsMessage::Text(text) => text,
            WsMessage::Close(_) => return Err(ConnectError::ClosedDuringHandshake),
            _ => continue,
        };

        match protocol::decode_frame(text.as_str()) {
            Ok(EnginePacket::Open(open)) => {
                engine_sid = Some(open.sid);
                stream
                    .send(WsMessage::Text(protocol::encode_connect().into()))
                    .await?;
            }
            Ok(EnginePacket::Ping) => {
                stream
                    .send(WsMessage::Text(protocol::encode_pong().into()))
                    .await?;
            }
            Ok(EnginePacket::Message(SocketPacket::Connect { sid })) => {
                let Some(socket_id) = sid.or(engine_sid) else {
                    return Err(ConnectError::Refused("no socket id assigned".to_owned()));
                };
                return Ok((stream, socket_id));
            }
            Ok(EnginePacket::Message(SocketPacket::ConnectError(body))) => {
                return Err(ConnectError::Refused(body.to_string()));
            }
            Ok(EnginePacket::Close) => return Err(ConnectError::ClosedDuringHandshake),
            Ok(_) => {}
            Err(error) => {
                tracing::debug!(code = FRAME_DECODE_FAILED, error = %error, "ignoring handshake frame");
            }
        }
    }

    Err(ConnectError::ClosedDuringHandshake)
}

async fn serve(
    stream: SocketStream,
    mut commands: mpsc::UnboundedReceiver<ClientCommand>,
    mut stop_rx: watch::Receiver<bool>,
    events: &Sender<TransportEvent>,
) -> ConnectionEnd {
    let (mut write, mut read) = stream.split();

    loop {
        tokio::select! {
            changed = stop_rx.changed() => {
                if changed.is_err() || *stop_rx.borrow() {
                    let _ = write
                        .send(WsMessage::Text(protocol::encode_disconnect().into()))
                        .await;
                    let _ = write.close().await;
                    return ConnectionEnd::Stopped;
                }
            }
            command = commands.recv() => {
                let Some(command) = command else {
                    return ConnectionEnd::Stopped;
                };
                let frame = match protocol::encode_event(&command) {
                    Ok(frame) => frame,
                    Err(error) => {
                        tracing::warn!(
                            code = COMMAND_ENCODE_FAILED,
                            event = command.event_name(),
                            error = %error,
                            "dropping outbound event that failed to encode"
                        );
                        continue;
                    }
                };
                tracing::debug!(event = command.event_name(), "sending outbound event");
                if let Err(error) = write.send(WsMessage::Text(frame.into())).await {
                    return ConnectionEnd::Closed(error.to_string());
                }
            }
            frame = read.next() => {
                let text = match frame {
                    Some(Ok(WsMessage::Text(text))) => text,
                    Some(Ok(WsMessage::Close(_))) | None => {
                        return ConnectionEnd::Closed("server closed the connection".to_owned());
                    }
                    Some(Ok(_)) => continue,
                    Some(Err(error)) => return ConnectionEnd::Closed(error.to_string()),
                };

                match classify_frame(text.as_str()) {
                    Inbound::Reply(reply) => {
                        if let Err(error) = write.send(WsMessage::Text(reply.into())).await {
                            return ConnectionEnd::Closed(error.to_string());
                        }
                    }
                    Inbound::Deliver(event) => {
                        tracing::debug!(event = event.name(), "received server event");
                        if events.send(TransportEvent::Event(event)).is_err() {
                            return ConnectionEnd::Stopped;
                        }
                    }
                    Inbound::Closed(reason) => return ConnectionEnd::Closed(reason.to_owned()),
                    Inbound::Ignore => {}
                }
            }
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Inbound {
    Reply(String),
    Deliver(ServerEvent),
    Closed(&'static str),
    Ignore,
}

/// Decides what an established connection does with one text frame.
fn classify_frame(frame: &str) -> Inbound {
    let packet = match protocol::decode_frame(frame) {
        Ok(packet) => packet,
        Err(error) => {
            tracing::warn!(code = FRAME_DECODE_FAILED, error = %error, "ignoring undecodable frame");
            return Inbound::Ignore;
        }
    };

    match packet {
        EnginePacket::Ping => Inbound::Reply(protocol::encode_pong()),
        EnginePacket::Close => Inbound::Closed("server closed the session"),
        EnginePacket::Message(SocketPacket::Disconnect) => {
            Inbound::Closed("server disconnected the socket")
        }
        EnginePacket::Message(SocketPacket::Event { name, payload }) => {
            match ServerEvent::decode(&name, payload) {
                Ok(Some(event)) => Inbound::Deliver(event),
                Ok(None) => {
                    tracing::debug!(event = %name, "ignoring unknown server event");
                    Inbound::Ignore
                }
                Err(error) => {
                    tracing::warn!(
                        code = FRAME_DECODE_FAILED,
                        event = %name,
                        error = %error,
                        "ignoring server event with unexpected payload"
                    );
                    Inbound::Ignore
                }
            }
        }
        _ => Inbound::Ignore,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::protocol::TypingUpdate;

    #[test]
    fn ping_is_answered_with_pong() {
        assert_eq!(classify_frame("2"), Inbound::Reply("3".to_owned()));
    }

    #[test]
    fn known_events_are_delivered() {
        let inbound = classify_frame(r#"42["user-typing",{"from":"s9","isTyping":false}]"#);

        assert_eq!(
            inbound,
            Inbound::Deliver(ServerEvent::UserTyping(TypingUpdate {
                from: "s9".to_owned(),
                is_typing: false,
            }))
        );
    }

    #[test]
    fn server_disconnect_ends_the_connection() {
        assert!(matches!(classify_frame("41"), Inbound::Closed(_)));
        assert!(matches!(classify_frame("1"), Inbound::Closed(_)));
    }

    #[test]
    fn garbage_and_unknown_events_are_ignored() {
        assert_eq!(classify_frame("not a packet"), Inbound::Ignore);
        assert_eq!(classify_frame(r#"42["server-stats",{}]"#), Inbound::Ignore);
        assert_eq!(classify_frame(r#"42["user-list",{"bad":true}]"#), Inbound::Ignore);
        assert_eq!(classify_frame("3"), Inbound::Ignore);
    }

    #[test]
    fn open_rejects_invalid_server_url_before_spawning() {
        let transport = WebSocketTransport::new(None).expect("runtime should build");
        let (events_tx, _events_rx) = std::sync::mpsc::channel();

        let result = transport.open("ftp://chat.lan", events_tx);

        assert!(matches!(result, Err(TransportError::Protocol(_))));
    }

    #[test]
    fn unreachable_server_reports_failure() {
        let transport =
            WebSocketTransport::new(Some(Duration::from_secs(2))).expect("runtime should build");
        let (events_tx, events_rx) = std::sync::mpsc::channel();

        // Port 9 on loopback refuses connections on any sane test host.
        let _link = transport
            .open("http://127.0.0.1:9", events_tx)
            .expect("open should spawn a connection task");

        let event = events_rx
            .recv_timeout(Duration::from_secs(5))
            .expect("connection task should report");
        assert!(matches!(event, TransportEvent::Failed { .. }));
    }
}
