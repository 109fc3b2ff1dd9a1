//! Socket.IO v5 over Engine.IO v4 text framing.
//!
//! Only the subset a chat client needs: the default namespace, JSON event
//! packets, and the ping/pong heartbeat. Binary attachments are rejected.

use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;
use url::Url;

use crate::domain::model::{Group, Message, User};

const ENGINE_OPEN: char = '0';
const ENGINE_CLOSE: char = '1';
const ENGINE_PING: char = '2';
const ENGINE_PONG: char = '3';
const ENGINE_MESSAGE: char = '4';
const ENGINE_UPGRADE: char = '5';
const ENGINE_NOOP: char = '6';

const SOCKET_CONNECT: char = '0';
const SOCKET_DISCONNECT: char = '1';
const SOCKET_EVENT: char = '2';
const SOCKET_ACK: char = '3';
const SOCKET_CONNECT_ERROR: char = '4';
const SOCKET_BINARY_EVENT: char = '5';
const SOCKET_BINARY_ACK: char = '6';

const SOCKET_IO_PATH: &str = "/socket.io/";

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("received an empty frame")]
    EmptyFrame,
    #[error("unknown {layer} packet type {kind:?}")]
    UnknownPacketType { layer: &'static str, kind: char },
    #[error("unsupported packet: {0}")]
    Unsupported(&'static str),
    #[error("malformed packet payload: {0}")]
    Malformed(&'static str),
    #[error("invalid JSON in packet: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("invalid server url {url:?}: {source}")]
    InvalidServerUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("unsupported server url scheme {0:?}")]
    UnsupportedScheme(String),
}

/// Engine.IO handshake sent by the server in the open packet.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Handshake {
    pub sid: String,
    #[serde(default)]
    pub ping_interval: u64,
    #[serde(default)]
    pub ping_timeout: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EnginePacket {
    Open(Handshake),
    Close,
    Ping,
    Pong,
    Message(SocketPacket),
    Noop,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SocketPacket {
    Connect { sid: Option<String> },
    Disconnect,
    Event { name: String, payload: Value },
    Ack,
    ConnectError(Value),
    /// Packet addressed to a namespace other than `/`.
    OtherNamespace,
}

/// Outbound events understood by the chat server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientCommand {
    Register { username: String },
    PrivateMessage { to: String, content: String },
    GroupMessage { group_id: String, content: String },
    CreateGroup { name: String, members: Vec<String> },
    GetPrivateHistory { with_id: String },
    GetGroupHistory { group_id: String },
    Typing { to: String, is_typing: bool },
    GroupTyping { group_id: String, is_typing: bool },
}

impl ClientCommand {
    pub fn event_name(&self) -> &'static str {
        match self {
            Self::Register { .. } => "register",
            Self::PrivateMessage { .. } => "private-message",
            Self::GroupMessage { .. } => "group-message",
            Self::CreateGroup { .. } => "create-group",
            Self::GetPrivateHistory { .. } => "get-private-history",
            Self::GetGroupHistory { .. } => "get-group-history",
            Self::Typing { .. } => "typing",
            Self::GroupTyping { .. } => "group-typing",
        }
    }

    pub fn payload(&self) -> Value {
        match self {
            Self::Register { username } => json!({ "username": username }),
            Self::PrivateMessage { to, content } => json!({ "to": to, "content": content }),
            Self::GroupMessage { group_id, content } => {
                json!({ "groupId": group_id, "content": content })
            }
            Self::CreateGroup { name, members } => json!({ "name": name, "members": members }),
            Self::GetPrivateHistory { with_id } => json!({ "with": with_id }),
            Self::GetGroupHistory { group_id } => json!({ "groupId": group_id }),
            Self::Typing { to, is_typing } => json!({ "to": to, "isTyping": is_typing }),
            Self::GroupTyping {
                group_id,
                is_typing,
            } => json!({ "groupId": group_id, "isTyping": is_typing }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrivateHistory {
    pub with_id: String,
    pub messages: Vec<Message>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupHistory {
    pub group_id: String,
    pub messages: Vec<Message>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypingUpdate {
    pub from: String,
    pub is_typing: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupTypingUpdate {
    pub group_id: String,
    pub from: String,
    pub is_typing: bool,
}

/// Inbound events the client reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerEvent {
    UserList(Vec<User>),
    GroupList(Vec<Group>),
    PrivateMessage(Message),
    GroupMessage(Message),
    PrivateHistory(PrivateHistory),
    GroupHistory(GroupHistory),
    UserTyping(TypingUpdate),
    UserGroupTyping(GroupTypingUpdate),
}

impl ServerEvent {
    /// Decodes a named event; `Ok(None)` for events the client does not know.
    pub fn decode(name: &str, payload: Value) -> Result<Option<Self>, ProtocolError> {
        let event = match name {
            "user-list" => Self::UserList(serde_json::from_value(payload)?),
            "group-list" => Self::GroupList(serde_json::from_value(payload)?),
            "private-message" => Self::PrivateMessage(serde_json::from_value(payload)?),
            "group-message" => Self::GroupMessage(serde_json::from_value(payload)?),
            "private-history" => Self::PrivateHistory(serde_json::from_value(payload)?),
            "group-history" => Self::GroupHistory(serde_json::from_value(payload)?),
            "user-typing" => Self::UserTyping(serde_json::from_value(payload)?),
            "user-group-typing" => Self::UserGroupTyping(serde_json::from_value(payload)?),
            _ => return Ok(None),
        };

        Ok(Some(event))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::UserList(_) => "user-list",
            Self::GroupList(_) => "group-list",
            Self::PrivateMessage(_) => "private-message",
            Self::GroupMessage(_) => "group-message",
            Self::PrivateHistory(_) => "private-history",
            Self::GroupHistory(_) => "group-history",
            Self::UserTyping(_) => "user-typing",
            Self::UserGroupTyping(_) => "user-group-typing",
        }
    }
}

/// Builds the WebSocket endpoint for a server given as http(s) or ws(s) URL.
pub fn socket_io_endpoint(server_url: &str) -> Result<Url, ProtocolError> {
    let mut url = Url::parse(server_url).map_err(|source| ProtocolError::InvalidServerUrl {
        url: server_url.to_owned(),
        source,
    })?;

    let scheme = match url.scheme() {
        "http" | "ws" => "ws",
        "https" | "wss" => "wss",
        other => return Err(ProtocolError::UnsupportedScheme(other.to_owned())),
    };
    url.set_scheme(scheme)
        .map_err(|()| ProtocolError::UnsupportedScheme(scheme.to_owned()))?;

    url.set_path(SOCKET_IO_PATH);
    url.set_query(Some("EIO=4&transport=websocket"));
    Ok(url)
}

pub fn decode_frame(frame: &str) -> Result<EnginePacket, ProtocolError> {
    let mut chars = frame.chars();
    let kind = chars.next().ok_or(ProtocolError::EmptyFrame)?;
    let body = chars.as_str();

    match kind {
        ENGINE_OPEN => Ok(EnginePacket::Open(serde_json::from_str(body)?)),
        ENGINE_CLOSE => Ok(EnginePacket::Close),
        ENGINE_PING => Ok(EnginePacket::Ping),
        ENGINE_PONG => Ok(EnginePacket::Pong),
        ENGINE_MESSAGE => decode_socket_packet(body).map(EnginePacket::Message),
        ENGINE_NOOP => Ok(EnginePacket::Noop),
        ENGINE_UPGRADE => Err(ProtocolError::Unsupported("transport upgrade")),
        other => Err(ProtocolError::UnknownPacketType {
            layer: "engine",
            kind: other,
        }),
    }
}

fn decode_socket_packet(packet: &str) -> Result<SocketPacket, ProtocolError> {
    let mut chars = packet.chars();
    let kind = chars.next().ok_or(ProtocolError::EmptyFrame)?;
    let mut rest = chars.as_str();

    if rest.starts_with('/') {
        let (namespace, tail) = rest.split_once(',').unwrap_or((rest, ""));
        if namespace != "/" {
            return Ok(SocketPacket::OtherNamespace);
        }
        rest = tail;
    }

    // Acknowledgement id precedes the JSON body.
    let rest = rest.trim_start_matches(|ch: char| ch.is_ascii_digit());

    match kind {
        SOCKET_CONNECT => {
            if rest.is_empty() {
                return Ok(SocketPacket::Connect { sid: None });
            }
            let body: Value = serde_json::from_str(rest)?;
            let sid = body.get("sid").and_then(Value::as_str).map(str::to_owned);
            Ok(SocketPacket::Connect { sid })
        }
        SOCKET_DISCONNECT => Ok(SocketPacket::Disconnect),
        SOCKET_EVENT => decode_event(rest),
        SOCKET_ACK => Ok(SocketPacket::Ack),
        SOCKET_CONNECT_ERROR => {
            let body = if rest.is_empty() {
                Value::Null
            } else {
                serde_json::from_str(rest)?
            };
            Ok(SocketPacket::ConnectError(body))
        }
        SOCKET_BINARY_EVENT | SOCKET_BINARY_ACK => {
            Err(ProtocolError::Unsupported("binary attachments"))
        }
        other => Err(ProtocolError::UnknownPacketType {
            layer: "socket",
            kind: other,
        }),
    }
}

fn decode_event(body: &str) -> Result<SocketPacket, ProtocolError> {
    let Value::Array(mut items) = serde_json::from_str(body)? else {
        return Err(ProtocolError::Malformed("event body is not an array"));
    };

    if items.is_empty() {
        return Err(ProtocolError::Malformed("event array is empty"));
    }

    let Value::String(name) = items.remove(0) else {
        return Err(ProtocolError::Malformed("event name is not a string"));
    };

    let payload = if items.is_empty() {
        Value::Null
    } else {
        items.remove(0)
    };

    Ok(SocketPacket::Event { name, payload })
}

/// Namespace connect request sent after the engine handshake.
pub fn encode_connect() -> String {
    format!("{ENGINE_MESSAGE}{SOCKET_CONNECT}")
}

pub fn encode_disconnect() -> String {
    format!("{ENGINE_MESSAGE}{SOCKET_DISCONNECT}")
}

pub fn encode_pong() -> String {
    ENGINE_PONG.to_string()
}

pub fn encode_event(command: &ClientCommand) -> Result<String, ProtocolError> {
    let body = serde_json::to_string(&json!([command.event_name(), command.payload()]))?;
    Ok(format!("{ENGINE_MESSAGE}{SOCKET_EVENT}{body}"))
}
