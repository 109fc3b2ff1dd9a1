//! Connection to the chat server: wire codec, transport, and the session
//! wrapper that fans inbound events out to listeners.

pub mod client;
pub mod listeners;
pub mod protocol;
pub mod transport;
pub mod websocket;

pub fn module_name() -> &'static str {
    "session"
}
