//! Sending the composer's text to the open conversation.

use thiserror::Error;

use crate::{
    domain::{chat_store::ChatStore, conversation::ActiveChat, typing_signal::TypingSignal},
    usecases::{contracts::ChatGateway, typing::stop_typing},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SendMessageError {
    #[error("message is empty")]
    EmptyMessage,
    #[error("not logged in")]
    NotLoggedIn,
    #[error("no conversation is open")]
    NoActiveChat,
}

/// Sends trimmed `text` to the active chat and ends the typing burst.
///
/// The message itself shows up once the server echoes it back.
pub fn send_message(
    gateway: &mut dyn ChatGateway,
    store: &ChatStore,
    typing: &mut TypingSignal,
    text: &str,
) -> Result<(), SendMessageError> {
    let content = text.trim();
    if content.is_empty() {
        return Err(SendMessageError::EmptyMessage);
    }

    if store.current_user().is_none() {
        return Err(SendMessageError::NotLoggedIn);
    }

    let chat = store.active_chat();
    match chat {
        ActiveChat::Private(peer_id) => gateway.send_private_message(peer_id, content),
        ActiveChat::Group(group_id) => gateway.send_group_message(group_id, content),
        ActiveChat::None => return Err(SendMessageError::NoActiveChat),
    }

    stop_typing(gateway, chat, typing);
    Ok(())
}
