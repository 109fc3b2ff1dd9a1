use std::cell::RefCell;

use crate::{
    domain::{chat_store::ChatStore, typing_signal::TypingSignal},
    usecases::{contracts::ChatGateway, typing::stop_typing},
};

/// Ends the chat session; the store keeps only the theme afterwards.
///
/// The store must not be borrowed by the caller: disconnecting notifies the
/// store's own connection listener.
pub fn logout(
    gateway: &mut dyn ChatGateway,
    store: &RefCell<ChatStore>,
    typing: &mut TypingSignal,
) {
    let active_chat = store.borrow().active_chat().clone();
    stop_typing(gateway, &active_chat, typing);
    gateway.disconnect();
    store.borrow_mut().reset_session();

    tracing::info!("logged out");
}
