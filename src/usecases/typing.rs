//! Typing indicator signals for the open conversation.

use std::time::Instant;

use crate::{
    domain::{conversation::ActiveChat, typing_signal::TypingSignal},
    usecases::contracts::ChatGateway,
};

fn announce(gateway: &mut dyn ChatGateway, chat: &ActiveChat, is_typing: bool) {
    match chat {
        ActiveChat::Private(peer_id) => gateway.send_typing_status(peer_id, is_typing),
        ActiveChat::Group(group_id) => gateway.send_group_typing_status(group_id, is_typing),
        ActiveChat::None => {}
    }
}

pub fn on_composer_keystroke(
    gateway: &mut dyn ChatGateway,
    chat: &ActiveChat,
    typing: &mut TypingSignal,
    now: Instant,
) {
    if !chat.is_open() {
        return;
    }

    if let Some(is_typing) = typing.on_keystroke(now) {
        announce(gateway, chat, is_typing);
    }
}

pub fn poll_typing(
    gateway: &mut dyn ChatGateway,
    chat: &ActiveChat,
    typing: &mut TypingSignal,
    now: Instant,
) {
    if let Some(is_typing) = typing.poll(now) {
        announce(gateway, chat, is_typing);
    }
}

/// Ends an active burst right away, e.g. after sending or leaving the chat.
pub fn stop_typing(gateway: &mut dyn ChatGateway, chat: &ActiveChat, typing: &mut TypingSignal) {
    if let Some(is_typing) = typing.stop() {
        announce(gateway, chat, is_typing);
    }
}
