use std::cell::Ref;

use anyhow::Result;

use crate::{
    domain::{chat_store::ChatStore, events::AppEvent, shell_state::ShellState},
    session::{client::ChatSession, transport::Transport},
};

pub trait AppEventSource {
    fn next_event(&mut self) -> Result<Option<AppEvent>>;
}

pub trait ShellOrchestrator {
    fn state(&self) -> &ShellState;
    fn store(&self) -> Ref<'_, ChatStore>;
    fn server_url(&self) -> &str;
    fn handle_event(&mut self, event: AppEvent) -> Result<()>;
}

/// Session operations the chat workflows rely on.
pub trait ChatGateway {
    fn connect(&mut self);
    fn disconnect(&mut self);
    fn has_connection(&self) -> bool;
    fn socket_id(&self) -> Option<&str>;
    fn register_user(&mut self, username: &str);
    fn send_private_message(&mut self, to: &str, content: &str);
    fn send_group_message(&mut self, group_id: &str, content: &str);
    fn create_group(&mut self, name: &str, members: &[String]);
    fn request_private_history(&mut self, with_id: &str);
    fn request_group_history(&mut self, group_id: &str);
    fn send_typing_status(&mut self, to: &str, is_typing: bool);
    fn send_group_typing_status(&mut self, group_id: &str, is_typing: bool);
}

impl<T: Transport> ChatGateway for ChatSession<T> {
    fn connect(&mut self) {
        ChatSession::connect(self);
    }

    fn disconnect(&mut self) {
        ChatSession::disconnect(self);
    }

    fn has_connection(&self) -> bool {
        ChatSession::has_connection(self)
    }

    fn socket_id(&self) -> Option<&str> {
        ChatSession::socket_id(self)
    }

    fn register_user(&mut self, username: &str) {
        ChatSession::register_user(self, username);
    }

    fn send_private_message(&mut self, to: &str, content: &str) {
        ChatSession::send_private_message(self, to, content);
    }

    fn send_group_message(&mut self, group_id: &str, content: &str) {
        ChatSession::send_group_message(self, group_id, content);
    }

    fn create_group(&mut self, name: &str, members: &[String]) {
        ChatSession::create_group(self, name, members);
    }

    fn request_private_history(&mut self, with_id: &str) {
        ChatSession::request_private_history(self, with_id);
    }

    fn request_group_history(&mut self, group_id: &str) {
        ChatSession::request_group_history(self, group_id);
    }

    fn send_typing_status(&mut self, to: &str, is_typing: bool) {
        ChatSession::send_typing_status(self, to, is_typing);
    }

    fn send_group_typing_status(&mut self, group_id: &str, is_typing: bool) {
        ChatSession::send_group_typing_status(self, group_id, is_typing);
    }
}
