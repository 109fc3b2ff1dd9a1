//! Domain layer: chat entities, the client-side store, and local UI state.

pub mod avatar;
pub mod chat_store;
pub mod conversation;
pub mod events;
pub mod login_form;
pub mod model;
pub mod new_group_form;
pub mod shell_state;
pub mod sidebar_state;
pub mod text_input_state;
pub mod typing_signal;

/// Returns the domain module name for smoke checks.
pub fn module_name() -> &'static str {
    "domain"
}
