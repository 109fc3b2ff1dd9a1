//! Use case layer: application workflows and orchestration.

pub mod bootstrap;
pub mod context;
pub mod contracts;
pub mod create_group;
pub mod login;
pub mod logout;
pub mod open_chat;
pub mod send_message;
pub mod shell;
pub mod store_wiring;
pub mod theme;
pub mod typing;

/// Returns the usecases module name for smoke checks.
pub fn module_name() -> &'static str {
    "usecases"
}
