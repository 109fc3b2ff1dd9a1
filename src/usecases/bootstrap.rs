use std::path::Path;

use crate::{
    domain::chat_store::ChatStore,
    infra::{
        self,
        config::FileConfigAdapter,
        contracts::{ConfigAdapter, PreferenceStore},
        error::AppError,
        preferences::TomlPreferenceStore,
        storage_layout::StorageLayout,
        stubs::InMemoryPreferenceStore,
    },
    session::{client::ChatSession, websocket::WebSocketTransport},
    ui::CrosstermEventSource,
    usecases::{
        context::AppContext,
        contracts::{AppEventSource, ShellOrchestrator},
        shell::DefaultShellOrchestrator,
        store_wiring::{wire, UnwiredStore},
        theme::initial_dark_mode,
    },
};

const STORAGE_UNAVAILABLE: &str = "STORAGE_UNAVAILABLE";

pub struct ShellComposition {
    pub event_source: Box<dyn AppEventSource>,
    pub orchestrator: Box<dyn ShellOrchestrator>,
}

pub fn bootstrap(
    config_path: Option<&Path>,
    server_url: Option<String>,
) -> Result<AppContext, AppError> {
    let mut context = build_context(config_path, server_url)?;

    if let Some(layout) = &context.storage {
        let guard = infra::logging::init(&context.config.logging, &layout.logs_dir)?;
        context.keep_log_guard(guard);
    }

    Ok(context)
}

fn build_context(
    config_path: Option<&Path>,
    server_url: Option<String>,
) -> Result<AppContext, AppError> {
    let config_adapter = FileConfigAdapter::new(config_path).with_server_url(server_url);
    let config = config_adapter
        .load()
        .map_err(|error| match error.downcast::<AppError>() {
            Ok(app_error) => app_error,
            Err(other) => AppError::ConfigInvalid {
                field: "config",
                details: other.to_string(),
            },
        })?;

    let storage = match StorageLayout::resolve().and_then(|layout| {
        layout.ensure_dirs()?;
        Ok(layout)
    }) {
        Ok(layout) => Some(layout),
        Err(error) => {
            tracing::warn!(
                code = STORAGE_UNAVAILABLE,
                error = %error,
                "running without persisted preferences or log file"
            );
            None
        }
    };

    Ok(AppContext::new(config, storage))
}

/// Builds the session, wires a fresh store to it, and hands both to the shell.
pub fn compose_shell(context: &AppContext) -> Result<ShellComposition, AppError> {
    let transport = WebSocketTransport::new(context.config.server.handshake_timeout())
        .map_err(|error| AppError::TransportStart {
            details: error.to_string(),
        })?;
    let session = ChatSession::new(transport, context.config.server.url.clone());

    let preferences: Box<dyn PreferenceStore> = match &context.storage {
        Some(layout) => Box::new(TomlPreferenceStore::new(layout.preferences_file())),
        None => Box::new(InMemoryPreferenceStore::default()),
    };
    let store = ChatStore::new(initial_dark_mode(preferences.as_ref()));
    let wired = wire(UnwiredStore::new(store), &session);

    let orchestrator = DefaultShellOrchestrator::new(
        session,
        wired,
        preferences,
        context.config.ui.typing_idle(),
    );

    Ok(ShellComposition {
        event_source: Box::new(CrosstermEventSource),
        orchestrator: Box::new(orchestrator),
    })
}
