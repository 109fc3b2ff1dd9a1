use crate::{
    domain::chat_store::ChatStore,
    infra::{contracts::PreferenceStore, preferences::PreferenceError},
};

const THEME_PREFERENCE_LOAD_FAILED: &str = "THEME_PREFERENCE_LOAD_FAILED";

/// Reads the persisted theme; unreadable preferences fall back to light.
pub fn initial_dark_mode(preferences: &dyn PreferenceStore) -> bool {
    match preferences.load_dark_mode() {
        Ok(dark_mode) => dark_mode,
        Err(error) => {
            tracing::warn!(
                code = THEME_PREFERENCE_LOAD_FAILED,
                error = %error,
                "falling back to light theme"
            );
            false
        }
    }
}

/// Flips the theme, persisting it before the store sees the change.
pub fn toggle_dark_mode(
    store: &mut ChatStore,
    preferences: &mut dyn PreferenceStore,
) -> Result<bool, PreferenceError> {
    let dark_mode = !store.is_dark_mode();
    preferences.save_dark_mode(dark_mode)?;
    store.set_dark_mode(dark_mode);

    tracing::info!(dark_mode, "theme toggled");
    Ok(dark_mode)
}
