use crate::infra::{contracts::PreferenceStore, preferences::PreferenceError};

#[cfg(test)]
use anyhow::Result;

#[cfg(test)]
use crate::infra::{config::AppConfig, contracts::ConfigAdapter};

#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct StubConfigAdapter;

#[cfg(test)]
impl ConfigAdapter for StubConfigAdapter {
    fn load(&self) -> Result<AppConfig> {
        Ok(AppConfig::default())
    }
}

/// Keeps preferences for the lifetime of the process only.
///
/// Used when no config directory can be resolved, and by tests.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPreferenceStore {
    pub dark_mode: bool,
    pub fail_writes: bool,
    pub writes: usize,
}

impl PreferenceStore for InMemoryPreferenceStore {
    fn load_dark_mode(&self) -> Result<bool, PreferenceError> {
        Ok(self.dark_mode)
    }

    fn save_dark_mode(&mut self, dark_mode: bool) -> Result<(), PreferenceError> {
        if self.fail_writes {
            return Err(PreferenceError::Unavailable);
        }

        self.dark_mode = dark_mode;
        self.writes += 1;
        Ok(())
    }
}
