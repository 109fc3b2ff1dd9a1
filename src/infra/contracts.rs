use anyhow::Result;

use crate::infra::{config::AppConfig, preferences::PreferenceError};

pub trait ConfigAdapter {
    fn load(&self) -> Result<AppConfig>;
}

/// Durable client-side preferences that survive restarts.
pub trait PreferenceStore {
    fn load_dark_mode(&self) -> Result<bool, PreferenceError>;

    fn save_dark_mode(&mut self, dark_mode: bool) -> Result<(), PreferenceError>;
}

impl<P: PreferenceStore + ?Sized> PreferenceStore for Box<P> {
    fn load_dark_mode(&self) -> Result<bool, PreferenceError> {
        (**self).load_dark_mode()
    }

    fn save_dark_mode(&mut self, dark_mode: bool) -> Result<(), PreferenceError> {
        (**self).save_dark_mode(dark_mode)
    }
}
