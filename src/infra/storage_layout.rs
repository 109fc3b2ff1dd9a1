use std::{env, fs, path::PathBuf};

use crate::infra::error::AppError;

const APP_DIR_NAME: &str = "lanchat";
const PREFERENCES_FILE_NAME: &str = "preferences.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageLayout {
    pub config_dir: PathBuf,
    pub logs_dir: PathBuf,
}

impl StorageLayout {
    pub fn resolve() -> Result<Self, AppError> {
        let config_base = env::var_os("XDG_CONFIG_HOME")
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
            .or_else(dirs::config_dir)
            .ok_or_else(|| AppError::StoragePathResolution {
                details: "unable to resolve config base directory (XDG_CONFIG_HOME or platform default)"
                    .into(),
            })?;

        let config_dir = config_base.join(APP_DIR_NAME);
        let logs_dir = config_dir.join("logs");

        Ok(Self {
            config_dir,
            logs_dir,
        })
    }

    pub fn ensure_dirs(&self) -> Result<(), AppError> {
        for dir in [&self.config_dir, &self.logs_dir] {
            fs::create_dir_all(dir).map_err(|source| AppError::StorageDirCreate {
                path: dir.clone(),
                source,
            })?;
        }

        Ok(())
    }

    pub fn preferences_file(&self) -> PathBuf {
        self.config_dir.join(PREFERENCES_FILE_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::env_lock;

    #[test]
    fn logs_and_preferences_are_under_config_dir() {
        let _guard = env_lock();
        let layout = StorageLayout::resolve().expect("layout should resolve");

        assert!(layout.logs_dir.starts_with(&layout.config_dir));
        assert!(layout.preferences_file().starts_with(&layout.config_dir));
    }

    #[test]
    fn honours_xdg_config_home() {
        let _guard = env_lock();
        let temp_dir = tempfile::tempdir().expect("temp dir");
        let previous = env::var_os("XDG_CONFIG_HOME");
        // SAFETY: env mutation is serialized by the env lock and restored below.
        unsafe { env::set_var("XDG_CONFIG_HOME", temp_dir.path()) };

        let layout = StorageLayout::resolve().expect("layout should resolve");
        layout.ensure_dirs().expect("dirs should be created");

        match previous {
            Some(value) => unsafe { env::set_var("XDG_CONFIG_HOME", value) },
            None => unsafe { env::remove_var("XDG_CONFIG_HOME") },
        }

        assert_eq!(layout.config_dir, temp_dir.path().join("lanchat"));
        assert!(layout.logs_dir.is_dir());
    }
}
