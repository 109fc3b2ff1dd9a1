use std::{fs, io, path::PathBuf};

use thiserror::Error;
use toml_edit::DocumentMut;

use crate::infra::contracts::PreferenceStore;

const DARK_MODE_KEY: &str = "dark_mode";

#[derive(Debug, Error)]
pub enum PreferenceError {
    #[error("failed to read preferences at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse preferences at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml_edit::TomlError,
    },
    #[error("preference {key} at {path} is not a boolean")]
    InvalidValue { path: PathBuf, key: &'static str },
    #[error("failed to write preferences at {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("preference storage is unavailable")]
    Unavailable,
}

/// Preferences kept in a small TOML file; unrelated keys and comments survive writes.
#[derive(Debug, Clone)]
pub struct TomlPreferenceStore {
    path: PathBuf,
}

impl TomlPreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_document(&self) -> Result<DocumentMut, PreferenceError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                return Ok(DocumentMut::new())
            }
            Err(source) => {
                return Err(PreferenceError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        raw.parse::<DocumentMut>()
            .map_err(|source| PreferenceError::Parse {
                path: self.path.clone(),
                source,
            })
    }
}

impl PreferenceStore for TomlPreferenceStore {
    fn load_dark_mode(&self) -> Result<bool, PreferenceError> {
        let document = self.read_document()?;
        match document.get(DARK_MODE_KEY) {
            None => Ok(false),
            Some(item) => item.as_bool().ok_or_else(|| PreferenceError::InvalidValue {
                path: self.path.clone(),
                key: DARK_MODE_KEY,
            }),
        }
    }

    fn save_dark_mode(&mut self, dark_mode: bool) -> Result<(), PreferenceError> {
        let mut document = self.read_document()?;
        document[DARK_MODE_KEY] = toml_edit::value(dark_mode);

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| PreferenceError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        fs::write(&self.path, document.to_string()).map_err(|source| PreferenceError::Write {
            path: self.path.clone(),
            source,
        })?;

        tracing::debug!(path = %self.path.display(), dark_mode, "preferences saved");
        Ok(())
    }
}
