use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::infra::{
    config::{load, AppConfig},
    contracts::ConfigAdapter,
};

/// Loads `config.toml` and applies command-line overrides on top.
#[derive(Debug, Clone, Default)]
pub struct FileConfigAdapter {
    path: Option<PathBuf>,
    server_url: Option<String>,
}

impl FileConfigAdapter {
    pub fn new(path: Option<&Path>) -> Self {
        Self {
            path: path.map(Path::to_path_buf),
            server_url: None,
        }
    }

    pub fn with_server_url(mut self, server_url: Option<String>) -> Self {
        self.server_url = server_url;
        self
    }
}

impl ConfigAdapter for FileConfigAdapter {
    fn load(&self) -> Result<AppConfig> {
        let mut config = load(self.path.as_deref())?;
        if let Some(server_url) = &self.server_url {
            config.server.url = server_url.clone();
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_url_flag_overrides_file_value() {
        let adapter = FileConfigAdapter::new(Some(Path::new("./missing-config.toml")))
            .with_server_url(Some("http://10.0.0.5:3000".to_owned()));

        let config = adapter.load().expect("config must load");

        assert_eq!(config.server.url, "http://10.0.0.5:3000");
    }
}
