use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::infra::{
    config::{file_config::FileConfig, AppConfig},
    error::AppError,
};

const DEFAULT_CONFIG_PATH: &str = "config.toml";

pub fn load(path: Option<&Path>) -> Result<AppConfig, AppError> {
    let config_path = path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

    let mut config = AppConfig::default();

    if !config_path.exists() {
        return Ok(config);
    }

    let raw = fs::read_to_string(&config_path).map_err(|source| AppError::ConfigRead {
        path: config_path.clone(),
        source,
    })?;

    let file_config: FileConfig = toml::from_str(&raw).map_err(|source| AppError::ConfigParse {
        path: config_path,
        source,
    })?;

    file_config.merge_into(&mut config);
    validate(&config)?;
    Ok(config)
}

fn validate(config: &AppConfig) -> Result<(), AppError> {
    if config.server.url.trim().is_empty() {
        return Err(AppError::ConfigInvalid {
            field: "server.url",
            details: "must not be empty".to_owned(),
        });
    }

    if config.ui.typing_idle_ms == 0 {
        return Err(AppError::ConfigInvalid {
            field: "ui.typing_idle_ms",
            details: "must be greater than zero".to_owned(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn returns_defaults_when_file_is_missing() {
        let config = load(Some(Path::new("./missing-config.toml"))).expect("config must load");

        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn merges_file_values_over_defaults() {
        let temp_dir = tempfile::tempdir().expect("temp dir");
        let config_path = temp_dir.path().join("config.toml");

        fs::write(
            &config_path,
            r#"[logging]
level = "debug"

[server]
url = "http://192.168.1.20:3000"
"#,
        )
        .expect("must write test config");

        let config = load(Some(&config_path)).expect("config must load");

        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.server.url, "http://192.168.1.20:3000");
        assert_eq!(config.server.handshake_timeout_ms, 5_000);
        assert_eq!(config.ui.typing_idle_ms, 2_000);
    }

    #[test]
    fn reports_parse_errors_with_path() {
        let temp_dir = tempfile::tempdir().expect("temp dir");
        let config_path = temp_dir.path().join("config.toml");
        fs::write(&config_path, "[server\nurl = 1").expect("must write test config");

        let error = load(Some(&config_path)).expect_err("broken toml must fail");

        assert!(matches!(error, AppError::ConfigParse { .. }));
    }

    #[test]
    fn rejects_zero_typing_idle() {
        let temp_dir = tempfile::tempdir().expect("temp dir");
        let config_path = temp_dir.path().join("config.toml");
        fs::write(&config_path, "[ui]\ntyping_idle_ms = 0\n").expect("must write test config");

        let error = load(Some(&config_path)).expect_err("zero idle must fail");

        assert!(matches!(
            error,
            AppError::ConfigInvalid {
                field: "ui.typing_idle_ms",
                ..
            }
        ));
    }
}
