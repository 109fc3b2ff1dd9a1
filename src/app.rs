use anyhow::Result;

use crate::{
    cli::{Cli, Command},
    domain, infra, session, ui,
    usecases::{self, bootstrap},
};

pub fn run(cli: Cli) -> Result<()> {
    tracing::debug!(
        ui = ui::module_name(),
        domain = domain::module_name(),
        session = session::module_name(),
        usecases = usecases::module_name(),
        infra = infra::module_name(),
        "module boundaries loaded"
    );

    match cli.command_or_default() {
        Command::Run => {
            let context = bootstrap::bootstrap(cli.config.as_deref(), cli.server_url)?;
            let mut shell = bootstrap::compose_shell(&context)?;
            ui::shell::start(
                &context,
                shell.event_source.as_mut(),
                shell.orchestrator.as_mut(),
            )?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::infra::error::AppError;

    #[test]
    fn invalid_config_stops_before_the_terminal_is_touched() {
        let dir = tempfile::tempdir().expect("temp dir");
        let config_path = dir.path().join("config.toml");
        fs::write(&config_path, "[server]\nurl = \"\"\n").expect("config fixture");

        let cli = Cli {
            config: Some(config_path),
            server_url: None,
            command: None,
        };

        let error = run(cli).expect_err("empty server url must be rejected");
        assert!(matches!(
            error.downcast_ref::<AppError>(),
            Some(AppError::ConfigInvalid { .. })
        ));
    }
}
