//! Settings file discovery and connection manager bootstrap.

use std::path::PathBuf;

use tether_config::{ConfigurationRegistry, StdEnvSource};
use tether_connect::ConnectionManager;

use crate::cli::Cli;
use crate::error::CliResult;

/// Locate the settings file: `--config` if given, otherwise `tether.toml`
/// in the current directory when it exists.
pub fn settings_path(cli: &Cli) -> CliResult<Option<PathBuf>> {
    match &cli.config {
        Some(path) => Ok(Some(path.clone())),
        None => Ok(tether::settings_path(&std::env::current_dir()?, &StdEnvSource)),
    }
}

/// Load the profile registry for this invocation.
pub fn load_registry(cli: &Cli) -> CliResult<(ConfigurationRegistry, Option<PathBuf>)> {
    let path = settings_path(cli)?;
    let registry = tether::load_registry(path.as_deref(), &StdEnvSource)?;
    Ok((registry, path))
}

/// Build the connection manager for this invocation.
pub fn connection_manager(cli: &Cli) -> CliResult<ConnectionManager> {
    let (registry, _) = load_registry(cli)?;
    let manager = ConnectionManager::new(registry, tether::adapter_loader());

    Ok(match &cli.environment {
        Some(environment) => manager.with_environment(environment),
        None => manager,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tether_config::CONFIG_FILE_NAME;

    #[test]
    fn test_explicit_path_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.toml");
        let cli = Cli::parse_from(["tether", "--config", missing.to_str().unwrap(), "profiles"]);

        let err = load_registry(&cli).unwrap_err();
        assert!(err.to_string().contains("failed to read settings file"));
        assert!(err.to_string().contains("missing.toml"));
    }

    #[test]
    fn test_explicit_path_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[development]\nadapter = \"sqlite\"\n").unwrap();
        let cli = Cli::parse_from(["tether", "--config", path.to_str().unwrap(), "profiles"]);

        let (registry, found) = load_registry(&cli).unwrap();
        assert!(registry.contains("development"));
        assert_eq!(found, Some(path));
    }
}
