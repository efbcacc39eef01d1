//! `tether profiles` command - List settings file profiles.

use tether_config::{CONFIG_FILE_NAME, Profile};
use tether_connect::keys;

use crate::cli::Cli;
use crate::config::load_registry;
use crate::error::CliResult;
use crate::output::{self, kv, warn};

/// Run the profiles command
pub fn run(cli: &Cli) -> CliResult<()> {
    output::header("Profiles");

    let (registry, path) = load_registry(cli)?;
    let Some(path) = path else {
        warn(&format!("No {} found in the current directory", CONFIG_FILE_NAME));
        return Ok(());
    };

    kv("Settings", &path.display().to_string());
    if let Some(environment) = &cli.environment {
        kv("Environment", environment);
    }
    output::newline();

    if registry.is_empty() {
        output::dim("No profiles defined");
        return Ok(());
    }

    for (name, profile) in registry.iter() {
        output::list_item(&format!("{} {}", name, summary(profile)));
    }

    Ok(())
}

fn summary(profile: &Profile) -> String {
    match profile {
        Profile::Config(raw) => format!(
            "({})",
            raw.get_str(keys::ADAPTER).unwrap_or("no adapter")
        ),
        Profile::Reference(target) if target.contains("://") => "-> (url)".to_string(),
        Profile::Reference(target) => format!("-> {}", target),
    }
}
