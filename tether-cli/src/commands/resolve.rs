//! `tether resolve` command - Show the configuration a descriptor resolves to.

use tether_connect::{ConnectionConfig, Descriptor, keys};

use crate::cli::{Cli, ResolveArgs};
use crate::config::connection_manager;
use crate::error::CliResult;
use crate::output::{self, kv};

/// Run the resolve command
pub fn run(cli: &Cli, args: &ResolveArgs) -> CliResult<()> {
    let manager = connection_manager(cli)?;
    let descriptor = Descriptor::from(args.descriptor.clone());
    let config = manager.resolve(descriptor.clone())?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    if args.url {
        println!("{}", config.to_url()?);
        return Ok(());
    }

    output::header("Resolved Configuration");
    kv("Descriptor", &describe(&descriptor, manager.environment()));
    output::newline();
    print_config(&config);

    Ok(())
}

/// Describe where a descriptor came from.
fn describe(descriptor: &Descriptor, environment: Option<&str>) -> String {
    match (descriptor, environment) {
        (Descriptor::Absent, Some(environment)) => format!("(current environment: {})", environment),
        (descriptor, _) => descriptor.to_string(),
    }
}

/// Print every entry, masking the password.
pub fn print_config(config: &ConnectionConfig) {
    for (key, value) in config.iter() {
        if key == keys::PASSWORD {
            kv(key, &output::mask(&value.to_string()));
        } else {
            kv(key, &value.to_string());
        }
    }
}
