//! `tether check` command - Establish a connection and open it.

use tether_connect::{ConnectionError, Descriptor};

use crate::cli::{CheckArgs, Cli};
use crate::commands::resolve::print_config;
use crate::config::connection_manager;
use crate::error::CliResult;
use crate::output::{self, success};

/// Run the check command
pub fn run(cli: &Cli, args: &CheckArgs) -> CliResult<()> {
    output::header("Check Connection");

    let mut manager = connection_manager(cli)?;
    let descriptor = Descriptor::from(args.descriptor.clone());

    output::step(1, 3, "Resolving descriptor...");
    let config = manager.establish_named(&args.name, descriptor)?;
    print_config(&config);

    output::step(2, 3, &format!("Opening connection with the {} adapter...", config.adapter()));
    let conn = manager.connection(&args.name)?;

    output::step(3, 3, "Pinging...");
    conn.ping().map_err(|source| ConnectionError::ConnectionFailed {
        name: args.name.clone(),
        adapter: config.adapter().to_string(),
        source,
    })?;

    manager.remove_connection(&args.name);

    output::newline();
    success(&format!("Connection `{}` is working", args.name));

    Ok(())
}
