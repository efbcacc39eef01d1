//! Tether CLI - Command-line interface for Tether connection resolution.

use clap::Parser;
use miette::Diagnostic;

use tether_cli::cli::{Cli, Command};
use tether_cli::commands;
use tether_cli::error::CliResult;
use tether_cli::output;
use tether_connect::logging;

fn main() {
    logging::init();

    // Run the CLI and handle errors
    if let Err(e) = run() {
        let message = e.to_string();
        output::newline();
        output::error(&message);

        // Causes already folded into the message are not repeated.
        let mut source = std::error::Error::source(&e);
        while let Some(cause) = source {
            let text = cause.to_string();
            if !message.contains(&text) {
                output::cause(&text);
            }
            source = cause.source();
        }
        if let Some(help) = e.help() {
            output::hint(&help.to_string());
        }
        std::process::exit(1);
    }
}

fn run() -> CliResult<()> {
    let cli = Cli::parse();

    match &cli.command {
        Command::Resolve(args) => commands::resolve::run(&cli, args),
        Command::Check(args) => commands::check::run(&cli, args),
        Command::Profiles => commands::profiles::run(&cli),
        Command::Adapters => commands::adapters::run(),
        Command::Version => commands::version::run(),
    }
}
