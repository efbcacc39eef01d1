//! CLI argument definitions using clap.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Tether CLI - Resolve and check database connections
#[derive(Parser, Debug)]
#[command(name = "tether")]
#[command(author = "Pegasus Heavy Industries LLC")]
#[command(version)]
#[command(about = "Tether CLI - Resolve and check database connections", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the settings file (defaults to ./tether.toml)
    #[arg(short, long, global = true, env = "TETHER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Profile used when no descriptor is given
    #[arg(short, long = "env", global = true, env = "TETHER_ENV")]
    pub environment: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Resolve a descriptor and print the connection configuration
    Resolve(ResolveArgs),

    /// Establish a connection and check that it opens
    Check(CheckArgs),

    /// List the profiles defined in the settings file
    Profiles,

    /// List the registered adapters
    Adapters,

    /// Display version information
    Version,
}

/// Arguments for the `resolve` command
#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// Profile name, connection URL, or nothing for the current environment
    #[arg(env = "DATABASE_URL")]
    pub descriptor: Option<String>,

    /// Print the configuration re-encoded as a URL
    #[arg(long, conflicts_with = "json")]
    pub url: bool,

    /// Print the configuration as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `check` command
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Profile name, connection URL, or nothing for the current environment
    #[arg(env = "DATABASE_URL")]
    pub descriptor: Option<String>,

    /// Connection name to register the handle under
    #[arg(short, long, default_value = "primary")]
    pub name: String,
}
