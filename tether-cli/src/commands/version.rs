//! `tether version` command - Display version information.

use crate::error::CliResult;
use crate::output::{self, kv};

/// Package version
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Package name
const NAME: &str = env!("CARGO_PKG_NAME");

/// Run the version command
pub fn run() -> CliResult<()> {
    output::header("Tether");

    kv("Version", VERSION);
    kv("Binary", NAME);

    #[cfg(debug_assertions)]
    let build_mode = "debug";
    #[cfg(not(debug_assertions))]
    let build_mode = "release";

    kv("Build", build_mode);

    #[allow(unused_mut)]
    let mut features: Vec<&str> = Vec::new();

    #[cfg(feature = "sqlite")]
    features.push("sqlite");

    if features.is_empty() {
        features.push("none");
    }

    kv("Adapters", &features.join(", "));

    output::newline();
    output::section("Components");
    kv("tether-config", VERSION);
    kv("tether-connect", VERSION);

    Ok(())
}
