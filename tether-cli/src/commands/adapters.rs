//! `tether adapters` command - List registered adapters.

use crate::error::CliResult;
use crate::output::{self, warn};

/// Run the adapters command
pub fn run() -> CliResult<()> {
    output::header("Adapters");

    let loader = tether::adapter_loader();
    if loader.is_empty() {
        warn("No adapters compiled into this binary");
        return Ok(());
    }

    for adapter in loader.adapters() {
        output::list_item(adapter);
    }

    Ok(())
}
