//! Fuzz target for the settings file parser.
//!
//! This target feeds arbitrary TOML strings to the profile loader
//! to find crashes and panics.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_config_parser
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;
use tether_config::{ConfigurationRegistry, MapEnvSource};

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        let env = MapEnvSource::new().set("DB_HOST", "localhost");
        // The parser should never panic, only return errors
        let _ = ConfigurationRegistry::from_toml_with(input, &env);
    }
});
