//! Fuzz target for the connection URL decoder.
//!
//! Arbitrary strings are decoded, and anything that decodes to a usable
//! configuration is re-encoded and decoded again.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_url_decoder
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;
use tether_connect::{ConnectionConfig, decode_url, keys};

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };

    // The decoder should never panic, only return errors
    let Ok(raw) = decode_url(input) else {
        return;
    };
    assert!(raw.contains_key(keys::ADAPTER));

    let Ok(config) = ConnectionConfig::from_raw(raw) else {
        return;
    };
    if let Ok(reencoded) = config.to_url() {
        let _ = decode_url(&reencoded);
    }
});
