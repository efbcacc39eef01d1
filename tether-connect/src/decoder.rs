//! Connection URL decoding.
//!
//! A URL of the form `scheme://[user[:pass]@]host[:port]/path[?k=v&...]`
//! is flattened into a [`RawConfig`]:
//!
//! | URL part | Key | Notes |
//! |----------|-----|-------|
//! | scheme | `adapter` | `postgres` becomes `postgresql` |
//! | user | `username` | percent-decoded |
//! | password | `password` | percent-decoded |
//! | port | `port` | integer |
//! | path | `database` | one leading `/` removed, percent-decoded |
//! | host | `host` | |
//! | query | any | percent-decoded (`+` kept), merged in order, last wins |
//!
//! Parts that are absent or empty produce no key at all.

use percent_encoding::percent_decode_str;
use tether_config::RawConfig;
use tracing::debug;
use url::Url;

use crate::config::keys;
use crate::error::{ConnectionError, ConnectionResult};

/// Decode a connection URL into a flat configuration map.
///
/// # Examples
///
/// ```rust
/// use tether_connect::decode_url;
///
/// let raw = decode_url("postgres://u:p@localhost/db?pool=5").unwrap();
/// assert_eq!(raw.get_str("adapter"), Some("postgresql"));
/// assert_eq!(raw.get_str("username"), Some("u"));
/// assert_eq!(raw.get_str("database"), Some("db"));
/// assert_eq!(raw.get_str("pool"), Some("5"));
/// assert!(raw.get("port").is_none());
/// ```
pub fn decode_url(input: &str) -> ConnectionResult<RawConfig> {
    debug!(url_len = input.len(), "decode_url()");
    let url = parse(input)?;

    let mut raw = RawConfig::new().with(keys::ADAPTER, adapter_for_scheme(url.scheme()));

    if !url.username().is_empty() {
        raw.insert(keys::USERNAME, decode_component(url.username()));
    }
    if let Some(password) = url.password().filter(|p| !p.is_empty()) {
        raw.insert(keys::PASSWORD, decode_component(password));
    }
    if let Some(port) = url.port() {
        raw.insert(keys::PORT, port);
    }

    let path = url.path();
    let database = path.strip_prefix('/').unwrap_or(path);
    if !database.is_empty() {
        raw.insert(keys::DATABASE, decode_component(database));
    }

    if let Some(host) = url.host_str().filter(|h| !h.is_empty()) {
        raw.insert(keys::HOST, host);
    }

    if let Some(query) = url.query() {
        raw.extend(query_pairs(query));
    }

    debug!(
        adapter = raw.get_str(keys::ADAPTER).unwrap_or_default(),
        host = ?raw.get_str(keys::HOST),
        database = ?raw.get_str(keys::DATABASE),
        "Connection URL decoded"
    );
    Ok(raw)
}

/// Check whether a string can be interpreted as a URL at all.
pub fn is_url(input: &str) -> bool {
    Url::parse(input.trim()).is_ok()
}

/// Map a URL scheme to an adapter identifier.
pub fn adapter_for_scheme(scheme: &str) -> &str {
    match scheme {
        "postgres" => "postgresql",
        other => other,
    }
}

fn parse(input: &str) -> ConnectionResult<Url> {
    Url::parse(input.trim()).map_err(|source| ConnectionError::MalformedUrl {
        url: input.to_string(),
        source,
    })
}

/// `&`-separated `key=value` pairs, split on the first `=`.
///
/// Only percent-escapes are decoded; a `+` stays a `+`.
fn query_pairs(query: &str) -> impl Iterator<Item = (String, String)> + '_ {
    query.split('&').filter(|pair| !pair.is_empty()).map(|pair| {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        (decode_component(key), decode_component(value))
    })
}

fn decode_component(s: &str) -> String {
    percent_decode_str(s).decode_utf8_lossy().into_owned()
}
