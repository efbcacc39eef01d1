//! Scalar configuration values.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single configuration value.
///
/// Settings files and URL query strings only ever produce scalars, so nested
/// tables and arrays are not representable.
///
/// ```rust
/// use tether_config::Value;
///
/// let port: Value = 5432.into();
/// assert_eq!(port.as_integer(), Some(5432));
///
/// let host: Value = "localhost".into();
/// assert_eq!(host.as_str(), Some("localhost"));
/// assert_eq!(host.to_string(), "localhost");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Boolean flag.
    Boolean(bool),
    /// Signed integer.
    Integer(i64),
    /// Floating point number.
    Float(f64),
    /// Text.
    String(String),
}

impl Value {
    /// Get the value as a string slice, if it is text.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get the value as an integer, if it is one.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Get the value as a boolean, if it is one.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Interpret the value as a flag.
    ///
    /// Accepts real booleans, `0`/`1` integers and the usual textual spellings,
    /// since query-string values always arrive as text.
    pub fn to_flag(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            Self::Integer(0) => Some(false),
            Self::Integer(1) => Some(true),
            Self::String(s) => match s.to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" | "on" => Some(true),
                "false" | "0" | "no" | "off" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }

    /// Interpret the value as an integer, parsing text if necessary.
    pub fn to_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            Self::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Name of the value's type, for diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Boolean(_) => "boolean",
            Self::Integer(_) => "integer",
            Self::Float(_) => "float",
            Self::String(_) => "string",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boolean(b) => write!(f, "{}", b),
            Self::Integer(i) => write!(f, "{}", i),
            Self::Float(x) => write!(f, "{}", x),
            Self::String(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<&String> for Value {
    fn from(s: &String) -> Self {
        Self::String(s.clone())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Self::Integer(i64::from(i))
    }
}

impl From<u16> for Value {
    fn from(i: u16) -> Self {
        Self::Integer(i64::from(i))
    }
}

impl From<u32> for Value {
    fn from(i: u32) -> Self {
        Self::Integer(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Value::from("db").to_string(), "db");
        assert_eq!(Value::from(5432).to_string(), "5432");
        assert_eq!(Value::from(true).to_string(), "true");
        assert_eq!(Value::from(1.5).to_string(), "1.5");
    }

    #[test]
    fn test_to_integer_parses_text() {
        assert_eq!(Value::from("30").to_integer(), Some(30));
        assert_eq!(Value::from(30).to_integer(), Some(30));
        assert_eq!(Value::from("thirty").to_integer(), None);
        assert_eq!(Value::from(true).to_integer(), None);
    }

    #[test]
    fn test_to_flag() {
        assert_eq!(Value::from("true").to_flag(), Some(true));
        assert_eq!(Value::from("0").to_flag(), Some(false));
        assert_eq!(Value::from(1).to_flag(), Some(true));
        assert_eq!(Value::from(false).to_flag(), Some(false));
        assert_eq!(Value::from("maybe").to_flag(), None);
    }

    #[test]
    fn test_untagged_serde() {
        let value: Value = serde_json::from_str("5").unwrap();
        assert_eq!(value, Value::Integer(5));

        let value: Value = serde_json::from_str("\"5\"").unwrap();
        assert_eq!(value, Value::String("5".into()));

        assert_eq!(serde_json::to_string(&Value::from(false)).unwrap(), "false");
    }
}
