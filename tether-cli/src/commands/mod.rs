//! CLI command implementations.

pub mod adapters;
pub mod check;
pub mod profiles;
pub mod resolve;
pub mod version;
