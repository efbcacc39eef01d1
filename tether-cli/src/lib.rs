//! Tether CLI - Command-line interface for Tether connection resolution.
//!
//! This crate provides the `tether` tool for inspecting how descriptors
//! resolve against a settings file and for checking that a connection opens.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;
