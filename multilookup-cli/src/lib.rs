//! Configuration and output helpers for the `multilookup` binary.

pub mod config;
pub mod output;

pub use config::{AppConfig, DEFAULT_CONFIG_FILE, LookupConfig};
