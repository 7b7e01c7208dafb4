//! Storage infrastructure: configuration file persistence.
//!
//! The `config` sub-module reads and writes the TOML file that holds saved
//! connection profiles plus general settings, falling back to defaults when
//! the file does not exist yet (first run).

pub mod config;
