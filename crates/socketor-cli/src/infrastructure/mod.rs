//! Infrastructure layer for socketor-cli.
//!
//! # Responsibilities
//!
//! - Reading and writing the TOML config file
//! - Reading envelope lines from stdin or a file
//! - Writing rendered message lines to stdout
//!
//! # What does NOT belong here?
//!
//! - Envelope translation and history bounds (that is `socketor-core`)
//! - Session lifecycle rules (that is the application layer)

pub mod console;
pub mod envelope_source;
pub mod storage;

pub use console::ConsoleSink;
pub use envelope_source::JsonLinesSource;
