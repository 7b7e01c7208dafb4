//! socketor-cli library crate.
//!
//! Everything the `socketor` binary does lives here so integration tests can
//! drive it without spawning a process.
//!
//! # Architecture (clean architecture)
//!
//! ```text
//! stdin / file (JSON envelope lines)
//!         ↓
//! [socketor-cli]
//!   ├── application/      Sessions, the single-writer history task,
//!   │                     replay pump, rendering, profile building
//!   └── infrastructure/
//!         ├── storage/    TOML config file (profiles, locale, log level)
//!         ├── envelope_source  JSON-lines reader
//!         └── console     stdout sink
//!         ↓
//! stdout (rendered message lines)
//! ```
//!
//! # Layer rules
//!
//! - `application` depends on `socketor-core` and on the traits it declares
//!   itself (`EnvelopeSource`, `MessageSink`); it never touches files or
//!   standard streams.
//! - `infrastructure` implements those traits and owns all I/O.

pub mod application;
pub mod infrastructure;
