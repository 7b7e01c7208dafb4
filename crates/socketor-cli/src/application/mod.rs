//! Application layer for socketor-cli.
//!
//! # Sub-modules
//!
//! - **`session`**  – One connection instance: its profile, its lifecycle
//!   state, and the task that exclusively owns its message history.
//! - **`replay`**   – Pumps envelopes from a source through translation into
//!   the history and out to a display sink.
//! - **`render`**   – Turns a `MessageItem` into display lines for a given
//!   locale and message-box configuration.
//! - **`profiles`** – Builds validated connection profiles from a kind plus
//!   user overrides.

pub mod profiles;
pub mod render;
pub mod replay;
pub mod session;

pub use profiles::{build_profile, ProfileError, ProfileOverrides};
pub use render::Renderer;
pub use replay::{replay, EnvelopeSource, MessageSink, ReplayError, ReplaySummary, SourceError};
pub use session::{
    spawn_history, ConnectionSession, HistoryHandle, HistoryReport, SessionError, SessionState,
};
