//! # socketor-core
//!
//! Shared data model for Socketor, a socket testing utility that opens TCP,
//! UDP and WebSocket connections (as client or server) and shows the traffic
//! that flows through them.
//!
//! This crate contains no sockets, no file I/O and no async runtime.  It is the
//! contract between the transport layer that moves bytes and the front end
//! that displays them.
//!
//! # Architecture overview
//!
//! - **`domain`** – Connection profiles ([`ConnectionConfig`], a closed set of
//!   five variants), the message model ([`MessageData`]) and the bounded
//!   message history ([`MessageHistory`]).
//!
//! - **`protocol`** – What crosses the boundary with the transport layer:
//!   [`BackendMessageEnvelope`] lines are translated into [`MessageItem`]s,
//!   session outcomes arrive as [`ActionResult`]s, and send-box input is
//!   encoded into payload bytes.
//!
//! - **`locale`** – An explicit [`Locale`] value handed to every formatting
//!   call.  There is no process-wide culture setting.
//!
//! ```text
//! transport ──BackendMessageEnvelope──► translate() ──MessageItem──► MessageHistory
//! transport ◄──────────────ConnectionConfig (chosen by the user)
//! ```

pub mod domain;
pub mod locale;
pub mod protocol;

// Re-export the most-used types at the crate root so callers can write
// `socketor_core::ConnectionConfig` instead of the full module path.
pub use domain::config::{
    ConfigError, ConnectionConfig, ConnectionKind, LineEnding, MessageBoxConfig, SendBoxConfig,
    TcpClientConfig, TcpServerConfig, UdpClientConfig, WebSocketClientConfig,
    WebSocketServerConfig,
};
pub use domain::history::MessageHistory;
pub use domain::message::{ContentType, MessageData, MessageOwner};
pub use locale::{Locale, LocaleError};
pub use protocol::envelope::{
    translate, translate_at, ActionResult, BackendMessageEnvelope, EnvelopeError, MessageItem,
    OwnerType,
};
pub use protocol::payload::{encode_input, render_payload, sniff_content_type, PayloadError};
