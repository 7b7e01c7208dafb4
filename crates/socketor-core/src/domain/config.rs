//! Connection profiles: how to reach a peer, and how to show its traffic.
//!
//! A connection is always exactly one of five kinds.  Rather than five
//! unrelated structs that each carry a free-form `connection_type` string,
//! the kinds form a closed Rust enum, [`ConnectionConfig`].  Every consumer
//! that switches on the kind must use a `match`, and the compiler rejects a
//! `match` that forgets one of the five arms.
//!
//! # Serialized form
//!
//! Profiles are stored and exchanged as a single record with a
//! `connection_type` discriminant next to the variant's own fields:
//!
//! ```json
//! {
//!   "connection_type": "TcpClientConfig",
//!   "host": "127.0.0.1",
//!   "port": 8081,
//!   "message_box": { "max_entries": 1000, "show_as_hex": false, "auto_wrap": false },
//!   "send_box": { "send_as_hex": false, "line_ending": "none", "clear_after_send": false }
//! }
//! ```
//!
//! The tag strings are owned by [`ConnectionKind`], not derived from any Rust
//! type name, so renaming a struct never changes the stored format.
//!
//! # Defaults
//!
//! | Kind              | Default endpoint             |
//! |-------------------|------------------------------|
//! | TCP client        | `127.0.0.1:8081`             |
//! | UDP client        | target `127.0.0.1:8082`      |
//! | WebSocket client  | `ws://localhost:5000/chat`   |
//! | TCP server        | `127.0.0.1:8081`             |
//! | WebSocket server  | `127.0.0.1:8080`             |

use std::fmt;
use std::num::NonZeroUsize;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Default number of messages kept per connection.
pub const DEFAULT_MAX_ENTRIES: NonZeroUsize = match NonZeroUsize::new(1000) {
    Some(n) => n,
    None => panic!("default history bound must be non-zero"),
};

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_TCP_CLIENT_PORT: u16 = 8081;
const DEFAULT_UDP_TARGET_PORT: u16 = 8082;
const DEFAULT_WEBSOCKET_ADDRESS: &str = "ws://localhost:5000/chat";
const DEFAULT_TCP_SERVER_PORT: u16 = 8081;
const DEFAULT_WEBSOCKET_SERVER_PORT: u16 = 8080;

// ── Errors ────────────────────────────────────────────────────────────────────

/// Errors raised while building, parsing or validating a connection profile.
///
/// All of these are local and deterministic: the same input always fails the
/// same way, so callers report them instead of retrying.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The `connection_type` tag names none of the five known kinds.
    #[error("unknown connection type `{0}`")]
    InvalidConnectionVariant(String),

    /// The record carries no `connection_type` tag at all.
    #[error("connection record has no `connection_type` field")]
    MissingConnectionType,

    /// A field holds a value the transport could never use.
    #[error("invalid value for `{field}`: {reason}")]
    InvalidField {
        field: &'static str,
        reason: String,
    },

    /// The record is not valid JSON or its fields have the wrong shape.
    #[error("malformed connection record: {0}")]
    Malformed(#[from] serde_json::Error),
}

// ── Connection kind ───────────────────────────────────────────────────────────

/// The explicit tag of a [`ConnectionConfig`] variant.
///
/// `ConnectionKind` is what a user picks ("open a UDP client") before any
/// fields exist.  [`ConnectionConfig::with_defaults`] turns it into a full
/// profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionKind {
    TcpClient,
    UdpClient,
    WebSocketClient,
    TcpServer,
    WebSocketServer,
}

impl ConnectionKind {
    /// All five kinds, in menu order.
    pub const ALL: [ConnectionKind; 5] = [
        ConnectionKind::TcpClient,
        ConnectionKind::UdpClient,
        ConnectionKind::WebSocketClient,
        ConnectionKind::TcpServer,
        ConnectionKind::WebSocketServer,
    ];

    /// The `connection_type` discriminant written to stored records.
    pub const fn tag(self) -> &'static str {
        match self {
            ConnectionKind::TcpClient => "TcpClientConfig",
            ConnectionKind::UdpClient => "UdpClientConfig",
            ConnectionKind::WebSocketClient => "WebSocketClientConfig",
            ConnectionKind::TcpServer => "TcpServerConfig",
            ConnectionKind::WebSocketServer => "WebSocketServerConfig",
        }
    }

    /// Short command-line spelling, e.g. `tcp-client`.
    pub const fn short_name(self) -> &'static str {
        match self {
            ConnectionKind::TcpClient => "tcp-client",
            ConnectionKind::UdpClient => "udp-client",
            ConnectionKind::WebSocketClient => "ws-client",
            ConnectionKind::TcpServer => "tcp-server",
            ConnectionKind::WebSocketServer => "ws-server",
        }
    }

    /// `true` for the two listening kinds.
    pub const fn is_server(self) -> bool {
        matches!(
            self,
            ConnectionKind::TcpServer | ConnectionKind::WebSocketServer
        )
    }

    /// Looks up a kind by its exact stored tag.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidConnectionVariant`] for any string that
    /// is not one of the five tags.  Matching is case-sensitive.
    pub fn from_tag(tag: &str) -> Result<Self, ConfigError> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.tag() == tag)
            .ok_or_else(|| ConfigError::InvalidConnectionVariant(tag.to_string()))
    }
}

impl fmt::Display for ConnectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for ConnectionKind {
    type Err = ConfigError;

    /// Accepts either the stored tag (`TcpClientConfig`) or the short name
    /// (`tcp-client`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.tag() == s || kind.short_name() == s)
            .ok_or_else(|| ConfigError::InvalidConnectionVariant(s.to_string()))
    }
}

// ── Sub-policies ──────────────────────────────────────────────────────────────

/// Display preferences for the received/sent message list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MessageBoxConfig {
    /// Upper bound on retained messages.  Oldest messages are evicted first.
    ///
    /// `NonZeroUsize` makes a zero bound unrepresentable: a stored `0` fails
    /// to deserialize instead of producing a history that can hold nothing.
    pub max_entries: NonZeroUsize,
    /// Show payloads as hex pairs instead of text.
    pub show_as_hex: bool,
    /// Wrap long lines instead of letting them run off the edge.
    pub auto_wrap: bool,
}

impl Default for MessageBoxConfig {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_MAX_ENTRIES,
            show_as_hex: false,
            auto_wrap: false,
        }
    }
}

/// Line terminator appended to every outgoing message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineEnding {
    #[default]
    None,
    Lf,
    CrLf,
}

impl LineEnding {
    pub const fn as_bytes(self) -> &'static [u8] {
        match self {
            LineEnding::None => b"",
            LineEnding::Lf => b"\n",
            LineEnding::CrLf => b"\r\n",
        }
    }
}

/// Preferences for the outgoing message editor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SendBoxConfig {
    /// Interpret typed input as hex pairs (`48 65 6C 6C 6F`) rather than text.
    pub send_as_hex: bool,
    /// Terminator appended after the encoded input.
    pub line_ending: LineEnding,
    /// Empty the editor after a successful send.
    pub clear_after_send: bool,
}

// ── Variant payloads ──────────────────────────────────────────────────────────

/// Connect to a TCP server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TcpClientConfig {
    pub host: String,
    pub port: u16,
    pub message_box: MessageBoxConfig,
    pub send_box: SendBoxConfig,
}

impl Default for TcpClientConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_TCP_CLIENT_PORT,
            message_box: MessageBoxConfig::default(),
            send_box: SendBoxConfig::default(),
        }
    }
}

/// Send datagrams to a UDP peer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UdpClientConfig {
    /// Local port to bind.  `None` lets the operating system pick one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_port: Option<u16>,
    pub target_host: String,
    pub target_port: u16,
    pub message_box: MessageBoxConfig,
    pub send_box: SendBoxConfig,
}

impl Default for UdpClientConfig {
    fn default() -> Self {
        Self {
            local_port: None,
            target_host: DEFAULT_HOST.to_string(),
            target_port: DEFAULT_UDP_TARGET_PORT,
            message_box: MessageBoxConfig::default(),
            send_box: SendBoxConfig::default(),
        }
    }
}

/// Connect to a WebSocket endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WebSocketClientConfig {
    /// Full `ws://` or `wss://` URL including the path.
    pub address: String,
    pub message_box: MessageBoxConfig,
    pub send_box: SendBoxConfig,
}

impl Default for WebSocketClientConfig {
    fn default() -> Self {
        Self {
            address: DEFAULT_WEBSOCKET_ADDRESS.to_string(),
            message_box: MessageBoxConfig::default(),
            send_box: SendBoxConfig::default(),
        }
    }
}

/// Listen for TCP clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TcpServerConfig {
    pub host: String,
    /// `0` asks the operating system for an ephemeral port.
    pub port: u16,
    /// Identifier of the running server instance; empty until one is started.
    pub server_id: String,
    pub message_box: MessageBoxConfig,
    pub send_box: SendBoxConfig,
}

impl Default for TcpServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_TCP_SERVER_PORT,
            server_id: String::new(),
            message_box: MessageBoxConfig::default(),
            send_box: SendBoxConfig::default(),
        }
    }
}

/// Listen for WebSocket clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WebSocketServerConfig {
    pub host: String,
    pub port: u16,
    pub message_box: MessageBoxConfig,
    pub send_box: SendBoxConfig,
}

impl Default for WebSocketServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_WEBSOCKET_SERVER_PORT,
            message_box: MessageBoxConfig::default(),
            send_box: SendBoxConfig::default(),
        }
    }
}

// ── The closed variant set ────────────────────────────────────────────────────

/// A complete connection profile: exactly one of five transport kinds.
///
/// `#[serde(tag = "connection_type")]` stores the variant as a discriminant
/// field inside the same record.  Every variant struct denies unknown
/// fields, so a record carrying another kind's fields (or a misspelled key)
/// fails to load instead of quietly falling back to defaults.
///
/// The serde renames below must stay equal to [`ConnectionKind::tag`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "connection_type")]
pub enum ConnectionConfig {
    #[serde(rename = "TcpClientConfig")]
    TcpClient(TcpClientConfig),
    #[serde(rename = "UdpClientConfig")]
    UdpClient(UdpClientConfig),
    #[serde(rename = "WebSocketClientConfig")]
    WebSocketClient(WebSocketClientConfig),
    #[serde(rename = "TcpServerConfig")]
    TcpServer(TcpServerConfig),
    #[serde(rename = "WebSocketServerConfig")]
    WebSocketServer(WebSocketServerConfig),
}

impl ConnectionConfig {
    /// Builds the profile for `kind` with that kind's default endpoint and
    /// default message-box / send-box preferences.
    ///
    /// # Example
    ///
    /// ```rust
    /// use socketor_core::{ConnectionConfig, ConnectionKind};
    ///
    /// let cfg = ConnectionConfig::with_defaults(ConnectionKind::UdpClient);
    /// assert_eq!(cfg.kind(), ConnectionKind::UdpClient);
    /// assert_eq!(cfg.endpoint(), "127.0.0.1:8082");
    /// ```
    pub fn with_defaults(kind: ConnectionKind) -> Self {
        match kind {
            ConnectionKind::TcpClient => Self::TcpClient(TcpClientConfig::default()),
            ConnectionKind::UdpClient => Self::UdpClient(UdpClientConfig::default()),
            ConnectionKind::WebSocketClient => {
                Self::WebSocketClient(WebSocketClientConfig::default())
            }
            ConnectionKind::TcpServer => Self::TcpServer(TcpServerConfig::default()),
            ConnectionKind::WebSocketServer => {
                Self::WebSocketServer(WebSocketServerConfig::default())
            }
        }
    }

    /// The tag of the active variant.
    pub fn kind(&self) -> ConnectionKind {
        match self {
            Self::TcpClient(_) => ConnectionKind::TcpClient,
            Self::UdpClient(_) => ConnectionKind::UdpClient,
            Self::WebSocketClient(_) => ConnectionKind::WebSocketClient,
            Self::TcpServer(_) => ConnectionKind::TcpServer,
            Self::WebSocketServer(_) => ConnectionKind::WebSocketServer,
        }
    }

    pub fn message_box(&self) -> &MessageBoxConfig {
        match self {
            Self::TcpClient(c) => &c.message_box,
            Self::UdpClient(c) => &c.message_box,
            Self::WebSocketClient(c) => &c.message_box,
            Self::TcpServer(c) => &c.message_box,
            Self::WebSocketServer(c) => &c.message_box,
        }
    }

    pub fn message_box_mut(&mut self) -> &mut MessageBoxConfig {
        match self {
            Self::TcpClient(c) => &mut c.message_box,
            Self::UdpClient(c) => &mut c.message_box,
            Self::WebSocketClient(c) => &mut c.message_box,
            Self::TcpServer(c) => &mut c.message_box,
            Self::WebSocketServer(c) => &mut c.message_box,
        }
    }

    pub fn send_box(&self) -> &SendBoxConfig {
        match self {
            Self::TcpClient(c) => &c.send_box,
            Self::UdpClient(c) => &c.send_box,
            Self::WebSocketClient(c) => &c.send_box,
            Self::TcpServer(c) => &c.send_box,
            Self::WebSocketServer(c) => &c.send_box,
        }
    }

    pub fn send_box_mut(&mut self) -> &mut SendBoxConfig {
        match self {
            Self::TcpClient(c) => &mut c.send_box,
            Self::UdpClient(c) => &mut c.send_box,
            Self::WebSocketClient(c) => &mut c.send_box,
            Self::TcpServer(c) => &mut c.send_box,
            Self::WebSocketServer(c) => &mut c.send_box,
        }
    }

    /// Human-readable peer or bind address, used in listings and logs.
    pub fn endpoint(&self) -> String {
        match self {
            Self::TcpClient(c) => format!("{}:{}", c.host, c.port),
            Self::UdpClient(c) => format!("{}:{}", c.target_host, c.target_port),
            Self::WebSocketClient(c) => c.address.clone(),
            Self::TcpServer(c) => format!("{}:{}", c.host, c.port),
            Self::WebSocketServer(c) => format!("{}:{}", c.host, c.port),
        }
    }

    /// Parses a stored JSON record.
    ///
    /// The `connection_type` tag is checked before the fields are decoded, so
    /// an unknown kind is always reported as such and never mistaken for a
    /// shape error or silently replaced with a default.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::MissingConnectionType`] when there is no tag.
    /// - [`ConfigError::InvalidConnectionVariant`] for an unknown tag.
    /// - [`ConfigError::Malformed`] for invalid JSON or mistyped fields.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        let tag = value
            .get("connection_type")
            .ok_or(ConfigError::MissingConnectionType)?;
        let tag = tag
            .as_str()
            .ok_or_else(|| ConfigError::InvalidConnectionVariant(tag.to_string()))?;
        ConnectionKind::from_tag(tag)?;
        Ok(serde_json::from_value(value)?)
    }

    /// Checks that every field holds a value the transport layer can use.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidField`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            Self::TcpClient(c) => {
                require_host("host", &c.host)?;
                require_port("port", c.port)
            }
            Self::UdpClient(c) => {
                require_host("target_host", &c.target_host)?;
                require_port("target_port", c.target_port)
            }
            Self::WebSocketClient(c) => validate_websocket_address(&c.address),
            Self::TcpServer(c) => require_host("host", &c.host),
            Self::WebSocketServer(c) => require_host("host", &c.host),
        }
    }
}

fn require_host(field: &'static str, host: &str) -> Result<(), ConfigError> {
    if host.trim().is_empty() {
        return Err(ConfigError::InvalidField {
            field,
            reason: "host must not be empty".to_string(),
        });
    }
    Ok(())
}

fn require_port(field: &'static str, port: u16) -> Result<(), ConfigError> {
    if port == 0 {
        return Err(ConfigError::InvalidField {
            field,
            reason: "a peer port must be between 1 and 65535".to_string(),
        });
    }
    Ok(())
}

fn validate_websocket_address(address: &str) -> Result<(), ConfigError> {
    let url = Url::parse(address).map_err(|e| ConfigError::InvalidField {
        field: "address",
        reason: e.to_string(),
    })?;
    if url.scheme() != "ws" && url.scheme() != "wss" {
        return Err(ConfigError::InvalidField {
            field: "address",
            reason: format!("scheme must be ws or wss, got {}", url.scheme()),
        });
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(ConfigError::InvalidField {
            field: "address",
            reason: "address has no host".to_string(),
        });
    }
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
