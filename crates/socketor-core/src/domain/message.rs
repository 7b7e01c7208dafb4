//! The message model: one unit of socket traffic.
//!
//! A [`MessageData`] records *who* produced the bytes ([`MessageOwner`]),
//! *what kind* of content they hold ([`ContentType`]) and the raw bytes
//! themselves.  The timestamp and owner are fixed when the record is created.
//! The content type can be corrected later (for example when the user marks a
//! payload as an image), and the raw bytes can be replaced (for example after
//! reassembling a fragmented frame).

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::domain::config::MessageBoxConfig;
use crate::protocol::payload::{render_payload, sniff_content_type};

/// Who produced a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageOwner {
    /// Bytes that arrived from the peer.
    Receive,
    /// Bytes this side sent to the peer.
    Send,
    /// Informational line from the tool itself.
    Info,
    /// An error reported by the transport or the tool.
    Error,
    /// A non-fatal problem worth showing.
    Warning,
}

impl MessageOwner {
    /// Lowercase display label, also used as a CSS-style class name by
    /// front ends.
    pub const fn label(self) -> &'static str {
        match self {
            MessageOwner::Receive => "receive",
            MessageOwner::Send => "send",
            MessageOwner::Info => "info",
            MessageOwner::Error => "error",
            MessageOwner::Warning => "warning",
        }
    }
}

/// Coarse classification of a payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContentType {
    #[default]
    Text,
    Binary,
    Image,
    Video,
    Audio,
    File,
}

/// A single message with its raw payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageData {
    time: DateTime<Local>,
    owner: MessageOwner,
    content_type: ContentType,
    raw: Vec<u8>,
}

impl MessageData {
    /// Creates a text message stamped with the current local time.
    pub fn new(owner: MessageOwner, raw: impl Into<Vec<u8>>) -> Self {
        Self::with_content_type(owner, raw, ContentType::Text)
    }

    /// Creates a message with an explicit content type.
    pub fn with_content_type(
        owner: MessageOwner,
        raw: impl Into<Vec<u8>>,
        content_type: ContentType,
    ) -> Self {
        Self {
            time: Local::now(),
            owner,
            content_type,
            raw: raw.into(),
        }
    }

    /// Creates a message whose content type is guessed from the payload.
    ///
    /// See [`sniff_content_type`] for the rules.
    pub fn sniffed(owner: MessageOwner, raw: impl Into<Vec<u8>>) -> Self {
        let raw = raw.into();
        let content_type = sniff_content_type(&raw);
        Self::with_content_type(owner, raw, content_type)
    }

    pub fn time(&self) -> DateTime<Local> {
        self.time
    }

    pub fn owner(&self) -> MessageOwner {
        self.owner
    }

    pub fn content_type(&self) -> ContentType {
        self.content_type
    }

    pub fn raw(&self) -> &[u8] {
        &self.raw
    }

    /// Corrects the classification of this message.
    pub fn set_content_type(&mut self, content_type: ContentType) {
        self.content_type = content_type;
    }

    /// Replaces the payload.  The timestamp and owner are left untouched.
    pub fn set_raw(&mut self, raw: impl Into<Vec<u8>>) {
        self.raw = raw.into();
    }

    /// Renders the payload as the message box is configured to show it.
    pub fn render(&self, message_box: &MessageBoxConfig) -> String {
        render_payload(&self.raw, message_box.show_as_hex)
    }
}
