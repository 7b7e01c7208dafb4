//! Backend message envelopes and their translation into display items.
//!
//! The transport layer reports traffic as small JSON records:
//!
//! ```json
//! {"content":"hello","msg_type":"Receive"}
//! ```
//!
//! [`translate`] turns each one into a [`MessageItem`] for the message list.
//! The direction string must be exactly `Send`, `Receive` or `Log`; anything
//! else is rejected with [`EnvelopeError::InvalidMessageType`].  There is no
//! fallback classification.  A rejected envelope only loses that one line;
//! the session carries on.
//!
//! # Timestamps
//!
//! Envelopes carry no time of their own.  The item is stamped when it is
//! translated, so a list of items reflects the order in which envelopes
//! reached the translator, which is not necessarily the order in which the
//! peer sent them.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ── Errors ────────────────────────────────────────────────────────────────────

/// Errors raised while reading or translating a single envelope.
#[derive(Debug, Error)]
pub enum EnvelopeError {
    /// `msg_type` is not one of `Send`, `Receive`, `Log`.
    #[error("invalid message type `{0}`")]
    InvalidMessageType(String),

    /// The line is not a JSON envelope.
    #[error("malformed envelope: {0}")]
    Malformed(#[from] serde_json::Error),
}

// ── Wire records ──────────────────────────────────────────────────────────────

/// One line of traffic as reported by the transport layer.
///
/// `msg_type` stays a raw string so an unexpected value reaches
/// [`translate`] and is reported as [`EnvelopeError::InvalidMessageType`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendMessageEnvelope {
    pub content: String,
    pub msg_type: String,
}

impl BackendMessageEnvelope {
    pub fn new(content: impl Into<String>, msg_type: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            msg_type: msg_type.into(),
        }
    }

    /// Parses a single JSON line.
    ///
    /// # Errors
    ///
    /// Returns [`EnvelopeError::Malformed`] when the line is not a JSON object
    /// with string `content` and `msg_type` fields.
    pub fn from_json(line: &str) -> Result<Self, EnvelopeError> {
        Ok(serde_json::from_str(line)?)
    }
}

/// Direction of a display item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OwnerType {
    Receive,
    Send,
    Log,
}

impl OwnerType {
    /// Maps the envelope's direction string.  Exact, case-sensitive match.
    ///
    /// # Errors
    ///
    /// Returns [`EnvelopeError::InvalidMessageType`] for any other string.
    pub fn from_msg_type(msg_type: &str) -> Result<Self, EnvelopeError> {
        match msg_type {
            "Send" => Ok(OwnerType::Send),
            "Receive" => Ok(OwnerType::Receive),
            "Log" => Ok(OwnerType::Log),
            other => Err(EnvelopeError::InvalidMessageType(other.to_string())),
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            OwnerType::Receive => "receive",
            OwnerType::Send => "send",
            OwnerType::Log => "log",
        }
    }
}

/// Lightweight display record: text content plus its direction.
///
/// Unlike [`MessageData`](crate::MessageData) it carries no binary payload
/// and no content classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageItem {
    pub time: DateTime<Local>,
    pub content: String,
    pub owner_type: OwnerType,
}

impl MessageItem {
    /// Creates an item stamped with the current local time.
    pub fn new(content: impl Into<String>, owner_type: OwnerType) -> Self {
        Self {
            time: Local::now(),
            content: content.into(),
            owner_type,
        }
    }
}

/// Session-level outcome reported by the transport layer.
///
/// The `error_message` is meant for the user and is passed through untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionResult {
    pub success: bool,
    #[serde(default)]
    pub error_message: String,
}

impl ActionResult {
    pub fn ok() -> Self {
        Self {
            success: true,
            error_message: String::new(),
        }
    }

    pub fn failure(error_message: impl Into<String>) -> Self {
        Self {
            success: false,
            error_message: error_message.into(),
        }
    }

    /// Converts into a `Result`, handing back the transport's message on failure.
    pub fn into_result(self) -> Result<(), String> {
        if self.success {
            Ok(())
        } else {
            Err(self.error_message)
        }
    }
}

// ── Translation ───────────────────────────────────────────────────────────────

/// Translates an envelope into a display item stamped with the current time.
///
/// # Errors
///
/// Returns [`EnvelopeError::InvalidMessageType`] if `msg_type` is not one of
/// `Send`, `Receive`, `Log`.
///
/// # Example
///
/// ```rust
/// use socketor_core::{translate, BackendMessageEnvelope, OwnerType};
///
/// let item = translate(&BackendMessageEnvelope::new("hello", "Receive")).unwrap();
/// assert_eq!(item.owner_type, OwnerType::Receive);
/// assert_eq!(item.content, "hello");
///
/// assert!(translate(&BackendMessageEnvelope::new("x", "Ping")).is_err());
/// ```
pub fn translate(envelope: &BackendMessageEnvelope) -> Result<MessageItem, EnvelopeError> {
    translate_at(envelope, Local::now())
}

/// Translates an envelope, stamping it with `time`.
///
/// # Errors
///
/// Same as [`translate`].
pub fn translate_at(
    envelope: &BackendMessageEnvelope,
    time: DateTime<Local>,
) -> Result<MessageItem, EnvelopeError> {
    let owner_type = OwnerType::from_msg_type(&envelope.msg_type)?;
    Ok(MessageItem {
        time,
        content: envelope.content.clone(),
        owner_type,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_translate_maps_all_known_types() {
        let cases = [
            ("Send", OwnerType::Send),
            ("Receive", OwnerType::Receive),
            ("Log", OwnerType::Log),
        ];
        for (msg_type, expected) in cases {
            let item = translate(&BackendMessageEnvelope::new("c", msg_type)).unwrap();
            assert_eq!(item.owner_type, expected, "msg_type {msg_type}");
        }
    }

    #[test]
    fn test_translate_receive_stamps_time_at_or_after_call() {
        // Arrange
        let envelope = BackendMessageEnvelope::new("hello", "Receive");
        let before = Local::now();

        // Act
        let item = translate(&envelope).unwrap();

        // Assert
        assert_eq!(item.content, "hello");
        assert_eq!(item.owner_type, OwnerType::Receive);
        assert!(item.time >= before);
    }

    #[test]
    fn test_translate_unknown_type_fails() {
        let err = translate(&BackendMessageEnvelope::new("x", "Ping")).unwrap_err();
        assert!(matches!(err, EnvelopeError::InvalidMessageType(t) if t == "Ping"));
    }

    #[test]
    fn test_translate_is_case_sensitive() {
        for msg_type in ["send", "RECEIVE", "log", " Log", ""] {
            assert!(
                translate(&BackendMessageEnvelope::new("x", msg_type)).is_err(),
                "`{msg_type}` must be rejected"
            );
        }
    }

    #[test]
    fn test_translate_at_uses_given_time() {
        let time = Local.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let item = translate_at(&BackendMessageEnvelope::new("x", "Log"), time).unwrap();
        assert_eq!(item.time, time);
    }

    #[test]
    fn test_envelope_reads_backend_json_names() {
        let envelope =
            BackendMessageEnvelope::from_json(r#"{"content":"ping","msg_type":"Send"}"#).unwrap();
        assert_eq!(envelope, BackendMessageEnvelope::new("ping", "Send"));
    }

    #[test]
    fn test_envelope_with_unknown_type_still_parses() {
        // Rejection is the translator's job, not the parser's.
        let envelope =
            BackendMessageEnvelope::from_json(r#"{"content":"x","msg_type":"Ping"}"#).unwrap();
        assert_eq!(envelope.msg_type, "Ping");
    }

    #[test]
    fn test_envelope_missing_field_is_malformed() {
        let err = BackendMessageEnvelope::from_json(r#"{"content":"x"}"#).unwrap_err();
        assert!(matches!(err, EnvelopeError::Malformed(_)));
    }

    #[test]
    fn test_action_result_json_names() {
        let failed: ActionResult =
            serde_json::from_str(r#"{"success":false,"error_message":"port in use"}"#).unwrap();
        assert_eq!(failed, ActionResult::failure("port in use"));

        let ok: ActionResult = serde_json::from_str(r#"{"success":true}"#).unwrap();
        assert_eq!(ok, ActionResult::ok());
    }

    #[test]
    fn test_action_result_into_result_passes_message_through() {
        assert_eq!(ActionResult::ok().into_result(), Ok(()));
        assert_eq!(
            ActionResult::failure("connection refused").into_result(),
            Err("connection refused".to_string())
        );
    }
}
