//! Payload encoding for the send box and rendering for the message box.
//!
//! # Send box input
//!
//! What the user types is either text (sent as UTF-8) or hex pairs such as
//! `48 65 6C 6C 6F`.  Hex input may contain spaces and line breaks anywhere;
//! they are stripped before decoding.  The configured line ending is appended
//! after encoding, so `send_as_hex` plus `CrLf` sends the decoded bytes
//! followed by `0D 0A`.
//!
//! # Content sniffing
//!
//! [`sniff_content_type`] guesses a [`ContentType`] from well-known magic
//! numbers.  It is a first guess only; the user can correct it through
//! [`MessageData::set_content_type`](crate::MessageData::set_content_type).

use thiserror::Error;

use crate::domain::config::SendBoxConfig;
use crate::domain::message::ContentType;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PayloadError {
    /// Hex input has an odd number of digits or a non-hex character.
    #[error("invalid hex input: {0}")]
    InvalidHex(String),
}

/// Encodes send-box input into the bytes handed to the transport.
///
/// # Errors
///
/// Returns [`PayloadError::InvalidHex`] in hex mode when the input (after
/// removing spaces, CR and LF) is not an even-length run of hex digits.
///
/// # Example
///
/// ```rust
/// use socketor_core::{encode_input, LineEnding, SendBoxConfig};
///
/// let send_box = SendBoxConfig { send_as_hex: true, line_ending: LineEnding::Lf, ..Default::default() };
/// assert_eq!(encode_input("48 69", &send_box).unwrap(), b"Hi\n");
/// ```
pub fn encode_input(input: &str, send_box: &SendBoxConfig) -> Result<Vec<u8>, PayloadError> {
    let mut bytes = if send_box.send_as_hex {
        let digits: String = input
            .chars()
            .filter(|c| !matches!(c, ' ' | '\r' | '\n'))
            .collect();
        hex::decode(&digits).map_err(|e| PayloadError::InvalidHex(e.to_string()))?
    } else {
        input.as_bytes().to_vec()
    };
    bytes.extend_from_slice(send_box.line_ending.as_bytes());
    Ok(bytes)
}

/// Renders a payload for display: uppercase hex pairs separated by single
/// spaces, or text with invalid UTF-8 sequences replaced by `U+FFFD`.
pub fn render_payload(raw: &[u8], show_as_hex: bool) -> String {
    if show_as_hex {
        let encoded = hex::encode_upper(raw);
        let mut out = String::with_capacity(encoded.len() + encoded.len() / 2);
        for (i, pair) in encoded.as_bytes().chunks(2).enumerate() {
            if i > 0 {
                out.push(' ');
            }
            // hex::encode_upper only emits ASCII digits and letters.
            out.push(pair[0] as char);
            out.push(pair[1] as char);
        }
        out
    } else {
        String::from_utf8_lossy(raw).into_owned()
    }
}

/// Guesses the content type of a payload from its leading bytes.
pub fn sniff_content_type(raw: &[u8]) -> ContentType {
    const IMAGE_MAGIC: &[&[u8]] = &[
        b"\x89PNG\r\n\x1a\n",
        b"\xFF\xD8\xFF",
        b"GIF87a",
        b"GIF89a",
    ];
    const AUDIO_MAGIC: &[&[u8]] = &[b"ID3", b"OggS", b"fLaC"];
    const FILE_MAGIC: &[&[u8]] = &[b"%PDF-", b"PK\x03\x04"];

    let starts_with_any = |magic: &[&[u8]]| magic.iter().any(|m| raw.starts_with(m));

    if raw.len() >= 12 && raw.starts_with(b"RIFF") {
        match &raw[8..12] {
            b"WEBP" => return ContentType::Image,
            b"WAVE" => return ContentType::Audio,
            b"AVI " => return ContentType::Video,
            _ => {}
        }
    }
    if raw.len() >= 8 && &raw[4..8] == b"ftyp" {
        return ContentType::Video;
    }
    if raw.starts_with(b"\x1A\x45\xDF\xA3") {
        return ContentType::Video;
    }
    if starts_with_any(IMAGE_MAGIC) {
        return ContentType::Image;
    }
    if starts_with_any(AUDIO_MAGIC) {
        return ContentType::Audio;
    }
    if starts_with_any(FILE_MAGIC) {
        return ContentType::File;
    }
    match std::str::from_utf8(raw) {
        Ok(text) if !text.chars().any(|c| c.is_control() && !matches!(c, '\t' | '\r' | '\n')) => {
            ContentType::Text
        }
        _ => ContentType::Binary,
    }
}
