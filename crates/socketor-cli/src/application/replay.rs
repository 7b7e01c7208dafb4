//! Envelope pump: source → translate → history + display.
//!
//! [`replay`] drains an [`EnvelopeSource`] for one active session.  Every
//! envelope is translated into a `MessageItem`, shown on a [`MessageSink`],
//! and queued on the session's history task.
//!
//! # Failure policy
//!
//! - A line that is not an envelope, or an envelope whose `msg_type` is
//!   unknown, loses only that line.  It is logged at `warn` and counted in
//!   [`ReplaySummary::rejected`]; the run carries on.
//! - Failing to read the source, or failing to write to the sink, ends the
//!   run with an error: there is nothing sensible left to do.

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, info, warn};

use socketor_core::{translate, BackendMessageEnvelope, EnvelopeError, MessageItem};

use crate::application::session::{ConnectionSession, HistoryHandle, SessionError};

// ── Ports ─────────────────────────────────────────────────────────────────────

/// Error yielded by an [`EnvelopeSource`] for a single item.
#[derive(Debug, Error)]
pub enum SourceError {
    /// One input line could not be decoded.  Recoverable: skip it.
    #[error("line {line}: {source}")]
    Malformed {
        line: u64,
        #[source]
        source: EnvelopeError,
    },

    /// The underlying reader failed.  Not recoverable.
    #[error("failed to read envelopes: {0}")]
    Io(#[from] std::io::Error),
}

/// Supplier of envelopes, in the order the transport produced them.
#[async_trait]
pub trait EnvelopeSource: Send {
    /// Returns the next envelope, or `None` at end of input.
    async fn next_envelope(&mut self) -> Option<Result<BackendMessageEnvelope, SourceError>>;
}

/// Consumer of translated items (a terminal, a UI list, a test recorder).
#[cfg_attr(test, mockall::automock)]
pub trait MessageSink {
    /// Displays one item.
    ///
    /// # Errors
    ///
    /// Returns the I/O error of the underlying output.
    fn show(&mut self, item: &MessageItem) -> std::io::Result<()>;
}

// ── Replay ────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("failed to read envelopes: {0}")]
    Read(#[source] std::io::Error),

    #[error("failed to display message: {0}")]
    Display(#[source] std::io::Error),
}

/// Counts for one replay run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    /// Envelopes translated, shown and queued on the history.
    pub translated: u64,
    /// Lines skipped: malformed JSON or unknown `msg_type`.
    pub rejected: u64,
}

/// Drains `envelopes` into `history` and `sink` for an active `session`.
///
/// # Errors
///
/// - [`ReplayError::Session`] if the session is not `Active`, or if the
///   history task stops mid-run.
/// - [`ReplayError::Read`] if the source's reader fails.
/// - [`ReplayError::Display`] if the sink fails.
pub async fn replay<S, K>(
    envelopes: &mut S,
    session: &ConnectionSession,
    history: &HistoryHandle,
    sink: &mut K,
) -> Result<ReplaySummary, ReplayError>
where
    S: EnvelopeSource + ?Sized,
    K: MessageSink + ?Sized,
{
    session.ensure_active()?;
    let mut summary = ReplaySummary::default();

    while let Some(next) = envelopes.next_envelope().await {
        let envelope = match next {
            Ok(envelope) => envelope,
            Err(SourceError::Malformed { line, source }) => {
                warn!(session = %session.id(), line, "skipping malformed envelope: {source}");
                summary.rejected += 1;
                continue;
            }
            Err(SourceError::Io(e)) => return Err(ReplayError::Read(e)),
        };

        match translate(&envelope) {
            Ok(item) => {
                debug!(
                    session = %session.id(),
                    owner = item.owner_type.label(),
                    bytes = item.content.len(),
                    "message translated"
                );
                sink.show(&item).map_err(ReplayError::Display)?;
                history.append(item).await?;
                summary.translated += 1;
            }
            Err(e) => {
                warn!(session = %session.id(), "rejected envelope: {e}");
                summary.rejected += 1;
            }
        }
    }

    info!(
        session = %session.id(),
        translated = summary.translated,
        rejected = summary.rejected,
        "replay finished"
    );
    Ok(summary)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
