//! Connection sessions and the task that owns their message history.
//!
//! # Session lifecycle
//!
//! ```text
//! Idle ──begin(ActionResult{success: true})──► Active ──close()──► Closed
//!  │  ▲
//!  └──┘ begin(ActionResult{success: false})  (stays Idle, error passed on)
//! ```
//!
//! The profile may be edited only while the session is `Idle`.  Once the
//! transport has accepted it, the profile describes a live connection and is
//! locked.
//!
//! # Single-writer history
//!
//! Messages for one connection can arrive from several tasks at once (a
//! receive loop, a send path, log lines).  The eviction rule of
//! [`MessageHistory`] only holds if appends are applied one at a time, so the
//! history is owned by exactly one Tokio task.  Everyone else holds a
//! cloneable [`HistoryHandle`] and sends commands over an `mpsc` queue:
//!
//! ```text
//! receive task ─┐
//! send path ────┼──► mpsc queue ──► history task (owns MessageHistory)
//! log lines ────┘
//! ```
//!
//! The task ends when the last handle is dropped and returns a
//! [`HistoryReport`] through its `JoinHandle`.

use std::num::NonZeroUsize;

use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

use socketor_core::{ActionResult, ConnectionConfig, ConnectionKind, MessageHistory, MessageItem};

/// Capacity of the command queue in front of the history task.
///
/// Producers wait (asynchronously) when the queue is full, which applies
/// backpressure instead of dropping messages.
const HISTORY_QUEUE_DEPTH: usize = 256;

// ── Errors ────────────────────────────────────────────────────────────────────

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    /// The profile was edited after the session left `Idle`.
    #[error("connection profile is locked while the session is {0:?}")]
    ConfigLocked(SessionState),

    /// `begin` was called on a session that is not `Idle`.
    #[error("cannot start a session that is {0:?}")]
    InvalidTransition(SessionState),

    /// The transport refused to open the session.  The message is the
    /// transport's own, unmodified.
    #[error("transport rejected the session: {0}")]
    TransportRejected(String),

    /// Traffic was offered to a session that is not `Active`.
    #[error("session is {0:?}, not active")]
    NotActive(SessionState),

    /// The history task is gone (it panicked or every receiver was dropped).
    #[error("message history task has stopped")]
    HistoryClosed,
}

// ── Session ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Profile chosen, transport not yet asked to open it.
    Idle,
    /// Transport accepted the profile; traffic may flow.
    Active,
    /// Session ended.  Terminal.
    Closed,
}

/// One connection instance and the profile it owns.
#[derive(Debug)]
pub struct ConnectionSession {
    id: Uuid,
    name: String,
    config: ConnectionConfig,
    state: SessionState,
}

impl ConnectionSession {
    pub fn new(name: impl Into<String>, config: ConnectionConfig) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            config,
            state: SessionState::Idle,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ConnectionKind {
        self.config.kind()
    }

    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Mutable access to the profile.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::ConfigLocked`] unless the session is `Idle`.
    pub fn config_mut(&mut self) -> Result<&mut ConnectionConfig, SessionError> {
        match self.state {
            SessionState::Idle => Ok(&mut self.config),
            other => Err(SessionError::ConfigLocked(other)),
        }
    }

    /// Applies the transport's answer to "open this profile".
    ///
    /// # Errors
    ///
    /// - [`SessionError::InvalidTransition`] if the session is not `Idle`.
    /// - [`SessionError::TransportRejected`] carrying the transport's
    ///   `error_message` when `result.success` is `false`; the session stays
    ///   `Idle` so the profile can be fixed and retried.
    pub fn begin(&mut self, result: ActionResult) -> Result<(), SessionError> {
        if self.state != SessionState::Idle {
            return Err(SessionError::InvalidTransition(self.state));
        }
        match result.into_result() {
            Ok(()) => {
                self.state = SessionState::Active;
                info!(
                    session = %self.id,
                    name = %self.name,
                    kind = %self.config.kind(),
                    endpoint = %self.config.endpoint(),
                    "session active"
                );
                Ok(())
            }
            Err(message) => {
                warn!(session = %self.id, name = %self.name, "transport rejected session: {message}");
                Err(SessionError::TransportRejected(message))
            }
        }
    }

    /// Ends the session.  Calling it again is a no-op.
    pub fn close(&mut self) {
        if self.state != SessionState::Closed {
            info!(session = %self.id, name = %self.name, "session closed");
            self.state = SessionState::Closed;
        }
    }

    /// # Errors
    ///
    /// Returns [`SessionError::NotActive`] unless the session is `Active`.
    pub fn ensure_active(&self) -> Result<(), SessionError> {
        match self.state {
            SessionState::Active => Ok(()),
            other => Err(SessionError::NotActive(other)),
        }
    }
}

// ── History task ──────────────────────────────────────────────────────────────

#[derive(Debug)]
enum HistoryCommand {
    Append(MessageItem),
    Clear,
    Snapshot(oneshot::Sender<Vec<MessageItem>>),
}

/// Sending side of a history task.  Clone it freely; every clone feeds the
/// same queue.
#[derive(Debug, Clone)]
pub struct HistoryHandle {
    tx: mpsc::Sender<HistoryCommand>,
}

impl HistoryHandle {
    /// Queues `item` for appending.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::HistoryClosed`] if the task has stopped.
    pub async fn append(&self, item: MessageItem) -> Result<(), SessionError> {
        self.send(HistoryCommand::Append(item)).await
    }

    /// Queues a clear.  Items queued before it are cleared too.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::HistoryClosed`] if the task has stopped.
    pub async fn clear(&self) -> Result<(), SessionError> {
        self.send(HistoryCommand::Clear).await
    }

    /// Copies the current history, oldest first.  Reflects every command
    /// queued through this handle before the call.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::HistoryClosed`] if the task has stopped.
    pub async fn snapshot(&self) -> Result<Vec<MessageItem>, SessionError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(HistoryCommand::Snapshot(reply_tx)).await?;
        reply_rx.await.map_err(|_| SessionError::HistoryClosed)
    }

    async fn send(&self, command: HistoryCommand) -> Result<(), SessionError> {
        self.tx
            .send(command)
            .await
            .map_err(|_| SessionError::HistoryClosed)
    }
}

/// Final state of a history task, returned when its last handle is dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryReport {
    /// Entries still held, oldest first.
    pub retained: Vec<MessageItem>,
    /// Total appends applied.
    pub appended: u64,
    /// Entries dropped by the capacity bound (clears are not counted).
    pub evicted: u64,
}

/// Starts a task that exclusively owns a history bounded by `max_entries`.
///
/// Must be called from within a Tokio runtime.
pub fn spawn_history(max_entries: NonZeroUsize) -> (HistoryHandle, JoinHandle<HistoryReport>) {
    let (tx, rx) = mpsc::channel(HISTORY_QUEUE_DEPTH);
    let task = tokio::spawn(run_history(rx, max_entries));
    (HistoryHandle { tx }, task)
}

async fn run_history(
    mut rx: mpsc::Receiver<HistoryCommand>,
    max_entries: NonZeroUsize,
) -> HistoryReport {
    let mut history = MessageHistory::new(max_entries);
    let mut appended = 0u64;
    let mut evicted = 0u64;

    while let Some(command) = rx.recv().await {
        match command {
            HistoryCommand::Append(item) => {
                appended += 1;
                if history.append(item).is_some() {
                    evicted += 1;
                }
            }
            HistoryCommand::Clear => {
                debug!(dropped = history.len(), "history cleared");
                history.clear();
            }
            HistoryCommand::Snapshot(reply) => {
                // The requester may have given up waiting; nothing to do then.
                let _ = reply.send(history.to_vec());
            }
        }
    }

    debug!(appended, evicted, retained = history.len(), "history task finished");
    HistoryReport {
        retained: history.to_vec(),
        appended,
        evicted,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use socketor_core::OwnerType;

    fn bound(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    fn tcp_session() -> ConnectionSession {
        ConnectionSession::new(
            "local echo",
            ConnectionConfig::with_defaults(ConnectionKind::TcpClient),
        )
    }

    // ── Session lifecycle ─────────────────────────────────────────────────────

    #[test]
    fn test_new_session_is_idle_and_editable() {
        let mut session = tcp_session();
        assert_eq!(session.state(), SessionState::Idle);
        assert!(session.config_mut().is_ok());
        assert_eq!(session.kind(), ConnectionKind::TcpClient);
    }

    #[test]
    fn test_successful_begin_activates_and_locks_profile() {
        // Arrange
        let mut session = tcp_session();

        // Act
        session.begin(ActionResult::ok()).unwrap();

        // Assert
        assert_eq!(session.state(), SessionState::Active);
        assert_eq!(
            session.config_mut().unwrap_err(),
            SessionError::ConfigLocked(SessionState::Active)
        );
        assert!(session.ensure_active().is_ok());
    }

    #[test]
    fn test_rejected_begin_passes_message_through_and_stays_idle() {
        let mut session = tcp_session();
        let err = session
            .begin(ActionResult::failure("Connection refused (os error 111)"))
            .unwrap_err();
        assert_eq!(
            err,
            SessionError::TransportRejected("Connection refused (os error 111)".to_string())
        );
        assert_eq!(session.state(), SessionState::Idle);
        assert!(session.config_mut().is_ok());
    }

    #[test]
    fn test_begin_twice_is_invalid() {
        let mut session = tcp_session();
        session.begin(ActionResult::ok()).unwrap();
        assert_eq!(
            session.begin(ActionResult::ok()),
            Err(SessionError::InvalidTransition(SessionState::Active))
        );
    }

    #[test]
    fn test_closed_session_is_terminal() {
        let mut session = tcp_session();
        session.begin(ActionResult::ok()).unwrap();
        session.close();
        session.close();
        assert_eq!(session.state(), SessionState::Closed);
        assert_eq!(
            session.ensure_active(),
            Err(SessionError::NotActive(SessionState::Closed))
        );
        assert!(session.begin(ActionResult::ok()).is_err());
        assert!(session.config_mut().is_err());
    }

    #[test]
    fn test_sessions_get_distinct_ids() {
        assert_ne!(tcp_session().id(), tcp_session().id());
    }

    // ── History task ──────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_history_task_reports_appends_and_evictions() {
        // Arrange
        let (handle, task) = spawn_history(bound(3));

        // Act
        for i in 0..5 {
            handle
                .append(MessageItem::new(format!("m{i}"), OwnerType::Receive))
                .await
                .unwrap();
        }
        drop(handle);
        let report = task.await.unwrap();

        // Assert
        assert_eq!(report.appended, 5);
        assert_eq!(report.evicted, 2);
        let contents: Vec<_> = report.retained.iter().map(|i| i.content.as_str()).collect();
        assert_eq!(contents, vec!["m2", "m3", "m4"]);
    }

    #[tokio::test]
    async fn test_snapshot_sees_prior_appends() {
        let (handle, _task) = spawn_history(bound(10));
        handle
            .append(MessageItem::new("hello", OwnerType::Send))
            .await
            .unwrap();
        let snapshot = handle.snapshot().await.unwrap();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].owner_type, OwnerType::Send);
    }

    #[tokio::test]
    async fn test_clear_empties_history_without_counting_evictions() {
        let (handle, task) = spawn_history(bound(10));
        handle.append(MessageItem::new("a", OwnerType::Log)).await.unwrap();
        handle.clear().await.unwrap();
        assert!(handle.snapshot().await.unwrap().is_empty());
        drop(handle);
        let report = task.await.unwrap();
        assert_eq!(report.appended, 1);
        assert_eq!(report.evicted, 0);
    }

    #[tokio::test]
    async fn test_concurrent_producers_never_exceed_bound() {
        // Arrange: four producers share one history bounded at 100
        let (handle, task) = spawn_history(bound(100));
        let producers: Vec<_> = (0..4)
            .map(|p| {
                let h = handle.clone();
                tokio::spawn(async move {
                    for i in 0..250 {
                        h.append(MessageItem::new(format!("{p}:{i}"), OwnerType::Receive))
                            .await
                            .unwrap();
                    }
                })
            })
            .collect();

        // Act
        for producer in producers {
            producer.await.unwrap();
        }
        drop(handle);
        let report = task.await.unwrap();

        // Assert
        assert_eq!(report.appended, 1000);
        assert_eq!(report.evicted, 900);
        assert_eq!(report.retained.len(), 100);

        // Each producer's own messages keep their relative order.
        for p in 0..4 {
            let prefix = format!("{p}:");
            let seq: Vec<u32> = report
                .retained
                .iter()
                .filter_map(|i| i.content.strip_prefix(&prefix))
                .map(|n| n.parse().unwrap())
                .collect();
            assert!(seq.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[tokio::test]
    async fn test_handle_reports_closed_after_task_abort() {
        let (handle, task) = spawn_history(bound(1));
        task.abort();
        let _ = task.await;
        assert_eq!(
            handle.append(MessageItem::new("late", OwnerType::Log)).await,
            Err(SessionError::HistoryClosed)
        );
    }
}
