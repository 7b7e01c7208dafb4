//! Newline-delimited JSON envelope reader.
//!
//! Each non-blank line holds one envelope, exactly as the transport emits it:
//!
//! ```text
//! {"content":"hello","msg_type":"Send"}
//! {"content":"hello back","msg_type":"Receive"}
//! ```
//!
//! Blank lines are skipped.  A line that fails to decode is reported as
//! [`SourceError::Malformed`] with its 1-based line number so the caller can
//! log it and move on.

use std::path::Path;

use async_trait::async_trait;
use tokio::fs::File;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines, Stdin};

use socketor_core::BackendMessageEnvelope;

use crate::application::replay::{EnvelopeSource, SourceError};

pub struct JsonLinesSource<R> {
    lines: Lines<R>,
    line_number: u64,
}

impl<R: AsyncBufRead + Unpin + Send> JsonLinesSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_number: 0,
        }
    }
}

impl JsonLinesSource<BufReader<Stdin>> {
    pub fn stdin() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()))
    }
}

impl JsonLinesSource<BufReader<File>> {
    /// Opens `path` for reading.
    ///
    /// # Errors
    ///
    /// Returns the I/O error if the file cannot be opened.
    pub async fn open(path: &Path) -> std::io::Result<Self> {
        let file = File::open(path).await?;
        Ok(Self::new(BufReader::new(file)))
    }
}

#[async_trait]
impl<R: AsyncBufRead + Unpin + Send> EnvelopeSource for JsonLinesSource<R> {
    async fn next_envelope(&mut self) -> Option<Result<BackendMessageEnvelope, SourceError>> {
        loop {
            let line = match self.lines.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => return None,
                Err(e) => return Some(Err(SourceError::Io(e))),
            };
            self.line_number += 1;
            if line.trim().is_empty() {
                continue;
            }
            return Some(
                BackendMessageEnvelope::from_json(&line).map_err(|source| {
                    SourceError::Malformed {
                        line: self.line_number,
                        source,
                    }
                }),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn drain<R: AsyncBufRead + Unpin + Send>(
        source: &mut JsonLinesSource<R>,
    ) -> Vec<Result<BackendMessageEnvelope, SourceError>> {
        let mut out = Vec::new();
        while let Some(next) = source.next_envelope().await {
            out.push(next);
        }
        out
    }

    #[tokio::test]
    async fn test_reads_one_envelope_per_line() {
        // Arrange
        let input: &[u8] = b"{\"content\":\"a\",\"msg_type\":\"Send\"}\n\
                             {\"content\":\"b\",\"msg_type\":\"Receive\"}\n";
        let mut source = JsonLinesSource::new(input);

        // Act
        let items = drain(&mut source).await;

        // Assert
        assert_eq!(items.len(), 2);
        let first = items[0].as_ref().unwrap();
        assert_eq!(first.content, "a");
        assert_eq!(first.msg_type, "Send");
    }

    #[tokio::test]
    async fn test_blank_lines_are_skipped_but_counted() {
        let input: &[u8] = b"\n   \n{\"content\":\"x\",\"msg_type\":\"Log\"}\nnot json\n";
        let mut source = JsonLinesSource::new(input);

        let items = drain(&mut source).await;

        assert_eq!(items.len(), 2);
        assert!(items[0].is_ok());
        match &items[1] {
            Err(SourceError::Malformed { line, .. }) => assert_eq!(*line, 4),
            other => panic!("expected malformed line 4, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_last_line_without_newline_is_read() {
        let input: &[u8] = b"{\"content\":\"tail\",\"msg_type\":\"Receive\"}";
        let mut source = JsonLinesSource::new(input);

        let items = drain(&mut source).await;

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].as_ref().unwrap().content, "tail");
    }

    #[tokio::test]
    async fn test_crlf_line_endings_are_accepted() {
        let input: &[u8] = b"{\"content\":\"w\",\"msg_type\":\"Send\"}\r\n";
        let mut source = JsonLinesSource::new(input);

        let items = drain(&mut source).await;

        assert_eq!(items[0].as_ref().unwrap().content, "w");
    }

    #[tokio::test]
    async fn test_reader_failure_is_reported_as_io() {
        // Arrange: one good line, then the reader breaks
        let reader = tokio_test::io::Builder::new()
            .read(b"{\"content\":\"ok\",\"msg_type\":\"Receive\"}\n")
            .read_error(std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset"))
            .build();
        let mut source = JsonLinesSource::new(BufReader::new(reader));

        // Act
        let first = source.next_envelope().await.unwrap();
        let second = source.next_envelope().await.unwrap();

        // Assert
        assert_eq!(first.unwrap().content, "ok");
        assert!(matches!(second, Err(SourceError::Io(e)) if e.kind() == std::io::ErrorKind::ConnectionReset));
    }

    #[tokio::test]
    async fn test_open_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(JsonLinesSource::open(&dir.path().join("nope.jsonl")).await.is_err());
    }
}
