//! Terminal output for translated messages.

use std::io::Write;

use socketor_core::MessageItem;

use crate::application::render::Renderer;
use crate::application::replay::MessageSink;

/// Writes each item's rendered lines to `out` (stdout in the binary).
pub struct ConsoleSink<W> {
    renderer: Renderer,
    out: W,
}

impl<W: Write> ConsoleSink<W> {
    pub fn new(renderer: Renderer, out: W) -> Self {
        Self { renderer, out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> MessageSink for ConsoleSink<W> {
    fn show(&mut self, item: &MessageItem) -> std::io::Result<()> {
        for line in self.renderer.render(item) {
            writeln!(self.out, "{line}")?;
        }
        self.out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};
    use socketor_core::{Locale, MessageBoxConfig, OwnerType};

    #[test]
    fn test_console_sink_writes_rendered_lines() {
        // Arrange
        let renderer = Renderer::new(Locale::parse("de-DE").unwrap(), MessageBoxConfig::default());
        let mut sink = ConsoleSink::new(renderer, Vec::new());
        let item = MessageItem {
            time: Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap(),
            content: "first\nsecond".to_string(),
            owner_type: OwnerType::Receive,
        };

        // Act
        sink.show(&item).unwrap();

        // Assert
        let text = String::from_utf8(sink.into_inner()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "[09.03.2024 14:05:07] receive first");
        assert_eq!(lines[1].trim_start(), "second");
        assert_eq!(lines.len(), 2);
    }
}
