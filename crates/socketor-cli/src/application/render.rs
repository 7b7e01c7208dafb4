//! Display formatting for message items.
//!
//! A rendered item looks like:
//!
//! ```text
//! [03/09/2024 02:05:07 PM] receive hello back
//! [03/09/2024 02:05:08 PM] send    48 65 6C 6C 6F
//! ```
//!
//! The timestamp pattern comes from the [`Locale`] the renderer was built
//! with; hex display and wrapping come from the connection's
//! [`MessageBoxConfig`].  Continuation lines (from embedded newlines or from
//! wrapping) are indented to line up under the content column.

use socketor_core::{render_payload, Locale, MessageBoxConfig, MessageItem};

/// Default terminal width used when wrapping is enabled.
pub const DEFAULT_WRAP_WIDTH: usize = 100;

/// Widest owner label (`receive`), so content columns line up.
const OWNER_COLUMN: usize = 7;

#[derive(Debug, Clone)]
pub struct Renderer {
    locale: Locale,
    message_box: MessageBoxConfig,
    wrap_width: usize,
}

impl Renderer {
    pub fn new(locale: Locale, message_box: MessageBoxConfig) -> Self {
        Self {
            locale,
            message_box,
            wrap_width: DEFAULT_WRAP_WIDTH,
        }
    }

    /// Sets the total line width used when `auto_wrap` is on.
    pub fn with_wrap_width(mut self, wrap_width: usize) -> Self {
        self.wrap_width = wrap_width;
        self
    }

    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    /// Renders one item into one or more display lines.
    pub fn render(&self, item: &MessageItem) -> Vec<String> {
        let prefix = format!(
            "[{}] {:<width$} ",
            self.locale.format_time(&item.time),
            item.owner_type.label(),
            width = OWNER_COLUMN
        );
        let indent = " ".repeat(prefix.chars().count());
        let content = render_payload(item.content.as_bytes(), self.message_box.show_as_hex);

        let body_width = if self.message_box.auto_wrap {
            // Always leave room for at least one character per line.
            Some(self.wrap_width.saturating_sub(indent.len()).max(1))
        } else {
            None
        };

        let mut lines = Vec::new();
        for source_line in content.split('\n') {
            let source_line = source_line.strip_suffix('\r').unwrap_or(source_line);
            match body_width {
                Some(width) => lines.extend(chunk_chars(source_line, width)),
                None => lines.push(source_line.to_string()),
            }
        }

        lines
            .into_iter()
            .enumerate()
            .map(|(i, line)| {
                if i == 0 {
                    format!("{prefix}{line}")
                } else {
                    format!("{indent}{line}")
                }
            })
            .collect()
    }
}

/// Splits `text` into pieces of at most `width` characters.  An empty input
/// yields one empty piece so blank lines survive.
fn chunk_chars(text: &str, width: usize) -> Vec<String> {
    if text.is_empty() {
        return vec![String::new()];
    }
    let chars: Vec<char> = text.chars().collect();
    chars.chunks(width).map(|c| c.iter().collect()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};
    use socketor_core::OwnerType;

    fn item(content: &str, owner_type: OwnerType) -> MessageItem {
        MessageItem {
            time: Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap(),
            content: content.to_string(),
            owner_type,
        }
    }

    #[test]
    fn test_render_single_line_with_en_us_time() {
        let renderer = Renderer::new(Locale::default(), MessageBoxConfig::default());
        let lines = renderer.render(&item("hello back", OwnerType::Receive));
        assert_eq!(lines, vec!["[03/09/2024 02:05:07 PM] receive hello back"]);
    }

    #[test]
    fn test_owner_column_is_padded() {
        let renderer = Renderer::new(Locale::default(), MessageBoxConfig::default());
        let lines = renderer.render(&item("x", OwnerType::Log));
        assert_eq!(lines, vec!["[03/09/2024 02:05:07 PM] log     x"]);
    }

    #[test]
    fn test_locale_changes_timestamp_only() {
        let renderer = Renderer::new(
            Locale::parse("zh-CN").unwrap(),
            MessageBoxConfig::default(),
        );
        let lines = renderer.render(&item("hi", OwnerType::Send));
        assert_eq!(lines, vec!["[2024/03/09 14:05:07] send    hi"]);
    }

    #[test]
    fn test_hex_display() {
        let message_box = MessageBoxConfig {
            show_as_hex: true,
            ..MessageBoxConfig::default()
        };
        let renderer = Renderer::new(Locale::parse("fi").unwrap(), message_box);
        let lines = renderer.render(&item("Hi", OwnerType::Send));
        assert_eq!(lines, vec!["[2024-03-09 14:05:07] send    48 69"]);
    }

    #[test]
    fn test_embedded_newlines_become_indented_lines() {
        let renderer = Renderer::new(Locale::parse("fi").unwrap(), MessageBoxConfig::default());
        let lines = renderer.render(&item("line one\r\nline two", OwnerType::Receive));
        let indent = " ".repeat("[2024-03-09 14:05:07] receive ".len());
        assert_eq!(
            lines,
            vec![
                "[2024-03-09 14:05:07] receive line one".to_string(),
                format!("{indent}line two"),
            ]
        );
    }

    #[test]
    fn test_auto_wrap_splits_long_content() {
        // Arrange: prefix is 30 columns, leaving 10 for content
        let message_box = MessageBoxConfig {
            auto_wrap: true,
            ..MessageBoxConfig::default()
        };
        let renderer =
            Renderer::new(Locale::parse("fi").unwrap(), message_box).with_wrap_width(40);

        // Act
        let lines = renderer.render(&item("abcdefghijKLMNOPQRSTuv", OwnerType::Receive));

        // Assert
        assert_eq!(lines.len(), 3);
        assert!(lines[0].ends_with("abcdefghij"));
        assert!(lines[1].trim_start() == "KLMNOPQRST");
        assert!(lines[2].trim_start() == "uv");
        assert!(lines.iter().all(|l| l.chars().count() <= 40));
    }

    #[test]
    fn test_without_auto_wrap_long_lines_are_kept_whole() {
        let renderer = Renderer::new(Locale::default(), MessageBoxConfig::default())
            .with_wrap_width(10);
        let long = "x".repeat(500);
        let lines = renderer.render(&item(&long, OwnerType::Receive));
        assert_eq!(lines.len(), 1);
        assert!(lines[0].ends_with(&long));
    }

    #[test]
    fn test_chunk_chars_handles_multibyte_text() {
        assert_eq!(chunk_chars("你好世界", 3), vec!["你好世", "界"]);
        assert_eq!(chunk_chars("", 3), vec![""]);
    }
}
