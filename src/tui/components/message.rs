use chrono::Local;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Padding, Paragraph, Widget, Wrap};

use crate::core::timeline::{ChatMessage, Origin};

/// Horizontal padding (per side) between the border and text content.
const CONTENT_PAD_H: u16 = 1;
/// Total horizontal space consumed by borders (1 left + 1 right) and padding.
const HORIZONTAL_OVERHEAD: u16 = 2 + CONTENT_PAD_H * 2;
/// Total vertical space consumed by borders (1 top + 1 bottom).
const VERTICAL_OVERHEAD: u16 = 2;

/// Fallback name for a peer message with no label and no known partner.
const UNKNOWN_SENDER: &str = "Stranger";

/// A single chat bubble: bordered block titled with sender and time.
///
/// Transient: built fresh each frame by `MessageList`. The partner name is
/// passed in because paired-chat peer messages don't carry their own label.
#[derive(Clone, Copy)]
pub struct Message<'a> {
    pub message: &'a ChatMessage,
    pub partner: Option<&'a str>,
}

impl<'a> Message<'a> {
    pub fn new(message: &'a ChatMessage, partner: Option<&'a str>) -> Self {
        Self { message, partner }
    }

    pub fn sender(&self) -> &'a str {
        if let Some(label) = self.message.sender_label.as_deref() {
            return label;
        }
        match self.message.origin {
            Origin::Own => "You",
            Origin::Peer => self.partner.unwrap_or(UNKNOWN_SENDER),
        }
    }

    /// `sender · HH:MM`, in the viewer's local time.
    pub fn title(&self) -> String {
        let local = self.message.sent_at.with_timezone(&Local);
        format!("{} · {}", self.sender(), local.format("%H:%M"))
    }

    /// Rendered height at `width`, matching `Paragraph`'s wrapping.
    pub fn calculate_height(message: &ChatMessage, width: u16) -> u16 {
        let content_width = width.saturating_sub(HORIZONTAL_OVERHEAD);
        if content_width == 0 {
            return 1;
        }

        let content = message.text.trim();
        if content.is_empty() {
            return VERTICAL_OVERHEAD;
        }

        let options = textwrap::Options::new(content_width as usize)
            .break_words(true)
            .word_separator(textwrap::WordSeparator::AsciiSpace);

        let lines = textwrap::wrap(content, options);
        (lines.len() as u16).max(1) + VERTICAL_OVERHEAD
    }

    fn style(&self) -> Style {
        match self.message.origin {
            Origin::Own => Style::default().fg(Color::Green),
            Origin::Peer => Style::default().fg(Color::Cyan),
        }
    }
}

impl<'a> Widget for Message<'a> {
    fn render(self, area: Rect, buf: &mut ratatui::buffer::Buffer) {
        let style = self.style();
        let border_style = style.add_modifier(Modifier::DIM);

        let mut title = Line::from(self.title());
        if self.message.origin == Origin::Own {
            title = title.right_aligned();
        }

        let block = Block::bordered()
            .title(title)
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title_style(border_style)
            .padding(Padding::horizontal(CONTENT_PAD_H));

        let inner_area = block.inner(area);
        block.render(area, buf);

        Paragraph::new(self.message.text.trim())
            .style(style)
            .wrap(Wrap { trim: true })
            .render(inner_area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::timeline::MessageId;
    use crate::test_support::t0;

    fn make_message(origin: Origin, text: &str, label: Option<&str>) -> ChatMessage {
        ChatMessage {
            id: MessageId(0),
            text: text.to_string(),
            origin,
            sent_at: t0(),
            sender_label: label.map(str::to_string),
        }
    }

    #[test]
    fn test_sender_prefers_own_label() {
        let message = make_message(Origin::Peer, "hi", Some("Ghost Rabbit"));
        assert_eq!(Message::new(&message, Some("Hidden Fox")).sender(), "Ghost Rabbit");
    }

    #[test]
    fn test_sender_falls_back_to_partner() {
        let message = make_message(Origin::Peer, "hi", None);
        assert_eq!(Message::new(&message, Some("Hidden Fox")).sender(), "Hidden Fox");
        assert_eq!(Message::new(&message, None).sender(), UNKNOWN_SENDER);
    }

    #[test]
    fn test_own_message_without_label_is_you() {
        let message = make_message(Origin::Own, "hi", None);
        assert_eq!(Message::new(&message, Some("Hidden Fox")).sender(), "You");
    }

    #[test]
    fn test_title_shows_local_hour_and_minute() {
        let message = make_message(Origin::Own, "hi", None);
        let local = t0().with_timezone(&Local).format("%H:%M").to_string();
        assert_eq!(Message::new(&message, None).title(), format!("You · {local}"));
    }

    #[test]
    fn test_calculate_height_single_line_fits() {
        let message = make_message(Origin::Own, "Hello", None);
        assert_eq!(Message::calculate_height(&message, 80), 1 + VERTICAL_OVERHEAD);
    }

    #[test]
    fn test_calculate_height_wraps_at_width_boundary() {
        let message = make_message(Origin::Own, "Hello world", None);
        // content width 9 - 4 = 5: "Hello" | "world"
        assert_eq!(Message::calculate_height(&message, 9), 2 + VERTICAL_OVERHEAD);
    }

    #[test]
    fn test_calculate_height_zero_width_returns_minimum() {
        let message = make_message(Origin::Own, "Hello world", None);
        assert_eq!(Message::calculate_height(&message, 0), 1);
    }
}
