//! # InputBox Component
//!
//! Single-line text field at the bottom of the screen. This is the input
//! boundary of the app: it enforces the message length cap, so anything that
//! reaches the session is already within limits.
//!
//! ## Responsibilities
//!
//! - Capture typed and pasted text (newlines in pastes become spaces)
//! - Refuse input past `max_chars` characters
//! - Emit `Submit` on Enter when the trimmed text is non-empty
//! - Report Backspace on an empty field, which the parent uses to drop the
//!   last interest
//!
//! When the text is wider than the box, the tail stays visible and the
//! cursor sits at the end.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Paragraph};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

/// Borders (top + bottom) plus one line of text.
pub const INPUT_HEIGHT: u16 = 3;

#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// User submitted the text (Enter pressed)
    Submit(String),
    /// Backspace with nothing left to delete
    BackspaceOnEmpty,
    ContentChanged,
}

/// # Props
///
/// - `title`: what Enter will do ("Message", "Add interest", ...)
/// - `enabled`: dimmed and read-only when false
///
/// # State
///
/// - `buffer`: current text
pub struct InputBox {
    pub buffer: String,
    pub title: String,
    pub enabled: bool,
    max_chars: usize,
}

impl InputBox {
    pub fn new(max_chars: usize) -> Self {
        Self {
            buffer: String::new(),
            title: String::from("Message"),
            enabled: true,
            max_chars,
        }
    }

    pub fn char_count(&self) -> usize {
        self.buffer.chars().count()
    }

    /// Replace the buffer, truncated to the cap.
    pub fn set_buffer(&mut self, text: &str) {
        self.buffer = text.chars().take(self.max_chars).collect();
    }

    fn remaining(&self) -> usize {
        self.max_chars.saturating_sub(self.char_count())
    }

    /// Tail of the buffer that fits in `width` columns.
    fn visible_tail(&self, width: usize) -> &str {
        let mut used = 0;
        let mut start = self.buffer.len();
        for (index, c) in self.buffer.char_indices().rev() {
            let w = c.width().unwrap_or(0);
            if used + w > width {
                break;
            }
            used += w;
            start = index;
        }
        &self.buffer[start..]
    }
}

impl Component for InputBox {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        // One column is kept free for the cursor
        let text_width = area.width.saturating_sub(3) as usize;
        let visible = self.visible_tail(text_width).to_string();

        let style = if self.enabled {
            Style::default().fg(Color::Green)
        } else {
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::DIM)
        };
        let counter = format!("{}/{}", self.char_count(), self.max_chars);

        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .title(self.title.as_str())
            .title_top(Line::from(counter).right_aligned());

        frame.render_widget(Paragraph::new(visible.as_str()).block(block).style(style), area);

        if self.enabled {
            let cursor_x = area.x + 1 + visible.width() as u16;
            frame.set_cursor_position((cursor_x.min(area.right().saturating_sub(2)), area.y + 1));
        }
    }
}

impl EventHandler for InputBox {
    type Event = InputEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        if !self.enabled {
            return None;
        }
        match event {
            TuiEvent::InputChar(c) => {
                if self.remaining() == 0 || c.is_control() {
                    return None;
                }
                self.buffer.push(*c);
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Paste(text) => {
                let room = self.remaining();
                let pasted: String = text
                    .chars()
                    .map(|c| if c == '\n' || c == '\r' || c == '\t' { ' ' } else { c })
                    .filter(|c| !c.is_control())
                    .take(room)
                    .collect();
                if pasted.is_empty() {
                    return None;
                }
                self.buffer.push_str(&pasted);
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Backspace => {
                if self.buffer.pop().is_some() {
                    Some(InputEvent::ContentChanged)
                } else {
                    Some(InputEvent::BackspaceOnEmpty)
                }
            }
            TuiEvent::Submit => {
                if self.buffer.trim().is_empty() {
                    return None;
                }
                Some(InputEvent::Submit(std::mem::take(&mut self.buffer)))
            }
            _ => None,
        }
    }
}
