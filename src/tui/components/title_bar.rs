//! # TitleBar Component
//!
//! Single-line status bar across the top of the screen.
//!
//! Stateless: every field is a prop copied from the session each frame.
//!
//! ```text
//! anonchat · paired · connected · Hidden Fox | Chatting with Hidden Fox
//! anonchat · broadcast · 43 online | Public room · Be kind and respectful
//! ```

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::core::state::Phase;
use crate::tui::component::Component;

pub struct TitleBar {
    pub variant: &'static str,
    pub phase: Phase,
    pub partner: Option<String>,
    pub online_count: Option<u8>,
    pub headline: String,
    pub has_unseen_content: bool,
}

impl TitleBar {
    pub fn text(&self) -> String {
        let mut parts = vec!["anonchat".to_string(), self.variant.to_string()];
        match self.online_count {
            Some(count) => parts.push(format!("{count} online")),
            None => parts.push(self.phase.to_string()),
        }
        if let Some(partner) = &self.partner {
            parts.push(partner.clone());
        }
        let mut text = parts.join(" · ");
        if !self.headline.is_empty() {
            text.push_str(" | ");
            text.push_str(&self.headline);
        }
        if self.has_unseen_content {
            text.push_str(" | ↓ New");
        }
        text
    }

    fn phase_color(&self) -> Color {
        match self.phase {
            Phase::Idle => Color::Yellow,
            Phase::Searching => Color::Magenta,
            Phase::Connected => Color::Green,
            Phase::Disconnected => Color::DarkGray,
        }
    }
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let style = Style::default()
            .fg(self.phase_color())
            .add_modifier(Modifier::BOLD);
        frame.render_widget(Line::from(Span::styled(self.text(), style)), area);
    }
}
