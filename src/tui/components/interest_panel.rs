//! # InterestPanel Component
//!
//! Fills the main area of the paired chat before a partner is found.
//!
//! - Idle: headline, chosen interests as tags, the Tab preset hint
//! - Searching: spinner and headline, with the cancel hint
//!
//! Stateless; the spinner frame is passed in by the event loop.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};

use crate::core::state::Phase;
use crate::tui::component::Component;

const SPINNER: [&str; 8] = ["⣾", "⣽", "⣻", "⢿", "⡿", "⣟", "⣯", "⣷"];

pub struct InterestPanel<'a> {
    pub phase: Phase,
    pub headline: String,
    pub interests: Vec<&'a str>,
    pub cap: usize,
    /// Preset Tab will fill in next, if any
    pub suggestion: Option<&'a str>,
    pub spinner_frame: usize,
}

impl<'a> InterestPanel<'a> {
    pub fn spinner(frame: usize) -> &'static str {
        SPINNER[frame % SPINNER.len()]
    }

    fn tag_line(&self) -> Line<'a> {
        if self.interests.is_empty() {
            return Line::from(Span::styled(
                "No interests yet, you'll be matched with anyone",
                Style::default().fg(Color::DarkGray),
            ));
        }
        let mut spans = Vec::with_capacity(self.interests.len() * 2);
        for name in &self.interests {
            if !spans.is_empty() {
                spans.push(Span::raw(" "));
            }
            spans.push(Span::styled(
                format!("[{name}]"),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ));
        }
        Line::from(spans)
    }

    fn lines(&self) -> Vec<Line<'a>> {
        let bold = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);
        let dim = Style::default().fg(Color::DarkGray);

        match self.phase {
            Phase::Searching => vec![
                Line::from(Span::styled(
                    format!("{} {}", Self::spinner(self.spinner_frame), self.headline),
                    Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
                )),
                Line::default(),
                self.tag_line(),
                Line::default(),
                Line::from(Span::styled("Ctrl+D to cancel", dim)),
            ],
            _ => {
                let mut lines = vec![
                    Line::from(Span::styled(self.headline.clone(), bold)),
                    Line::default(),
                    self.tag_line(),
                    Line::from(Span::styled(
                        format!("{}/{}", self.interests.len(), self.cap),
                        dim,
                    )),
                    Line::default(),
                ];
                if let Some(preset) = self.suggestion {
                    lines.push(Line::from(Span::styled(format!("Tab: {preset}"), dim)));
                }
                lines.push(Line::from(Span::styled(
                    "Enter adds · Backspace on empty removes · Ctrl+S starts matching",
                    dim,
                )));
                lines
            }
        }
    }
}

impl<'a> Component for InterestPanel<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let lines = self.lines();
        let height = lines.len() as u16;
        let [centered] = Layout::vertical([Constraint::Length(height)])
            .flex(Flex::Center)
            .areas(area);

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, centered);
    }
}
