use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};
use ratatui::style::{Color, Style};
use ratatui::text::Line;

use crate::core::state::{Phase, Session};
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::{INPUT_HEIGHT, InterestPanel, MessageList, TitleBar};

const BROADCAST_WELCOME: &str = "Welcome to Anonymous Chat!\n\n\
Start a conversation with random people from around the world. \
No registration required, just type and send!\n\nWaiting for messages...";

const ROOM_FOOTER: &str = "Be kind and respectful. Messages are public and anonymous.";

pub fn draw_ui(frame: &mut Frame, session: &Session, tui: &mut TuiState, spinner_frame: usize) {
    use Constraint::{Length, Min};
    let layout = Layout::vertical([Length(1), Min(0), Length(INPUT_HEIGHT), Length(1)]);
    let [title_area, main_area, input_area, help_area] = layout.areas(frame.area());

    let mut title_bar = TitleBar {
        variant: session.config().variant_name.label(),
        phase: session.phase(),
        partner: session.partner_label().map(str::to_string),
        online_count: session.online_count(),
        headline: session.headline(),
        has_unseen_content: tui.message_list.has_unseen_content(),
    };
    title_bar.render(frame, title_area);

    if shows_interest_panel(session) {
        let suggestion = tui.peek_suggestion(session);
        let mut panel = InterestPanel {
            phase: session.phase(),
            headline: session.headline(),
            interests: session.interests().names(),
            cap: session.interests().cap(),
            suggestion,
            spinner_frame,
        };
        panel.render(frame, main_area);
    } else {
        let empty_text = empty_text(session);
        let mut list = MessageList {
            state: &mut tui.message_list,
            messages: session.timeline().snapshot(),
            partner: session.partner_label(),
            empty_text: &empty_text,
        };
        list.render(frame, main_area);
    }

    sync_input_props(session, tui);
    tui.input_box.render(frame, input_area);

    let help = Line::from(help_text(session)).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help.centered(), help_area);
}

/// The paired chat shows the picker until a partner is found.
pub fn shows_interest_panel(session: &Session) -> bool {
    !session.is_broadcast() && matches!(session.phase(), Phase::Idle | Phase::Searching)
}

fn empty_text(session: &Session) -> String {
    if session.is_broadcast() {
        return BROADCAST_WELCOME.to_string();
    }
    match session.partner_label() {
        Some(partner) => format!("Say hi to {partner}!"),
        None => "Nobody here yet.".to_string(),
    }
}

fn sync_input_props(session: &Session, tui: &mut TuiState) {
    let (title, enabled) = match session.phase() {
        Phase::Idle if !session.is_broadcast() => ("Add interest", true),
        Phase::Searching if !session.is_broadcast() => ("Matching…", false),
        Phase::Disconnected => ("Closed", false),
        _ if session.can_send() => ("Message", true),
        _ => ("Start matching to chat", false),
    };
    tui.input_box.title = title.to_string();
    tui.input_box.enabled = enabled;
}

fn help_text(session: &Session) -> &'static str {
    if session.is_broadcast() {
        return ROOM_FOOTER;
    }
    match session.phase() {
        Phase::Idle => "Enter add · Tab preset · Ctrl+S match · Esc quit",
        Phase::Searching => "Ctrl+D cancel · Esc quit",
        Phase::Connected => "Enter send · Ctrl+D leave · ↑↓ scroll · Esc quit",
        Phase::Disconnected => "Esc quit",
    }
}
