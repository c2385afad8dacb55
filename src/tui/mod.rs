//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the session and
//! translates keyboard events into `SessionDriver` calls.
//!
//! This is the only module that knows about ratatui and crossterm. The
//! session itself never sees a key event; it only sees intents.
//!
//! ## Event Loop
//!
//! One thread owns the driver. Each turn it:
//!
//! 1. redraws if something changed,
//! 2. polls the terminal (short timeout while the search spinner runs),
//! 3. drains every pending terminal event,
//! 4. drains every timer action that arrived on the channel.
//!
//! Timer tasks never touch the session; they only send `Action`s here.

mod component;
mod components;
mod event;
mod ui;

use std::io::{self, stdout};
use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::cursor::{Hide, SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
};
use crossterm::execute;
use log::{debug, info};
use ratatui::DefaultTerminal;

use crate::core::action::Action;
use crate::core::config::ChatConfig;
use crate::core::interests::{InterestSet, PRESET_INTERESTS};
use crate::core::random::SeededRandom;
use crate::core::state::{Phase, Session};
use crate::runtime::{Scheduler, SessionDriver, TokioScheduler};
use crate::tui::component::EventHandler;
use crate::tui::components::{InputBox, InputEvent, MessageListState};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

/// TUI-specific presentation state (not part of the session)
pub struct TuiState {
    pub message_list: MessageListState,
    pub input_box: InputBox,
    /// Where Tab starts looking in `PRESET_INTERESTS`
    pub suggestion_cursor: usize,
}

impl TuiState {
    pub fn new(max_message_length: usize) -> Self {
        Self {
            message_list: MessageListState::new(),
            input_box: InputBox::new(max_message_length),
            suggestion_cursor: 0,
        }
    }

    /// Preset that Tab would fill in right now.
    pub fn peek_suggestion(&self, session: &Session) -> Option<&'static str> {
        if session.interests().is_full() {
            return None;
        }
        next_suggestion(PRESET_INTERESTS, session.interests(), self.suggestion_cursor)
            .map(|(_, name)| name)
    }

    fn cycle_suggestion(&mut self, session: &Session) {
        if session.interests().is_full() {
            return;
        }
        if let Some((index, name)) =
            next_suggestion(PRESET_INTERESTS, session.interests(), self.suggestion_cursor)
        {
            self.input_box.set_buffer(name);
            self.suggestion_cursor = index + 1;
        }
    }
}

/// First preset at or after `cursor` (wrapping) that isn't chosen yet.
pub fn next_suggestion(
    presets: &[&'static str],
    chosen: &InterestSet,
    cursor: usize,
) -> Option<(usize, &'static str)> {
    (0..presets.len())
        .map(|step| (cursor + step) % presets.len())
        .find(|&index| !chosen.contains(presets[index]))
        .map(|index| (index, presets[index]))
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> io::Result<Self> {
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            Show,
            SetCursorStyle::SteadyBlock // Non-blinking: redraws reset the blink timer
        )?;
        info!("Terminal modes enabled (mouse, bracketed paste, steady block cursor)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), DisableMouseCapture, DisableBracketedPaste, Hide);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

pub fn run(config: ChatConfig) -> io::Result<()> {
    let max_message_length = config.max_message_length;
    let rng = SeededRandom::new(config.seed);
    let session = Session::new(config, Box::new(rng));

    // Timer tasks deliver their actions here
    let (tx, rx) = mpsc::channel();
    let mut driver = SessionDriver::new(session, TokioScheduler::new(tx));
    driver.mount();

    let mut tui = TuiState::new(max_message_length);
    let mut terminal = ratatui::init();
    let result = {
        let _terminal_mode_guard = TerminalModeGuard::new();
        event_loop(&mut terminal, &mut driver, &mut tui, &rx)
    };

    driver.unmount();
    ratatui::restore();
    result
}

fn event_loop(
    terminal: &mut DefaultTerminal,
    driver: &mut SessionDriver<TokioScheduler>,
    tui: &mut TuiState,
    rx: &mpsc::Receiver<Action>,
) -> io::Result<()> {
    let start_time = Instant::now();
    let mut needs_redraw = true; // Force first frame

    loop {
        let animating = driver.session().phase() == Phase::Searching;
        if animating {
            needs_redraw = true;
        }

        if needs_redraw {
            let spinner_frame = (start_time.elapsed().as_secs_f32() * 12.0) as usize;
            terminal.draw(|f| ui::draw_ui(f, driver.session(), tui, spinner_frame))?;
            needs_redraw = false;
        }

        let timeout = if animating {
            Duration::from_millis(80)
        } else {
            Duration::from_millis(250)
        };
        let first_event = poll_event_timeout(timeout);
        if first_event.is_some() {
            needs_redraw = true;
        }

        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            if handle_event(&event, driver, tui) == Flow::Quit {
                info!("Quit requested");
                return Ok(());
            }
        }

        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            driver.dispatch(action);
        }
    }
}

fn handle_event<S: Scheduler>(
    event: &TuiEvent,
    driver: &mut SessionDriver<S>,
    tui: &mut TuiState,
) -> Flow {
    let picking = driver.session().can_edit_interests();

    match event {
        TuiEvent::Quit | TuiEvent::ForceQuit => return Flow::Quit,
        TuiEvent::Resize => {}
        TuiEvent::StartMatching => {
            driver.start_matching();
            tui.message_list = MessageListState::new();
        }
        TuiEvent::Disconnect => {
            driver.disconnect();
            tui.message_list = MessageListState::new();
        }
        TuiEvent::ScrollUp
        | TuiEvent::ScrollDown
        | TuiEvent::ScrollPageUp
        | TuiEvent::ScrollPageDown
        | TuiEvent::ScrollToBottom => {
            tui.message_list.handle_event(event);
        }
        TuiEvent::CycleSuggestion => {
            if picking {
                tui.cycle_suggestion(driver.session());
            }
        }
        _ => match tui.input_box.handle_event(event) {
            Some(InputEvent::Submit(text)) if picking => driver.add_interest(text),
            Some(InputEvent::Submit(text)) => {
                driver.send_message(text);
                tui.message_list.stick_to_bottom = true;
            }
            Some(InputEvent::BackspaceOnEmpty) if picking => {
                if let Some(last) = driver.session().interests().last() {
                    let id = last.id;
                    debug!("Removing last interest {}", last.name);
                    driver.remove_interest(id);
                }
            }
            Some(InputEvent::BackspaceOnEmpty) | Some(InputEvent::ContentChanged) | None => {}
        },
    }
    Flow::Continue
}
