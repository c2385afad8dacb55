//! # Actions
//!
//! Everything that can happen to a session becomes an `Action`.
//! User presses Enter? That's `Action::SendMessage(text)`.
//! The match timer fires? That's `Action::MatchFound { token }`.
//!
//! The `update()` function takes the current state and an action, mutates the
//! state, and returns an `Effect` describing which timer the runtime has to
//! start or cancel. No timers or I/O here.
//!
//! ```text
//! Session + Action + now  →  update()  →  Effect
//! ```
//!
//! Timer-originated actions carry the token they were scheduled with. A token
//! that no longer matches the session (because the user disconnected, or the
//! view was torn down) turns the action into a no-op, so a continuation that
//! was already queued when its timer got cancelled can never leak through.

use std::time::Duration;

use chrono::{DateTime, Utc};
use log::{debug, info};

use crate::core::config::RoomMode;
use crate::core::interests::InterestId;
use crate::core::peer::{ANONYMOUS_NAMES, RunId};
use crate::core::random::{pick, range_inclusive};
use crate::core::state::{OWN_LABEL, Phase, Session};
use crate::core::timeline::{NewMessage, Origin};

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    // User intents
    StartMatching,
    SendMessage(String),
    AddInterest(String),
    RemoveInterest(InterestId),
    Disconnect,

    // View lifecycle
    Mount,
    Unmount,

    // Timer continuations
    MatchFound { token: u64 },
    PeerTick { run: RunId },
}

/// Timer work the runtime must perform after an `update()`.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    /// Fire `Action::MatchFound { token }` once after `delay`.
    ScheduleMatch { token: u64, delay: Duration },
    /// Drop the pending match timer.
    CancelMatch,
    /// Fire `Action::PeerTick { run }` every `period`, first after one period.
    StartPeers { run: RunId, period: Duration },
    /// Drop the peer tick timer.
    StopPeers,
    /// Drop every outstanding timer.
    StopAll,
}

pub fn update(session: &mut Session, action: Action, now: DateTime<Utc>) -> Effect {
    match action {
        Action::StartMatching => start_matching(session),
        Action::SendMessage(text) => {
            send_message(session, text, now);
            Effect::None
        }
        Action::AddInterest(name) => {
            if session.can_edit_interests() {
                if session.interests.add(&name).is_none() {
                    debug!("Interest {:?} rejected (blank, duplicate, or set full)", name);
                }
            } else {
                debug!("Ignoring AddInterest in phase {}", session.phase);
            }
            Effect::None
        }
        Action::RemoveInterest(id) => {
            if session.can_edit_interests() {
                session.interests.remove(id);
            } else {
                debug!("Ignoring RemoveInterest in phase {}", session.phase);
            }
            Effect::None
        }
        Action::Disconnect => disconnect(session),
        Action::Mount => mount(session),
        Action::Unmount => unmount(session),
        Action::MatchFound { token } => match_found(session, token),
        Action::PeerTick { run } => {
            peer_tick(session, run, now);
            Effect::None
        }
    }
}

fn start_matching(session: &mut Session) -> Effect {
    if session.config.variant.mode == RoomMode::Broadcast || session.phase != Phase::Idle {
        debug!("Ignoring StartMatching in phase {}", session.phase);
        return Effect::None;
    }
    let (lo, hi) = session.config.match_delay_ms;
    let delay = Duration::from_millis(range_inclusive(session.rng.as_mut(), lo, hi));
    let token = session.issue_token();
    session.pending_match = Some(token);
    session.phase = Phase::Searching;
    info!(
        "Searching for a partner (token={}, delay={}ms, interests={:?})",
        token,
        delay.as_millis(),
        session.interests.names()
    );
    Effect::ScheduleMatch { token, delay }
}

fn match_found(session: &mut Session, token: u64) -> Effect {
    if session.phase != Phase::Searching || session.pending_match != Some(token) {
        debug!("Dropping stale MatchFound (token={})", token);
        return Effect::None;
    }
    session.pending_match = None;
    // Interests are not consulted here.
    let partner = pick(session.rng.as_mut(), ANONYMOUS_NAMES)
        .copied()
        .unwrap_or("Stranger");
    session.partner_label = Some(partner.to_string());
    session.phase = Phase::Connected;
    let run = session.generator.start();
    info!("Connected with {} (run={:?})", partner, run);
    Effect::StartPeers {
        run,
        period: session.generator.period(),
    }
}

fn disconnect(session: &mut Session) -> Effect {
    match session.phase {
        Phase::Searching => {
            session.pending_match = None;
            session.phase = Phase::Idle;
            info!("Search cancelled");
            Effect::CancelMatch
        }
        Phase::Connected => {
            session.generator.stop();
            session.timeline.clear();
            // Interests carry over to the next search
            let partner = session.partner_label.take();
            session.phase = Phase::Idle;
            info!("Disconnected from {}", partner.as_deref().unwrap_or("partner"));
            Effect::StopPeers
        }
        Phase::Idle | Phase::Disconnected => {
            debug!("Ignoring Disconnect in phase {}", session.phase);
            Effect::None
        }
    }
}

fn mount(session: &mut Session) -> Effect {
    match session.phase {
        Phase::Disconnected => session.phase = Phase::Idle,
        Phase::Idle => {}
        Phase::Searching | Phase::Connected => {
            debug!("Ignoring Mount in phase {}", session.phase);
            return Effect::None;
        }
    }
    if session.config.variant.mode == RoomMode::Broadcast && !session.generator.is_running() {
        let run = session.generator.start();
        info!("Public room live (run={:?})", run);
        return Effect::StartPeers {
            run,
            period: session.generator.period(),
        };
    }
    Effect::None
}

fn unmount(session: &mut Session) -> Effect {
    if session.phase == Phase::Disconnected {
        return Effect::None;
    }
    session.pending_match = None;
    session.generator.stop();
    session.timeline.clear();
    session.interests.clear();
    session.partner_label = None;
    session.phase = Phase::Disconnected;
    info!("Session torn down");
    Effect::StopAll
}

fn send_message(session: &mut Session, text: String, now: DateTime<Utc>) {
    if text.trim().is_empty() {
        debug!("Ignoring blank message");
        return;
    }
    if !session.can_send() {
        debug!("Ignoring SendMessage in phase {}", session.phase);
        return;
    }
    let sender_label = session
        .config
        .variant
        .show_sender_label
        .then(|| OWN_LABEL.to_string());
    session.timeline.append(NewMessage {
        text,
        origin: Origin::Own,
        sent_at: now,
        sender_label,
    });
}

fn peer_tick(session: &mut Session, run: RunId, now: DateTime<Utc>) {
    if session.generator.current_run() != Some(run) {
        debug!("Dropping stale PeerTick (run={:?})", run);
        return;
    }
    let Some(emission) = session.generator.tick(run, session.rng.as_mut()) else {
        return;
    };
    debug!(
        "Peer says {:?} (as {:?})",
        emission.text,
        emission.sender_label.as_deref().or(session.partner_label.as_deref())
    );
    session.timeline.append(NewMessage {
        text: emission.text,
        origin: Origin::Peer,
        sent_at: now,
        sender_label: emission.sender_label,
    });
    if let Some(gauge) = session.online.as_mut() {
        gauge.nudge(session.rng.as_mut());
    }
}
