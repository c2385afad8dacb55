//! # Session State
//!
//! Everything the presentation layer can observe about one chat session lives
//! in [`Session`]. It contains domain logic only; no terminal types and no
//! timers. Timers are requested through `Effect`s returned by `update()`.
//!
//! ```text
//! Session
//! ├── config: ChatConfig             // variant switches + tunables
//! ├── phase: Phase                   // Idle / Searching / Connected / Disconnected
//! ├── partner_label: Option<String>  // set on entering Connected
//! ├── timeline: Timeline             // messages, append-only
//! ├── interests: InterestSet         // ≤ max_interests, deduplicated
//! ├── online: Option<OnlineGauge>    // public room only
//! ├── generator: PeerGenerator       // simulated remote party
//! ├── pending_match: Option<u64>     // token of the in-flight match timer
//! └── rng: Box<dyn RandomSource>     // every random draw goes through here
//! ```
//!
//! State changes only happen through `update(session, action, now)` in action.rs.

use std::fmt;

use crate::core::config::{ChatConfig, RoomMode};
use crate::core::interests::InterestSet;
use crate::core::peer::{BROADCAST_MESSAGES, OnlineGauge, PAIRED_MESSAGES, PeerGenerator};
use crate::core::random::RandomSource;
use crate::core::timeline::Timeline;

/// Label attached to the user's own messages in labelled rooms.
pub const OWN_LABEL: &str = "You";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Picking interests; nobody to talk to yet. Initial state.
    Idle,
    /// Match timer running.
    Searching,
    /// Partner assigned, peer simulation running.
    Connected,
    /// Torn down by `Unmount`. Only `Mount` leaves this state.
    Disconnected,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Phase::Idle => "idle",
            Phase::Searching => "searching",
            Phase::Connected => "connected",
            Phase::Disconnected => "disconnected",
        };
        f.write_str(label)
    }
}

pub struct Session {
    pub(crate) config: ChatConfig,
    pub(crate) phase: Phase,
    pub(crate) partner_label: Option<String>,
    pub(crate) timeline: Timeline,
    pub(crate) interests: InterestSet,
    pub(crate) online: Option<OnlineGauge>,
    pub(crate) generator: PeerGenerator,
    pub(crate) pending_match: Option<u64>,
    pub(crate) next_token: u64,
    pub(crate) rng: Box<dyn RandomSource>,
}

impl Session {
    pub fn new(config: ChatConfig, rng: Box<dyn RandomSource>) -> Self {
        let variant = config.variant;
        let messages = match variant.mode {
            RoomMode::Broadcast => BROADCAST_MESSAGES,
            RoomMode::Paired => PAIRED_MESSAGES,
        };
        let generator = PeerGenerator::new(
            config.tick_period(),
            config.emit_probability,
            messages,
            variant.show_sender_label,
        );
        Self {
            interests: InterestSet::new(config.max_interests),
            online: variant.track_online_count.then(OnlineGauge::default),
            config,
            phase: Phase::Idle,
            partner_label: None,
            timeline: Timeline::new(),
            generator,
            pending_match: None,
            next_token: 0,
            rng,
        }
    }

    pub fn config(&self) -> &ChatConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn partner_label(&self) -> Option<&str> {
        self.partner_label.as_deref()
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn interests(&self) -> &InterestSet {
        &self.interests
    }

    /// `None` for variants without an online counter.
    pub fn online_count(&self) -> Option<u8> {
        self.online.map(|gauge| gauge.count())
    }

    pub fn is_generating(&self) -> bool {
        self.generator.is_running()
    }

    pub fn is_broadcast(&self) -> bool {
        self.config.variant.mode == RoomMode::Broadcast
    }

    /// Whether `send_message` would currently be accepted (ignoring content).
    pub fn can_send(&self) -> bool {
        match self.phase {
            Phase::Disconnected => false,
            Phase::Connected => true,
            Phase::Idle | Phase::Searching => !self.config.variant.require_connection_to_send,
        }
    }

    /// Interest edits are only taken while picking, and only paired rooms pick.
    pub fn can_edit_interests(&self) -> bool {
        self.phase == Phase::Idle && !self.is_broadcast()
    }

    /// Framing text for the current phase. Interests appear here and nowhere
    /// else; the match itself never looks at them.
    pub fn headline(&self) -> String {
        if self.is_broadcast() {
            return match self.phase {
                Phase::Disconnected => "Room closed".to_string(),
                _ => "Public room · Be kind and respectful".to_string(),
            };
        }
        let names = self.interests.names();
        match self.phase {
            Phase::Idle => format!(
                "Pick up to {} interests, then start matching",
                self.interests.cap()
            ),
            Phase::Searching if names.is_empty() => "Looking for a random stranger…".to_string(),
            Phase::Searching => format!("Looking for someone into {}…", names.join(", ")),
            Phase::Connected => {
                let partner = self.partner_label.as_deref().unwrap_or("a stranger");
                if names.is_empty() {
                    format!("Chatting with {partner}")
                } else {
                    format!("Chatting with {partner} · you both like {}", names.join(", "))
                }
            }
            Phase::Disconnected => "Session ended".to_string(),
        }
    }

    pub(crate) fn issue_token(&mut self) -> u64 {
        let token = self.next_token;
        self.next_token += 1;
        token
    }
}
