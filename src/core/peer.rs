//! # Simulated Peers
//!
//! There is no remote party. While a room is live, [`PeerGenerator`] is asked
//! once per tick whether "someone" says something, and if so what and under
//! which name. The generator itself never touches a timer: the runtime owns
//! the tick schedule, and the generator owns the run id that every tick has to
//! present. A tick from an earlier run is simply refused.
//!
//! ```text
//!   start() ──► RunId(n) ──► runtime ticks every period with RunId(n)
//!                               │
//!   tick(RunId(n), rng) ◄───────┘   emits with probability p
//!   stop()  ──► later ticks for RunId(n) return None
//! ```

use std::time::Duration;

use crate::core::random::{RandomSource, pick};

/// Anonymized display names used for partners and broadcast senders.
pub const ANONYMOUS_NAMES: &[&str] = &[
    "Anonymous Owl",
    "Mystery Cat",
    "Secret Panda",
    "Hidden Fox",
    "Stealth Bear",
    "Phantom Wolf",
    "Ghost Rabbit",
    "Shadow Duck",
    "Mystic Deer",
    "Silent Tiger",
];

/// Canned lines for the public room.
pub const BROADCAST_MESSAGES: &[&str] = &[
    "Hey everyone! How's your day going? 😊",
    "Anyone else procrastinating right now? 😅",
    "Just discovered this app, pretty cool!",
    "What's the weather like where you are?",
    "Random thought: pineapple on pizza is actually great 🍕",
    "Does anyone have any good book recommendations?",
    "Working late tonight, anyone else?",
    "Just wanted to say hi to everyone! 👋",
    "This anonymous chat is so fun!",
    "Hope you all are having a great day! ✨",
];

/// Canned lines for a one-on-one conversation.
pub const PAIRED_MESSAGES: &[&str] = &[
    "Hey! How's it going?",
    "So what brings you here today?",
    "Haha, that's a good one 😄",
    "I've been wanting to talk to someone about that!",
    "Where are you chatting from?",
    "Honestly same.",
    "What are you up to this weekend?",
    "That's really interesting, tell me more!",
    "I didn't expect to match with someone so fast 👀",
    "Nice to meet you, stranger ✨",
];

pub const ONLINE_MIN: u8 = 20;
pub const ONLINE_MAX: u8 = 99;
pub const ONLINE_START: u8 = 42;

/// Identifies one start()..stop() span of the generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RunId(pub u64);

/// A message the simulated party decided to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerEmission {
    pub text: String,
    pub sender_label: Option<String>,
}

#[derive(Debug)]
pub struct PeerGenerator {
    period: Duration,
    emit_probability: f64,
    messages: &'static [&'static str],
    /// Draw a fresh sender name per message (public room) instead of
    /// speaking as the single implicit partner.
    labelled: bool,
    run: Option<RunId>,
    next_run: u64,
}

impl PeerGenerator {
    pub fn new(
        period: Duration,
        emit_probability: f64,
        messages: &'static [&'static str],
        labelled: bool,
    ) -> Self {
        Self {
            period,
            emit_probability: emit_probability.clamp(0.0, 1.0),
            messages,
            labelled,
            run: None,
            next_run: 0,
        }
    }

    /// Begins a new run. Any previous run is invalidated.
    pub fn start(&mut self) -> RunId {
        let run = RunId(self.next_run);
        self.next_run += 1;
        self.run = Some(run);
        run
    }

    /// Ends the current run, returning it if there was one.
    pub fn stop(&mut self) -> Option<RunId> {
        self.run.take()
    }

    pub fn is_running(&self) -> bool {
        self.run.is_some()
    }

    pub fn current_run(&self) -> Option<RunId> {
        self.run
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Emission happens when the draw strictly exceeds this value.
    pub fn threshold(&self) -> f64 {
        1.0 - self.emit_probability
    }

    /// One tick of the simulation. Returns `None` for a stale run or when the
    /// dice say nobody talks this time.
    pub fn tick(&self, run: RunId, rng: &mut dyn RandomSource) -> Option<PeerEmission> {
        if self.run != Some(run) {
            return None;
        }
        if rng.next_f64() <= self.threshold() {
            return None;
        }
        let text = pick(rng, self.messages)?.to_string();
        let sender_label = if self.labelled {
            pick(rng, ANONYMOUS_NAMES).map(|name| name.to_string())
        } else {
            None
        };
        Some(PeerEmission { text, sender_label })
    }
}

/// "N online" counter shown in the public room. Purely cosmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OnlineGauge {
    count: u8,
}

impl Default for OnlineGauge {
    fn default() -> Self {
        Self { count: ONLINE_START }
    }
}

impl OnlineGauge {
    pub fn count(&self) -> u8 {
        self.count
    }

    /// Moves the count one step up or down, staying within bounds.
    pub fn nudge(&mut self, rng: &mut dyn RandomSource) {
        let next = if rng.next_f64() > 0.5 {
            self.count.saturating_add(1)
        } else {
            self.count.saturating_sub(1)
        };
        self.count = next.clamp(ONLINE_MIN, ONLINE_MAX);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::random::ScriptedRandom;

    fn paired_generator() -> PeerGenerator {
        PeerGenerator::new(Duration::from_millis(4000), 0.2, PAIRED_MESSAGES, false)
    }

    #[test]
    fn test_tick_before_start_is_silent() {
        let generator = paired_generator();
        let mut rng = ScriptedRandom::constant(0.9);
        assert_eq!(generator.tick(RunId(0), &mut rng), None);
    }

    #[test]
    fn test_tick_emits_above_threshold() {
        let mut generator = paired_generator();
        let run = generator.start();
        let mut rng = ScriptedRandom::constant(0.9);

        let emission = generator.tick(run, &mut rng).unwrap();
        assert!(PAIRED_MESSAGES.contains(&emission.text.as_str()));
        assert_eq!(emission.sender_label, None);
    }

    #[test]
    fn test_tick_silent_at_or_below_threshold() {
        let mut generator =
            PeerGenerator::new(Duration::from_millis(4000), 0.5, PAIRED_MESSAGES, false);
        let run = generator.start();
        assert_eq!(generator.tick(run, &mut ScriptedRandom::constant(0.5)), None);
        assert_eq!(generator.tick(run, &mut ScriptedRandom::constant(0.1)), None);
        assert!(generator.tick(run, &mut ScriptedRandom::constant(0.51)).is_some());
    }

    #[test]
    fn test_labelled_generator_draws_sender_per_message() {
        let mut generator =
            PeerGenerator::new(Duration::from_millis(5000), 0.3, BROADCAST_MESSAGES, true);
        let run = generator.start();
        // emit, text index 0, name index 0; then emit, text index 9, name index 9
        let mut rng = ScriptedRandom::new(vec![0.95, 0.0, 0.0, 0.95, 0.99, 0.99]);

        let first = generator.tick(run, &mut rng).unwrap();
        assert_eq!(first.text, BROADCAST_MESSAGES[0]);
        assert_eq!(first.sender_label.as_deref(), Some(ANONYMOUS_NAMES[0]));

        let second = generator.tick(run, &mut rng).unwrap();
        assert_eq!(second.text, BROADCAST_MESSAGES[9]);
        assert_eq!(second.sender_label.as_deref(), Some(ANONYMOUS_NAMES[9]));
    }

    #[test]
    fn test_stop_refuses_ticks_from_old_run() {
        let mut generator = paired_generator();
        let run = generator.start();
        assert_eq!(generator.stop(), Some(run));
        assert!(!generator.is_running());
        assert_eq!(generator.tick(run, &mut ScriptedRandom::constant(0.9)), None);
    }

    #[test]
    fn test_restart_invalidates_previous_run() {
        let mut generator = paired_generator();
        let old = generator.start();
        generator.stop();
        let new = generator.start();
        assert_ne!(old, new);

        let mut rng = ScriptedRandom::constant(0.9);
        assert_eq!(generator.tick(old, &mut rng), None);
        assert!(generator.tick(new, &mut rng).is_some());
    }

    #[test]
    fn test_online_gauge_starts_at_default() {
        assert_eq!(OnlineGauge::default().count(), ONLINE_START);
    }

    #[test]
    fn test_online_gauge_moves_one_step() {
        let mut gauge = OnlineGauge::default();
        gauge.nudge(&mut ScriptedRandom::constant(0.9));
        assert_eq!(gauge.count(), ONLINE_START + 1);
        gauge.nudge(&mut ScriptedRandom::constant(0.1));
        gauge.nudge(&mut ScriptedRandom::constant(0.1));
        assert_eq!(gauge.count(), ONLINE_START - 1);
    }

    #[test]
    fn test_online_gauge_is_clamped() {
        let mut gauge = OnlineGauge::default();
        let mut down = ScriptedRandom::constant(0.0);
        for _ in 0..100 {
            gauge.nudge(&mut down);
        }
        assert_eq!(gauge.count(), ONLINE_MIN);

        let mut up = ScriptedRandom::constant(0.9);
        for _ in 0..200 {
            gauge.nudge(&mut up);
        }
        assert_eq!(gauge.count(), ONLINE_MAX);
    }
}
