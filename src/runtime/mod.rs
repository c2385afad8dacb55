//! # Runtime
//!
//! Glue between the pure reducer and real (or virtual) time.
//!
//! [`SessionDriver`] is the single writer of a [`Session`]: user intents and
//! timer continuations both enter through [`SessionDriver::dispatch`], which
//! runs `update()` and then performs the returned `Effect` against its
//! [`Scheduler`]. Every timer the driver starts is remembered so it can be
//! cancelled before the session moves on.
//!
//! ```text
//!   intent ──┐
//!            ├──► dispatch(action) ──► update() ──► Effect ──► Scheduler
//!   timer ───┘                                                  │
//!     ▲                                                         │
//!     └─────────────────── Action (later) ◄─────────────────────┘
//! ```

pub mod manual;
pub mod scheduler;

use std::time::Duration;

use log::debug;

use crate::core::action::{Action, Effect, update};
use crate::core::interests::InterestId;
use crate::core::state::Session;

pub use manual::ManualScheduler;
pub use scheduler::{Scheduler, TimerId, TokioScheduler};

pub struct SessionDriver<S: Scheduler> {
    session: Session,
    scheduler: S,
    match_timer: Option<TimerId>,
    peer_timer: Option<TimerId>,
}

impl<S: Scheduler> SessionDriver<S> {
    pub fn new(session: Session, scheduler: S) -> Self {
        Self {
            session,
            scheduler,
            match_timer: None,
            peer_timer: None,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// Timers this driver started and has not cancelled yet.
    pub fn outstanding_timers(&self) -> usize {
        usize::from(self.match_timer.is_some()) + usize::from(self.peer_timer.is_some())
    }

    pub fn dispatch(&mut self, action: Action) {
        debug!("Dispatching {:?}", action);
        let now = self.scheduler.now();
        let effect = update(&mut self.session, action, now);
        self.apply(effect);
    }

    pub fn start_matching(&mut self) {
        self.dispatch(Action::StartMatching);
    }

    pub fn send_message(&mut self, text: impl Into<String>) {
        self.dispatch(Action::SendMessage(text.into()));
    }

    pub fn add_interest(&mut self, name: impl Into<String>) {
        self.dispatch(Action::AddInterest(name.into()));
    }

    pub fn remove_interest(&mut self, id: InterestId) {
        self.dispatch(Action::RemoveInterest(id));
    }

    pub fn disconnect(&mut self) {
        self.dispatch(Action::Disconnect);
    }

    pub fn mount(&mut self) {
        self.dispatch(Action::Mount);
    }

    pub fn unmount(&mut self) {
        self.dispatch(Action::Unmount);
    }

    fn apply(&mut self, effect: Effect) {
        match effect {
            Effect::None => {}
            Effect::ScheduleMatch { token, delay } => {
                self.cancel_match();
                let id = self
                    .scheduler
                    .schedule_once(delay, Action::MatchFound { token });
                self.match_timer = Some(id);
            }
            Effect::CancelMatch => self.cancel_match(),
            Effect::StartPeers { run, period } => {
                // Entering a live state: the match timer (if any) has done its job
                self.cancel_match();
                self.stop_peers();
                let id = self
                    .scheduler
                    .schedule_every(period, Action::PeerTick { run });
                self.peer_timer = Some(id);
            }
            Effect::StopPeers => self.stop_peers(),
            Effect::StopAll => {
                self.cancel_match();
                self.stop_peers();
            }
        }
    }

    fn cancel_match(&mut self) {
        if let Some(id) = self.match_timer.take() {
            self.scheduler.cancel(id);
        }
    }

    fn stop_peers(&mut self) {
        if let Some(id) = self.peer_timer.take() {
            self.scheduler.cancel(id);
        }
    }
}

impl SessionDriver<ManualScheduler> {
    /// Moves virtual time forward by `by`, dispatching every timer that comes
    /// due on the way, including timers scheduled by those dispatches.
    pub fn advance(&mut self, by: Duration) {
        let until = self.scheduler.elapsed() + by;
        while let Some(action) = self.scheduler.pop_due(until) {
            self.dispatch(action);
        }
        self.scheduler.advance_to(until);
    }
}
