//! # Scheduler
//!
//! The session never sleeps. When it needs something to happen later it asks
//! a [`Scheduler`] to deliver an `Action` after a delay (or every period), and
//! it gets a [`TimerId`] back so the timer can be cancelled on the next phase
//! change.
//!
//! [`TokioScheduler`] is the production implementation: each timer is a tokio
//! task that pushes its action into the same channel the event loop drains, so
//! all session mutation still happens on one thread.

use std::collections::HashMap;
use std::sync::mpsc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use log::{debug, warn};
use tokio::task::AbortHandle;
use tokio::time::{Instant, MissedTickBehavior};

use crate::core::action::Action;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u64);

pub trait Scheduler {
    /// Wall-clock time used to stamp new messages.
    fn now(&self) -> DateTime<Utc>;

    /// Deliver `action` once, `delay` from now.
    fn schedule_once(&mut self, delay: Duration, action: Action) -> TimerId;

    /// Deliver `action` every `period`, the first time one period from now.
    fn schedule_every(&mut self, period: Duration, action: Action) -> TimerId;

    /// Stop a timer. Unknown or already-finished ids are ignored.
    fn cancel(&mut self, id: TimerId);
}

pub struct TokioScheduler {
    tx: mpsc::Sender<Action>,
    timers: HashMap<TimerId, AbortHandle>,
    next_id: u64,
}

impl TokioScheduler {
    /// Must be called from within a tokio runtime context.
    pub fn new(tx: mpsc::Sender<Action>) -> Self {
        Self {
            tx,
            timers: HashMap::new(),
            next_id: 0,
        }
    }

    /// Timers spawned and not yet cancelled.
    pub fn active(&self) -> usize {
        self.timers.len()
    }

    fn register(&mut self, handle: AbortHandle) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.timers.insert(id, handle);
        id
    }
}

impl Scheduler for TokioScheduler {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn schedule_once(&mut self, delay: Duration, action: Action) -> TimerId {
        let tx = self.tx.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if tx.send(action).is_err() {
                warn!("Timer fired after the event loop went away");
            }
        });
        self.register(handle.abort_handle())
    }

    fn schedule_every(&mut self, period: Duration, action: Action) -> TimerId {
        let tx = self.tx.clone();
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if tx.send(action.clone()).is_err() {
                    debug!("Event loop closed, stopping repeating timer");
                    break;
                }
            }
        });
        self.register(handle.abort_handle())
    }

    fn cancel(&mut self, id: TimerId) {
        if let Some(handle) = self.timers.remove(&id) {
            handle.abort();
        }
    }
}

impl Drop for TokioScheduler {
    fn drop(&mut self) {
        for (_, handle) in self.timers.drain() {
            handle.abort();
        }
    }
}
