//! # Virtual-Time Scheduler
//!
//! [`ManualScheduler`] keeps timers in a list and only moves time when told
//! to. Paired with `SessionDriver::advance`, a whole session (match delay,
//! dozens of peer ticks) replays instantly and in exactly the order real
//! timers would have fired. Timers due at the same instant fire in the order
//! they were scheduled.

use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};

use crate::core::action::Action;
use crate::runtime::scheduler::{Scheduler, TimerId};

#[derive(Debug)]
struct PendingTimer {
    id: TimerId,
    due: Duration,
    period: Option<Duration>,
    action: Action,
}

#[derive(Debug)]
pub struct ManualScheduler {
    origin: DateTime<Utc>,
    elapsed: Duration,
    timers: Vec<PendingTimer>,
    next_id: u64,
}

impl ManualScheduler {
    /// Virtual time starts at `origin`.
    pub fn new(origin: DateTime<Utc>) -> Self {
        Self {
            origin,
            elapsed: Duration::ZERO,
            timers: Vec::new(),
            next_id: 0,
        }
    }

    /// Virtual time since construction.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Number of timers that could still fire.
    pub fn pending(&self) -> usize {
        self.timers.len()
    }

    /// Removes and returns the earliest action due at or before `until`,
    /// moving the clock to its due time. Repeating timers are re-armed.
    pub fn pop_due(&mut self, until: Duration) -> Option<Action> {
        let index = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, timer)| timer.due <= until)
            .min_by_key(|(_, timer)| (timer.due, timer.id))
            .map(|(index, _)| index)?;

        self.elapsed = self.elapsed.max(self.timers[index].due);
        match self.timers[index].period {
            Some(period) => {
                let timer = &mut self.timers[index];
                timer.due += period;
                Some(timer.action.clone())
            }
            None => Some(self.timers.remove(index).action),
        }
    }

    /// Moves the clock forward without firing anything. Never moves backwards.
    pub fn advance_to(&mut self, elapsed: Duration) {
        self.elapsed = self.elapsed.max(elapsed);
    }

    fn push(&mut self, due: Duration, period: Option<Duration>, action: Action) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.timers.push(PendingTimer {
            id,
            due,
            period,
            action,
        });
        id
    }
}

impl Scheduler for ManualScheduler {
    fn now(&self) -> DateTime<Utc> {
        let offset = TimeDelta::from_std(self.elapsed).unwrap_or(TimeDelta::MAX);
        self.origin
            .checked_add_signed(offset)
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    fn schedule_once(&mut self, delay: Duration, action: Action) -> TimerId {
        self.push(self.elapsed + delay, None, action)
    }

    fn schedule_every(&mut self, period: Duration, action: Action) -> TimerId {
        // A zero period would fire forever at one instant
        let period = period.max(Duration::from_millis(1));
        self.push(self.elapsed + period, Some(period), action)
    }

    fn cancel(&mut self, id: TimerId) {
        self.timers.retain(|timer| timer.id != id);
    }
}
