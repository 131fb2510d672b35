//! Cancellable scheduled callbacks.
//!
//! The activation reducer never touches a clock. It emits
//! [`TimerCommand`]s and later consumes the ids of timers that fired. A
//! [`Scheduler`] turns the commands into real (or virtual) timers.

use std::time::Duration;

use web_time::Instant;

/// Identifies one scheduled callback. Ids are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

impl TimerId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }
}

/// What a timer is waiting for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// Mouse has hovered long enough to activate
    HoverDelay,
    /// Mouse has stayed outside long enough to deactivate
    HoverOffDelay,
    /// Touch has been held long enough to activate
    PressDuration,
}

/// Instruction from the reducer to the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerCommand {
    /// Fire `id` after `delay`
    Schedule {
        id: TimerId,
        kind: TimerKind,
        delay: Duration,
    },
    /// Drop `id` if it has not fired yet
    Cancel { id: TimerId },
}

/// Executes timer commands on behalf of the activation machine.
pub trait Scheduler {
    /// Arrange for `id` to be reported as due after `delay`.
    fn schedule(&mut self, id: TimerId, delay: Duration);

    /// Forget `id`. Cancelling an unknown or already-fired id is a no-op.
    fn cancel(&mut self, id: TimerId);

    /// Forget every pending timer.
    fn cancel_all(&mut self);

    /// Number of timers still pending.
    fn pending(&self) -> usize;

    /// Apply a reducer command.
    fn apply(&mut self, command: TimerCommand) {
        match command {
            TimerCommand::Schedule { id, kind, delay } => {
                log::trace!("Scheduler: schedule {:?} ({:?}) in {:?}", id, kind, delay);
                self.schedule(id, delay);
            }
            TimerCommand::Cancel { id } => {
                log::trace!("Scheduler: cancel {:?}", id);
                self.cancel(id);
            }
        }
    }
}

/// A scheduler driven by a virtual clock.
///
/// Time only moves when [`ManualScheduler::advance`] is called, which makes
/// it suitable for tests and for replaying recorded traces.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    now: Duration,
    timers: Vec<(TimerId, Duration)>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Move the clock forward and return the timers that became due,
    /// earliest first. Returned timers are removed.
    pub fn advance(&mut self, by: Duration) -> Vec<TimerId> {
        self.advance_to(self.now + by)
    }

    /// Move the clock to `target` (never backwards) and return due timers.
    pub fn advance_to(&mut self, target: Duration) -> Vec<TimerId> {
        self.now = self.now.max(target);
        let now = self.now;

        let mut due: Vec<(TimerId, Duration)> = Vec::new();
        self.timers.retain(|&(id, deadline)| {
            if deadline <= now {
                due.push((id, deadline));
                false
            } else {
                true
            }
        });
        due.sort_by_key(|&(id, deadline)| (deadline, id));
        due.into_iter().map(|(id, _)| id).collect()
    }

    /// Deadline of the earliest pending timer.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.iter().map(|&(_, deadline)| deadline).min()
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&mut self, id: TimerId, delay: Duration) {
        self.timers.push((id, self.now + delay));
    }

    fn cancel(&mut self, id: TimerId) {
        self.timers.retain(|&(timer, _)| timer != id);
    }

    fn cancel_all(&mut self) {
        self.timers.clear();
    }

    fn pending(&self) -> usize {
        self.timers.len()
    }
}

/// A wall-clock scheduler polled from the host's event loop.
///
/// Uses `web_time::Instant` so it works both natively and in the browser.
#[derive(Debug, Default)]
pub struct InstantScheduler {
    timers: Vec<(TimerId, Instant)>,
}

impl InstantScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove and return every timer whose deadline has passed.
    pub fn poll_due(&mut self) -> Vec<TimerId> {
        self.poll_due_at(Instant::now())
    }

    fn poll_due_at(&mut self, now: Instant) -> Vec<TimerId> {
        let mut due: Vec<(TimerId, Instant)> = Vec::new();
        self.timers.retain(|&(id, deadline)| {
            if deadline <= now {
                due.push((id, deadline));
                false
            } else {
                true
            }
        });
        due.sort_by_key(|&(id, deadline)| (deadline, id));
        due.into_iter().map(|(id, _)| id).collect()
    }

    /// Time until the earliest pending timer, for sleeping the event loop.
    pub fn time_until_next(&self) -> Option<Duration> {
        let now = Instant::now();
        self.timers
            .iter()
            .map(|&(_, deadline)| deadline.saturating_duration_since(now))
            .min()
    }
}

impl Scheduler for InstantScheduler {
    fn schedule(&mut self, id: TimerId, delay: Duration) {
        self.timers.push((id, Instant::now() + delay));
    }

    fn cancel(&mut self, id: TimerId) {
        self.timers.retain(|&(timer, _)| timer != id);
    }

    fn cancel_all(&mut self) {
        self.timers.clear();
    }

    fn pending(&self) -> usize {
        self.timers.len()
    }
}
