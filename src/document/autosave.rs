use std::time::{Duration, Instant};

/// Decides when a snapshot should be written.
///
/// Two triggers: a debounce after the last observed change, and a fixed
/// interval since the last save. Callers supply the clock, so the schedule is
/// deterministic under test.
#[derive(Debug, Clone)]
pub struct AutosaveSchedule {
    interval: Duration,
    debounce: Duration,
    last_save: Instant,
    dirty_since: Option<Instant>,
    seen_revision: u64,
}

impl AutosaveSchedule {
    pub fn new(interval: Duration, debounce: Duration, now: Instant) -> Self {
        Self {
            interval,
            debounce,
            last_save: now,
            dirty_since: None,
            seen_revision: 0,
        }
    }

    /// Notes a change if `revision` differs from the last one observed.
    pub fn observe(&mut self, revision: u64, now: Instant) {
        if revision != self.seen_revision {
            self.seen_revision = revision;
            self.note_change(now);
        }
    }

    /// Records a change. Each call restarts the debounce window.
    pub fn note_change(&mut self, now: Instant) {
        self.dirty_since = Some(now);
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty_since.is_some()
    }

    pub fn debounce_due(&self, now: Instant) -> bool {
        self.dirty_since
            .is_some_and(|t| now.saturating_duration_since(t) >= self.debounce)
    }

    pub fn interval_due(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.last_save) >= self.interval
    }

    pub fn mark_saved(&mut self, now: Instant) {
        self.last_save = now;
        self.dirty_since = None;
    }
}
