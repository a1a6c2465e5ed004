//! Deterministic timers driven by an explicit clock.
//!
//! Nothing here reads the wall clock. The owner advances time with
//! [`Scheduler::advance_to`] and receives the timers that came due, in
//! order. Tests can therefore replay any timeline exactly.

use log::trace;

use crate::error::{MargaError, Result};

/// Handle to a scheduled timer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

#[derive(Clone, Debug)]
struct Timer<T> {
    id: TimerId,
    due: f32,
    period: Option<f32>,
    tag: T,
}

/// A timer firing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fired<T> {
    pub id: TimerId,
    pub tag: T,
    /// Scheduled time of this firing (seconds).
    pub at: f32,
}

/// One-shot and repeating timers on a virtual timeline.
#[derive(Clone, Debug)]
pub struct Scheduler<T> {
    now: f32,
    next_id: u64,
    timers: Vec<Timer<T>>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self {
            now: 0.0,
            next_id: 0,
            timers: Vec::new(),
        }
    }
}

impl<T: Copy> Scheduler<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current time (seconds).
    pub fn now(&self) -> f32 {
        self.now
    }

    /// Fire `tag` once, `delay` seconds from now.
    pub fn schedule_once(&mut self, delay: f32, tag: T) -> TimerId {
        let id = self.allocate();
        self.timers.push(Timer {
            id,
            due: self.now + delay.max(0.0),
            period: None,
            tag,
        });
        id
    }

    /// Fire `tag` every `period` seconds, first one period from now.
    pub fn schedule_repeating(&mut self, period: f32, tag: T) -> Result<TimerId> {
        if !(period.is_finite() && period > 0.0) {
            return Err(MargaError::InvalidConfig(format!(
                "timer period must be positive, got {}",
                period
            )));
        }
        let id = self.allocate();
        self.timers.push(Timer {
            id,
            due: self.now + period,
            period: Some(period),
            tag,
        });
        Ok(id)
    }

    /// Cancel a timer. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.id != id);
        self.timers.len() != before
    }

    pub fn is_active(&self, id: TimerId) -> bool {
        self.timers.iter().any(|t| t.id == id)
    }

    /// Number of pending timers.
    pub fn pending(&self) -> usize {
        self.timers.len()
    }

    /// Cancel every timer.
    pub fn clear(&mut self) {
        self.timers.clear();
    }

    /// Move the clock to `now` and return the timers that came due, ordered
    /// by due time then by creation. A repeating timer fires once for each
    /// period elapsed. Time never runs backwards.
    pub fn advance_to(&mut self, now: f32) -> Vec<Fired<T>> {
        let now = now.max(self.now);
        let mut fired = Vec::new();

        while let Some(idx) = self.next_due(now) {
            fired.push(self.fire(idx));
        }

        self.now = now;
        if !fired.is_empty() {
            trace!("[Scheduler] t={:.2}s fired {} timers", now, fired.len());
        }
        fired
    }

    /// Pop the next due firing only. Lets the caller react to each firing
    /// (for example by cancelling other timers) before later ones fire.
    pub fn pop_due(&mut self, now: f32) -> Option<Fired<T>> {
        let now = now.max(self.now);
        let Some(idx) = self.next_due(now) else {
            self.now = now;
            return None;
        };
        let fired = self.fire(idx);
        self.now = fired.at.max(self.now);
        Some(fired)
    }

    /// Record a firing and re-arm or drop the timer.
    fn fire(&mut self, idx: usize) -> Fired<T> {
        let timer = &self.timers[idx];
        let fired = Fired {
            id: timer.id,
            tag: timer.tag,
            at: timer.due,
        };
        let period = timer.period;
        match period {
            Some(period) => self.timers[idx].due += period,
            None => {
                self.timers.remove(idx);
            }
        }
        fired
    }

    fn next_due(&self, now: f32) -> Option<usize> {
        self.timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due <= now)
            .min_by(|(_, a), (_, b)| a.due.total_cmp(&b.due).then(a.id.cmp(&b.id)))
            .map(|(idx, _)| idx)
    }

    fn allocate(&mut self) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq)]
    enum Tag {
        Tick,
        Alarm,
    }

    #[test]
    fn test_once_fires_once() {
        let mut s = Scheduler::new();
        let id = s.schedule_once(5.0, Tag::Alarm);
        assert!(s.advance_to(4.9).is_empty());
        let fired = s.advance_to(5.0);
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].id, id);
        assert!(!s.is_active(id));
        assert!(s.advance_to(10.0).is_empty());
    }

    #[test]
    fn test_repeating_catches_up() {
        let mut s = Scheduler::new();
        s.schedule_repeating(0.5, Tag::Tick).unwrap();
        let fired = s.advance_to(2.2);
        assert_eq!(fired.len(), 4);
        assert!((fired[3].at - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_ordering_and_cancel() {
        let mut s = Scheduler::new();
        let tick = s.schedule_repeating(1.0, Tag::Tick).unwrap();
        s.schedule_once(1.5, Tag::Alarm);
        let fired: Vec<Tag> = s.advance_to(2.0).into_iter().map(|f| f.tag).collect();
        assert_eq!(fired, vec![Tag::Tick, Tag::Alarm, Tag::Tick]);

        assert!(s.cancel(tick));
        assert!(!s.cancel(tick));
        assert!(s.advance_to(10.0).is_empty());
    }

    #[test]
    fn test_pop_due_allows_cancellation_between_firings() {
        let mut s = Scheduler::new();
        s.schedule_once(1.0, Tag::Alarm);
        let tick = s.schedule_repeating(1.0, Tag::Tick).unwrap();
        let first = s.pop_due(3.0).unwrap();
        assert_eq!(first.tag, Tag::Alarm);
        s.cancel(tick);
        assert!(s.pop_due(3.0).is_none());
        assert_eq!(s.now(), 3.0);
    }

    #[test]
    fn test_invalid_period() {
        let mut s: Scheduler<Tag> = Scheduler::new();
        assert!(s.schedule_repeating(0.0, Tag::Tick).is_err());
        assert!(s.schedule_repeating(f32::NAN, Tag::Tick).is_err());
    }

    #[test]
    fn test_time_never_runs_backwards() {
        let mut s = Scheduler::new();
        s.advance_to(3.0);
        s.schedule_once(1.0, Tag::Alarm);
        assert!(s.advance_to(1.0).is_empty());
        assert_eq!(s.now(), 3.0);
        assert_eq!(s.advance_to(4.0).len(), 1);
    }
}
