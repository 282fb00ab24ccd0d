//! Cooperative timer queue
//!
//! Timers are `(fire_time, sequence, id)` entries in a min-heap. Cancelling
//! drops the timer from the live table; its heap entry goes stale and is
//! skipped when popped. Repeating timers are re-pushed with their next fire
//! time, which also turns the previous entry stale.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use super::clock::Millis;

/// Handle to a scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

#[derive(Debug, Clone)]
struct Timer<K> {
    due: Millis,
    period: Option<Millis>,
    kind: K,
}

/// A timer that came due
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fired<K> {
    pub id: TimerId,
    pub at: Millis,
    pub kind: K,
}

#[derive(Debug, Clone)]
pub struct Scheduler<K> {
    queue: BinaryHeap<Reverse<(Millis, u64, TimerId)>>,
    timers: HashMap<TimerId, Timer<K>>,
    next_seq: u64,
    next_id: u64,
}

impl<K> Default for Scheduler<K> {
    fn default() -> Self {
        Self {
            queue: BinaryHeap::new(),
            timers: HashMap::new(),
            next_seq: 0,
            next_id: 1,
        }
    }
}

impl<K: Copy> Scheduler<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire once at `at`
    pub fn schedule_once(&mut self, at: Millis, kind: K) -> TimerId {
        self.insert(at, None, kind)
    }

    /// Fire at `first`, then every `period` after that
    pub fn schedule_repeating(&mut self, first: Millis, period: Millis, kind: K) -> TimerId {
        self.insert(first, Some(period.max(1)), kind)
    }

    /// Cancel a timer. Returns false if it already fired (one-shot) or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        self.timers.remove(&id).is_some()
    }

    pub fn cancel_all(&mut self) {
        self.timers.clear();
        self.queue.clear();
    }

    /// Next fire time of a live timer
    pub fn due(&self, id: TimerId) -> Option<Millis> {
        self.timers.get(&id).map(|t| t.due)
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Pop the earliest timer due at or before `now`.
    /// Ties fire in scheduling order.
    pub fn pop_due(&mut self, now: Millis) -> Option<Fired<K>> {
        while let Some(&Reverse((due, _, id))) = self.queue.peek() {
            if due > now {
                return None;
            }
            self.queue.pop();

            let Some(timer) = self.timers.get_mut(&id) else {
                continue; // cancelled
            };
            if timer.due != due {
                continue; // superseded by a reschedule
            }

            let kind = timer.kind;
            let period = timer.period;
            match period {
                Some(period) => {
                    timer.due = due + period;
                    let seq = self.bump_seq();
                    self.queue.push(Reverse((due + period, seq, id)));
                }
                None => {
                    self.timers.remove(&id);
                }
            }
            return Some(Fired { id, at: due, kind });
        }
        None
    }

    fn insert(&mut self, due: Millis, period: Option<Millis>, kind: K) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        let seq = self.bump_seq();
        self.timers.insert(id, Timer { due, period, kind });
        self.queue.push(Reverse((due, seq, id)));
        id
    }

    fn bump_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(s: &mut Scheduler<&'static str>, now: Millis) -> Vec<(Millis, &'static str)> {
        let mut out = Vec::new();
        while let Some(f) = s.pop_due(now) {
            out.push((f.at, f.kind));
        }
        out
    }

    #[test]
    fn test_fires_in_time_order() {
        let mut s = Scheduler::new();
        s.schedule_once(500, "b");
        s.schedule_once(100, "a");
        s.schedule_once(900, "c");
        assert_eq!(drain(&mut s, 600), vec![(100, "a"), (500, "b")]);
        assert_eq!(drain(&mut s, 1000), vec![(900, "c")]);
        assert!(s.is_empty());
    }

    #[test]
    fn test_ties_fire_in_scheduling_order() {
        let mut s = Scheduler::new();
        s.schedule_once(300, "first");
        s.schedule_once(300, "second");
        assert_eq!(drain(&mut s, 300), vec![(300, "first"), (300, "second")]);
    }

    #[test]
    fn test_repeating_timer() {
        let mut s = Scheduler::new();
        let id = s.schedule_repeating(300, 300, "tick");
        assert_eq!(
            drain(&mut s, 1000),
            vec![(300, "tick"), (600, "tick"), (900, "tick")]
        );
        assert_eq!(s.due(id), Some(1200));
    }

    #[test]
    fn test_cancelled_timer_never_fires() {
        let mut s = Scheduler::new();
        let keep = s.schedule_once(100, "keep");
        let drop = s.schedule_once(100, "drop");
        assert!(s.cancel(drop));
        assert!(!s.cancel(drop));
        assert_eq!(drain(&mut s, 200), vec![(100, "keep")]);
        // Fired one-shots are gone
        assert!(!s.cancel(keep));
    }

    #[test]
    fn test_cancel_repeating_mid_stream() {
        let mut s = Scheduler::new();
        let id = s.schedule_repeating(100, 100, "r");
        assert_eq!(drain(&mut s, 250).len(), 2);
        s.cancel(id);
        assert!(drain(&mut s, 10_000).is_empty());
    }

    #[test]
    fn test_cancel_all() {
        let mut s = Scheduler::new();
        s.schedule_repeating(100, 100, "r");
        s.schedule_once(50, "o");
        s.cancel_all();
        assert!(drain(&mut s, 10_000).is_empty());
        // Still usable afterwards
        s.schedule_once(20_000, "late");
        assert_eq!(drain(&mut s, 20_000), vec![(20_000, "late")]);
    }
}
