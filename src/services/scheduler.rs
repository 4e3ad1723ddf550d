//! Virtual timer queue
//!
//! Every delayed transition in the page (toast fades, add-to-cart steps,
//! chat typing, tooltip frames) is an event scheduled here. The queue reads
//! time from a [`Clock`], so tests drive it with a [`ManualClock`] instead of
//! waiting.

use std::cell::Cell;
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Source of monotonic time, measured from an arbitrary origin
pub trait Clock {
    fn now(&self) -> Duration;
}

/// Wall clock backed by [`Instant`]
pub struct SystemClock {
    origin: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Hand-driven clock; clones share the same time
#[derive(Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    pub fn advance_ms(&self, ms: u64) {
        self.advance(Duration::from_millis(ms));
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

/// Handle for cancelling a scheduled event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

/// Queue of events waiting for their deadline
///
/// Due events come out ordered by deadline, and events sharing a deadline
/// come out in the order they were scheduled.
pub struct Scheduler<E> {
    clock: Box<dyn Clock>,
    queue: BTreeMap<(Duration, u64), E>,
    deadlines: HashMap<u64, Duration>,
    next_seq: u64,
}

impl<E> Scheduler<E> {
    pub fn new(clock: Box<dyn Clock>) -> Self {
        Self {
            clock,
            queue: BTreeMap::new(),
            deadlines: HashMap::new(),
            next_seq: 0,
        }
    }

    pub fn now(&self) -> Duration {
        self.clock.now()
    }

    /// Schedule `event` to become due after `delay`
    pub fn schedule(&mut self, delay: Duration, event: E) -> TimerId {
        let seq = self.next_seq;
        self.next_seq += 1;
        let deadline = self.clock.now() + delay;
        self.queue.insert((deadline, seq), event);
        self.deadlines.insert(seq, deadline);
        TimerId(seq)
    }

    pub fn schedule_ms(&mut self, ms: u64, event: E) -> TimerId {
        self.schedule(Duration::from_millis(ms), event)
    }

    /// Cancel a pending event; returns false if it already fired or was cancelled
    pub fn cancel(&mut self, id: TimerId) -> bool {
        match self.deadlines.remove(&id.0) {
            Some(deadline) => self.queue.remove(&(deadline, id.0)).is_some(),
            None => false,
        }
    }

    /// Take the earliest event whose deadline has passed
    pub fn pop_due(&mut self) -> Option<E> {
        let now = self.clock.now();
        let (&(deadline, seq), _) = self.queue.first_key_value()?;
        if deadline > now {
            return None;
        }
        self.deadlines.remove(&seq);
        self.queue.remove(&(deadline, seq))
    }

    /// Take every event due now, in delivery order
    pub fn drain_due(&mut self) -> Vec<E> {
        let mut due = Vec::new();
        while let Some(event) = self.pop_due() {
            due.push(event);
        }
        due
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Drop every pending event
    pub fn clear(&mut self) {
        self.queue.clear();
        self.deadlines.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scheduler() -> (ManualClock, Scheduler<&'static str>) {
        let clock = ManualClock::new();
        (clock.clone(), Scheduler::new(Box::new(clock)))
    }

    #[test]
    fn test_nothing_is_due_before_deadline() {
        let (clock, mut sched) = scheduler();
        sched.schedule_ms(100, "a");
        clock.advance_ms(99);
        assert_eq!(sched.pop_due(), None);
        clock.advance_ms(1);
        assert_eq!(sched.pop_due(), Some("a"));
        assert_eq!(sched.pending(), 0);
    }

    #[test]
    fn test_due_events_ordered_by_deadline_then_insertion() {
        let (clock, mut sched) = scheduler();
        sched.schedule_ms(300, "late");
        sched.schedule_ms(100, "first");
        sched.schedule_ms(100, "second");
        sched.schedule_ms(50, "earliest");
        clock.advance_ms(1000);
        assert_eq!(sched.drain_due(), vec!["earliest", "first", "second", "late"]);
    }

    #[test]
    fn test_cancel_removes_event() {
        let (clock, mut sched) = scheduler();
        let keep = sched.schedule_ms(10, "keep");
        let dropped = sched.schedule_ms(10, "drop");
        assert!(sched.cancel(dropped));
        assert!(!sched.cancel(dropped));
        clock.advance_ms(10);
        assert_eq!(sched.drain_due(), vec!["keep"]);
        assert!(!sched.cancel(keep));
    }

    #[test]
    fn test_deadline_measured_from_schedule_time() {
        let (clock, mut sched) = scheduler();
        clock.advance_ms(500);
        sched.schedule_ms(100, "x");
        clock.advance_ms(99);
        assert!(sched.drain_due().is_empty());
        clock.advance_ms(1);
        assert_eq!(sched.drain_due(), vec!["x"]);
    }

    #[test]
    fn test_clear_drops_everything() {
        let (clock, mut sched) = scheduler();
        sched.schedule_ms(1, "a");
        sched.schedule_ms(2, "b");
        sched.clear();
        clock.advance_ms(10);
        assert_eq!(sched.pending(), 0);
        assert!(sched.drain_due().is_empty());
    }
}
