//! Simulated timer queue
//!
//! Every delayed or periodic callback in a session goes through here instead of
//! platform timers. Time only moves when the host calls [`TimerQueue::pop_due`]
//! or [`TimerQueue::advance_to`], so firing order is reproducible:
//! earlier due time first, ties broken by scheduling order.

use std::cmp::Reverse;
use std::collections::{BTreeMap, BinaryHeap};

use super::state::EntityId;

/// Cancellation handle returned by every scheduling call
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(u64);

/// What a timer does when it fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// Periodic spawn attempt
    Spawn,
    /// Periodic one-second countdown
    Clock,
    /// An entity's time-to-live elapsed
    Expire(EntityId),
    /// A bucket power-up window closed
    BucketClear,
}

#[derive(Debug, Clone)]
struct Timer {
    kind: TimerKind,
    due_ms: u64,
    /// Some(period) for repeating timers
    period_ms: Option<u64>,
}

/// A fired timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fired {
    pub id: TimerId,
    pub kind: TimerKind,
    pub at_ms: u64,
}

#[derive(Debug, Default)]
pub struct TimerQueue {
    now_ms: u64,
    next_seq: u64,
    /// (due, seq, id); entries whose timer was cancelled or re-armed are skipped lazily
    heap: BinaryHeap<Reverse<(u64, u64, TimerId)>>,
    live: BTreeMap<TimerId, Timer>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current simulated time
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Number of timers that can still fire
    pub fn pending(&self) -> usize {
        self.live.len()
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.live.contains_key(&id)
    }

    /// Fire once after `delay_ms`
    pub fn schedule_once(&mut self, delay_ms: u64, kind: TimerKind) -> TimerId {
        self.insert(delay_ms, None, kind)
    }

    /// Fire every `period_ms`, first after one full period
    pub fn schedule_every(&mut self, period_ms: u64, kind: TimerKind) -> TimerId {
        let period_ms = period_ms.max(1);
        self.insert(period_ms, Some(period_ms), kind)
    }

    fn insert(&mut self, delay_ms: u64, period_ms: Option<u64>, kind: TimerKind) -> TimerId {
        let seq = self.bump_seq();
        let id = TimerId(seq);
        let due_ms = self.now_ms + delay_ms;
        self.live.insert(
            id,
            Timer {
                kind,
                due_ms,
                period_ms,
            },
        );
        self.heap.push(Reverse((due_ms, seq, id)));
        log::trace!("timer {id:?} {kind:?} due at {due_ms}ms");
        id
    }

    fn bump_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }

    /// Cancel a timer. Cancelling one that already fired or was cancelled is a no-op.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        self.live.remove(&id).is_some()
    }

    /// Drop every outstanding timer
    pub fn cancel_all(&mut self) {
        if !self.live.is_empty() {
            log::trace!("cancelling {} timers", self.live.len());
        }
        self.live.clear();
        self.heap.clear();
    }

    /// Pop the next timer due at or before `until_ms`, moving the clock to its due time.
    ///
    /// Repeating timers are re-armed before being returned, so a callback that
    /// cancels its own timer stops it cleanly.
    pub fn pop_due(&mut self, until_ms: u64) -> Option<Fired> {
        loop {
            let Reverse((due_ms, _, id)) = *self.heap.peek()?;
            if due_ms > until_ms {
                return None;
            }
            self.heap.pop();

            let Some(timer) = self.live.get(&id) else {
                continue; // cancelled
            };
            if timer.due_ms != due_ms {
                continue; // superseded by a re-arm
            }
            let kind = timer.kind;
            let period_ms = timer.period_ms;

            self.now_ms = self.now_ms.max(due_ms);
            match period_ms {
                Some(period) => {
                    let next_due = due_ms + period;
                    let next_seq = self.bump_seq();
                    if let Some(timer) = self.live.get_mut(&id) {
                        timer.due_ms = next_due;
                    }
                    self.heap.push(Reverse((next_due, next_seq, id)));
                }
                None => {
                    self.live.remove(&id);
                }
            }
            return Some(Fired {
                id,
                kind,
                at_ms: due_ms,
            });
        }
    }

    /// Move the clock forward without firing anything (call after draining `pop_due`)
    pub fn advance_to(&mut self, ms: u64) {
        self.now_ms = self.now_ms.max(ms);
    }
}
