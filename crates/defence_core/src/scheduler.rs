//! Attack scheduler timer table.
//!
//! One periodic timer per (tower, targeter) pair, keyed by a typed
//! composite key. The table only tracks registration and due times;
//! the firing pipeline itself (activity gate, power check, targeting,
//! effects) lives in the simulation tick loop.
//!
//! Registration is idempotent: scheduling a key that already exists
//! replaces the old timer instead of duplicating it. Timers fire with
//! an initial delay of one full period.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::blocks::BlockId;
use crate::tower::TowerId;

/// Composite identity of a periodic attack timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimerKey {
    /// The tower the targeter is mounted on.
    pub tower: TowerId,
    /// The targeter driven by this timer.
    pub targeter: BlockId,
}

impl TimerKey {
    /// Create a timer key.
    #[must_use]
    pub const fn new(tower: TowerId, targeter: BlockId) -> Self {
        Self { tower, targeter }
    }
}

/// A registered periodic timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
struct ScheduledTimer {
    /// Ticks between firings.
    period: u32,
    /// Tick of the next firing.
    next_fire: u64,
}

/// Periodic timer table for all attack cycles.
///
/// Keys are stored in a `BTreeMap`, so draining due timers walks them
/// in (tower, targeter) order - deterministic across runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AttackScheduler {
    timers: BTreeMap<TimerKey, ScheduledTimer>,
}

impl AttackScheduler {
    /// Create an empty scheduler.
    #[must_use]
    pub fn new() -> Self {
        Self {
            timers: BTreeMap::new(),
        }
    }

    /// Register (or replace) the timer for a key.
    ///
    /// The first firing lands one full period after `now`. Re-scheduling
    /// an existing key cancels and reinstalls rather than duplicating,
    /// which also resets its phase.
    pub fn schedule(&mut self, key: TimerKey, now: u64, period: u32) {
        let period = period.max(1);
        self.timers.insert(
            key,
            ScheduledTimer {
                period,
                next_fire: now + u64::from(period),
            },
        );
    }

    /// Cancel the timer for a key.
    ///
    /// Returns true if a timer was registered.
    pub fn cancel(&mut self, key: TimerKey) -> bool {
        self.timers.remove(&key).is_some()
    }

    /// Cancel every timer belonging to a tower.
    ///
    /// Returns the cancelled keys in table order.
    pub fn cancel_tower(&mut self, tower: TowerId) -> Vec<TimerKey> {
        let keys: Vec<TimerKey> = self
            .timers
            .keys()
            .filter(|key| key.tower == tower)
            .copied()
            .collect();
        for key in &keys {
            self.timers.remove(key);
        }
        keys
    }

    /// Collect the keys due at `now` and advance their next firing.
    ///
    /// A timer whose deadline passed while the field was inactive still
    /// fires only once; its next deadline is pushed past `now`.
    pub fn drain_due(&mut self, now: u64) -> Vec<TimerKey> {
        let mut due = Vec::new();
        for (key, timer) in &mut self.timers {
            if timer.next_fire <= now {
                due.push(*key);
                while timer.next_fire <= now {
                    timer.next_fire += u64::from(timer.period);
                }
            }
        }
        due
    }

    /// Whether a key has a registered timer.
    #[must_use]
    pub fn contains(&self, key: TimerKey) -> bool {
        self.timers.contains_key(&key)
    }

    /// Number of registered timers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.timers.len()
    }

    /// Check if no timers are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Registered keys in table order.
    #[must_use]
    pub fn keys(&self) -> Vec<TimerKey> {
        self.timers.keys().copied().collect()
    }

    /// Remove every timer.
    pub fn clear(&mut self) {
        self.timers.clear();
    }
}
