//! Per-target guard counters.
//!
//! Large guarded enemies take a finishing blow only after enough consecutive
//! guard breaks. The counter for a target increases once per credited guard
//! break (which only happens while the target is observed guarding) and is
//! reset whenever the target is observed raising its guard anew, or after the
//! finishing blow lands.

use std::collections::BTreeMap;

use crate::target::{TargetId, TargetInfo, TargetState};

/// Consecutive guard-break counters keyed by target.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GuardTracker {
    counters: BTreeMap<TargetId, u32>,
    threshold: u32,
}

impl GuardTracker {
    /// Creates a tracker whose finishing blow unlocks at `threshold` breaks.
    #[must_use]
    pub fn new(threshold: u32) -> Self {
        Self {
            counters: BTreeMap::new(),
            threshold,
        }
    }

    /// Observes a target's sub-state. A guard-start resets its counter.
    pub fn observe(&mut self, target: &TargetInfo) {
        if target.state.contains(TargetState::GUARD_START) {
            self.counters.remove(&target.id);
        }
    }

    /// Records one more guard break and returns the new count.
    pub fn record_break(&mut self, target: TargetId) -> u32 {
        let count = self.counters.entry(target).or_insert(0);
        *count += 1;
        *count
    }

    /// Current consecutive guard breaks for a target.
    #[must_use]
    pub fn count(&self, target: TargetId) -> u32 {
        self.counters.get(&target).copied().unwrap_or(0)
    }

    /// Returns true once the finishing blow takes priority.
    #[must_use]
    pub fn finisher_ready(&self, target: TargetId) -> bool {
        self.count(target) >= self.threshold
    }

    /// Forgets one target.
    pub fn reset(&mut self, target: TargetId) {
        self.counters.remove(&target);
    }

    /// Forgets targets for which `alive` returns false. Returns how many
    /// counters were dropped.
    pub fn prune(&mut self, mut alive: impl FnMut(TargetId) -> bool) -> usize {
        let before = self.counters.len();
        self.counters.retain(|id, _| alive(*id));
        before - self.counters.len()
    }

    /// Number of targets with a live counter.
    #[must_use]
    pub fn len(&self) -> usize {
        self.counters.len()
    }

    /// Returns true if no target has a counter.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counters.is_empty()
    }

    /// Forgets every target.
    pub fn clear(&mut self) {
        self.counters.clear();
    }

    /// Number of breaks that unlock the finishing blow.
    #[must_use]
    pub const fn threshold(&self) -> u32 {
        self.threshold
    }
}
