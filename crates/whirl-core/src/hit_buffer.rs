//! Per-activation hit buffer.
//!
//! The hit buffer is a bounded, insertion-ordered set of targets already
//! credited during the live activation. The dispatch engine consults it before
//! crediting any hit through any channel of the same activation, giving
//! at-most-once hit semantics per target.
//!
//! A full buffer is a soft failure: the insert is dropped with a warning. The
//! buffer exists to prevent double hits, not to cap how many targets an
//! attack may reach.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::target::TargetId;

/// Capacity of the hit buffer in the reference tuning.
pub const DEFAULT_HIT_CAPACITY: usize = 64;

/// Outcome of [`HitBuffer::insert`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HitInsert {
    /// The target was recorded.
    Inserted,
    /// The target was already recorded.
    Duplicate,
    /// The buffer is at capacity and the target was dropped.
    Full,
}

/// Bounded insertion-ordered set of credited targets.
///
/// # Example
///
/// ```
/// use whirl_core::hit_buffer::{HitBuffer, HitInsert};
/// use whirl_core::target::TargetId;
///
/// let mut hits = HitBuffer::with_capacity(2);
/// assert_eq!(hits.insert(TargetId::new(1)), HitInsert::Inserted);
/// assert_eq!(hits.insert(TargetId::new(1)), HitInsert::Duplicate);
/// assert_eq!(hits.insert(TargetId::new(2)), HitInsert::Inserted);
/// assert_eq!(hits.insert(TargetId::new(3)), HitInsert::Full);
/// assert_eq!(hits.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitBuffer {
    entries: Vec<TargetId>,
    capacity: usize,
}

impl HitBuffer {
    /// Creates an empty buffer holding at most `capacity` targets.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Records a target unless it is already present or the buffer is full.
    pub fn insert(&mut self, target: TargetId) -> HitInsert {
        if self.contains(target) {
            return HitInsert::Duplicate;
        }
        if self.is_full() {
            warn!(%target, capacity = self.capacity, "hit buffer full, dropping credit record");
            return HitInsert::Full;
        }
        self.entries.push(target);
        HitInsert::Inserted
    }

    /// Returns true if the target has been credited this activation.
    #[must_use]
    pub fn contains(&self, target: TargetId) -> bool {
        self.entries.contains(&target)
    }

    /// Forgets every recorded target.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of recorded targets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns true if no further targets can be recorded.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.capacity
    }

    /// Maximum number of targets.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Recorded targets in insertion order.
    #[must_use]
    pub fn as_slice(&self) -> &[TargetId] {
        &self.entries
    }
}

impl Default for HitBuffer {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_HIT_CAPACITY)
    }
}
