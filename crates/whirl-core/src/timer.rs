//! Frame timer registry.
//!
//! Every hit window, and the telegraph used by the rethrow protocol, is
//! bounded by a named countdown that is advanced exactly once per simulation
//! tick. This module provides:
//!
//! - [`FrameTimer`]: a single countdown (`Inactive | Pending | Counting(n)`)
//! - [`TimerId`]: the names of every countdown the controller owns
//! - [`TimerRegistry`]: independent storage for all registered timers
//!
//! # Raw Encoding
//!
//! Tuning tables and debug overlays use the integer encoding `-1` (inactive),
//! `-2` (requested, not yet started) and `n > 0` (frames remaining).
//! [`FrameTimer::from_raw`] and [`FrameTimer::as_raw`] convert between the two.
//!
//! # Example
//!
//! ```
//! use whirl_core::timer::{TimerId, TimerRegistry};
//!
//! let mut timers = TimerRegistry::with_all();
//! timers.start(TimerId::Spin, 2);
//!
//! assert!(!timers.tick(TimerId::Spin));
//! assert!(timers.tick(TimerId::Spin)); // reaches zero this tick
//! assert!(!timers.is_active(TimerId::Spin));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Frame Timer
// =============================================================================

/// A single frame countdown.
///
/// The tagged form replaces the sentinel integers: `Inactive` is `-1`,
/// `Pending` is `-2` and `Counting(n)` is `n`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FrameTimer {
    /// Not running.
    #[default]
    Inactive,
    /// Requested but not yet started. Only the telegraph uses this state.
    Pending,
    /// Counting down; the payload is the number of frames remaining.
    Counting(u32),
}

impl FrameTimer {
    /// Raw encoding of [`FrameTimer::Inactive`].
    pub const RAW_INACTIVE: i32 = -1;
    /// Raw encoding of [`FrameTimer::Pending`].
    pub const RAW_PENDING: i32 = -2;

    /// Decodes the sentinel integer encoding.
    ///
    /// `0` and any negative value other than `-2` decode as inactive.
    #[must_use]
    pub fn from_raw(raw: i32) -> Self {
        match raw {
            Self::RAW_PENDING => Self::Pending,
            n if n > 0 => Self::Counting(n.unsigned_abs()),
            _ => Self::Inactive,
        }
    }

    /// Encodes this timer using the sentinel integer encoding.
    #[must_use]
    pub fn as_raw(self) -> i32 {
        match self {
            Self::Inactive => Self::RAW_INACTIVE,
            Self::Pending => Self::RAW_PENDING,
            Self::Counting(n) => i32::try_from(n).unwrap_or(i32::MAX),
        }
    }

    /// Returns true while counting down or pending.
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Pending | Self::Counting(_))
    }

    /// Returns true if the timer has been requested but not started.
    #[must_use]
    pub const fn is_pending(self) -> bool {
        matches!(self, Self::Pending)
    }

    /// Returns the frames remaining, if counting.
    #[must_use]
    pub const fn remaining(self) -> Option<u32> {
        match self {
            Self::Counting(n) => Some(n),
            _ => None,
        }
    }

    /// Starts counting down from `frames`. A zero-frame start leaves the timer inactive.
    pub fn start(&mut self, frames: u32) {
        *self = if frames == 0 {
            Self::Inactive
        } else {
            Self::Counting(frames)
        };
    }

    /// Marks the timer as requested without starting it.
    pub fn request(&mut self) {
        *self = Self::Pending;
    }

    /// Moves a pending timer into its countdown.
    ///
    /// Returns true if the timer was pending. Any other state is left untouched.
    pub fn promote(&mut self, frames: u32) -> bool {
        if self.is_pending() {
            self.start(frames);
            true
        } else {
            false
        }
    }

    /// Advances the countdown by one frame.
    ///
    /// Returns true on exactly the tick the countdown reaches zero, at which
    /// point the timer becomes inactive. Inactive and pending timers are not
    /// affected.
    pub fn tick(&mut self) -> bool {
        match *self {
            Self::Counting(n) if n <= 1 => {
                *self = Self::Inactive;
                true
            }
            Self::Counting(n) => {
                *self = Self::Counting(n - 1);
                false
            }
            Self::Inactive | Self::Pending => false,
        }
    }

    /// Stops the timer.
    pub fn clear(&mut self) {
        *self = Self::Inactive;
    }
}

impl fmt::Display for FrameTimer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inactive => write!(f, "inactive"),
            Self::Pending => write!(f, "pending"),
            Self::Counting(n) => write!(f, "{n}f"),
        }
    }
}

// =============================================================================
// Timer Identification
// =============================================================================

/// Names of the countdowns owned by the combat controller.
///
/// One timer exists per attack channel plus the telegraph (fakethrow) timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TimerId {
    /// Weak grab window of the Special variant.
    Grab,
    /// Main spin window.
    Spin,
    /// Rotational double-strike window.
    DoubleSpin,
    /// Taunt flourish window.
    Strike,
    /// Heavy weapon slam window.
    GroundSlam,
    /// Guard inspection window.
    GuardWatch,
    /// Visual-only charge window shown by the telegraph.
    Charge,
    /// Telegraph (fakethrow) countdown.
    Telegraph,
}

impl TimerId {
    /// Number of distinct timer ids.
    pub const COUNT: usize = 8;

    /// Every timer id in registry order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::Grab,
        Self::Spin,
        Self::DoubleSpin,
        Self::Strike,
        Self::GroundSlam,
        Self::GuardWatch,
        Self::Charge,
        Self::Telegraph,
    ];

    /// Returns the registry slot for this id.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Grab => "grab",
            Self::Spin => "spin",
            Self::DoubleSpin => "double_spin",
            Self::Strike => "strike",
            Self::GroundSlam => "ground_slam",
            Self::GuardWatch => "guard_watch",
            Self::Charge => "charge",
            Self::Telegraph => "telegraph",
        };
        write!(f, "{name}")
    }
}

// =============================================================================
// Timer Registry
// =============================================================================

/// Independent storage for every registered frame timer.
///
/// A timer must be registered before it is used. Touching an unregistered
/// timer is an invariant violation: it trips a debug assertion and is
/// otherwise ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerRegistry {
    slots: [Option<FrameTimer>; TimerId::COUNT],
}

impl TimerRegistry {
    /// Creates an empty registry with no timers registered.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with every [`TimerId`] registered and inactive.
    #[must_use]
    pub fn with_all() -> Self {
        let mut registry = Self::new();
        for id in TimerId::ALL {
            registry.register(id);
        }
        registry
    }

    /// Registers a timer. Registering an existing timer resets it to inactive.
    pub fn register(&mut self, id: TimerId) {
        self.slots[id.index()] = Some(FrameTimer::Inactive);
    }

    /// Returns true if the timer has been registered.
    #[must_use]
    pub fn is_registered(&self, id: TimerId) -> bool {
        self.slots[id.index()].is_some()
    }

    fn slot_mut(&mut self, id: TimerId) -> Option<&mut FrameTimer> {
        let slot = self.slots[id.index()].as_mut();
        debug_assert!(slot.is_some(), "timer {id} used before registration");
        slot
    }

    /// Returns the current value of a timer (inactive if unregistered).
    #[must_use]
    pub fn get(&self, id: TimerId) -> FrameTimer {
        self.slots[id.index()].unwrap_or_default()
    }

    /// Starts a timer counting down from `frames`.
    pub fn start(&mut self, id: TimerId, frames: u32) {
        if let Some(timer) = self.slot_mut(id) {
            timer.start(frames);
        }
    }

    /// Marks a timer as requested but not started.
    pub fn request(&mut self, id: TimerId) {
        if let Some(timer) = self.slot_mut(id) {
            timer.request();
        }
    }

    /// Promotes a pending timer into its countdown. Returns true if it was pending.
    pub fn promote(&mut self, id: TimerId, frames: u32) -> bool {
        self.slot_mut(id).is_some_and(|timer| timer.promote(frames))
    }

    /// Decrements a timer, returning true on the tick it reaches zero.
    pub fn tick(&mut self, id: TimerId) -> bool {
        self.slot_mut(id).is_some_and(FrameTimer::tick)
    }

    /// Stops a timer.
    pub fn clear(&mut self, id: TimerId) {
        if let Some(timer) = self.slot_mut(id) {
            timer.clear();
        }
    }

    /// Returns true if the timer is counting down or pending.
    #[must_use]
    pub fn is_active(&self, id: TimerId) -> bool {
        self.get(id).is_active()
    }

    /// Iterates over every registered timer and its value.
    pub fn iter(&self) -> impl Iterator<Item = (TimerId, FrameTimer)> + '_ {
        TimerId::ALL
            .into_iter()
            .filter_map(|id| self.slots[id.index()].map(|timer| (id, timer)))
    }
}
