//! Attack channel set.
//!
//! A channel is a named hit-detection region tied to one attack variant. Each
//! channel is independently enabled and disabled and is backed by a frame
//! timer in the [`TimerRegistry`]. When that timer reaches zero the channel is
//! invalidated automatically, so every variant has a hard upper bound on how
//! long it can register hits regardless of animation length.
//!
//! # Example
//!
//! ```
//! use whirl_core::channel::{ChannelId, ChannelSet};
//! use whirl_core::timer::TimerRegistry;
//!
//! let mut timers = TimerRegistry::with_all();
//! let mut channels = ChannelSet::new();
//!
//! channels.validate(ChannelId::Spin, 1, &mut timers);
//! assert!(channels.is_enabled(ChannelId::Spin));
//!
//! let expired = channels.tick(&mut timers);
//! assert_eq!(expired, vec![ChannelId::Spin]);
//! assert!(!channels.is_enabled(ChannelId::Spin));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::timer::{TimerId, TimerRegistry};

// =============================================================================
// Channel Identification
// =============================================================================

/// Named hit-detection channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ChannelId {
    /// Weak grab of the Special variant.
    Grab,
    /// Main spin used by Standard ground, air, aquatic and carrying spins.
    Spin,
    /// Rotational double strike of the Double variant.
    DoubleSpin,
    /// Taunt flourish.
    Strike,
    /// Heavy weapon slam.
    GroundSlam,
    /// Inspection of already-hit large enemies (guard tracking).
    GuardWatch,
    /// Visual-only charge shown by the telegraph. Never dispatched.
    Charge,
}

impl ChannelId {
    /// Number of distinct channels.
    pub const COUNT: usize = 7;

    /// Every channel in dispatch order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::Grab,
        Self::Spin,
        Self::DoubleSpin,
        Self::Strike,
        Self::GroundSlam,
        Self::GuardWatch,
        Self::Charge,
    ];

    /// Returns the timer that bounds this channel's window.
    #[must_use]
    pub const fn timer(self) -> TimerId {
        match self {
            Self::Grab => TimerId::Grab,
            Self::Spin => TimerId::Spin,
            Self::DoubleSpin => TimerId::DoubleSpin,
            Self::Strike => TimerId::Strike,
            Self::GroundSlam => TimerId::GroundSlam,
            Self::GuardWatch => TimerId::GuardWatch,
            Self::Charge => TimerId::Charge,
        }
    }

    /// Channels that only drive presentation and never reach the dispatch engine.
    #[must_use]
    pub const fn is_visual_only(self) -> bool {
        matches!(self, Self::Charge)
    }

    /// Channels allowed to re-check targets already in the hit buffer.
    #[must_use]
    pub const fn is_always_recheckable(self) -> bool {
        matches!(self, Self::GuardWatch)
    }

    /// Channels that deal damage.
    #[must_use]
    pub const fn is_damaging(self) -> bool {
        matches!(
            self,
            Self::Spin | Self::DoubleSpin | Self::Strike | Self::GroundSlam
        )
    }

    const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.timer())
    }
}

// =============================================================================
// Channel Set
// =============================================================================

/// Enable flags for every [`ChannelId`].
///
/// The set does not own the timers. The controller keeps one
/// [`TimerRegistry`] for channel windows and the telegraph and lends it to
/// the set for each operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelSet {
    enabled: [bool; ChannelId::COUNT],
}

impl ChannelSet {
    /// Creates a set with every channel disabled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables a channel and starts its owning timer with `frames`.
    pub fn validate(&mut self, channel: ChannelId, frames: u32, timers: &mut TimerRegistry) {
        timers.start(channel.timer(), frames);
        self.enabled[channel.index()] = frames > 0;
    }

    /// Disables a channel and stops its owning timer.
    pub fn invalidate(&mut self, channel: ChannelId, timers: &mut TimerRegistry) {
        self.enabled[channel.index()] = false;
        timers.clear(channel.timer());
    }

    /// Disables every channel and stops every channel timer.
    pub fn invalidate_all(&mut self, timers: &mut TimerRegistry) {
        for channel in ChannelId::ALL {
            self.invalidate(channel, timers);
        }
    }

    /// Ticks the timer of every enabled channel.
    ///
    /// Channels whose timer reaches zero are invalidated before this returns,
    /// and are reported in dispatch order.
    pub fn tick(&mut self, timers: &mut TimerRegistry) -> Vec<ChannelId> {
        let mut expired = Vec::new();
        for channel in ChannelId::ALL {
            if self.is_enabled(channel) && timers.tick(channel.timer()) {
                self.enabled[channel.index()] = false;
                expired.push(channel);
            }
        }
        expired
    }

    /// Returns true if the channel is enabled.
    #[must_use]
    pub fn is_enabled(&self, channel: ChannelId) -> bool {
        self.enabled[channel.index()]
    }

    /// Returns true if any channel that reaches the dispatch engine is enabled.
    #[must_use]
    pub fn any_hit_channel(&self) -> bool {
        self.hit_channels().next().is_some()
    }

    /// Iterates over the enabled channels that reach the dispatch engine.
    pub fn hit_channels(&self) -> impl Iterator<Item = ChannelId> + '_ {
        ChannelId::ALL
            .into_iter()
            .filter(|channel| !channel.is_visual_only() && self.is_enabled(*channel))
    }

    /// Iterates over every enabled channel, visual-only ones included.
    pub fn enabled(&self) -> impl Iterator<Item = ChannelId> + '_ {
        ChannelId::ALL
            .into_iter()
            .filter(|channel| self.is_enabled(*channel))
    }
}
