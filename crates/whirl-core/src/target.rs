//! Target identity and classification.
//!
//! The combat core never owns world objects. It sees each candidate target
//! through a [`TargetInfo`] view: a stable [`TargetId`], the runtime type tag
//! ([`TargetKind`]), the current sub-state ([`TargetState`]) and a position
//! used to anchor effects. [`TargetInfo::classify`] folds kind and sub-state
//! into the semantic [`TargetClassification`] the dispatch rule table is keyed
//! on.
//!
//! # Example
//!
//! ```
//! use whirl_core::target::{TargetClassification, TargetId, TargetInfo, TargetKind, TargetState};
//! use glam::Vec3;
//!
//! let crate_box = TargetInfo::new(TargetId::new(7), TargetKind::Crate, Vec3::ZERO);
//! assert_eq!(crate_box.classify(), TargetClassification::BreakableObstacle);
//!
//! let broken = crate_box.with_state(TargetState::DESTROYED);
//! assert_eq!(broken.classify(), TargetClassification::Unclassified);
//! ```

use bitflags::bitflags;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Target Identity
// =============================================================================

/// Stable identity of a world object for the lifetime of an activation.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TargetId(u64);

impl TargetId {
    /// Creates a new `TargetId` from a raw value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw value of this identifier.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TargetId({})", self.0)
    }
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for TargetId {
    fn from(id: u64) -> Self {
        Self::new(id)
    }
}

// =============================================================================
// Runtime Kind and Sub-State
// =============================================================================

/// Runtime type tag reported by a world object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetKind {
    /// Wooden crate.
    Crate,
    /// Cracked boulder.
    Boulder,
    /// Frozen block.
    IceBlock,
    /// Shielded knight with a guard stance.
    Knight,
    /// Loose coin.
    Coin,
    /// Throwable gem.
    Gem,
    /// Lever switch.
    Lever,
    /// Floor pressure plate.
    PressurePlate,
    /// Basic walking enemy.
    Grunt,
    /// Shelled enemy that can be flipped.
    Beetle,
    /// Barrel, sign, or other pushable map object.
    Prop,
    /// Mine cart or mount.
    Cart,
    /// Solid wall or fence that only reacts to wall contact.
    Wall,
    /// Anything the core has no knowledge of.
    Unknown,
}

bitflags! {
    /// Sub-state flags reported alongside a target's kind.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct TargetState: u16 {
        /// Already destroyed or despawning.
        const DESTROYED   = 1 << 0;
        /// Currently held by the player.
        const CARRIED     = 1 << 1;
        /// Raising its guard (guard-start animation).
        const GUARD_START = 1 << 2;
        /// Holding its guard.
        const GUARDING    = 1 << 3;
        /// Flipped onto its back.
        const FLIPPED     = 1 << 4;
        /// Being ridden by the player.
        const RIDDEN      = 1 << 5;
        /// Already toggled and locked.
        const LOCKED      = 1 << 6;
    }
}

// =============================================================================
// Classification
// =============================================================================

/// Semantic category the dispatch rule table is keyed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetClassification {
    /// Destroyed in one hit.
    BreakableObstacle,
    /// Large enemy with a guard stance and a finishing blow.
    LargeGuardedEnemy,
    /// Collectible that can be grabbed and carried.
    CarryableCollectible,
    /// Toggled by a hit.
    Switch,
    /// Generic enemy body.
    EnemyBody,
    /// Generic pushable map object.
    MapObject,
    /// Vehicle or mount.
    RideObject,
    /// Only reacts to wall collision.
    WallOnly,
    /// No rule applies; the caller's default collision handling runs.
    Unclassified,
}

impl fmt::Display for TargetClassification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::BreakableObstacle => "breakable_obstacle",
            Self::LargeGuardedEnemy => "large_guarded_enemy",
            Self::CarryableCollectible => "carryable_collectible",
            Self::Switch => "switch",
            Self::EnemyBody => "enemy_body",
            Self::MapObject => "map_object",
            Self::RideObject => "ride_object",
            Self::WallOnly => "wall_only",
            Self::Unclassified => "unclassified",
        };
        write!(f, "{name}")
    }
}

/// Read-only view of a candidate target for one dispatch call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetInfo {
    /// Stable identity.
    pub id: TargetId,
    /// Runtime type tag.
    pub kind: TargetKind,
    /// Current sub-state.
    pub state: TargetState,
    /// World position, used to anchor effects.
    pub position: Vec3,
}

impl TargetInfo {
    /// Creates a view with an empty sub-state.
    #[must_use]
    pub const fn new(id: TargetId, kind: TargetKind, position: Vec3) -> Self {
        Self {
            id,
            kind,
            state: TargetState::empty(),
            position,
        }
    }

    /// Returns a copy with the given sub-state.
    #[must_use]
    pub const fn with_state(mut self, state: TargetState) -> Self {
        self.state = state;
        self
    }

    /// Classifies the target from its kind and sub-state.
    ///
    /// Destroyed, carried and ridden objects are unclassified so the hit falls
    /// through to default handling. A flipped beetle can be carried.
    #[must_use]
    pub fn classify(&self) -> TargetClassification {
        if self
            .state
            .intersects(TargetState::DESTROYED | TargetState::CARRIED | TargetState::RIDDEN)
        {
            return TargetClassification::Unclassified;
        }

        match self.kind {
            TargetKind::Crate | TargetKind::Boulder | TargetKind::IceBlock => {
                TargetClassification::BreakableObstacle
            }
            TargetKind::Knight => TargetClassification::LargeGuardedEnemy,
            TargetKind::Coin | TargetKind::Gem => TargetClassification::CarryableCollectible,
            TargetKind::Lever | TargetKind::PressurePlate => {
                if self.state.contains(TargetState::LOCKED) {
                    TargetClassification::WallOnly
                } else {
                    TargetClassification::Switch
                }
            }
            TargetKind::Grunt => TargetClassification::EnemyBody,
            TargetKind::Beetle => {
                if self.state.contains(TargetState::FLIPPED) {
                    TargetClassification::CarryableCollectible
                } else {
                    TargetClassification::EnemyBody
                }
            }
            TargetKind::Prop => TargetClassification::MapObject,
            TargetKind::Cart => TargetClassification::RideObject,
            TargetKind::Wall => TargetClassification::WallOnly,
            TargetKind::Unknown => TargetClassification::Unclassified,
        }
    }
}
