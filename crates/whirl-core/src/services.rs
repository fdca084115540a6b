//! Collaborator interfaces.
//!
//! Animation playback, physics queries, actor status and the world's target
//! registry all live outside the combat core. The controller consumes them
//! through the traits in this module and only ever reads boolean/enum/vector
//! answers or sends one-way messages.
//!
//! # Implementing
//!
//! Hosts implement each trait over their own engine objects and bundle
//! borrowed trait objects in a [`Collaborators`] for every call to
//! [`CombatController::advance`](crate::controller::CombatController::advance).
//!
//! ```
//! use whirl_core::services::ActorGate;
//!
//! struct Hero {
//!     respawning: bool,
//! }
//!
//! impl ActorGate for Hero {
//!     fn is_exclusive_action(&self) -> bool { false }
//!     fn is_respawning(&self) -> bool { self.respawning }
//!     fn is_equipment_restricted(&self) -> bool { false }
//!     fn is_carrying(&self) -> bool { false }
//! }
//!
//! assert!(Hero { respawning: false }.can_start_attack());
//! assert!(!Hero { respawning: true }.can_start_attack());
//! ```

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::channel::ChannelId;
use crate::message::TargetMessage;
use crate::target::{TargetId, TargetInfo};

/// Secondary actors attached for scripted states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Prop {
    /// Heavy weapon shown during the heavy attack.
    Hammer,
    /// Flag waved during the taunt.
    Flag,
}

/// Animation playback.
pub trait Animator {
    /// Returns true while the named clip is playing and not finished.
    fn is_playing(&self, clip: &str) -> bool;

    /// Returns true once the current full-body clip has finished.
    fn is_finished(&self) -> bool;

    /// Plays a full-body clip.
    fn play(&mut self, clip: &str);

    /// Plays a clip on the upper body only.
    fn play_upper_body(&mut self, clip: &str);

    /// Attaches a secondary actor.
    fn attach(&mut self, prop: Prop);

    /// Detaches a secondary actor.
    fn detach(&mut self, prop: Prop);
}

/// Physics and contact queries about the attacking actor.
pub trait Physics {
    /// Standing on ground.
    fn is_grounded(&self) -> bool;

    /// Fully under water.
    fn is_submerged(&self) -> bool;

    /// Floating at the water surface.
    fn is_at_water_surface(&self) -> bool;

    /// Current velocity.
    fn velocity(&self) -> Vec3;

    /// Current position.
    fn position(&self) -> Vec3;

    /// Distance to a target, if the target is known to physics.
    fn distance_to(&self, target: TargetId) -> Option<f32>;
}

/// Actor-level preconditions for starting any attack.
pub trait ActorGate {
    /// Performing an action that excludes attacking (cutscene, ledge grab, ...).
    fn is_exclusive_action(&self) -> bool;

    /// Mid-respawn.
    fn is_respawning(&self) -> bool;

    /// Equipment that forbids attacking is worn.
    fn is_equipment_restricted(&self) -> bool;

    /// Holding an object.
    fn is_carrying(&self) -> bool;

    /// The "can any attack start" predicate.
    fn can_start_attack(&self) -> bool {
        !self.is_exclusive_action() && !self.is_respawning() && !self.is_equipment_restricted()
    }
}

/// World-side view of targets.
pub trait TargetWorld {
    /// Targets currently colliding with a channel's hit region.
    fn contacts(&self, channel: ChannelId) -> Vec<TargetId>;

    /// Capability view of a target, or `None` if it no longer exists.
    fn describe(&self, target: TargetId) -> Option<TargetInfo>;

    /// Sends a one-way message. Returns true if the target handled it.
    fn send(&mut self, target: TargetId, message: TargetMessage) -> bool;
}

/// Borrowed collaborators for one controller tick.
pub struct Collaborators<'a> {
    /// Animation playback.
    pub animator: &'a mut dyn Animator,
    /// Physics queries.
    pub physics: &'a dyn Physics,
    /// Actor preconditions.
    pub actor: &'a dyn ActorGate,
    /// Target registry and messaging.
    pub world: &'a mut dyn TargetWorld,
}
