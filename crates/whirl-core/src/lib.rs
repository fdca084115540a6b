//! # Whirl Core
//!
//! Spin attack coordinator and hit resolution for a real-time action-game
//! character.
//!
//! The crate drives a multi-variant melee spin (ground, air and aquatic
//! spins, a grab spin and a directional double spin) plus a scripted heavy
//! attack and a taunt, and decides for every enabled attack channel which
//! world object is credited a hit and what message it receives.
//!
//! ## Architecture
//!
//! - **Timers** ([`timer`]): typed frame countdowns with inactive/pending states
//! - **Channels** ([`channel`]): timed hit-detection regions
//! - **Hit buffer** ([`hit_buffer`]): at-most-once crediting per activation
//! - **Input** ([`input`]): raw buttons and stick to semantic intents
//! - **Controller** ([`controller`]): the per-frame attack state machine
//! - **Dispatch** ([`dispatch`]): ordered rule table with a guard tie-break
//!
//! Animation, physics, actor status and target messaging are collaborators
//! reached through the traits in [`services`].
//!
//! ## Usage
//!
//! ```rust,ignore
//! use whirl_core::{CombatConfig, CombatController, Collaborators};
//!
//! let mut controller = CombatController::new(CombatConfig::from_json(json)?)?;
//! let report = controller.advance(&frame, &mut Collaborators {
//!     animator: &mut animator,
//!     physics: &physics,
//!     actor: &hero,
//!     world: &mut world,
//! });
//! for effect in controller.take_effects() {
//!     fx.play(effect.kind, effect.position);
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod channel;
pub mod config;
pub mod controller;
pub mod dispatch;
pub mod error;
pub mod hit_buffer;
pub mod input;
pub mod message;
pub mod services;
pub mod target;
pub mod timer;

pub use channel::{ChannelId, ChannelSet};
pub use config::{CombatConfig, ControlConfig, PrimaryTrigger};
pub use controller::{
    AttackState, AttackVariant, CancelReason, CombatController, CombatSnapshot, TickReport,
};
pub use dispatch::{HitDispatcher, HitOutcome, HitResolution, RuleTable};
pub use error::{ConfigError, ConfigResult};
pub use hit_buffer::{HitBuffer, HitInsert};
pub use input::{Buttons, InputFrame, InputIntent, IntentResolver};
pub use message::{CombatEvent, EffectKind, EffectSignal, TargetMessage};
pub use services::{ActorGate, Animator, Collaborators, Physics, TargetWorld};
pub use target::{TargetClassification, TargetId, TargetInfo, TargetKind, TargetState};
pub use timer::{FrameTimer, TimerId, TimerRegistry};

#[cfg(test)]
mod tests;
