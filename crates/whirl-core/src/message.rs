//! Messages, effect signals and telemetry emitted by the combat core.
//!
//! The core never mutates a target directly. It communicates through three
//! one-way channels:
//! - [`TargetMessage`]: state change requests sent to a hit target
//! - [`EffectSignal`]: position-anchored visual/audio requests
//! - [`CombatEvent`]: telemetry of everything the controller decided
//!
//! Effects and events are buffered by the controller and drained by the host
//! with `take_effects()` / `take_events()` once per tick.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::channel::ChannelId;
use crate::controller::{AttackState, AttackVariant, CancelReason, OriginContext, RefusalReason};
use crate::controller::eligibility::VariantSwitch;
use crate::target::{TargetClassification, TargetId};

// =============================================================================
// Target Messages
// =============================================================================

/// One-way request sent to a hit target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TargetMessage {
    /// Break apart.
    Destroy,
    /// Get pushed away.
    Knockback {
        /// Unit direction away from the attacker
        direction: Vec3,
        /// Relative strength (1.0 = main spin at contact range)
        strength: f32,
    },
    /// Guard knocked open.
    GuardBreak {
        /// Consecutive guard breaks including this one
        count: u32,
    },
    /// Finishing blow after enough guard breaks.
    FinishingBlow,
    /// Picked up by the grab.
    Collect,
    /// Flip state.
    Toggle,
    /// Launched by a finishing combo hit.
    Launch {
        /// Unit direction away from the attacker
        direction: Vec3,
    },
    /// Gentle push for rideable objects.
    Nudge {
        /// Unit direction away from the attacker
        direction: Vec3,
    },
    /// Attack deflected off a wall-like object.
    Bounce,
}

impl TargetMessage {
    /// Short name used in logs and telemetry.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Destroy => "destroy",
            Self::Knockback { .. } => "knockback",
            Self::GuardBreak { .. } => "guard_break",
            Self::FinishingBlow => "finishing_blow",
            Self::Collect => "collect",
            Self::Toggle => "toggle",
            Self::Launch { .. } => "launch",
            Self::Nudge { .. } => "nudge",
            Self::Bounce => "bounce",
        }
    }
}

// =============================================================================
// Effect Signals
// =============================================================================

/// Kind of presentation effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectKind {
    /// Generic impact spark.
    HitSpark,
    /// Debris from a destroyed obstacle.
    Debris,
    /// Metallic clang of a broken guard.
    GuardClang,
    /// Flash of a finishing blow or launch.
    FinishFlash,
    /// Switch chime.
    Chime,
    /// Pickup sparkle.
    Sparkle,
    /// Charge glow shown by the telegraph.
    ChargeGlow,
}

/// Position-anchored visual/audio effect request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EffectSignal {
    /// What to play.
    pub kind: EffectKind,
    /// Where to play it.
    pub position: Vec3,
}

impl EffectSignal {
    /// Creates a new effect signal.
    #[must_use]
    pub const fn new(kind: EffectKind, position: Vec3) -> Self {
        Self { kind, position }
    }
}

// =============================================================================
// Telemetry Events
// =============================================================================

/// Record of a controller decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CombatEvent {
    /// A spin activation started.
    ActivationStarted {
        /// Tick of the transition
        tick: u64,
        /// Attack state entered
        state: AttackState,
        /// Variant selected
        variant: AttackVariant,
        /// Context the activation started from
        origin: OriginContext,
        /// Position in the rethrow chain
        combo_index: u32,
    },
    /// A scripted heavy attack or taunt started.
    ScriptStarted {
        /// Tick of the transition
        tick: u64,
        /// Attack state entered
        state: AttackState,
        /// Clip played
        clip: String,
    },
    /// The live activation ended.
    ActivationEnded {
        /// Tick of the transition
        tick: u64,
        /// State left
        from: AttackState,
        /// State entered
        to: AttackState,
    },
    /// An attack attempt was refused.
    AttackRefused {
        /// Tick of the attempt
        tick: u64,
        /// Why it was refused
        reason: RefusalReason,
    },
    /// A variant started after the other variant family in the same sequence.
    VariantSwitched {
        /// Tick of the switch
        tick: u64,
        /// The recorded switch
        switch: VariantSwitch,
    },
    /// The telegraph was requested for an ineligible variant.
    TelegraphArmed {
        /// Tick of the request
        tick: u64,
        /// Variant queued behind the telegraph
        variant: AttackVariant,
    },
    /// The telegraph started its countdown.
    TelegraphPromoted {
        /// Tick of the promotion
        tick: u64,
        /// Countdown length
        frames: u32,
    },
    /// The telegraph countdown ran out.
    TelegraphExpired {
        /// Tick of the expiry
        tick: u64,
    },
    /// A channel's window ran out.
    ChannelExpired {
        /// Tick of the expiry
        tick: u64,
        /// Channel invalidated
        channel: ChannelId,
    },
    /// A hit was credited.
    HitCredited {
        /// Tick of the hit
        tick: u64,
        /// Channel that made contact
        channel: ChannelId,
        /// Target credited
        target: TargetId,
        /// Target classification
        classification: TargetClassification,
        /// Name of the matching rule
        rule: String,
        /// Message sent to the target
        message: TargetMessage,
        /// Whether the target accepted the message
        accepted: bool,
    },
    /// The actor landed and eligibility was restored.
    Landed {
        /// Tick of the landing
        tick: u64,
    },
    /// The live activation was canceled by an external event.
    Cancelled {
        /// Tick of the cancellation
        tick: u64,
        /// External cause
        reason: CancelReason,
    },
}

impl CombatEvent {
    /// Tick at which the event was recorded.
    #[must_use]
    pub const fn tick(&self) -> u64 {
        match self {
            Self::ActivationStarted { tick, .. }
            | Self::ScriptStarted { tick, .. }
            | Self::ActivationEnded { tick, .. }
            | Self::AttackRefused { tick, .. }
            | Self::VariantSwitched { tick, .. }
            | Self::TelegraphArmed { tick, .. }
            | Self::TelegraphPromoted { tick, .. }
            | Self::TelegraphExpired { tick }
            | Self::ChannelExpired { tick, .. }
            | Self::HitCredited { tick, .. }
            | Self::Landed { tick }
            | Self::Cancelled { tick, .. } => *tick,
        }
    }
}
