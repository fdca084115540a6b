//! Attack states, variants and the live activation.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::hit_buffer::HitBuffer;
use crate::input::{InputIntent, Rotation};

// =============================================================================
// Clips
// =============================================================================

/// Animation clip names used by the controller.
pub mod clips {
    /// Grounded standard spin.
    pub const SPIN_GROUND: &str = "SpinGround";
    /// Standard spin while carrying.
    pub const SPIN_CARRY: &str = "SpinCarry";
    /// Airborne standard spin.
    pub const SPIN_AIR: &str = "SpinAir";
    /// Underwater spin.
    pub const SPIN_SWIM: &str = "SpinSwim";
    /// Special (grab) spin.
    pub const SPIN_GRAB: &str = "SpinGrab";
    /// Double spin, left hand.
    pub const SPIN_DOUBLE_L: &str = "SpinDoubleL";
    /// Double spin, right hand.
    pub const SPIN_DOUBLE_R: &str = "SpinDoubleR";
    /// Heavy hammer attack.
    pub const HAMMER_SLAM: &str = "HammerSlam";
    /// Taunt clips, one picked at random.
    pub const TAUNTS: [&str; 3] = ["Taunt0", "Taunt1", "Taunt2"];
    /// Upper-body charge shown by the telegraph.
    pub const SPIN_CHARGE: &str = "SpinCharge";

    /// Every spin clip. The telegraph waits until none of them is playing.
    pub const SPINS: [&str; 7] = [
        SPIN_GROUND,
        SPIN_CARRY,
        SPIN_AIR,
        SPIN_SWIM,
        SPIN_GRAB,
        SPIN_DOUBLE_L,
        SPIN_DOUBLE_R,
    ];
}

// =============================================================================
// States
// =============================================================================

/// Top-level attack state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttackState {
    /// No attack in progress.
    #[default]
    Idle,
    /// Spin started on the ground.
    GroundSpin,
    /// Spin started in the air.
    AirSpin,
    /// Spin started under water.
    AquaticSpin,
    /// Scripted hammer attack.
    HeavyAttack,
    /// Scripted taunt.
    Taunt,
    /// Airborne after a spin, waiting to land.
    FallRecovery,
}

impl AttackState {
    /// Returns true for the three spin states.
    #[must_use]
    pub const fn is_spin(self) -> bool {
        matches!(self, Self::GroundSpin | Self::AirSpin | Self::AquaticSpin)
    }

    /// Returns true for the scripted states.
    #[must_use]
    pub const fn is_scripted(self) -> bool {
        matches!(self, Self::HeavyAttack | Self::Taunt)
    }
}

impl fmt::Display for AttackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::GroundSpin => "ground_spin",
            Self::AirSpin => "air_spin",
            Self::AquaticSpin => "aquatic_spin",
            Self::HeavyAttack => "heavy_attack",
            Self::Taunt => "taunt",
            Self::FallRecovery => "fall_recovery",
        };
        write!(f, "{name}")
    }
}

/// Spin variant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttackVariant {
    /// Plain spin.
    #[default]
    Standard,
    /// Grab spin, special modifier held.
    Special,
    /// Directional double spin.
    Double,
}

impl AttackVariant {
    /// Eligibility family. The double spin shares the standard family.
    #[must_use]
    pub const fn family(self) -> VariantFamily {
        match self {
            Self::Standard | Self::Double => VariantFamily::Standard,
            Self::Special => VariantFamily::Special,
        }
    }
}

impl fmt::Display for AttackVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Standard => write!(f, "standard"),
            Self::Special => write!(f, "special"),
            Self::Double => write!(f, "double"),
        }
    }
}

/// Eligibility family of a variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VariantFamily {
    /// Standard and double spins.
    Standard,
    /// Special spins.
    Special,
}

/// Movement context an activation started from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OriginContext {
    /// On the ground.
    Grounded,
    /// In the air.
    Airborne,
    /// Under water.
    Aquatic,
    /// Holding an object.
    Carrying,
}

/// Hand used by the double spin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StrikeHand {
    /// Left hand.
    Left,
    /// Right hand.
    Right,
}

impl From<Rotation> for StrikeHand {
    fn from(rotation: Rotation) -> Self {
        match rotation {
            Rotation::Clockwise => Self::Right,
            Rotation::CounterClockwise => Self::Left,
        }
    }
}

/// External event that cancels the live activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CancelReason {
    /// Loading into another area.
    AreaTransition,
    /// The actor died.
    Death,
    /// An aquatic spin left the water.
    ForcedOutOfWater,
    /// The actor respawned.
    Respawn,
}

/// Why an attack attempt was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RefusalReason {
    /// The actor gate forbids attacking.
    Blocked,
    /// The actor picked something up this frame.
    CarryPickup,
    /// The variant was already used in this airborne sequence.
    Ineligible,
    /// The scripted state needs ground under the actor.
    NoContext,
}

// =============================================================================
// Requests and Activations
// =============================================================================

/// A resolved attack attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackRequest {
    /// Variant to start.
    pub variant: AttackVariant,
    /// Hand for the double spin.
    pub hand: Option<StrikeHand>,
}

impl AttackRequest {
    /// Picks the variant from an intent.
    ///
    /// A rotation selects the double spin and beats the special modifier.
    /// Carrying an object always yields a standard spin.
    #[must_use]
    pub fn from_intent(intent: &InputIntent, carrying: bool) -> Self {
        if carrying {
            return Self::standard();
        }
        match (intent.rotation, intent.special) {
            (Some(rotation), _) => Self {
                variant: AttackVariant::Double,
                hand: Some(rotation.into()),
            },
            (None, true) => Self {
                variant: AttackVariant::Special,
                hand: None,
            },
            (None, false) => Self::standard(),
        }
    }

    /// A plain standard spin request.
    #[must_use]
    pub const fn standard() -> Self {
        Self {
            variant: AttackVariant::Standard,
            hand: None,
        }
    }
}

/// What the live activation is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivationKind {
    /// A spin of the given variant.
    Spin(AttackVariant),
    /// The heavy hammer attack.
    Heavy,
    /// The taunt.
    Taunt,
}

/// Runtime record of the in-progress attack.
///
/// Created when an attack starts and dropped when it ends. Each activation
/// owns its own hit buffer, so a new activation may credit targets the
/// previous one already hit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttackActivation {
    /// What is running.
    pub kind: ActivationKind,
    /// Context at start.
    pub origin: OriginContext,
    /// Frames since start.
    pub step: u32,
    /// Position in the rethrow chain, 0 for the first spin.
    pub combo_index: u32,
    /// Credits from this activation launch enemies.
    pub is_finishing_hit: bool,
    /// Hand for the double spin.
    pub hand: Option<StrikeHand>,
    /// Clip played.
    pub clip: &'static str,
    /// A finishing hit landed.
    pub finished: bool,
    /// Targets credited by this activation.
    pub hits: HitBuffer,
}

impl AttackActivation {
    /// Creates an activation at step 0.
    #[must_use]
    pub fn new(
        kind: ActivationKind,
        origin: OriginContext,
        clip: &'static str,
        hit_capacity: usize,
    ) -> Self {
        Self {
            kind,
            origin,
            step: 0,
            combo_index: 0,
            is_finishing_hit: false,
            hand: None,
            clip,
            finished: false,
            hits: HitBuffer::with_capacity(hit_capacity),
        }
    }

    /// Variant, if the activation is a spin.
    #[must_use]
    pub const fn variant(&self) -> Option<AttackVariant> {
        match self.kind {
            ActivationKind::Spin(variant) => Some(variant),
            ActivationKind::Heavy | ActivationKind::Taunt => None,
        }
    }
}

/// Clip for a spin of `variant` started from `origin`.
#[must_use]
pub fn spin_clip(variant: AttackVariant, origin: OriginContext, hand: Option<StrikeHand>) -> &'static str {
    match (variant, origin) {
        (_, OriginContext::Aquatic) => clips::SPIN_SWIM,
        (_, OriginContext::Carrying) => clips::SPIN_CARRY,
        (AttackVariant::Special, _) => clips::SPIN_GRAB,
        (AttackVariant::Double, _) => match hand {
            Some(StrikeHand::Left) => clips::SPIN_DOUBLE_L,
            _ => clips::SPIN_DOUBLE_R,
        },
        (AttackVariant::Standard, OriginContext::Grounded) => clips::SPIN_GROUND,
        (AttackVariant::Standard, OriginContext::Airborne) => clips::SPIN_AIR,
    }
}
