//! Input intent resolution.
//!
//! Raw per-frame controller state ([`InputFrame`]) plus the control mapping
//! ([`ControlConfig`]) are reduced to a small set of semantic intents
//! ([`InputIntent`]): the primary-attack trigger, the Special modifier, a
//! rotation direction, the heavy and taunt triggers, and whether the movement
//! code must suppress its camera-reset action this frame.
//!
//! # Rotation
//!
//! Rotation comes from two sources:
//! - **Directional spin**: D-pad left or right held when the trigger fires.
//! - **Stick gesture**: the left stick swept around its rim. Signed angle
//!   deltas are accumulated over a sliding frame window and the gesture fires
//!   once their sum passes the configured angle.
//!
//! When both are present on the same frame the D-pad wins. Holding both
//! D-pad directions cancels the directional source.

use bitflags::bitflags;
use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::config::{CombatConfig, ControlConfig};

bitflags! {
    /// Physical controls.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct Buttons: u16 {
        /// A face button.
        const A          = 1 << 0;
        /// B face button.
        const B          = 1 << 1;
        /// X face button.
        const X          = 1 << 2;
        /// Y face button.
        const Y          = 1 << 3;
        /// Left shoulder (camera reset).
        const L          = 1 << 4;
        /// Right shoulder.
        const R          = 1 << 5;
        /// Left trigger (Special modifier).
        const ZL         = 1 << 6;
        /// Right trigger (heavy weapon).
        const ZR         = 1 << 7;
        /// D-pad up (taunt).
        const DPAD_UP    = 1 << 8;
        /// D-pad down.
        const DPAD_DOWN  = 1 << 9;
        /// D-pad left (directional spin, counter-clockwise).
        const DPAD_LEFT  = 1 << 10;
        /// D-pad right (directional spin, clockwise).
        const DPAD_RIGHT = 1 << 11;
    }
}

impl Buttons {
    /// Control shared with the movement code's camera reset.
    pub const CAMERA_RESET: Self = Self::L;
    /// Modifier selecting the Special variant.
    pub const SPECIAL_MODIFIER: Self = Self::ZL;
    /// Heavy attack trigger.
    pub const HEAVY: Self = Self::ZR;
    /// Taunt trigger.
    pub const TAUNT: Self = Self::DPAD_UP;
}

// =============================================================================
// Raw Frame Input
// =============================================================================

/// Raw controller state for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct InputFrame {
    /// Buttons held this frame.
    pub held: Buttons,
    /// Buttons whose rising edge occurred this frame.
    pub pressed: Buttons,
    /// Left stick, each axis in `[-1, 1]`.
    pub stick: Vec2,
}

impl InputFrame {
    /// A frame with nothing held and the stick centred.
    #[must_use]
    pub fn idle() -> Self {
        Self::default()
    }

    /// A frame on which `buttons` are pressed (and therefore held).
    #[must_use]
    pub fn press(buttons: Buttons) -> Self {
        Self {
            held: buttons,
            pressed: buttons,
            stick: Vec2::ZERO,
        }
    }

    /// Adds held buttons without an edge.
    #[must_use]
    pub fn holding(mut self, buttons: Buttons) -> Self {
        self.held |= buttons;
        self
    }

    /// Sets the stick position.
    #[must_use]
    pub fn with_stick(mut self, stick: Vec2) -> Self {
        self.stick = stick;
        self
    }
}

// =============================================================================
// Intents
// =============================================================================

/// Direction of a rotation intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rotation {
    /// Clockwise, drives a right-handed strike.
    Clockwise,
    /// Counter-clockwise, drives a left-handed strike.
    CounterClockwise,
}

/// Semantic triggers derived from one frame of input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputIntent {
    /// Primary-attack trigger fired this frame.
    pub attack: bool,
    /// Special modifier held.
    pub special: bool,
    /// Rotation direction, if any source is asserted.
    pub rotation: Option<Rotation>,
    /// Heavy attack trigger fired this frame.
    pub heavy: bool,
    /// Taunt trigger fired this frame.
    pub taunt: bool,
    /// The movement code must not reset the camera this frame.
    pub suppress_camera_reset: bool,
}

/// Converts raw frames into [`InputIntent`]s.
///
/// Keeps the stick history needed for gesture detection, so one resolver
/// must see every frame in order.
///
/// # Example
///
/// ```
/// use whirl_core::config::{CombatConfig, ControlConfig, PrimaryTrigger};
/// use whirl_core::input::{Buttons, InputFrame, IntentResolver};
///
/// let config = CombatConfig {
///     controls: ControlConfig { primary: PrimaryTrigger::L },
///     ..CombatConfig::default()
/// };
/// let mut resolver = IntentResolver::new(&config);
///
/// let intent = resolver.resolve(&InputFrame::press(Buttons::L));
/// assert!(intent.attack);
/// assert!(intent.suppress_camera_reset);
/// ```
#[derive(Debug, Clone)]
pub struct IntentResolver {
    controls: ControlConfig,
    deadzone: f32,
    gesture_angle: f32,
    gesture_frames: usize,
    previous_stick: Option<Vec2>,
    deltas: VecDeque<f32>,
}

impl IntentResolver {
    /// Creates a resolver for the given configuration.
    #[must_use]
    pub fn new(config: &CombatConfig) -> Self {
        let gesture_frames = usize::try_from(config.rotation_gesture_frames).unwrap_or(usize::MAX);
        Self {
            controls: config.controls,
            deadzone: config.stick_deadzone,
            gesture_angle: config.rotation_gesture_angle,
            gesture_frames,
            previous_stick: None,
            deltas: VecDeque::with_capacity(gesture_frames.min(64)),
        }
    }

    /// Resolves one frame of input.
    pub fn resolve(&mut self, frame: &InputFrame) -> InputIntent {
        let primary = self.controls.primary.button();
        let attack = frame.pressed.intersects(primary);
        let gesture = self.track_gesture(frame.stick);

        let rotation = Self::directional(frame.held).or(gesture);
        if attack && rotation.is_some() {
            self.reset_gesture();
        }

        InputIntent {
            attack,
            special: frame.held.contains(Buttons::SPECIAL_MODIFIER),
            rotation,
            heavy: frame.pressed.contains(Buttons::HEAVY),
            taunt: frame.pressed.contains(Buttons::TAUNT),
            suppress_camera_reset: primary.intersects(Buttons::CAMERA_RESET)
                && (frame.held | frame.pressed).intersects(Buttons::CAMERA_RESET),
        }
    }

    /// Forgets gesture history, e.g. after a cancellation.
    pub fn reset_gesture(&mut self) {
        self.previous_stick = None;
        self.deltas.clear();
    }

    /// Net signed angle accumulated in the gesture window (radians).
    #[must_use]
    pub fn accumulated_angle(&self) -> f32 {
        self.deltas.iter().sum()
    }

    fn directional(held: Buttons) -> Option<Rotation> {
        match (
            held.contains(Buttons::DPAD_LEFT),
            held.contains(Buttons::DPAD_RIGHT),
        ) {
            (true, false) => Some(Rotation::CounterClockwise),
            (false, true) => Some(Rotation::Clockwise),
            _ => None,
        }
    }

    fn track_gesture(&mut self, stick: Vec2) -> Option<Rotation> {
        if stick.length() < self.deadzone {
            self.reset_gesture();
            return None;
        }

        if let Some(previous) = self.previous_stick {
            let delta = previous.perp_dot(stick).atan2(previous.dot(stick));
            self.deltas.push_back(delta);
            while self.deltas.len() > self.gesture_frames {
                self.deltas.pop_front();
            }
        }
        self.previous_stick = Some(stick);

        let sweep = self.accumulated_angle();
        if sweep >= self.gesture_angle {
            Some(Rotation::CounterClockwise)
        } else if sweep <= -self.gesture_angle {
            Some(Rotation::Clockwise)
        } else {
            None
        }
    }
}
