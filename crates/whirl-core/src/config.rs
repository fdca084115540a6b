//! Tuning and control configuration.
//!
//! [`CombatConfig`] holds every frame window and threshold the controller
//! uses. Its `Default` is the reference tuning; documents may override any
//! subset of fields since missing fields fall back to the defaults.
//!
//! # Example
//!
//! ```
//! use whirl_core::config::{CombatConfig, PrimaryTrigger};
//!
//! let config = CombatConfig::from_json(r#"{ "spin_window": 24, "controls": { "primary": "L" } }"#)
//!     .unwrap();
//!
//! assert_eq!(config.spin_window, 24);
//! assert_eq!(config.grab_window, 15);
//! assert_eq!(config.controls.primary, PrimaryTrigger::L);
//! ```

use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

use crate::error::{ConfigError, ConfigResult};
use crate::hit_buffer::DEFAULT_HIT_CAPACITY;
use crate::input::Buttons;

/// Upper bound for scripted timeline steps (ten seconds at 60 Hz).
pub const SCRIPT_STEP_LIMIT: u32 = 600;

// =============================================================================
// Control Configuration
// =============================================================================

/// Physical control that drives the primary-attack trigger.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrimaryTrigger {
    /// Y face button.
    #[default]
    Y,
    /// X face button.
    X,
    /// Left shoulder. Shared with camera reset.
    L,
    /// Right shoulder.
    R,
}

impl PrimaryTrigger {
    /// Returns the physical button for this trigger.
    #[must_use]
    pub const fn button(self) -> Buttons {
        match self {
            Self::Y => Buttons::Y,
            Self::X => Buttons::X,
            Self::L => Buttons::L,
            Self::R => Buttons::R,
        }
    }
}

/// Persisted control mapping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlConfig {
    /// Button mapped to the primary-attack trigger.
    pub primary: PrimaryTrigger,
}

// =============================================================================
// Combat Configuration
// =============================================================================

/// Frame windows and thresholds for the combat controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    /// Maximum targets credited per activation.
    pub hit_capacity: usize,
    /// Grab channel window (Special variant).
    pub grab_window: u32,
    /// Main spin channel window.
    pub spin_window: u32,
    /// Double-strike channel window.
    pub double_spin_window: u32,
    /// Telegraph countdown once promoted.
    pub telegraph_window: u32,
    /// Minimum spin step before a second input may rethrow.
    pub rethrow_min_step: u32,
    /// Heavy attack step at which the slam channel opens.
    pub heavy_hit_step: u32,
    /// Slam channel window.
    pub heavy_window: u32,
    /// Taunt step at which the strike channel opens.
    pub taunt_hit_step: u32,
    /// Strike channel window.
    pub taunt_window: u32,
    /// Consecutive guard breaks before the finishing blow applies.
    pub guard_break_threshold: u32,
    /// Combo index at which an activation becomes a finishing hit.
    pub finishing_combo_index: u32,
    /// Stick magnitude below which gesture tracking resets.
    pub stick_deadzone: f32,
    /// Accumulated stick angle (radians) that counts as a rotation gesture.
    pub rotation_gesture_angle: f32,
    /// Frames within which the gesture angle must accumulate.
    pub rotation_gesture_frames: u32,
    /// Seed for deterministic taunt clip selection.
    pub seed: u64,
    /// Control mapping.
    pub controls: ControlConfig,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            hit_capacity: DEFAULT_HIT_CAPACITY,
            grab_window: 15,
            spin_window: 21,
            double_spin_window: 41,
            telegraph_window: 21,
            rethrow_min_step: 8,
            heavy_hit_step: 14,
            heavy_window: 10,
            taunt_hit_step: 18,
            taunt_window: 6,
            guard_break_threshold: 3,
            finishing_combo_index: 1,
            stick_deadzone: 0.3,
            rotation_gesture_angle: 1.5 * PI,
            rotation_gesture_frames: 20,
            seed: 0,
            controls: ControlConfig::default(),
        }
    }
}

impl CombatConfig {
    /// Parses and validates a JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed documents and any error
    /// from [`CombatConfig::validate`].
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the configuration for values the controller cannot honour.
    ///
    /// # Errors
    ///
    /// Returns the first invalid field found.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.hit_capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }

        let windows = [
            ("grab_window", self.grab_window),
            ("spin_window", self.spin_window),
            ("double_spin_window", self.double_spin_window),
            ("telegraph_window", self.telegraph_window),
            ("heavy_window", self.heavy_window),
            ("taunt_window", self.taunt_window),
            ("rotation_gesture_frames", self.rotation_gesture_frames),
        ];
        if let Some((field, _)) = windows.into_iter().find(|(_, frames)| *frames == 0) {
            return Err(ConfigError::ZeroWindow { field });
        }

        let steps = [
            ("heavy_hit_step", self.heavy_hit_step),
            ("taunt_hit_step", self.taunt_hit_step),
        ];
        if let Some((field, step)) = steps
            .into_iter()
            .find(|(_, step)| *step >= SCRIPT_STEP_LIMIT)
        {
            return Err(ConfigError::StepOutsideWindow {
                field,
                step,
                limit: SCRIPT_STEP_LIMIT,
            });
        }
        if self.rethrow_min_step >= self.spin_window {
            return Err(ConfigError::StepOutsideWindow {
                field: "rethrow_min_step",
                step: self.rethrow_min_step,
                limit: self.spin_window,
            });
        }

        if !(0.0..1.0).contains(&self.stick_deadzone) {
            return Err(ConfigError::InvalidThreshold {
                field: "stick_deadzone",
                value: self.stick_deadzone,
            });
        }
        if self.rotation_gesture_angle.is_nan() || self.rotation_gesture_angle <= 0.0 {
            return Err(ConfigError::InvalidThreshold {
                field: "rotation_gesture_angle",
                value: self.rotation_gesture_angle,
            });
        }
        if self.guard_break_threshold == 0 {
            return Err(ConfigError::InvalidThreshold {
                field: "guard_break_threshold",
                value: 0.0,
            });
        }

        Ok(())
    }
}
