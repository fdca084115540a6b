//! Error types for the configuration surface.
//!
//! The per-frame API never returns errors: refused transitions are `false`,
//! unmatched hits are [`HitResolution::Deferred`](crate::dispatch::HitResolution)
//! and a full hit buffer is a logged soft failure. Only loading and
//! validating tuning can fail.

use thiserror::Error;

/// Configuration error.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration document could not be parsed.
    #[error("failed to parse combat config: {0}")]
    Parse(#[from] serde_json::Error),

    /// A hit or telegraph window is zero frames long.
    #[error("window `{field}` must be at least one frame")]
    ZeroWindow {
        /// Name of the offending field
        field: &'static str,
    },

    /// The hit buffer would never accept a target.
    #[error("hit buffer capacity must be at least one")]
    ZeroCapacity,

    /// A scripted step can never be reached before the window it opens ends.
    #[error("step `{field}` = {step} must be below {limit}")]
    StepOutsideWindow {
        /// Name of the offending field
        field: &'static str,
        /// Configured step
        step: u32,
        /// Exclusive upper bound
        limit: u32,
    },

    /// A threshold is out of its valid range.
    #[error("threshold `{field}` has invalid value {value}")]
    InvalidThreshold {
        /// Name of the offending field
        field: &'static str,
        /// Configured value
        value: f32,
    },
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;
