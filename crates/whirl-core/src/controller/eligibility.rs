//! Variant eligibility flags.
//!
//! Each variant family may start once per airborne sequence. Starting one
//! family after the other records the switch; only the most recent switch is
//! kept. Landing or cancellation restores both families.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::state::{AttackVariant, VariantFamily};

/// A variant started after the other family in the same sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VariantSwitch {
    /// Standard (or double) after special.
    StandardAfterSpecial,
    /// Special after standard (or double).
    SpecialAfterStandard,
}

impl fmt::Display for VariantSwitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StandardAfterSpecial => write!(f, "standard_after_special"),
            Self::SpecialAfterStandard => write!(f, "special_after_standard"),
        }
    }
}

/// Gates which variant may start next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibilityFlags {
    /// Standard and double spins may start.
    pub can_standard: bool,
    /// Special spins may start.
    pub can_special: bool,
    last_family: Option<VariantFamily>,
    switch: Option<VariantSwitch>,
}

impl Default for EligibilityFlags {
    fn default() -> Self {
        Self {
            can_standard: true,
            can_special: true,
            last_family: None,
            switch: None,
        }
    }
}

impl EligibilityFlags {
    /// Both families eligible, no switch recorded.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if `variant` may start now.
    #[must_use]
    pub const fn is_eligible(&self, variant: AttackVariant) -> bool {
        match variant.family() {
            VariantFamily::Standard => self.can_standard,
            VariantFamily::Special => self.can_special,
        }
    }

    /// Marks `variant` as started.
    ///
    /// Returns the switch recorded by this start, if any. A new switch
    /// replaces the previous record.
    pub fn mark_started(&mut self, variant: AttackVariant) -> Option<VariantSwitch> {
        let family = variant.family();
        match family {
            VariantFamily::Standard => self.can_standard = false,
            VariantFamily::Special => self.can_special = false,
        }

        let switch = match (self.last_family, family) {
            (Some(VariantFamily::Special), VariantFamily::Standard) => {
                Some(VariantSwitch::StandardAfterSpecial)
            }
            (Some(VariantFamily::Standard), VariantFamily::Special) => {
                Some(VariantSwitch::SpecialAfterStandard)
            }
            _ => None,
        };
        self.last_family = Some(family);
        if switch.is_some() {
            self.switch = switch;
        }
        switch
    }

    /// Most recent cross-variant switch.
    #[must_use]
    pub const fn switch(&self) -> Option<VariantSwitch> {
        self.switch
    }

    /// Family of the last started variant in this sequence.
    #[must_use]
    pub const fn last_family(&self) -> Option<VariantFamily> {
        self.last_family
    }

    /// Restores both families and forgets the switch.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
