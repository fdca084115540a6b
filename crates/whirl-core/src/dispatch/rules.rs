//! Ordered hit rule table.
//!
//! A [`RuleTable`] is a list of `(predicate, action)` pairs evaluated in
//! registration order; the first rule whose predicate accepts the
//! [`HitContext`] wins. Tables are assembled with [`RuleTableBuilder`].
//!
//! # Guard Tie-Break
//!
//! A rule may register a [`GuardHandlers`] group instead of a single action.
//! The dispatch engine then picks one handler using the target's consecutive
//! guard-break counter:
//!
//! 1. counter at or above the threshold: `finishing_blow`
//! 2. target observed guarding: `guard_break` (the counter is incremented)
//! 3. otherwise: `unguarded`
//!
//! This is the only place the counter influences rule selection; it is not a
//! general priority mechanism.
//!
//! # Example
//!
//! ```
//! use whirl_core::dispatch::{HitEffect, RuleTable};
//! use whirl_core::message::TargetMessage;
//! use whirl_core::target::TargetClassification;
//!
//! let table = RuleTable::builder()
//!     .rule(
//!         "switch.toggle",
//!         |ctx| ctx.classification == TargetClassification::Switch,
//!         |_| HitEffect::message(TargetMessage::Toggle),
//!     )
//!     .build();
//!
//! assert_eq!(table.len(), 1);
//! ```

use std::fmt;

use glam::Vec3;

use crate::channel::ChannelId;
use crate::message::{EffectKind, TargetMessage};
use crate::target::{TargetClassification, TargetInfo};

// =============================================================================
// Hit Context
// =============================================================================

/// Attacker-side facts for one dispatch call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Striker {
    /// Attacker position.
    pub position: Vec3,
    /// Attacker velocity.
    pub velocity: Vec3,
    /// The live activation is a finishing hit.
    pub finishing_hit: bool,
}

impl Striker {
    /// A stationary, non-finishing striker at `position`.
    #[must_use]
    pub const fn at(position: Vec3) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            finishing_hit: false,
        }
    }
}

/// Everything a rule can inspect.
#[derive(Debug, Clone, Copy)]
pub struct HitContext<'a> {
    /// Channel that made contact.
    pub channel: ChannelId,
    /// Target view.
    pub target: &'a TargetInfo,
    /// Target classification, computed once per dispatch.
    pub classification: TargetClassification,
    /// Attacker-side facts.
    pub striker: &'a Striker,
    /// Distance to the target, if physics knows it.
    pub distance: Option<f32>,
    /// Consecutive guard breaks, including the one being credited.
    pub guard_count: u32,
}

impl HitContext<'_> {
    /// Horizontal unit direction from the attacker to the target.
    ///
    /// Falls back to the attacker's horizontal velocity, then to `+Z`, when
    /// the two positions coincide.
    #[must_use]
    pub fn away(&self) -> Vec3 {
        let flatten = |v: Vec3| Vec3::new(v.x, 0.0, v.z).normalize_or_zero();
        let direction = flatten(self.target.position - self.striker.position);
        if direction != Vec3::ZERO {
            return direction;
        }
        let direction = flatten(self.striker.velocity);
        if direction != Vec3::ZERO {
            return direction;
        }
        Vec3::Z
    }

    /// Knockback strength: channel base scaled down with distance.
    #[must_use]
    pub fn knockback_strength(&self) -> f32 {
        let base = match self.channel {
            ChannelId::DoubleSpin => 1.5,
            ChannelId::GroundSlam => 2.0,
            ChannelId::Strike => 0.5,
            _ => 1.0,
        };
        let distance = self.distance.unwrap_or(0.0).max(0.0);
        base / (1.0 + distance)
    }

    fn is_channel(&self, channels: &[ChannelId]) -> bool {
        channels.contains(&self.channel)
    }
}

/// Result of a matched rule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitEffect {
    /// Message sent to the target.
    pub message: TargetMessage,
    /// Optional position-anchored effect at the target.
    pub effect: Option<EffectKind>,
}

impl HitEffect {
    /// An effect that only sends a message.
    #[must_use]
    pub const fn message(message: TargetMessage) -> Self {
        Self {
            message,
            effect: None,
        }
    }

    /// Adds a presentation effect.
    #[must_use]
    pub const fn with_effect(mut self, effect: EffectKind) -> Self {
        self.effect = Some(effect);
        self
    }
}

// =============================================================================
// Rules
// =============================================================================

/// Rule predicate.
pub type Predicate = fn(&HitContext<'_>) -> bool;

/// Rule action.
pub type Action = fn(&HitContext<'_>) -> HitEffect;

/// Handlers of a guard tie-break group.
#[derive(Clone, Copy)]
pub struct GuardHandlers {
    /// Applied while the target is guarding below the threshold.
    pub guard_break: Action,
    /// Applied once the counter reaches the threshold.
    pub finishing_blow: Action,
    /// Applied when the target is not guarding.
    pub unguarded: Action,
}

/// What a matching rule does.
#[derive(Clone, Copy)]
pub enum RuleAction {
    /// A single action.
    Apply(Action),
    /// Guard tie-break group.
    GuardTieBreak(GuardHandlers),
}

/// One entry of the rule table.
#[derive(Clone, Copy)]
pub struct Rule {
    name: &'static str,
    predicate: Predicate,
    action: RuleAction,
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.action {
            RuleAction::Apply(_) => "apply",
            RuleAction::GuardTieBreak(_) => "guard_tie_break",
        };
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("action", &kind)
            .finish_non_exhaustive()
    }
}

impl Rule {
    /// Rule name used in logs and telemetry.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns true if this rule applies.
    #[must_use]
    pub fn matches(&self, ctx: &HitContext<'_>) -> bool {
        (self.predicate)(ctx)
    }

    /// The action taken on match.
    #[must_use]
    pub const fn action(&self) -> &RuleAction {
        &self.action
    }
}

/// Ordered list of rules, first match wins.
#[derive(Debug, Clone, Default)]
pub struct RuleTable {
    rules: Vec<Rule>,
}

impl RuleTable {
    /// Starts building a table.
    #[must_use]
    pub fn builder() -> RuleTableBuilder {
        RuleTableBuilder::default()
    }

    /// Returns the first rule matching the context.
    #[must_use]
    pub fn first_match(&self, ctx: &HitContext<'_>) -> Option<&Rule> {
        self.rules.iter().find(|rule| rule.matches(ctx))
    }

    /// Number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if the table has no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rule names in evaluation order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.rules.iter().map(Rule::name)
    }

    /// The reference rule set.
    #[must_use]
    pub fn standard() -> Self {
        use TargetClassification as C;

        Self::builder()
            .guard_group(
                "guarded.tie_break",
                |ctx| ctx.classification == C::LargeGuardedEnemy && ctx.channel.is_damaging(),
                GuardHandlers {
                    guard_break: |ctx| {
                        HitEffect::message(TargetMessage::GuardBreak {
                            count: ctx.guard_count,
                        })
                        .with_effect(EffectKind::GuardClang)
                    },
                    finishing_blow: |_| {
                        HitEffect::message(TargetMessage::FinishingBlow)
                            .with_effect(EffectKind::FinishFlash)
                    },
                    unguarded: knockback,
                },
            )
            .rule(
                "breakable.destroy",
                |ctx| ctx.classification == C::BreakableObstacle && ctx.channel.is_damaging(),
                |_| HitEffect::message(TargetMessage::Destroy).with_effect(EffectKind::Debris),
            )
            .rule(
                "collectible.grab",
                |ctx| ctx.classification == C::CarryableCollectible && ctx.channel == ChannelId::Grab,
                |_| HitEffect::message(TargetMessage::Collect).with_effect(EffectKind::Sparkle),
            )
            .rule(
                "collectible.scatter",
                |ctx| {
                    ctx.classification == C::CarryableCollectible
                        && ctx.is_channel(&[ChannelId::Spin, ChannelId::DoubleSpin])
                },
                knockback,
            )
            .rule(
                "switch.toggle",
                |ctx| ctx.classification == C::Switch && ctx.channel.is_damaging(),
                |_| HitEffect::message(TargetMessage::Toggle).with_effect(EffectKind::Chime),
            )
            .rule(
                "enemy.strike",
                |ctx| ctx.classification == C::EnemyBody && ctx.channel.is_damaging(),
                |ctx| {
                    if ctx.striker.finishing_hit {
                        HitEffect::message(TargetMessage::Launch {
                            direction: ctx.away(),
                        })
                        .with_effect(EffectKind::FinishFlash)
                    } else {
                        knockback(ctx)
                    }
                },
            )
            .rule(
                "ride.nudge",
                |ctx| {
                    ctx.classification == C::RideObject
                        && ctx.is_channel(&[ChannelId::Spin, ChannelId::DoubleSpin])
                },
                |ctx| {
                    HitEffect::message(TargetMessage::Nudge {
                        direction: ctx.away(),
                    })
                },
            )
            .rule(
                "map_object.push",
                |ctx| ctx.classification == C::MapObject && ctx.channel.is_damaging(),
                knockback,
            )
            .rule(
                "wall.bounce",
                |ctx| {
                    ctx.classification == C::WallOnly
                        && (ctx.channel.is_damaging() || ctx.channel == ChannelId::Grab)
                },
                |_| HitEffect::message(TargetMessage::Bounce),
            )
            .build()
    }
}

fn knockback(ctx: &HitContext<'_>) -> HitEffect {
    HitEffect::message(TargetMessage::Knockback {
        direction: ctx.away(),
        strength: ctx.knockback_strength(),
    })
    .with_effect(EffectKind::HitSpark)
}

/// Builder for [`RuleTable`].
#[derive(Debug, Default)]
pub struct RuleTableBuilder {
    rules: Vec<Rule>,
}

impl RuleTableBuilder {
    /// Appends a single-action rule.
    #[must_use]
    pub fn rule(mut self, name: &'static str, predicate: Predicate, action: Action) -> Self {
        self.rules.push(Rule {
            name,
            predicate,
            action: RuleAction::Apply(action),
        });
        self
    }

    /// Appends a guard tie-break group.
    #[must_use]
    pub fn guard_group(
        mut self,
        name: &'static str,
        predicate: Predicate,
        handlers: GuardHandlers,
    ) -> Self {
        self.rules.push(Rule {
            name,
            predicate,
            action: RuleAction::GuardTieBreak(handlers),
        });
        self
    }

    /// Finishes the table.
    #[must_use]
    pub fn build(self) -> RuleTable {
        RuleTable { rules: self.rules }
    }
}
