//! Hit dispatch engine.
//!
//! Every tick the controller reports each `(channel, target)` contact of the
//! enabled hit channels to a [`HitDispatcher`]. The dispatcher decides whether
//! the contact is credited and, if so, which one-way message the target gets.
//!
//! # Resolution Order
//!
//! 1. Classify the target from its capability view.
//! 2. Refresh the guard counter of large guarded enemies.
//! 3. Skip targets already in the activation's hit buffer, unless the
//!    channel is always recheckable.
//! 4. Take the first matching rule of the [`RuleTable`]. No match means the
//!    contact is [`HitResolution::Deferred`] and may be credited later in the
//!    same activation.
//! 5. Record the target in the hit buffer, send the message, and report the
//!    effect at the target's position. A full buffer drops the credit: the
//!    contact is deferred and no message is sent.
//!
//! Whether the target accepts the message does not change the resolution.

pub mod guard;
pub mod rules;

pub use guard::GuardTracker;
pub use rules::{
    Action, GuardHandlers, HitContext, HitEffect, Predicate, Rule, RuleAction, RuleTable,
    RuleTableBuilder, Striker,
};

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::channel::ChannelId;
use crate::hit_buffer::{HitBuffer, HitInsert};
use crate::message::{EffectSignal, TargetMessage};
use crate::services::TargetWorld;
use crate::target::{TargetClassification, TargetInfo, TargetState};

/// Whether a contact was credited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HitResolution {
    /// A rule matched and the target was recorded.
    Credited,
    /// Already credited, or no rule matched. Nothing was recorded.
    Deferred,
}

/// Full result of one dispatch.
#[derive(Debug, Clone, PartialEq)]
pub struct HitOutcome {
    /// Credited or deferred.
    pub resolution: HitResolution,
    /// Target classification.
    pub classification: TargetClassification,
    /// Name of the matched rule, if any.
    pub rule: Option<&'static str>,
    /// Message sent, if credited.
    pub message: Option<TargetMessage>,
    /// Whether the target handled the message.
    pub accepted: bool,
    /// Effect to play, if any.
    pub effect: Option<EffectSignal>,
}

impl HitOutcome {
    fn deferred(classification: TargetClassification) -> Self {
        Self {
            resolution: HitResolution::Deferred,
            classification,
            rule: None,
            message: None,
            accepted: false,
            effect: None,
        }
    }

    /// Returns true if the contact was credited.
    #[must_use]
    pub fn is_credited(&self) -> bool {
        self.resolution == HitResolution::Credited
    }
}

/// Applies the rule table to channel contacts.
#[derive(Debug, Clone)]
pub struct HitDispatcher {
    rules: RuleTable,
    guard: GuardTracker,
}

impl HitDispatcher {
    /// Creates a dispatcher with the reference rule set.
    #[must_use]
    pub fn new(guard_break_threshold: u32) -> Self {
        Self::with_rules(RuleTable::standard(), guard_break_threshold)
    }

    /// Creates a dispatcher with a custom rule table.
    #[must_use]
    pub fn with_rules(rules: RuleTable, guard_break_threshold: u32) -> Self {
        Self {
            rules,
            guard: GuardTracker::new(guard_break_threshold),
        }
    }

    /// Active rule table.
    #[must_use]
    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    /// Guard counters.
    #[must_use]
    pub fn guard(&self) -> &GuardTracker {
        &self.guard
    }

    /// Forgets every guard counter.
    pub fn clear_guard(&mut self) {
        self.guard.clear();
    }

    /// Drops guard counters of targets the world no longer knows.
    pub fn prune_guard(&mut self, world: &dyn TargetWorld) {
        if self.guard.is_empty() {
            return;
        }
        let dropped = self.guard.prune(|id| world.describe(id).is_some());
        if dropped > 0 {
            trace!(dropped, "pruned guard counters of departed targets");
        }
    }

    /// Resolves one contact.
    pub fn resolve(
        &mut self,
        channel: ChannelId,
        target: &TargetInfo,
        distance: Option<f32>,
        hits: &mut HitBuffer,
        striker: &Striker,
        world: &mut dyn TargetWorld,
    ) -> HitOutcome {
        let classification = target.classify();
        if classification == TargetClassification::LargeGuardedEnemy {
            self.guard.observe(target);
        }

        if hits.contains(target.id) && !channel.is_always_recheckable() {
            trace!(%channel, target = %target.id, "already credited");
            return HitOutcome::deferred(classification);
        }

        let mut ctx = HitContext {
            channel,
            target,
            classification,
            striker,
            distance,
            guard_count: self.guard.count(target.id),
        };

        let Some(rule) = self.rules.first_match(&ctx) else {
            trace!(%channel, target = %target.id, %classification, "no rule matched");
            return HitOutcome::deferred(classification);
        };
        let name = rule.name();

        match hits.insert(target.id) {
            HitInsert::Inserted => {}
            // Unrecorded targets could be credited again every tick.
            HitInsert::Full => return HitOutcome::deferred(classification),
            // Recheckable channels may credit a target already on record.
            HitInsert::Duplicate => {
                trace!(%channel, target = %target.id, "re-credited through recheckable channel");
            }
        }

        let effect = match *rule.action() {
            RuleAction::Apply(action) => action(&ctx),
            RuleAction::GuardTieBreak(handlers) => {
                if self.guard.finisher_ready(target.id) {
                    self.guard.reset(target.id);
                    (handlers.finishing_blow)(&ctx)
                } else if target.state.contains(TargetState::GUARDING) {
                    ctx.guard_count = self.guard.record_break(target.id);
                    (handlers.guard_break)(&ctx)
                } else {
                    (handlers.unguarded)(&ctx)
                }
            }
        };

        let accepted = world.send(target.id, effect.message);
        debug!(
            %channel,
            target = %target.id,
            %classification,
            rule = name,
            message = effect.message.name(),
            accepted,
            "hit credited"
        );

        HitOutcome {
            resolution: HitResolution::Credited,
            classification,
            rule: Some(name),
            message: Some(effect.message),
            accepted,
            effect: effect
                .effect
                .map(|kind| EffectSignal::new(kind, target.position)),
        }
    }
}

impl Default for HitDispatcher {
    fn default() -> Self {
        Self::new(crate::config::CombatConfig::default().guard_break_threshold)
    }
}
