//! Attack state machine.
//!
//! [`CombatController`] owns every piece of per-actor combat state: the
//! current [`AttackState`], the live [`AttackActivation`] and its hit buffer,
//! the frame timers, the channel set, the eligibility flags and the hit
//! dispatcher. The host calls [`CombatController::advance`] exactly once per
//! simulation frame.
//!
//! # Tick Order
//!
//! 1. Resolve the input intent and observe the actor's surroundings.
//! 2. Tick channel windows; expired channels are invalidated.
//! 3. Tick the telegraph, then promote a pending telegraph once no spin is
//!    live and no spin clip is playing.
//! 4. Run the current state's logic (transitions, rethrows, scripted steps).
//! 5. Drop guard counters of departed targets, then dispatch every contact of
//!    every enabled hit channel.
//!
//! Because channel expiry happens in step 2, a channel whose window ends this
//! frame never reaches step 5.
//!
//! # States
//!
//! ```text
//! Idle ──attack──▶ GroundSpin / AirSpin / AquaticSpin ──clip end──▶ Idle | FallRecovery
//!  │                        ▲            │                                   │
//!  │                        └──rethrow───┴───────────────────────────────────┘
//!  ├──heavy──▶ HeavyAttack ──▶ Idle | FallRecovery
//!  └──taunt──▶ Taunt ──▶ Idle | FallRecovery
//! ```

pub mod eligibility;
pub mod state;

pub use eligibility::{EligibilityFlags, VariantSwitch};
pub use state::{
    clips, spin_clip, ActivationKind, AttackActivation, AttackRequest, AttackState,
    AttackVariant, CancelReason, OriginContext, RefusalReason, StrikeHand, VariantFamily,
};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::channel::{ChannelId, ChannelSet};
use crate::config::CombatConfig;
use crate::dispatch::{HitDispatcher, RuleTable, Striker};
use crate::error::ConfigResult;
use crate::hit_buffer::HitBuffer;
use crate::input::{InputFrame, InputIntent, IntentResolver};
use crate::message::{CombatEvent, EffectKind, EffectSignal};
use crate::services::{Animator, Collaborators, Prop};
use crate::target::TargetId;
use crate::timer::{TimerId, TimerRegistry};

// =============================================================================
// Reports
// =============================================================================

/// Summary of one [`CombatController::advance`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    /// Tick number, starting at 1.
    pub tick: u64,
    /// State after the tick.
    pub state: AttackState,
    /// Resolved input intent.
    pub intent: InputIntent,
    /// Refusal of an attack attempt this tick, if any.
    pub refused: Option<RefusalReason>,
    /// Contacts credited this tick.
    pub credited: usize,
    /// Contacts deferred this tick.
    pub deferred: usize,
}

/// Serializable view of the controller for debugging and determinism checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatSnapshot {
    /// Ticks advanced so far.
    pub tick: u64,
    /// Current state.
    pub state: AttackState,
    /// Raw timer values (`-1` inactive, `-2` pending).
    pub timers: Vec<(TimerId, i32)>,
    /// Enabled channels.
    pub channels: Vec<ChannelId>,
    /// Eligibility flags.
    pub eligibility: EligibilityFlags,
    /// Step of the live activation.
    pub step: Option<u32>,
    /// Current rethrow chain index.
    pub combo_index: u32,
    /// Targets credited by the live activation.
    pub hits: Vec<TargetId>,
    /// Variant queued behind the telegraph.
    pub queued: Option<AttackVariant>,
}

/// Facts about the actor sampled once per tick.
#[derive(Debug, Clone, Copy)]
struct Surroundings {
    grounded: bool,
    submerged: bool,
    at_surface: bool,
    carrying: bool,
    picked_up: bool,
    can_attack: bool,
}

impl Surroundings {
    fn origin(self) -> OriginContext {
        if self.submerged {
            OriginContext::Aquatic
        } else if self.carrying {
            OriginContext::Carrying
        } else if self.grounded {
            OriginContext::Grounded
        } else {
            OriginContext::Airborne
        }
    }

    fn supported(self) -> bool {
        self.grounded || self.submerged
    }
}

// =============================================================================
// Controller
// =============================================================================

/// Per-actor combat coordinator.
#[derive(Debug, Clone)]
pub struct CombatController {
    config: CombatConfig,
    state: AttackState,
    activation: Option<AttackActivation>,
    timers: TimerRegistry,
    channels: ChannelSet,
    eligibility: EligibilityFlags,
    dispatcher: HitDispatcher,
    intents: IntentResolver,
    was_carrying: bool,
    queued: Option<AttackRequest>,
    combo: u32,
    rng: ChaCha8Rng,
    last_intent: InputIntent,
    refused: Option<RefusalReason>,
    events: Vec<CombatEvent>,
    effects: Vec<EffectSignal>,
    tick: u64,
}

impl CombatController {
    /// Creates a controller with the reference rule table.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration fails validation.
    pub fn new(config: CombatConfig) -> ConfigResult<Self> {
        let rules = RuleTable::standard();
        Self::with_rules(config, rules)
    }

    /// Creates a controller with a custom rule table.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration fails validation.
    pub fn with_rules(config: CombatConfig, rules: RuleTable) -> ConfigResult<Self> {
        config.validate()?;
        Ok(Self::from_validated(config, rules))
    }

    /// Builds a controller from a configuration that already passed validation.
    fn from_validated(config: CombatConfig, rules: RuleTable) -> Self {
        Self {
            state: AttackState::Idle,
            activation: None,
            timers: TimerRegistry::with_all(),
            channels: ChannelSet::new(),
            eligibility: EligibilityFlags::new(),
            dispatcher: HitDispatcher::with_rules(rules, config.guard_break_threshold),
            intents: IntentResolver::new(&config),
            was_carrying: false,
            queued: None,
            combo: 0,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            last_intent: InputIntent::default(),
            refused: None,
            events: Vec::new(),
            effects: Vec::new(),
            tick: 0,
            config,
        }
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &CombatConfig {
        &self.config
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> AttackState {
        self.state
    }

    /// Ticks advanced so far.
    #[must_use]
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// The live activation, if any.
    #[must_use]
    pub fn activation(&self) -> Option<&AttackActivation> {
        self.activation.as_ref()
    }

    /// Hit buffer of the live activation.
    #[must_use]
    pub fn hit_buffer(&self) -> Option<&HitBuffer> {
        self.activation.as_ref().map(|activation| &activation.hits)
    }

    /// Frame timers.
    #[must_use]
    pub fn timers(&self) -> &TimerRegistry {
        &self.timers
    }

    /// Channel set.
    #[must_use]
    pub fn channels(&self) -> &ChannelSet {
        &self.channels
    }

    /// Eligibility flags.
    #[must_use]
    pub fn eligibility(&self) -> &EligibilityFlags {
        &self.eligibility
    }

    /// Hit dispatcher.
    #[must_use]
    pub fn dispatcher(&self) -> &HitDispatcher {
        &self.dispatcher
    }

    /// Intent resolved on the last tick.
    #[must_use]
    pub const fn last_intent(&self) -> InputIntent {
        self.last_intent
    }

    /// Request queued behind the telegraph.
    #[must_use]
    pub const fn queued(&self) -> Option<AttackRequest> {
        self.queued
    }

    /// Current rethrow chain index.
    #[must_use]
    pub const fn combo_index(&self) -> u32 {
        self.combo
    }

    /// Drains recorded telemetry events.
    pub fn take_events(&mut self) -> Vec<CombatEvent> {
        std::mem::take(&mut self.events)
    }

    /// Drains pending effect signals.
    pub fn take_effects(&mut self) -> Vec<EffectSignal> {
        std::mem::take(&mut self.effects)
    }

    /// Captures the controller state.
    #[must_use]
    pub fn snapshot(&self) -> CombatSnapshot {
        CombatSnapshot {
            tick: self.tick,
            state: self.state,
            timers: self
                .timers
                .iter()
                .map(|(id, timer)| (id, timer.as_raw()))
                .collect(),
            channels: self.channels.enabled().collect(),
            eligibility: self.eligibility,
            step: self.activation.as_ref().map(|activation| activation.step),
            combo_index: self.combo,
            hits: self
                .hit_buffer()
                .map(|hits| hits.as_slice().to_vec())
                .unwrap_or_default(),
            queued: self.queued.map(|request| request.variant),
        }
    }

    // -------------------------------------------------------------------------
    // Tick
    // -------------------------------------------------------------------------

    /// Advances the controller by one simulation frame.
    pub fn advance(&mut self, input: &InputFrame, services: &mut Collaborators<'_>) -> TickReport {
        self.tick += 1;
        self.refused = None;

        let intent = self.intents.resolve(input);
        self.last_intent = intent;
        let env = self.observe(services);

        for channel in self.channels.tick(&mut self.timers) {
            debug!(tick = self.tick, %channel, "channel expired");
            self.events.push(CombatEvent::ChannelExpired {
                tick: self.tick,
                channel,
            });
        }
        self.tick_telegraph(services);

        match self.state {
            AttackState::Idle => self.step_idle(&intent, env, services),
            AttackState::GroundSpin | AttackState::AirSpin | AttackState::AquaticSpin => {
                self.step_spin(&intent, env, services);
            }
            AttackState::HeavyAttack => self.step_heavy(env, services),
            AttackState::Taunt => self.step_taunt(env, services),
            AttackState::FallRecovery => self.step_fall(&intent, env, services),
        }

        self.dispatcher.prune_guard(&*services.world);
        let (credited, deferred) = self.dispatch_hits(services);

        TickReport {
            tick: self.tick,
            state: self.state,
            intent,
            refused: self.refused,
            credited,
            deferred,
        }
    }

    /// Cancels whatever is running because of an external event.
    ///
    /// Drops the activation and its hit buffer, invalidates every channel,
    /// stops the telegraph and returns to idle, regardless of the current
    /// state.
    pub fn cancel(&mut self, reason: CancelReason, animator: &mut dyn Animator) {
        let from = self.state;
        self.sweep();
        self.eligibility.reset();
        self.combo = 0;
        self.dispatcher.clear_guard();
        self.intents.reset_gesture();
        animator.detach(Prop::Hammer);
        animator.detach(Prop::Flag);
        self.state = AttackState::Idle;

        debug!(tick = self.tick, %from, ?reason, "combat cancelled");
        self.events.push(CombatEvent::Cancelled {
            tick: self.tick,
            reason,
        });
    }

    fn observe(&mut self, services: &Collaborators<'_>) -> Surroundings {
        let carrying = services.actor.is_carrying();
        let picked_up = carrying && !self.was_carrying;
        self.was_carrying = carrying;

        Surroundings {
            grounded: services.physics.is_grounded(),
            submerged: services.physics.is_submerged(),
            at_surface: services.physics.is_at_water_surface(),
            carrying,
            picked_up,
            can_attack: services.actor.can_start_attack(),
        }
    }

    fn tick_telegraph(&mut self, services: &mut Collaborators<'_>) {
        if self.timers.tick(TimerId::Telegraph) {
            self.channels.invalidate(ChannelId::Charge, &mut self.timers);
            self.queued = None;
            debug!(tick = self.tick, "telegraph expired");
            self.events
                .push(CombatEvent::TelegraphExpired { tick: self.tick });
        }

        if !self.timers.get(TimerId::Telegraph).is_pending() || self.state.is_spin() {
            return;
        }
        if clips::SPINS.iter().any(|clip| services.animator.is_playing(clip)) {
            return;
        }

        let frames = self.config.telegraph_window;
        self.timers.promote(TimerId::Telegraph, frames);
        self.channels
            .validate(ChannelId::Charge, frames, &mut self.timers);
        services.animator.play_upper_body(clips::SPIN_CHARGE);
        self.effects.push(EffectSignal::new(
            EffectKind::ChargeGlow,
            services.physics.position(),
        ));

        debug!(tick = self.tick, frames, "telegraph promoted");
        self.events.push(CombatEvent::TelegraphPromoted {
            tick: self.tick,
            frames,
        });
    }

    // -------------------------------------------------------------------------
    // State Logic
    // -------------------------------------------------------------------------

    fn step_idle(&mut self, intent: &InputIntent, env: Surroundings, services: &mut Collaborators<'_>) {
        if intent.heavy {
            self.enter_heavy(env, services);
            return;
        }
        if intent.taunt {
            self.enter_taunt(env, services);
            return;
        }

        if let Some(request) = self.queued {
            if self.timers.is_active(TimerId::Telegraph) {
                self.attempt(request, env, services);
                return;
            }
            self.queued = None;
        }

        if intent.attack {
            let request = AttackRequest::from_intent(intent, env.carrying);
            self.attempt(request, env, services);
        }
    }

    fn step_spin(&mut self, intent: &InputIntent, env: Surroundings, services: &mut Collaborators<'_>) {
        let Some(activation) = self.activation.as_mut() else {
            self.state = AttackState::Idle;
            return;
        };
        activation.step += 1;
        let step = activation.step;
        let finished = activation.finished;

        if self.state == AttackState::AquaticSpin && !env.submerged && !env.at_surface {
            self.cancel(CancelReason::ForcedOutOfWater, &mut *services.animator);
            return;
        }

        if intent.attack && step >= self.config.rethrow_min_step {
            let request = AttackRequest::from_intent(intent, env.carrying);
            if self.attempt(request, env, services) {
                return;
            }
        }

        if services.animator.is_finished() {
            let next = if finished || env.grounded || self.state == AttackState::AquaticSpin {
                AttackState::Idle
            } else {
                AttackState::FallRecovery
            };
            self.end_activation(next);
        }
    }

    fn step_fall(&mut self, intent: &InputIntent, env: Surroundings, services: &mut Collaborators<'_>) {
        if env.supported() {
            self.state = AttackState::Idle;
            self.eligibility.reset();
            self.combo = 0;
            debug!(tick = self.tick, "landed");
            self.events.push(CombatEvent::Landed { tick: self.tick });
            self.step_idle(intent, env, services);
            return;
        }

        if intent.heavy {
            self.enter_heavy(env, services);
        } else if intent.attack {
            let request = AttackRequest::from_intent(intent, env.carrying);
            self.attempt(request, env, services);
        }
    }

    fn step_heavy(&mut self, env: Surroundings, services: &mut Collaborators<'_>) {
        let Some(activation) = self.activation.as_mut() else {
            self.state = AttackState::Idle;
            return;
        };
        activation.step += 1;
        let step = activation.step;
        let lost = match activation.origin {
            OriginContext::Grounded => !env.grounded,
            OriginContext::Aquatic => !env.submerged,
            OriginContext::Airborne | OriginContext::Carrying => false,
        };

        if lost {
            trace!(tick = self.tick, "heavy attack lost its context");
            self.finish_script(Prop::Hammer, env, services.animator);
            return;
        }
        if step == self.config.heavy_hit_step {
            self.channels
                .validate(ChannelId::GroundSlam, self.config.heavy_window, &mut self.timers);
        }
        if services.animator.is_finished() {
            self.finish_script(Prop::Hammer, env, services.animator);
        }
    }

    fn step_taunt(&mut self, env: Surroundings, services: &mut Collaborators<'_>) {
        let Some(activation) = self.activation.as_mut() else {
            self.state = AttackState::Idle;
            return;
        };
        activation.step += 1;
        let step = activation.step;

        if !env.grounded {
            trace!(tick = self.tick, "taunt left the ground");
            self.finish_script(Prop::Flag, env, services.animator);
            return;
        }
        if step == self.config.taunt_hit_step {
            self.channels
                .validate(ChannelId::Strike, self.config.taunt_window, &mut self.timers);
        }
        if services.animator.is_finished() {
            self.finish_script(Prop::Flag, env, services.animator);
        }
    }

    // -------------------------------------------------------------------------
    // Transitions
    // -------------------------------------------------------------------------

    /// Tries to start a spin. Returns true if an activation started.
    fn attempt(&mut self, request: AttackRequest, env: Surroundings, services: &mut Collaborators<'_>) -> bool {
        if !env.can_attack {
            self.refuse(RefusalReason::Blocked);
            return false;
        }
        if env.picked_up {
            self.refuse(RefusalReason::CarryPickup);
            return false;
        }

        if self.eligibility.is_eligible(request.variant) {
            if self.state != AttackState::Idle {
                self.combo += 1;
            }
            self.begin_spin(request, env, services);
            true
        } else {
            self.arm_telegraph(request);
            false
        }
    }

    fn arm_telegraph(&mut self, request: AttackRequest) {
        self.refused = Some(RefusalReason::Ineligible);
        if self.timers.is_active(TimerId::Telegraph) {
            trace!(tick = self.tick, "telegraph already armed");
            return;
        }
        self.timers.request(TimerId::Telegraph);
        self.queued = Some(request);

        debug!(tick = self.tick, variant = %request.variant, "telegraph armed");
        self.events.push(CombatEvent::TelegraphArmed {
            tick: self.tick,
            variant: request.variant,
        });
    }

    fn begin_spin(&mut self, request: AttackRequest, env: Surroundings, services: &mut Collaborators<'_>) {
        let from = self.state;
        self.sweep_channels();

        let request = if env.carrying {
            AttackRequest::standard()
        } else {
            request
        };
        let variant = request.variant;
        let origin = env.origin();
        let state = match origin {
            OriginContext::Aquatic => AttackState::AquaticSpin,
            OriginContext::Grounded => AttackState::GroundSpin,
            OriginContext::Carrying if env.grounded => AttackState::GroundSpin,
            OriginContext::Carrying | OriginContext::Airborne => AttackState::AirSpin,
        };

        if let Some(switch) = self.eligibility.mark_started(variant) {
            debug!(tick = self.tick, %switch, "variant switch");
            self.events.push(CombatEvent::VariantSwitched {
                tick: self.tick,
                switch,
            });
        }

        let window = match variant {
            AttackVariant::Standard => {
                self.channels
                    .validate(ChannelId::Spin, self.config.spin_window, &mut self.timers);
                self.config.spin_window
            }
            AttackVariant::Special => {
                self.channels
                    .validate(ChannelId::Grab, self.config.grab_window, &mut self.timers);
                self.config.grab_window
            }
            AttackVariant::Double => {
                self.channels
                    .validate(ChannelId::Spin, self.config.spin_window, &mut self.timers);
                self.channels.validate(
                    ChannelId::DoubleSpin,
                    self.config.double_spin_window,
                    &mut self.timers,
                );
                self.config.double_spin_window
            }
        };
        self.channels
            .validate(ChannelId::GuardWatch, window, &mut self.timers);

        let clip = spin_clip(variant, origin, request.hand);
        services.animator.play(clip);

        let mut activation = AttackActivation::new(
            ActivationKind::Spin(variant),
            origin,
            clip,
            self.config.hit_capacity,
        );
        activation.combo_index = self.combo;
        activation.hand = request.hand;
        activation.is_finishing_hit = self.combo >= self.config.finishing_combo_index;

        if self.activation.replace(activation).is_some() {
            self.events.push(CombatEvent::ActivationEnded {
                tick: self.tick,
                from,
                to: state,
            });
        }
        self.state = state;

        debug!(
            tick = self.tick,
            %from,
            to = %state,
            %variant,
            ?origin,
            combo = self.combo,
            "activation started"
        );
        self.events.push(CombatEvent::ActivationStarted {
            tick: self.tick,
            state,
            variant,
            origin,
            combo_index: self.combo,
        });
    }

    fn enter_heavy(&mut self, env: Surroundings, services: &mut Collaborators<'_>) {
        if !env.can_attack {
            self.refuse(RefusalReason::Blocked);
            return;
        }
        if env.carrying {
            self.refuse(RefusalReason::NoContext);
            return;
        }

        self.sweep();
        let origin = if env.submerged {
            OriginContext::Aquatic
        } else if env.grounded {
            OriginContext::Grounded
        } else {
            OriginContext::Airborne
        };
        services.animator.attach(Prop::Hammer);
        services.animator.play(clips::HAMMER_SLAM);
        self.start_script(
            AttackState::HeavyAttack,
            AttackActivation::new(
                ActivationKind::Heavy,
                origin,
                clips::HAMMER_SLAM,
                self.config.hit_capacity,
            ),
        );
    }

    fn enter_taunt(&mut self, env: Surroundings, services: &mut Collaborators<'_>) {
        if !env.can_attack {
            self.refuse(RefusalReason::Blocked);
            return;
        }
        if !env.grounded || env.submerged || env.carrying {
            self.refuse(RefusalReason::NoContext);
            return;
        }

        self.sweep();
        let clip = clips::TAUNTS[self.rng.gen_range(0..clips::TAUNTS.len())];
        services.animator.attach(Prop::Flag);
        services.animator.play(clip);
        self.start_script(
            AttackState::Taunt,
            AttackActivation::new(
                ActivationKind::Taunt,
                OriginContext::Grounded,
                clip,
                self.config.hit_capacity,
            ),
        );
    }

    fn start_script(&mut self, state: AttackState, activation: AttackActivation) {
        let clip = activation.clip;
        self.activation = Some(activation);
        self.state = state;

        debug!(tick = self.tick, %state, clip, "scripted attack started");
        self.events.push(CombatEvent::ScriptStarted {
            tick: self.tick,
            state,
            clip: clip.to_string(),
        });
    }

    fn finish_script(&mut self, prop: Prop, env: Surroundings, animator: &mut dyn Animator) {
        animator.detach(prop);
        let next = if env.supported() {
            AttackState::Idle
        } else {
            AttackState::FallRecovery
        };
        self.end_activation(next);
    }

    /// Leaves the live activation for `next`.
    ///
    /// A pending telegraph survives only into fall recovery; a counting one
    /// never survives.
    fn end_activation(&mut self, next: AttackState) {
        let from = self.state;
        self.channels.invalidate_all(&mut self.timers);

        let keep_pending =
            next == AttackState::FallRecovery && self.timers.get(TimerId::Telegraph).is_pending();
        if !keep_pending {
            self.timers.clear(TimerId::Telegraph);
            self.queued = None;
        }

        self.activation = None;
        if next == AttackState::Idle {
            self.eligibility.reset();
            self.combo = 0;
        }
        self.state = next;

        debug!(tick = self.tick, %from, to = %next, "activation ended");
        self.events.push(CombatEvent::ActivationEnded {
            tick: self.tick,
            from,
            to: next,
        });
    }

    /// Invalidates every channel and drops the telegraph and its queue.
    fn sweep_channels(&mut self) {
        self.channels.invalidate_all(&mut self.timers);
        self.timers.clear(TimerId::Telegraph);
        self.queued = None;
    }

    /// Also drops the activation and its hit buffer.
    fn sweep(&mut self) {
        self.sweep_channels();
        self.activation = None;
    }

    fn refuse(&mut self, reason: RefusalReason) {
        trace!(tick = self.tick, state = %self.state, ?reason, "attack refused");
        self.refused = Some(reason);
        self.events.push(CombatEvent::AttackRefused {
            tick: self.tick,
            reason,
        });
    }

    // -------------------------------------------------------------------------
    // Dispatch
    // -------------------------------------------------------------------------

    fn dispatch_hits(&mut self, services: &mut Collaborators<'_>) -> (usize, usize) {
        let Some(activation) = self.activation.as_mut() else {
            return (0, 0);
        };
        let channels: Vec<ChannelId> = self.channels.hit_channels().collect();
        if channels.is_empty() {
            return (0, 0);
        }

        let striker = Striker {
            position: services.physics.position(),
            velocity: services.physics.velocity(),
            finishing_hit: activation.is_finishing_hit,
        };
        let mut credited = 0;
        let mut deferred = 0;

        for channel in channels {
            for id in services.world.contacts(channel) {
                let Some(target) = services.world.describe(id) else {
                    trace!(tick = self.tick, %channel, target = %id, "contact vanished");
                    continue;
                };
                let distance = services.physics.distance_to(id);
                let outcome = self.dispatcher.resolve(
                    channel,
                    &target,
                    distance,
                    &mut activation.hits,
                    &striker,
                    &mut *services.world,
                );

                let (Some(rule), Some(message)) = (outcome.rule, outcome.message) else {
                    deferred += 1;
                    continue;
                };
                credited += 1;
                if activation.is_finishing_hit {
                    activation.finished = true;
                }
                if let Some(effect) = outcome.effect {
                    self.effects.push(effect);
                }
                self.events.push(CombatEvent::HitCredited {
                    tick: self.tick,
                    channel,
                    target: id,
                    classification: outcome.classification,
                    rule: rule.to_string(),
                    message,
                    accepted: outcome.accepted,
                });
            }
        }

        (credited, deferred)
    }
}

impl Default for CombatController {
    fn default() -> Self {
        // The reference configuration always validates.
        Self::from_validated(CombatConfig::default(), RuleTable::standard())
    }
}
