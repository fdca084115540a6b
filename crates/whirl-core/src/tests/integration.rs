//! End-to-end scenarios for the combat controller.
//!
//! Each test scripts the mock collaborators tick by tick and checks the
//! controller's state, timers, hit buffer, and the messages the world
//! received.

use crate::channel::ChannelId;
use crate::config::{CombatConfig, ControlConfig, PrimaryTrigger};
use crate::controller::{
    clips, AttackState, AttackVariant, CancelReason, CombatController, CombatSnapshot,
    RefusalReason, VariantSwitch,
};
use crate::input::{Buttons, InputFrame};
use crate::message::{CombatEvent, EffectKind, TargetMessage};
use crate::services::Prop;
use crate::target::{TargetKind, TargetState};
use crate::timer::{FrameTimer, TimerId};

use super::helpers::{
    attack, controller, double_attack, heavy, init_tracing, special_attack, taunt, Rig,
};

fn telegraph(controller: &CombatController) -> FrameTimer {
    controller.timers().get(TimerId::Telegraph)
}

fn count_events(events: &[CombatEvent], pred: impl Fn(&CombatEvent) -> bool) -> usize {
    events.iter().filter(|event| pred(event)).count()
}

/// Airborne rig left in fall recovery after one standard spin.
fn fall_recovery_after_spin() -> (CombatController, Rig) {
    let mut ctrl = controller();
    let mut rig = Rig::airborne();
    rig.advance(&mut ctrl, &attack());
    assert_eq!(ctrl.state(), AttackState::AirSpin);
    rig.finish_clip(&mut ctrl);
    assert_eq!(ctrl.state(), AttackState::FallRecovery);
    (ctrl, rig)
}

// =============================================================================
// Hit Crediting
// =============================================================================

/// A breakable obstacle is destroyed once per activation and again by the next one.
#[test]
fn breakable_credited_once_per_activation() {
    let mut ctrl = controller();
    let mut rig = Rig::grounded();
    let obstacle = rig.world.spawn(1, TargetKind::Crate);

    rig.world.touch(ChannelId::Spin, obstacle);
    let first = rig.advance(&mut ctrl, &double_attack());
    assert_eq!(first.tick, 1);
    assert_eq!(first.state, AttackState::GroundSpin);
    assert_eq!(first.credited, 1);
    assert_eq!(ctrl.hit_buffer().map(|hits| hits.len()), Some(1));
    assert_eq!(rig.world.messages_for(obstacle), vec![TargetMessage::Destroy]);

    rig.world.clear_contacts();
    rig.idle(&mut ctrl, 3);
    rig.world.touch(ChannelId::DoubleSpin, obstacle);
    let fifth = rig.advance(&mut ctrl, &InputFrame::idle());
    assert_eq!(fifth.tick, 5);
    assert_eq!(fifth.credited, 0);
    assert_eq!(fifth.deferred, 1);
    assert_eq!(rig.world.received.len(), 1);

    rig.world.clear_contacts();
    rig.finish_clip(&mut ctrl);
    assert_eq!(ctrl.state(), AttackState::Idle);
    assert!(ctrl.hit_buffer().is_none());

    rig.world.touch(ChannelId::Spin, obstacle);
    let again = rig.advance(&mut ctrl, &attack());
    assert_eq!(again.credited, 1);
    assert_eq!(ctrl.hit_buffer().map(|hits| hits.len()), Some(1));
    assert_eq!(
        rig.world.messages_for(obstacle),
        vec![TargetMessage::Destroy, TargetMessage::Destroy]
    );

    let effects = ctrl.take_effects();
    assert_eq!(
        effects
            .iter()
            .filter(|effect| effect.kind == EffectKind::Debris)
            .count(),
        2
    );
}

/// A rethrow mid-spin starts a fresh buffer.
#[test]
fn rethrow_starts_fresh_buffer() {
    let mut ctrl = controller();
    let mut rig = Rig::airborne();
    let grunt = rig.world.spawn(2, TargetKind::Grunt);
    rig.world.touch(ChannelId::Spin, grunt);

    rig.advance(&mut ctrl, &attack());
    assert_eq!(rig.world.received.len(), 1);

    rig.idle(&mut ctrl, 7);
    let report = rig.advance(&mut ctrl, &special_attack());
    assert_eq!(report.state, AttackState::AirSpin);
    assert_eq!(ctrl.combo_index(), 1);
    assert!(ctrl.hit_buffer().is_some_and(|hits| hits.is_empty()));
}

/// A hit from a finishing activation launches the enemy and ends straight in idle.
#[test]
fn finishing_hit_launches_and_returns_to_idle() {
    let mut ctrl = controller();
    let mut rig = Rig::airborne();
    let grunt = rig.world.spawn(3, TargetKind::Grunt);
    rig.world.touch(ChannelId::Spin, grunt);

    rig.advance(&mut ctrl, &special_attack());
    assert!(rig.world.received.is_empty());
    rig.idle(&mut ctrl, 8);

    let report = rig.advance(&mut ctrl, &attack());
    assert_eq!(report.credited, 1);
    let activation = ctrl.activation().expect("rethrow started");
    assert!(activation.is_finishing_hit);
    assert!(activation.finished);
    assert!(matches!(
        rig.world.messages_for(grunt).as_slice(),
        [TargetMessage::Launch { .. }]
    ));

    rig.finish_clip(&mut ctrl);
    assert_eq!(ctrl.state(), AttackState::Idle);
}

/// Refused messages still count as credited.
#[test]
fn refused_message_is_still_credited() {
    let mut ctrl = controller();
    let mut rig = Rig::grounded();
    rig.world.accept = false;
    let lever = rig.world.spawn(4, TargetKind::Lever);
    rig.world.touch(ChannelId::Spin, lever);

    let report = rig.advance(&mut ctrl, &attack());
    assert_eq!(report.credited, 1);

    let events = ctrl.take_events();
    assert!(events.iter().any(|event| matches!(
        event,
        CombatEvent::HitCredited {
            message: TargetMessage::Toggle,
            accepted: false,
            ..
        }
    )));
}

/// Targets with no matching rule are deferred and may be credited later.
#[test]
fn unmatched_contact_is_deferred() {
    let mut ctrl = controller();
    let mut rig = Rig::grounded();
    let grunt = rig.world.spawn(5, TargetKind::Grunt);
    rig.world.touch(ChannelId::Grab, grunt);

    let report = rig.advance(&mut ctrl, &special_attack());
    assert_eq!(report.credited, 0);
    assert_eq!(report.deferred, 1);
    assert!(ctrl.hit_buffer().is_some_and(|hits| !hits.contains(grunt)));
    assert!(rig.world.received.is_empty());
}

/// A full hit buffer drops further credits for the rest of the activation.
#[test]
fn full_buffer_never_recredits() {
    init_tracing();
    let config = CombatConfig {
        hit_capacity: 1,
        ..CombatConfig::default()
    };
    let mut ctrl = CombatController::new(config).expect("valid config");
    let mut rig = Rig::grounded();
    let first = rig.world.spawn(1, TargetKind::Crate);
    let second = rig.world.spawn(2, TargetKind::Crate);
    rig.world.touch(ChannelId::Spin, first);
    rig.world.touch(ChannelId::Spin, second);

    let report = rig.advance(&mut ctrl, &attack());
    assert_eq!(report.credited, 1);
    assert_eq!(report.deferred, 1);

    let last = rig.idle(&mut ctrl, 4).expect("ran four ticks");
    assert_eq!(last.state, AttackState::GroundSpin);
    assert_eq!(last.credited, 0);
    assert_eq!(last.deferred, 2);

    assert_eq!(rig.world.messages_for(first), vec![TargetMessage::Destroy]);
    assert!(rig.world.messages_for(second).is_empty());
    assert_eq!(ctrl.hit_buffer().map(|hits| hits.as_slice().to_vec()), Some(vec![first]));
}

// =============================================================================
// Channel Windows
// =============================================================================

/// The spin channel credits on its last frame.
#[test]
fn spin_channel_live_on_last_frame() {
    let mut ctrl = controller();
    let mut rig = Rig::grounded();
    rig.animator.clip_frames = 60;
    let obstacle = rig.world.spawn(6, TargetKind::Boulder);

    rig.advance(&mut ctrl, &attack());
    rig.idle(&mut ctrl, 19);
    assert!(ctrl.channels().is_enabled(ChannelId::Spin));

    rig.world.touch(ChannelId::Spin, obstacle);
    let report = rig.advance(&mut ctrl, &InputFrame::idle());
    assert_eq!(report.tick, 21);
    assert_eq!(report.credited, 1);
}

/// An expiring channel gets no extra hit on the tick it expires.
#[test]
fn expired_channel_gets_no_extra_hit() {
    let mut ctrl = controller();
    let mut rig = Rig::grounded();
    rig.animator.clip_frames = 60;
    let obstacle = rig.world.spawn(6, TargetKind::Boulder);

    rig.advance(&mut ctrl, &attack());
    rig.idle(&mut ctrl, 20);
    assert!(ctrl.channels().is_enabled(ChannelId::Spin));

    rig.world.touch(ChannelId::Spin, obstacle);
    let report = rig.advance(&mut ctrl, &InputFrame::idle());
    assert_eq!(report.tick, 22);
    assert_eq!(report.credited, 0);
    assert!(!ctrl.channels().is_enabled(ChannelId::Spin));
    assert!(rig.world.received.is_empty());

    let events = ctrl.take_events();
    assert!(events.iter().any(|event| matches!(
        event,
        CombatEvent::ChannelExpired {
            tick: 22,
            channel: ChannelId::Spin
        }
    )));
}

/// Every exit invalidates every channel.
#[test]
fn exit_invalidates_channels() {
    let mut ctrl = controller();
    let mut rig = Rig::grounded();

    rig.advance(&mut ctrl, &double_attack());
    assert!(ctrl.channels().is_enabled(ChannelId::Spin));
    assert!(ctrl.channels().is_enabled(ChannelId::DoubleSpin));
    assert!(ctrl.channels().is_enabled(ChannelId::GuardWatch));

    rig.finish_clip(&mut ctrl);
    assert_eq!(ctrl.state(), AttackState::Idle);
    assert_eq!(ctrl.channels().enabled().count(), 0);
    for channel in ChannelId::ALL {
        assert!(!ctrl.timers().is_active(channel.timer()), "{channel} still ticking");
    }
}

// =============================================================================
// Rethrow and Telegraph
// =============================================================================

/// An ineligible request in fall recovery arms the telegraph instead of starting.
#[test]
fn ineligible_rethrow_arms_telegraph_for_exactly_one_window() {
    let (mut ctrl, mut rig) = fall_recovery_after_spin();
    assert!(!ctrl.eligibility().can_standard);

    let armed = rig.advance(&mut ctrl, &attack());
    assert_eq!(armed.state, AttackState::FallRecovery);
    assert_eq!(armed.refused, Some(RefusalReason::Ineligible));
    assert_eq!(telegraph(&ctrl).as_raw(), -2);
    assert!(!ctrl.channels().is_enabled(ChannelId::Charge));

    rig.advance(&mut ctrl, &InputFrame::idle());
    assert_eq!(telegraph(&ctrl), FrameTimer::Counting(21));
    assert!(ctrl.channels().is_enabled(ChannelId::Charge));
    assert!(!ctrl.channels().any_hit_channel());
    assert_eq!(rig.animator.upper_body, vec![clips::SPIN_CHARGE.to_string()]);

    rig.idle(&mut ctrl, 20);
    assert!(telegraph(&ctrl).is_active());

    rig.advance(&mut ctrl, &InputFrame::idle());
    assert_eq!(telegraph(&ctrl).as_raw(), -1);
    assert!(!ctrl.channels().is_enabled(ChannelId::Charge));
    assert!(ctrl.queued().is_none());
    assert_eq!(ctrl.state(), AttackState::FallRecovery);

    let events = ctrl.take_events();
    assert_eq!(
        count_events(&events, |event| matches!(event, CombatEvent::TelegraphExpired { .. })),
        1
    );
}

/// A second request while the telegraph is live does not re-arm it.
#[test]
fn telegraph_is_not_rearmed() {
    let (mut ctrl, mut rig) = fall_recovery_after_spin();

    rig.advance(&mut ctrl, &attack());
    rig.advance(&mut ctrl, &InputFrame::idle());
    rig.idle(&mut ctrl, 5);
    rig.advance(&mut ctrl, &attack());
    assert_eq!(telegraph(&ctrl), FrameTimer::Counting(15));

    let events = ctrl.take_events();
    assert_eq!(
        count_events(&events, |event| matches!(event, CombatEvent::TelegraphArmed { .. })),
        1
    );
}

/// Landing while the telegraph is live starts the queued spin.
#[test]
fn landing_releases_queued_spin() {
    let (mut ctrl, mut rig) = fall_recovery_after_spin();

    rig.advance(&mut ctrl, &attack());
    rig.advance(&mut ctrl, &InputFrame::idle());
    assert!(ctrl.queued().is_some());

    rig.physics.grounded = true;
    let report = rig.advance(&mut ctrl, &InputFrame::idle());
    assert_eq!(report.state, AttackState::GroundSpin);
    assert_eq!(telegraph(&ctrl).as_raw(), -1);
    assert!(ctrl.queued().is_none());
    assert_eq!(ctrl.combo_index(), 0);

    let events = ctrl.take_events();
    assert!(events.iter().any(|event| matches!(event, CombatEvent::Landed { .. })));
}

/// A pending telegraph survives a fall-through into recovery but not into idle.
#[test]
fn pending_telegraph_survives_fall_but_not_landing_exit() {
    let mut ctrl = controller();
    let mut rig = Rig::airborne();
    rig.advance(&mut ctrl, &attack());
    rig.idle(&mut ctrl, 8);
    rig.advance(&mut ctrl, &attack());
    assert!(telegraph(&ctrl).is_pending());

    rig.finish_clip(&mut ctrl);
    assert_eq!(ctrl.state(), AttackState::FallRecovery);
    assert!(telegraph(&ctrl).is_pending());

    let mut ctrl = controller();
    let mut rig = Rig::grounded();
    rig.advance(&mut ctrl, &attack());
    rig.idle(&mut ctrl, 8);
    rig.advance(&mut ctrl, &attack());
    assert!(telegraph(&ctrl).is_pending());

    rig.finish_clip(&mut ctrl);
    assert_eq!(ctrl.state(), AttackState::Idle);
    assert_eq!(telegraph(&ctrl), FrameTimer::Inactive);
}

/// Rethrow input before the minimum step is ignored.
#[test]
fn early_rethrow_is_ignored() {
    let mut ctrl = controller();
    let mut rig = Rig::airborne();
    rig.advance(&mut ctrl, &attack());
    rig.idle(&mut ctrl, 3);

    let report = rig.advance(&mut ctrl, &special_attack());
    assert_eq!(report.refused, None);
    assert_eq!(ctrl.combo_index(), 0);
    assert_eq!(
        ctrl.activation().and_then(|activation| activation.variant()),
        Some(AttackVariant::Standard)
    );
}

// =============================================================================
// Eligibility
// =============================================================================

/// Special then standard records the switch exactly once.
#[test]
fn cross_variant_switch_recorded_once() {
    let mut ctrl = controller();
    let mut rig = Rig::airborne();

    rig.advance(&mut ctrl, &special_attack());
    rig.finish_clip(&mut ctrl);
    assert_eq!(ctrl.state(), AttackState::FallRecovery);

    let switched = rig.advance(&mut ctrl, &attack());
    assert_eq!(switched.state, AttackState::AirSpin);
    assert!(!ctrl.eligibility().can_standard);
    assert_eq!(
        ctrl.eligibility().switch(),
        Some(VariantSwitch::StandardAfterSpecial)
    );

    rig.idle(&mut ctrl, 8);
    rig.advance(&mut ctrl, &special_attack());
    rig.advance(&mut ctrl, &attack());
    assert_eq!(
        ctrl.eligibility().switch(),
        Some(VariantSwitch::StandardAfterSpecial)
    );

    let events = ctrl.take_events();
    assert_eq!(
        count_events(&events, |event| matches!(event, CombatEvent::VariantSwitched { .. })),
        1
    );
}

/// Landing restores both variants.
#[test]
fn landing_restores_eligibility() {
    let (mut ctrl, mut rig) = fall_recovery_after_spin();
    rig.physics.grounded = true;
    rig.advance(&mut ctrl, &InputFrame::idle());

    assert_eq!(ctrl.state(), AttackState::Idle);
    assert!(ctrl.eligibility().can_standard);
    assert!(ctrl.eligibility().can_special);
    assert_eq!(ctrl.eligibility().switch(), None);
}

// =============================================================================
// Preconditions
// =============================================================================

/// An attack on the same frame as a pickup is suppressed for that frame only.
#[test]
fn carry_pickup_debounce() {
    let mut ctrl = controller();
    let mut rig = Rig::grounded();

    rig.actor.carrying = true;
    let report = rig.advance(&mut ctrl, &attack());
    assert_eq!(report.refused, Some(RefusalReason::CarryPickup));
    assert_eq!(report.state, AttackState::Idle);

    let report = rig.advance(&mut ctrl, &special_attack());
    assert_eq!(report.state, AttackState::GroundSpin);
    assert_eq!(
        ctrl.activation().and_then(|activation| activation.variant()),
        Some(AttackVariant::Standard)
    );
    assert_eq!(rig.animator.current.as_deref(), Some(clips::SPIN_CARRY));
}

/// Blocked actors never start attacks.
#[test]
fn gate_refuses_attack() {
    let mut ctrl = controller();
    let mut rig = Rig::grounded();
    rig.actor.respawning = true;

    let report = rig.advance(&mut ctrl, &attack());
    assert_eq!(report.refused, Some(RefusalReason::Blocked));
    assert_eq!(ctrl.state(), AttackState::Idle);

    rig.actor.respawning = false;
    rig.actor.exclusive = true;
    let report = rig.advance(&mut ctrl, &heavy());
    assert_eq!(report.refused, Some(RefusalReason::Blocked));
    assert_eq!(ctrl.state(), AttackState::Idle);
}

/// A refused rethrow abandons the attempt without arming the telegraph.
#[test]
fn blocked_rethrow_is_abandoned() {
    let (mut ctrl, mut rig) = fall_recovery_after_spin();
    rig.actor.restricted = true;

    let report = rig.advance(&mut ctrl, &attack());
    assert_eq!(report.refused, Some(RefusalReason::Blocked));
    assert_eq!(telegraph(&ctrl), FrameTimer::Inactive);
}

// =============================================================================
// Scripted States
// =============================================================================

/// Entering the heavy attack discards a pending telegraph.
#[test]
fn heavy_attack_discards_pending_telegraph() {
    let (mut ctrl, mut rig) = fall_recovery_after_spin();

    // The spin clip is still blending out, so the telegraph stays pending.
    rig.animator.remaining = 5;
    rig.advance(&mut ctrl, &attack());
    assert!(telegraph(&ctrl).is_pending());
    assert!(ctrl.queued().is_some());

    let report = rig.advance(&mut ctrl, &heavy());
    assert_eq!(report.state, AttackState::HeavyAttack);
    assert_eq!(telegraph(&ctrl), FrameTimer::Inactive);
    assert!(ctrl.queued().is_none());
    assert!(rig.animator.upper_body.is_empty());
    assert!(rig.animator.props.contains(&Prop::Hammer));
}

/// The heavy attack slams at its fixed step and returns home.
#[test]
fn heavy_attack_timeline() {
    let mut ctrl = controller();
    let mut rig = Rig::grounded();
    let obstacle = rig.world.spawn(7, TargetKind::IceBlock);
    rig.world.touch_all(obstacle);

    rig.advance(&mut ctrl, &heavy());
    assert_eq!(ctrl.state(), AttackState::HeavyAttack);
    assert_eq!(rig.animator.current.as_deref(), Some(clips::HAMMER_SLAM));

    rig.idle(&mut ctrl, 13);
    assert!(!ctrl.channels().is_enabled(ChannelId::GroundSlam));
    assert!(rig.world.received.is_empty());

    let slam = rig.advance(&mut ctrl, &InputFrame::idle());
    assert!(ctrl.channels().is_enabled(ChannelId::GroundSlam));
    assert_eq!(slam.credited, 1);

    rig.finish_clip(&mut ctrl);
    assert_eq!(ctrl.state(), AttackState::Idle);
    assert!(rig.animator.props.is_empty());
}

/// The heavy attack aborts when its ground is lost.
#[test]
fn heavy_attack_aborts_off_ground() {
    let mut ctrl = controller();
    let mut rig = Rig::grounded();
    rig.advance(&mut ctrl, &heavy());

    rig.physics.grounded = false;
    rig.advance(&mut ctrl, &InputFrame::idle());
    assert_eq!(ctrl.state(), AttackState::FallRecovery);
    assert!(rig.animator.props.is_empty());
    assert_eq!(ctrl.channels().enabled().count(), 0);
}

/// Taunts need ground and pick a seeded clip.
#[test]
fn taunt_requires_ground() {
    let mut ctrl = controller();
    let mut rig = Rig::airborne();
    let report = rig.advance(&mut ctrl, &taunt());
    assert_eq!(report.refused, Some(RefusalReason::NoContext));

    rig.physics.grounded = true;
    rig.advance(&mut ctrl, &taunt());
    assert_eq!(ctrl.state(), AttackState::Taunt);
    assert!(rig.animator.props.contains(&Prop::Flag));
    let clip = rig.animator.current.clone().unwrap_or_default();
    assert!(clips::TAUNTS.contains(&clip.as_str()));

    rig.physics.grounded = false;
    rig.advance(&mut ctrl, &InputFrame::idle());
    assert_eq!(ctrl.state(), AttackState::FallRecovery);
    assert!(!rig.animator.props.contains(&Prop::Flag));
}

/// Same seed, same taunt clips.
#[test]
fn taunt_selection_is_seeded() {
    init_tracing();
    let config = CombatConfig {
        seed: 99,
        ..CombatConfig::default()
    };

    let run = || {
        let mut ctrl = CombatController::new(config.clone()).expect("valid config");
        let mut rig = Rig::grounded();
        for _ in 0..5 {
            rig.advance(&mut ctrl, &taunt());
            rig.finish_clip(&mut ctrl);
        }
        rig.animator.played
    };

    assert_eq!(run(), run());
}

// =============================================================================
// Cancellation
// =============================================================================

/// Cancellation clears everything regardless of state.
#[test]
fn cancel_clears_everything() {
    let mut ctrl = controller();
    let mut rig = Rig::airborne();
    let obstacle = rig.world.spawn(8, TargetKind::Crate);
    rig.world.touch(ChannelId::Spin, obstacle);

    rig.advance(&mut ctrl, &attack());
    rig.idle(&mut ctrl, 8);
    rig.advance(&mut ctrl, &attack());
    assert!(telegraph(&ctrl).is_pending());
    assert!(ctrl.hit_buffer().is_some_and(|hits| hits.len() == 1));

    ctrl.cancel(CancelReason::AreaTransition, &mut rig.animator);

    assert_eq!(ctrl.state(), AttackState::Idle);
    assert!(ctrl.activation().is_none());
    assert!(ctrl.hit_buffer().is_none());
    assert_eq!(ctrl.channels().enabled().count(), 0);
    assert_eq!(telegraph(&ctrl).as_raw(), -1);
    assert!(ctrl.queued().is_none());
    assert!(ctrl.eligibility().can_standard);

    let events = ctrl.take_events();
    assert!(matches!(
        events.last(),
        Some(CombatEvent::Cancelled {
            reason: CancelReason::AreaTransition,
            ..
        })
    ));
}

/// Cancelling a counting telegraph also stops it.
#[test]
fn cancel_stops_counting_telegraph() {
    let (mut ctrl, mut rig) = fall_recovery_after_spin();
    rig.advance(&mut ctrl, &attack());
    rig.advance(&mut ctrl, &InputFrame::idle());
    assert!(matches!(telegraph(&ctrl), FrameTimer::Counting(_)));

    ctrl.cancel(CancelReason::Death, &mut rig.animator);
    assert_eq!(telegraph(&ctrl), FrameTimer::Inactive);
    assert!(!ctrl.channels().is_enabled(ChannelId::Charge));
}

/// An aquatic spin that leaves the water is cancelled.
#[test]
fn aquatic_spin_forced_out_of_water() {
    let mut ctrl = controller();
    let mut rig = Rig::underwater();

    rig.advance(&mut ctrl, &attack());
    assert_eq!(ctrl.state(), AttackState::AquaticSpin);
    assert_eq!(rig.animator.current.as_deref(), Some(clips::SPIN_SWIM));

    rig.physics.submerged = false;
    rig.physics.at_surface = true;
    rig.advance(&mut ctrl, &InputFrame::idle());
    assert_eq!(ctrl.state(), AttackState::AquaticSpin);

    rig.physics.at_surface = false;
    rig.advance(&mut ctrl, &InputFrame::idle());
    assert_eq!(ctrl.state(), AttackState::Idle);
    assert!(ctrl.activation().is_none());

    let events = ctrl.take_events();
    assert!(events.iter().any(|event| matches!(
        event,
        CombatEvent::Cancelled {
            reason: CancelReason::ForcedOutOfWater,
            ..
        }
    )));
}

// =============================================================================
// Guard Tie-Break
// =============================================================================

/// Consecutive guard breaks across activations escalate to a finishing blow.
#[test]
fn guard_breaks_escalate_across_activations() {
    let mut ctrl = controller();
    let mut rig = Rig::grounded();
    let knight = rig.world.spawn(9, TargetKind::Knight);
    if let Some(info) = rig.world.targets.get_mut(&knight) {
        info.state = TargetState::GUARDING;
    }
    rig.world.touch_all(knight);

    for _ in 0..4 {
        rig.advance(&mut ctrl, &attack());
        rig.finish_clip(&mut ctrl);
        assert_eq!(ctrl.state(), AttackState::Idle);
    }

    assert_eq!(
        rig.world.messages_for(knight),
        vec![
            TargetMessage::GuardBreak { count: 1 },
            TargetMessage::GuardBreak { count: 2 },
            TargetMessage::GuardBreak { count: 3 },
            TargetMessage::FinishingBlow,
        ]
    );
    assert_eq!(ctrl.dispatcher().guard().count(knight), 0);
}

/// A guard-broken knight that leaves the world loses its counter.
#[test]
fn departed_knight_counter_is_dropped() {
    let mut ctrl = controller();
    let mut rig = Rig::grounded();
    let knight = rig.world.spawn(9, TargetKind::Knight);
    if let Some(info) = rig.world.targets.get_mut(&knight) {
        info.state = TargetState::GUARDING;
    }
    rig.world.touch(ChannelId::Spin, knight);

    rig.advance(&mut ctrl, &attack());
    assert_eq!(ctrl.dispatcher().guard().count(knight), 1);

    rig.world.clear_contacts();
    rig.world.targets.remove(&knight);
    rig.advance(&mut ctrl, &InputFrame::idle());
    assert_eq!(ctrl.dispatcher().guard().count(knight), 0);
    assert!(ctrl.dispatcher().guard().is_empty());
}

/// Raising the guard anew resets the counter even for an already-hit knight.
#[test]
fn guard_watch_observes_already_hit_knight() {
    let mut ctrl = controller();
    let mut rig = Rig::grounded();
    let knight = rig.world.spawn(10, TargetKind::Knight);
    if let Some(info) = rig.world.targets.get_mut(&knight) {
        info.state = TargetState::GUARDING;
    }
    rig.world.touch_all(knight);

    rig.advance(&mut ctrl, &attack());
    assert_eq!(ctrl.dispatcher().guard().count(knight), 1);

    rig.world.clear_contacts();
    rig.world.touch(ChannelId::GuardWatch, knight);
    if let Some(info) = rig.world.targets.get_mut(&knight) {
        info.state = TargetState::GUARD_START | TargetState::GUARDING;
    }
    let report = rig.advance(&mut ctrl, &InputFrame::idle());
    assert_eq!(report.deferred, 1);
    assert_eq!(ctrl.dispatcher().guard().count(knight), 0);
}

// =============================================================================
// Telemetry
// =============================================================================

/// The default controller matches one built from the reference config.
#[test]
fn default_controller_matches_reference() {
    let mut built = controller();
    let mut defaulted = CombatController::default();
    assert_eq!(defaulted.config(), built.config());
    assert_eq!(defaulted.snapshot(), built.snapshot());
    assert!(defaulted
        .dispatcher()
        .rules()
        .names()
        .eq(built.dispatcher().rules().names()));

    let mut rig_a = Rig::grounded();
    let mut rig_b = Rig::grounded();
    for rig in [&mut rig_a, &mut rig_b] {
        let obstacle = rig.world.spawn(1, TargetKind::Crate);
        rig.world.touch(ChannelId::Spin, obstacle);
    }
    rig_a.advance(&mut built, &attack());
    rig_b.advance(&mut defaulted, &attack());
    assert_eq!(defaulted.snapshot(), built.snapshot());
    assert_eq!(rig_a.world.received, rig_b.world.received);
}

/// Snapshots expose raw timer values and serialize for debugging.
#[test]
fn snapshot_round_trips() {
    let (mut ctrl, mut rig) = fall_recovery_after_spin();
    rig.advance(&mut ctrl, &attack());

    let snapshot = ctrl.snapshot();
    assert_eq!(snapshot.state, AttackState::FallRecovery);
    assert!(snapshot.timers.contains(&(TimerId::Telegraph, -2)));
    assert_eq!(snapshot.queued, Some(AttackVariant::Standard));

    let json = serde_json::to_string(&snapshot).expect("snapshot serializes");
    let back: CombatSnapshot = serde_json::from_str(&json).expect("snapshot deserializes");
    assert_eq!(snapshot, back);
}

/// Camera reset is suppressed while the primary trigger shares its control.
#[test]
fn camera_reset_suppression_reported() {
    init_tracing();
    let config = CombatConfig {
        controls: ControlConfig {
            primary: PrimaryTrigger::L,
        },
        ..CombatConfig::default()
    };
    let mut ctrl = CombatController::new(config).expect("valid config");
    let mut rig = Rig::grounded();

    let report = rig.advance(&mut ctrl, &InputFrame::press(Buttons::L));
    assert!(report.intent.suppress_camera_reset);
    assert_eq!(report.state, AttackState::GroundSpin);
    assert!(ctrl.last_intent().suppress_camera_reset);
}
