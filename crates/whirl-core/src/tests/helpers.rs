//! Scripted collaborators and setup utilities.
//!
//! [`Rig`] bundles a mock animator, physics, actor and target world. Tests
//! flip its public fields between ticks to script the world and drive a
//! [`CombatController`] with [`Rig::advance`].

use std::collections::BTreeMap;

use glam::Vec3;

use crate::channel::ChannelId;
use crate::config::CombatConfig;
use crate::controller::{CombatController, TickReport};
use crate::input::{Buttons, InputFrame};
use crate::message::TargetMessage;
use crate::services::{ActorGate, Animator, Collaborators, Physics, Prop, TargetWorld};
use crate::target::{TargetId, TargetInfo, TargetKind};

/// Default length of every clip played on the mock animator.
pub const CLIP_FRAMES: u32 = 30;

/// Installs a test-writer subscriber once per process.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::TRACE)
        .try_init();
}

/// A controller with the reference configuration.
pub fn controller() -> CombatController {
    init_tracing();
    CombatController::new(CombatConfig::default()).expect("reference config is valid")
}

// =============================================================================
// Input Frames
// =============================================================================

/// Primary attack press with the default control mapping.
pub fn attack() -> InputFrame {
    InputFrame::press(Buttons::Y)
}

/// Primary attack with the special modifier held.
pub fn special_attack() -> InputFrame {
    attack().holding(Buttons::ZL)
}

/// Primary attack with a clockwise directional spin.
pub fn double_attack() -> InputFrame {
    attack().holding(Buttons::DPAD_RIGHT)
}

/// Heavy attack press.
pub fn heavy() -> InputFrame {
    InputFrame::press(Buttons::ZR)
}

/// Taunt press.
pub fn taunt() -> InputFrame {
    InputFrame::press(Buttons::DPAD_UP)
}

// =============================================================================
// Mock Collaborators
// =============================================================================

/// Animator whose clips all run for a fixed number of frames.
#[derive(Debug, Default)]
pub struct MockAnimator {
    /// Clip playing on the full body.
    pub current: Option<String>,
    /// Frames left on the current clip.
    pub remaining: u32,
    /// Length of newly played clips (0 means [`CLIP_FRAMES`]).
    pub clip_frames: u32,
    /// Every full-body clip played, in order.
    pub played: Vec<String>,
    /// Every upper-body clip played, in order.
    pub upper_body: Vec<String>,
    /// Attached props.
    pub props: Vec<Prop>,
}

impl MockAnimator {
    /// Advances the current clip by one frame.
    pub fn tick(&mut self) {
        self.remaining = self.remaining.saturating_sub(1);
    }

    /// Ends the current clip immediately.
    pub fn finish(&mut self) {
        self.remaining = 0;
    }
}

impl Animator for MockAnimator {
    fn is_playing(&self, clip: &str) -> bool {
        self.remaining > 0 && self.current.as_deref() == Some(clip)
    }

    fn is_finished(&self) -> bool {
        self.remaining == 0
    }

    fn play(&mut self, clip: &str) {
        self.current = Some(clip.to_string());
        self.remaining = if self.clip_frames == 0 {
            CLIP_FRAMES
        } else {
            self.clip_frames
        };
        self.played.push(clip.to_string());
    }

    fn play_upper_body(&mut self, clip: &str) {
        self.upper_body.push(clip.to_string());
    }

    fn attach(&mut self, prop: Prop) {
        if !self.props.contains(&prop) {
            self.props.push(prop);
        }
    }

    fn detach(&mut self, prop: Prop) {
        self.props.retain(|attached| *attached != prop);
    }
}

/// Physics with directly settable answers.
#[derive(Debug, Default)]
pub struct MockPhysics {
    /// Standing on ground.
    pub grounded: bool,
    /// Under water.
    pub submerged: bool,
    /// At the water surface.
    pub at_surface: bool,
    /// Actor position.
    pub position: Vec3,
    /// Actor velocity.
    pub velocity: Vec3,
}

impl Physics for MockPhysics {
    fn is_grounded(&self) -> bool {
        self.grounded
    }

    fn is_submerged(&self) -> bool {
        self.submerged
    }

    fn is_at_water_surface(&self) -> bool {
        self.at_surface
    }

    fn velocity(&self) -> Vec3 {
        self.velocity
    }

    fn position(&self) -> Vec3 {
        self.position
    }

    fn distance_to(&self, _target: TargetId) -> Option<f32> {
        Some(0.0)
    }
}

/// Actor gate with directly settable answers.
#[derive(Debug, Default)]
pub struct MockActor {
    /// Exclusive action in progress.
    pub exclusive: bool,
    /// Respawning.
    pub respawning: bool,
    /// Equipment restriction.
    pub restricted: bool,
    /// Holding an object.
    pub carrying: bool,
}

impl ActorGate for MockActor {
    fn is_exclusive_action(&self) -> bool {
        self.exclusive
    }

    fn is_respawning(&self) -> bool {
        self.respawning
    }

    fn is_equipment_restricted(&self) -> bool {
        self.restricted
    }

    fn is_carrying(&self) -> bool {
        self.carrying
    }
}

/// Target world with per-channel contacts and a message log.
#[derive(Debug)]
pub struct MockWorld {
    /// Known targets.
    pub targets: BTreeMap<TargetId, TargetInfo>,
    /// Targets touching each channel this tick.
    pub touching: BTreeMap<ChannelId, Vec<TargetId>>,
    /// Every message sent, in order.
    pub received: Vec<(TargetId, TargetMessage)>,
    /// Whether targets accept messages.
    pub accept: bool,
}

impl Default for MockWorld {
    fn default() -> Self {
        Self {
            targets: BTreeMap::new(),
            touching: BTreeMap::new(),
            received: Vec::new(),
            accept: true,
        }
    }
}

impl MockWorld {
    /// Adds a target one unit in front of the origin.
    pub fn spawn(&mut self, id: u64, kind: TargetKind) -> TargetId {
        let id = TargetId::new(id);
        self.targets
            .insert(id, TargetInfo::new(id, kind, Vec3::new(0.0, 0.0, 1.0)));
        id
    }

    /// Makes `target` touch `channel` until cleared.
    pub fn touch(&mut self, channel: ChannelId, target: TargetId) {
        self.touching.entry(channel).or_default().push(target);
    }

    /// Makes `target` touch every channel until cleared.
    pub fn touch_all(&mut self, target: TargetId) {
        for channel in ChannelId::ALL {
            self.touch(channel, target);
        }
    }

    /// Removes every contact.
    pub fn clear_contacts(&mut self) {
        self.touching.clear();
    }

    /// Messages received by one target.
    pub fn messages_for(&self, target: TargetId) -> Vec<TargetMessage> {
        self.received
            .iter()
            .filter(|(id, _)| *id == target)
            .map(|(_, message)| *message)
            .collect()
    }
}

impl TargetWorld for MockWorld {
    fn contacts(&self, channel: ChannelId) -> Vec<TargetId> {
        self.touching.get(&channel).cloned().unwrap_or_default()
    }

    fn describe(&self, target: TargetId) -> Option<TargetInfo> {
        self.targets.get(&target).copied()
    }

    fn send(&mut self, target: TargetId, message: TargetMessage) -> bool {
        self.received.push((target, message));
        self.accept
    }
}

// =============================================================================
// Rig
// =============================================================================

/// Every collaborator a controller needs.
#[derive(Debug, Default)]
pub struct Rig {
    /// Animation playback.
    pub animator: MockAnimator,
    /// Physics answers.
    pub physics: MockPhysics,
    /// Actor answers.
    pub actor: MockActor,
    /// Targets.
    pub world: MockWorld,
}

impl Rig {
    /// A rig standing on the ground.
    pub fn grounded() -> Self {
        let mut rig = Self::default();
        rig.physics.grounded = true;
        rig
    }

    /// A rig in mid-air.
    pub fn airborne() -> Self {
        Self::default()
    }

    /// A rig under water.
    pub fn underwater() -> Self {
        let mut rig = Self::default();
        rig.physics.submerged = true;
        rig
    }

    /// Runs one controller tick, then advances the current clip by a frame.
    pub fn advance(&mut self, controller: &mut CombatController, input: &InputFrame) -> TickReport {
        let report = controller.advance(
            input,
            &mut Collaborators {
                animator: &mut self.animator,
                physics: &self.physics,
                actor: &self.actor,
                world: &mut self.world,
            },
        );
        self.animator.tick();
        report
    }

    /// Runs `ticks` idle ticks and returns the last report.
    pub fn idle(&mut self, controller: &mut CombatController, ticks: u32) -> Option<TickReport> {
        let mut last = None;
        for _ in 0..ticks {
            last = Some(self.advance(controller, &InputFrame::idle()));
        }
        last
    }

    /// Idles until the current clip has finished and the controller reacted.
    pub fn finish_clip(&mut self, controller: &mut CombatController) -> TickReport {
        self.animator.finish();
        self.advance(controller, &InputFrame::idle())
    }
}
