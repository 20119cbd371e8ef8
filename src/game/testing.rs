//! Recording fakes for the collaborator traits

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};

use glam::{IVec3, Vec3};

use super::catalog::WeaponKind;
use super::effects::{Camera, CasingModel, Effects, ParticleBurst, SoundAnchor, SoundCue, World};
use super::hitscan::RayHit;

/// World whose ray casts are scripted ahead of time
#[derive(Debug, Default)]
pub struct FakeWorld {
    pub players: HashMap<u8, Vec3>,
    /// Answers for successive ray casts; `Nothing` once exhausted
    pub script: RefCell<VecDeque<RayHit>>,
    /// Every block breaks on the first hit
    pub fragile: bool,
    /// Destroy actions are not permitted
    pub protected: bool,
    pub damage_log: Vec<(IVec3, u32)>,
    pub rays: RefCell<Vec<(Vec3, Vec3)>>,
    pub last_range: Cell<Option<f32>>,
}

impl FakeWorld {
    pub const BLOCK_COLOR: u32 = 0x00_80_40_20;

    pub fn scripted(hits: impl IntoIterator<Item = RayHit>) -> Self {
        Self {
            script: RefCell::new(hits.into_iter().collect()),
            ..Default::default()
        }
    }
}

impl World for FakeWorld {
    fn cast_ray(&self, _shooter: u8, origin: Vec3, direction: Vec3, max_range: f32) -> RayHit {
        self.last_range.set(Some(max_range));
        self.rays.borrow_mut().push((origin, direction));
        self.script.borrow_mut().pop_front().unwrap_or(RayHit::Nothing)
    }

    fn apply_block_damage(&mut self, pos: IVec3, amount: u32) -> bool {
        self.damage_log.push((pos, amount));
        self.fragile
    }

    fn destroy_permitted(&self, _pos: IVec3) -> bool {
        !self.protected
    }

    fn block_color(&self, _pos: IVec3) -> u32 {
        Self::BLOCK_COLOR
    }

    fn player_eye(&self, id: u8) -> Option<Vec3> {
        self.players.get(&id).copied()
    }
}

#[derive(Debug, Default)]
pub struct RecordingEffects {
    pub sounds: Vec<(SoundCue, SoundAnchor)>,
    pub particles: Vec<ParticleBurst>,
    pub tracers: Vec<(WeaponKind, Vec3, Vec3)>,
    pub casings: Vec<(u8, CasingModel)>,
}

impl Effects for RecordingEffects {
    fn play_sound(&mut self, cue: SoundCue, anchor: SoundAnchor) {
        self.sounds.push((cue, anchor));
    }

    fn spawn_particles(&mut self, burst: ParticleBurst) {
        self.particles.push(burst);
    }

    fn spawn_tracer(&mut self, weapon: WeaponKind, origin: Vec3, direction: Vec3) {
        self.tracers.push((weapon, origin, direction));
    }

    fn spawn_casing(&mut self, player_id: u8, casing: CasingModel) {
        self.casings.push((player_id, casing));
    }
}

/// Camera that only records what it was asked to do
#[derive(Debug, Default)]
pub struct RecordingCamera {
    pub rotations: Vec<(f64, f64)>,
    pub adjusts: usize,
}

impl Camera for RecordingCamera {
    fn rotate(&mut self, yaw: f64, pitch: f64) {
        self.rotations.push((yaw, pitch));
    }

    fn overflow_adjust(&mut self) {
        self.adjusts += 1;
    }
}
