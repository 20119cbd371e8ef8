//! Interfaces to the systems around the weapon core.
//!
//! The map, renderer, audio mixer and camera are owned by the client
//! runtime; this core only talks to them through these traits.

use glam::{IVec3, Vec3};
use serde::{Deserialize, Serialize};

use super::catalog::WeaponKind;
use super::hitscan::RayHit;

/// Sound effects the weapon core can trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SoundCue {
    RifleShoot,
    SmgShoot,
    ShotgunShoot,
    RifleReload,
    SmgReload,
    /// Also played for each shell inserted
    ShotgunReload,
    ShotgunCock,
    HitPlayer,
    /// Headshot cue
    SpadeWhack,
}

/// Where a sound is emitted from
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SoundAnchor {
    /// Non-positional, heard by the local player only
    Local,
    /// Positional, local player only
    LocalAt(Vec3),
    /// Follows the given player around
    Player(u8),
}

/// Casing model ejected after each trigger pull
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CasingModel {
    Semi,
    Smg,
    Shotgun,
}

/// Cosmetic particle burst
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleBurst {
    /// Packed 0xBBGGRR colour
    pub color: u32,
    pub position: Vec3,
    pub velocity: f32,
    pub velocity_jitter: f32,
    pub count: u32,
    pub min_size: f32,
    pub max_size: f32,
}

/// Voxel map and player hit-volumes
pub trait World {
    /// Nearest block or player hit-volume along the ray, skipping `shooter`
    fn cast_ray(&self, shooter: u8, origin: Vec3, direction: Vec3, max_range: f32) -> RayHit;

    /// Damage the block at `pos`; returns true if it broke
    fn apply_block_damage(&mut self, pos: IVec3, amount: u32) -> bool;

    /// Whether a destroy action may be reported for `pos` right now
    fn destroy_permitted(&self, pos: IVec3) -> bool;

    /// Packed colour of the block at `pos`
    fn block_color(&self, pos: IVec3) -> u32;

    /// Eye position of a connected player, `None` if the id is not in use
    fn player_eye(&self, id: u8) -> Option<Vec3>;
}

/// Audio and visual effect sinks
pub trait Effects {
    fn play_sound(&mut self, cue: SoundCue, anchor: SoundAnchor);

    fn spawn_particles(&mut self, burst: ParticleBurst);

    fn spawn_tracer(&mut self, weapon: WeaponKind, origin: Vec3, direction: Vec3);

    fn spawn_casing(&mut self, player_id: u8, casing: CasingModel);
}

/// First-person camera angles
pub trait Camera {
    /// Add to yaw and pitch (radians)
    fn rotate(&mut self, yaw: f64, pitch: f64);

    /// Clamp pitch and wrap yaw into range
    fn overflow_adjust(&mut self);
}

/// Yaw/pitch pair with the legacy limits applied on overflow
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OrbitCamera {
    pub yaw: f64,
    pub pitch: f64,
}

impl OrbitCamera {
    /// Pitch is measured from straight up and kept short of both poles
    pub const PITCH_LIMIT: f64 = std::f64::consts::PI - 0.0001;

    pub fn new(yaw: f64, pitch: f64) -> Self {
        Self { yaw, pitch }
    }

    /// Unit look direction (y up)
    pub fn direction(&self) -> Vec3 {
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        Vec3::new(
            (sin_yaw * sin_pitch) as f32,
            cos_pitch as f32,
            (cos_yaw * sin_pitch) as f32,
        )
    }
}

impl Camera for OrbitCamera {
    fn rotate(&mut self, yaw: f64, pitch: f64) {
        self.yaw += yaw;
        self.pitch += pitch;
    }

    fn overflow_adjust(&mut self) {
        self.pitch = self.pitch.clamp(0.0001, Self::PITCH_LIMIT);
        self.yaw = self.yaw.rem_euclid(std::f64::consts::TAU);
    }
}
