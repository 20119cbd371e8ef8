//! Headless practice range: the weapon core driven against a small arena

pub mod arena;
pub mod sinks;

pub use arena::Arena;
pub use sinks::{LogEffects, LogSink};

use std::f64::consts::FRAC_PI_2;
use std::future::Future;
use std::time::Duration;

use glam::Vec3;
use serde::Serialize;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{info, warn};

use crate::game::catalog::{CatalogError, WeaponCatalog, WeaponKind};
use crate::game::effects::{Camera, OrbitCamera};
use crate::game::fire_control::FireControlEvent;
use crate::game::hitscan::{HitSection, PelletOutcome};
use crate::game::weapon::{Environment, TickReport, WeaponSystem};
use crate::game::LocalPlayer;
use crate::net::protocol::packet_id;
use crate::util::rng::ShotRng;
use crate::util::time::{tick_delta, Clock, TICK_DURATION_MICROS};

const ARENA_SIZE: i32 = 64;
const SPAWN_FEET: Vec3 = Vec3::new(32.5, 2.0, 8.5);
const SPAWN_EYE: Vec3 = Vec3::new(32.5, 2.4, 8.5);

/// Dummy line the script sweeps across
const DUMMIES: [(u8, Vec3); 3] = [
    (10, Vec3::new(28.5, 3.9, 40.5)),
    (11, Vec3::new(32.5, 3.9, 40.5)),
    (12, Vec3::new(36.5, 3.9, 40.5)),
];

/// Yaw sweep limit either side of straight ahead (radians)
const SWEEP_LIMIT: f64 = 0.25;
/// Yaw sweep speed (radians per second)
const SWEEP_RATE: f64 = 0.2;
/// Fraction of the pitch offset recovered per tick
const PITCH_RECOVERY: f64 = 0.1;

/// Running totals for the session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RangeStats {
    pub ticks: u64,
    pub trigger_pulls: u64,
    pub pellets: u64,
    pub player_hits: u64,
    pub headshots: u64,
    pub blocks_damaged: u64,
    pub blocks_destroyed: u64,
    pub reloads: u64,
}

/// Scripted local player on the practice arena
pub struct PracticeRange {
    system: WeaponSystem<LogSink>,
    player: LocalPlayer,
    arena: Arena,
    effects: LogEffects,
    camera: OrbitCamera,
    sweep: f64,
    stats: RangeStats,
}

impl PracticeRange {
    pub fn new(
        catalog: WeaponCatalog,
        rng: ShotRng,
        player_id: u8,
        weapon: WeaponKind,
    ) -> Result<Self, CatalogError> {
        let mut arena = Arena::flat(ARENA_SIZE);
        arena.add_wall(24, (31, 34), 3);
        for (id, eye) in DUMMIES {
            if id != player_id {
                arena.add_dummy(id, eye);
            }
        }

        let mut player = LocalPlayer::new(player_id, weapon, catalog.get(weapon)?);
        player.aim.position = SPAWN_FEET;
        player.aim.eye = SPAWN_EYE;

        let camera = OrbitCamera::new(0.0, FRAC_PI_2);
        player.aim.orientation = camera.direction();

        info!(
            player_id,
            weapon = weapon.name(),
            dummies = DUMMIES.len(),
            blocks = arena.block_count(),
            "Practice range ready"
        );

        Ok(Self {
            system: WeaponSystem::new(catalog, rng, LogSink::default()),
            player,
            arena,
            effects: LogEffects::default(),
            camera,
            sweep: SWEEP_RATE,
            stats: RangeStats::default(),
        })
    }

    pub fn stats(&self) -> RangeStats {
        self.stats
    }

    pub fn player(&self) -> &LocalPlayer {
        &self.player
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    pub fn effects(&self) -> &LogEffects {
        &self.effects
    }

    pub fn sink(&self) -> &LogSink {
        self.system.bridge().sink()
    }

    /// Run one tick: aim, trigger, reload when dry, then the weapon update
    pub fn step(&mut self, clock: &dyn Clock) -> Result<TickReport, CatalogError> {
        self.stats.ticks += 1;
        self.sweep_aim();
        self.player.aim.orientation = self.camera.direction();

        let mut env = Environment {
            clock,
            world: &mut self.arena,
            effects: &mut self.effects,
            camera: &mut self.camera,
        };

        if self.player.weapon.ammo() == 0 && !self.player.weapon.is_reloading() {
            if self.system.reload(&mut self.player, &mut env)?.is_some() {
                self.stats.reloads += 1;
            }
        }

        self.player.aim.input.primary = !self.player.weapon.is_reloading();

        let report = self.system.update(&mut self.player, &mut env)?;
        self.tally(&report);
        Ok(report)
    }

    /// Packets sent per wire id, for the summary log
    pub fn packet_summary(&self) -> [(u8, u64); 5] {
        let sink = self.sink();
        [
            packet_id::ORIENTATION_DATA,
            packet_id::WEAPON_INPUT,
            packet_id::HIT,
            packet_id::BLOCK_ACTION,
            packet_id::WEAPON_RELOAD,
        ]
        .map(|id| (id, sink.count(id)))
    }

    fn sweep_aim(&mut self) {
        let dt = tick_delta();
        let yaw = wrapped_yaw(self.camera.yaw);
        if (yaw >= SWEEP_LIMIT && self.sweep > 0.0) || (yaw <= -SWEEP_LIMIT && self.sweep < 0.0) {
            self.sweep = -self.sweep;
        }

        let recovery = (FRAC_PI_2 - self.camera.pitch) * PITCH_RECOVERY;
        self.camera.rotate(self.sweep * dt, recovery);
        self.camera.overflow_adjust();
    }

    fn tally(&mut self, report: &TickReport) {
        if report.event == Some(FireControlEvent::Fired) {
            self.stats.trigger_pulls += 1;
        }

        for outcome in &report.pellets {
            self.stats.pellets += 1;
            match outcome {
                PelletOutcome::PlayerHit { section, .. } => {
                    self.stats.player_hits += 1;
                    if *section == HitSection::Head {
                        self.stats.headshots += 1;
                    }
                }
                PelletOutcome::BlockDamaged { .. } => self.stats.blocks_damaged += 1,
                PelletOutcome::BlockDestroyed { .. } => self.stats.blocks_destroyed += 1,
                PelletOutcome::Miss => {}
            }
        }
    }
}

/// Why a session loop returned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    Elapsed,
    Interrupted,
}

/// Drive `range` at the simulation rate until `seconds` of clock time have
/// passed or `shutdown` resolves
pub async fn run_session<F>(
    range: &mut PracticeRange,
    clock: &dyn Clock,
    seconds: f64,
    shutdown: F,
) -> Result<SessionEnd, CatalogError>
where
    F: Future<Output = ()>,
{
    let mut tick_interval = interval(Duration::from_micros(TICK_DURATION_MICROS));
    tick_interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = tick_interval.tick() => {
                range.step(clock)?;

                if clock.now_secs() >= seconds {
                    info!(ticks = range.stats().ticks, "Session time elapsed");
                    return Ok(SessionEnd::Elapsed);
                }
            }
            _ = &mut shutdown => {
                warn!(ticks = range.stats().ticks, "Stopping before session end");
                return Ok(SessionEnd::Interrupted);
            }
        }
    }
}

/// Yaw folded into (-PI, PI]
fn wrapped_yaw(yaw: f64) -> f64 {
    let yaw = yaw.rem_euclid(std::f64::consts::TAU);
    if yaw > std::f64::consts::PI {
        yaw - std::f64::consts::TAU
    } else {
        yaw
    }
}
