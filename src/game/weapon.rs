//! Per-frame weapon update for the local player

use glam::Vec3;
use tracing::{debug, info};

use super::catalog::{CatalogError, WeaponCatalog, WeaponStats};
use super::effects::{Camera, Effects, SoundAnchor, World};
use super::fire_control::{FireControlEvent, FireGate, ReloadStart};
use super::hitscan::{self, PelletOutcome};
use super::recoil::{self, RecoilKick};
use super::spread;
use super::{HeldItem, LocalPlayer};
use crate::net::bridge::{NetworkBridge, PacketSink};
use crate::util::rng::ShotRng;
use crate::util::time::Clock;

/// Collaborators the weapon core borrows for one update
pub struct Environment<'a> {
    pub clock: &'a dyn Clock,
    pub world: &'a mut dyn World,
    pub effects: &'a mut dyn Effects,
    pub camera: &'a mut dyn Camera,
}

/// What one update did
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TickReport {
    pub event: Option<FireControlEvent>,
    /// One entry per pellet, empty unless a shot was fired
    pub pellets: Vec<PelletOutcome>,
    pub recoil: Option<RecoilKick>,
}

/// Weapon core of one client: stats table, spread draws and the outbound
/// bridge
pub struct WeaponSystem<S> {
    catalog: WeaponCatalog,
    rng: ShotRng,
    bridge: NetworkBridge<S>,
}

impl<S: PacketSink> WeaponSystem<S> {
    pub fn new(catalog: WeaponCatalog, rng: ShotRng, sink: S) -> Self {
        Self {
            catalog,
            rng,
            bridge: NetworkBridge::new(sink),
        }
    }

    pub fn catalog(&self) -> &WeaponCatalog {
        &self.catalog
    }

    pub fn bridge(&self) -> &NetworkBridge<S> {
        &self.bridge
    }

    /// Run one frame of fire control for `player`
    pub fn update(
        &mut self,
        player: &mut LocalPlayer,
        env: &mut Environment<'_>,
    ) -> Result<TickReport, CatalogError> {
        let now = env.clock.now_secs();
        let stats = self.catalog.get(player.weapon.weapon())?;

        let gate = FireGate {
            ui_blocking: player.ui_blocking,
            gun_held: player.aim.gun_held(),
            trigger: player.aim.input.primary,
        };

        let mut report = TickReport {
            event: player.weapon.tick(stats, gate, now),
            ..Default::default()
        };

        match report.event {
            Some(FireControlEvent::Fired) => {
                report.pellets = fire(stats, &mut self.rng, &mut self.bridge, player, env);

                let kick = recoil::kick(
                    stats,
                    env.clock.now_millis(),
                    player.aim.motion(),
                    player.aim.orientation.y,
                );
                env.camera.rotate(kick.horizontal, -kick.vertical);
                env.camera.overflow_adjust();
                report.recoil = Some(kick);

                env.effects
                    .play_sound(stats.fire_sound, SoundAnchor::LocalAt(player.aim.position));
                env.effects.spawn_casing(player.id, stats.casing);
            }
            Some(FireControlEvent::ShellLoaded) => {
                env.effects.play_sound(stats.reload_sound, SoundAnchor::Local);
            }
            Some(FireControlEvent::ShellsFull) => {
                if let Some(cue) = stats.reload_done_sound {
                    env.effects.play_sound(cue, SoundAnchor::Local);
                }
            }
            Some(FireControlEvent::MagazineLoaded { .. }) | None => {}
        }

        Ok(report)
    }

    /// Start a reload for `player`. Returns `None` when the request changes
    /// nothing.
    pub fn reload(
        &mut self,
        player: &mut LocalPlayer,
        env: &mut Environment<'_>,
    ) -> Result<Option<ReloadStart>, CatalogError> {
        let stats = self.catalog.get(player.weapon.weapon())?;

        let Some(start) = player.weapon.request_reload(stats, env.clock.now_secs()) else {
            return Ok(None);
        };

        env.effects.play_sound(stats.reload_sound, SoundAnchor::Local);
        self.bridge.reload_started(player.id, start.ammo, start.reserve);
        Ok(Some(start))
    }

    /// Cancel a running shell-by-shell reload
    pub fn abort_reload(&self, player: &mut LocalPlayer) -> Result<bool, CatalogError> {
        let stats = self.catalog.get(player.weapon.weapon())?;
        Ok(player.weapon.abort_reload(stats))
    }

    /// Switch to the weapon with wire id `weapon_id` (spawn or class
    /// change). The gun comes up lowered.
    pub fn equip(
        &mut self,
        player: &mut LocalPlayer,
        weapon_id: u8,
        restock: bool,
        clock: &dyn Clock,
    ) -> Result<(), CatalogError> {
        let (kind, stats) = self.catalog.lookup(weapon_id)?;
        player.weapon.reset(kind, stats, restock);
        player.weapon.lower(clock.now_secs());

        info!(
            player_id = player.id,
            weapon = kind.name(),
            ammo = player.weapon.ammo(),
            reserve = player.weapon.reserve(),
            "Weapon equipped"
        );
        Ok(())
    }

    /// Change the held tool. Putting the gun away aborts a shell reload;
    /// drawing it lowers it.
    pub fn switch_tool(
        &mut self,
        player: &mut LocalPlayer,
        item: HeldItem,
        clock: &dyn Clock,
    ) -> Result<(), CatalogError> {
        if player.aim.held_item == item {
            return Ok(());
        }

        if player.aim.gun_held() {
            self.abort_reload(player)?;
        }

        player.aim.held_item = item;
        if item == HeldItem::Gun {
            player.weapon.lower(clock.now_secs());
        }
        Ok(())
    }
}

/// Per-pellet shot pipeline: spread, cast, network updates, outcome, tracer
fn fire<S: PacketSink>(
    stats: &WeaponStats,
    rng: &mut ShotRng,
    bridge: &mut NetworkBridge<S>,
    player: &LocalPlayer,
    env: &mut Environment<'_>,
) -> Vec<PelletOutcome> {
    let aim = &player.aim;
    let origin = aim.eye + Vec3::Y * hitscan::eye_height(aim.input.crouch);
    let buttons = aim.input.buttons();

    let mut outcomes = Vec::with_capacity(stats.pellets as usize);
    for _ in 0..stats.pellets {
        let direction = spread::perturb(stats, aim.stance(), aim.orientation, rng);
        let hit = hitscan::cast(&*env.world, player.id, origin, direction);

        bridge.shot(player.id, buttons, aim.orientation);

        let (outcome, event) =
            hitscan::resolve(hit, player.id, stats, &mut *env.world, &mut *env.effects);
        if let Some(event) = event {
            bridge.emit(event);
        }

        env.effects
            .spawn_tracer(player.weapon.weapon(), origin, direction);
        outcomes.push(outcome);
    }

    debug!(
        player_id = player.id,
        weapon = ?player.weapon.weapon(),
        ammo = player.weapon.ammo(),
        pellets = stats.pellets,
        "Shot fired"
    );
    outcomes
}
