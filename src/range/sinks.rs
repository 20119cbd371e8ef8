//! Headless effect and packet sinks that log instead of rendering or sending

use std::collections::BTreeMap;

use bytes::Bytes;
use glam::Vec3;
use tracing::{debug, trace};

use crate::game::catalog::WeaponKind;
use crate::game::effects::{CasingModel, Effects, ParticleBurst, SoundAnchor, SoundCue};
use crate::net::bridge::PacketSink;

/// Counts of cosmetic effects requested so far
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EffectCounts {
    pub sounds: u64,
    pub particle_bursts: u64,
    pub tracers: u64,
    pub casings: u64,
}

/// Effects sink for the headless range
#[derive(Debug, Default)]
pub struct LogEffects {
    counts: EffectCounts,
}

impl LogEffects {
    pub fn counts(&self) -> EffectCounts {
        self.counts
    }
}

impl Effects for LogEffects {
    fn play_sound(&mut self, cue: SoundCue, anchor: SoundAnchor) {
        self.counts.sounds += 1;
        debug!(cue = ?cue, anchor = ?anchor, "Sound");
    }

    fn spawn_particles(&mut self, burst: ParticleBurst) {
        self.counts.particle_bursts += 1;
        trace!(
            color = format_args!("{:06x}", burst.color),
            count = burst.count,
            x = burst.position.x,
            y = burst.position.y,
            z = burst.position.z,
            "Particles"
        );
    }

    fn spawn_tracer(&mut self, weapon: WeaponKind, origin: Vec3, direction: Vec3) {
        self.counts.tracers += 1;
        trace!(weapon = weapon.name(), ?origin, ?direction, "Tracer");
    }

    fn spawn_casing(&mut self, player_id: u8, casing: CasingModel) {
        self.counts.casings += 1;
        trace!(player_id, casing = ?casing, "Casing");
    }
}

/// Packet sink that only tallies what would have gone out
#[derive(Debug, Default)]
pub struct LogSink {
    packets: BTreeMap<u8, u64>,
    bytes: u64,
}

impl LogSink {
    pub fn count(&self, packet_id: u8) -> u64 {
        self.packets.get(&packet_id).copied().unwrap_or(0)
    }

    /// Payload bytes sent, excluding packet ids
    pub fn bytes(&self) -> u64 {
        self.bytes
    }
}

impl PacketSink for LogSink {
    fn send(&mut self, packet_id: u8, payload: Bytes) {
        *self.packets.entry(packet_id).or_default() += 1;
        self.bytes += payload.len() as u64;
    }
}
