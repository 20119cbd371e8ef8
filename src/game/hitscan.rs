//! Hit-scan resolution - what a pellet hits and what happens to it

use glam::{IVec3, Vec3};
use tracing::{debug, warn};

use super::catalog::WeaponStats;
use super::effects::{Effects, ParticleBurst, SoundAnchor, SoundCue, World};
use crate::net::protocol::OutboundEvent;

/// Hit-scan reach (blocks)
pub const MAX_RANGE: f32 = 128.0;

/// Highest block y coordinate; the wire frame counts depth down from here
pub const MAP_TOP: i32 = 63;

/// Blood colour (0xBBGGRR)
const BLOOD_COLOR: u32 = 0x0000FF;

/// Eye height above the physics eye point for the given stance
pub fn eye_height(crouching: bool) -> f32 {
    if crouching {
        1.05
    } else {
        1.1
    }
}

/// Player hit-volume sections, with their wire codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum HitSection {
    Torso = 0,
    Head = 1,
    Arms = 2,
    Legs = 3,
}

impl HitSection {
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Vertical offset from the victim's eye to the section
    pub fn height_offset(self) -> f32 {
        match self {
            Self::Head => 0.1,
            Self::Torso => -0.3,
            Self::Arms => -0.4,
            Self::Legs => -1.4,
        }
    }
}

impl TryFrom<u8> for HitSection {
    type Error = u8;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::Torso),
            1 => Ok(Self::Head),
            2 => Ok(Self::Arms),
            3 => Ok(Self::Legs),
            other => Err(other),
        }
    }
}

/// Raw answer of the ray-cast collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RayHit {
    Nothing,
    Block {
        pos: IVec3,
        /// Cell in front of the hit face
        sub_voxel: IVec3,
    },
    Player {
        id: u8,
        /// Section code as reported by the collaborator
        section: u8,
    },
}

/// Validated hit of a single pellet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitResult {
    None,
    Block { pos: IVec3, sub_voxel: IVec3 },
    Player { id: u8, section: HitSection },
}

/// What resolving a pellet did to the world
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PelletOutcome {
    Miss,
    PlayerHit { id: u8, section: HitSection },
    BlockDamaged { pos: IVec3 },
    BlockDestroyed { pos: IVec3 },
}

/// Turn the collaborator's answer into a hit this core will act on.
///
/// Blocks on the bottom layer or outside the map never count, and player
/// hits that cannot be attributed to a valid section or a connected player
/// are dropped.
pub fn validate(raw: RayHit, shooter: u8, world: &dyn World) -> HitResult {
    match raw {
        RayHit::Nothing => HitResult::None,
        RayHit::Block { pos, .. } if pos.y == 0 => HitResult::None,
        RayHit::Block { pos, .. } if !(0..=MAP_TOP).contains(&pos.y) => {
            warn!(x = pos.x, y = pos.y, z = pos.z, "Ray cast reported a block outside the map");
            HitResult::None
        }
        RayHit::Block { pos, sub_voxel } => HitResult::Block { pos, sub_voxel },
        RayHit::Player { id, section } => {
            let Ok(section) = HitSection::try_from(section) else {
                warn!(player_id = id, section, "Ray cast reported unknown hit section");
                return HitResult::None;
            };
            if id == shooter {
                warn!(player_id = id, "Ray cast reported a self hit");
                return HitResult::None;
            }
            if world.player_eye(id).is_none() {
                warn!(player_id = id, "Ray cast reported a hit on an unknown player");
                return HitResult::None;
            }
            HitResult::Player { id, section }
        }
    }
}

/// Cast one pellet from `origin` along `direction`
pub fn cast(world: &dyn World, shooter: u8, origin: Vec3, direction: Vec3) -> HitResult {
    let raw = world.cast_ray(shooter, origin, direction, MAX_RANGE);
    validate(raw, shooter, world)
}

/// Apply the local side effects of a hit and build the report for the
/// server, if any
pub fn resolve(
    hit: HitResult,
    shooter: u8,
    stats: &WeaponStats,
    world: &mut dyn World,
    effects: &mut dyn Effects,
) -> (PelletOutcome, Option<OutboundEvent>) {
    match hit {
        HitResult::None => (PelletOutcome::Miss, None),
        HitResult::Player { id, section } => {
            let cue = if section == HitSection::Head {
                SoundCue::SpadeWhack
            } else {
                SoundCue::HitPlayer
            };
            effects.play_sound(cue, SoundAnchor::Player(id));

            if let Some(eye) = world.player_eye(id) {
                effects.spawn_particles(ParticleBurst {
                    color: BLOOD_COLOR,
                    position: eye + Vec3::Y * section.height_offset(),
                    velocity: 3.5,
                    velocity_jitter: 1.0,
                    count: 8,
                    min_size: 0.1,
                    max_size: 0.4,
                });
            }

            debug!(shooter, victim = id, section = ?section, "Player hit");
            (
                PelletOutcome::PlayerHit { id, section },
                Some(OutboundEvent::HitReport {
                    player_id: id,
                    hit_section: section.code(),
                }),
            )
        }
        HitResult::Block { pos, sub_voxel } => {
            let destroyed = world.apply_block_damage(pos, stats.block_damage);

            if destroyed && world.destroy_permitted(pos) && pos.y > 1 {
                debug!(shooter, x = pos.x, y = pos.y, z = pos.z, "Block destroyed");
                let wire = to_wire_coords(pos);
                return (
                    PelletOutcome::BlockDestroyed { pos },
                    Some(OutboundEvent::BlockDamageReport {
                        action_type: OutboundEvent::ACTION_DESTROY,
                        player_id: shooter,
                        x: wire.x,
                        y: wire.y,
                        z: wire.z,
                    }),
                );
            }

            effects.spawn_particles(ParticleBurst {
                color: world.block_color(pos),
                position: sub_voxel.as_vec3() + Vec3::splat(0.5),
                velocity: 2.5,
                velocity_jitter: 1.0,
                count: 4,
                min_size: 0.1,
                max_size: 0.25,
            });
            (PelletOutcome::BlockDamaged { pos }, None)
        }
    }
}

/// Map a client block position (y up) to the wire frame (z down)
pub fn to_wire_coords(pos: IVec3) -> IVec3 {
    IVec3::new(pos.x, pos.z, MAP_TOP - pos.y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::catalog::{WeaponCatalog, WeaponKind};
    use crate::game::testing::{FakeWorld, RecordingEffects};

    fn rifle() -> WeaponStats {
        WeaponCatalog::standard().get(WeaponKind::Rifle).unwrap().clone()
    }

    #[test]
    fn floor_blocks_never_count() {
        let world = FakeWorld::default();
        for dir in [Vec3::NEG_Y, Vec3::new(0.3, -0.9, 0.1), Vec3::X] {
            let raw = RayHit::Block {
                pos: IVec3::new(dir.x as i32 + 10, 0, 5),
                sub_voxel: IVec3::new(10, 1, 5),
            };
            assert_eq!(validate(raw, 0, &world), HitResult::None);
        }

        let raw = RayHit::Block {
            pos: IVec3::new(10, 1, 5),
            sub_voxel: IVec3::new(10, 2, 5),
        };
        assert!(matches!(validate(raw, 0, &world), HitResult::Block { .. }));
    }

    #[test]
    fn malformed_player_hits_are_dropped() {
        let mut world = FakeWorld::default();
        world.players.insert(4, Vec3::new(1.0, 2.0, 3.0));

        let bad_section = RayHit::Player { id: 4, section: 7 };
        let self_hit = RayHit::Player { id: 0, section: 1 };
        let ghost = RayHit::Player { id: 9, section: 0 };
        assert_eq!(validate(bad_section, 0, &world), HitResult::None);
        assert_eq!(validate(self_hit, 0, &world), HitResult::None);
        assert_eq!(validate(ghost, 0, &world), HitResult::None);

        assert_eq!(
            validate(RayHit::Player { id: 4, section: 3 }, 0, &world),
            HitResult::Player { id: 4, section: HitSection::Legs }
        );
    }

    #[test]
    fn out_of_map_blocks_are_dropped() {
        let mut world = FakeWorld { fragile: true, ..Default::default() };
        let mut effects = RecordingEffects::default();

        for y in [MAP_TOP + 7, -5] {
            let raw = RayHit::Block {
                pos: IVec3::new(10, y, 20),
                sub_voxel: IVec3::new(10, y, 19),
            };
            let hit = validate(raw, 0, &world);
            assert_eq!(hit, HitResult::None, "y={y}");

            let (outcome, event) = resolve(hit, 0, &rifle(), &mut world, &mut effects);
            assert_eq!(outcome, PelletOutcome::Miss);
            assert_eq!(event, None);
        }

        assert!(world.damage_log.is_empty());
        assert!(effects.particles.is_empty());

        let top = RayHit::Block {
            pos: IVec3::new(10, MAP_TOP, 20),
            sub_voxel: IVec3::new(10, MAP_TOP, 19),
        };
        assert!(matches!(validate(top, 0, &world), HitResult::Block { .. }));
    }

    #[test]
    fn cast_uses_fixed_range() {
        let world = FakeWorld::default();
        cast(&world, 2, Vec3::ZERO, Vec3::Z);
        assert_eq!(world.last_range.get(), Some(MAX_RANGE));
    }

    #[test]
    fn headshot_reports_and_whacks() {
        let mut world = FakeWorld::default();
        world.players.insert(5, Vec3::new(0.0, 40.0, 0.0));
        let mut effects = RecordingEffects::default();

        let (outcome, event) = resolve(
            HitResult::Player { id: 5, section: HitSection::Head },
            1,
            &rifle(),
            &mut world,
            &mut effects,
        );

        assert_eq!(outcome, PelletOutcome::PlayerHit { id: 5, section: HitSection::Head });
        assert_eq!(event, Some(OutboundEvent::HitReport { player_id: 5, hit_section: 1 }));
        assert_eq!(effects.sounds, vec![(SoundCue::SpadeWhack, SoundAnchor::Player(5))]);
        assert_eq!(effects.particles.len(), 1);
        assert_eq!(effects.particles[0].position, Vec3::new(0.0, 40.1, 0.0));
    }

    #[test]
    fn body_shot_uses_hit_cue() {
        let mut world = FakeWorld::default();
        world.players.insert(5, Vec3::ZERO);
        let mut effects = RecordingEffects::default();

        resolve(
            HitResult::Player { id: 5, section: HitSection::Arms },
            1,
            &rifle(),
            &mut world,
            &mut effects,
        );
        assert_eq!(effects.sounds[0].0, SoundCue::HitPlayer);
    }

    #[test]
    fn destroyed_block_is_reported_in_wire_frame() {
        let mut world = FakeWorld::default();
        world.fragile = true;
        let mut effects = RecordingEffects::default();
        let pos = IVec3::new(12, 30, 200);

        let (outcome, event) = resolve(
            HitResult::Block { pos, sub_voxel: IVec3::new(12, 31, 200) },
            3,
            &rifle(),
            &mut world,
            &mut effects,
        );

        assert_eq!(outcome, PelletOutcome::BlockDestroyed { pos });
        assert_eq!(
            event,
            Some(OutboundEvent::BlockDamageReport {
                action_type: OutboundEvent::ACTION_DESTROY,
                player_id: 3,
                x: 12,
                y: 200,
                z: 33,
            })
        );
        assert_eq!(world.damage_log, vec![(pos, 50)]);
        assert!(effects.particles.is_empty());
    }

    #[test]
    fn low_or_sturdy_blocks_only_chip() {
        let mut effects = RecordingEffects::default();

        let mut sturdy = FakeWorld::default();
        let pos = IVec3::new(1, 20, 1);
        let (outcome, event) = resolve(
            HitResult::Block { pos, sub_voxel: IVec3::new(1, 20, 0) },
            0,
            &rifle(),
            &mut sturdy,
            &mut effects,
        );
        assert_eq!(outcome, PelletOutcome::BlockDamaged { pos });
        assert_eq!(event, None);
        assert_eq!(effects.particles[0].position, Vec3::new(1.5, 20.5, 0.5));
        assert_eq!(effects.particles[0].color, FakeWorld::BLOCK_COLOR);

        let mut fragile = FakeWorld { fragile: true, ..Default::default() };
        let low = IVec3::new(1, 1, 1);
        let (outcome, event) = resolve(
            HitResult::Block { pos: low, sub_voxel: IVec3::new(1, 2, 1) },
            0,
            &rifle(),
            &mut fragile,
            &mut effects,
        );
        assert_eq!(outcome, PelletOutcome::BlockDamaged { pos: low });
        assert_eq!(event, None);

        let mut protected = FakeWorld { fragile: true, protected: true, ..Default::default() };
        let (_, event) = resolve(
            HitResult::Block { pos, sub_voxel: pos },
            0,
            &rifle(),
            &mut protected,
            &mut effects,
        );
        assert_eq!(event, None);
    }

    #[test]
    fn wire_frame_swaps_height_and_depth() {
        assert_eq!(to_wire_coords(IVec3::new(5, 63, 9)), IVec3::new(5, 9, 0));
        assert_eq!(to_wire_coords(IVec3::new(5, 2, 9)), IVec3::new(5, 9, 61));
    }
}
