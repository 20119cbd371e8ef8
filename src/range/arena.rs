//! Practice arena - a small voxel map with stationary dummies

use std::collections::{BTreeMap, HashMap};

use glam::{IVec3, Vec3};
use tracing::debug;

use crate::game::effects::World;
use crate::game::hitscan::{HitSection, RayHit, MAP_TOP};

/// Hit points of a fresh block
pub const BLOCK_HEALTH: u32 = 100;

const GROUND_COLORS: [u32; 2] = [0x00_3A_5A_7A, 0x00_32_52_70];
const WALL_COLOR: u32 = 0x00_6E_6E_6E;

#[derive(Debug, Clone, Copy)]
struct Block {
    color: u32,
    health: u32,
}

/// Section boxes relative to a dummy's eye: (section, half extent x/z, y range)
const SECTION_BOXES: [(HitSection, Vec3, (f32, f32)); 4] = [
    (HitSection::Head, Vec3::new(0.25, 0.0, 0.25), (-0.2, 0.4)),
    (HitSection::Torso, Vec3::new(0.4, 0.0, 0.3), (-0.9, -0.2)),
    (HitSection::Arms, Vec3::new(0.65, 0.0, 0.2), (-0.9, -0.2)),
    (HitSection::Legs, Vec3::new(0.35, 0.0, 0.25), (-1.9, -0.9)),
];

/// Flat square map with a two-layer ground, optional walls and dummies
#[derive(Debug, Clone)]
pub struct Arena {
    size: i32,
    blocks: HashMap<IVec3, Block>,
    dummies: BTreeMap<u8, Vec3>,
}

impl Arena {
    /// Ground layers at y = 0 and y = 1 over `size` x `size` columns
    pub fn flat(size: i32) -> Self {
        let mut blocks = HashMap::with_capacity((size * size * 2).max(0) as usize);
        for x in 0..size {
            for z in 0..size {
                for y in 0..2 {
                    let color = GROUND_COLORS[((x + z) & 1) as usize];
                    blocks.insert(
                        IVec3::new(x, y, z),
                        Block {
                            color,
                            health: BLOCK_HEALTH,
                        },
                    );
                }
            }
        }

        Self {
            size,
            blocks,
            dummies: BTreeMap::new(),
        }
    }

    /// Solid wall along x at depth `z`, from `x_range.0` (inclusive) to
    /// `x_range.1` (exclusive), standing on the ground
    pub fn add_wall(&mut self, z: i32, x_range: (i32, i32), height: i32) {
        for x in x_range.0..x_range.1 {
            for y in 2..(2 + height).min(MAP_TOP + 1) {
                self.blocks.insert(
                    IVec3::new(x, y, z),
                    Block {
                        color: WALL_COLOR,
                        health: BLOCK_HEALTH,
                    },
                );
            }
        }
    }

    pub fn add_dummy(&mut self, id: u8, eye: Vec3) {
        self.dummies.insert(id, eye);
    }

    pub fn is_solid(&self, pos: IVec3) -> bool {
        self.blocks.contains_key(&pos)
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    fn in_bounds(&self, pos: IVec3) -> bool {
        (0..self.size).contains(&pos.x)
            && (0..self.size).contains(&pos.z)
            && (0..=MAP_TOP).contains(&pos.y)
    }

    /// Voxel traversal along the ray. Returns the first solid cell, the
    /// cell the ray came from and the distance travelled.
    fn walk_blocks(&self, origin: Vec3, dir: Vec3, max_range: f32) -> Option<(IVec3, IVec3, f32)> {
        let mut cell = origin.floor().as_ivec3();
        if self.is_solid(cell) {
            return Some((cell, cell, 0.0));
        }

        let mut step = IVec3::ZERO;
        let mut t_max = Vec3::splat(f32::INFINITY);
        let mut t_delta = Vec3::splat(f32::INFINITY);
        for axis in 0..3 {
            let d = dir[axis];
            if d > 0.0 {
                step[axis] = 1;
                t_max[axis] = (cell[axis] as f32 + 1.0 - origin[axis]) / d;
                t_delta[axis] = 1.0 / d;
            } else if d < 0.0 {
                step[axis] = -1;
                t_max[axis] = (origin[axis] - cell[axis] as f32) / -d;
                t_delta[axis] = -1.0 / d;
            }
        }

        loop {
            let axis = if t_max.x <= t_max.y && t_max.x <= t_max.z {
                0
            } else if t_max.y <= t_max.z {
                1
            } else {
                2
            };

            let t = t_max[axis];
            if t > max_range {
                return None;
            }

            let previous = cell;
            cell[axis] += step[axis];
            t_max[axis] += t_delta[axis];

            if self.is_solid(cell) {
                return Some((cell, previous, t));
            }
        }
    }

    /// Nearest dummy section along the ray, skipping `shooter`
    fn nearest_dummy(&self, shooter: u8, origin: Vec3, dir: Vec3, max_range: f32) -> Option<(u8, HitSection, f32)> {
        let mut best: Option<(u8, HitSection, f32)> = None;

        for (&id, &eye) in &self.dummies {
            if id == shooter {
                continue;
            }
            for (section, half, (low, high)) in SECTION_BOXES {
                let min = Vec3::new(eye.x - half.x, eye.y + low, eye.z - half.z);
                let max = Vec3::new(eye.x + half.x, eye.y + high, eye.z + half.z);

                if let Some(t) = ray_box(origin, dir, min, max, max_range) {
                    if best.map_or(true, |(_, _, best_t)| t < best_t) {
                        best = Some((id, section, t));
                    }
                }
            }
        }

        best
    }
}

/// Slab test; entry distance of the ray into the box, if within range
fn ray_box(origin: Vec3, dir: Vec3, min: Vec3, max: Vec3, max_range: f32) -> Option<f32> {
    let mut t_near = 0.0f32;
    let mut t_far = max_range;

    for axis in 0..3 {
        let o = origin[axis];
        let d = dir[axis];

        if d.abs() < f32::EPSILON {
            if o < min[axis] || o > max[axis] {
                return None;
            }
            continue;
        }

        let mut t0 = (min[axis] - o) / d;
        let mut t1 = (max[axis] - o) / d;
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }

        t_near = t_near.max(t0);
        t_far = t_far.min(t1);
        if t_near > t_far {
            return None;
        }
    }

    Some(t_near)
}

impl World for Arena {
    fn cast_ray(&self, shooter: u8, origin: Vec3, direction: Vec3, max_range: f32) -> RayHit {
        let dir = direction.normalize_or_zero();
        if dir == Vec3::ZERO {
            return RayHit::Nothing;
        }

        let block = self.walk_blocks(origin, dir, max_range);
        let dummy = self.nearest_dummy(shooter, origin, dir, max_range);

        match (block, dummy) {
            (Some((_, _, block_t)), Some((id, section, t))) if t < block_t => RayHit::Player {
                id,
                section: section.code(),
            },
            (None, Some((id, section, _))) => RayHit::Player {
                id,
                section: section.code(),
            },
            (Some((pos, sub_voxel, _)), _) => RayHit::Block { pos, sub_voxel },
            (None, None) => RayHit::Nothing,
        }
    }

    fn apply_block_damage(&mut self, pos: IVec3, amount: u32) -> bool {
        let Some(block) = self.blocks.get_mut(&pos) else {
            return false;
        };

        block.health = block.health.saturating_sub(amount);
        if block.health > 0 {
            return false;
        }

        self.blocks.remove(&pos);
        debug!(x = pos.x, y = pos.y, z = pos.z, "Block broke");
        true
    }

    fn destroy_permitted(&self, pos: IVec3) -> bool {
        self.in_bounds(pos)
    }

    fn block_color(&self, pos: IVec3) -> u32 {
        self.blocks.get(&pos).map_or(WALL_COLOR, |block| block.color)
    }

    fn player_eye(&self, id: u8) -> Option<Vec3> {
        self.dummies.get(&id).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn straight_down_hits_ground_surface() {
        let arena = Arena::flat(16);
        let hit = arena.cast_ray(0, Vec3::new(5.5, 10.5, 5.5), Vec3::NEG_Y, 128.0);
        assert_eq!(
            hit,
            RayHit::Block {
                pos: IVec3::new(5, 1, 5),
                sub_voxel: IVec3::new(5, 2, 5),
            }
        );
    }

    #[test]
    fn wall_face_reports_cell_in_front() {
        let mut arena = Arena::flat(32);
        arena.add_wall(20, (0, 32), 3);

        let hit = arena.cast_ray(0, Vec3::new(10.5, 3.5, 2.5), Vec3::Z, 128.0);
        assert_eq!(
            hit,
            RayHit::Block {
                pos: IVec3::new(10, 3, 20),
                sub_voxel: IVec3::new(10, 3, 19),
            }
        );
    }

    #[test]
    fn dummy_sections_by_height() {
        let mut arena = Arena::flat(32);
        arena.add_dummy(3, Vec3::new(10.5, 4.0, 20.5));

        let at = |y: f32| arena.cast_ray(0, Vec3::new(10.5, y, 2.5), Vec3::Z, 128.0);
        assert_eq!(at(4.2), RayHit::Player { id: 3, section: HitSection::Head.code() });
        assert_eq!(at(3.5), RayHit::Player { id: 3, section: HitSection::Torso.code() });
        assert_eq!(at(2.5), RayHit::Player { id: 3, section: HitSection::Legs.code() });

        let side = arena.cast_ray(0, Vec3::new(2.5, 3.5, 20.5), Vec3::X, 128.0);
        assert_eq!(side, RayHit::Player { id: 3, section: HitSection::Arms.code() });
    }

    #[test]
    fn shooter_is_never_hit() {
        let mut arena = Arena::flat(32);
        arena.add_dummy(0, Vec3::new(10.5, 4.0, 5.5));

        let hit = arena.cast_ray(0, Vec3::new(10.5, 4.0, 5.5), Vec3::Z, 20.0);
        assert_eq!(hit, RayHit::Nothing);
    }

    #[test]
    fn blocks_occlude_dummies() {
        let mut arena = Arena::flat(32);
        arena.add_wall(10, (0, 32), 4);
        arena.add_dummy(2, Vec3::new(10.5, 4.0, 20.5));

        let hit = arena.cast_ray(0, Vec3::new(10.5, 3.5, 2.5), Vec3::Z, 128.0);
        assert!(matches!(hit, RayHit::Block { pos, .. } if pos.z == 10));
    }

    #[test]
    fn range_limits_the_walk() {
        let mut arena = Arena::flat(32);
        arena.add_wall(30, (0, 32), 3);

        let origin = Vec3::new(10.5, 3.5, 0.5);
        assert_eq!(arena.cast_ray(0, origin, Vec3::Z, 20.0), RayHit::Nothing);
        assert!(matches!(arena.cast_ray(0, origin, Vec3::Z, 40.0), RayHit::Block { .. }));
    }

    #[test]
    fn blocks_break_after_enough_damage() {
        let mut arena = Arena::flat(8);
        let pos = IVec3::new(2, 1, 2);

        assert!(!arena.apply_block_damage(pos, 50));
        assert!(arena.is_solid(pos));
        assert!(arena.apply_block_damage(pos, 50));
        assert!(!arena.is_solid(pos));
        assert!(!arena.apply_block_damage(pos, 50));
        assert_eq!(arena.block_count(), 8 * 8 * 2 - 1);
    }
}
