//! Spread model - random aim perturbation per pellet

use glam::Vec3;

use super::catalog::{WeaponStats, SPREAD_DRAW_SCALE};
use crate::util::rng::ShotRng;

/// Stance inputs that tighten the spread cone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Stance {
    /// Secondary button held (aiming down sights)
    pub aiming: bool,
    pub crouching: bool,
}

/// Combined stance multiplier applied to the weapon's spread coefficient
pub fn stance_factor(stats: &WeaponStats, stance: Stance) -> f32 {
    let aim = if stance.aiming { 0.5 } else { 1.0 };
    let crouch = if stance.crouching && stats.crouch_tightens_spread {
        0.5
    } else {
        1.0
    };
    aim * crouch
}

/// Perturb `direction` for one pellet.
///
/// Each axis gets the difference of two independent draws, which gives a
/// triangular distribution centred on the aim direction. The result is not
/// renormalised.
pub fn perturb(stats: &WeaponStats, stance: Stance, direction: Vec3, rng: &mut ShotRng) -> Vec3 {
    let factor = stats.spread * stance_factor(stats, stance);
    let mut axis = || (rng.draw() - rng.draw()) as f32 / SPREAD_DRAW_SCALE * factor;

    let dx = axis();
    let dy = axis();
    let dz = axis();
    direction + Vec3::new(dx, dy, dz)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::catalog::{WeaponCatalog, WeaponKind};

    fn stats(kind: WeaponKind) -> WeaponStats {
        WeaponCatalog::standard().get(kind).unwrap().clone()
    }

    #[test]
    fn stance_modifiers() {
        let rifle = stats(WeaponKind::Rifle);
        let shotgun = stats(WeaponKind::Shotgun);
        let both = Stance { aiming: true, crouching: true };

        assert_eq!(stance_factor(&rifle, Stance::default()), 1.0);
        assert_eq!(stance_factor(&rifle, both), 0.25);
        assert_eq!(stance_factor(&shotgun, both), 0.5);
        assert_eq!(stance_factor(&shotgun, Stance { aiming: false, crouching: true }), 1.0);
    }

    #[test]
    fn perturbation_is_bounded_and_symmetric() {
        let aim = Vec3::new(0.0, 0.0, 1.0);
        let stances = [
            Stance::default(),
            Stance { aiming: true, crouching: false },
            Stance { aiming: true, crouching: true },
        ];

        for kind in WeaponKind::ALL {
            let stats = stats(kind);
            for stance in stances {
                let mut rng = ShotRng::seeded(99);
                let bound = stats.spread_half_angle() * stance_factor(&stats, stance);
                let samples = 20_000;
                let mut sum = Vec3::ZERO;

                for _ in 0..samples {
                    let offset = perturb(&stats, stance, aim, &mut rng) - aim;
                    assert!(offset.abs().max_element() <= bound * 1.0001, "{kind:?} {offset:?}");
                    sum += offset;
                }

                let mean = sum / samples as f32;
                assert!(mean.abs().max_element() < bound * 0.05, "{kind:?} mean {mean:?}");
            }
        }
    }

    #[test]
    fn distribution_peaks_at_centre() {
        let stats = stats(WeaponKind::Smg);
        let mut rng = ShotRng::seeded(3);
        let bound = stats.spread_half_angle();

        let mut inner = 0;
        let mut outer = 0;
        for _ in 0..30_000 {
            let dx = perturb(&stats, Stance::default(), Vec3::ZERO, &mut rng).x.abs();
            if dx < bound * 0.25 {
                inner += 1;
            } else if dx > bound * 0.75 {
                outer += 1;
            }
        }

        // Triangular: 7/16 of the mass in the inner quarter, 1/16 in the outer
        assert!(inner > outer * 4, "inner {inner} outer {outer}");
    }

    #[test]
    fn legacy_draws_give_legacy_offsets() {
        let stats = stats(WeaponKind::Rifle);
        let mut rng = ShotRng::legacy(1);
        let dir = perturb(&stats, Stance::default(), Vec3::ZERO, &mut rng);

        let expected_x = (41 - 18467) as f32 / 16383.0 * 0.006;
        let expected_y = (6334 - 26500) as f32 / 16383.0 * 0.006;
        assert_eq!(dir.x, expected_x);
        assert_eq!(dir.y, expected_y);
    }
}
