//! Recoil model - camera kick after a trigger pull

use super::catalog::WeaponStats;

/// Movement state that scales recoil
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Motion {
    /// Any direction key held
    pub moving: bool,
    /// Secondary button held (aiming down sights)
    pub aiming: bool,
    pub airborne: bool,
    pub crouching: bool,
}

/// Camera displacement for one trigger pull (radians)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RecoilKick {
    /// Added to yaw
    pub horizontal: f64,
    /// Subtracted from pitch
    pub vertical: f64,
}

/// Signed horizontal drift for the given wall-clock time.
///
/// A triangle wave over 512 ms whose sign flips every 512 ms, so the drift
/// sweeps left and right with a 1024 ms period.
pub fn horizontal_wave(time_ms: i64) -> f64 {
    let phase = (time_ms & 511) as f64;
    let drift = phase - 255.5;
    if (time_ms & 1023) < 512 {
        -drift
    } else {
        drift
    }
}

/// Multiplier from movement state, applied to both axes
pub fn motion_factor(motion: Motion) -> f64 {
    let mut factor = 1.0;
    if motion.moving && !motion.aiming {
        factor *= 2.0;
    }
    if motion.airborne {
        factor *= 2.0;
    } else if motion.crouching {
        factor *= 0.5;
    }
    factor
}

/// Compute the kick for a trigger pull at `time_ms`.
///
/// `pitch` is the vertical component of the aim vector; horizontal kick
/// fades out as it approaches +/-1.
pub fn kick(stats: &WeaponStats, time_ms: i64, motion: Motion, pitch: f32) -> RecoilKick {
    let factor = motion_factor(motion);
    let mut horizontal = stats.recoil_horizontal * horizontal_wave(time_ms) * factor;
    let vertical = stats.recoil_vertical * factor;

    let damping = 1.0f32 - pitch * pitch * pitch * pitch;
    horizontal *= f64::from(damping.max(0.0)).sqrt();

    RecoilKick {
        horizontal,
        vertical,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::catalog::{WeaponCatalog, WeaponKind};

    fn stats(kind: WeaponKind) -> WeaponStats {
        WeaponCatalog::standard().get(kind).unwrap().clone()
    }

    #[test]
    fn wave_shape() {
        assert_eq!(horizontal_wave(0), 255.5);
        assert_eq!(horizontal_wave(511), -255.5);
        assert_eq!(horizontal_wave(512), -255.5);
        assert_eq!(horizontal_wave(1023), 255.5);
        assert_eq!(horizontal_wave(1024), 255.5);
    }

    #[test]
    fn sign_repeats_every_1024_ms() {
        for t in (0..4096).step_by(7) {
            assert_eq!(horizontal_wave(t), horizontal_wave(t + 1024));
            assert_eq!(horizontal_wave(t), -horizontal_wave(t + 512));
        }
    }

    #[test]
    fn motion_modifiers_combine() {
        assert_eq!(motion_factor(Motion::default()), 1.0);
        assert_eq!(motion_factor(Motion { moving: true, ..Default::default() }), 2.0);
        assert_eq!(
            motion_factor(Motion { moving: true, aiming: true, ..Default::default() }),
            1.0
        );
        assert_eq!(
            motion_factor(Motion { moving: true, airborne: true, crouching: true, ..Default::default() }),
            4.0
        );
        assert_eq!(motion_factor(Motion { crouching: true, ..Default::default() }), 0.5);
        assert_eq!(
            motion_factor(Motion { moving: true, crouching: true, ..Default::default() }),
            1.0
        );
    }

    #[test]
    fn kick_scales_both_axes_together() {
        let rifle = stats(WeaponKind::Rifle);
        let still = kick(&rifle, 100, Motion::default(), 0.0);
        let airborne = kick(&rifle, 100, Motion { airborne: true, ..Default::default() }, 0.0);
        let crouched = kick(&rifle, 100, Motion { crouching: true, ..Default::default() }, 0.0);

        assert_eq!(still.vertical, 0.05);
        assert_eq!(airborne.vertical, still.vertical * 2.0);
        assert_eq!(airborne.horizontal, still.horizontal * 2.0);
        assert_eq!(crouched.vertical, still.vertical * 0.5);
        assert_eq!(crouched.horizontal, still.horizontal * 0.5);
    }

    #[test]
    fn horizontal_kick_is_bounded() {
        let worst = Motion { moving: true, airborne: true, ..Default::default() };
        for kind in WeaponKind::ALL {
            let stats = stats(kind);
            let bound = stats.recoil_horizontal.abs() * 255.5 * 4.0;
            for t in 0..2048 {
                let h = kick(&stats, t, worst, 0.0).horizontal;
                assert!(h.abs() <= bound + 1e-12, "{kind:?} t={t} h={h}");
            }
        }
    }

    #[test]
    fn horizontal_kick_fades_near_vertical() {
        let rifle = stats(WeaponKind::Rifle);
        let level = kick(&rifle, 0, Motion::default(), 0.0);
        let steep = kick(&rifle, 0, Motion::default(), 0.9);
        let vertical = kick(&rifle, 0, Motion::default(), 1.0);

        assert!(steep.horizontal.abs() < level.horizontal.abs());
        assert_eq!(vertical.horizontal, 0.0);
        assert_eq!(vertical.vertical, level.vertical);
    }
}
