//! Weapon catalog - immutable per-weapon constants

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::effects::{CasingModel, SoundCue};
use crate::util::rng::DRAW_MAX;

/// Divisor applied to the difference of two spread draws
pub const SPREAD_DRAW_SCALE: f32 = 16383.0;

/// Weapon types known to the protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeaponKind {
    /// Semi-automatic rifle
    Rifle,
    /// Submachine gun
    Smg,
    /// Pump shotgun, fires a pellet burst
    Shotgun,
}

impl WeaponKind {
    pub const ALL: [WeaponKind; 3] = [WeaponKind::Rifle, WeaponKind::Smg, WeaponKind::Shotgun];

    /// Wire id of the weapon
    pub fn id(self) -> u8 {
        match self {
            Self::Rifle => 0,
            Self::Smg => 1,
            Self::Shotgun => 2,
        }
    }

    pub fn from_id(id: u8) -> Result<Self, CatalogError> {
        match id {
            0 => Ok(Self::Rifle),
            1 => Ok(Self::Smg),
            2 => Ok(Self::Shotgun),
            other => Err(CatalogError::UnknownWeapon(other)),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Rifle => "rifle",
            Self::Smg => "smg",
            Self::Shotgun => "shotgun",
        }
    }
}

impl TryFrom<u8> for WeaponKind {
    type Error = CatalogError;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        Self::from_id(id)
    }
}

impl std::str::FromStr for WeaponKind {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| CatalogError::UnknownName(s.to_string()))
    }
}

/// How a weapon refills its magazine
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "style", rename_all = "snake_case")]
pub enum ReloadStyle {
    /// Whole magazine refilled at once after `duration` seconds
    Bulk { duration: f64 },
    /// One round inserted every `per_round` seconds
    Incremental { per_round: f64 },
}

/// Weapon stats per weapon type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponStats {
    /// Minimum time between shots (seconds)
    pub fire_delay: f64,
    /// Damage dealt to a block per pellet
    pub block_damage: u32,
    /// Rounds held by a full magazine
    pub magazine: u8,
    /// Rounds carried in reserve after a restock
    pub reserve: u8,
    /// Spread coefficient applied to each axis draw
    pub spread: f32,
    /// Crouching halves the spread
    pub crouch_tightens_spread: bool,
    /// Hit-scan rays per trigger pull
    pub pellets: u8,
    pub recoil_horizontal: f64,
    pub recoil_vertical: f64,
    pub reload: ReloadStyle,
    pub casing: CasingModel,
    pub fire_sound: SoundCue,
    pub reload_sound: SoundCue,
    /// Played once a shell-by-shell reload has filled the magazine
    #[serde(default)]
    pub reload_done_sound: Option<SoundCue>,
}

impl WeaponStats {
    /// Largest per-axis perturbation a single pellet can receive before
    /// stance modifiers
    pub fn spread_half_angle(&self) -> f32 {
        self.spread * DRAW_MAX as f32 / SPREAD_DRAW_SCALE
    }

    fn validate(&self, kind: WeaponKind) -> Result<(), CatalogError> {
        let invalid = |reason| Err(CatalogError::Invalid { weapon: kind, reason });

        if !(self.fire_delay >= 0.0) {
            return invalid("fire_delay must be non-negative");
        }
        if self.magazine == 0 {
            return invalid("magazine must hold at least one round");
        }
        if self.pellets == 0 {
            return invalid("pellets must be at least one");
        }
        if !(self.spread >= 0.0) {
            return invalid("spread must be non-negative");
        }
        match self.reload {
            ReloadStyle::Bulk { duration } if !(duration >= 0.0) => {
                invalid("reload duration must be non-negative")
            }
            ReloadStyle::Incremental { per_round } if !(per_round > 0.0) => {
                invalid("per-round reload interval must be positive")
            }
            _ => Ok(()),
        }
    }

    fn rifle() -> Self {
        Self {
            fire_delay: 0.5,
            block_damage: 50,
            magazine: 10,
            reserve: 50,
            spread: 0.006,
            crouch_tightens_spread: true,
            pellets: 1,
            recoil_horizontal: 0.0001,
            recoil_vertical: 0.05,
            reload: ReloadStyle::Bulk { duration: 2.5 },
            casing: CasingModel::Semi,
            fire_sound: SoundCue::RifleShoot,
            reload_sound: SoundCue::RifleReload,
            reload_done_sound: None,
        }
    }

    fn smg() -> Self {
        Self {
            fire_delay: 0.1,
            block_damage: 34,
            magazine: 30,
            reserve: 120,
            spread: 0.012,
            crouch_tightens_spread: true,
            pellets: 1,
            recoil_horizontal: 0.00005,
            recoil_vertical: 0.0120,
            reload: ReloadStyle::Bulk { duration: 2.5 },
            casing: CasingModel::Smg,
            fire_sound: SoundCue::SmgShoot,
            reload_sound: SoundCue::SmgReload,
            reload_done_sound: None,
        }
    }

    fn shotgun() -> Self {
        Self {
            fire_delay: 1.0,
            block_damage: 22,
            magazine: 6,
            reserve: 48,
            spread: 0.024,
            crouch_tightens_spread: false,
            pellets: 8,
            recoil_horizontal: 0.0002,
            recoil_vertical: 0.1,
            reload: ReloadStyle::Incremental { per_round: 0.5 },
            casing: CasingModel::Shotgun,
            fire_sound: SoundCue::ShotgunShoot,
            reload_sound: SoundCue::ShotgunReload,
            reload_done_sound: Some(SoundCue::ShotgunCock),
        }
    }
}

/// Immutable weapon table, loaded once at startup
#[derive(Debug, Clone)]
pub struct WeaponCatalog {
    weapons: HashMap<WeaponKind, WeaponStats>,
}

impl WeaponCatalog {
    /// Stock values shipped with the game
    pub fn standard() -> Self {
        let weapons = HashMap::from([
            (WeaponKind::Rifle, WeaponStats::rifle()),
            (WeaponKind::Smg, WeaponStats::smg()),
            (WeaponKind::Shotgun, WeaponStats::shotgun()),
        ]);
        Self { weapons }
    }

    /// Parse a JSON table keyed by weapon name. Every weapon must be present.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let weapons: HashMap<WeaponKind, WeaponStats> = serde_json::from_str(json)?;

        for kind in WeaponKind::ALL {
            let stats = weapons.get(&kind).ok_or(CatalogError::Missing(kind))?;
            stats.validate(kind)?;
        }

        Ok(Self { weapons })
    }

    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn get(&self, kind: WeaponKind) -> Result<&WeaponStats, CatalogError> {
        self.weapons.get(&kind).ok_or(CatalogError::Missing(kind))
    }

    /// Resolve a raw weapon id as received from the server
    pub fn lookup(&self, id: u8) -> Result<(WeaponKind, &WeaponStats), CatalogError> {
        let kind = WeaponKind::from_id(id)?;
        Ok((kind, self.get(kind)?))
    }
}

impl Default for WeaponCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

/// Weapon configuration faults
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Unknown weapon id: {0}")]
    UnknownWeapon(u8),

    #[error("Unknown weapon name: {0:?}")]
    UnknownName(String),

    #[error("Weapon table has no entry for {0:?}")]
    Missing(WeaponKind),

    #[error("Invalid stats for {weapon:?}: {reason}")]
    Invalid {
        weapon: WeaponKind,
        reason: &'static str,
    },

    #[error("Failed to parse weapon table: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Failed to read weapon table: {0}")]
    Io(#[from] std::io::Error),
}
