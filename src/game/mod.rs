//! Weapon simulation modules

pub mod catalog;
pub mod effects;
pub mod fire_control;
pub mod hitscan;
pub mod recoil;
pub mod spread;
pub mod weapon;

#[cfg(test)]
pub(crate) mod testing;

pub use catalog::{CatalogError, WeaponCatalog, WeaponKind, WeaponStats};
pub use fire_control::{FireControlEvent, WeaponSession};
pub use weapon::{Environment, TickReport, WeaponSystem};

use glam::Vec3;

use crate::net::protocol::Buttons;
use recoil::Motion;
use spread::Stance;

/// Tool in the local player's hands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeldItem {
    Spade,
    Block,
    #[default]
    Gun,
    Grenade,
}

/// Input state for a single tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputSnapshot {
    pub primary: bool,
    pub secondary: bool,
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub crouch: bool,
}

impl InputSnapshot {
    pub fn moving(&self) -> bool {
        self.up || self.down || self.left || self.right
    }

    pub fn buttons(&self) -> Buttons {
        Buttons {
            primary: self.primary,
            secondary: self.secondary,
        }
    }
}

/// Aim and movement state read from the owning player entity
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AimState {
    pub position: Vec3,
    /// Physics eye point; shots start `eye_height` above it
    pub eye: Vec3,
    /// Unit aim vector (y up)
    pub orientation: Vec3,
    pub held_item: HeldItem,
    pub input: InputSnapshot,
    pub airborne: bool,
}

impl AimState {
    pub fn gun_held(&self) -> bool {
        self.held_item == HeldItem::Gun
    }

    pub fn stance(&self) -> Stance {
        Stance {
            aiming: self.input.secondary,
            crouching: self.input.crouch,
        }
    }

    pub fn motion(&self) -> Motion {
        Motion {
            moving: self.input.moving(),
            aiming: self.input.secondary,
            airborne: self.airborne,
            crouching: self.input.crouch,
        }
    }
}

/// The player controlled by this client
#[derive(Debug, Clone, PartialEq)]
pub struct LocalPlayer {
    /// Id assigned by the server
    pub id: u8,
    pub aim: AimState,
    pub weapon: WeaponSession,
    /// A menu or chat box has focus
    pub ui_blocking: bool,
}

impl LocalPlayer {
    pub fn new(id: u8, weapon: WeaponKind, stats: &WeaponStats) -> Self {
        Self {
            id,
            aim: AimState::default(),
            weapon: WeaponSession::new(weapon, stats),
            ui_blocking: false,
        }
    }
}
