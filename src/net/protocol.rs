//! Outbound packet definitions.
//! Payloads are packed little-endian; the transport prepends the packet id.

use bytes::{BufMut, Bytes, BytesMut};
use glam::Vec3;

/// Packet ids of the legacy protocol
pub mod packet_id {
    pub const ORIENTATION_DATA: u8 = 1;
    pub const WEAPON_INPUT: u8 = 4;
    pub const HIT: u8 = 5;
    pub const BLOCK_ACTION: u8 = 13;
    pub const WEAPON_RELOAD: u8 = 28;
}

/// Trigger buttons packed the way the server expects them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Buttons {
    pub primary: bool,
    pub secondary: bool,
}

impl Buttons {
    pub fn packed(self) -> u8 {
        u8::from(self.primary) | u8::from(self.secondary) << 1
    }
}

/// Events this core hands to the transport
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutboundEvent {
    FireInput {
        player_id: u8,
        primary: bool,
        secondary: bool,
    },
    /// Aim direction in the wire frame
    OrientationUpdate { x: f32, y: f32, z: f32 },
    HitReport { player_id: u8, hit_section: u8 },
    BlockDamageReport {
        action_type: u8,
        player_id: u8,
        x: i32,
        y: i32,
        z: i32,
    },
    /// Ammo counts at the moment the reload started
    ReloadReport {
        player_id: u8,
        ammo: u8,
        reserve: u8,
    },
}

impl OutboundEvent {
    pub const ACTION_DESTROY: u8 = 1;

    /// Orientation update for a client-frame aim vector (y up). The wire
    /// frame swaps the second and third axes and points z down.
    pub fn orientation(aim: Vec3) -> Self {
        Self::OrientationUpdate {
            x: aim.x,
            y: aim.z,
            z: -aim.y,
        }
    }

    pub fn packet_id(&self) -> u8 {
        match self {
            Self::FireInput { .. } => packet_id::WEAPON_INPUT,
            Self::OrientationUpdate { .. } => packet_id::ORIENTATION_DATA,
            Self::HitReport { .. } => packet_id::HIT,
            Self::BlockDamageReport { .. } => packet_id::BLOCK_ACTION,
            Self::ReloadReport { .. } => packet_id::WEAPON_RELOAD,
        }
    }

    /// Payload size in bytes, excluding the packet id
    pub fn wire_len(&self) -> usize {
        match self {
            Self::FireInput { .. } => 2,
            Self::OrientationUpdate { .. } => 12,
            Self::HitReport { .. } => 2,
            Self::BlockDamageReport { .. } => 14,
            Self::ReloadReport { .. } => 3,
        }
    }

    pub fn encode(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(self.wire_len());

        match *self {
            Self::FireInput {
                player_id,
                primary,
                secondary,
            } => {
                buf.put_u8(player_id);
                buf.put_u8(Buttons { primary, secondary }.packed());
            }
            Self::OrientationUpdate { x, y, z } => {
                buf.put_f32_le(x);
                buf.put_f32_le(y);
                buf.put_f32_le(z);
            }
            Self::HitReport {
                player_id,
                hit_section,
            } => {
                buf.put_u8(player_id);
                buf.put_u8(hit_section);
            }
            Self::BlockDamageReport {
                action_type,
                player_id,
                x,
                y,
                z,
            } => {
                buf.put_u8(action_type);
                buf.put_u8(player_id);
                buf.put_i32_le(x);
                buf.put_i32_le(y);
                buf.put_i32_le(z);
            }
            Self::ReloadReport {
                player_id,
                ammo,
                reserve,
            } => {
                buf.put_u8(player_id);
                buf.put_u8(ammo);
                buf.put_u8(reserve);
            }
        }

        buf.freeze()
    }
}
