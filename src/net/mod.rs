//! Outbound protocol messages and the bridge that emits them

pub mod bridge;
pub mod protocol;

pub use bridge::{NetworkBridge, PacketSink};
pub use protocol::{Buttons, OutboundEvent};
