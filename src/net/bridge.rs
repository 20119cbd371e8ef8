//! Network bridge - turns weapon events into packets for the transport

use bytes::Bytes;
use glam::Vec3;
use tracing::trace;

use super::protocol::{Buttons, OutboundEvent};

/// Outbound half of the transport. Sends are fire-and-forget.
pub trait PacketSink {
    fn send(&mut self, packet_id: u8, payload: Bytes);
}

/// Collects packets in memory, in send order
impl PacketSink for Vec<(u8, Bytes)> {
    fn send(&mut self, packet_id: u8, payload: Bytes) {
        self.push((packet_id, payload));
    }
}

/// Translates local weapon activity into protocol messages
#[derive(Debug)]
pub struct NetworkBridge<S> {
    sink: S,
    /// Trigger state last sent to the server
    last_buttons: Buttons,
    sent: u64,
}

impl<S: PacketSink> NetworkBridge<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            last_buttons: Buttons::default(),
            sent: 0,
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Packets handed to the transport so far
    pub fn sent(&self) -> u64 {
        self.sent
    }

    /// Encode and hand over a single event
    pub fn emit(&mut self, event: OutboundEvent) {
        let payload = event.encode();
        trace!(
            packet_id = event.packet_id(),
            payload = %hex::encode(&payload),
            "Sending packet"
        );
        self.sink.send(event.packet_id(), payload);
        self.sent += 1;
    }

    /// Per-pellet updates: trigger state if it changed since the last
    /// transmission, then the unperturbed aim direction
    pub fn shot(&mut self, player_id: u8, buttons: Buttons, aim: Vec3) {
        if buttons != self.last_buttons {
            self.emit(OutboundEvent::FireInput {
                player_id,
                primary: buttons.primary,
                secondary: buttons.secondary,
            });
            self.last_buttons = buttons;
        }

        self.emit(OutboundEvent::orientation(aim));
    }

    pub fn reload_started(&mut self, player_id: u8, ammo: u8, reserve: u8) {
        self.emit(OutboundEvent::ReloadReport {
            player_id,
            ammo,
            reserve,
        });
    }

    /// Forget the last transmitted trigger state, e.g. after a reconnect
    pub fn reset_buttons(&mut self) {
        self.last_buttons = Buttons::default();
    }

    pub fn into_sink(self) -> S {
        self.sink
    }
}
