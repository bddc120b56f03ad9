//! Routing decoded packets to per-kind handler methods.

use std::future::Future;

use openracing_f1_codec::{CodecError, DecodedPacket, PacketKind};
use tracing::{debug, info};

use crate::error::ListenerResult;
use crate::source::PacketSource;

/// Receives decoded packets.
///
/// [`handle_generic`](Self::handle_generic) sees every packet; the per-kind
/// methods are called afterwards for their kind only. Every method defaults
/// to doing nothing.
pub trait PacketHandler {
    fn handle_generic(&mut self, _packet: &DecodedPacket) {}

    /// A datagram that failed to decode. It has already been logged.
    fn handle_error(&mut self, _error: &CodecError) {}

    fn handle_motion(&mut self, _packet: &DecodedPacket) {}
    fn handle_session(&mut self, _packet: &DecodedPacket) {}
    fn handle_lap_data(&mut self, _packet: &DecodedPacket) {}
    fn handle_event(&mut self, _packet: &DecodedPacket) {}
    fn handle_participants(&mut self, _packet: &DecodedPacket) {}
    fn handle_car_setups(&mut self, _packet: &DecodedPacket) {}
    fn handle_car_telemetry(&mut self, _packet: &DecodedPacket) {}
    fn handle_car_status(&mut self, _packet: &DecodedPacket) {}
    fn handle_final_classification(&mut self, _packet: &DecodedPacket) {}
    fn handle_lobby_info(&mut self, _packet: &DecodedPacket) {}
    fn handle_car_damage(&mut self, _packet: &DecodedPacket) {}
    fn handle_session_history(&mut self, _packet: &DecodedPacket) {}
    fn handle_tyre_sets(&mut self, _packet: &DecodedPacket) {}
    fn handle_motion_ex(&mut self, _packet: &DecodedPacket) {}
    fn handle_time_trial(&mut self, _packet: &DecodedPacket) {}
}

/// Call `handle_generic`, then the method for the packet's kind.
pub fn dispatch<H: PacketHandler + ?Sized>(handler: &mut H, packet: &DecodedPacket) {
    handler.handle_generic(packet);
    match packet.kind {
        PacketKind::Motion => handler.handle_motion(packet),
        PacketKind::Session => handler.handle_session(packet),
        PacketKind::LapData => handler.handle_lap_data(packet),
        PacketKind::Event => handler.handle_event(packet),
        PacketKind::Participants => handler.handle_participants(packet),
        PacketKind::CarSetups => handler.handle_car_setups(packet),
        PacketKind::CarTelemetry => handler.handle_car_telemetry(packet),
        PacketKind::CarStatus => handler.handle_car_status(packet),
        PacketKind::FinalClassification => handler.handle_final_classification(packet),
        PacketKind::LobbyInfo => handler.handle_lobby_info(packet),
        PacketKind::CarDamage => handler.handle_car_damage(packet),
        PacketKind::SessionHistory => handler.handle_session_history(packet),
        PacketKind::TyreSets => handler.handle_tyre_sets(packet),
        PacketKind::MotionEx => handler.handle_motion_ex(packet),
        PacketKind::TimeTrial => handler.handle_time_trial(packet),
    }
}

/// Drive `handler` from `source` until the source ends or `shutdown`
/// completes. Returns the number of packets dispatched.
///
/// # Errors
///
/// Errors of the source itself (for example a truncated capture file).
/// Decode failures are passed to [`PacketHandler::handle_error`].
pub async fn run<S, H, F>(source: &mut S, handler: &mut H, shutdown: F) -> ListenerResult<u64>
where
    S: PacketSource + ?Sized,
    H: PacketHandler + ?Sized,
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);
    let mut dispatched = 0u64;
    loop {
        tokio::select! {
            biased;
            () = &mut shutdown => {
                info!(dispatched, "packet handler shutting down");
                break;
            }
            next = source.next_decoded() => match next? {
                None => {
                    debug!(dispatched, "packet source exhausted");
                    break;
                }
                Some(Ok(packet)) => {
                    dispatch(handler, &packet);
                    dispatched = dispatched.saturating_add(1);
                }
                Some(Err(err)) => handler.handle_error(&err),
            }
        }
    }
    Ok(dispatched)
}
