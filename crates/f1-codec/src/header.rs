//! Packet header decoding.
//!
//! The header is the only part of a datagram that is read before dispatch.
//! Its layout depends on the generation, which is itself taken from the
//! first two bytes (`packet_format`).

use serde::Serialize;

use crate::dispatch::PacketKey;
use crate::error::{CodecError, CodecResult};
use crate::generation::{Generation, MIN_HEADER_SIZE};
use crate::primitive::{ByteReader, ByteWriter};

/// Car index value meaning "no car" (used for the secondary player slot).
pub const NO_CAR: u8 = 255;

/// Number of per-car slots in every car array.
pub const MAX_CARS: usize = 22;

/// Decoded packet header.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PacketHeader {
    pub packet_format: u16,
    /// Present from the 2024 generation on.
    pub game_year: Option<u8>,
    pub game_major_version: u8,
    pub game_minor_version: u8,
    pub packet_version: u8,
    pub packet_id: u8,
    pub session_uid: u64,
    pub session_time: f32,
    pub frame_identifier: u32,
    /// Present from the 2024 generation on; does not go back after flashbacks.
    pub overall_frame_identifier: Option<u32>,
    pub player_car_index: u8,
    pub secondary_player_car_index: u8,
}

impl PacketHeader {
    pub fn generation(&self) -> Option<Generation> {
        Generation::from_packet_format(self.packet_format)
    }

    /// The dispatch triple.
    pub fn key(&self) -> PacketKey {
        PacketKey::new(self.packet_format, self.packet_version, self.packet_id)
    }

    /// The secondary player's car index in splitscreen, if any.
    pub fn secondary_player(&self) -> Option<u8> {
        (self.secondary_player_car_index != NO_CAR).then_some(self.secondary_player_car_index)
    }

    /// Wire size of this header.
    pub fn wire_size(&self) -> usize {
        let base = MIN_HEADER_SIZE;
        let year = usize::from(self.game_year.is_some());
        let overall = if self.overall_frame_identifier.is_some() { 4 } else { 0 };
        base.saturating_add(year).saturating_add(overall)
    }

    /// Append the header in wire order.
    ///
    /// Optional fields are written when present, so a header built for a
    /// generation round-trips through [`decode_header`].
    pub fn write_to(&self, w: &mut ByteWriter) {
        w.write_u16_le(self.packet_format);
        if let Some(year) = self.game_year {
            w.write_u8(year);
        }
        w.write_u8(self.game_major_version)
            .write_u8(self.game_minor_version)
            .write_u8(self.packet_version)
            .write_u8(self.packet_id)
            .write_u64_le(self.session_uid)
            .write_f32_le(self.session_time)
            .write_u32_le(self.frame_identifier);
        if let Some(overall) = self.overall_frame_identifier {
            w.write_u32_le(overall);
        }
        w.write_u8(self.player_car_index)
            .write_u8(self.secondary_player_car_index);
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut w = ByteWriter::with_capacity(self.wire_size());
        self.write_to(&mut w);
        w.into_inner()
    }
}

/// Decode the header and return it with the number of bytes it occupies.
///
/// # Errors
///
/// - [`CodecError::TooShort`] if the buffer is shorter than the smallest
///   known header, or shorter than the header of its own generation.
/// - [`CodecError::UnknownPacketType`] if `packet_format` names no known
///   generation; version and id are then unknown.
pub fn decode_header(raw: &[u8]) -> CodecResult<(PacketHeader, usize)> {
    if raw.len() < MIN_HEADER_SIZE {
        return Err(CodecError::TooShort {
            needed: MIN_HEADER_SIZE,
            actual: raw.len(),
        });
    }

    let mut r = ByteReader::new(raw);
    let packet_format = r.u16_le()?;
    let generation =
        Generation::from_packet_format(packet_format).ok_or(CodecError::UnknownPacketType {
            packet_format,
            packet_version: None,
            packet_id: None,
        })?;

    let needed = generation.header_size();
    if raw.len() < needed {
        return Err(CodecError::TooShort {
            needed,
            actual: raw.len(),
        });
    }

    let extended = generation.has_extended_header();
    let game_year = if extended { Some(r.u8()?) } else { None };
    let game_major_version = r.u8()?;
    let game_minor_version = r.u8()?;
    let packet_version = r.u8()?;
    let packet_id = r.u8()?;
    let session_uid = r.u64_le()?;
    let session_time = r.f32_le()?;
    let frame_identifier = r.u32_le()?;
    let overall_frame_identifier = if extended { Some(r.u32_le()?) } else { None };
    let player_car_index = r.u8()?;
    let secondary_player_car_index = r.u8()?;

    let header = PacketHeader {
        packet_format,
        game_year,
        game_major_version,
        game_minor_version,
        packet_version,
        packet_id,
        session_uid,
        session_time,
        frame_identifier,
        overall_frame_identifier,
        player_car_index,
        secondary_player_car_index,
    };
    Ok((header, r.position()))
}
