//! Packet builders shared by the codec integration tests.

#![allow(dead_code)]

use openracing_f1_codec::header::NO_CAR;
use openracing_f1_codec::{Codec, Generation, PacketHeader, PacketKind, RegistryError};

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

pub fn codec() -> Result<&'static Codec, RegistryError> {
    Codec::standard()
}

/// A header of `generation` for `kind`, with the optional fields filled in
/// when the generation carries them.
pub fn header(generation: Generation, kind: PacketKind) -> PacketHeader {
    let extended = generation.has_extended_header();
    PacketHeader {
        packet_format: generation.packet_format(),
        game_year: extended.then_some(24),
        game_major_version: 1,
        game_minor_version: 12,
        packet_version: 1,
        packet_id: kind.id(),
        session_uid: 0x0123_4567_89AB_CDEF,
        session_time: 93.5,
        frame_identifier: 4_200,
        overall_frame_identifier: extended.then_some(4_321),
        player_car_index: 3,
        secondary_player_car_index: NO_CAR,
    }
}

/// Deterministic filler so every field decodes to something non-zero.
pub fn pattern(len: usize, seed: u8) -> Vec<u8> {
    (0..len)
        .map(|i| (i as u8).wrapping_mul(31).wrapping_add(seed))
        .collect()
}

/// Header followed by `body`, padded or cut to `total` bytes.
pub fn packet_with_body(header: &PacketHeader, body: &[u8], total: usize) -> Vec<u8> {
    let mut raw = header.to_bytes();
    raw.extend_from_slice(body);
    raw.resize(total, 0);
    raw
}

/// Wire size of the packet schema routed for `kind`.
pub fn packet_size(generation: Generation, kind: PacketKind) -> Option<usize> {
    let codec = codec().ok()?;
    let route = codec
        .dispatch()
        .routes()
        .find(|r| r.generation == generation && r.kind == kind)?;
    codec
        .registry()
        .get(generation, route.schema)
        .map(|s| s.wire_size())
}

/// A full-size packet of `kind` with patterned contents.
pub fn patterned_packet(generation: Generation, kind: PacketKind, seed: u8) -> Option<Vec<u8>> {
    let size = packet_size(generation, kind)?;
    let h = header(generation, kind);
    Some(packet_with_body(&h, &pattern(size, seed), size))
}

/// An event packet carrying `code` and the payload bytes at the start of
/// the union region.
pub fn event_packet(generation: Generation, code: &[u8; 4], payload: &[u8]) -> Option<Vec<u8>> {
    let size = packet_size(generation, PacketKind::Event)?;
    let h = header(generation, PacketKind::Event);
    let mut body = code.to_vec();
    body.extend_from_slice(payload);
    Some(packet_with_body(&h, &body, size))
}

pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}
