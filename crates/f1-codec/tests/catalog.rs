//! Wire catalog: packet sizes, routes and event codes per generation.

mod helpers;

use helpers::{TestResult, codec, packet_size};
use openracing_f1_codec::generation::{HEADER_SIZE_2022, HEADER_SIZE_2024};
use openracing_f1_codec::schema::FieldType;
use openracing_f1_codec::{Generation, PacketKind};

const SIZES: [(PacketKind, Option<usize>, usize); 15] = [
    (PacketKind::Motion, Some(1464), 1349),
    (PacketKind::Session, Some(632), 753),
    (PacketKind::LapData, Some(972), 1285),
    (PacketKind::Event, Some(40), 45),
    (PacketKind::Participants, Some(1257), 1350),
    (PacketKind::CarSetups, Some(1102), 1133),
    (PacketKind::CarTelemetry, Some(1347), 1352),
    (PacketKind::CarStatus, Some(1058), 1239),
    (PacketKind::FinalClassification, Some(1015), 1020),
    (PacketKind::LobbyInfo, Some(1191), 1306),
    (PacketKind::CarDamage, Some(948), 953),
    (PacketKind::SessionHistory, Some(1155), 1460),
    (PacketKind::TyreSets, None, 231),
    (PacketKind::MotionEx, None, 237),
    (PacketKind::TimeTrial, None, 101),
];

// ── Packet sizes ──────────────────────────────────────────────────────────────

#[test]
fn packet_sizes_match_wire_catalog() {
    for (kind, size_2022, size_2024) in SIZES {
        assert_eq!(packet_size(Generation::F2022, kind), size_2022, "2022 {kind}");
        assert_eq!(packet_size(Generation::F2024, kind), Some(size_2024), "2024 {kind}");
    }
}

#[test]
fn header_schemas_match_header_decoder() -> TestResult {
    let registry = codec()?.registry();
    assert_eq!(
        registry.resolve(Generation::F2022, "PacketHeader")?.wire_size(),
        HEADER_SIZE_2022
    );
    assert_eq!(
        registry.resolve(Generation::F2024, "PacketHeader")?.wire_size(),
        HEADER_SIZE_2024
    );
    Ok(())
}

#[test]
fn per_car_record_sizes() -> TestResult {
    let registry = codec()?.registry();
    let expect = [
        ("CarMotionData", 60, 60),
        ("LapData", 43, 57),
        ("CarTelemetryData", 60, 60),
        ("CarStatusData", 47, 55),
        ("ParticipantData", 56, 60),
        ("LapHistoryData", 11, 14),
    ];
    for (name, size_2022, size_2024) in expect {
        assert_eq!(registry.resolve(Generation::F2022, name)?.wire_size(), size_2022, "{name}");
        assert_eq!(registry.resolve(Generation::F2024, name)?.wire_size(), size_2024, "{name}");
    }
    Ok(())
}

// ── Routes ────────────────────────────────────────────────────────────────────

#[test]
fn every_route_uses_version_one_and_its_generation_format() -> TestResult {
    let codec = codec()?;
    for route in codec.dispatch().routes() {
        assert_eq!(route.key.packet_version, 1);
        assert_eq!(route.key.packet_format, route.generation.packet_format());
        assert_eq!(route.key.packet_id, route.kind.id());
    }
    let newer_only = codec
        .dispatch()
        .routes()
        .filter(|r| r.kind.id() > 11)
        .all(|r| r.generation == Generation::F2024);
    assert!(newer_only);
    Ok(())
}

#[test]
fn resolve_by_triple() -> TestResult {
    let codec = codec()?;
    let route = codec.dispatch().resolve(2024, 1, 13)?;
    assert_eq!(route.kind, PacketKind::MotionEx);
    assert_eq!(route.schema, "PacketMotionExData");
    assert!(codec.dispatch().resolve(2022, 1, 13).is_err());
    assert!(codec.dispatch().resolve(2023, 1, 0).is_err());
    Ok(())
}

// ── Event codes ───────────────────────────────────────────────────────────────

fn event_codes(generation: Generation) -> Result<Vec<String>, Box<dyn std::error::Error>> {
    let schema = codec()?
        .registry()
        .resolve(generation, "PacketEventData")?
        .schema();
    let union = schema
        .fields
        .iter()
        .find_map(|f| match f.ty {
            FieldType::EventUnion(u) => Some(u),
            _ => None,
        })
        .ok_or("event packet has no union")?;
    Ok(union
        .codes
        .iter()
        .map(|c| String::from_utf8_lossy(&c.code).into_owned())
        .collect())
}

#[test]
fn newer_event_codes_extend_older_ones() -> TestResult {
    let older = event_codes(Generation::F2022)?;
    let newer = event_codes(Generation::F2024)?;
    assert_eq!(older.len(), 17);
    assert!(older.iter().all(|c| newer.contains(c)));
    let added: Vec<&str> = newer
        .iter()
        .filter(|c| !older.contains(c))
        .map(String::as_str)
        .collect();
    assert_eq!(added, ["RDFL", "OVTK", "SCAR", "COLL"]);
    Ok(())
}
