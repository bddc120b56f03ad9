//! Event packets: code-selected union payloads.

mod helpers;

use helpers::{TestResult, approx_eq, codec, event_packet};
use openracing_f1_codec::{CodecError, CodecErrorKind, Generation, Value, resolve};

#[test]
fn fastest_lap_decodes_only_its_variant() -> TestResult {
    let mut payload = vec![7u8];
    payload.extend_from_slice(&83.456f32.to_le_bytes());
    let raw = event_packet(Generation::F2024, b"FTLP", &payload).ok_or("no event route")?;

    let packet = resolve(&raw)?;
    let details = packet
        .record
        .get("event_details")
        .and_then(Value::as_union)
        .ok_or("no union")?;
    assert_eq!(&details.code(), b"FTLP");
    assert_eq!(details.variant_name(), Some("fastest_lap"));
    let lap = details.payload().ok_or("no payload")?;
    assert_eq!(lap.schema(), "FastestLap");
    assert_eq!(lap.u8("vehicle_idx"), Some(7));
    let lap_time = lap.f32("lap_time").ok_or("no lap_time")?;
    assert!(approx_eq(f64::from(lap_time), 83.456));
    assert_eq!(
        packet.record.path("event_details.fastest_lap.vehicle_idx").and_then(Value::as_u8),
        Some(7)
    );
    assert!(packet.record.path("event_details.penalty").is_none());
    Ok(())
}

#[test]
fn structured_event_shows_one_variant() -> TestResult {
    let raw = event_packet(Generation::F2022, b"RTMT", &[4]).ok_or("no event route")?;
    let packet = resolve(&raw)?;
    let json = packet.to_structured();
    insta::assert_snapshot!(json["event_string_code"], @r#""RTMT""#);
    insta::assert_snapshot!(json["event_details"], @r#"{"retirement":{"vehicle_idx":4}}"#);
    Ok(())
}

#[test]
fn payload_less_events_decode_empty() -> TestResult {
    for code in [b"SSTA", b"SEND", b"DRSE", b"DRSD", b"CHQF", b"LGOT"] {
        for generation in Generation::ALL {
            let raw = event_packet(generation, code, &[0xAB; 8]).ok_or("no event route")?;
            let packet = resolve(&raw)?;
            let details = packet
                .record
                .get("event_details")
                .and_then(Value::as_union)
                .ok_or("no union")?;
            assert_eq!(details.variant_name(), None);
            assert!(details.payload().is_none());
            assert_eq!(packet.to_structured()["event_details"], serde_json::json!({}));
            // the untouched union bytes still come back out
            assert_eq!(packet.to_bytes(codec()?)?, raw);
        }
    }
    Ok(())
}

#[test]
fn red_flag_is_known_only_in_newer_generation() -> TestResult {
    let newer = event_packet(Generation::F2024, b"RDFL", &[]).ok_or("no event route")?;
    assert!(resolve(&newer).is_ok());
    let older = event_packet(Generation::F2022, b"RDFL", &[]).ok_or("no event route")?;
    assert!(matches!(resolve(&older), Err(CodecError::UnknownEventCode { .. })));
    Ok(())
}

#[test]
fn newer_only_variants() -> TestResult {
    let raw = event_packet(Generation::F2024, b"OVTK", &[3, 11]).ok_or("no event route")?;
    let packet = resolve(&raw)?;
    assert_eq!(
        packet
            .record
            .path("event_details.overtake.being_overtaken_vehicle_idx")
            .and_then(Value::as_u8),
        Some(11)
    );

    let raw = event_packet(Generation::F2024, b"COLL", &[1, 2]).ok_or("no event route")?;
    let packet = resolve(&raw)?;
    assert_eq!(
        packet.record.path("event_details.collision.vehicle2_idx").and_then(Value::as_u8),
        Some(2)
    );

    let raw = event_packet(Generation::F2022, b"SCAR", &[1, 0]).ok_or("no event route")?;
    assert!(matches!(resolve(&raw), Err(CodecError::UnknownEventCode { .. })));
    Ok(())
}

#[test]
fn stop_go_payload_differs_by_generation() -> TestResult {
    let mut payload = vec![9u8];
    payload.extend_from_slice(&10.5f32.to_le_bytes());

    let newer = resolve(&event_packet(Generation::F2024, b"SGSV", &payload).ok_or("no route")?)?;
    let served = newer
        .record
        .path("event_details.stop_go_penalty_served")
        .and_then(Value::as_record)
        .ok_or("no payload")?;
    assert_eq!(served.len(), 2);
    assert!(approx_eq(f64::from(served.f32("stop_time").ok_or("no stop_time")?), 10.5));

    let older = resolve(&event_packet(Generation::F2022, b"SGSV", &payload).ok_or("no route")?)?;
    let served = older
        .record
        .path("event_details.stop_go_penalty_served")
        .and_then(Value::as_record)
        .ok_or("no payload")?;
    assert_eq!(served.len(), 1);
    assert_eq!(served.u8("vehicle_idx"), Some(9));
    Ok(())
}

#[test]
fn unknown_code_is_reported_with_partial_record() -> TestResult {
    let raw = event_packet(Generation::F2024, b"ZZZZ", &[1, 2, 3]).ok_or("no event route")?;
    let err = match resolve(&raw) {
        Err(err) => err,
        Ok(packet) => return Err(format!("decoded {packet:?}").into()),
    };
    assert_eq!(err.kind(), CodecErrorKind::UnknownEvent);
    assert!(err.is_recoverable());
    insta::assert_snapshot!(err.to_string(), @"unknown event code 'ZZZZ'");

    let partial = err.partial_record().ok_or("no partial record")?;
    assert_eq!(partial.text("event_string_code").as_deref(), Some("ZZZZ"));
    assert_eq!(partial.path("header.packet_id").and_then(Value::as_u8), Some(3));
    assert!(partial.get("event_details").is_none());
    Ok(())
}

#[test]
fn event_round_trips_with_trailing_union_bytes() -> TestResult {
    // bytes past the penalty payload stay exactly as received
    let raw = event_packet(
        Generation::F2024,
        b"PENA",
        &[1, 2, 3, 4, 5, 6, 7, 0xDE, 0xAD, 0xBE, 0xEF],
    )
    .ok_or("no event route")?;
    let packet = resolve(&raw)?;
    assert_eq!(
        packet.record.path("event_details.penalty.places_gained").and_then(Value::as_u8),
        Some(7)
    );
    assert_eq!(packet.to_bytes(codec()?)?, raw);
    Ok(())
}
