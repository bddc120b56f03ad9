//! Output formatting for CLI responses

use anyhow::Error;
use colored::*;
use openracing_f1_codec::{DecodedPacket, PacketKind};
use serde_json::{Value as Json, json};

pub fn print_error_json(error: &Error) {
    let error_json = json!({
        "success": false,
        "error": {
            "message": format!("{error:#}"),
        }
    });
    match serde_json::to_string_pretty(&error_json) {
        Ok(s) => println!("{s}"),
        Err(e) => eprintln!("Failed to format error as JSON: {e}"),
    }
}

/// Print error in human-readable format, with its source chain.
pub fn print_error_human(error: &Error) {
    eprintln!("{} {}", "Error:".red().bold(), error);

    let mut source = error.source();
    while let Some(err) = source {
        eprintln!("  {} {}", "Caused by:".yellow(), err);
        source = err.source();
    }
}

/// One packet as a JSON object: routing fields plus the structured record.
pub fn packet_json(packet: &DecodedPacket) -> Json {
    json!({
        "kind": packet.kind,
        "packet_format": packet.header.packet_format,
        "frame": packet.header.frame_identifier,
        "session_time": packet.header.session_time,
        "packet": packet.to_structured(),
    })
}

/// One packet as a single human-readable line.
pub fn packet_line(packet: &DecodedPacket) -> String {
    let mut line = format!(
        "{:<20} {} frame {:>8}  t={:>9.3}s",
        packet.kind,
        packet.header.packet_format,
        packet.header.frame_identifier,
        packet.header.session_time,
    );
    if packet.kind == PacketKind::Event
        && let Some(code) = packet.record.text("event_string_code")
    {
        line.push_str("  ");
        line.push_str(&code);
    }
    line
}

pub fn print_packet(packet: &DecodedPacket, json: bool) {
    if json {
        println!("{}", packet_json(packet));
    } else {
        println!("{}", packet_line(packet));
    }
}
