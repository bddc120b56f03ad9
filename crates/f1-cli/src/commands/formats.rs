//! `f1tel formats`: the dispatch table.

use std::fmt::Write as _;

use anyhow::Result;
use openracing_f1_codec::{Codec, PacketKind};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormatRow {
    pub packet_format: u16,
    pub packet_version: u8,
    pub packet_id: u8,
    pub kind: PacketKind,
    pub schema: &'static str,
    pub wire_size: usize,
}

/// One row per registered route, in dispatch key order.
pub fn rows(codec: &Codec) -> Vec<FormatRow> {
    codec
        .dispatch()
        .routes()
        .map(|route| FormatRow {
            packet_format: route.key.packet_format,
            packet_version: route.key.packet_version,
            packet_id: route.key.packet_id,
            kind: route.kind,
            schema: route.schema,
            wire_size: codec
                .registry()
                .get(route.generation, route.schema)
                .map_or(0, |schema| schema.wire_size()),
        })
        .collect()
}

pub fn render_table(rows: &[FormatRow]) -> String {
    let mut out = format!(
        "{:<6} {:>3} {:>3}  {:<20} {:<30} {:>6}\n",
        "format", "ver", "id", "kind", "schema", "bytes"
    );
    for row in rows {
        // Writing to a String cannot fail.
        writeln!(
            out,
            "{:<6} {:>3} {:>3}  {:<20} {:<30} {:>6}",
            row.packet_format,
            row.packet_version,
            row.packet_id,
            row.kind,
            row.schema,
            row.wire_size
        )
        .unwrap_or_default();
    }
    out
}

pub fn execute(json: bool) -> Result<()> {
    let rows = rows(Codec::standard()?);
    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        print!("{}", render_table(&rows));
    }
    Ok(())
}
