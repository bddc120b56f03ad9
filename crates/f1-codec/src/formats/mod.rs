//! Built-in packet formats.
//!
//! Each generation lists its schemas in dependency order (nested layouts
//! before the records that use them) and maps packet kinds to packet
//! schemas. Layouts identical across generations live in [`common`] and are
//! registered once per generation, so names resolve against that
//! generation's own nested schemas.

pub mod common;
pub mod f1_2022;
pub mod f1_2024;

use crate::dispatch::PacketKind;
use crate::generation::Generation;
use crate::schema::Schema;

/// All schemas and packet routes of one generation.
#[derive(Debug)]
pub struct FormatDefinition {
    pub generation: Generation,
    pub packet_version: u8,
    /// In registration order.
    pub schemas: &'static [&'static Schema],
    pub packets: &'static [(PacketKind, &'static str)],
}

impl FormatDefinition {
    pub fn packet_schema(&self, kind: PacketKind) -> Option<&'static str> {
        self.packets
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, schema)| *schema)
    }
}

/// Every built-in generation.
pub static ALL: [&FormatDefinition; 2] = [&f1_2022::FORMAT, &f1_2024::FORMAT];

pub fn for_generation(generation: Generation) -> Option<&'static FormatDefinition> {
    ALL.iter().copied().find(|f| f.generation == generation)
}
