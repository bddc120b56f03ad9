//! Packet dispatch: `(packet_format, packet_version, packet_id)` to schema.

use core::fmt;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{CodecError, CodecResult, RegistryError, RegistryResult};
use crate::generation::Generation;
use crate::registry::SchemaRegistry;

/// The dispatch triple read from a packet header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PacketKey {
    pub packet_format: u16,
    pub packet_version: u8,
    pub packet_id: u8,
}

impl PacketKey {
    pub const fn new(packet_format: u16, packet_version: u8, packet_id: u8) -> Self {
        Self {
            packet_format,
            packet_version,
            packet_id,
        }
    }
}

impl fmt::Display for PacketKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/v{}/#{}",
            self.packet_format, self.packet_version, self.packet_id
        )
    }
}

/// Packet kinds, numbered by their wire `packet_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PacketKind {
    Motion = 0,
    Session = 1,
    LapData = 2,
    Event = 3,
    Participants = 4,
    CarSetups = 5,
    CarTelemetry = 6,
    CarStatus = 7,
    FinalClassification = 8,
    LobbyInfo = 9,
    CarDamage = 10,
    SessionHistory = 11,
    TyreSets = 12,
    MotionEx = 13,
    TimeTrial = 14,
}

impl PacketKind {
    pub const ALL: [PacketKind; 15] = [
        PacketKind::Motion,
        PacketKind::Session,
        PacketKind::LapData,
        PacketKind::Event,
        PacketKind::Participants,
        PacketKind::CarSetups,
        PacketKind::CarTelemetry,
        PacketKind::CarStatus,
        PacketKind::FinalClassification,
        PacketKind::LobbyInfo,
        PacketKind::CarDamage,
        PacketKind::SessionHistory,
        PacketKind::TyreSets,
        PacketKind::MotionEx,
        PacketKind::TimeTrial,
    ];

    pub fn from_id(packet_id: u8) -> Option<Self> {
        Self::ALL.get(usize::from(packet_id)).copied()
    }

    pub const fn id(self) -> u8 {
        self as u8
    }

    /// Stable snake_case name, used for handler routing and capture keys.
    pub const fn name(self) -> &'static str {
        match self {
            PacketKind::Motion => "motion",
            PacketKind::Session => "session",
            PacketKind::LapData => "lap_data",
            PacketKind::Event => "event",
            PacketKind::Participants => "participants",
            PacketKind::CarSetups => "car_setups",
            PacketKind::CarTelemetry => "car_telemetry",
            PacketKind::CarStatus => "car_status",
            PacketKind::FinalClassification => "final_classification",
            PacketKind::LobbyInfo => "lobby_info",
            PacketKind::CarDamage => "car_damage",
            PacketKind::SessionHistory => "session_history",
            PacketKind::TyreSets => "tyre_sets",
            PacketKind::MotionEx => "motion_ex",
            PacketKind::TimeTrial => "time_trial",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

impl fmt::Display for PacketKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

/// One dispatch entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacketRoute {
    pub key: PacketKey,
    pub kind: PacketKind,
    pub generation: Generation,
    pub schema: &'static str,
}

/// Append-only map from [`PacketKey`] to [`PacketRoute`].
#[derive(Debug, Clone, Default)]
pub struct DispatchTable {
    routes: BTreeMap<PacketKey, PacketRoute>,
}

impl DispatchTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a route whose schema must already be registered.
    ///
    /// # Errors
    ///
    /// [`RegistryError::DuplicatePacketType`] if the key is already routed,
    /// [`RegistryError::UnknownSchema`] if the schema is missing.
    pub fn register(
        &mut self,
        route: PacketRoute,
        registry: &SchemaRegistry,
    ) -> RegistryResult<()> {
        if registry.get(route.generation, route.schema).is_none() {
            return Err(RegistryError::UnknownSchema {
                generation: route.generation,
                name: route.schema,
            });
        }
        if self.routes.contains_key(&route.key) {
            return Err(RegistryError::DuplicatePacketType {
                packet_format: route.key.packet_format,
                packet_version: route.key.packet_version,
                packet_id: route.key.packet_id,
            });
        }
        self.routes.insert(route.key, route);
        Ok(())
    }

    /// # Errors
    ///
    /// [`CodecError::UnknownPacketType`] for an unmapped triple.
    pub fn resolve(
        &self,
        packet_format: u16,
        packet_version: u8,
        packet_id: u8,
    ) -> CodecResult<&PacketRoute> {
        let key = PacketKey::new(packet_format, packet_version, packet_id);
        self.routes
            .get(&key)
            .ok_or(CodecError::UnknownPacketType {
                packet_format,
                packet_version: Some(packet_version),
                packet_id: Some(packet_id),
            })
    }

    /// Routes in key order.
    pub fn routes(&self) -> impl Iterator<Item = &PacketRoute> {
        self.routes.values()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
