//! Datagram builders and socket helpers for the listener tests.

#![allow(dead_code)]

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use openracing_f1_codec::header::NO_CAR;
use openracing_f1_codec::{Generation, PacketHeader, PacketKind};
use openracing_f1_listener::ListenerConfig;
use tokio::net::UdpSocket;

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

/// Wire size of a 2024 event packet.
pub const EVENT_2024_SIZE: usize = 45;

pub fn loopback_config() -> ListenerConfig {
    ListenerConfig::default()
        .with_bind_addr(IpAddr::V4(Ipv4Addr::LOCALHOST))
        .with_port(0)
        .with_recv_timeout(Duration::from_millis(20))
}

pub fn header_2024(kind: PacketKind, frame: u32) -> PacketHeader {
    PacketHeader {
        packet_format: Generation::F2024.packet_format(),
        game_year: Some(24),
        game_major_version: 1,
        game_minor_version: 5,
        packet_version: 1,
        packet_id: kind.id(),
        session_uid: 0xF1F1_0000_0000_0001,
        session_time: 12.5,
        frame_identifier: frame,
        overall_frame_identifier: Some(frame),
        player_car_index: 0,
        secondary_player_car_index: NO_CAR,
    }
}

/// A 2024 event packet with a payload-less event code.
pub fn event_packet(code: &[u8; 4], frame: u32) -> Vec<u8> {
    let mut raw = header_2024(PacketKind::Event, frame).to_bytes();
    raw.extend_from_slice(code);
    raw.resize(EVENT_2024_SIZE, 0);
    raw
}

/// A datagram from a generation nobody supports.
pub fn foreign_packet() -> Vec<u8> {
    let mut raw = 2019u16.to_le_bytes().to_vec();
    raw.resize(40, 0);
    raw
}

pub async fn sender() -> std::io::Result<UdpSocket> {
    UdpSocket::bind(SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 0)).await
}
