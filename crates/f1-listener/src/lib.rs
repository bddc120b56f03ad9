//! Live UDP intake, handler routing and capture/replay for F1 telemetry.
//!
//! A [`PacketListener`] binds one UDP socket, decodes every datagram with
//! an injected [`PacketDecoder`] and never stops on a bad packet. Decoded
//! packets reach a [`PacketHandler`] through [`run`], from the socket or
//! from a capture file written by a [`RecordingDecoder`].
//!
//! ```no_run
//! use openracing_f1_codec::Codec;
//! use openracing_f1_listener::{ListenerConfig, PacketListener, StatsHandler, run};
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let mut listener = PacketListener::bind(ListenerConfig::from_env(), Codec::standard()?).await?;
//! let mut stats = StatsHandler::new();
//! let shutdown = async { tokio::signal::ctrl_c().await.unwrap_or_default() };
//! run(&mut listener, &mut stats, shutdown).await?;
//! println!("{stats}");
//! # Ok(())
//! # }
//! ```

#![deny(clippy::unwrap_used)]

pub mod config;
pub mod decoder;
pub mod error;
pub mod handler;
pub mod listener;
pub mod recorder;
pub mod source;
pub mod stats;

pub use config::ListenerConfig;
pub use decoder::PacketDecoder;
pub use error::{ListenerError, ListenerResult};
pub use handler::{PacketHandler, dispatch, run};
pub use listener::PacketListener;
pub use recorder::{
    CAPTURE_MAGIC, CaptureReader, CaptureSource, CaptureWriter, CapturedPacket, RecordingDecoder,
    replay, replay_into,
};
pub use source::PacketSource;
pub use stats::StatsHandler;
