//! Command implementations for f1tel

pub mod decode;
pub mod formats;
pub mod listen;
pub mod record;
pub mod replay;

use std::future::pending;
use std::net::IpAddr;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use openracing_f1_listener::ListenerConfig;
use openracing_f1_listener::recorder::DEFAULT_PER_KIND_LIMIT;
use tokio::sync::oneshot;
use tracing::{info, warn};

#[derive(Args, Debug, Clone, Default)]
pub struct SocketArgs {
    /// UDP port to listen on
    #[arg(short, long, env = "OPENRACING_F1_UDP_PORT")]
    pub port: Option<u16>,

    /// Local address to bind
    #[arg(long, env = "OPENRACING_F1_BIND_ADDR")]
    pub bind: Option<IpAddr>,

    /// Listener config file (.json, .yaml or .yml)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl SocketArgs {
    /// Config file (or environment defaults) with the flags applied on top.
    pub fn listener_config(&self) -> Result<ListenerConfig> {
        let mut config = match &self.config {
            Some(path) => ListenerConfig::load(path)
                .with_context(|| format!("failed to load listener config '{}'", path.display()))?,
            None => ListenerConfig::from_env(),
        };
        if let Some(port) = self.port {
            config = config.with_port(port);
        }
        if let Some(addr) = self.bind {
            config = config.with_bind_addr(addr);
        }
        Ok(config)
    }
}

#[derive(Args, Debug, Clone)]
pub struct ListenArgs {
    #[command(flatten)]
    pub socket: SocketArgs,

    /// Stop after this many decoded packets
    #[arg(short = 'n', long, value_parser = clap::value_parser!(u64).range(1..))]
    pub count: Option<u64>,
}

#[derive(Args, Debug, Clone)]
pub struct RecordArgs {
    #[command(flatten)]
    pub socket: SocketArgs,

    /// Capture file to write
    #[arg(short, long)]
    pub out: PathBuf,

    /// Packets kept per packet kind
    #[arg(long, default_value_t = DEFAULT_PER_KIND_LIMIT)]
    pub per_kind_limit: usize,

    /// Stop recording after this many seconds
    #[arg(short, long)]
    pub duration: Option<u64>,
}

#[derive(Args, Debug, Clone)]
pub struct ReplayArgs {
    /// Capture file written by `f1tel record`
    pub file: PathBuf,
}

#[derive(Args, Debug, Clone)]
pub struct DecodeArgs {
    /// File holding exactly one raw datagram
    pub file: PathBuf,
}

/// Completes on Ctrl-C, when `done` fires, or after `limit`.
pub async fn shutdown_signal(done: Option<oneshot::Receiver<()>>, limit: Option<Duration>) {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "failed to install Ctrl-C handler");
            pending::<()>().await;
        }
    };
    let done = async {
        match done {
            Some(rx) => rx.await.unwrap_or_default(),
            None => pending().await,
        }
    };
    let limit = async {
        match limit {
            Some(limit) => tokio::time::sleep(limit).await,
            None => pending().await,
        }
    };
    tokio::select! {
        () = ctrl_c => info!("interrupted"),
        () = done => {}
        () = limit => info!("time limit reached"),
    }
}
