//! Listener configuration.
//!
//! Defaults can be overridden from the environment (`OPENRACING_F1_*`) or
//! loaded from a JSON or YAML file.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ListenerError, ListenerResult};

pub const DEFAULT_PORT: u16 = 20777;
pub const DEFAULT_RECV_TIMEOUT_MS: u64 = 500;
/// Larger than any packet of a supported generation.
pub const DEFAULT_MAX_PACKET_BYTES: usize = 2048;

pub const ENV_PORT: &str = "OPENRACING_F1_UDP_PORT";
pub const ENV_BIND_ADDR: &str = "OPENRACING_F1_BIND_ADDR";
pub const ENV_RECV_TIMEOUT_MS: &str = "OPENRACING_F1_RECV_TIMEOUT_MS";
pub const ENV_MAX_PACKET_BYTES: &str = "OPENRACING_F1_MAX_PACKET_BYTES";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListenerConfig {
    pub bind_addr: IpAddr,
    pub port: u16,
    /// How long one `recv` may wait before the loop logs a timeout and retries.
    pub recv_timeout_ms: u64,
    pub max_packet_bytes: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_addr: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            recv_timeout_ms: DEFAULT_RECV_TIMEOUT_MS,
            max_packet_bytes: DEFAULT_MAX_PACKET_BYTES,
        }
    }
}

impl ListenerConfig {
    /// Defaults overridden by `OPENRACING_F1_*` environment variables.
    ///
    /// Unparseable or zero values are ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Like [`from_env`](Self::from_env) with an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let max_packet_bytes = env_u64(&lookup, ENV_MAX_PACKET_BYTES, 0);
        Self {
            bind_addr: lookup(ENV_BIND_ADDR)
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.bind_addr),
            port: env_u16(&lookup, ENV_PORT, defaults.port),
            recv_timeout_ms: env_u64(&lookup, ENV_RECV_TIMEOUT_MS, defaults.recv_timeout_ms),
            max_packet_bytes: usize::try_from(max_packet_bytes)
                .ok()
                .filter(|v| *v > 0)
                .unwrap_or(defaults.max_packet_bytes),
        }
    }

    /// Parse a JSON document; missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// [`ListenerError::InvalidConfig`] for malformed JSON or invalid values.
    pub fn from_json_str(text: &str) -> ListenerResult<Self> {
        let config: Self = serde_json::from_str(text)
            .map_err(|err| ListenerError::InvalidConfig(err.to_string()))?;
        config.validate()
    }

    /// Parse a YAML document; missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// [`ListenerError::InvalidConfig`] for malformed YAML or invalid values.
    pub fn from_yaml_str(text: &str) -> ListenerResult<Self> {
        let config: Self = serde_yaml::from_str(text)
            .map_err(|err| ListenerError::InvalidConfig(err.to_string()))?;
        config.validate()
    }

    /// Load a `.json`, `.yaml` or `.yml` file.
    ///
    /// # Errors
    ///
    /// I/O errors, or [`ListenerError::InvalidConfig`] for an unknown
    /// extension or invalid content.
    pub fn load(path: &Path) -> ListenerResult<Self> {
        let text = std::fs::read_to_string(path)?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_str(&text),
            Some("yaml" | "yml") => Self::from_yaml_str(&text),
            _ => Err(ListenerError::InvalidConfig(format!(
                "unsupported config file extension: {}",
                path.display()
            ))),
        }
    }

    /// # Errors
    ///
    /// [`ListenerError::InvalidConfig`] if the timeout or buffer size is zero.
    pub fn validate(self) -> ListenerResult<Self> {
        if self.recv_timeout_ms == 0 {
            return Err(ListenerError::InvalidConfig(
                "recv_timeout_ms must be > 0".to_string(),
            ));
        }
        if self.max_packet_bytes == 0 {
            return Err(ListenerError::InvalidConfig(
                "max_packet_bytes must be > 0".to_string(),
            ));
        }
        Ok(self)
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_bind_addr(mut self, addr: IpAddr) -> Self {
        self.bind_addr = addr;
        self
    }

    pub fn with_recv_timeout(mut self, timeout: Duration) -> Self {
        self.recv_timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX).max(1);
        self
    }

    pub fn with_max_packet_bytes(mut self, bytes: usize) -> Self {
        self.max_packet_bytes = bytes.max(1);
        self
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.port)
    }

    pub fn recv_timeout(&self) -> Duration {
        Duration::from_millis(self.recv_timeout_ms)
    }
}

// ── Env helpers ───────────────────────────────────────────────────────────────

fn env_u16(lookup: &impl Fn(&str) -> Option<String>, name: &str, fallback: u16) -> u16 {
    lookup(name)
        .and_then(|v| v.trim().parse::<u16>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(fallback)
}

fn env_u64(lookup: &impl Fn(&str) -> Option<String>, name: &str, fallback: u64) -> u64 {
    lookup(name)
        .and_then(|v| v.trim().parse::<u64>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(fallback)
}
