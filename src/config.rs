//! Server and session configuration
//!
//! ## Priority Order (highest to lowest)
//!
//! 1. Command-line flags
//! 2. Environment variables (`TERMFOLIO_*`, `.env` is honoured)
//! 3. Defaults

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use tokio::net::lookup_host;

use crate::error::{FolioError, Result};

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 2222;
pub const DEFAULT_DATA_PATH: &str = "data/portfolio.json";
pub const DEFAULT_TICK_MS: u64 = 50;
pub const DEFAULT_MAX_SESSIONS: usize = 64;

/// Terminal size assumed until the transport reports one
pub const DEFAULT_TERMINAL_SIZE: (u16, u16) = (80, 24);

/// Largest terminal a session will size itself to; larger reports are clamped
pub const MAX_TERMINAL_SIZE: (u16, u16) = (500, 200);

const TICK_RANGE_MS: std::ops::RangeInclusive<u64> = 10..=1000;

/// Per-session knobs handed to every new session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// Interval between two animation ticks
    pub tick_interval: Duration,
    /// Whether particle effects start enabled
    pub effects_enabled: bool,
    /// Size used before the viewer's terminal size is known
    pub default_size: (u16, u16),
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(DEFAULT_TICK_MS),
            effects_enabled: true,
            default_size: DEFAULT_TERMINAL_SIZE,
        }
    }
}

/// Settings for the TCP portfolio server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub data_path: PathBuf,
    pub max_sessions: usize,
    pub session: SessionConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            max_sessions: DEFAULT_MAX_SESSIONS,
            session: SessionConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Build and validate a config from raw CLI values
    pub fn new(
        host: impl Into<String>,
        port: u16,
        data_path: impl Into<PathBuf>,
        tick_ms: u64,
        max_sessions: usize,
    ) -> Result<Self> {
        let config = Self {
            host: host.into(),
            port,
            data_path: data_path.into(),
            max_sessions,
            session: SessionConfig {
                tick_interval: Duration::from_millis(tick_ms),
                ..SessionConfig::default()
            },
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(config_error("host must not be empty"));
        }
        if self.port == 0 {
            return Err(config_error("port must not be 0"));
        }
        let tick_ms = self.session.tick_interval.as_millis() as u64;
        if !TICK_RANGE_MS.contains(&tick_ms) {
            return Err(config_error(format!(
                "tick interval must be within {}..={} ms, got {}",
                TICK_RANGE_MS.start(),
                TICK_RANGE_MS.end(),
                tick_ms
            )));
        }
        if self.max_sessions == 0 {
            return Err(config_error("max sessions must be at least 1"));
        }
        Ok(())
    }

    /// `host:port` as typed by the user
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Resolve the bind address to the first socket address
    pub async fn resolve(&self) -> Result<SocketAddr> {
        let address = self.bind_address();
        let resolved = lookup_host(&address)
            .await?
            .next()
            .ok_or_else(|| config_error(format!("could not resolve {address}")));
        resolved
    }

    /// The command a viewer runs to connect
    pub fn connect_command(&self) -> String {
        format!("telnet {} {}", self.host, self.port)
    }
}

fn config_error(reason: impl Into<String>) -> FolioError {
    FolioError::Config {
        reason: reason.into(),
    }
}

/// Clamp a reported terminal size to `MAX_TERMINAL_SIZE`
pub fn clamp_terminal_size(width: u16, height: u16) -> (u16, u16) {
    (width.min(MAX_TERMINAL_SIZE.0), height.min(MAX_TERMINAL_SIZE.1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = ServerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.session.tick_interval, Duration::from_millis(50));
        assert_eq!(config.bind_address(), "localhost:2222");
    }

    #[test]
    fn test_rejects_zero_port() {
        let err = ServerConfig::new("localhost", 0, "p.json", 50, 4).unwrap_err();
        assert!(err.to_string().contains("port"));
    }

    #[test]
    fn test_rejects_tick_out_of_range() {
        assert!(ServerConfig::new("localhost", 2222, "p.json", 5, 4).is_err());
        assert!(ServerConfig::new("localhost", 2222, "p.json", 5000, 4).is_err());
        assert!(ServerConfig::new("localhost", 2222, "p.json", 10, 4).is_ok());
    }

    #[test]
    fn test_rejects_zero_sessions() {
        assert!(ServerConfig::new("localhost", 2222, "p.json", 50, 0).is_err());
    }

    #[test]
    fn test_connect_command() {
        let config = ServerConfig::new("0.0.0.0", 3333, "p.json", 50, 1).unwrap();
        assert_eq!(config.connect_command(), "telnet 0.0.0.0 3333");
    }

    #[test]
    fn test_terminal_size_is_clamped() {
        assert_eq!(clamp_terminal_size(65535, 65535), MAX_TERMINAL_SIZE);
        assert_eq!(clamp_terminal_size(120, 40), (120, 40));
        assert_eq!(clamp_terminal_size(900, 30), (500, 30));
    }

    #[tokio::test]
    async fn test_resolve_loopback() {
        let config = ServerConfig::new("127.0.0.1", 2222, "p.json", 50, 1).unwrap();
        let addr = config.resolve().await.unwrap();
        assert_eq!(addr.port(), 2222);
    }
}
