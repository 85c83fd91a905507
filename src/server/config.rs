//! Command-line and environment configuration.

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use clap::Parser;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid bind address '{0}'")]
    InvalidBindAddress(String),

    #[error("heartbeat interval must be at least one second")]
    HeartbeatTooShort,
}

#[derive(Parser, Debug, Clone)]
#[command(name = "chess-rooms-server")]
#[command(about = "Authoritative chess rooms over WebSocket")]
pub struct ServerConfig {
    /// Interface to listen on.
    #[arg(long, env = "CHESS_BIND", default_value = "0.0.0.0")]
    pub bind: String,

    #[arg(long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    /// Seconds between heartbeat sweeps.
    #[arg(long, env = "CHESS_HEARTBEAT_SECS", default_value_t = 15)]
    pub heartbeat_secs: u64,

    /// tracing-subscriber filter directive, e.g. `info` or `chess_rooms=debug`.
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    pub log_filter: String,
}

impl ServerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.socket_addr()?;
        self.heartbeat_interval()?;
        Ok(())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip: IpAddr = self
            .bind
            .parse()
            .map_err(|_| ConfigError::InvalidBindAddress(self.bind.clone()))?;
        Ok(SocketAddr::new(ip, self.port))
    }

    pub fn heartbeat_interval(&self) -> Result<Duration, ConfigError> {
        if self.heartbeat_secs == 0 {
            return Err(ConfigError::HeartbeatTooShort);
        }
        Ok(Duration::from_secs(self.heartbeat_secs))
    }
}
