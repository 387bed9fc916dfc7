use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

/// Command line configuration.
///
/// Every option except the port can also come from the environment.
#[derive(Debug, Clone, Parser)]
#[command(name = "lantern")]
#[command(about = "Minimal HTTP/1.x static file server (GET only)")]
#[command(version)]
pub struct Config {
    /// Port to listen on
    pub port: u16,

    /// Address to bind
    #[arg(long, default_value = "0.0.0.0", env = "LANTERN_HOST")]
    pub host: String,

    /// Directory request paths are resolved against
    #[arg(long, default_value = ".", env = "LANTERN_ROOT")]
    pub root: PathBuf,

    /// Maximum number of connections handled at once
    #[arg(
        long = "max-connections",
        default_value_t = 256,
        value_parser = clap::value_parser!(u32).range(1..),
        env = "LANTERN_MAX_CONNECTIONS"
    )]
    pub max_connections: u32,

    /// Seconds to wait for a request before dropping the connection
    #[arg(long = "read-timeout-secs", env = "LANTERN_READ_TIMEOUT_SECS")]
    pub read_timeout_secs: Option<u64>,

    /// Log level, overridden by RUST_LOG when set
    #[arg(long = "log-level", default_value = "info", env = "LANTERN_LOG")]
    pub log_level: String,
}

impl Config {
    /// Parses the process arguments, exiting with usage on error.
    pub fn load() -> Self {
        Self::parse()
    }

    /// `host:port` to bind. IPv6 hosts are bracketed.
    pub fn listen_addr(&self) -> String {
        if self.host.contains(':') && !self.host.starts_with('[') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }

    pub fn read_timeout(&self) -> Option<Duration> {
        self.read_timeout_secs.map(Duration::from_secs)
    }
}
