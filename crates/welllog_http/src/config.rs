//! HTTP server configuration.

use std::net::SocketAddr;
use std::path::PathBuf;

/// Address used when none is configured.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8000";

/// Runtime settings for [`crate::run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Socket the server listens on.
    pub bind_addr: SocketAddr,
    /// SQLite database file; created and migrated on startup.
    pub db_path: PathBuf,
}

impl ServerConfig {
    pub fn new(bind_addr: SocketAddr, db_path: impl Into<PathBuf>) -> Self {
        Self {
            bind_addr,
            db_path: db_path.into(),
        }
    }
}
