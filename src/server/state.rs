//! Server state and configuration.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::config::Config;
use crate::resolver::SlotResolver;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on (e.g., "0.0.0.0:8080")
    pub listen_addr: String,
}

/// Application state shared across handlers.
pub struct AppState {
    pub resolver: SlotResolver,
    pub config: Config,
    /// Unix timestamp of server boot.
    pub boot_time: u64,
}

impl AppState {
    pub fn new(config: Config, resolver: SlotResolver) -> Self {
        let boot_time = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();
        Self {
            resolver,
            config,
            boot_time,
        }
    }
}
