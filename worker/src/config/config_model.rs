use std::time::Duration;

use chrono::FixedOffset;

#[derive(Debug, Clone)]
pub struct DotEnvyConfig {
    pub worker_server: WorkerServer,
    pub database: Database,
    pub price_feed: PriceFeed,
    pub qr_expiry: QrExpiry,
    pub price_socket: PriceSocket,
}

#[derive(Debug, Clone)]
pub struct WorkerServer {
    pub port: u16,
    pub body_limit: u64,
    pub timeout: u64,
}

#[derive(Debug, Clone)]
pub struct Database {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone)]
pub struct PriceFeed {
    pub primary_url: String,
    pub fallback_url: Option<String>,
    pub timeout_secs: u64,
    pub poll_interval_secs: u64,
    /// Offset of the zone whose midnight resets daily high/low.
    pub day_utc_offset_hours: i32,
}

impl PriceFeed {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }

    pub fn day_offset(&self) -> Option<FixedOffset> {
        FixedOffset::east_opt(self.day_utc_offset_hours * 3600)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct QrExpiry {
    pub sweep_secs: u64,
}

#[derive(Debug, Clone, Copy)]
pub struct PriceSocket {
    pub ping_secs: u64,
}
