use std::str::FromStr;

use anyhow::{Context, Result, bail};

use super::{
    config_model::{Database, DotEnvyConfig, PriceFeed, PriceSocket, QrExpiry, WorkerServer},
    stage::Stage,
};

pub fn load() -> Result<DotEnvyConfig> {
    dotenvy::dotenv().ok();

    let worker_server = WorkerServer {
        port: required("SERVER_PORT_WORKER")?,
        body_limit: required("SERVER_BODY_LIMIT")?,
        timeout: required("SERVER_TIMEOUT")?,
    };

    let database = Database {
        url: required_string("DATABASE_URL")?,
        max_connections: optional("DATABASE_MAX_CONNECTIONS", 5)?,
    };

    let price_feed = PriceFeed {
        primary_url: required_string("PRICE_FEED_PRIMARY_URL")?,
        fallback_url: optional_string("PRICE_FEED_FALLBACK_URL"),
        timeout_secs: optional("PRICE_FEED_TIMEOUT_SECS", 5)?,
        poll_interval_secs: optional("PRICE_POLL_INTERVAL_SECS", 10)?,
        day_utc_offset_hours: optional("PRICE_DAY_UTC_OFFSET_HOURS", 3)?,
    };
    if !(-23..=23).contains(&price_feed.day_utc_offset_hours) {
        bail!("PRICE_DAY_UTC_OFFSET_HOURS is invalid");
    }

    let qr_expiry = QrExpiry {
        sweep_secs: optional("QR_EXPIRY_SWEEP_SECS", 60)?,
    };

    let price_socket = PriceSocket {
        ping_secs: optional("PRICE_SOCKET_PING_SECS", 30)?,
    };

    Ok(DotEnvyConfig {
        worker_server,
        database,
        price_feed,
        qr_expiry,
        price_socket,
    })
}

pub fn get_stage() -> Stage {
    dotenvy::dotenv().ok();

    let stage_str = std::env::var("STAGE").unwrap_or_default();
    Stage::try_from(&stage_str).unwrap_or_default()
}

fn optional_string(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn required_string(key: &str) -> Result<String> {
    optional_string(key).with_context(|| format!("{key} is invalid"))
}

fn required<T>(key: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    required_string(key)?
        .parse::<T>()
        .with_context(|| format!("{key} is invalid"))
}

fn optional<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_string(key) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("{key} is invalid")),
        None => Ok(default),
    }
}
