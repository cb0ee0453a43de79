use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::domain::{
    repositories::price_feeds::PriceFeedClient,
    value_objects::price_sources::{SourceQuote, parse_quote_value},
};

const BUY_KEYS: [&str; 3] = ["buy", "alis", "bid"];
const SELL_KEYS: [&str; 3] = ["sell", "satis", "ask"];

/// JSON price table served over HTTP.
pub struct HttpPriceFeed {
    http: reqwest::Client,
    url: String,
}

impl HttpPriceFeed {
    pub fn new(url: String, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build price feed http client")?;
        Ok(Self { http, url })
    }
}

#[async_trait]
impl PriceFeedClient for HttpPriceFeed {
    async fn fetch(&self) -> Result<Vec<SourceQuote>> {
        let resp = self
            .http
            .get(&self.url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .with_context(|| format!("price feed request to {} failed", self.url))?;

        let status = resp.status();
        if !status.is_success() {
            warn!(%status, url = %self.url, "price_feed: upstream returned an error status");
            anyhow::bail!("price feed {} responded with {}", self.url, status);
        }

        let payload: Value = resp
            .json()
            .await
            .with_context(|| format!("price feed {} returned invalid JSON", self.url))?;

        Ok(parse_feed_payload(&payload))
    }
}

/// Accepts an array of entries, an object keyed by code, or either wrapped in `data`.
pub fn parse_feed_payload(payload: &Value) -> Vec<SourceQuote> {
    match payload {
        Value::Array(entries) => entries
            .iter()
            .filter_map(|entry| entry.as_object().and_then(|fields| parse_entry(None, fields)))
            .collect(),
        Value::Object(map) => {
            if let Some(inner) = map.get("data").filter(|inner| inner.is_array() || inner.is_object()) {
                return parse_feed_payload(inner);
            }
            map.iter()
                .filter_map(|(key, entry)| {
                    entry
                        .as_object()
                        .and_then(|fields| parse_entry(Some(key.as_str()), fields))
                })
                .collect()
        }
        _ => Vec::new(),
    }
}

fn parse_entry(key: Option<&str>, fields: &Map<String, Value>) -> Option<SourceQuote> {
    let code = fields
        .get("code")
        .and_then(Value::as_str)
        .or(key)
        .map(str::trim)
        .filter(|code| !code.is_empty())?
        .to_string();

    let buy = first_value(fields, &BUY_KEYS);
    let sell = first_value(fields, &SELL_KEYS);
    let (Some(buy), Some(sell)) = (buy, sell) else {
        debug!(%code, "price_feed: dropping entry without usable buy/sell");
        return None;
    };

    let name = fields
        .get("name")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or(code.as_str())
        .to_string();

    Some(SourceQuote {
        code,
        name,
        buy,
        sell,
    })
}

fn first_value(fields: &Map<String, Value>, keys: &[&str]) -> Option<f64> {
    keys.iter()
        .find_map(|key| fields.get(*key))
        .and_then(parse_quote_value)
}
