use super::notifier::{AlertEvent, AlertSink};
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use url::Url;

const MAX_MESSAGE_CHARS: usize = 4000;

/// Posts each alert as a JSON document to a single URL.
pub(crate) struct JsonWebhookSink {
    url: Url,
    client: Client,
}

impl JsonWebhookSink {
    pub(crate) fn new(url: Url) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(3))
            .build()
            .context("failed to build alert webhook client")?;

        Ok(Self { url, client })
    }
}

#[async_trait]
impl AlertSink for JsonWebhookSink {
    async fn deliver(&self, event: AlertEvent) -> Result<()> {
        let response = self
            .client
            .post(self.url.clone())
            .json(&clip_message(event))
            .send()
            .await
            .map_err(describe_error)?;

        if response.status().is_success() {
            return Ok(());
        }

        Err(anyhow!(
            "alert webhook returned non-success status: {}",
            response.status()
        ))
    }

    fn sink_name(&self) -> &'static str {
        "json_webhook"
    }
}

// reqwest errors embed the URL, which may contain a token.
fn describe_error(error: reqwest::Error) -> anyhow::Error {
    if error.is_timeout() {
        anyhow!("alert webhook request timed out")
    } else if error.is_connect() {
        anyhow!("alert webhook connection failed")
    } else {
        anyhow!("alert webhook request failed")
    }
}

fn clip_message(mut event: AlertEvent) -> AlertEvent {
    if let Some(message) = event.message.as_mut() {
        if message.chars().count() > MAX_MESSAGE_CHARS {
            *message = message.chars().take(MAX_MESSAGE_CHARS).collect::<String>() + "…";
        }
    }
    event
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::collections::BTreeMap;

    fn event(message: &str) -> AlertEvent {
        AlertEvent {
            level: "ERROR".to_string(),
            timestamp: Utc::now(),
            service: "jewelry".to_string(),
            environment: "local".to_string(),
            component: "worker".to_string(),
            target: "worker::price_polling".to_string(),
            location: Some("worker/src/price_polling/worker.rs:20".to_string()),
            message: Some(message.to_string()),
            fields: BTreeMap::from([("error".to_string(), "feed down".to_string())]),
            spans: Vec::new(),
        }
    }

    #[test]
    fn long_messages_are_clipped() {
        let clipped = clip_message(event(&"x".repeat(MAX_MESSAGE_CHARS + 10)));
        assert_eq!(
            clipped.message.unwrap().chars().count(),
            MAX_MESSAGE_CHARS + 1
        );
    }

    #[test]
    fn payload_is_flat_json() {
        let payload = serde_json::to_value(clip_message(event("price_refresh: cycle failed"))).unwrap();
        assert_eq!(payload["component"], "worker");
        assert_eq!(payload["message"], "price_refresh: cycle failed");
        assert_eq!(payload["fields"]["error"], "feed down");
    }
}
