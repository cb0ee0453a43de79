use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockall::automock;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::warn;

const QUEUE_CAPACITY: usize = 256;
const MAX_TRACKED_KEYS: usize = 1024;

/// Window in which an identical event is delivered at most once.
pub(crate) const REPEAT_COOLDOWN: Duration = Duration::from_secs(300);

#[derive(Clone, Debug, Serialize)]
pub(crate) struct SpanSummary {
    pub(crate) name: String,
    pub(crate) fields: BTreeMap<String, String>,
}

/// One log event forwarded to the alert sink. Sensitive fields are already redacted.
#[derive(Clone, Debug, Serialize)]
pub(crate) struct AlertEvent {
    pub(crate) level: String,
    pub(crate) timestamp: DateTime<Utc>,
    pub(crate) service: String,
    pub(crate) environment: String,
    pub(crate) component: String,
    pub(crate) target: String,
    pub(crate) location: Option<String>,
    pub(crate) message: Option<String>,
    pub(crate) fields: BTreeMap<String, String>,
    pub(crate) spans: Vec<SpanSummary>,
}

impl AlertEvent {
    fn repeat_key(&self) -> String {
        format!(
            "{}|{}|{}",
            self.target,
            self.location.as_deref().unwrap_or_default(),
            self.message.as_deref().unwrap_or_default()
        )
    }
}

#[async_trait]
#[automock]
pub(crate) trait AlertSink {
    async fn deliver(&self, event: AlertEvent) -> Result<()>;
    fn sink_name(&self) -> &'static str;
}

/// Remembers when each distinct alert was last delivered and how many repeats were held back.
struct RepeatFilter {
    cooldown: Duration,
    seen: HashMap<String, (Instant, u64)>,
}

impl RepeatFilter {
    fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            seen: HashMap::new(),
        }
    }

    /// Returns the number of suppressed repeats to report, or `None` to drop the event.
    fn admit(&mut self, key: String, now: Instant) -> Option<u64> {
        if self.seen.len() >= MAX_TRACKED_KEYS {
            let cooldown = self.cooldown;
            self.seen
                .retain(|_, (sent_at, _)| now.duration_since(*sent_at) < cooldown);
        }

        match self.seen.get_mut(&key) {
            Some((sent_at, suppressed)) if now.duration_since(*sent_at) < self.cooldown => {
                *suppressed += 1;
                None
            }
            Some((sent_at, suppressed)) => {
                let held_back = *suppressed;
                *sent_at = now;
                *suppressed = 0;
                Some(held_back)
            }
            None => {
                self.seen.insert(key, (now, 0));
                Some(0)
            }
        }
    }
}

/// Bounded hand-off from the logging layer to a background delivery task.
#[derive(Clone)]
pub(crate) struct AlertQueue {
    tx: mpsc::Sender<AlertEvent>,
}

impl AlertQueue {
    pub(crate) fn spawn(sink: Arc<dyn AlertSink + Send + Sync>, cooldown: Duration) -> Self {
        let (tx, rx) = mpsc::channel::<AlertEvent>(QUEUE_CAPACITY);
        tokio::spawn(deliver_all(rx, sink, cooldown));
        Self { tx }
    }

    pub(crate) fn push(&self, event: AlertEvent) {
        match self.tx.try_send(event) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(_)) => {
                warn!("observability: alert queue full, dropping event");
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                warn!("observability: alert queue closed, dropping event");
            }
        }
    }
}

async fn deliver_all(
    mut rx: mpsc::Receiver<AlertEvent>,
    sink: Arc<dyn AlertSink + Send + Sync>,
    cooldown: Duration,
) {
    let mut filter = RepeatFilter::new(cooldown);

    while let Some(mut event) = rx.recv().await {
        let Some(suppressed) = filter.admit(event.repeat_key(), Instant::now()) else {
            continue;
        };
        if suppressed > 0 {
            event
                .fields
                .insert("suppressed_repeats".to_string(), suppressed.to_string());
        }

        if let Err(error) = sink.deliver(event).await {
            warn!(
                sink = sink.sink_name(),
                error = %error,
                "observability: alert delivery failed"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

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
            fields: BTreeMap::new(),
            spans: Vec::new(),
        }
    }

    #[test]
    fn repeats_inside_the_window_are_held_back() {
        let mut filter = RepeatFilter::new(Duration::from_secs(60));
        let start = Instant::now();
        let key = event("price_refresh: cycle failed").repeat_key();

        assert_eq!(filter.admit(key.clone(), start), Some(0));
        assert_eq!(filter.admit(key.clone(), start + Duration::from_secs(10)), None);
        assert_eq!(filter.admit(key.clone(), start + Duration::from_secs(20)), None);
        assert_eq!(
            filter.admit(key.clone(), start + Duration::from_secs(61)),
            Some(2)
        );
        assert_eq!(filter.admit(key, start + Duration::from_secs(62)), None);
    }

    #[test]
    fn distinct_messages_are_tracked_separately() {
        let mut filter = RepeatFilter::new(Duration::from_secs(60));
        let now = Instant::now();

        assert_eq!(filter.admit(event("feed down").repeat_key(), now), Some(0));
        assert_eq!(filter.admit(event("db down").repeat_key(), now), Some(0));
    }

    #[tokio::test]
    async fn duplicate_events_reach_the_sink_once() {
        let mut sink = MockAlertSink::new();
        sink.expect_deliver()
            .times(2)
            .returning(|event| {
                Box::pin(async move {
                    assert!(!event.fields.contains_key("suppressed_repeats"));
                    Ok(())
                })
            });
        sink.expect_sink_name().return_const("mock");

        let (tx, rx) = mpsc::channel(8);
        tx.send(event("feed down")).await.unwrap();
        tx.send(event("feed down")).await.unwrap();
        tx.send(event("db down")).await.unwrap();
        drop(tx);

        deliver_all(rx, Arc::new(sink), Duration::from_secs(60)).await;
    }

    #[tokio::test]
    async fn sink_failures_do_not_stop_delivery() {
        let mut sink = MockAlertSink::new();
        let mut calls = 0;
        sink.expect_deliver().times(2).returning(move |_| {
            calls += 1;
            let failed = calls == 1;
            Box::pin(async move {
                if failed {
                    Err(anyhow!("alert webhook returned non-success status: 502"))
                } else {
                    Ok(())
                }
            })
        });
        sink.expect_sink_name().return_const("mock");

        let (tx, rx) = mpsc::channel(8);
        tx.send(event("feed down")).await.unwrap();
        tx.send(event("db down")).await.unwrap();
        drop(tx);

        deliver_all(rx, Arc::new(sink), Duration::from_secs(60)).await;
    }
}
