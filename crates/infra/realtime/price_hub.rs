use std::sync::{Arc, RwLock};

use tokio::sync::broadcast;

use crate::domain::{
    repositories::price_publisher::PricePublisher,
    value_objects::cached_prices::{PriceSocketMessage, PriceTickDto},
};

const BROADCAST_CAPACITY: usize = 256;

/// Latest price snapshot plus a broadcast fan-out to socket sessions.
///
/// The poll job is the only writer. Sessions read the snapshot on connect and then
/// follow the broadcast channel.
#[derive(Clone)]
pub struct PriceHub {
    snapshot: Arc<RwLock<Vec<PriceTickDto>>>,
    tx: broadcast::Sender<PriceSocketMessage>,
}

impl Default for PriceHub {
    fn default() -> Self {
        Self::new()
    }
}

impl PriceHub {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(BROADCAST_CAPACITY);
        Self {
            snapshot: Arc::new(RwLock::new(Vec::new())),
            tx,
        }
    }

    /// Replaces the snapshot without notifying anyone. Used at startup.
    pub fn seed(&self, ticks: Vec<PriceTickDto>) {
        self.store(ticks);
    }

    pub fn snapshot(&self) -> Vec<PriceTickDto> {
        match self.snapshot.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn snapshot_message(&self) -> PriceSocketMessage {
        PriceSocketMessage::Prices(self.snapshot())
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PriceSocketMessage> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    fn store(&self, ticks: Vec<PriceTickDto>) {
        match self.snapshot.write() {
            Ok(mut guard) => *guard = ticks,
            Err(poisoned) => *poisoned.into_inner() = ticks,
        }
    }
}

impl PricePublisher for PriceHub {
    fn publish(&self, message: PriceSocketMessage) {
        if let PriceSocketMessage::Prices(ticks) = &message {
            self.store(ticks.clone());
        }
        // No subscribers is not an error.
        let _ = self.tx.send(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::enums::price_directions::PriceDirection;
    use chrono::Utc;

    fn tick(code: &str, sell: f64) -> PriceTickDto {
        PriceTickDto {
            code: code.to_string(),
            name: code.to_string(),
            group_key: None,
            decimals: 2,
            sort_order: 0,
            buy: sell - 1.0,
            sell,
            change: 0.0,
            change_percent: 0.0,
            direction: PriceDirection::Same,
            buy_high: sell - 1.0,
            buy_low: sell - 1.0,
            sell_high: sell,
            sell_low: sell,
            computed_at: Utc::now(),
        }
    }

    #[test]
    fn seeding_does_not_broadcast() {
        let hub = PriceHub::new();
        let mut rx = hub.subscribe();

        hub.seed(vec![tick("GRAM", 10.0)]);

        assert_eq!(hub.snapshot().len(), 1);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn publishing_prices_replaces_snapshot_and_fans_out() {
        let hub = PriceHub::new();
        let mut first = hub.subscribe();
        let mut second = hub.subscribe();
        assert_eq!(hub.subscriber_count(), 2);

        hub.publish(PriceSocketMessage::Prices(vec![tick("GRAM", 10.0), tick("ONS", 20.0)]));
        hub.publish(PriceSocketMessage::PriceUpdate(tick("GRAM", 11.0)));

        assert_eq!(hub.snapshot().len(), 2);
        assert!(matches!(first.recv().await, Ok(PriceSocketMessage::Prices(ticks)) if ticks.len() == 2));
        assert!(matches!(first.recv().await, Ok(PriceSocketMessage::PriceUpdate(tick)) if tick.sell == 11.0));
        assert!(matches!(second.recv().await, Ok(PriceSocketMessage::Prices(_))));
    }

    #[test]
    fn updates_alone_keep_the_snapshot() {
        let hub = PriceHub::new();
        hub.seed(vec![tick("GRAM", 10.0)]);

        hub.publish(PriceSocketMessage::PriceUpdate(tick("GRAM", 12.0)));

        assert_eq!(hub.snapshot()[0].sell, 10.0);
    }
}
