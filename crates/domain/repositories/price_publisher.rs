use mockall::automock;

use crate::domain::value_objects::cached_prices::PriceSocketMessage;

/// Fan-out of price frames to connected socket clients.
#[automock]
pub trait PricePublisher {
    fn publish(&self, message: PriceSocketMessage);
}
