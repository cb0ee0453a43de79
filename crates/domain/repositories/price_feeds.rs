use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::domain::value_objects::price_sources::SourceQuote;

/// An upstream table of raw quotes.
#[async_trait]
#[automock]
pub trait PriceFeedClient {
    async fn fetch(&self) -> Result<Vec<SourceQuote>>;
}
