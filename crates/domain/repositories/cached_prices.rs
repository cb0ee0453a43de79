use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::cached_prices::CachedPriceEntity;

#[async_trait]
#[automock]
pub trait CachedPriceRepository {
    async fn list_all(&self) -> Result<Vec<CachedPriceEntity>>;
    async fn find_by_custom_price_id(
        &self,
        custom_price_id: Uuid,
    ) -> Result<Option<CachedPriceEntity>>;
    async fn upsert_many(&self, entries: Vec<CachedPriceEntity>) -> Result<usize>;
}
