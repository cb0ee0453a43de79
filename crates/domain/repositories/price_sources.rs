use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::domain::{
    entities::price_sources::PriceSourceEntity,
    value_objects::enums::price_source_kinds::PriceSourceKind,
};

#[async_trait]
#[automock]
pub trait PriceSourceRepository {
    async fn upsert_many(&self, entries: Vec<PriceSourceEntity>) -> Result<usize>;
    async fn list(&self, source: Option<PriceSourceKind>) -> Result<Vec<PriceSourceEntity>>;
}
