use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::price_alerts::{
    InsertPriceAlertEntity, PriceAlertEntity, UpdatePriceAlertEntity,
};

#[async_trait]
#[automock]
pub trait PriceAlertRepository {
    async fn list_by_customer(&self, customer_id: Uuid) -> Result<Vec<PriceAlertEntity>>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<PriceAlertEntity>>;
    async fn insert(&self, entity: InsertPriceAlertEntity) -> Result<PriceAlertEntity>;
    async fn update(
        &self,
        id: Uuid,
        entity: UpdatePriceAlertEntity,
    ) -> Result<Option<PriceAlertEntity>>;
    async fn delete(&self, id: Uuid) -> Result<bool>;
    async fn list_active(&self) -> Result<Vec<PriceAlertEntity>>;
    async fn mark_triggered(&self, ids: Vec<Uuid>, now: DateTime<Utc>) -> Result<usize>;
}
