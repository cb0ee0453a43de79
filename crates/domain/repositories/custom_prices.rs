use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::{
    entities::custom_prices::{
        CustomPriceEntity, InsertCustomPriceEntity, UpdateCustomPriceEntity,
    },
    value_objects::custom_prices::ReorderItem,
};

#[async_trait]
#[automock]
pub trait CustomPriceRepository {
    /// Ordered by `sort_order`, then `code`.
    async fn list_all(&self) -> Result<Vec<CustomPriceEntity>>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<CustomPriceEntity>>;
    async fn find_by_code(&self, code: String) -> Result<Option<CustomPriceEntity>>;
    async fn max_sort_order(&self) -> Result<Option<i32>>;
    async fn insert(&self, entity: InsertCustomPriceEntity) -> Result<CustomPriceEntity>;
    async fn update(
        &self,
        id: Uuid,
        entity: UpdateCustomPriceEntity,
    ) -> Result<Option<CustomPriceEntity>>;
    /// Removes the definition and its cache row. `false` when nothing matched.
    async fn delete(&self, id: Uuid) -> Result<bool>;
    /// Applies every item in one transaction.
    async fn reorder(&self, items: Vec<ReorderItem>) -> Result<usize>;
}
