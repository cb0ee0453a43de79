use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::categories::{
    CategoryEntity, InsertCategoryEntity, UpdateCategoryEntity,
};

#[async_trait]
#[automock]
pub trait CategoryRepository {
    async fn list(&self) -> Result<Vec<CategoryEntity>>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<CategoryEntity>>;
    async fn find_by_ids(&self, ids: Vec<Uuid>) -> Result<Vec<CategoryEntity>>;
    async fn find_by_slug(&self, slug: String) -> Result<Option<CategoryEntity>>;
    async fn max_sort_order(&self) -> Result<Option<i32>>;
    async fn insert(&self, entity: InsertCategoryEntity) -> Result<CategoryEntity>;
    async fn update(
        &self,
        id: Uuid,
        entity: UpdateCategoryEntity,
    ) -> Result<Option<CategoryEntity>>;
    async fn delete(&self, id: Uuid) -> Result<bool>;
}
