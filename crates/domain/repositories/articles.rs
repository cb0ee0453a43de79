use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::articles::{ArticleEntity, InsertArticleEntity, UpdateArticleEntity};

#[async_trait]
#[automock]
pub trait ArticleRepository {
    /// Newest publication first.
    async fn list_published(&self) -> Result<Vec<ArticleEntity>>;
    async fn list_all(&self) -> Result<Vec<ArticleEntity>>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<ArticleEntity>>;
    async fn find_by_slug(&self, slug: String) -> Result<Option<ArticleEntity>>;
    async fn insert(&self, entity: InsertArticleEntity) -> Result<ArticleEntity>;
    async fn update(
        &self,
        id: Uuid,
        entity: UpdateArticleEntity,
    ) -> Result<Option<ArticleEntity>>;
    async fn delete(&self, id: Uuid) -> Result<bool>;
}
