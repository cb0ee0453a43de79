use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::campaigns::{
    CampaignEntity, InsertCampaignEntity, UpdateCampaignEntity,
};

#[async_trait]
#[automock]
pub trait CampaignRepository {
    /// Featured first, then newest.
    async fn list_published(&self) -> Result<Vec<CampaignEntity>>;
    async fn list_all(&self) -> Result<Vec<CampaignEntity>>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<CampaignEntity>>;
    async fn find_by_slug(&self, slug: String) -> Result<Option<CampaignEntity>>;
    async fn insert(&self, entity: InsertCampaignEntity) -> Result<CampaignEntity>;
    async fn update(
        &self,
        id: Uuid,
        entity: UpdateCampaignEntity,
    ) -> Result<Option<CampaignEntity>>;
    async fn delete(&self, id: Uuid) -> Result<bool>;
}
