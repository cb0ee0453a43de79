use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::domain::entities::settings::SettingEntity;

#[async_trait]
#[automock]
pub trait SettingRepository {
    async fn list_all(&self) -> Result<Vec<SettingEntity>>;
    async fn upsert(&self, entity: SettingEntity) -> Result<SettingEntity>;
    async fn delete(&self, key: String) -> Result<bool>;
}
