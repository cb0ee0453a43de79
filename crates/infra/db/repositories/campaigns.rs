use anyhow::Result;
use async_trait::async_trait;
use diesel::{RunQueryDsl, insert_into, prelude::*, update};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain::{
        entities::campaigns::{CampaignEntity, InsertCampaignEntity, UpdateCampaignEntity},
        repositories::campaigns::CampaignRepository,
    },
    infra::db::postgres::{postgres_connection::PgPoolSquad, schema::campaigns},
};

pub struct CampaignPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl CampaignPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl CampaignRepository for CampaignPostgres {
    async fn list_published(&self) -> Result<Vec<CampaignEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = campaigns::table
            .filter(campaigns::is_published.eq(true))
            .order((campaigns::is_featured.desc(), campaigns::created_at.desc()))
            .select(CampaignEntity::as_select())
            .load::<CampaignEntity>(&mut conn)?;

        Ok(results)
    }

    async fn list_all(&self) -> Result<Vec<CampaignEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = campaigns::table
            .order(campaigns::created_at.desc())
            .select(CampaignEntity::as_select())
            .load::<CampaignEntity>(&mut conn)?;

        Ok(results)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<CampaignEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = campaigns::table
            .find(id)
            .select(CampaignEntity::as_select())
            .first::<CampaignEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn find_by_slug(&self, slug: String) -> Result<Option<CampaignEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = campaigns::table
            .filter(campaigns::slug.eq(slug))
            .select(CampaignEntity::as_select())
            .first::<CampaignEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn insert(&self, entity: InsertCampaignEntity) -> Result<CampaignEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = insert_into(campaigns::table)
            .values(&entity)
            .returning(CampaignEntity::as_returning())
            .get_result::<CampaignEntity>(&mut conn)?;

        Ok(result)
    }

    async fn update(
        &self,
        id: Uuid,
        entity: UpdateCampaignEntity,
    ) -> Result<Option<CampaignEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = update(campaigns::table.find(id))
            .set(&entity)
            .returning(CampaignEntity::as_returning())
            .get_result::<CampaignEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let deleted = diesel::delete(campaigns::table.find(id)).execute(&mut conn)?;

        Ok(deleted > 0)
    }
}
