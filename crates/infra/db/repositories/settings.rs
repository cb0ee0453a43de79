use anyhow::Result;
use async_trait::async_trait;
use diesel::{RunQueryDsl, insert_into, prelude::*};
use std::sync::Arc;

use crate::{
    domain::{entities::settings::SettingEntity, repositories::settings::SettingRepository},
    infra::db::postgres::{postgres_connection::PgPoolSquad, schema::settings},
};

pub struct SettingPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl SettingPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl SettingRepository for SettingPostgres {
    async fn list_all(&self) -> Result<Vec<SettingEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = settings::table
            .order(settings::key.asc())
            .select(SettingEntity::as_select())
            .load::<SettingEntity>(&mut conn)?;

        Ok(results)
    }

    async fn upsert(&self, entity: SettingEntity) -> Result<SettingEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = insert_into(settings::table)
            .values(&entity)
            .on_conflict(settings::key)
            .do_update()
            .set((
                settings::value.eq(&entity.value),
                settings::updated_at.eq(entity.updated_at),
            ))
            .returning(SettingEntity::as_returning())
            .get_result::<SettingEntity>(&mut conn)?;

        Ok(result)
    }

    async fn delete(&self, key: String) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let deleted = diesel::delete(settings::table.find(key)).execute(&mut conn)?;

        Ok(deleted > 0)
    }
}
