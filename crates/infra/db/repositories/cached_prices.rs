use anyhow::Result;
use async_trait::async_trait;
use diesel::{RunQueryDsl, insert_into, prelude::*};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain::{
        entities::cached_prices::CachedPriceEntity,
        repositories::cached_prices::CachedPriceRepository,
    },
    infra::db::postgres::{postgres_connection::PgPoolSquad, schema::cached_prices},
};

pub struct CachedPricePostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl CachedPricePostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl CachedPriceRepository for CachedPricePostgres {
    async fn list_all(&self) -> Result<Vec<CachedPriceEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = cached_prices::table
            .order(cached_prices::code.asc())
            .select(CachedPriceEntity::as_select())
            .load::<CachedPriceEntity>(&mut conn)?;

        Ok(results)
    }

    async fn find_by_custom_price_id(
        &self,
        custom_price_id: Uuid,
    ) -> Result<Option<CachedPriceEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = cached_prices::table
            .find(custom_price_id)
            .select(CachedPriceEntity::as_select())
            .first::<CachedPriceEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn upsert_many(&self, entries: Vec<CachedPriceEntity>) -> Result<usize> {
        if entries.is_empty() {
            return Ok(0);
        }
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let written = conn.transaction::<usize, diesel::result::Error, _>(|conn| {
            let mut written = 0;
            for entry in &entries {
                written += insert_into(cached_prices::table)
                    .values(entry)
                    .on_conflict(cached_prices::custom_price_id)
                    .do_update()
                    .set(entry)
                    .execute(conn)?;
            }
            Ok(written)
        })?;

        Ok(written)
    }
}
