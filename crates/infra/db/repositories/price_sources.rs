use anyhow::Result;
use async_trait::async_trait;
use diesel::{RunQueryDsl, insert_into, prelude::*, upsert::excluded};
use std::sync::Arc;

use crate::{
    domain::{
        entities::price_sources::PriceSourceEntity,
        repositories::price_sources::PriceSourceRepository,
        value_objects::enums::price_source_kinds::PriceSourceKind,
    },
    infra::db::postgres::{postgres_connection::PgPoolSquad, schema::price_sources},
};

pub struct PriceSourcePostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl PriceSourcePostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl PriceSourceRepository for PriceSourcePostgres {
    async fn upsert_many(&self, entries: Vec<PriceSourceEntity>) -> Result<usize> {
        if entries.is_empty() {
            return Ok(0);
        }
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let written = insert_into(price_sources::table)
            .values(&entries)
            .on_conflict((price_sources::source, price_sources::code))
            .do_update()
            .set((
                price_sources::name.eq(excluded(price_sources::name)),
                price_sources::buy.eq(excluded(price_sources::buy)),
                price_sources::sell.eq(excluded(price_sources::sell)),
                price_sources::fetched_at.eq(excluded(price_sources::fetched_at)),
            ))
            .execute(&mut conn)?;

        Ok(written)
    }

    async fn list(&self, source: Option<PriceSourceKind>) -> Result<Vec<PriceSourceEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let mut query = price_sources::table
            .select(PriceSourceEntity::as_select())
            .order((price_sources::source.asc(), price_sources::code.asc()))
            .into_boxed();
        if let Some(source) = source {
            query = query.filter(price_sources::source.eq(source.to_string()));
        }

        let results = query.load::<PriceSourceEntity>(&mut conn)?;
        Ok(results)
    }
}
