use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use diesel::{RunQueryDsl, dsl::max, insert_into, prelude::*, update};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain,
    infra::db::postgres::{
        postgres_connection::PgPoolSquad,
        schema::{cached_prices, custom_prices},
    },
};
use domain::{
    entities::custom_prices::{
        CustomPriceEntity, CustomPriceRow, InsertCustomPriceEntity, UpdateCustomPriceEntity,
    },
    repositories::custom_prices::CustomPriceRepository,
    value_objects::custom_prices::ReorderItem,
};

pub struct CustomPricePostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl CustomPricePostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl CustomPriceRepository for CustomPricePostgres {
    async fn list_all(&self) -> Result<Vec<CustomPriceEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let rows = custom_prices::table
            .order((custom_prices::sort_order.asc(), custom_prices::code.asc()))
            .select(CustomPriceRow::as_select())
            .load::<CustomPriceRow>(&mut conn)?;

        Ok(rows.into_iter().map(CustomPriceEntity::from).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<CustomPriceEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let row = custom_prices::table
            .find(id)
            .select(CustomPriceRow::as_select())
            .first::<CustomPriceRow>(&mut conn)
            .optional()?;

        Ok(row.map(CustomPriceEntity::from))
    }

    async fn find_by_code(&self, code: String) -> Result<Option<CustomPriceEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let row = custom_prices::table
            .filter(custom_prices::code.eq(code))
            .select(CustomPriceRow::as_select())
            .first::<CustomPriceRow>(&mut conn)
            .optional()?;

        Ok(row.map(CustomPriceEntity::from))
    }

    async fn max_sort_order(&self) -> Result<Option<i32>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = custom_prices::table
            .select(max(custom_prices::sort_order))
            .first::<Option<i32>>(&mut conn)?;

        Ok(result)
    }

    async fn insert(&self, entity: InsertCustomPriceEntity) -> Result<CustomPriceEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let row = insert_into(custom_prices::table)
            .values(&entity)
            .returning(CustomPriceRow::as_returning())
            .get_result::<CustomPriceRow>(&mut conn)?;

        Ok(row.into())
    }

    async fn update(
        &self,
        id: Uuid,
        entity: UpdateCustomPriceEntity,
    ) -> Result<Option<CustomPriceEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        // The cache row carries a copy of the code; a rename rewrites it in the same transaction.
        let row = conn.transaction::<Option<CustomPriceRow>, diesel::result::Error, _>(|conn| {
            let row = update(custom_prices::table.find(id))
                .set(&entity)
                .returning(CustomPriceRow::as_returning())
                .get_result::<CustomPriceRow>(conn)
                .optional()?;

            if let Some(row) = &row {
                update(cached_prices::table.find(row.id))
                    .set(cached_prices::code.eq(&row.code))
                    .execute(conn)?;
            }
            Ok(row)
        })?;

        Ok(row.map(CustomPriceEntity::from))
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let deleted = conn.transaction::<usize, diesel::result::Error, _>(|conn| {
            diesel::delete(cached_prices::table.find(id)).execute(conn)?;
            diesel::delete(custom_prices::table.find(id)).execute(conn)
        })?;

        Ok(deleted > 0)
    }

    async fn reorder(&self, items: Vec<ReorderItem>) -> Result<usize> {
        let mut conn = Arc::clone(&self.db_pool).get()?;
        let now = Utc::now();

        let updated = conn.transaction::<usize, diesel::result::Error, _>(|conn| {
            let mut updated = 0;
            for item in &items {
                updated += update(custom_prices::table.find(item.id))
                    .set((
                        custom_prices::sort_order.eq(item.sort_order),
                        custom_prices::updated_at.eq(now),
                    ))
                    .execute(conn)?;
            }
            Ok(updated)
        })?;

        Ok(updated)
    }
}
