use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::{RunQueryDsl, insert_into, prelude::*, update};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain::{
        entities::price_alerts::{
            InsertPriceAlertEntity, PriceAlertEntity, UpdatePriceAlertEntity,
        },
        repositories::price_alerts::PriceAlertRepository,
    },
    infra::db::postgres::{postgres_connection::PgPoolSquad, schema::price_alerts},
};

pub struct PriceAlertPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl PriceAlertPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl PriceAlertRepository for PriceAlertPostgres {
    async fn list_by_customer(&self, customer_id: Uuid) -> Result<Vec<PriceAlertEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = price_alerts::table
            .filter(price_alerts::customer_id.eq(customer_id))
            .order(price_alerts::created_at.desc())
            .select(PriceAlertEntity::as_select())
            .load::<PriceAlertEntity>(&mut conn)?;

        Ok(results)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<PriceAlertEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = price_alerts::table
            .find(id)
            .select(PriceAlertEntity::as_select())
            .first::<PriceAlertEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn insert(&self, entity: InsertPriceAlertEntity) -> Result<PriceAlertEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = insert_into(price_alerts::table)
            .values(&entity)
            .returning(PriceAlertEntity::as_returning())
            .get_result::<PriceAlertEntity>(&mut conn)?;

        Ok(result)
    }

    async fn update(
        &self,
        id: Uuid,
        entity: UpdatePriceAlertEntity,
    ) -> Result<Option<PriceAlertEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = update(price_alerts::table.find(id))
            .set(&entity)
            .returning(PriceAlertEntity::as_returning())
            .get_result::<PriceAlertEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let deleted = diesel::delete(price_alerts::table.find(id)).execute(&mut conn)?;

        Ok(deleted > 0)
    }

    async fn list_active(&self) -> Result<Vec<PriceAlertEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = price_alerts::table
            .filter(price_alerts::is_active.eq(true))
            .select(PriceAlertEntity::as_select())
            .load::<PriceAlertEntity>(&mut conn)?;

        Ok(results)
    }

    async fn mark_triggered(&self, ids: Vec<Uuid>, now: DateTime<Utc>) -> Result<usize> {
        if ids.is_empty() {
            return Ok(0);
        }
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let updated = update(
            price_alerts::table
                .filter(price_alerts::id.eq_any(ids))
                .filter(price_alerts::is_active.eq(true)),
        )
        .set((
            price_alerts::is_active.eq(false),
            price_alerts::triggered_at.eq(Some(now)),
        ))
        .execute(&mut conn)?;

        Ok(updated)
    }
}
