use anyhow::Result;
use async_trait::async_trait;
use diesel::{RunQueryDsl, prelude::*};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain::{
        entities::point_transactions::PointTransactionEntity,
        repositories::point_transactions::PointTransactionRepository,
    },
    infra::db::postgres::{postgres_connection::PgPoolSquad, schema::point_transactions},
};

pub struct PointTransactionPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl PointTransactionPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl PointTransactionRepository for PointTransactionPostgres {
    async fn list_by_customer(&self, customer_id: Uuid) -> Result<Vec<PointTransactionEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = point_transactions::table
            .filter(point_transactions::customer_id.eq(customer_id))
            .order(point_transactions::created_at.desc())
            .select(PointTransactionEntity::as_select())
            .load::<PointTransactionEntity>(&mut conn)?;

        Ok(results)
    }
}
