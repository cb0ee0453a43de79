use anyhow::Result;
use async_trait::async_trait;
use diesel::{RunQueryDsl, insert_into, prelude::*};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain::{
        entities::customers::{CustomerEntity, InsertCustomerEntity},
        repositories::customers::CustomerRepository,
    },
    infra::db::postgres::{postgres_connection::PgPoolSquad, schema::customers},
};

pub struct CustomerPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl CustomerPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl CustomerRepository for CustomerPostgres {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<CustomerEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = customers::table
            .find(id)
            .select(CustomerEntity::as_select())
            .first::<CustomerEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn find_by_phone(&self, phone: String) -> Result<Option<CustomerEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = customers::table
            .filter(customers::phone.eq(phone))
            .select(CustomerEntity::as_select())
            .first::<CustomerEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn find_by_qr_identifier(
        &self,
        qr_identifier: String,
    ) -> Result<Option<CustomerEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = customers::table
            .filter(customers::qr_identifier.eq(qr_identifier))
            .select(CustomerEntity::as_select())
            .first::<CustomerEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn find_or_create(&self, entity: InsertCustomerEntity) -> Result<CustomerEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let customer = conn.transaction::<CustomerEntity, diesel::result::Error, _>(|conn| {
            insert_into(customers::table)
                .values(&entity)
                .on_conflict(customers::phone)
                .do_nothing()
                .execute(conn)?;

            customers::table
                .filter(customers::phone.eq(&entity.phone))
                .select(CustomerEntity::as_select())
                .first::<CustomerEntity>(conn)
        })?;

        Ok(customer)
    }

    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<CustomerEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = customers::table
            .order(customers::created_at.desc())
            .limit(limit)
            .offset(offset)
            .select(CustomerEntity::as_select())
            .load::<CustomerEntity>(&mut conn)?;

        Ok(results)
    }
}
