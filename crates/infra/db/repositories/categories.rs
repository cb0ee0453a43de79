use anyhow::Result;
use async_trait::async_trait;
use diesel::{RunQueryDsl, dsl::max, insert_into, prelude::*, update};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain::{
        entities::categories::{CategoryEntity, InsertCategoryEntity, UpdateCategoryEntity},
        repositories::categories::CategoryRepository,
    },
    infra::db::postgres::{postgres_connection::PgPoolSquad, schema::categories},
};

pub struct CategoryPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl CategoryPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl CategoryRepository for CategoryPostgres {
    async fn list(&self) -> Result<Vec<CategoryEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = categories::table
            .order((categories::sort_order.asc(), categories::name.asc()))
            .select(CategoryEntity::as_select())
            .load::<CategoryEntity>(&mut conn)?;

        Ok(results)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<CategoryEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = categories::table
            .find(id)
            .select(CategoryEntity::as_select())
            .first::<CategoryEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn find_by_ids(&self, ids: Vec<Uuid>) -> Result<Vec<CategoryEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = categories::table
            .filter(categories::id.eq_any(ids))
            .select(CategoryEntity::as_select())
            .load::<CategoryEntity>(&mut conn)?;

        Ok(results)
    }

    async fn find_by_slug(&self, slug: String) -> Result<Option<CategoryEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = categories::table
            .filter(categories::slug.eq(slug))
            .select(CategoryEntity::as_select())
            .first::<CategoryEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn max_sort_order(&self) -> Result<Option<i32>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = categories::table
            .select(max(categories::sort_order))
            .first::<Option<i32>>(&mut conn)?;

        Ok(result)
    }

    async fn insert(&self, entity: InsertCategoryEntity) -> Result<CategoryEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = insert_into(categories::table)
            .values(&entity)
            .returning(CategoryEntity::as_returning())
            .get_result::<CategoryEntity>(&mut conn)?;

        Ok(result)
    }

    async fn update(
        &self,
        id: Uuid,
        entity: UpdateCategoryEntity,
    ) -> Result<Option<CategoryEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = update(categories::table.find(id))
            .set(&entity)
            .returning(CategoryEntity::as_returning())
            .get_result::<CategoryEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let deleted = diesel::delete(categories::table.find(id)).execute(&mut conn)?;

        Ok(deleted > 0)
    }
}
