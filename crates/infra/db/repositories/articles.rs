use anyhow::Result;
use async_trait::async_trait;
use diesel::{RunQueryDsl, insert_into, prelude::*, update};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain::{
        entities::articles::{ArticleEntity, InsertArticleEntity, UpdateArticleEntity},
        repositories::articles::ArticleRepository,
    },
    infra::db::postgres::{postgres_connection::PgPoolSquad, schema::articles},
};

pub struct ArticlePostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl ArticlePostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl ArticleRepository for ArticlePostgres {
    async fn list_published(&self) -> Result<Vec<ArticleEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = articles::table
            .filter(articles::is_published.eq(true))
            .order((
                articles::published_at.desc(),
                articles::created_at.desc(),
            ))
            .select(ArticleEntity::as_select())
            .load::<ArticleEntity>(&mut conn)?;

        Ok(results)
    }

    async fn list_all(&self) -> Result<Vec<ArticleEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = articles::table
            .order(articles::created_at.desc())
            .select(ArticleEntity::as_select())
            .load::<ArticleEntity>(&mut conn)?;

        Ok(results)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ArticleEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = articles::table
            .find(id)
            .select(ArticleEntity::as_select())
            .first::<ArticleEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn find_by_slug(&self, slug: String) -> Result<Option<ArticleEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = articles::table
            .filter(articles::slug.eq(slug))
            .select(ArticleEntity::as_select())
            .first::<ArticleEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn insert(&self, entity: InsertArticleEntity) -> Result<ArticleEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = insert_into(articles::table)
            .values(&entity)
            .returning(ArticleEntity::as_returning())
            .get_result::<ArticleEntity>(&mut conn)?;

        Ok(result)
    }

    async fn update(
        &self,
        id: Uuid,
        entity: UpdateArticleEntity,
    ) -> Result<Option<ArticleEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = update(articles::table.find(id))
            .set(&entity)
            .returning(ArticleEntity::as_returning())
            .get_result::<ArticleEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let deleted = diesel::delete(articles::table.find(id)).execute(&mut conn)?;

        Ok(deleted > 0)
    }
}
