use std::sync::Arc;

use chrono::{DateTime, Utc};
use crates::domain::{
    entities::articles::{InsertArticleEntity, UpdateArticleEntity},
    repositories::articles::ArticleRepository,
    value_objects::{
        content::{ArticleDto, ArticleModel},
        slugs::resolve_slug,
    },
};
use tracing::info;
use uuid::Uuid;

use super::UseCaseResult;
use crate::axum_http::error_responses::AppError;

pub struct ArticleUseCase<R>
where
    R: ArticleRepository + Send + Sync + 'static,
{
    article_repository: Arc<R>,
}

impl<R> ArticleUseCase<R>
where
    R: ArticleRepository + Send + Sync + 'static,
{
    pub fn new(article_repository: Arc<R>) -> Self {
        Self { article_repository }
    }

    pub async fn list_published(&self) -> UseCaseResult<Vec<ArticleDto>> {
        let articles = self.article_repository.list_published().await?;
        Ok(articles.into_iter().map(ArticleDto::from).collect())
    }

    pub async fn get_published(&self, slug: &str) -> UseCaseResult<ArticleDto> {
        self.article_repository
            .find_by_slug(slug.trim().to_string())
            .await?
            .filter(|article| article.is_published)
            .map(ArticleDto::from)
            .ok_or_else(|| AppError::NotFound(format!("article {} not found", slug)))
    }

    pub async fn list_all(&self) -> UseCaseResult<Vec<ArticleDto>> {
        let articles = self.article_repository.list_all().await?;
        Ok(articles.into_iter().map(ArticleDto::from).collect())
    }

    async fn unique_slug(&self, model: &ArticleModel, current: Option<Uuid>) -> UseCaseResult<String> {
        model.validate().map_err(AppError::BadRequest)?;
        let slug = resolve_slug(model.slug.as_deref(), &model.title).map_err(AppError::BadRequest)?;

        let clash = self.article_repository.find_by_slug(slug.clone()).await?;
        if clash.is_some_and(|article| Some(article.id) != current) {
            return Err(AppError::Conflict(format!("slug {} is already in use", slug)));
        }
        Ok(slug)
    }

    pub async fn create(&self, model: ArticleModel, now: DateTime<Utc>) -> UseCaseResult<ArticleDto> {
        let slug = self.unique_slug(&model, None).await?;
        let published_at = model.effective_published_at(now);

        let created = self
            .article_repository
            .insert(InsertArticleEntity {
                slug,
                title: model.title.trim().to_string(),
                body: model.body,
                media_url: model.media_url.filter(|url| !url.trim().is_empty()),
                is_published: model.is_published,
                published_at,
                created_at: now,
                updated_at: now,
            })
            .await?;

        info!(id = %created.id, slug = %created.slug, "articles: created");
        Ok(ArticleDto::from(created))
    }

    pub async fn update(
        &self,
        id: Uuid,
        model: ArticleModel,
        now: DateTime<Utc>,
    ) -> UseCaseResult<ArticleDto> {
        let slug = self.unique_slug(&model, Some(id)).await?;
        let published_at = model.effective_published_at(now);

        let updated = self
            .article_repository
            .update(
                id,
                UpdateArticleEntity {
                    slug,
                    title: model.title.trim().to_string(),
                    body: model.body,
                    media_url: model.media_url.filter(|url| !url.trim().is_empty()),
                    is_published: model.is_published,
                    published_at,
                    updated_at: now,
                },
            )
            .await?
            .ok_or_else(|| AppError::NotFound(format!("article {} not found", id)))?;

        info!(%id, "articles: updated");
        Ok(ArticleDto::from(updated))
    }

    pub async fn delete(&self, id: Uuid) -> UseCaseResult<()> {
        if !self.article_repository.delete(id).await? {
            return Err(AppError::NotFound(format!("article {} not found", id)));
        }
        info!(%id, "articles: deleted");
        Ok(())
    }
}
