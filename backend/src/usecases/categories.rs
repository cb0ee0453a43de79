use std::sync::Arc;

use chrono::{DateTime, Utc};
use crates::domain::{
    entities::categories::{InsertCategoryEntity, UpdateCategoryEntity},
    repositories::categories::CategoryRepository,
    value_objects::{
        catalog::{CategoryDto, InsertCategoryModel, UpdateCategoryModel, validate_points_rate},
        slugs::resolve_slug,
    },
};
use tracing::info;
use uuid::Uuid;

use super::UseCaseResult;
use crate::axum_http::error_responses::AppError;

pub struct CategoryUseCase<R>
where
    R: CategoryRepository + Send + Sync + 'static,
{
    category_repository: Arc<R>,
}

impl<R> CategoryUseCase<R>
where
    R: CategoryRepository + Send + Sync + 'static,
{
    pub fn new(category_repository: Arc<R>) -> Self {
        Self {
            category_repository,
        }
    }

    pub async fn list(&self) -> UseCaseResult<Vec<CategoryDto>> {
        let categories = self.category_repository.list().await?;
        Ok(categories.into_iter().map(CategoryDto::from).collect())
    }

    /// Checks name, rate and slug, returning the trimmed name and the final slug.
    async fn validate(
        &self,
        name: &str,
        slug: Option<&str>,
        points_rate: f64,
        current: Option<Uuid>,
    ) -> UseCaseResult<(String, String)> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::BadRequest("name must not be empty".to_string()));
        }
        validate_points_rate(points_rate).map_err(AppError::BadRequest)?;

        let slug = resolve_slug(slug, name).map_err(AppError::BadRequest)?;
        let clash = self.category_repository.find_by_slug(slug.clone()).await?;
        if clash.is_some_and(|category| Some(category.id) != current) {
            return Err(AppError::Conflict(format!("slug {} is already in use", slug)));
        }

        Ok((name.to_string(), slug))
    }

    pub async fn create(
        &self,
        model: InsertCategoryModel,
        now: DateTime<Utc>,
    ) -> UseCaseResult<CategoryDto> {
        let (name, slug) = self
            .validate(&model.name, model.slug.as_deref(), model.points_rate, None)
            .await?;

        let sort_order = match model.sort_order {
            Some(sort_order) => sort_order,
            None => self
                .category_repository
                .max_sort_order()
                .await?
                .map_or(0, |max| max.saturating_add(1)),
        };

        let created = self
            .category_repository
            .insert(InsertCategoryEntity {
                name,
                slug,
                points_rate: model.points_rate,
                sort_order,
                created_at: now,
                updated_at: now,
            })
            .await?;

        info!(id = %created.id, slug = %created.slug, "categories: created");
        Ok(CategoryDto::from(created))
    }

    pub async fn update(
        &self,
        id: Uuid,
        model: UpdateCategoryModel,
        now: DateTime<Utc>,
    ) -> UseCaseResult<CategoryDto> {
        let (name, slug) = self
            .validate(&model.name, model.slug.as_deref(), model.points_rate, Some(id))
            .await?;

        let updated = self
            .category_repository
            .update(
                id,
                UpdateCategoryEntity {
                    name,
                    slug,
                    points_rate: model.points_rate,
                    sort_order: model.sort_order,
                    updated_at: now,
                },
            )
            .await?
            .ok_or_else(|| AppError::NotFound(format!("category {} not found", id)))?;

        info!(%id, "categories: updated");
        Ok(CategoryDto::from(updated))
    }

    pub async fn delete(&self, id: Uuid) -> UseCaseResult<()> {
        if !self.category_repository.delete(id).await? {
            return Err(AppError::NotFound(format!("category {} not found", id)));
        }
        info!(%id, "categories: deleted");
        Ok(())
    }
}
