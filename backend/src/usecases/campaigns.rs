use std::sync::Arc;

use chrono::{DateTime, Utc};
use crates::domain::{
    entities::campaigns::{InsertCampaignEntity, UpdateCampaignEntity},
    repositories::campaigns::CampaignRepository,
    value_objects::{
        content::{CampaignDto, CampaignModel},
        slugs::resolve_slug,
    },
};
use tracing::info;
use uuid::Uuid;

use super::UseCaseResult;
use crate::axum_http::error_responses::AppError;

fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

pub struct CampaignUseCase<R>
where
    R: CampaignRepository + Send + Sync + 'static,
{
    campaign_repository: Arc<R>,
}

impl<R> CampaignUseCase<R>
where
    R: CampaignRepository + Send + Sync + 'static,
{
    pub fn new(campaign_repository: Arc<R>) -> Self {
        Self {
            campaign_repository,
        }
    }

    pub async fn list_published(&self) -> UseCaseResult<Vec<CampaignDto>> {
        let campaigns = self.campaign_repository.list_published().await?;
        Ok(campaigns.into_iter().map(CampaignDto::from).collect())
    }

    pub async fn get_published(&self, slug: &str) -> UseCaseResult<CampaignDto> {
        self.campaign_repository
            .find_by_slug(slug.trim().to_string())
            .await?
            .filter(|campaign| campaign.is_published)
            .map(CampaignDto::from)
            .ok_or_else(|| AppError::NotFound(format!("campaign {} not found", slug)))
    }

    pub async fn list_all(&self) -> UseCaseResult<Vec<CampaignDto>> {
        let campaigns = self.campaign_repository.list_all().await?;
        Ok(campaigns.into_iter().map(CampaignDto::from).collect())
    }

    async fn unique_slug(&self, model: &CampaignModel, current: Option<Uuid>) -> UseCaseResult<String> {
        model.validate().map_err(AppError::BadRequest)?;
        let slug = resolve_slug(model.slug.as_deref(), &model.title).map_err(AppError::BadRequest)?;

        let clash = self.campaign_repository.find_by_slug(slug.clone()).await?;
        if clash.is_some_and(|campaign| Some(campaign.id) != current) {
            return Err(AppError::Conflict(format!("slug {} is already in use", slug)));
        }
        Ok(slug)
    }

    pub async fn create(&self, model: CampaignModel, now: DateTime<Utc>) -> UseCaseResult<CampaignDto> {
        let slug = self.unique_slug(&model, None).await?;

        let created = self
            .campaign_repository
            .insert(InsertCampaignEntity {
                slug,
                title: model.title.trim().to_string(),
                summary: optional_text(model.summary),
                body: model.body,
                media_url: optional_text(model.media_url),
                is_published: model.is_published,
                is_featured: model.is_featured,
                starts_at: model.starts_at,
                ends_at: model.ends_at,
                created_at: now,
                updated_at: now,
            })
            .await?;

        info!(id = %created.id, slug = %created.slug, "campaigns: created");
        Ok(CampaignDto::from(created))
    }

    pub async fn update(
        &self,
        id: Uuid,
        model: CampaignModel,
        now: DateTime<Utc>,
    ) -> UseCaseResult<CampaignDto> {
        let slug = self.unique_slug(&model, Some(id)).await?;

        let updated = self
            .campaign_repository
            .update(
                id,
                UpdateCampaignEntity {
                    slug,
                    title: model.title.trim().to_string(),
                    summary: optional_text(model.summary),
                    body: model.body,
                    media_url: optional_text(model.media_url),
                    is_published: model.is_published,
                    is_featured: model.is_featured,
                    starts_at: model.starts_at,
                    ends_at: model.ends_at,
                    updated_at: now,
                },
            )
            .await?
            .ok_or_else(|| AppError::NotFound(format!("campaign {} not found", id)))?;

        info!(%id, "campaigns: updated");
        Ok(CampaignDto::from(updated))
    }

    pub async fn delete(&self, id: Uuid) -> UseCaseResult<()> {
        if !self.campaign_repository.delete(id).await? {
            return Err(AppError::NotFound(format!("campaign {} not found", id)));
        }
        info!(%id, "campaigns: deleted");
        Ok(())
    }
}
