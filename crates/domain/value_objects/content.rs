use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::{articles::ArticleEntity, campaigns::CampaignEntity};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CampaignModel {
    pub slug: Option<String>,
    pub title: String,
    pub summary: Option<String>,
    pub body: String,
    pub media_url: Option<String>,
    #[serde(default)]
    pub is_published: bool,
    #[serde(default)]
    pub is_featured: bool,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
}

impl CampaignModel {
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("title must not be empty".to_string());
        }
        if let (Some(starts_at), Some(ends_at)) = (self.starts_at, self.ends_at) {
            if ends_at < starts_at {
                return Err("ends_at must not be before starts_at".to_string());
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CampaignDto {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub summary: Option<String>,
    pub body: String,
    pub media_url: Option<String>,
    pub is_published: bool,
    pub is_featured: bool,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CampaignEntity> for CampaignDto {
    fn from(value: CampaignEntity) -> Self {
        Self {
            id: value.id,
            slug: value.slug,
            title: value.title,
            summary: value.summary,
            body: value.body,
            media_url: value.media_url,
            is_published: value.is_published,
            is_featured: value.is_featured,
            starts_at: value.starts_at,
            ends_at: value.ends_at,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ArticleModel {
    pub slug: Option<String>,
    pub title: String,
    pub body: String,
    pub media_url: Option<String>,
    #[serde(default)]
    pub is_published: bool,
    pub published_at: Option<DateTime<Utc>>,
}

impl ArticleModel {
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("title must not be empty".to_string());
        }
        Ok(())
    }

    /// Published articles without an explicit date are stamped with `now`.
    pub fn effective_published_at(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match (self.is_published, self.published_at) {
            (true, None) => Some(now),
            (_, published_at) => published_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ArticleDto {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub body: String,
    pub media_url: Option<String>,
    pub is_published: bool,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ArticleEntity> for ArticleDto {
    fn from(value: ArticleEntity) -> Self {
        Self {
            id: value.id,
            slug: value.slug,
            title: value.title,
            body: value.body,
            media_url: value.media_url,
            is_published: value.is_published,
            published_at: value.published_at,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}
