use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infra::db::postgres::schema::campaigns;

#[derive(Debug, Clone, PartialEq, Identifiable, Selectable, Queryable)]
#[diesel(table_name = campaigns)]
pub struct CampaignEntity {
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

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = campaigns)]
pub struct InsertCampaignEntity {
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

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = campaigns, treat_none_as_null = true)]
pub struct UpdateCampaignEntity {
    pub slug: String,
    pub title: String,
    pub summary: Option<String>,
    pub body: String,
    pub media_url: Option<String>,
    pub is_published: bool,
    pub is_featured: bool,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}
