use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infra::db::postgres::schema::categories;

#[derive(Debug, Clone, PartialEq, Identifiable, Selectable, Queryable)]
#[diesel(table_name = categories)]
pub struct CategoryEntity {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    /// Loyalty points granted per currency unit spent in this category.
    pub points_rate: f64,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = categories)]
pub struct InsertCategoryEntity {
    pub name: String,
    pub slug: String,
    pub points_rate: f64,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = categories)]
pub struct UpdateCategoryEntity {
    pub name: String,
    pub slug: String,
    pub points_rate: f64,
    pub sort_order: i32,
    pub updated_at: DateTime<Utc>,
}
