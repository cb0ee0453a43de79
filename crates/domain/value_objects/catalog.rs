use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::categories::CategoryEntity;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InsertCategoryModel {
    pub name: String,
    pub slug: Option<String>,
    pub points_rate: f64,
    pub sort_order: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UpdateCategoryModel {
    pub name: String,
    pub slug: Option<String>,
    pub points_rate: f64,
    pub sort_order: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryDto {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub points_rate: f64,
    pub sort_order: i32,
    pub updated_at: DateTime<Utc>,
}

impl From<CategoryEntity> for CategoryDto {
    fn from(value: CategoryEntity) -> Self {
        Self {
            id: value.id,
            name: value.name,
            slug: value.slug,
            points_rate: value.points_rate,
            sort_order: value.sort_order,
            updated_at: value.updated_at,
        }
    }
}

pub fn validate_points_rate(points_rate: f64) -> Result<(), String> {
    if !points_rate.is_finite() || points_rate < 0.0 {
        return Err("points_rate must be a finite number >= 0".to_string());
    }
    Ok(())
}
