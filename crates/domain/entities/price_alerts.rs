use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infra::db::postgres::schema::price_alerts;

#[derive(Debug, Clone, PartialEq, Identifiable, Selectable, Queryable)]
#[diesel(table_name = price_alerts)]
pub struct PriceAlertEntity {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub price_code: String,
    pub field: String,
    pub condition: String,
    pub target: f64,
    pub is_active: bool,
    pub triggered_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = price_alerts)]
pub struct InsertPriceAlertEntity {
    pub customer_id: Uuid,
    pub price_code: String,
    pub field: String,
    pub condition: String,
    pub target: f64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = price_alerts, treat_none_as_null = true)]
pub struct UpdatePriceAlertEntity {
    pub field: String,
    pub condition: String,
    pub target: f64,
    pub is_active: bool,
    pub triggered_at: Option<DateTime<Utc>>,
}
