use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infra::db::postgres::schema::qr_codes;

#[derive(Debug, Clone, PartialEq, Identifiable, Selectable, Queryable)]
#[diesel(table_name = qr_codes)]
pub struct QrCodeEntity {
    pub id: Uuid,
    pub token: String,
    pub kind: String,    // earn | spend
    pub origin: String,  // single | bulk | purchase | customer
    pub points: i64,
    pub breakdown: Option<serde_json::Value>,
    pub status: String,  // unused | used | expired
    pub batch_id: Option<Uuid>,
    pub owner_customer_id: Option<Uuid>,
    pub redeemed_by: Option<Uuid>,
    pub expires_at: DateTime<Utc>,
    pub used_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Insertable)]
#[diesel(table_name = qr_codes)]
pub struct InsertQrCodeEntity {
    pub token: String,
    pub kind: String,
    pub origin: String,
    pub points: i64,
    pub breakdown: Option<serde_json::Value>,
    pub status: String,
    pub batch_id: Option<Uuid>,
    pub owner_customer_id: Option<Uuid>,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}
