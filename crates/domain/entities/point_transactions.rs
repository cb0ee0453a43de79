use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infra::db::postgres::schema::point_transactions;

#[derive(Debug, Clone, PartialEq, Identifiable, Selectable, Queryable)]
#[diesel(table_name = point_transactions)]
pub struct PointTransactionEntity {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub qr_code_id: Uuid,
    pub kind: String,
    pub points: i64,
    pub balance_after: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = point_transactions)]
pub struct InsertPointTransactionEntity {
    pub customer_id: Uuid,
    pub qr_code_id: Uuid,
    pub kind: String,
    pub points: i64,
    pub balance_after: i64,
    pub created_at: DateTime<Utc>,
}
