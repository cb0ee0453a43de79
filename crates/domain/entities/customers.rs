use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infra::db::postgres::schema::customers;

#[derive(Debug, Clone, PartialEq, Identifiable, Selectable, Queryable)]
#[diesel(table_name = customers)]
pub struct CustomerEntity {
    pub id: Uuid,
    pub phone: String,
    pub name: Option<String>,
    pub qr_identifier: String,
    pub points_earned: i64,
    pub points_spent: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CustomerEntity {
    pub fn balance(&self) -> i64 {
        (self.points_earned - self.points_spent).max(0)
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = customers)]
pub struct InsertCustomerEntity {
    pub phone: String,
    pub name: Option<String>,
    pub qr_identifier: String,
    pub points_earned: i64,
    pub points_spent: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
