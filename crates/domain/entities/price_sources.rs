use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::infra::db::postgres::schema::price_sources;

#[derive(Debug, Clone, PartialEq, Selectable, Queryable, Insertable, AsChangeset)]
#[diesel(table_name = price_sources)]
pub struct PriceSourceEntity {
    pub source: String,
    pub code: String,
    pub name: String,
    pub buy: f64,
    pub sell: f64,
    pub fetched_at: DateTime<Utc>,
}
