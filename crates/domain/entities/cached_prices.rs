use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infra::db::postgres::schema::cached_prices;

/// Resolved buy/sell pair of one custom price plus its intraday statistics.
#[derive(Debug, Clone, PartialEq, Identifiable, Selectable, Queryable, Insertable, AsChangeset)]
#[diesel(table_name = cached_prices, primary_key(custom_price_id))]
pub struct CachedPriceEntity {
    pub custom_price_id: Uuid,
    pub code: String,
    pub buy: f64,
    pub sell: f64,
    pub change: f64,
    pub change_percent: f64,
    pub direction: String,
    pub buy_high: f64,
    pub buy_high_at: DateTime<Utc>,
    pub buy_low: f64,
    pub buy_low_at: DateTime<Utc>,
    pub sell_high: f64,
    pub sell_high_at: DateTime<Utc>,
    pub sell_low: f64,
    pub sell_low_at: DateTime<Utc>,
    pub stats_date: NaiveDate,
    pub computed_at: DateTime<Utc>,
}
