use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::{
    domain::value_objects::custom_prices::{PriceLeg, SourceRef},
    infra::db::postgres::schema::custom_prices,
};

#[derive(Debug, Clone, PartialEq)]
pub struct CustomPriceEntity {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub group_key: Option<String>,
    pub buy_rule: PriceLeg,
    pub sell_rule: PriceLeg,
    pub sort_order: i32,
    pub decimals: i32,
    pub is_visible: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Raw row used for Diesel queries. Rules stay as JSON and are parsed into PriceLeg.
#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = custom_prices)]
pub struct CustomPriceRow {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub group_key: Option<String>,
    pub buy_rule: serde_json::Value,
    pub sell_rule: serde_json::Value,
    pub sort_order: i32,
    pub decimals: i32,
    pub is_visible: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CustomPriceRow> for CustomPriceEntity {
    fn from(value: CustomPriceRow) -> Self {
        // A rule that no longer parses resolves to nothing, so the price is skipped
        // instead of being computed from a half-read configuration.
        let buy_rule = serde_json::from_value(value.buy_rule).unwrap_or_else(|_| unparsable_leg());
        let sell_rule =
            serde_json::from_value(value.sell_rule).unwrap_or_else(|_| unparsable_leg());

        Self {
            id: value.id,
            code: value.code,
            name: value.name,
            group_key: value.group_key,
            buy_rule,
            sell_rule,
            sort_order: value.sort_order,
            decimals: value.decimals,
            is_visible: value.is_visible,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

fn unparsable_leg() -> PriceLeg {
    PriceLeg {
        primary: SourceRef::unresolvable(),
        fallback: None,
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = custom_prices)]
pub struct InsertCustomPriceEntity {
    pub code: String,
    pub name: String,
    pub group_key: Option<String>,
    pub buy_rule: serde_json::Value,
    pub sell_rule: serde_json::Value,
    pub sort_order: i32,
    pub decimals: i32,
    pub is_visible: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = custom_prices)]
pub struct UpdateCustomPriceEntity {
    pub code: String,
    pub name: String,
    pub group_key: Option<String>,
    pub buy_rule: serde_json::Value,
    pub sell_rule: serde_json::Value,
    pub decimals: i32,
    pub is_visible: bool,
    pub updated_at: DateTime<Utc>,
}
