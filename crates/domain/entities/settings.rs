use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::infra::db::postgres::schema::settings;

#[derive(Debug, Clone, PartialEq, Selectable, Queryable, Insertable, AsChangeset)]
#[diesel(table_name = settings, primary_key(key))]
pub struct SettingEntity {
    pub key: String,
    pub value: serde_json::Value,
    pub updated_at: DateTime<Utc>,
}
