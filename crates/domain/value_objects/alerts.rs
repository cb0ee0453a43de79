use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    entities::price_alerts::PriceAlertEntity,
    value_objects::enums::{alert_conditions::AlertCondition, price_fields::PriceField},
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InsertPriceAlertModel {
    pub price_code: String,
    #[serde(default = "default_field")]
    pub field: PriceField,
    pub condition: AlertCondition,
    pub target: f64,
}

fn default_field() -> PriceField {
    PriceField::Sell
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UpdatePriceAlertModel {
    pub field: Option<PriceField>,
    pub condition: Option<AlertCondition>,
    pub target: Option<f64>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PriceAlertDto {
    pub id: Uuid,
    pub price_code: String,
    pub field: String,
    pub condition: String,
    pub target: f64,
    pub is_active: bool,
    pub triggered_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<PriceAlertEntity> for PriceAlertDto {
    fn from(value: PriceAlertEntity) -> Self {
        Self {
            id: value.id,
            price_code: value.price_code,
            field: value.field,
            condition: value.condition,
            target: value.target,
            is_active: value.is_active,
            triggered_at: value.triggered_at,
            created_at: value.created_at,
        }
    }
}

pub fn validate_target(target: f64) -> Result<(), String> {
    if !target.is_finite() || target <= 0.0 {
        return Err("target must be a positive number".to_string());
    }
    Ok(())
}

/// Whether an active alert fires for the given buy/sell pair.
pub fn alert_fires(alert: &PriceAlertEntity, buy: f64, sell: f64) -> bool {
    if !alert.is_active {
        return false;
    }
    let (Ok(field), Ok(condition)) = (
        alert.field.parse::<PriceField>(),
        alert.condition.parse::<AlertCondition>(),
    ) else {
        return false;
    };

    let value = match field {
        PriceField::Buy => buy,
        PriceField::Sell => sell,
    };
    condition.is_met(value, alert.target)
}
