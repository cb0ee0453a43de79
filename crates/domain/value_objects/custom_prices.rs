use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    entities::custom_prices::CustomPriceEntity,
    value_objects::{
        enums::price_fields::PriceField,
        price_sources::PriceTable,
    },
};

/// Reads one field of one upstream code and applies `raw * multiplier + addition`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceRef {
    pub code: String,
    pub field: PriceField,
    #[serde(default = "default_multiplier")]
    pub multiplier: f64,
    #[serde(default)]
    pub addition: f64,
}

fn default_multiplier() -> f64 {
    1.0
}

impl SourceRef {
    /// A reference that never resolves. Used when a stored rule cannot be parsed.
    pub fn unresolvable() -> Self {
        Self {
            code: String::new(),
            field: PriceField::Sell,
            multiplier: 1.0,
            addition: 0.0,
        }
    }

    /// `None` when the code is missing from the table or its raw value is not positive.
    pub fn read(&self, table: &PriceTable) -> Option<f64> {
        let raw = table.get(&self.code)?.field(self.field);
        if !raw.is_finite() || raw <= 0.0 {
            return None;
        }

        let result = raw * self.multiplier + self.addition;
        result.is_finite().then_some(result)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.code.trim().is_empty() {
            return Err("source code must not be empty".to_string());
        }
        if !self.multiplier.is_finite() || self.multiplier == 0.0 {
            return Err(format!(
                "multiplier for {} must be a finite non-zero number",
                self.code
            ));
        }
        if !self.addition.is_finite() {
            return Err(format!("addition for {} must be a finite number", self.code));
        }
        Ok(())
    }
}

/// How one side (buy or sell) of a custom price is derived. The primary reference reads
/// the primary feed, the fallback reference reads the fallback feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceLeg {
    pub primary: SourceRef,
    #[serde(default)]
    pub fallback: Option<SourceRef>,
}

impl PriceLeg {
    pub fn resolve(&self, primary: &PriceTable, fallback: &PriceTable) -> Option<f64> {
        self.primary.read(primary).or_else(|| {
            self.fallback
                .as_ref()
                .and_then(|source_ref| source_ref.read(fallback))
        })
    }

    pub fn validate(&self) -> Result<(), String> {
        self.primary.validate()?;
        if let Some(fallback) = &self.fallback {
            fallback.validate()?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InsertCustomPriceModel {
    pub code: String,
    pub name: String,
    pub group_key: Option<String>,
    pub buy_rule: PriceLeg,
    pub sell_rule: PriceLeg,
    pub sort_order: Option<i32>,
    pub decimals: Option<i32>,
    pub is_visible: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UpdateCustomPriceModel {
    pub code: String,
    pub name: String,
    pub group_key: Option<String>,
    pub buy_rule: PriceLeg,
    pub sell_rule: PriceLeg,
    pub decimals: i32,
    pub is_visible: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReorderItem {
    pub id: Uuid,
    pub sort_order: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct CustomPriceDto {
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

impl From<CustomPriceEntity> for CustomPriceDto {
    fn from(value: CustomPriceEntity) -> Self {
        Self {
            id: value.id,
            code: value.code,
            name: value.name,
            group_key: value.group_key,
            buy_rule: value.buy_rule,
            sell_rule: value.sell_rule,
            sort_order: value.sort_order,
            decimals: value.decimals,
            is_visible: value.is_visible,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

pub const MAX_DECIMALS: i32 = 6;

/// Upper-cases and checks a custom price code (`[A-Z0-9_]+`).
pub fn normalize_price_code(raw: &str) -> Result<String, String> {
    let code = raw.trim().to_uppercase();
    if code.is_empty() {
        return Err("code must not be empty".to_string());
    }
    if !code
        .chars()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
    {
        return Err(format!("code {} may only contain A-Z, 0-9 and _", code));
    }
    Ok(code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::price_sources::SourceQuote;

    fn table(entries: &[(&str, f64, f64)]) -> PriceTable {
        PriceTable::new(
            entries
                .iter()
                .map(|(code, buy, sell)| SourceQuote {
                    code: code.to_string(),
                    name: code.to_string(),
                    buy: *buy,
                    sell: *sell,
                })
                .collect(),
        )
    }

    fn source_ref(code: &str, field: PriceField, multiplier: f64, addition: f64) -> SourceRef {
        SourceRef {
            code: code.to_string(),
            field,
            multiplier,
            addition,
        }
    }

    #[test]
    fn applies_linear_transform_to_selected_field() {
        let primary = table(&[("HAS", 2400.0, 2420.0)]);
        let quarter = source_ref("HAS", PriceField::Sell, 1.75, 50.0);

        assert_eq!(quarter.read(&primary), Some(2420.0 * 1.75 + 50.0));

        let buy_side = source_ref("HAS", PriceField::Buy, 1.0, -10.0);
        assert_eq!(buy_side.read(&primary), Some(2390.0));
    }

    #[test]
    fn falls_back_when_primary_code_is_missing() {
        let primary = table(&[("USDTRY", 34.1, 34.2)]);
        let fallback = table(&[("HAS", 2400.0, 2410.0)]);
        let leg = PriceLeg {
            primary: source_ref("HAS", PriceField::Buy, 1.0, 0.0),
            fallback: Some(source_ref("HAS", PriceField::Buy, 1.0, 5.0)),
        };

        assert_eq!(leg.resolve(&primary, &fallback), Some(2405.0));
    }

    #[test]
    fn falls_back_when_primary_value_is_not_positive() {
        let primary = table(&[("HAS", 0.0, 2410.0)]);
        let fallback = table(&[("ALTIN", 2399.0, 2409.0)]);
        let leg = PriceLeg {
            primary: source_ref("HAS", PriceField::Buy, 1.0, 0.0),
            fallback: Some(source_ref("ALTIN", PriceField::Buy, 2.0, 0.0)),
        };

        assert_eq!(leg.resolve(&primary, &fallback), Some(4798.0));
    }

    #[test]
    fn fallback_reads_only_the_fallback_table() {
        let primary = table(&[("ALTIN", 2399.0, 2409.0)]);
        let fallback = table(&[]);
        let leg = PriceLeg {
            primary: source_ref("HAS", PriceField::Sell, 1.0, 0.0),
            fallback: Some(source_ref("ALTIN", PriceField::Sell, 1.0, 0.0)),
        };

        assert_eq!(leg.resolve(&primary, &fallback), None);
    }

    #[test]
    fn unresolved_without_fallback() {
        let primary = table(&[("HAS", -1.0, -1.0)]);
        let leg = PriceLeg {
            primary: source_ref("HAS", PriceField::Sell, 1.0, 0.0),
            fallback: None,
        };

        assert_eq!(leg.resolve(&primary, &PriceTable::default()), None);
    }

    #[test]
    fn rule_json_defaults_multiplier_and_addition() {
        let leg: PriceLeg =
            serde_json::from_str(r#"{"primary":{"code":"HAS","field":"sell"}}"#).unwrap();

        assert_eq!(leg.primary.multiplier, 1.0);
        assert_eq!(leg.primary.addition, 0.0);
        assert!(leg.fallback.is_none());
    }

    #[test]
    fn validation_rejects_zero_multiplier_and_empty_code() {
        assert!(source_ref("HAS", PriceField::Buy, 0.0, 0.0).validate().is_err());
        assert!(source_ref(" ", PriceField::Buy, 1.0, 0.0).validate().is_err());
        assert!(
            source_ref("HAS", PriceField::Buy, 1.0, f64::NAN)
                .validate()
                .is_err()
        );
        assert!(source_ref("HAS", PriceField::Buy, 1.0, 0.0).validate().is_ok());
    }

    #[test]
    fn price_codes_are_upper_cased_and_checked() {
        assert_eq!(normalize_price_code(" ceyrek_altin ").unwrap(), "CEYREK_ALTIN");
        assert!(normalize_price_code("").is_err());
        assert!(normalize_price_code("gram-altin").is_err());
    }
}
