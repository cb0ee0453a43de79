use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::{
    entities::price_sources::PriceSourceEntity,
    value_objects::enums::price_fields::PriceField,
};

/// One row of an upstream price feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceQuote {
    pub code: String,
    pub name: String,
    pub buy: f64,
    pub sell: f64,
}

impl SourceQuote {
    pub fn field(&self, field: PriceField) -> f64 {
        match field {
            PriceField::Buy => self.buy,
            PriceField::Sell => self.sell,
        }
    }
}

impl From<PriceSourceEntity> for SourceQuote {
    fn from(value: PriceSourceEntity) -> Self {
        Self {
            code: value.code,
            name: value.name,
            buy: value.buy,
            sell: value.sell,
        }
    }
}

/// Quotes of a single feed indexed by code.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceTable {
    quotes: HashMap<String, SourceQuote>,
}

impl PriceTable {
    pub fn new(quotes: Vec<SourceQuote>) -> Self {
        let quotes = quotes
            .into_iter()
            .map(|quote| (quote.code.clone(), quote))
            .collect();
        Self { quotes }
    }

    pub fn get(&self, code: &str) -> Option<&SourceQuote> {
        self.quotes.get(code)
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PriceSourceDto {
    pub source: String,
    pub code: String,
    pub name: String,
    pub buy: f64,
    pub sell: f64,
    pub fetched_at: chrono::DateTime<chrono::Utc>,
}

impl From<PriceSourceEntity> for PriceSourceDto {
    fn from(value: PriceSourceEntity) -> Self {
        Self {
            source: value.source,
            code: value.code,
            name: value.name,
            buy: value.buy,
            sell: value.sell,
            fetched_at: value.fetched_at,
        }
    }
}

/// Parses a quoted value from a feed. Numbers pass through; strings may use `,` as
/// decimal separator and `.` as thousands separator when both appear ("2.345,67").
pub fn parse_quote_value(raw: &serde_json::Value) -> Option<f64> {
    let value = match raw {
        serde_json::Value::Number(number) => number.as_f64()?,
        serde_json::Value::String(text) => parse_decimal_text(text)?,
        _ => return None,
    };

    value.is_finite().then_some(value)
}

fn parse_decimal_text(text: &str) -> Option<f64> {
    let cleaned: String = text
        .trim()
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '\'')
        .collect();
    if cleaned.is_empty() {
        return None;
    }

    let normalized = match (cleaned.rfind(','), cleaned.rfind('.')) {
        (Some(comma), Some(dot)) if comma > dot => cleaned.replace('.', "").replace(',', "."),
        (Some(_), Some(_)) => cleaned.replace(',', ""),
        (Some(_), None) => cleaned.replace(',', "."),
        _ => cleaned,
    };

    normalized.parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numbers_pass_through() {
        assert_eq!(parse_quote_value(&json!(2345.5)), Some(2345.5));
        assert_eq!(parse_quote_value(&json!(3)), Some(3.0));
    }

    #[test]
    fn turkish_formatted_strings_are_parsed() {
        assert_eq!(parse_quote_value(&json!("2.345,67")), Some(2345.67));
        assert_eq!(parse_quote_value(&json!("34,125")), Some(34.125));
        assert_eq!(parse_quote_value(&json!(" 4100.10 ")), Some(4100.10));
    }

    #[test]
    fn english_thousands_separators_are_parsed() {
        assert_eq!(parse_quote_value(&json!("2,345.67")), Some(2345.67));
    }

    #[test]
    fn garbage_is_rejected() {
        assert_eq!(parse_quote_value(&json!("")), None);
        assert_eq!(parse_quote_value(&json!("n/a")), None);
        assert_eq!(parse_quote_value(&json!(null)), None);
        assert_eq!(parse_quote_value(&json!(true)), None);
    }

    #[test]
    fn table_lookup_by_code() {
        let table = PriceTable::new(vec![SourceQuote {
            code: "HAS".to_string(),
            name: "Has Altın".to_string(),
            buy: 2400.0,
            sell: 2410.0,
        }]);

        assert_eq!(table.len(), 1);
        assert_eq!(table.get("HAS").map(|q| q.field(PriceField::Sell)), Some(2410.0));
        assert!(table.get("USDTRY").is_none());
    }
}
