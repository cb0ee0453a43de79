use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    entities::{cached_prices::CachedPriceEntity, custom_prices::CustomPriceEntity},
    value_objects::enums::price_directions::PriceDirection,
};

/// A cached price joined with the display metadata of its definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceTickDto {
    pub code: String,
    pub name: String,
    pub group_key: Option<String>,
    pub decimals: i32,
    pub sort_order: i32,
    pub buy: f64,
    pub sell: f64,
    pub change: f64,
    pub change_percent: f64,
    pub direction: PriceDirection,
    pub buy_high: f64,
    pub buy_low: f64,
    pub sell_high: f64,
    pub sell_low: f64,
    pub computed_at: DateTime<Utc>,
}

impl PriceTickDto {
    pub fn new(definition: &CustomPriceEntity, cached: &CachedPriceEntity) -> Self {
        Self {
            code: definition.code.clone(),
            name: definition.name.clone(),
            group_key: definition.group_key.clone(),
            decimals: definition.decimals,
            sort_order: definition.sort_order,
            buy: cached.buy,
            sell: cached.sell,
            change: cached.change,
            change_percent: cached.change_percent,
            direction: PriceDirection::from_str(&cached.direction),
            buy_high: cached.buy_high,
            buy_low: cached.buy_low,
            sell_high: cached.sell_high,
            sell_low: cached.sell_low,
            computed_at: cached.computed_at,
        }
    }
}

/// Admin view of a cache row, hidden definitions included.
#[derive(Debug, Clone, Serialize)]
pub struct CachedPriceDto {
    pub custom_price_id: Uuid,
    pub code: String,
    pub is_visible: bool,
    pub buy: f64,
    pub sell: f64,
    pub change: f64,
    pub change_percent: f64,
    pub direction: PriceDirection,
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

impl CachedPriceDto {
    pub fn new(cached: CachedPriceEntity, is_visible: bool) -> Self {
        Self {
            custom_price_id: cached.custom_price_id,
            code: cached.code,
            is_visible,
            buy: cached.buy,
            sell: cached.sell,
            change: cached.change,
            change_percent: cached.change_percent,
            direction: PriceDirection::from_str(&cached.direction),
            buy_high: cached.buy_high,
            buy_high_at: cached.buy_high_at,
            buy_low: cached.buy_low,
            buy_low_at: cached.buy_low_at,
            sell_high: cached.sell_high,
            sell_high_at: cached.sell_high_at,
            sell_low: cached.sell_low,
            sell_low_at: cached.sell_low_at,
            stats_date: cached.stats_date,
            computed_at: cached.computed_at,
        }
    }
}

/// Visible definitions that have a cache entry, ordered by `sort_order` then `code`.
pub fn build_snapshot(
    definitions: &[CustomPriceEntity],
    cache: &[CachedPriceEntity],
) -> Vec<PriceTickDto> {
    let by_id: HashMap<Uuid, &CachedPriceEntity> = cache
        .iter()
        .map(|cached| (cached.custom_price_id, cached))
        .collect();

    let mut ticks: Vec<PriceTickDto> = definitions
        .iter()
        .filter(|definition| definition.is_visible)
        .filter_map(|definition| {
            by_id
                .get(&definition.id)
                .map(|cached| PriceTickDto::new(definition, cached))
        })
        .collect();

    ticks.sort_by(|a, b| {
        a.sort_order
            .cmp(&b.sort_order)
            .then_with(|| a.code.cmp(&b.code))
    });
    ticks
}

/// Server to client frames on the price socket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum PriceSocketMessage {
    #[serde(rename = "prices")]
    Prices(Vec<PriceTickDto>),
    #[serde(rename = "priceUpdate")]
    PriceUpdate(PriceTickDto),
}

impl PriceSocketMessage {
    /// Narrows the frame to the codes a client subscribed to. Empty means everything.
    pub fn filtered(&self, codes: &[String]) -> Option<Self> {
        if codes.is_empty() {
            return Some(self.clone());
        }

        match self {
            PriceSocketMessage::Prices(ticks) => Some(PriceSocketMessage::Prices(
                ticks
                    .iter()
                    .filter(|tick| codes.contains(&tick.code))
                    .cloned()
                    .collect(),
            )),
            PriceSocketMessage::PriceUpdate(tick) => codes
                .contains(&tick.code)
                .then(|| PriceSocketMessage::PriceUpdate(tick.clone())),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SubscribePayload {
    #[serde(default)]
    pub codes: Vec<String>,
}

/// Client to server frames on the price socket.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum PriceSocketCommand {
    Subscribe(SubscribePayload),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::{
        custom_prices::{PriceLeg, SourceRef},
        enums::price_fields::PriceField,
    };
    use serde_json::json;

    fn definition(code: &str, sort_order: i32, is_visible: bool) -> CustomPriceEntity {
        let now = Utc::now();
        let leg = PriceLeg {
            primary: SourceRef {
                code: "HAS".to_string(),
                field: PriceField::Sell,
                multiplier: 1.0,
                addition: 0.0,
            },
            fallback: None,
        };
        CustomPriceEntity {
            id: Uuid::new_v4(),
            code: code.to_string(),
            name: code.to_string(),
            group_key: None,
            buy_rule: leg.clone(),
            sell_rule: leg,
            sort_order,
            decimals: 2,
            is_visible,
            created_at: now,
            updated_at: now,
        }
    }

    fn cached(definition: &CustomPriceEntity, sell: f64) -> CachedPriceEntity {
        let now = Utc::now();
        CachedPriceEntity {
            custom_price_id: definition.id,
            code: definition.code.clone(),
            buy: sell - 10.0,
            sell,
            change: 0.0,
            change_percent: 0.0,
            direction: "up".to_string(),
            buy_high: sell - 10.0,
            buy_high_at: now,
            buy_low: sell - 10.0,
            buy_low_at: now,
            sell_high: sell,
            sell_high_at: now,
            sell_low: sell,
            sell_low_at: now,
            stats_date: now.date_naive(),
            computed_at: now,
        }
    }

    #[test]
    fn snapshot_keeps_visible_entries_in_order() {
        let gram = definition("GRAM", 2, true);
        let ceyrek = definition("CEYREK", 1, true);
        let yarim = definition("YARIM", 1, true);
        let hidden = definition("HIDDEN", 0, false);
        let uncached = definition("NEW", 0, true);

        let cache = vec![
            cached(&gram, 100.0),
            cached(&ceyrek, 200.0),
            cached(&yarim, 300.0),
            cached(&hidden, 400.0),
        ];
        let definitions = vec![gram, ceyrek, yarim, hidden, uncached];

        let codes: Vec<String> = build_snapshot(&definitions, &cache)
            .into_iter()
            .map(|tick| tick.code)
            .collect();
        assert_eq!(codes, vec!["CEYREK", "YARIM", "GRAM"]);
    }

    #[test]
    fn socket_frames_use_event_and_data() {
        let gram = definition("GRAM", 1, true);
        let tick = PriceTickDto::new(&gram, &cached(&gram, 100.0));

        let update = serde_json::to_value(PriceSocketMessage::PriceUpdate(tick.clone())).unwrap();
        assert_eq!(update["event"], "priceUpdate");
        assert_eq!(update["data"]["code"], "GRAM");
        assert_eq!(update["data"]["direction"], "up");

        let prices = serde_json::to_value(PriceSocketMessage::Prices(vec![tick])).unwrap();
        assert_eq!(prices["event"], "prices");
        assert!(prices["data"].is_array());
    }

    #[test]
    fn subscribe_command_is_parsed() {
        let command: PriceSocketCommand = serde_json::from_value(json!({
            "event": "subscribe",
            "data": { "codes": ["GRAM"] }
        }))
        .unwrap();

        assert_eq!(
            command,
            PriceSocketCommand::Subscribe(SubscribePayload {
                codes: vec!["GRAM".to_string()]
            })
        );
    }

    #[test]
    fn filtering_drops_unsubscribed_codes() {
        let gram = definition("GRAM", 1, true);
        let ons = definition("ONS", 2, true);
        let frame = PriceSocketMessage::Prices(vec![
            PriceTickDto::new(&gram, &cached(&gram, 100.0)),
            PriceTickDto::new(&ons, &cached(&ons, 200.0)),
        ]);
        let only_ons = vec!["ONS".to_string()];

        match frame.filtered(&only_ons) {
            Some(PriceSocketMessage::Prices(ticks)) => {
                assert_eq!(ticks.len(), 1);
                assert_eq!(ticks[0].code, "ONS");
            }
            other => panic!("unexpected frame: {:?}", other),
        }

        let update = PriceSocketMessage::PriceUpdate(PriceTickDto::new(&gram, &cached(&gram, 1.0)));
        assert!(update.filtered(&only_ons).is_none());
        assert!(update.filtered(&[]).is_some());
    }
}
