use chrono::{DateTime, FixedOffset, NaiveDate, Utc};

use crate::domain::{
    entities::{cached_prices::CachedPriceEntity, custom_prices::CustomPriceEntity},
    value_objects::{enums::price_directions::PriceDirection, price_sources::PriceTable},
};

/// Both sides of a custom price after the linear transform, before rounding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedQuote {
    pub buy: f64,
    pub sell: f64,
}

/// Resolves buy and sell independently. `None` if either side has no usable source.
pub fn resolve_quote(
    definition: &CustomPriceEntity,
    primary: &PriceTable,
    fallback: &PriceTable,
) -> Option<ResolvedQuote> {
    let buy = definition.buy_rule.resolve(primary, fallback)?;
    let sell = definition.sell_rule.resolve(primary, fallback)?;
    Some(ResolvedQuote { buy, sell })
}

/// Half-away-from-zero rounding to `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals.clamp(0, 10));
    (value * factor).round() / factor
}

/// Calendar day of `now` in the zone whose midnight resets the daily statistics.
pub fn trading_day(now: DateTime<Utc>, day_offset: FixedOffset) -> NaiveDate {
    now.with_timezone(&day_offset).date_naive()
}

/// Builds the next cache record for a definition from a freshly resolved quote.
///
/// Direction and change compare the new sell with the previous cached sell. Daily
/// high/low are carried over while `stats_date` is still today and reset otherwise.
pub fn roll_cached_price(
    definition: &CustomPriceEntity,
    quote: ResolvedQuote,
    previous: Option<&CachedPriceEntity>,
    now: DateTime<Utc>,
    day_offset: FixedOffset,
) -> CachedPriceEntity {
    let buy = round_to(quote.buy, definition.decimals);
    let sell = round_to(quote.sell, definition.decimals);
    let today = trading_day(now, day_offset);

    let (change, change_percent, direction) = match previous {
        Some(previous) => {
            let change = round_to(sell - previous.sell, definition.decimals);
            let change_percent = if previous.sell != 0.0 {
                round_to((sell - previous.sell) / previous.sell * 100.0, 2)
            } else {
                0.0
            };
            (
                change,
                change_percent,
                PriceDirection::between(previous.sell, sell),
            )
        }
        None => (0.0, 0.0, PriceDirection::Same),
    };

    let mut next = CachedPriceEntity {
        custom_price_id: definition.id,
        code: definition.code.clone(),
        buy,
        sell,
        change,
        change_percent,
        direction: direction.to_string(),
        buy_high: buy,
        buy_high_at: now,
        buy_low: buy,
        buy_low_at: now,
        sell_high: sell,
        sell_high_at: now,
        sell_low: sell,
        sell_low_at: now,
        stats_date: today,
        computed_at: now,
    };

    if let Some(previous) = previous.filter(|previous| previous.stats_date == today) {
        if buy <= previous.buy_high {
            next.buy_high = previous.buy_high;
            next.buy_high_at = previous.buy_high_at;
        }
        if buy >= previous.buy_low {
            next.buy_low = previous.buy_low;
            next.buy_low_at = previous.buy_low_at;
        }
        if sell <= previous.sell_high {
            next.sell_high = previous.sell_high;
            next.sell_high_at = previous.sell_high_at;
        }
        if sell >= previous.sell_low {
            next.sell_low = previous.sell_low;
            next.sell_low_at = previous.sell_low_at;
        }
    }

    next
}

/// True when the published values differ from the previous record.
pub fn has_moved(previous: Option<&CachedPriceEntity>, next: &CachedPriceEntity) -> bool {
    match previous {
        Some(previous) => previous.buy != next.buy || previous.sell != next.sell,
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::{
        custom_prices::{PriceLeg, SourceRef},
        enums::price_fields::PriceField,
        price_sources::SourceQuote,
    };
    use chrono::{Duration, TimeZone};
    use uuid::Uuid;

    fn istanbul() -> FixedOffset {
        FixedOffset::east_opt(3 * 3600).unwrap()
    }

    fn leg(code: &str, field: PriceField, multiplier: f64) -> PriceLeg {
        PriceLeg {
            primary: SourceRef {
                code: code.to_string(),
                field,
                multiplier,
                addition: 0.0,
            },
            fallback: None,
        }
    }

    fn definition() -> CustomPriceEntity {
        let now = Utc::now();
        CustomPriceEntity {
            id: Uuid::new_v4(),
            code: "CEYREK".to_string(),
            name: "Çeyrek Altın".to_string(),
            group_key: Some("gold".to_string()),
            buy_rule: leg("HAS", PriceField::Buy, 1.6),
            sell_rule: leg("HAS", PriceField::Sell, 1.64),
            sort_order: 1,
            decimals: 2,
            is_visible: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn resolves_both_sides_independently() {
        let primary = PriceTable::new(vec![SourceQuote {
            code: "HAS".to_string(),
            name: "Has".to_string(),
            buy: 1000.0,
            sell: 1010.0,
        }]);

        let quote = resolve_quote(&definition(), &primary, &PriceTable::default()).unwrap();
        assert_eq!(quote.buy, 1600.0);
        assert!((quote.sell - 1656.4).abs() < 1e-9);
    }

    #[test]
    fn missing_side_skips_the_definition() {
        let mut def = definition();
        def.sell_rule = leg("USDTRY", PriceField::Sell, 1.0);
        let primary = PriceTable::new(vec![SourceQuote {
            code: "HAS".to_string(),
            name: "Has".to_string(),
            buy: 1000.0,
            sell: 1010.0,
        }]);

        assert!(resolve_quote(&def, &primary, &PriceTable::default()).is_none());
    }

    #[test]
    fn rounds_half_away_from_zero() {
        assert_eq!(round_to(1.005_000_1, 2), 1.01);
        assert_eq!(round_to(2.344, 2), 2.34);
        assert_eq!(round_to(-2.345_000_1, 2), -2.35);
        assert_eq!(round_to(1234.5, 0), 1235.0);
    }

    #[test]
    fn first_record_is_flat_and_seeds_extremes() {
        let now = Utc.with_ymd_and_hms(2026, 3, 10, 9, 0, 0).unwrap();
        let next = roll_cached_price(
            &definition(),
            ResolvedQuote {
                buy: 4100.123,
                sell: 4150.456,
            },
            None,
            now,
            istanbul(),
        );

        assert_eq!(next.buy, 4100.12);
        assert_eq!(next.sell, 4150.46);
        assert_eq!(next.direction, "same");
        assert_eq!(next.change, 0.0);
        assert_eq!(next.change_percent, 0.0);
        assert_eq!((next.sell_high, next.sell_low), (4150.46, 4150.46));
        assert_eq!(next.sell_high_at, now);
        assert_eq!(next.stats_date, NaiveDate::from_ymd_opt(2026, 3, 10).unwrap());
    }

    #[test]
    fn direction_and_percentage_follow_sell_side() {
        let def = definition();
        let t0 = Utc.with_ymd_and_hms(2026, 3, 10, 9, 0, 0).unwrap();
        let first = roll_cached_price(
            &def,
            ResolvedQuote {
                buy: 3900.0,
                sell: 4000.0,
            },
            None,
            t0,
            istanbul(),
        );

        let up = roll_cached_price(
            &def,
            ResolvedQuote {
                buy: 3890.0,
                sell: 4040.0,
            },
            Some(&first),
            t0 + Duration::seconds(10),
            istanbul(),
        );
        assert_eq!(up.direction, "up");
        assert_eq!(up.change, 40.0);
        assert_eq!(up.change_percent, 1.0);

        let down = roll_cached_price(
            &def,
            ResolvedQuote {
                buy: 3890.0,
                sell: 3999.9,
            },
            Some(&up),
            t0 + Duration::seconds(20),
            istanbul(),
        );
        assert_eq!(down.direction, "down");
        assert_eq!(down.change, -40.1);

        let same = roll_cached_price(
            &def,
            ResolvedQuote {
                buy: 3890.0,
                sell: 3999.9,
            },
            Some(&down),
            t0 + Duration::seconds(30),
            istanbul(),
        );
        assert_eq!(same.direction, "same");
        assert_eq!(same.change, 0.0);
    }

    #[test]
    fn extremes_only_move_on_strict_improvement() {
        let def = definition();
        let t0 = Utc.with_ymd_and_hms(2026, 3, 10, 9, 0, 0).unwrap();
        let t1 = t0 + Duration::minutes(1);
        let t2 = t0 + Duration::minutes(2);
        let t3 = t0 + Duration::minutes(3);

        let first = roll_cached_price(
            &def,
            ResolvedQuote {
                buy: 100.0,
                sell: 110.0,
            },
            None,
            t0,
            istanbul(),
        );
        let higher = roll_cached_price(
            &def,
            ResolvedQuote {
                buy: 105.0,
                sell: 115.0,
            },
            Some(&first),
            t1,
            istanbul(),
        );
        assert_eq!((higher.buy_high, higher.buy_high_at), (105.0, t1));
        assert_eq!((higher.buy_low, higher.buy_low_at), (100.0, t0));

        let equal_high = roll_cached_price(
            &def,
            ResolvedQuote {
                buy: 105.0,
                sell: 115.0,
            },
            Some(&higher),
            t2,
            istanbul(),
        );
        assert_eq!(equal_high.sell_high_at, t1);

        let lower = roll_cached_price(
            &def,
            ResolvedQuote {
                buy: 95.0,
                sell: 108.0,
            },
            Some(&equal_high),
            t3,
            istanbul(),
        );
        assert_eq!((lower.buy_low, lower.buy_low_at), (95.0, t3));
        assert_eq!((lower.sell_low, lower.sell_low_at), (108.0, t3));
        assert_eq!((lower.sell_high, lower.sell_high_at), (115.0, t1));
    }

    #[test]
    fn extremes_reset_at_local_midnight() {
        let def = definition();
        // 20:59 UTC is 23:59 in UTC+3, 21:01 UTC is already the next day there.
        let before = Utc.with_ymd_and_hms(2026, 3, 10, 20, 59, 0).unwrap();
        let after = Utc.with_ymd_and_hms(2026, 3, 10, 21, 1, 0).unwrap();

        let evening = roll_cached_price(
            &def,
            ResolvedQuote {
                buy: 120.0,
                sell: 130.0,
            },
            None,
            before,
            istanbul(),
        );
        let next_day = roll_cached_price(
            &def,
            ResolvedQuote {
                buy: 100.0,
                sell: 110.0,
            },
            Some(&evening),
            after,
            istanbul(),
        );

        assert_eq!(next_day.stats_date, NaiveDate::from_ymd_opt(2026, 3, 11).unwrap());
        assert_eq!((next_day.buy_high, next_day.buy_high_at), (100.0, after));
        assert_eq!((next_day.sell_low, next_day.sell_low_at), (110.0, after));
        // Direction still compares against the last cached sell.
        assert_eq!(next_day.direction, "down");
    }

    #[test]
    fn movement_detection() {
        let def = definition();
        let now = Utc::now();
        let first = roll_cached_price(
            &def,
            ResolvedQuote {
                buy: 1.0,
                sell: 2.0,
            },
            None,
            now,
            istanbul(),
        );
        let same = roll_cached_price(
            &def,
            ResolvedQuote {
                buy: 1.0,
                sell: 2.0,
            },
            Some(&first),
            now,
            istanbul(),
        );

        assert!(has_moved(None, &first));
        assert!(!has_moved(Some(&first), &same));
    }
}
