use std::{collections::HashMap, sync::Arc};

use crates::domain::{
    repositories::{
        cached_prices::CachedPriceRepository, custom_prices::CustomPriceRepository,
        price_sources::PriceSourceRepository,
    },
    value_objects::{
        cached_prices::{CachedPriceDto, PriceTickDto, build_snapshot},
        custom_prices::normalize_price_code,
        enums::price_source_kinds::PriceSourceKind,
        price_sources::PriceSourceDto,
    },
};
use tracing::debug;
use uuid::Uuid;

use super::UseCaseResult;
use crate::axum_http::error_responses::AppError;

/// Read side of the price cache. The worker is the only writer.
pub struct PriceUseCase<D, C, S>
where
    D: CustomPriceRepository + Send + Sync + 'static,
    C: CachedPriceRepository + Send + Sync + 'static,
    S: PriceSourceRepository + Send + Sync + 'static,
{
    custom_price_repository: Arc<D>,
    cached_price_repository: Arc<C>,
    price_source_repository: Arc<S>,
}

impl<D, C, S> PriceUseCase<D, C, S>
where
    D: CustomPriceRepository + Send + Sync + 'static,
    C: CachedPriceRepository + Send + Sync + 'static,
    S: PriceSourceRepository + Send + Sync + 'static,
{
    pub fn new(
        custom_price_repository: Arc<D>,
        cached_price_repository: Arc<C>,
        price_source_repository: Arc<S>,
    ) -> Self {
        Self {
            custom_price_repository,
            cached_price_repository,
            price_source_repository,
        }
    }

    pub async fn list_prices(&self) -> UseCaseResult<Vec<PriceTickDto>> {
        let definitions = self.custom_price_repository.list_all().await?;
        let cache = self.cached_price_repository.list_all().await?;

        let snapshot = build_snapshot(&definitions, &cache);
        debug!(count = snapshot.len(), "prices: snapshot listed");
        Ok(snapshot)
    }

    pub async fn get_price(&self, code: &str) -> UseCaseResult<PriceTickDto> {
        let code = normalize_price_code(code).map_err(AppError::BadRequest)?;

        let definition = self
            .custom_price_repository
            .find_by_code(code.clone())
            .await?
            .filter(|definition| definition.is_visible)
            .ok_or_else(|| AppError::NotFound(format!("price {} not found", code)))?;

        let cached = self
            .cached_price_repository
            .find_by_custom_price_id(definition.id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("price {} has not been computed yet", code)))?;

        Ok(PriceTickDto::new(&definition, &cached))
    }

    pub async fn list_cached(&self) -> UseCaseResult<Vec<CachedPriceDto>> {
        let definitions = self.custom_price_repository.list_all().await?;
        let visibility: HashMap<Uuid, (i32, bool)> = definitions
            .iter()
            .map(|definition| (definition.id, (definition.sort_order, definition.is_visible)))
            .collect();

        let mut cache = self.cached_price_repository.list_all().await?;
        cache.sort_by(|a, b| {
            let a_order = visibility.get(&a.custom_price_id).map(|(order, _)| *order);
            let b_order = visibility.get(&b.custom_price_id).map(|(order, _)| *order);
            a_order.cmp(&b_order).then_with(|| a.code.cmp(&b.code))
        });

        Ok(cache
            .into_iter()
            .map(|cached| {
                let is_visible = visibility
                    .get(&cached.custom_price_id)
                    .map(|(_, visible)| *visible)
                    .unwrap_or(false);
                CachedPriceDto::new(cached, is_visible)
            })
            .collect())
    }

    pub async fn list_sources(
        &self,
        source: Option<PriceSourceKind>,
    ) -> UseCaseResult<Vec<PriceSourceDto>> {
        let entries = self.price_source_repository.list(source).await?;
        Ok(entries.into_iter().map(PriceSourceDto::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};
    use crates::domain::{
        entities::{
            cached_prices::CachedPriceEntity, custom_prices::CustomPriceEntity,
            price_sources::PriceSourceEntity,
        },
        repositories::{
            cached_prices::MockCachedPriceRepository, custom_prices::MockCustomPriceRepository,
            price_sources::MockPriceSourceRepository,
        },
        value_objects::{
            custom_prices::{PriceLeg, SourceRef},
            enums::price_fields::PriceField,
        },
    };
    use mockall::predicate::eq;

    fn leg(code: &str) -> PriceLeg {
        PriceLeg {
            primary: SourceRef {
                code: code.to_string(),
                field: PriceField::Sell,
                multiplier: 1.0,
                addition: 0.0,
            },
            fallback: None,
        }
    }

    fn definition(code: &str, sort_order: i32, is_visible: bool) -> CustomPriceEntity {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
        CustomPriceEntity {
            id: Uuid::new_v4(),
            code: code.to_string(),
            name: format!("{} name", code),
            group_key: Some("gold".to_string()),
            buy_rule: leg("HAS"),
            sell_rule: leg("HAS"),
            sort_order,
            decimals: 2,
            is_visible,
            created_at: now,
            updated_at: now,
        }
    }

    fn cached(definition: &CustomPriceEntity, sell: f64) -> CachedPriceEntity {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
        CachedPriceEntity {
            custom_price_id: definition.id,
            code: definition.code.clone(),
            buy: sell - 10.0,
            sell,
            change: 0.0,
            change_percent: 0.0,
            direction: "same".to_string(),
            buy_high: sell - 10.0,
            buy_high_at: now,
            buy_low: sell - 10.0,
            buy_low_at: now,
            sell_high: sell,
            sell_high_at: now,
            sell_low: sell,
            sell_low_at: now,
            stats_date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            computed_at: now,
        }
    }

    fn usecase(
        definitions: MockCustomPriceRepository,
        cache: MockCachedPriceRepository,
    ) -> PriceUseCase<MockCustomPriceRepository, MockCachedPriceRepository, MockPriceSourceRepository>
    {
        PriceUseCase::new(
            Arc::new(definitions),
            Arc::new(cache),
            Arc::new(MockPriceSourceRepository::new()),
        )
    }

    #[tokio::test]
    async fn list_prices_returns_visible_prices_in_display_order() {
        let gram = definition("GRAM", 2, true);
        let quarter = definition("QUARTER", 1, true);
        let hidden = definition("HIDDEN", 0, false);
        let cache = vec![
            cached(&gram, 3000.0),
            cached(&quarter, 5000.0),
            cached(&hidden, 1.0),
        ];
        let definitions = vec![gram, quarter, hidden];

        let mut custom_prices = MockCustomPriceRepository::new();
        custom_prices.expect_list_all().returning(move || {
            let definitions = definitions.clone();
            Box::pin(async move { Ok(definitions) })
        });
        let mut cached_prices = MockCachedPriceRepository::new();
        cached_prices.expect_list_all().returning(move || {
            let cache = cache.clone();
            Box::pin(async move { Ok(cache) })
        });

        let prices = usecase(custom_prices, cached_prices)
            .list_prices()
            .await
            .unwrap();

        let codes: Vec<&str> = prices.iter().map(|price| price.code.as_str()).collect();
        assert_eq!(codes, vec!["QUARTER", "GRAM"]);
    }

    #[tokio::test]
    async fn get_price_hides_invisible_definitions() {
        let hidden = definition("HIDDEN", 0, false);

        let mut custom_prices = MockCustomPriceRepository::new();
        custom_prices
            .expect_find_by_code()
            .with(eq("HIDDEN".to_string()))
            .returning(move |_| {
                let hidden = hidden.clone();
                Box::pin(async move { Ok(Some(hidden)) })
            });

        let result = usecase(custom_prices, MockCachedPriceRepository::new())
            .get_price("hidden")
            .await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn get_price_joins_definition_metadata() {
        let gram = definition("GRAM", 1, true);
        let row = cached(&gram, 3050.5);

        let gram_id = gram.id;

        let mut custom_prices = MockCustomPriceRepository::new();
        custom_prices.expect_find_by_code().returning(move |_| {
            let gram = gram.clone();
            Box::pin(async move { Ok(Some(gram)) })
        });
        let mut cached_prices = MockCachedPriceRepository::new();
        cached_prices
            .expect_find_by_custom_price_id()
            .with(eq(gram_id))
            .returning(move |_| {
                let row = row.clone();
                Box::pin(async move { Ok(Some(row)) })
            });

        let price = usecase(custom_prices, cached_prices)
            .get_price("gram")
            .await
            .unwrap();

        assert_eq!(price.name, "GRAM name");
        assert_eq!(price.sell, 3050.5);
    }

    #[tokio::test]
    async fn get_price_follows_a_renamed_definition() {
        let mut renamed = definition("GRAM", 1, true);
        let stale = cached(&renamed, 3050.5);
        renamed.code = "GRAM_24K".to_string();
        let renamed_id = renamed.id;

        let mut custom_prices = MockCustomPriceRepository::new();
        custom_prices
            .expect_find_by_code()
            .with(eq("GRAM_24K".to_string()))
            .returning(move |_| {
                let renamed = renamed.clone();
                Box::pin(async move { Ok(Some(renamed)) })
            });
        let mut cached_prices = MockCachedPriceRepository::new();
        cached_prices
            .expect_find_by_custom_price_id()
            .with(eq(renamed_id))
            .times(1)
            .returning(move |_| {
                let stale = stale.clone();
                Box::pin(async move { Ok(Some(stale)) })
            });

        let price = usecase(custom_prices, cached_prices)
            .get_price("gram_24k")
            .await
            .unwrap();

        assert_eq!(price.code, "GRAM_24K");
        assert_eq!(price.sell, 3050.5);
    }

    #[tokio::test]
    async fn list_cached_includes_hidden_rows() {
        let hidden = definition("HIDDEN", 5, false);
        let row = cached(&hidden, 10.0);
        let definitions = vec![hidden];

        let mut custom_prices = MockCustomPriceRepository::new();
        custom_prices.expect_list_all().returning(move || {
            let definitions = definitions.clone();
            Box::pin(async move { Ok(definitions) })
        });
        let mut cached_prices = MockCachedPriceRepository::new();
        cached_prices.expect_list_all().returning(move || {
            let row = row.clone();
            Box::pin(async move { Ok(vec![row]) })
        });

        let rows = usecase(custom_prices, cached_prices)
            .list_cached()
            .await
            .unwrap();

        assert_eq!(rows.len(), 1);
        assert!(!rows[0].is_visible);
    }

    #[tokio::test]
    async fn list_sources_filters_by_source() {
        let fetched_at = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
        let mut sources = MockPriceSourceRepository::new();
        sources
            .expect_list()
            .with(eq(Some(PriceSourceKind::Fallback)))
            .returning(move |_| {
                Box::pin(async move {
                    Ok(vec![PriceSourceEntity {
                        source: "fallback".to_string(),
                        code: "HAS".to_string(),
                        name: "Has Altin".to_string(),
                        buy: 2990.0,
                        sell: 3000.0,
                        fetched_at,
                    }])
                })
            });

        let usecase = PriceUseCase::new(
            Arc::new(MockCustomPriceRepository::new()),
            Arc::new(MockCachedPriceRepository::new()),
            Arc::new(sources),
        );

        let entries = usecase
            .list_sources(Some(PriceSourceKind::Fallback))
            .await
            .unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].code, "HAS");
    }
}
