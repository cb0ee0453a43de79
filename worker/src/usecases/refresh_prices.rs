use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

use anyhow::{Context, Result, bail};
use chrono::{DateTime, FixedOffset, Utc};
use crates::domain::{
    entities::{cached_prices::CachedPriceEntity, price_sources::PriceSourceEntity},
    repositories::{
        cached_prices::CachedPriceRepository, custom_prices::CustomPriceRepository,
        price_alerts::PriceAlertRepository, price_feeds::PriceFeedClient,
        price_publisher::PricePublisher, price_sources::PriceSourceRepository,
    },
    value_objects::{
        alerts::alert_fires,
        cached_prices::{PriceSocketMessage, build_snapshot},
        enums::price_source_kinds::PriceSourceKind,
        price_normalization::{has_moved, resolve_quote, roll_cached_price},
        price_sources::{PriceTable, SourceQuote},
    },
};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefreshReport {
    pub primary_fetched: usize,
    pub fallback_fetched: usize,
    pub updated: usize,
    pub skipped: usize,
    pub alerts_triggered: usize,
}

/// One poll cycle: feeds in, cache and socket frames out. The only writer of the cache.
pub struct RefreshPricesUseCase<D, C, S, A, F, P>
where
    D: CustomPriceRepository + Send + Sync + 'static,
    C: CachedPriceRepository + Send + Sync + 'static,
    S: PriceSourceRepository + Send + Sync + 'static,
    A: PriceAlertRepository + Send + Sync + 'static,
    F: PriceFeedClient + Send + Sync + 'static,
    P: PricePublisher + Send + Sync + 'static,
{
    definitions: Arc<D>,
    cache: Arc<C>,
    sources: Arc<S>,
    alerts: Arc<A>,
    primary_feed: Arc<F>,
    fallback_feed: Option<Arc<F>>,
    publisher: Arc<P>,
    day_offset: FixedOffset,
}

impl<D, C, S, A, F, P> RefreshPricesUseCase<D, C, S, A, F, P>
where
    D: CustomPriceRepository + Send + Sync + 'static,
    C: CachedPriceRepository + Send + Sync + 'static,
    S: PriceSourceRepository + Send + Sync + 'static,
    A: PriceAlertRepository + Send + Sync + 'static,
    F: PriceFeedClient + Send + Sync + 'static,
    P: PricePublisher + Send + Sync + 'static,
{
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        definitions: Arc<D>,
        cache: Arc<C>,
        sources: Arc<S>,
        alerts: Arc<A>,
        primary_feed: Arc<F>,
        fallback_feed: Option<Arc<F>>,
        publisher: Arc<P>,
        day_offset: FixedOffset,
    ) -> Self {
        Self {
            definitions,
            cache,
            sources,
            alerts,
            primary_feed,
            fallback_feed,
            publisher,
            day_offset,
        }
    }

    pub async fn run_once(&self, now: DateTime<Utc>) -> Result<RefreshReport> {
        let primary = self
            .fetch(PriceSourceKind::Primary, self.primary_feed.as_ref())
            .await;
        let fallback = match &self.fallback_feed {
            Some(feed) => Some(self.fetch(PriceSourceKind::Fallback, feed.as_ref()).await),
            None => None,
        };

        let fallback_ok = matches!(fallback, Some(Some(_)));
        if primary.is_none() && !fallback_ok {
            bail!("every configured price feed failed");
        }

        let primary = primary.unwrap_or_default();
        let fallback = fallback.flatten().unwrap_or_default();

        let mut report = RefreshReport {
            primary_fetched: primary.len(),
            fallback_fetched: fallback.len(),
            ..RefreshReport::default()
        };

        self.store_sources(PriceSourceKind::Primary, &primary, now)
            .await?;
        self.store_sources(PriceSourceKind::Fallback, &fallback, now)
            .await?;

        let primary = PriceTable::new(primary);
        let fallback = PriceTable::new(fallback);

        let definitions = self
            .definitions
            .list_all()
            .await
            .context("price_refresh: failed to load definitions")?;
        let mut cache: HashMap<Uuid, CachedPriceEntity> = self
            .cache
            .list_all()
            .await
            .context("price_refresh: failed to load cache")?
            .into_iter()
            .map(|cached| (cached.custom_price_id, cached))
            .collect();

        let mut updated = Vec::new();
        let mut moved_codes = Vec::new();
        for definition in &definitions {
            let Some(quote) = resolve_quote(definition, &primary, &fallback) else {
                debug!(code = %definition.code, "price_refresh: definition unresolved, skipping");
                report.skipped += 1;
                continue;
            };

            let previous = cache.get(&definition.id);
            let next = roll_cached_price(definition, quote, previous, now, self.day_offset);
            if definition.is_visible && has_moved(previous, &next) {
                moved_codes.push(next.code.clone());
            }
            updated.push(next);
        }
        report.updated = updated.len();

        if !updated.is_empty() {
            self.cache
                .upsert_many(updated.clone())
                .await
                .context("price_refresh: failed to store cache")?;
        }

        for entry in &updated {
            cache.insert(entry.custom_price_id, entry.clone());
        }
        let cache: Vec<CachedPriceEntity> = cache.into_values().collect();
        let snapshot = build_snapshot(&definitions, &cache);

        let updates: Vec<PriceSocketMessage> = snapshot
            .iter()
            .filter(|tick| moved_codes.contains(&tick.code))
            .cloned()
            .map(PriceSocketMessage::PriceUpdate)
            .collect();
        self.publisher.publish(PriceSocketMessage::Prices(snapshot));
        for update in updates {
            self.publisher.publish(update);
        }

        report.alerts_triggered = self.trigger_alerts(&updated, now).await?;

        Ok(report)
    }

    async fn fetch(&self, kind: PriceSourceKind, feed: &F) -> Option<Vec<SourceQuote>> {
        match feed.fetch().await {
            Ok(quotes) => Some(quotes),
            Err(e) => {
                error!(source = %kind, error = ?e, "price_refresh: feed fetch failed");
                None
            }
        }
    }

    async fn store_sources(
        &self,
        kind: PriceSourceKind,
        quotes: &[SourceQuote],
        now: DateTime<Utc>,
    ) -> Result<()> {
        let entries: Vec<PriceSourceEntity> = dedupe_by_code(quotes)
            .into_iter()
            .map(|quote| PriceSourceEntity {
                source: kind.to_string(),
                code: quote.code,
                name: quote.name,
                buy: quote.buy,
                sell: quote.sell,
                fetched_at: now,
            })
            .collect();
        if entries.is_empty() {
            return Ok(());
        }

        self.sources
            .upsert_many(entries)
            .await
            .with_context(|| format!("price_refresh: failed to store {kind} sources"))?;
        Ok(())
    }

    async fn trigger_alerts(
        &self,
        updated: &[CachedPriceEntity],
        now: DateTime<Utc>,
    ) -> Result<usize> {
        if updated.is_empty() {
            return Ok(0);
        }

        let latest: HashMap<&str, &CachedPriceEntity> = updated
            .iter()
            .map(|entry| (entry.code.as_str(), entry))
            .collect();

        let fired: Vec<Uuid> = self
            .alerts
            .list_active()
            .await
            .context("price_refresh: failed to load alerts")?
            .into_iter()
            .filter(|alert| {
                latest
                    .get(alert.price_code.as_str())
                    .is_some_and(|entry| alert_fires(alert, entry.buy, entry.sell))
            })
            .map(|alert| alert.id)
            .collect();
        if fired.is_empty() {
            return Ok(0);
        }

        let triggered = self
            .alerts
            .mark_triggered(fired, now)
            .await
            .context("price_refresh: failed to mark alerts")?;
        if triggered > 0 {
            info!(triggered, "price_refresh: alerts triggered");
        } else {
            warn!("price_refresh: matching alerts were already inactive");
        }
        Ok(triggered)
    }
}

/// Feeds sometimes repeat a code. The last entry wins.
fn dedupe_by_code(quotes: &[SourceQuote]) -> Vec<SourceQuote> {
    quotes
        .iter()
        .map(|quote| (quote.code.clone(), quote.clone()))
        .collect::<BTreeMap<_, _>>()
        .into_values()
        .collect()
}
