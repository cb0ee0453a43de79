use std::{sync::Arc, time::Duration};

use anyhow::Result;
use chrono::Utc;
use crates::domain::repositories::{
    cached_prices::CachedPriceRepository, custom_prices::CustomPriceRepository,
    price_alerts::PriceAlertRepository, price_feeds::PriceFeedClient,
    price_publisher::PricePublisher, price_sources::PriceSourceRepository,
};
use tracing::{debug, error, info};

use crate::usecases::refresh_prices::RefreshPricesUseCase;

pub async fn run<D, C, S, A, F, P>(
    usecase: Arc<RefreshPricesUseCase<D, C, S, A, F, P>>,
    interval: Duration,
) -> Result<()>
where
    D: CustomPriceRepository + Send + Sync + 'static,
    C: CachedPriceRepository + Send + Sync + 'static,
    S: PriceSourceRepository + Send + Sync + 'static,
    A: PriceAlertRepository + Send + Sync + 'static,
    F: PriceFeedClient + Send + Sync + 'static,
    P: PricePublisher + Send + Sync + 'static,
{
    info!(
        interval_secs = interval.as_secs(),
        "price_polling: starting worker loop"
    );
    loop {
        match usecase.run_once(Utc::now()).await {
            Ok(report) => {
                debug!(
                    primary_fetched = report.primary_fetched,
                    fallback_fetched = report.fallback_fetched,
                    updated = report.updated,
                    skipped = report.skipped,
                    alerts_triggered = report.alerts_triggered,
                    "price_polling: cycle finished"
                );
            }
            Err(e) => {
                error!(error = ?e, "price_polling: cycle failed");
            }
        }
        tokio::time::sleep(interval).await;
    }
}
