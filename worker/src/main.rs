use anyhow::{Context, Result};
use crates::{
    domain::{
        repositories::{cached_prices::CachedPriceRepository, custom_prices::CustomPriceRepository},
        value_objects::cached_prices::build_snapshot,
    },
    infra::{
        db::{
            postgres::postgres_connection,
            repositories::{
                cached_prices::CachedPricePostgres, custom_prices::CustomPricePostgres,
                price_alerts::PriceAlertPostgres, price_sources::PriceSourcePostgres,
                qr_codes::QrCodePostgres,
            },
        },
        price_feeds::http_feed::HttpPriceFeed,
        realtime::price_hub::PriceHub,
    },
};
use std::{sync::Arc, time::Duration};
use tracing::{error, info};
use worker::{
    axum_http, config, price_polling, qr_expiry,
    usecases::{expire_qr_codes::ExpireQrCodesUseCase, refresh_prices::RefreshPricesUseCase},
};

#[tokio::main]
async fn main() -> Result<()> {
    if let Err(error) = run().await {
        error!("Worker exited with error: {:?}", error);
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    crates::observability::init_observability("worker")?;

    let dotenvy_env = Arc::new(config::config_loader::load()?);
    info!(
        stage = %config::config_loader::get_stage(),
        "ENV has been loaded"
    );

    let postgres_pool = postgres_connection::establish_connection(
        &dotenvy_env.database.url,
        dotenvy_env.database.max_connections,
    )?;
    info!("Postgres connection has been established");

    let db_pool_arc = Arc::new(postgres_pool);

    let custom_price_repository = Arc::new(CustomPricePostgres::new(Arc::clone(&db_pool_arc)));
    let cached_price_repository = Arc::new(CachedPricePostgres::new(Arc::clone(&db_pool_arc)));

    // Sockets that connect before the first poll still get the last known prices.
    let hub = PriceHub::new();
    let definitions = custom_price_repository.list_all().await?;
    let cache = cached_price_repository.list_all().await?;
    hub.seed(build_snapshot(&definitions, &cache));
    info!(prices = hub.snapshot().len(), "Price hub has been seeded");

    let price_feed = &dotenvy_env.price_feed;
    let day_offset = price_feed
        .day_offset()
        .context("PRICE_DAY_UTC_OFFSET_HOURS is invalid")?;
    let primary_feed = Arc::new(HttpPriceFeed::new(
        price_feed.primary_url.clone(),
        price_feed.timeout(),
    )?);
    let fallback_feed = match &price_feed.fallback_url {
        Some(url) => Some(Arc::new(HttpPriceFeed::new(
            url.clone(),
            price_feed.timeout(),
        )?)),
        None => None,
    };

    let refresh_prices_usecase = Arc::new(RefreshPricesUseCase::new(
        custom_price_repository,
        cached_price_repository,
        Arc::new(PriceSourcePostgres::new(Arc::clone(&db_pool_arc))),
        Arc::new(PriceAlertPostgres::new(Arc::clone(&db_pool_arc))),
        primary_feed,
        fallback_feed,
        Arc::new(hub.clone()),
        day_offset,
    ));
    let price_polling_loop = tokio::spawn(price_polling::worker::run(
        refresh_prices_usecase,
        price_feed.poll_interval(),
    ));

    let expire_qr_codes_usecase = Arc::new(ExpireQrCodesUseCase::new(Arc::new(
        QrCodePostgres::new(Arc::clone(&db_pool_arc)),
    )));
    let qr_expiry_loop = tokio::spawn(qr_expiry::worker::run(
        expire_qr_codes_usecase,
        Duration::from_secs(dotenvy_env.qr_expiry.sweep_secs.max(1)),
    ));

    let http_server = tokio::spawn(axum_http::http_serve::start(Arc::clone(&dotenvy_env), hub));

    info!("Worker started");

    tokio::select! {
        result = price_polling_loop => result??,
        result = qr_expiry_loop => result??,
        result = http_server => result??,
    };

    Ok(())
}
