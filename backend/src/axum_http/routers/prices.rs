use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use crates::{
    domain::{
        repositories::{
            cached_prices::CachedPriceRepository, custom_prices::CustomPriceRepository,
            price_sources::PriceSourceRepository,
        },
        value_objects::enums::price_source_kinds::PriceSourceKind,
    },
    infra::db::{
        postgres::postgres_connection::PgPoolSquad,
        repositories::{
            cached_prices::CachedPricePostgres, custom_prices::CustomPricePostgres,
            price_sources::PriceSourcePostgres,
        },
    },
};
use serde::Deserialize;

use crate::{auth::AdminUser, usecases::prices::PriceUseCase};

type PostgresPriceUseCase =
    PriceUseCase<CustomPricePostgres, CachedPricePostgres, PriceSourcePostgres>;

fn usecase(db_pool: Arc<PgPoolSquad>) -> Arc<PostgresPriceUseCase> {
    Arc::new(PriceUseCase::new(
        Arc::new(CustomPricePostgres::new(Arc::clone(&db_pool))),
        Arc::new(CachedPricePostgres::new(Arc::clone(&db_pool))),
        Arc::new(PriceSourcePostgres::new(Arc::clone(&db_pool))),
    ))
}

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    Router::new()
        .route(
            "/",
            get(list::<CustomPricePostgres, CachedPricePostgres, PriceSourcePostgres>),
        )
        .route(
            "/:code",
            get(get_by_code::<CustomPricePostgres, CachedPricePostgres, PriceSourcePostgres>),
        )
        .with_state(usecase(db_pool))
}

pub fn admin_routes(db_pool: Arc<PgPoolSquad>) -> Router {
    Router::new()
        .route(
            "/cached",
            get(list_cached::<CustomPricePostgres, CachedPricePostgres, PriceSourcePostgres>),
        )
        .route(
            "/sources",
            get(list_sources::<CustomPricePostgres, CachedPricePostgres, PriceSourcePostgres>),
        )
        .with_state(usecase(db_pool))
}

#[derive(Debug, Default, Deserialize)]
pub struct SourceQuery {
    pub source: Option<PriceSourceKind>,
}

pub async fn list<D, C, S>(
    State(price_usecase): State<Arc<PriceUseCase<D, C, S>>>,
) -> impl IntoResponse
where
    D: CustomPriceRepository + Send + Sync + 'static,
    C: CachedPriceRepository + Send + Sync + 'static,
    S: PriceSourceRepository + Send + Sync + 'static,
{
    match price_usecase.list_prices().await {
        Ok(prices) => (StatusCode::OK, Json(prices)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn get_by_code<D, C, S>(
    State(price_usecase): State<Arc<PriceUseCase<D, C, S>>>,
    Path(code): Path<String>,
) -> impl IntoResponse
where
    D: CustomPriceRepository + Send + Sync + 'static,
    C: CachedPriceRepository + Send + Sync + 'static,
    S: PriceSourceRepository + Send + Sync + 'static,
{
    match price_usecase.get_price(&code).await {
        Ok(price) => (StatusCode::OK, Json(price)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn list_cached<D, C, S>(
    State(price_usecase): State<Arc<PriceUseCase<D, C, S>>>,
    _admin: AdminUser,
) -> impl IntoResponse
where
    D: CustomPriceRepository + Send + Sync + 'static,
    C: CachedPriceRepository + Send + Sync + 'static,
    S: PriceSourceRepository + Send + Sync + 'static,
{
    match price_usecase.list_cached().await {
        Ok(rows) => (StatusCode::OK, Json(rows)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn list_sources<D, C, S>(
    State(price_usecase): State<Arc<PriceUseCase<D, C, S>>>,
    _admin: AdminUser,
    Query(query): Query<SourceQuery>,
) -> impl IntoResponse
where
    D: CustomPriceRepository + Send + Sync + 'static,
    C: CachedPriceRepository + Send + Sync + 'static,
    S: PriceSourceRepository + Send + Sync + 'static,
{
    match price_usecase.list_sources(query.source).await {
        Ok(entries) => (StatusCode::OK, Json(entries)).into_response(),
        Err(e) => e.into_response(),
    }
}
