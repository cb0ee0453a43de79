use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch},
};
use chrono::Utc;
use crates::{
    domain::{
        repositories::{
            custom_prices::CustomPriceRepository, price_alerts::PriceAlertRepository,
        },
        value_objects::alerts::{InsertPriceAlertModel, UpdatePriceAlertModel},
    },
    infra::db::{
        postgres::postgres_connection::PgPoolSquad,
        repositories::{custom_prices::CustomPricePostgres, price_alerts::PriceAlertPostgres},
    },
};
use uuid::Uuid;

use crate::{auth::AuthUser, usecases::alerts::PriceAlertUseCase};

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let price_alert_repository = PriceAlertPostgres::new(Arc::clone(&db_pool));
    let custom_price_repository = CustomPricePostgres::new(Arc::clone(&db_pool));
    let price_alert_usecase = PriceAlertUseCase::new(
        Arc::new(price_alert_repository),
        Arc::new(custom_price_repository),
    );

    Router::new()
        .route(
            "/",
            get(list::<PriceAlertPostgres, CustomPricePostgres>)
                .post(create::<PriceAlertPostgres, CustomPricePostgres>),
        )
        .route(
            "/:id",
            patch(update::<PriceAlertPostgres, CustomPricePostgres>)
                .delete(delete::<PriceAlertPostgres, CustomPricePostgres>),
        )
        .with_state(Arc::new(price_alert_usecase))
}

pub async fn list<A, D>(
    State(price_alert_usecase): State<Arc<PriceAlertUseCase<A, D>>>,
    auth: AuthUser,
) -> impl IntoResponse
where
    A: PriceAlertRepository + Send + Sync + 'static,
    D: CustomPriceRepository + Send + Sync + 'static,
{
    match price_alert_usecase.list(auth.customer_id).await {
        Ok(alerts) => (StatusCode::OK, Json(alerts)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn create<A, D>(
    State(price_alert_usecase): State<Arc<PriceAlertUseCase<A, D>>>,
    auth: AuthUser,
    Json(model): Json<InsertPriceAlertModel>,
) -> impl IntoResponse
where
    A: PriceAlertRepository + Send + Sync + 'static,
    D: CustomPriceRepository + Send + Sync + 'static,
{
    match price_alert_usecase
        .create(auth.customer_id, model, Utc::now())
        .await
    {
        Ok(alert) => (StatusCode::CREATED, Json(alert)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn update<A, D>(
    State(price_alert_usecase): State<Arc<PriceAlertUseCase<A, D>>>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(model): Json<UpdatePriceAlertModel>,
) -> impl IntoResponse
where
    A: PriceAlertRepository + Send + Sync + 'static,
    D: CustomPriceRepository + Send + Sync + 'static,
{
    match price_alert_usecase.update(auth.customer_id, id, model).await {
        Ok(alert) => (StatusCode::OK, Json(alert)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn delete<A, D>(
    State(price_alert_usecase): State<Arc<PriceAlertUseCase<A, D>>>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse
where
    A: PriceAlertRepository + Send + Sync + 'static,
    D: CustomPriceRepository + Send + Sync + 'static,
{
    match price_alert_usecase.delete(auth.customer_id, id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => e.into_response(),
    }
}
