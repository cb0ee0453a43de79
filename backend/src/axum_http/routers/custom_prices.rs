use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
};
use chrono::Utc;
use crates::{
    domain::{
        repositories::custom_prices::CustomPriceRepository,
        value_objects::custom_prices::{
            InsertCustomPriceModel, ReorderItem, UpdateCustomPriceModel,
        },
    },
    infra::db::{
        postgres::postgres_connection::PgPoolSquad,
        repositories::custom_prices::CustomPricePostgres,
    },
};
use serde_json::json;
use uuid::Uuid;

use crate::{auth::AdminUser, usecases::custom_prices::CustomPriceUseCase};

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let custom_price_repository = CustomPricePostgres::new(Arc::clone(&db_pool));
    let custom_price_usecase = CustomPriceUseCase::new(Arc::new(custom_price_repository));

    Router::new()
        .route(
            "/",
            get(list::<CustomPricePostgres>).post(create::<CustomPricePostgres>),
        )
        .route("/reorder", put(reorder::<CustomPricePostgres>))
        .route(
            "/:id",
            get(get_by_id::<CustomPricePostgres>)
                .put(update::<CustomPricePostgres>)
                .delete(delete::<CustomPricePostgres>),
        )
        .with_state(Arc::new(custom_price_usecase))
}

pub async fn list<T>(
    State(custom_price_usecase): State<Arc<CustomPriceUseCase<T>>>,
    _admin: AdminUser,
) -> impl IntoResponse
where
    T: CustomPriceRepository + Send + Sync + 'static,
{
    match custom_price_usecase.list().await {
        Ok(definitions) => (StatusCode::OK, Json(definitions)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn get_by_id<T>(
    State(custom_price_usecase): State<Arc<CustomPriceUseCase<T>>>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse
where
    T: CustomPriceRepository + Send + Sync + 'static,
{
    match custom_price_usecase.get(id).await {
        Ok(definition) => (StatusCode::OK, Json(definition)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn create<T>(
    State(custom_price_usecase): State<Arc<CustomPriceUseCase<T>>>,
    _admin: AdminUser,
    Json(model): Json<InsertCustomPriceModel>,
) -> impl IntoResponse
where
    T: CustomPriceRepository + Send + Sync + 'static,
{
    match custom_price_usecase.create(model, Utc::now()).await {
        Ok(definition) => (StatusCode::CREATED, Json(definition)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn update<T>(
    State(custom_price_usecase): State<Arc<CustomPriceUseCase<T>>>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
    Json(model): Json<UpdateCustomPriceModel>,
) -> impl IntoResponse
where
    T: CustomPriceRepository + Send + Sync + 'static,
{
    match custom_price_usecase.update(id, model, Utc::now()).await {
        Ok(definition) => (StatusCode::OK, Json(definition)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn delete<T>(
    State(custom_price_usecase): State<Arc<CustomPriceUseCase<T>>>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse
where
    T: CustomPriceRepository + Send + Sync + 'static,
{
    match custom_price_usecase.delete(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn reorder<T>(
    State(custom_price_usecase): State<Arc<CustomPriceUseCase<T>>>,
    _admin: AdminUser,
    Json(items): Json<Vec<ReorderItem>>,
) -> impl IntoResponse
where
    T: CustomPriceRepository + Send + Sync + 'static,
{
    match custom_price_usecase.reorder(items).await {
        Ok(updated) => (StatusCode::OK, Json(json!({ "updated": updated }))).into_response(),
        Err(e) => e.into_response(),
    }
}
