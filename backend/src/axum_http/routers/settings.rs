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
    domain::repositories::settings::SettingRepository,
    infra::db::{postgres::postgres_connection::PgPoolSquad, repositories::settings::SettingPostgres},
};
use serde_json::Value;

use crate::{auth::AdminUser, usecases::settings::SettingUseCase};

fn usecase(db_pool: Arc<PgPoolSquad>) -> Arc<SettingUseCase<SettingPostgres>> {
    let setting_repository = SettingPostgres::new(Arc::clone(&db_pool));
    Arc::new(SettingUseCase::new(Arc::new(setting_repository)))
}

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    Router::new()
        .route("/", get(all::<SettingPostgres>))
        .with_state(usecase(db_pool))
}

pub fn admin_routes(db_pool: Arc<PgPoolSquad>) -> Router {
    Router::new()
        .route(
            "/:key",
            put(upsert::<SettingPostgres>).delete(delete::<SettingPostgres>),
        )
        .with_state(usecase(db_pool))
}

pub async fn all<T>(State(setting_usecase): State<Arc<SettingUseCase<T>>>) -> impl IntoResponse
where
    T: SettingRepository + Send + Sync + 'static,
{
    match setting_usecase.all().await {
        Ok(settings) => (StatusCode::OK, Json(settings)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn upsert<T>(
    State(setting_usecase): State<Arc<SettingUseCase<T>>>,
    _admin: AdminUser,
    Path(key): Path<String>,
    Json(value): Json<Value>,
) -> impl IntoResponse
where
    T: SettingRepository + Send + Sync + 'static,
{
    match setting_usecase.put(key, value, Utc::now()).await {
        Ok(setting) => (
            StatusCode::OK,
            Json(serde_json::json!({ "key": setting.key, "value": setting.value })),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn delete<T>(
    State(setting_usecase): State<Arc<SettingUseCase<T>>>,
    _admin: AdminUser,
    Path(key): Path<String>,
) -> impl IntoResponse
where
    T: SettingRepository + Send + Sync + 'static,
{
    match setting_usecase.delete(key).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => e.into_response(),
    }
}
