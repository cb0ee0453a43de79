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
    domain::{repositories::campaigns::CampaignRepository, value_objects::content::CampaignModel},
    infra::db::{postgres::postgres_connection::PgPoolSquad, repositories::campaigns::CampaignPostgres},
};
use uuid::Uuid;

use crate::{auth::AdminUser, usecases::campaigns::CampaignUseCase};

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let campaign_repository = CampaignPostgres::new(Arc::clone(&db_pool));
    let campaign_usecase = CampaignUseCase::new(Arc::new(campaign_repository));

    Router::new()
        .route("/", get(list_published::<CampaignPostgres>))
        .route("/:slug", get(get_published::<CampaignPostgres>))
        .with_state(Arc::new(campaign_usecase))
}

pub fn admin_routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let campaign_repository = CampaignPostgres::new(Arc::clone(&db_pool));
    let campaign_usecase = CampaignUseCase::new(Arc::new(campaign_repository));

    Router::new()
        .route("/", get(list_all::<CampaignPostgres>).post(create::<CampaignPostgres>))
        .route("/:id", put(update::<CampaignPostgres>).delete(delete::<CampaignPostgres>))
        .with_state(Arc::new(campaign_usecase))
}

pub async fn list_published<T>(
    State(campaign_usecase): State<Arc<CampaignUseCase<T>>>,
) -> impl IntoResponse
where
    T: CampaignRepository + Send + Sync + 'static,
{
    match campaign_usecase.list_published().await {
        Ok(campaigns) => (StatusCode::OK, Json(campaigns)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn get_published<T>(
    State(campaign_usecase): State<Arc<CampaignUseCase<T>>>,
    Path(slug): Path<String>,
) -> impl IntoResponse
where
    T: CampaignRepository + Send + Sync + 'static,
{
    match campaign_usecase.get_published(&slug).await {
        Ok(campaign) => (StatusCode::OK, Json(campaign)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn list_all<T>(
    State(campaign_usecase): State<Arc<CampaignUseCase<T>>>,
    _admin: AdminUser,
) -> impl IntoResponse
where
    T: CampaignRepository + Send + Sync + 'static,
{
    match campaign_usecase.list_all().await {
        Ok(campaigns) => (StatusCode::OK, Json(campaigns)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn create<T>(
    State(campaign_usecase): State<Arc<CampaignUseCase<T>>>,
    _admin: AdminUser,
    Json(model): Json<CampaignModel>,
) -> impl IntoResponse
where
    T: CampaignRepository + Send + Sync + 'static,
{
    match campaign_usecase.create(model, Utc::now()).await {
        Ok(campaign) => (StatusCode::CREATED, Json(campaign)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn update<T>(
    State(campaign_usecase): State<Arc<CampaignUseCase<T>>>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
    Json(model): Json<CampaignModel>,
) -> impl IntoResponse
where
    T: CampaignRepository + Send + Sync + 'static,
{
    match campaign_usecase.update(id, model, Utc::now()).await {
        Ok(campaign) => (StatusCode::OK, Json(campaign)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn delete<T>(
    State(campaign_usecase): State<Arc<CampaignUseCase<T>>>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse
where
    T: CampaignRepository + Send + Sync + 'static,
{
    match campaign_usecase.delete(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => e.into_response(),
    }
}
