use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
};
use chrono::Utc;
use crates::{
    domain::{
        repositories::categories::CategoryRepository,
        value_objects::catalog::{InsertCategoryModel, UpdateCategoryModel},
    },
    infra::db::{
        postgres::postgres_connection::PgPoolSquad, repositories::categories::CategoryPostgres,
    },
};
use uuid::Uuid;

use crate::{auth::AdminUser, usecases::categories::CategoryUseCase};

fn usecase(db_pool: Arc<PgPoolSquad>) -> Arc<CategoryUseCase<CategoryPostgres>> {
    let category_repository = CategoryPostgres::new(Arc::clone(&db_pool));
    Arc::new(CategoryUseCase::new(Arc::new(category_repository)))
}

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    Router::new()
        .route("/", get(list::<CategoryPostgres>))
        .with_state(usecase(db_pool))
}

pub fn admin_routes(db_pool: Arc<PgPoolSquad>) -> Router {
    Router::new()
        .route("/", post(create::<CategoryPostgres>))
        .route(
            "/:id",
            put(update::<CategoryPostgres>).delete(delete::<CategoryPostgres>),
        )
        .with_state(usecase(db_pool))
}

pub async fn list<T>(State(category_usecase): State<Arc<CategoryUseCase<T>>>) -> impl IntoResponse
where
    T: CategoryRepository + Send + Sync + 'static,
{
    match category_usecase.list().await {
        Ok(categories) => (StatusCode::OK, Json(categories)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn create<T>(
    State(category_usecase): State<Arc<CategoryUseCase<T>>>,
    _admin: AdminUser,
    Json(model): Json<InsertCategoryModel>,
) -> impl IntoResponse
where
    T: CategoryRepository + Send + Sync + 'static,
{
    match category_usecase.create(model, Utc::now()).await {
        Ok(category) => (StatusCode::CREATED, Json(category)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn update<T>(
    State(category_usecase): State<Arc<CategoryUseCase<T>>>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
    Json(model): Json<UpdateCategoryModel>,
) -> impl IntoResponse
where
    T: CategoryRepository + Send + Sync + 'static,
{
    match category_usecase.update(id, model, Utc::now()).await {
        Ok(category) => (StatusCode::OK, Json(category)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn delete<T>(
    State(category_usecase): State<Arc<CategoryUseCase<T>>>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse
where
    T: CategoryRepository + Send + Sync + 'static,
{
    match category_usecase.delete(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => e.into_response(),
    }
}
