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
    domain::{repositories::articles::ArticleRepository, value_objects::content::ArticleModel},
    infra::db::{postgres::postgres_connection::PgPoolSquad, repositories::articles::ArticlePostgres},
};
use uuid::Uuid;

use crate::{auth::AdminUser, usecases::articles::ArticleUseCase};

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let article_repository = ArticlePostgres::new(Arc::clone(&db_pool));
    let article_usecase = ArticleUseCase::new(Arc::new(article_repository));

    Router::new()
        .route("/", get(list_published::<ArticlePostgres>))
        .route("/:slug", get(get_published::<ArticlePostgres>))
        .with_state(Arc::new(article_usecase))
}

pub fn admin_routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let article_repository = ArticlePostgres::new(Arc::clone(&db_pool));
    let article_usecase = ArticleUseCase::new(Arc::new(article_repository));

    Router::new()
        .route("/", get(list_all::<ArticlePostgres>).post(create::<ArticlePostgres>))
        .route("/:id", put(update::<ArticlePostgres>).delete(delete::<ArticlePostgres>))
        .with_state(Arc::new(article_usecase))
}

pub async fn list_published<T>(
    State(article_usecase): State<Arc<ArticleUseCase<T>>>,
) -> impl IntoResponse
where
    T: ArticleRepository + Send + Sync + 'static,
{
    match article_usecase.list_published().await {
        Ok(articles) => (StatusCode::OK, Json(articles)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn get_published<T>(
    State(article_usecase): State<Arc<ArticleUseCase<T>>>,
    Path(slug): Path<String>,
) -> impl IntoResponse
where
    T: ArticleRepository + Send + Sync + 'static,
{
    match article_usecase.get_published(&slug).await {
        Ok(article) => (StatusCode::OK, Json(article)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn list_all<T>(
    State(article_usecase): State<Arc<ArticleUseCase<T>>>,
    _admin: AdminUser,
) -> impl IntoResponse
where
    T: ArticleRepository + Send + Sync + 'static,
{
    match article_usecase.list_all().await {
        Ok(articles) => (StatusCode::OK, Json(articles)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn create<T>(
    State(article_usecase): State<Arc<ArticleUseCase<T>>>,
    _admin: AdminUser,
    Json(model): Json<ArticleModel>,
) -> impl IntoResponse
where
    T: ArticleRepository + Send + Sync + 'static,
{
    match article_usecase.create(model, Utc::now()).await {
        Ok(article) => (StatusCode::CREATED, Json(article)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn update<T>(
    State(article_usecase): State<Arc<ArticleUseCase<T>>>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
    Json(model): Json<ArticleModel>,
) -> impl IntoResponse
where
    T: ArticleRepository + Send + Sync + 'static,
{
    match article_usecase.update(id, model, Utc::now()).await {
        Ok(article) => (StatusCode::OK, Json(article)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn delete<T>(
    State(article_usecase): State<Arc<ArticleUseCase<T>>>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse
where
    T: ArticleRepository + Send + Sync + 'static,
{
    match article_usecase.delete(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => e.into_response(),
    }
}
