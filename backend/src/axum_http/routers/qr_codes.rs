use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::Utc;
use crates::{
    domain::{
        repositories::{
            categories::CategoryRepository, customers::CustomerRepository,
            qr_codes::QrCodeRepository,
        },
        value_objects::{
            customers::PageQuery,
            qr_codes::{
                IssueBulkQrModel, IssueEarnQrModel, IssueQrModel, IssueSpendQrModel,
                QrCodeFilter, UseQrModel,
            },
        },
    },
    infra::db::{
        postgres::postgres_connection::PgPoolSquad,
        repositories::{
            categories::CategoryPostgres, customers::CustomerPostgres, qr_codes::QrCodePostgres,
        },
    },
};
use uuid::Uuid;

use crate::{
    auth::{AdminUser, AuthUser},
    config::config_model::QrPolicy,
    usecases::qr_codes::QrCodeUseCase,
};

type PostgresQrCodeUseCase = QrCodeUseCase<QrCodePostgres, CustomerPostgres, CategoryPostgres>;

fn usecase(db_pool: Arc<PgPoolSquad>, policy: QrPolicy) -> Arc<PostgresQrCodeUseCase> {
    Arc::new(QrCodeUseCase::new(
        Arc::new(QrCodePostgres::new(Arc::clone(&db_pool))),
        Arc::new(CustomerPostgres::new(Arc::clone(&db_pool))),
        Arc::new(CategoryPostgres::new(Arc::clone(&db_pool))),
        policy,
    ))
}

/// Customer-facing: create spend codes and scan codes.
pub fn routes(db_pool: Arc<PgPoolSquad>, policy: QrPolicy) -> Router {
    Router::new()
        .route(
            "/spend",
            post(issue_spend::<QrCodePostgres, CustomerPostgres, CategoryPostgres>),
        )
        .route(
            "/use",
            post(use_as_customer::<QrCodePostgres, CustomerPostgres, CategoryPostgres>),
        )
        .with_state(usecase(db_pool, policy))
}

pub fn admin_routes(db_pool: Arc<PgPoolSquad>, policy: QrPolicy) -> Router {
    Router::new()
        .route(
            "/",
            get(list::<QrCodePostgres, CustomerPostgres, CategoryPostgres>)
                .post(issue_single::<QrCodePostgres, CustomerPostgres, CategoryPostgres>),
        )
        .route(
            "/bulk",
            post(issue_bulk::<QrCodePostgres, CustomerPostgres, CategoryPostgres>),
        )
        .route(
            "/earn",
            post(issue_earn::<QrCodePostgres, CustomerPostgres, CategoryPostgres>),
        )
        .route(
            "/use",
            post(use_spend::<QrCodePostgres, CustomerPostgres, CategoryPostgres>),
        )
        .route(
            "/:id",
            get(get_by_id::<QrCodePostgres, CustomerPostgres, CategoryPostgres>),
        )
        .with_state(usecase(db_pool, policy))
}

pub async fn issue_single<Q, C, K>(
    State(qr_code_usecase): State<Arc<QrCodeUseCase<Q, C, K>>>,
    _admin: AdminUser,
    Json(model): Json<IssueQrModel>,
) -> impl IntoResponse
where
    Q: QrCodeRepository + Send + Sync + 'static,
    C: CustomerRepository + Send + Sync + 'static,
    K: CategoryRepository + Send + Sync + 'static,
{
    match qr_code_usecase.issue_single(model, Utc::now()).await {
        Ok(code) => (StatusCode::CREATED, Json(code)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn issue_bulk<Q, C, K>(
    State(qr_code_usecase): State<Arc<QrCodeUseCase<Q, C, K>>>,
    _admin: AdminUser,
    Json(model): Json<IssueBulkQrModel>,
) -> impl IntoResponse
where
    Q: QrCodeRepository + Send + Sync + 'static,
    C: CustomerRepository + Send + Sync + 'static,
    K: CategoryRepository + Send + Sync + 'static,
{
    match qr_code_usecase.issue_bulk(model, Utc::now()).await {
        Ok(batch) => (StatusCode::CREATED, Json(batch)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn issue_earn<Q, C, K>(
    State(qr_code_usecase): State<Arc<QrCodeUseCase<Q, C, K>>>,
    _admin: AdminUser,
    Json(model): Json<IssueEarnQrModel>,
) -> impl IntoResponse
where
    Q: QrCodeRepository + Send + Sync + 'static,
    C: CustomerRepository + Send + Sync + 'static,
    K: CategoryRepository + Send + Sync + 'static,
{
    match qr_code_usecase.issue_earn(model, Utc::now()).await {
        Ok(code) => (StatusCode::CREATED, Json(code)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn issue_spend<Q, C, K>(
    State(qr_code_usecase): State<Arc<QrCodeUseCase<Q, C, K>>>,
    auth: AuthUser,
    Json(model): Json<IssueSpendQrModel>,
) -> impl IntoResponse
where
    Q: QrCodeRepository + Send + Sync + 'static,
    C: CustomerRepository + Send + Sync + 'static,
    K: CategoryRepository + Send + Sync + 'static,
{
    match qr_code_usecase
        .issue_spend(auth.customer_id, model, Utc::now())
        .await
    {
        Ok(code) => (StatusCode::CREATED, Json(code)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn use_as_customer<Q, C, K>(
    State(qr_code_usecase): State<Arc<QrCodeUseCase<Q, C, K>>>,
    auth: AuthUser,
    Json(model): Json<UseQrModel>,
) -> impl IntoResponse
where
    Q: QrCodeRepository + Send + Sync + 'static,
    C: CustomerRepository + Send + Sync + 'static,
    K: CategoryRepository + Send + Sync + 'static,
{
    match qr_code_usecase
        .use_as_customer(auth.customer_id, model, Utc::now())
        .await
    {
        Ok(redeemed) => (StatusCode::OK, Json(redeemed)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn use_spend<Q, C, K>(
    State(qr_code_usecase): State<Arc<QrCodeUseCase<Q, C, K>>>,
    _admin: AdminUser,
    Json(model): Json<UseQrModel>,
) -> impl IntoResponse
where
    Q: QrCodeRepository + Send + Sync + 'static,
    C: CustomerRepository + Send + Sync + 'static,
    K: CategoryRepository + Send + Sync + 'static,
{
    match qr_code_usecase.use_spend(model, Utc::now()).await {
        Ok(redeemed) => (StatusCode::OK, Json(redeemed)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn list<Q, C, K>(
    State(qr_code_usecase): State<Arc<QrCodeUseCase<Q, C, K>>>,
    _admin: AdminUser,
    Query(filter): Query<QrCodeFilter>,
    Query(page): Query<PageQuery>,
) -> impl IntoResponse
where
    Q: QrCodeRepository + Send + Sync + 'static,
    C: CustomerRepository + Send + Sync + 'static,
    K: CategoryRepository + Send + Sync + 'static,
{
    match qr_code_usecase.list(filter, page).await {
        Ok(codes) => (StatusCode::OK, Json(codes)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn get_by_id<Q, C, K>(
    State(qr_code_usecase): State<Arc<QrCodeUseCase<Q, C, K>>>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse
where
    Q: QrCodeRepository + Send + Sync + 'static,
    C: CustomerRepository + Send + Sync + 'static,
    K: CategoryRepository + Send + Sync + 'static,
{
    match qr_code_usecase.get(id).await {
        Ok(code) => (StatusCode::OK, Json(code)).into_response(),
        Err(e) => e.into_response(),
    }
}
