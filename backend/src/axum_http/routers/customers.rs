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
            customers::CustomerRepository, point_transactions::PointTransactionRepository,
        },
        value_objects::customers::{AuthCustomerModel, PageQuery},
    },
    infra::db::{
        postgres::postgres_connection::PgPoolSquad,
        repositories::{
            customers::CustomerPostgres, point_transactions::PointTransactionPostgres,
        },
    },
};

use crate::{
    auth::{AdminUser, AuthUser},
    axum_http::error_responses::AppError,
    config::config_loader,
    usecases::customers::CustomerUseCase,
};

fn usecase(db_pool: Arc<PgPoolSquad>) -> Arc<CustomerUseCase<CustomerPostgres, PointTransactionPostgres>> {
    Arc::new(CustomerUseCase::new(
        Arc::new(CustomerPostgres::new(Arc::clone(&db_pool))),
        Arc::new(PointTransactionPostgres::new(Arc::clone(&db_pool))),
    ))
}

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    Router::new()
        .route(
            "/auth",
            post(authenticate::<CustomerPostgres, PointTransactionPostgres>),
        )
        .route("/me", get(me::<CustomerPostgres, PointTransactionPostgres>))
        .route(
            "/me/transactions",
            get(transactions::<CustomerPostgres, PointTransactionPostgres>),
        )
        .with_state(usecase(db_pool))
}

pub fn admin_routes(db_pool: Arc<PgPoolSquad>) -> Router {
    Router::new()
        .route("/", get(list::<CustomerPostgres, PointTransactionPostgres>))
        .route(
            "/by-qr/:qr_identifier",
            get(find_by_qr_identifier::<CustomerPostgres, PointTransactionPostgres>),
        )
        .with_state(usecase(db_pool))
}

pub async fn authenticate<C, T>(
    State(customer_usecase): State<Arc<CustomerUseCase<C, T>>>,
    Json(model): Json<AuthCustomerModel>,
) -> impl IntoResponse
where
    C: CustomerRepository + Send + Sync + 'static,
    T: PointTransactionRepository + Send + Sync + 'static,
{
    let user_secret = match config_loader::get_user_secret() {
        Ok(secret) => secret,
        Err(e) => return AppError::Internal(e).into_response(),
    };

    match customer_usecase
        .authenticate(model, &user_secret, Utc::now())
        .await
    {
        Ok(auth) => (StatusCode::OK, Json(auth)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn me<C, T>(
    State(customer_usecase): State<Arc<CustomerUseCase<C, T>>>,
    auth: AuthUser,
) -> impl IntoResponse
where
    C: CustomerRepository + Send + Sync + 'static,
    T: PointTransactionRepository + Send + Sync + 'static,
{
    match customer_usecase.me(auth.customer_id).await {
        Ok(customer) => (StatusCode::OK, Json(customer)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn transactions<C, T>(
    State(customer_usecase): State<Arc<CustomerUseCase<C, T>>>,
    auth: AuthUser,
) -> impl IntoResponse
where
    C: CustomerRepository + Send + Sync + 'static,
    T: PointTransactionRepository + Send + Sync + 'static,
{
    match customer_usecase.transactions(auth.customer_id).await {
        Ok(rows) => (StatusCode::OK, Json(rows)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn list<C, T>(
    State(customer_usecase): State<Arc<CustomerUseCase<C, T>>>,
    _admin: AdminUser,
    Query(page): Query<PageQuery>,
) -> impl IntoResponse
where
    C: CustomerRepository + Send + Sync + 'static,
    T: PointTransactionRepository + Send + Sync + 'static,
{
    match customer_usecase.list(page).await {
        Ok(customers) => (StatusCode::OK, Json(customers)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn find_by_qr_identifier<C, T>(
    State(customer_usecase): State<Arc<CustomerUseCase<C, T>>>,
    _admin: AdminUser,
    Path(qr_identifier): Path<String>,
) -> impl IntoResponse
where
    C: CustomerRepository + Send + Sync + 'static,
    T: PointTransactionRepository + Send + Sync + 'static,
{
    match customer_usecase.find_by_qr_identifier(&qr_identifier).await {
        Ok(customer) => (StatusCode::OK, Json(customer)).into_response(),
        Err(e) => e.into_response(),
    }
}
