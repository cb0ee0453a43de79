use std::sync::Arc;

use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::post};

use crate::{
    axum_http::error_responses::AppError,
    config::{config_loader, config_model::DotEnvyConfig},
    usecases::admin_auth::{AdminAuthUseCase, AdminLoginModel},
};

pub fn routes(config: Arc<DotEnvyConfig>) -> Router {
    let admin_auth_usecase = AdminAuthUseCase::new(config.admin.clone());

    Router::new()
        .route("/login", post(login))
        .with_state(Arc::new(admin_auth_usecase))
}

pub async fn login(
    State(admin_auth_usecase): State<Arc<AdminAuthUseCase>>,
    Json(model): Json<AdminLoginModel>,
) -> impl IntoResponse {
    let admin_secret = match config_loader::get_admin_secret() {
        Ok(secret) => secret,
        Err(e) => return AppError::Internal(e).into_response(),
    };

    match admin_auth_usecase.login(model, &admin_secret) {
        Ok(auth) => (StatusCode::OK, Json(auth)).into_response(),
        Err(e) => e.into_response(),
    }
}
