use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use crates::domain::value_objects::qr_codes::{BreakdownError, QrRedeemError};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: u16,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<QrRedeemError> for AppError {
    fn from(value: QrRedeemError) -> Self {
        match value {
            QrRedeemError::NotFound => AppError::NotFound(value.to_string()),
            QrRedeemError::Expired | QrRedeemError::AlreadyUsed => {
                AppError::Conflict(value.to_string())
            }
            QrRedeemError::WrongKind(_)
            | QrRedeemError::MissingOwner
            | QrRedeemError::InsufficientPoints { .. } => AppError::BadRequest(value.to_string()),
            QrRedeemError::Internal(err) => AppError::Internal(err),
        }
    }
}

impl From<BreakdownError> for AppError {
    fn from(value: BreakdownError) -> Self {
        AppError::BadRequest(value.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self {
            AppError::Internal(err) => {
                error!(error = ?err, "http: internal error");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        let body = Json(ErrorResponse {
            code: status.as_u16(),
            message,
        });

        (status, body).into_response()
    }
}
