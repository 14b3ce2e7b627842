use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde_json::json;
use thiserror::Error;

use crate::handlers::shared::ApiResponse;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Internal Server Error")]
    Database(#[from] sqlx::Error),

    /// Field-level validation failures; the collected messages become the
    /// response payload, matching the historical validator envelope.
    #[error("Invalid Data")]
    Validation(Vec<String>),

    #[error("{0}")]
    BadRequest(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Token Expired")]
    TokenExpired,

    #[error("{0} not found")]
    NotFound(String),

    #[error("Internal Server Error")]
    Internal(anyhow::Error),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::TokenExpired => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status_code = self.status_code();

        if status_code.is_server_error() {
            log::error!("Request failed with status {}: {:?}", status_code, self);
        }

        match self {
            AppError::Validation(errors) => HttpResponse::build(status_code).json(json!({
                "payload": errors,
                "error": "Invalid Data",
                "status": false,
            })),
            _ => HttpResponse::build(status_code)
                .json(ApiResponse::<()>::error(&self.to_string())),
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        if error.is::<sqlx::Error>() {
            match error.downcast::<sqlx::Error>() {
                Ok(sqlx_err) => return AppError::Database(sqlx_err),
                Err(original) => return AppError::Internal(original),
            }
        }

        AppError::Internal(error)
    }
}
