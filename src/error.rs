use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::models::waybill::WaybillStatus;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("invalid transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: WaybillStatus,
        to: WaybillStatus,
    },

    #[error("dispatch requires a vehicle or a provider")]
    MissingAssignment,

    #[error("cod cannot be collected while waybill is {status:?}")]
    PrematureSettlement { status: WaybillStatus },

    #[error("cod already collected")]
    AlreadyCollected,

    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) | AppError::MissingAssignment => StatusCode::BAD_REQUEST,
            AppError::InvalidTransition { .. }
            | AppError::PrematureSettlement { .. }
            | AppError::AlreadyCollected => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}
