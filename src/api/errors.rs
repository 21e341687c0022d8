use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::engine::ChessError;

/// Structured API error that serializes to JSON.
#[derive(Debug)]
pub enum ApiError {
    InvalidMove(ChessError),
    InvalidFen(ChessError),
    InvalidRequest(String),
    UnsupportedCategory(String),
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorDetail {
    code: String,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            ApiError::InvalidMove(err) => {
                (StatusCode::BAD_REQUEST, "INVALID_MOVE", err.to_string())
            }
            ApiError::InvalidFen(err) => (StatusCode::BAD_REQUEST, "INVALID_FEN", err.to_string()),
            ApiError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, "INVALID_REQUEST", msg),
            ApiError::UnsupportedCategory(name) => (
                StatusCode::BAD_REQUEST,
                "UNSUPPORTED_CATEGORY",
                format!("Unsupported category: {name}"),
            ),
        };

        let body = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<ChessError> for ApiError {
    fn from(err: ChessError) -> Self {
        match &err {
            ChessError::IllegalMove { .. } => ApiError::InvalidMove(err),
            ChessError::InvalidFen(_) => ApiError::InvalidFen(err),
            ChessError::InvalidSquare(_) => ApiError::InvalidRequest(err.to_string()),
            ChessError::InvalidPromotion(_) => ApiError::InvalidRequest(err.to_string()),
            ChessError::UnsupportedCategory(name) => ApiError::UnsupportedCategory(name.clone()),
        }
    }
}
