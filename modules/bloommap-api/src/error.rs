use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use bloommap_board::BoardError;
use thiserror::Error;
use tracing::warn;

/// Errors surfaced by REST handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Board(#[from] BoardError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Board(e) => board_status(e),
        }
    }
}

pub fn board_status(err: &BoardError) -> StatusCode {
    match err {
        BoardError::Validation(_) => StatusCode::BAD_REQUEST,
        BoardError::Unauthenticated => StatusCode::UNAUTHORIZED,
        BoardError::Forbidden(_) => StatusCode::FORBIDDEN,
        BoardError::NotFound(_) => StatusCode::NOT_FOUND,
        BoardError::Backend(_) => StatusCode::BAD_GATEWAY,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            ApiError::Board(BoardError::Validation(issues)) => serde_json::json!({
                "error": "Validation failed",
                "issues": issues,
            }),
            ApiError::Board(BoardError::Backend(e)) => {
                // Details stay in the logs.
                warn!(error = %e, "Data service request failed");
                serde_json::json!({"error": "The data service is unavailable, please try again"})
            }
            other => serde_json::json!({"error": other.to_string()}),
        };
        (status, Json(body)).into_response()
    }
}
