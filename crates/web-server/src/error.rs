use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use service::{ErrorKind, QueryError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Query(#[from] QueryError),
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Query task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Converts our custom `AppError` into an HTTP response.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Query(query_err) => match query_err.kind() {
                ErrorKind::SymbolNotFound => (StatusCode::NOT_FOUND, query_err.to_string()),
                ErrorKind::NoData => {
                    // 204 must not carry a body.
                    tracing::info!(error = %query_err, "No content.");
                    return StatusCode::NO_CONTENT.into_response();
                }
                ErrorKind::InvalidDate => (StatusCode::BAD_REQUEST, query_err.to_string()),
            },
            AppError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            AppError::Task(join_err) => {
                tracing::error!(error = ?join_err, "Query task failed.");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred while answering the query".to_string(),
                )
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
