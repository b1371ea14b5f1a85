// src/error.rs

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DiaryError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database Error: {0}")]
    Sql(#[from] rusqlite::Error),

    #[error("Home directory not found")]
    HomeDirNotFound,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Entry ID {0} not found")]
    EntryNotFound(i64),

    #[error("Server Error: {0}")]
    Server(String),
}

pub type Result<T> = std::result::Result<T, DiaryError>;

impl IntoResponse for DiaryError {
    fn into_response(self) -> Response {
        match self {
            DiaryError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
            other => {
                tracing::error!("request failed: {other}");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
            }
        }
    }
}
