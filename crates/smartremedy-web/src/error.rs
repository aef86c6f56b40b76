//! Errors that abort a request instead of being rendered into the page.

use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use smartremedy_common::SmartRemedyError;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum WebError {
    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),

    #[error("Malformed upload: {0}")]
    Multipart(#[from] MultipartError),

    #[error(transparent)]
    Client(#[from] SmartRemedyError),
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status = match &self {
            WebError::Multipart(_) => StatusCode::BAD_REQUEST,
            WebError::Template(_) | WebError::Client(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        error!(error = %self, status = status.as_u16(), "request failed");
        (status, self.to_string()).into_response()
    }
}

pub type WebResult<T> = std::result::Result<T, WebError>;
