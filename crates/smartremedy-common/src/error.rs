use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SmartRemedyError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Backend returned HTTP {status}: {}", .message.as_deref().unwrap_or("no error message"))]
    Status { status: u16, message: Option<String> },

    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Invalid report id: {0}")]
    InvalidReportId(String),

    #[error("{0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl SmartRemedyError {
    /// True when the backend rejected the bearer token.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Status { status: 401, .. })
    }

    /// Message shown to the user: the backend's own `error` text when it sent
    /// one, otherwise `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Status { message: Some(message), .. } if !message.is_empty() => message.clone(),
            Self::InvalidReportId(_) => "Invalid report id.".to_string(),
            Self::Validation(message) => message.clone(),
            _ => fallback.to_string(),
        }
    }
}

/// Error envelope the backend uses for every non-2xx JSON response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub error: String,
}

pub type Result<T> = std::result::Result<T, SmartRemedyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_message_wins_over_fallback() {
        let err = SmartRemedyError::Status { status: 400, message: Some("Nenhum arquivo selecionado.".into()) };
        assert_eq!(err.user_message("upload failed"), "Nenhum arquivo selecionado.");
    }

    #[test]
    fn fallback_used_without_backend_message() {
        let err = SmartRemedyError::Status { status: 500, message: None };
        assert_eq!(err.user_message("upload failed"), "upload failed");
        assert!(!err.is_unauthorized());
    }

    #[test]
    fn unauthorized_detected_from_status() {
        let err = SmartRemedyError::Status { status: 401, message: Some("Token expirado.".into()) };
        assert!(err.is_unauthorized());
        assert_eq!(err.to_string(), "Backend returned HTTP 401: Token expirado.");
    }

    #[test]
    fn invalid_report_id_has_its_own_message() {
        let err = SmartRemedyError::InvalidReportId("standard-x".into());
        assert_eq!(err.user_message("delete failed"), "Invalid report id.");
    }
}
