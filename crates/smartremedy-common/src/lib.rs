//! smartremedy-common: Wire types and the shared error type used by every
//! SmartRemedy crate.

pub mod error;
pub mod dashboard;
pub mod reports;
pub mod auth;
pub mod feedback;
pub mod health;

// Re-export commonly used types
pub use error::{Result, SmartRemedyError};
pub use dashboard::{DashboardSummary, KpiSummary, TrendHistoryItem};
pub use reports::{CompareResponse, Report, ReportId, ReportKind, ReportUrls, UploadResponse};
pub use auth::{LoginCredentials, LoginResponse};
pub use feedback::{Feedback, FeedbackKind, FeedbackReceipt};
pub use health::HealthStatus;
