//! HTTP handlers for all web routes.

pub mod auth;
pub mod dashboard;
pub mod feedback;
pub mod history;
pub mod system;
pub mod theme;
pub mod upload;
