//! smartremedy-web: browser dashboard for the SmartRemedy backend.
//! Server-rendered pages on top of `smartremedy-client`:
//!   - KPI dashboard with report previews and upload forms
//!   - Comparative analysis upload
//!   - Report history with admin-only deletion
//!   - Admin login / logout and theme preference
//!   - Feedback form
//!   - Live session events over SSE

pub mod cache;
pub mod error;
pub mod handlers;
pub mod router;
pub mod sse;
pub mod state;
pub mod views;
