//! Axum router: maps all URL paths to handlers.

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::handlers::{
    auth::{login_page, login_submit, logout},
    dashboard::{dashboard, new_analysis},
    feedback::{feedback_page, feedback_submit},
    history::{delete_report, history_page},
    system::health,
    theme::toggle_theme,
    upload::{compare, upload},
};
use crate::sse::sse_handler;
use crate::state::{AppState, SharedState};

/// Build and return the full Axum router.
pub fn build_router(state: AppState) -> Router {
    let static_dir = state.settings.static_dir.clone();
    let upload_limit = state.settings.max_upload_bytes;
    let shared: SharedState = Arc::new(state);

    Router::new()
        // Pages
        .route("/",                     get(dashboard))
        .route("/history",              get(history_page))
        .route("/feedback",             get(feedback_page).post(feedback_submit))
        .route("/admin/login",          get(login_page).post(login_submit))
        .route("/admin/logout",         get(logout))

        // Form actions
        .route("/upload",               post(upload))
        .route("/compare",              post(compare))
        .route("/analysis/new",         post(new_analysis))
        .route("/history/{id}/delete",  post(delete_report))
        .route("/logout",               post(logout))
        .route("/theme/toggle",         post(toggle_theme))

        // SSE streaming
        .route("/api/events", get(sse_handler))

        .route("/health", get(health))

        // Static files
        .nest_service("/static", ServeDir::new(static_dir))

        // Middleware
        .layer(DefaultBodyLimit::max(upload_limit))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(shared)
}
