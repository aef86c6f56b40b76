//! Liveness endpoint, including the backend's own health.
//!
//! `backend` is the backend's health object, or the error text when it is
//! unreachable.

use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use crate::state::SharedState;

pub async fn health(State(state): State<SharedState>) -> Json<Value> {
    let backend = match state.api.health().await {
        Ok(status) => json!(status),
        Err(e) => Value::String(e.to_string()),
    };

    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "backend": backend,
    }))
}
