//! Standard and comparative analysis uploads.

use std::collections::HashMap;

use axum::extract::{Multipart, State};
use axum::response::{Html, IntoResponse, Redirect, Response};
use smartremedy_client::UploadFile;
use tracing::{debug, info};

use crate::error::WebResult;
use crate::handlers::dashboard::{render_dashboard, DashboardNotice};
use crate::state::{AppState, SharedState};

const RECENT_FIELD: &str = "file_recente";
const OLDER_FIELD: &str = "file_antigo";

const UPLOAD_FAILED: &str = "An error occurred during upload.";
const COMPARE_FAILED: &str = "An error occurred during the comparison.";

pub async fn upload(State(state): State<SharedState>, multipart: Multipart) -> WebResult<Html<String>> {
    let mut files = read_files(multipart).await?;
    let Some(file) = files.remove(RECENT_FIELD) else {
        return upload_failed(&state, "Please select a file.").await;
    };

    match state.api.upload_standard(file).await {
        Ok(response) => {
            info!(urls = ?response.report_urls, "analysis finished");
            state.dashboard.show_upload(&response).await;
            let notice = DashboardNotice { kpi_override: response.kpi_summary, ..DashboardNotice::after_post() };
            render_dashboard(&state, notice).await
        }
        Err(e) => upload_failed(&state, &e.user_message(UPLOAD_FAILED)).await,
    }
}

pub async fn compare(State(state): State<SharedState>, multipart: Multipart) -> WebResult<Response> {
    let mut files = read_files(multipart).await?;
    let (older, recent) = match (files.remove(OLDER_FIELD), files.remove(RECENT_FIELD)) {
        (None, _) => return compare_failed(&state, "Please select the older file.").await,
        (_, None) => return compare_failed(&state, "Please select the recent file.").await,
        (Some(older), Some(recent)) => (older, recent),
    };

    match state.api.upload_comparative(older, recent).await {
        Ok(response) => {
            info!(url = %response.report_url, "comparison finished");
            Ok(Redirect::to(&response.report_url).into_response())
        }
        Err(e) => compare_failed(&state, &e.user_message(COMPARE_FAILED)).await,
    }
}

async fn upload_failed(state: &AppState, message: &str) -> WebResult<Html<String>> {
    let notice = DashboardNotice { upload_error: Some(message.to_string()), ..DashboardNotice::after_post() };
    render_dashboard(state, notice).await
}

async fn compare_failed(state: &AppState, message: &str) -> WebResult<Response> {
    let notice = DashboardNotice { compare_error: Some(message.to_string()), ..DashboardNotice::after_post() };
    Ok(render_dashboard(state, notice).await?.into_response())
}

/// File parts by field name. A part without a filename or content counts as
/// not selected.
async fn read_files(mut multipart: Multipart) -> WebResult<HashMap<String, UploadFile>> {
    let mut files = HashMap::new();
    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.name().map(str::to_owned) else { continue };
        let filename = field.file_name().map(str::to_owned).unwrap_or_default();
        let content_type = field.content_type().map(str::to_owned);
        let bytes = field.bytes().await?;

        if filename.is_empty() || bytes.is_empty() {
            debug!(field = %name, "skipping empty file part");
            continue;
        }
        files.insert(name, UploadFile { filename, content_type, bytes: bytes.to_vec() });
    }
    Ok(files)
}
