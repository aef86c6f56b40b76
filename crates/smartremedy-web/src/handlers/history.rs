//! Report history: standard and comparative analyses, admin-only deletion.

use axum::extract::{Path, State};
use axum::response::{Html, IntoResponse, Redirect, Response};
use minijinja::context;
use serde::Serialize;
use smartremedy_common::{Report, ReportId, ReportKind};
use tracing::{info, warn};

use crate::error::WebResult;
use crate::state::{AppState, SharedState};

const LOAD_FAILED: &str = "Failed to load the report history.";
const DELETE_FAILED: &str = "Failed to delete the report.";

#[derive(Debug, Serialize)]
struct HistoryRow {
    id: String,
    timestamp: String,
    filename: String,
    date_range: String,
    url: String,
}

impl From<&Report> for HistoryRow {
    fn from(report: &Report) -> Self {
        Self {
            id: report.id.clone(),
            timestamp: report.display_timestamp(),
            filename: report.original_filename.clone(),
            date_range: report.display_date_range().to_string(),
            url: report.url.clone(),
        }
    }
}

fn rows_of(reports: &[Report], kind: ReportKind) -> Vec<HistoryRow> {
    reports.iter().filter(|r| r.kind == kind).map(HistoryRow::from).collect()
}

pub async fn history_page(State(state): State<SharedState>) -> WebResult<Html<String>> {
    render_history(&state, None).await
}

pub(crate) async fn render_history(state: &AppState, action_error: Option<String>) -> WebResult<Html<String>> {
    let reports = state.api.reports().await;
    let layout = state.layout("/history", "Report history").await;

    match reports {
        Ok(reports) => state.views.render(
            "history.html",
            context! {
                layout,
                empty => reports.is_empty(),
                standard => rows_of(&reports, ReportKind::Standard),
                comparative => rows_of(&reports, ReportKind::Comparative),
                action_error,
            },
        ),
        Err(e) => {
            warn!(error = %e, "report history unavailable");
            state.views.render(
                "history.html",
                context! { layout, load_error => e.user_message(LOAD_FAILED) },
            )
        }
    }
}

pub async fn delete_report(State(state): State<SharedState>, Path(raw_id): Path<String>) -> WebResult<Response> {
    let id = match raw_id.parse::<ReportId>() {
        Ok(id) => id,
        Err(e) => return deletion_failed(&state, e.user_message(DELETE_FAILED)).await,
    };
    // The backend endpoint only knows standard analyses by number.
    if id.kind != ReportKind::Standard {
        return deletion_failed(&state, "Only standard analyses can be deleted.".to_string()).await;
    }

    match state.api.delete_report(id).await {
        Ok(()) => {
            info!(%id, "report deleted");
            Ok(Redirect::to("/history").into_response())
        }
        Err(e) => deletion_failed(&state, e.user_message(DELETE_FAILED)).await,
    }
}

async fn deletion_failed(state: &AppState, message: String) -> WebResult<Response> {
    Ok(render_history(state, Some(message)).await?.into_response())
}
