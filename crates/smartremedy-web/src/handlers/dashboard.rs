//! Dashboard page: KPI cards, report previews or upload forms, trend history.

use axum::extract::State;
use axum::response::{Html, Redirect};
use minijinja::context;
use smartremedy_common::KpiSummary;
use tracing::{info, warn};

use crate::error::WebResult;
use crate::state::{AppState, SharedState};
use crate::views::KpiPanel;

const LOAD_FAILED: &str = "Failed to load dashboard data. Is the backend up?";

/// Messages and overrides carried into a dashboard render after a form post.
#[derive(Debug, Default)]
pub(crate) struct DashboardNotice {
    /// KPIs from a finished upload, shown instead of the summary's.
    pub kpi_override: Option<KpiSummary>,
    pub upload_error: Option<String>,
    pub compare_error: Option<String>,
    pub login_error: Option<String>,
    /// Keep the cache as the form handler left it.
    pub skip_hydrate: bool,
}

impl DashboardNotice {
    pub fn after_post() -> Self {
        Self { skip_hydrate: true, ..Self::default() }
    }
}

pub async fn dashboard(State(state): State<SharedState>) -> WebResult<Html<String>> {
    render_dashboard(&state, DashboardNotice::default()).await
}

pub(crate) async fn render_dashboard(state: &AppState, notice: DashboardNotice) -> WebResult<Html<String>> {
    let (kpis, trend_history) = match state.api.dashboard_summary().await {
        Ok(summary) => {
            if !notice.skip_hydrate {
                state.dashboard.hydrate(&summary).await;
            }
            let kpi = notice.kpi_override.as_ref().or(summary.kpi_summary.as_ref());
            (KpiPanel::from_summary(kpi), summary.trend_history)
        }
        Err(e) => {
            warn!(error = %e, "dashboard summary unavailable");
            let kpis = match notice.kpi_override.as_ref() {
                Some(kpi) => KpiPanel::from_summary(Some(kpi)),
                None => KpiPanel::Failed { message: LOAD_FAILED.to_string() },
            };
            (kpis, Vec::new())
        }
    };

    // Built after the backend call: a 401 above changes the sidebar.
    let layout = state.layout("/", "Dashboard").await;
    let previews = state.dashboard.previews().await;

    state.views.render(
        "dashboard.html",
        context! {
            layout,
            kpis,
            trend_history,
            previews,
            upload_error => notice.upload_error,
            compare_error => notice.compare_error,
            login_error => notice.login_error,
        },
    )
}

/// "New analysis": drop the previews and go back to the upload forms.
pub async fn new_analysis(State(state): State<SharedState>) -> Redirect {
    state.dashboard.start_new_analysis().await;
    info!("report previews cleared for a new analysis");
    Redirect::to("/")
}
