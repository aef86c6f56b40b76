//! Report previews shown on the dashboard between requests.

use serde::Serialize;
use smartremedy_common::{DashboardSummary, ReportUrls, UploadResponse};
use tokio::sync::RwLock;

/// What the dashboard shows instead of the upload forms.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Previews {
    pub urls: ReportUrls,
    pub quick_diagnosis: Option<String>,
    pub date_range: Option<String>,
}

#[derive(Debug, Default)]
struct CacheInner {
    previews: Option<Previews>,
    /// Set by "New analysis": the next render skips hydration once.
    fresh_analysis: bool,
}

#[derive(Debug, Default)]
pub struct DashboardCache {
    inner: RwLock<CacheInner>,
}

impl DashboardCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn previews(&self) -> Option<Previews> {
        self.inner.read().await.previews.clone()
    }

    pub async fn has_previews(&self) -> bool {
        self.inner.read().await.previews.is_some()
    }

    /// Merge the latest run from a dashboard summary.
    ///
    /// Right after "New analysis" nothing is merged so the upload forms stay
    /// visible for that one render.
    pub async fn hydrate(&self, summary: &DashboardSummary) {
        let mut inner = self.inner.write().await;
        if inner.fresh_analysis {
            inner.fresh_analysis = false;
            return;
        }

        if let Some(urls) = summary.latest_report_urls.clone() {
            inner.previews = Some(Previews {
                urls,
                quick_diagnosis: None,
                date_range: summary.latest_report_date_range.clone(),
            });
        }
        if let (Some(previews), Some(html)) = (inner.previews.as_mut(), &summary.quick_diagnosis_html) {
            previews.quick_diagnosis = Some(html.clone());
        }
    }

    /// Previews straight from a finished upload.
    pub async fn show_upload(&self, response: &UploadResponse) {
        let mut inner = self.inner.write().await;
        inner.fresh_analysis = false;
        inner.previews = Some(Previews {
            urls: response.report_urls.clone(),
            quick_diagnosis: response.quick_diagnosis_html.clone(),
            date_range: response.date_range.clone(),
        });
    }

    /// Forget the current run. Clearing the URLs clears the diagnosis with them.
    pub async fn start_new_analysis(&self) {
        let mut inner = self.inner.write().await;
        inner.previews = None;
        inner.fresh_analysis = true;
    }
}
