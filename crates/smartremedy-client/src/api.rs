//! SmartRemedy REST API client.
//!
//! Endpoints used:
//!   GET    /api/v1/dashboard-summary
//!   POST   /api/v1/upload            (multipart: file_recente)
//!   POST   /api/v1/compare           (multipart: file_antigo, file_recente)
//!   GET    /api/v1/reports
//!   DELETE /api/v1/reports/{n}
//!   POST   /api/v1/feedback
//!   POST   /admin/login
//!   GET    /health
//!
//! Every request carries the session's bearer token when there is one. A 401
//! to a request that carried a token invalidates the session before the error
//! is returned.

use std::sync::Arc;

use reqwest::header::AUTHORIZATION;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use smartremedy_common::error::ApiErrorBody;
use smartremedy_common::{
    CompareResponse, DashboardSummary, Feedback, FeedbackReceipt, HealthStatus, LoginCredentials,
    LoginResponse, Report, ReportId, ReportUrls, Result, SmartRemedyError, UploadResponse,
};
use tracing::{debug, instrument, warn};
use url::Url;

use crate::session::Session;

const DASHBOARD_SUMMARY_PATH: &str = "/api/v1/dashboard-summary";
const UPLOAD_PATH: &str = "/api/v1/upload";
const COMPARE_PATH: &str = "/api/v1/compare";
const REPORTS_PATH: &str = "/api/v1/reports";
const FEEDBACK_PATH: &str = "/api/v1/feedback";
const LOGIN_PATH: &str = "/admin/login";
const HEALTH_PATH: &str = "/health";

/// A CSV file picked in one of the upload forms.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub filename: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(filename: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self { filename: filename.into(), content_type: None, bytes: bytes.into() }
    }

    fn into_part(self) -> Result<Part> {
        let part = Part::bytes(self.bytes).file_name(self.filename);
        Ok(match self.content_type {
            Some(mime) => part.mime_str(&mime)?,
            None => part,
        })
    }
}

pub struct ApiClient {
    http: Client,
    /// Base URL without a trailing slash.
    base: String,
    session: Arc<Session>,
}

impl ApiClient {
    pub fn new(base_url: &str, session: Arc<Session>) -> Result<Self> {
        Self::with_client(Client::new(), base_url, session)
    }

    pub fn with_client(http: Client, base_url: &str, session: Arc<Session>) -> Result<Self> {
        let parsed = Url::parse(base_url)?;
        let base = parsed.as_str().trim_end_matches('/').to_string();
        Ok(Self { http, base, session })
    }

    pub fn base_url(&self) -> &str {
        &self.base
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// Make a backend-relative URL absolute. Absolute URLs pass through.
    pub fn resolve(&self, raw: &str) -> String {
        if Url::parse(raw).is_ok() {
            return raw.to_string();
        }
        if raw.starts_with('/') {
            format!("{}{}", self.base, raw)
        } else {
            format!("{}/{}", self.base, raw)
        }
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(Url::parse(&self.resolve(path))?)
    }

    // ── Endpoints ────────────────────────────────────────────────────────────

    #[instrument(skip(self))]
    pub async fn dashboard_summary(&self) -> Result<DashboardSummary> {
        let request = self.http.get(self.endpoint(DASHBOARD_SUMMARY_PATH)?);
        let mut summary: DashboardSummary = self.send_json(request).await?;

        if let Some(urls) = summary.latest_report_urls.take() {
            summary.latest_report_urls = Some(self.resolve_urls(urls));
        }
        for item in &mut summary.trend_history {
            item.url = self.resolve(&item.url);
        }
        debug!(has_kpis = summary.kpi_summary.is_some(), "dashboard summary loaded");
        Ok(summary)
    }

    #[instrument(skip(self, file), fields(filename = %file.filename))]
    pub async fn upload_standard(&self, file: UploadFile) -> Result<UploadResponse> {
        let form = Form::new().part("file_recente", file.into_part()?);
        let request = self.http.post(self.endpoint(UPLOAD_PATH)?).multipart(form);

        let mut response: UploadResponse = self.send_json(request).await?;
        response.report_urls = self.resolve_urls(response.report_urls);
        self.session.publish(crate::SessionEvent::ReportsChanged);
        Ok(response)
    }

    #[instrument(skip(self, older, recent), fields(older = %older.filename, recent = %recent.filename))]
    pub async fn upload_comparative(&self, older: UploadFile, recent: UploadFile) -> Result<CompareResponse> {
        let form = Form::new()
            .part("file_antigo", older.into_part()?)
            .part("file_recente", recent.into_part()?);
        let request = self.http.post(self.endpoint(COMPARE_PATH)?).multipart(form);

        let mut response: CompareResponse = self.send_json(request).await?;
        response.report_url = self.resolve(&response.report_url);
        self.session.publish(crate::SessionEvent::ReportsChanged);
        Ok(response)
    }

    #[instrument(skip(self))]
    pub async fn reports(&self) -> Result<Vec<Report>> {
        let request = self.http.get(self.endpoint(REPORTS_PATH)?);
        let mut reports: Vec<Report> = self.send_json(request).await?;
        for report in &mut reports {
            report.url = self.resolve(&report.url);
        }
        debug!(count = reports.len(), "report history loaded");
        Ok(reports)
    }

    #[instrument(skip(self, id), fields(id = %id))]
    pub async fn delete_report(&self, id: ReportId) -> Result<()> {
        let path = format!("{}/{}", REPORTS_PATH, id.number);
        let request = self.http.delete(self.endpoint(&path)?);
        self.send(request).await?;
        self.session.publish(crate::SessionEvent::ReportsChanged);
        Ok(())
    }

    /// Exchange credentials for a bearer token. Storing it is the session's job.
    #[instrument(skip(self, credentials), fields(username = %credentials.username))]
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<LoginResponse> {
        let request = self.http.post(self.endpoint(LOGIN_PATH)?).json(credentials);
        self.send_json(request).await
    }

    #[instrument(skip(self))]
    pub async fn health(&self) -> Result<HealthStatus> {
        let request = self.http.get(self.endpoint(HEALTH_PATH)?);
        self.send_json(request).await
    }

    #[instrument(skip(self, feedback), fields(kind = %feedback.kind))]
    pub async fn submit_feedback(&self, feedback: &Feedback) -> Result<FeedbackReceipt> {
        feedback.validate()?;
        let request = self.http.post(self.endpoint(FEEDBACK_PATH)?).json(feedback);
        self.send_json(request).await
    }

    // ── Plumbing ─────────────────────────────────────────────────────────────

    fn resolve_urls(&self, urls: ReportUrls) -> ReportUrls {
        ReportUrls {
            summary: urls.summary.map(|u| self.resolve(&u)),
            action_plan: urls.action_plan.map(|u| self.resolve(&u)),
            trend: urls.trend.map(|u| self.resolve(&u)),
        }
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = self.send(request).await?;
        Ok(response.json().await?)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let authorization = self.session.authorization_header().await;
        let had_token = authorization.is_some();
        let request = match authorization {
            Some(value) => request.header(AUTHORIZATION, value),
            None => request,
        };

        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        if status == StatusCode::UNAUTHORIZED && had_token {
            self.session.invalidate().await;
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiErrorBody>(&body).ok().map(|b| b.error);
        warn!(status = status.as_u16(), message = message.as_deref().unwrap_or(""), "backend request failed");
        Err(SmartRemedyError::Status { status: status.as_u16(), message })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn client(base: &str) -> ApiClient {
        let session = Arc::new(Session::new(Arc::new(MemoryStore::new())));
        ApiClient::new(base, session).unwrap()
    }

    #[test]
    fn relative_urls_are_prefixed_with_base() {
        let api = client("http://backend:5000/");
        assert_eq!(api.base_url(), "http://backend:5000");
        assert_eq!(api.resolve("/reports/run_1/x.html"), "http://backend:5000/reports/run_1/x.html");
        assert_eq!(api.resolve("reports/a.html"), "http://backend:5000/reports/a.html");
    }

    #[test]
    fn absolute_urls_pass_through() {
        let api = client("http://backend:5000");
        assert_eq!(api.resolve("https://cdn.example.com/r.html"), "https://cdn.example.com/r.html");
    }

    #[test]
    fn base_path_prefix_is_kept() {
        let api = client("https://example.com/smartremedy");
        assert_eq!(api.resolve("/api/v1/reports"), "https://example.com/smartremedy/api/v1/reports");
    }

    #[test]
    fn invalid_base_url_rejected() {
        let session = Arc::new(Session::new(Arc::new(MemoryStore::new())));
        assert!(ApiClient::new("backend without scheme", session).is_err());
    }
}
