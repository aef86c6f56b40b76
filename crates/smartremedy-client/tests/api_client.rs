//! REST client against an in-process mock backend.
//!
//! Run with: cargo test --package smartremedy-client --test api_client

use std::sync::Arc;

use axum::http::Method;
use pretty_assertions::assert_eq;
use serde_json::json;
use smartremedy_client::{ApiClient, KeyValueStore, MemoryStore, Session, SessionEvent, UploadFile, TOKEN_KEY};
use smartremedy_common::{LoginCredentials, ReportKind};
use smartremedy_test_utils::{fixtures, MockBackend};
use tokio_test::{assert_err, assert_ok};

async fn client_with_token(backend: &MockBackend, token: Option<&str>) -> (ApiClient, Arc<MemoryStore>) {
    let store = Arc::new(match token {
        Some(token) => MemoryStore::with_entries([(TOKEN_KEY, token)]),
        None => MemoryStore::new(),
    });
    let session = Arc::new(Session::new(store.clone()));
    session.initialize().await;
    (ApiClient::new(&backend.url(), session).unwrap(), store)
}

#[tokio::test]
async fn dashboard_summary_resolves_relative_links() {
    let backend = MockBackend::start().await;
    backend.respond(Method::GET, "/api/v1/dashboard-summary", 200, fixtures::dashboard_summary()).await;
    let (api, _) = client_with_token(&backend, None).await;

    let summary = api.dashboard_summary().await.unwrap();

    let urls = summary.latest_report_urls.unwrap();
    assert_eq!(urls.summary.unwrap(), format!("{}/reports/run_20251026/resumo_geral.html", backend.url()));
    assert_eq!(urls.trend, None);
    assert_eq!(
        summary.trend_history[0].url,
        format!("{}/reports/run_20251026/analise_tendencia.html", backend.url())
    );
    assert_eq!(summary.kpi_summary.unwrap().total_casos, 60);
}

#[tokio::test]
async fn empty_dashboard_has_no_kpis() {
    let backend = MockBackend::start().await;
    backend.respond(Method::GET, "/api/v1/dashboard-summary", 200, fixtures::empty_dashboard_summary()).await;
    let (api, _) = client_with_token(&backend, None).await;

    let summary = api.dashboard_summary().await.unwrap();
    assert!(summary.kpi_summary.is_none());
    assert!(summary.latest_report_urls.is_none());
}

#[tokio::test]
async fn bearer_token_sent_when_authenticated() {
    let backend = MockBackend::start().await;
    backend.respond(Method::GET, "/api/v1/reports", 200, fixtures::reports()).await;
    let (api, _) = client_with_token(&backend, Some("jwt-xyz")).await;

    api.reports().await.unwrap();

    let requests = backend.requests_to("/api/v1/reports").await;
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].authorization.as_deref(), Some("Bearer jwt-xyz"));
}

#[tokio::test]
async fn no_authorization_header_when_anonymous() {
    let backend = MockBackend::start().await;
    backend.respond(Method::GET, "/health", 200, json!({ "status": "ok", "version": "2.3.0" })).await;
    let (api, _) = client_with_token(&backend, None).await;

    let health = api.health().await.unwrap();
    assert!(health.is_ok());
    assert_eq!(health.version.as_deref(), Some("2.3.0"));
    assert_eq!(backend.requests().await[0].authorization, None);
}

#[tokio::test]
async fn reports_list_keeps_kinds_and_absolute_urls() {
    let backend = MockBackend::start().await;
    backend.respond(Method::GET, "/api/v1/reports", 200, fixtures::reports()).await;
    let (api, _) = client_with_token(&backend, None).await;

    let reports = api.reports().await.unwrap();
    assert_eq!(reports.len(), 3);
    assert_eq!(reports[2].kind, ReportKind::Comparative);
    assert!(reports.iter().all(|r| r.url.starts_with(&backend.url())));
}

#[tokio::test]
async fn upload_sends_file_recente_part() {
    let backend = MockBackend::start().await;
    backend.respond(Method::POST, "/api/v1/upload", 200, fixtures::upload_response()).await;
    let (api, _) = client_with_token(&backend, Some("jwt")).await;

    let response = api
        .upload_standard(UploadFile::new("alerts.csv", b"numero,status\n1,ok\n".to_vec()))
        .await
        .unwrap();

    assert!(response.success);
    assert_eq!(response.kpi_summary.unwrap().casos_sucesso, 57);
    assert_eq!(
        response.report_urls.trend.unwrap(),
        format!("{}/reports/run_20251027/analise_tendencia.html", backend.url())
    );

    let request = &backend.requests_to("/api/v1/upload").await[0];
    assert!(request.content_type.as_deref().unwrap().starts_with("multipart/form-data"));
    assert!(request.has_multipart_field("file_recente"));
    assert!(request.body_text().contains("alerts.csv"));
}

#[tokio::test]
async fn compare_sends_both_files() {
    let backend = MockBackend::start().await;
    backend
        .respond(Method::POST, "/api/v1/compare", 200, json!({ "success": true, "report_url": "/reports/cmp/trend.html" }))
        .await;
    let (api, _) = client_with_token(&backend, Some("jwt")).await;

    let response = api
        .upload_comparative(UploadFile::new("old.csv", b"a".to_vec()), UploadFile::new("new.csv", b"b".to_vec()))
        .await
        .unwrap();

    assert_eq!(response.report_url, format!("{}/reports/cmp/trend.html", backend.url()));
    let request = &backend.requests_to("/api/v1/compare").await[0];
    assert!(request.has_multipart_field("file_antigo"));
    assert!(request.has_multipart_field("file_recente"));
}

#[tokio::test]
async fn delete_uses_numeric_id() {
    let backend = MockBackend::start().await;
    backend.respond(Method::DELETE, "/api/v1/reports/12", 200, json!({ "success": true })).await;
    let (api, _) = client_with_token(&backend, Some("jwt")).await;
    let mut events = api.session().subscribe();

    assert_ok!(api.delete_report("standard-12".parse().unwrap()).await);

    assert_eq!(backend.requests_to("/api/v1/reports/12").await.len(), 1);
    assert_eq!(events.recv().await.unwrap(), SessionEvent::ReportsChanged);
}

#[tokio::test]
async fn backend_error_message_is_surfaced() {
    let backend = MockBackend::start().await;
    backend
        .respond(Method::DELETE, "/api/v1/reports/99", 404, json!({ "error": "Relatório com ID 99 não encontrado." }))
        .await;
    let (api, _) = client_with_token(&backend, Some("jwt")).await;

    let err = api.delete_report("standard-99".parse().unwrap()).await.unwrap_err();
    assert_eq!(err.user_message("Failed to delete the report."), "Relatório com ID 99 não encontrado.");
    assert!(api.session().is_authenticated().await);
}

#[tokio::test]
async fn unauthorized_response_clears_token_and_broadcasts() {
    let backend = MockBackend::start().await;
    backend.respond(Method::POST, "/api/v1/upload", 401, json!({ "error": "Token expirado." })).await;
    let (api, store) = client_with_token(&backend, Some("expired")).await;
    let mut events = api.session().subscribe();

    let err = api.upload_standard(UploadFile::new("a.csv", b"x".to_vec())).await.unwrap_err();

    assert!(err.is_unauthorized());
    assert!(!api.session().is_authenticated().await);
    assert_eq!(store.get(TOKEN_KEY).await.unwrap(), None);
    assert_eq!(events.recv().await.unwrap(), SessionEvent::AuthExpired);
}

#[tokio::test]
async fn login_returns_token_without_storing_it() {
    let backend = MockBackend::start().await;
    backend.respond(Method::POST, "/admin/login", 200, json!({ "access_token": "jwt-new" })).await;
    let (api, store) = client_with_token(&backend, None).await;

    let credentials = LoginCredentials { username: "admin".into(), password: "secret".into() };
    let response = api.login(&credentials).await.unwrap();

    assert_eq!(response.access_token, "jwt-new");
    assert_eq!(store.get(TOKEN_KEY).await.unwrap(), None);
    let body: serde_json::Value = serde_json::from_slice(&backend.requests().await[0].body).unwrap();
    assert_eq!(body, json!({ "username": "admin", "password": "secret" }));
}

#[tokio::test]
async fn failed_login_is_not_a_session_reset_for_anonymous_users() {
    let backend = MockBackend::start().await;
    backend.respond(Method::POST, "/admin/login", 401, json!({ "error": "Credenciais inválidas." })).await;
    let (api, _) = client_with_token(&backend, None).await;
    let mut events = api.session().subscribe();

    let credentials = LoginCredentials { username: "admin".into(), password: "wrong".into() };
    let err = api.login(&credentials).await.unwrap_err();
    assert_eq!(err.user_message("Login failed."), "Credenciais inválidas.");
    assert!(!api.session().is_authenticated().await);
    assert!(events.try_recv().is_err());
}

#[tokio::test]
async fn invalid_feedback_never_reaches_backend() {
    let backend = MockBackend::start().await;
    let (api, _) = client_with_token(&backend, None).await;

    let feedback = smartremedy_common::Feedback::default();
    assert_err!(api.submit_feedback(&feedback).await);
    assert!(backend.requests().await.is_empty());
}
