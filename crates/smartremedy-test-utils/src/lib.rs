//! Shared testing utilities for the SmartRemedy workspace.
//!
//! `MockBackend` is a real HTTP server on an ephemeral loopback port that
//! answers with canned JSON per `(method, path)` and records every request,
//! so the REST client and the dashboard handlers can be exercised end to end.

pub mod fixtures;

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, Method, StatusCode, Uri},
    Json, Router,
};
use serde_json::{json, Value};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

/// One request as seen by the mock backend.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// True when a multipart body contains a part with this field name.
    pub fn has_multipart_field(&self, name: &str) -> bool {
        self.body_text().contains(&format!("name=\"{name}\""))
    }
}

#[derive(Default)]
struct MockInner {
    routes: HashMap<(Method, String), (StatusCode, Value)>,
    requests: Vec<RecordedRequest>,
}

type Shared = Arc<Mutex<MockInner>>;

pub struct MockBackend {
    addr: SocketAddr,
    inner: Shared,
    handle: JoinHandle<()>,
}

impl MockBackend {
    pub async fn start() -> Self {
        let inner: Shared = Arc::default();
        let app = Router::new().fallback(record_and_answer).with_state(inner.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock backend");
        let addr = listener.local_addr().expect("mock backend address");
        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!(error = %e, "mock backend stopped");
            }
        });

        Self { addr, inner, handle }
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Answer `method path` with `status` and a JSON body from now on.
    pub async fn respond(&self, method: Method, path: &str, status: u16, body: Value) {
        let status = StatusCode::from_u16(status).expect("valid status code");
        self.inner
            .lock()
            .await
            .routes
            .insert((method, path.to_string()), (status, body));
    }

    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.inner.lock().await.requests.clone()
    }

    pub async fn requests_to(&self, path: &str) -> Vec<RecordedRequest> {
        self.inner
            .lock()
            .await
            .requests
            .iter()
            .filter(|r| r.path == path)
            .cloned()
            .collect()
    }
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn record_and_answer(
    State(inner): State<Shared>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, Json<Value>) {
    let header_str = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };

    let mut inner = inner.lock().await;
    inner.requests.push(RecordedRequest {
        method: method.clone(),
        path: uri.path().to_string(),
        authorization: header_str(header::AUTHORIZATION),
        content_type: header_str(header::CONTENT_TYPE),
        body: body.to_vec(),
    });

    match inner.routes.get(&(method, uri.path().to_string())) {
        Some((status, body)) => (*status, Json(body.clone())),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": format!("no mock for {}", uri.path()) })),
        ),
    }
}
