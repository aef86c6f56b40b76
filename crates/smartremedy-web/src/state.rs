//! Shared application state for the web server.

use std::path::PathBuf;
use std::sync::Arc;

use smartremedy_client::{ApiClient, FileStore, KeyValueStore, Session, SessionEvent, ThemePreference};
use smartremedy_config::Config;
use tokio::sync::broadcast;

use crate::cache::DashboardCache;
use crate::error::WebResult;
use crate::views::{Layout, Views};

const MANAGEMENT_DOCS_PATH: &str = "/docs/doc_gerencial.html";
const API_DOCS_PATH: &str = "/apidocs/";

/// Server knobs that are not part of the backend contract.
#[derive(Debug, Clone)]
pub struct WebSettings {
    pub static_dir: PathBuf,
    pub max_upload_bytes: usize,
}

impl From<&Config> for WebSettings {
    fn from(config: &Config) -> Self {
        Self {
            static_dir: PathBuf::from(&config.server.static_dir),
            max_upload_bytes: config.server.max_upload_bytes,
        }
    }
}

/// Shared state injected into every Axum handler.
pub struct AppState {
    pub api: ApiClient,
    pub session: Arc<Session>,
    pub theme: ThemePreference,
    pub dashboard: DashboardCache,
    pub views: Views,
    pub settings: WebSettings,
}

impl AppState {
    pub async fn from_config(config: &Config) -> WebResult<Self> {
        let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(&config.storage.path));
        Self::with_store(&config.api.base_url, store, WebSettings::from(config)).await
    }

    /// Restore session and theme from `store` and point the client at `base_url`.
    pub async fn with_store(
        base_url: &str,
        store: Arc<dyn KeyValueStore>,
        settings: WebSettings,
    ) -> WebResult<Self> {
        let session = Arc::new(Session::new(store.clone()));
        session.initialize().await;
        let theme = ThemePreference::load(store).await;
        let api = ApiClient::new(base_url, session.clone())?;

        Ok(Self {
            api,
            session,
            theme,
            dashboard: DashboardCache::new(),
            views: Views::new()?,
            settings,
        })
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.session.subscribe()
    }

    pub async fn layout(&self, path: &'static str, title: &str) -> Layout {
        let theme = self.theme.current().await;
        Layout {
            title: title.to_string(),
            path,
            authenticated: self.session.is_authenticated().await,
            theme,
            body_class: theme.body_class(),
            show_new_analysis: self.dashboard.has_previews().await,
            docs_url: self.api.resolve(MANAGEMENT_DOCS_PATH),
            apidocs_url: self.api.resolve(API_DOCS_PATH),
            version: env!("CARGO_PKG_VERSION"),
        }
    }
}

pub type SharedState = Arc<AppState>;
