//! Light / dark theme switch.

use axum::extract::State;
use axum::http::header::REFERER;
use axum::http::HeaderMap;
use axum::response::Redirect;
use smartremedy_client::SessionEvent;
use tracing::info;
use url::Url;

use crate::state::SharedState;

/// Pages a redirect may land on with a GET.
const PAGES: &[&str] = &["/", "/history", "/admin/login", "/feedback"];

pub async fn toggle_theme(State(state): State<SharedState>, headers: HeaderMap) -> Redirect {
    let theme = state.theme.toggle().await;
    info!(%theme, "theme changed");
    state.session.publish(SessionEvent::ThemeChanged { theme });
    Redirect::to(back_target(&headers))
}

/// Path of the referring page when it is one of ours, `/` otherwise.
fn back_target(headers: &HeaderMap) -> &'static str {
    headers
        .get(REFERER)
        .and_then(|value| value.to_str().ok())
        .and_then(|raw| Url::parse(raw).ok())
        .and_then(|url| PAGES.iter().copied().find(|page| *page == url.path()))
        .unwrap_or("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn referer(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(REFERER, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn returns_to_known_page() {
        assert_eq!(back_target(&referer("http://localhost:3001/history")), "/history");
    }

    #[test]
    fn post_only_routes_fall_back_to_dashboard() {
        assert_eq!(back_target(&referer("http://localhost:3001/upload")), "/");
        assert_eq!(back_target(&HeaderMap::new()), "/");
        assert_eq!(back_target(&referer("not a url")), "/");
    }
}
