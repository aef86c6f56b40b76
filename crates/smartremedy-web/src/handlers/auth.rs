//! Admin login and logout.

use axum::extract::State;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Form;
use minijinja::context;
use serde::Deserialize;
use smartremedy_common::{LoginCredentials, SmartRemedyError};
use tracing::error;

use crate::error::WebResult;
use crate::handlers::dashboard::{render_dashboard, DashboardNotice};
use crate::state::{AppState, SharedState};

const LOGIN_FAILED: &str = "Login failed. Check your credentials.";
const INLINE_LOGIN_FAILED: &str = "Authentication failed.";
const SESSION_NOT_SAVED: &str = "Signed in, but the session could not be saved locally.";

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    /// `inline` when posted from the overlay on the upload forms.
    #[serde(default)]
    pub origin: Option<String>,
}

impl LoginForm {
    fn is_inline(&self) -> bool {
        self.origin.as_deref() == Some("inline")
    }
}

pub async fn login_page(State(state): State<SharedState>) -> WebResult<Html<String>> {
    render_login(&state, None, "").await
}

pub async fn login_submit(State(state): State<SharedState>, Form(form): Form<LoginForm>) -> WebResult<Response> {
    let inline = form.is_inline();
    let credentials = LoginCredentials { username: form.username.trim().to_string(), password: form.password };

    match sign_in(&state, &credentials).await {
        Ok(()) => Ok(Redirect::to(if inline { "/" } else { "/history" }).into_response()),
        Err(e) if inline => {
            let notice = DashboardNotice {
                login_error: Some(e.user_message(INLINE_LOGIN_FAILED)),
                ..DashboardNotice::after_post()
            };
            Ok(render_dashboard(&state, notice).await?.into_response())
        }
        Err(e) => Ok(render_login(&state, Some(e.user_message(LOGIN_FAILED)), &credentials.username)
            .await?
            .into_response()),
    }
}

async fn sign_in(state: &AppState, credentials: &LoginCredentials) -> Result<(), SmartRemedyError> {
    if credentials.username.is_empty() || credentials.password.is_empty() {
        return Err(SmartRemedyError::Validation("Username and password are required.".into()));
    }
    let response = state.api.login(credentials).await?;
    state.session.login(response.access_token).await.map_err(|e| {
        error!(error = %e, "failed to persist auth token");
        SmartRemedyError::Validation(SESSION_NOT_SAVED.into())
    })
}

async fn render_login(state: &AppState, error: Option<String>, username: &str) -> WebResult<Html<String>> {
    let layout = state.layout("/admin/login", "Admin login").await;
    state.views.render("login.html", context! { layout, error, username })
}

pub async fn logout(State(state): State<SharedState>) -> Redirect {
    if let Err(e) = state.session.logout().await {
        error!(error = %e, "failed to remove auth token from storage");
    }
    Redirect::to("/")
}
