//! User feedback form, forwarded to the backend.

use axum::extract::State;
use axum::response::Html;
use axum::Form;
use minijinja::context;
use serde::{Deserialize, Serialize};
use smartremedy_common::feedback::{MAX_CONTEXT_CHARS, MAX_DESCRIPTION_CHARS, MAX_TITLE_CHARS};
use smartremedy_common::{Feedback, FeedbackKind, FeedbackReceipt, Result};
use tracing::info;

use crate::error::WebResult;
use crate::state::{AppState, SharedState};

const SUBMIT_FAILED: &str = "Failed to send feedback. Try again later.";

/// Raw form fields, echoed back when the submission is rejected.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct FeedbackForm {
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub context: String,
}

fn non_blank(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

impl FeedbackForm {
    fn to_feedback(&self) -> Result<Feedback> {
        Ok(Feedback {
            kind: self.kind.parse()?,
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            email: non_blank(&self.email),
            context: non_blank(&self.context),
        })
    }
}

#[derive(Serialize)]
struct KindOption {
    value: &'static str,
    label: &'static str,
}

pub async fn feedback_page(State(state): State<SharedState>) -> WebResult<Html<String>> {
    let form = FeedbackForm { kind: FeedbackKind::default().to_string(), ..FeedbackForm::default() };
    render(&state, &form, None, None).await
}

pub async fn feedback_submit(State(state): State<SharedState>, Form(form): Form<FeedbackForm>) -> WebResult<Html<String>> {
    let outcome = match form.to_feedback() {
        Ok(feedback) => state.api.submit_feedback(&feedback).await,
        Err(e) => Err(e),
    };

    match outcome {
        Ok(receipt) => {
            info!(issue = receipt.issue_url.as_deref().unwrap_or(""), "feedback sent");
            render(&state, &FeedbackForm::default(), None, Some(receipt)).await
        }
        Err(e) => render(&state, &form, Some(e.user_message(SUBMIT_FAILED)), None).await,
    }
}

async fn render(
    state: &AppState,
    form: &FeedbackForm,
    error: Option<String>,
    receipt: Option<FeedbackReceipt>,
) -> WebResult<Html<String>> {
    let layout = state.layout("/feedback", "Feedback").await;
    let kinds: Vec<KindOption> = FeedbackKind::ALL
        .iter()
        .map(|kind| KindOption { value: kind.as_str(), label: kind.label() })
        .collect();

    state.views.render(
        "feedback.html",
        context! {
            layout,
            form,
            kinds,
            error,
            receipt,
            max_title => MAX_TITLE_CHARS,
            max_description => MAX_DESCRIPTION_CHARS,
            max_context => MAX_CONTEXT_CHARS,
        },
    )
}
