//! Server-Sent Events: session changes pushed to every open tab.
//!
//! Each frame is named after what the page should refresh (`auth`, `theme`
//! or `reports`) and carries the JSON-encoded [`SessionEvent`] as data.

use std::convert::Infallible;
use std::time::Duration;

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures_core::Stream;
use smartremedy_client::SessionEvent;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;
use tracing::{debug, warn};

use crate::state::SharedState;

const KEEP_ALIVE: Duration = Duration::from_secs(15);

/// SSE `event:` field for a session event.
pub fn event_name(event: &SessionEvent) -> &'static str {
    match event {
        SessionEvent::LoggedIn | SessionEvent::LoggedOut | SessionEvent::AuthExpired => "auth",
        SessionEvent::ThemeChanged { .. } => "theme",
        SessionEvent::ReportsChanged => "reports",
    }
}

fn to_frame(event: &SessionEvent) -> Option<Event> {
    match serde_json::to_string(event) {
        Ok(data) => Some(Event::default().event(event_name(event)).data(data)),
        Err(e) => {
            warn!(error = %e, "dropping unserialisable session event");
            None
        }
    }
}

/// SSE endpoint. Lagged receivers skip what they missed; the next event
/// still triggers a reload.
pub async fn sse_handler(
    State(state): State<SharedState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    debug!("event stream opened");
    let stream = BroadcastStream::new(state.subscribe())
        .filter_map(|received| received.ok().as_ref().and_then(to_frame).map(Ok));

    Sse::new(stream).keep_alive(KeepAlive::new().interval(KEEP_ALIVE).text("ping"))
}
