//! Inbound map webhook.
//!
//! The store pushes map snapshots as HTTP POSTs with a newline-delimited
//! JSON body; deliveries may batch several snapshots, and only the newest
//! line counts. There is no sequencing between deliveries: whichever POST
//! is processed last wins, even if it was generated earlier upstream.

use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::routing::post;
use axum::Router;
use log::{debug, warn};
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::watch;

pub struct WebhookState {
    pub token: String,
    pub map_tx: watch::Sender<String>,
}

#[derive(Deserialize)]
struct MapLine {
    value: String,
}

pub fn router(state: Arc<WebhookState>) -> Router {
    Router::new().route("/", post(receive_map)).with_state(state)
}

/// Binds the webhook endpoint and serves it until process teardown.
pub async fn serve(addr: &str, state: Arc<WebhookState>) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    debug!("webhook listening on {addr}");
    axum::serve(listener, router(state)).await
}

/// Extracts the map value from the last NDJSON line of a delivery body.
pub fn last_value(body: &str) -> Option<String> {
    let line = body.lines().last()?;
    serde_json::from_str::<MapLine>(line).ok().map(|l| l.value)
}

async fn receive_map(
    State(state): State<Arc<WebhookState>>,
    headers: HeaderMap,
    body: String,
) -> StatusCode {
    let expected = format!("Bearer {}", state.token);
    let authorized = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        == Some(expected.as_str());
    if !authorized {
        warn!("rejected map delivery with bad bearer token");
        return StatusCode::UNAUTHORIZED;
    }

    match last_value(&body) {
        Some(value) => {
            state.map_tx.send_replace(value);
            StatusCode::OK
        }
        None => StatusCode::BAD_REQUEST,
    }
}
