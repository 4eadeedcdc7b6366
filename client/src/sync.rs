//! Polling loops for the client's own store items.
//!
//! The client's position is whatever the store last accepted for it, not
//! whatever it last sent; polling it back is what closes the movement
//! round trip. The score string is polled for display only.

use log::debug;
use shared::position;
use shared::store::api::ApiClient;
use shared::store::StoreError;
use shared::KEY_SCORE;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::interval;

/// Polls the player's position item and publishes the latest parsed value.
/// An empty or malformed value leaves the previous position in place.
pub async fn poll_position(
    api: Arc<ApiClient>,
    position_key: String,
    tx: watch::Sender<(i32, i32)>,
    every: Duration,
) -> Result<(), StoreError> {
    let mut ticker = interval(every);
    loop {
        ticker.tick().await;
        let items = api.latest_items(&position_key).await?;
        let Some(item) = items.first() else {
            debug!("no position item for {position_key} yet");
            continue;
        };
        let Some(pos) = position::parse(&item.value) else {
            continue;
        };
        tx.send_replace(pos);
    }
}

/// Polls the player's score item; the token's permissions scope the query
/// to the player's own host.
pub async fn poll_score(
    api: Arc<ApiClient>,
    tx: watch::Sender<String>,
    every: Duration,
) -> Result<(), StoreError> {
    let mut ticker = interval(every);
    loop {
        ticker.tick().await;
        let items = api.latest_items(KEY_SCORE).await?;
        if let Some(item) = items.first() {
            tx.send_replace(item.value.clone());
        }
    }
}
