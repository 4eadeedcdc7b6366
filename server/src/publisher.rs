//! Shared map publishing.

use log::debug;
use shared::board::Board;
use shared::store::sender::Sender;
use shared::store::StoreError;
use shared::KEY_MAP;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::interval;

/// Pushes the flat encoding of the current overlay board under the game
/// identity's map key on a fixed cadence. The store fans the value out to
/// every registered client webhook.
pub async fn publish_map(
    sender: Arc<Sender>,
    game_host: String,
    overlay: watch::Receiver<Arc<Board>>,
    every: Duration,
) -> Result<(), StoreError> {
    let mut ticker = interval(every);
    loop {
        ticker.tick().await;
        let board = overlay.borrow().clone();
        sender.send_value(&game_host, KEY_MAP, &board.encode()).await?;
        debug!("published {} map cells", board.size() * board.size());
    }
}
