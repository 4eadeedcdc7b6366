//! Player position tracking and overlay board construction.

use log::debug;
use shared::board::Board;
use shared::position;
use shared::store::api::ApiClient;
use shared::store::{ItemRecord, StoreError};
use shared::{KEY_POSITION_PREFIX, SYMBOL_PLAYER};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::interval;

/// Polls the store for every player's raw position record and hands the
/// batch off whole. Runs until the store becomes unreachable.
pub async fn poll_positions(
    api: ApiClient,
    every: Duration,
    feed: watch::Sender<Arc<Vec<ItemRecord>>>,
) -> Result<(), StoreError> {
    let mut ticker = interval(every);
    loop {
        ticker.tick().await;
        let records = api.latest_items(KEY_POSITION_PREFIX).await?;
        feed.send_replace(Arc::new(records));
    }
}

/// Builds one overlay: a fresh copy of the reference board with a player
/// marker at each known, clamped position. Records that do not parse as a
/// position are skipped for this cycle. Players sharing a cell collapse to
/// one marker, last record wins.
pub fn build_overlay(reference: &Board, records: &[ItemRecord]) -> Board {
    let mut overlay = reference.clone();
    for record in records {
        let Some(raw) = position::parse(&record.value) else {
            if !record.value.is_empty() {
                debug!("skipping unparseable position {:?} for {}", record.value, record.host);
            }
            continue;
        };
        let (x, y) = position::clamp(raw, reference.size());
        overlay.set(x, y, SYMBOL_PLAYER);
    }
    overlay
}

/// Rebuilds the overlay from the latest position batch on a fixed cadence
/// and publishes each result as a whole snapshot; consumers never see a
/// partially drawn board.
pub async fn track_positions(
    reference: Arc<Board>,
    feed: watch::Receiver<Arc<Vec<ItemRecord>>>,
    overlay_tx: watch::Sender<Arc<Board>>,
    every: Duration,
) -> Result<(), StoreError> {
    let mut ticker = interval(every);
    loop {
        ticker.tick().await;
        let records = feed.borrow().clone();
        overlay_tx.send_replace(Arc::new(build_overlay(&reference, &records)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::SYMBOL_EMPTY;

    fn record(host: &str, value: &str) -> ItemRecord {
        ItemRecord {
            host: host.to_string(),
            key: format!("{KEY_POSITION_PREFIX}{host}"),
            value: value.to_string(),
        }
    }

    fn blank_board(size: usize) -> Board {
        Board::decode(&SYMBOL_EMPTY.to_string().repeat(size * size), size).unwrap()
    }

    #[test]
    fn overlay_marks_each_player() {
        let reference = blank_board(5);
        let overlay = build_overlay(
            &reference,
            &[record("Player 1", "1 2"), record("Player 2", "4 0")],
        );
        assert_eq!(overlay.at(1, 2), SYMBOL_PLAYER);
        assert_eq!(overlay.at(4, 0), SYMBOL_PLAYER);
        // Reference board is untouched.
        assert_eq!(reference.at(1, 2), SYMBOL_EMPTY);
    }

    #[test]
    fn out_of_range_positions_are_clamped() {
        let reference = blank_board(10);
        let overlay = build_overlay(
            &reference,
            &[record("Player 1", "-1 5"), record("Player 2", "42 42")],
        );
        assert_eq!(overlay.at(0, 5), SYMBOL_PLAYER);
        assert_eq!(overlay.at(9, 9), SYMBOL_PLAYER);
    }

    #[test]
    fn unparseable_records_are_skipped() {
        let reference = blank_board(4);
        let overlay = build_overlay(
            &reference,
            &[
                record("Player 1", ""),
                record("Player 2", "not a position"),
                record("Player 3", "2 2"),
            ],
        );
        assert_eq!(overlay.encode().matches(SYMBOL_PLAYER).count(), 1);
        assert_eq!(overlay.at(2, 2), SYMBOL_PLAYER);
    }

    #[test]
    fn colocated_players_collapse_to_one_marker() {
        let reference = blank_board(4);
        let overlay = build_overlay(
            &reference,
            &[record("Player 1", "1 1"), record("Player 2", "1 1")],
        );
        assert_eq!(overlay.encode().matches(SYMBOL_PLAYER).count(), 1);
    }

    #[test]
    fn overlay_preserves_walls_and_letters() {
        let reference = Board::decode("A│ ─", 2).unwrap();
        let overlay = build_overlay(&reference, &[record("Player 1", "0 1")]);
        assert_eq!(overlay.at(0, 0), 'A');
        assert_eq!(overlay.at(1, 0), '│');
        assert_eq!(overlay.at(0, 1), SYMBOL_PLAYER);
        assert_eq!(overlay.at(1, 1), '─');
    }
}
