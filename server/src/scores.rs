//! Per-player score state machine and score publishing.
//!
//! The score tracker reads the raw, UNCLAMPED position against the
//! reference board: the letter layer is static, and a player that has
//! wandered off the addressable range simply scores nothing that cycle.
//! Revealing is the only mutation, so records are monotonic by
//! construction. Publishing runs on its own cadence and may push a value
//! that is one tracker cycle stale.

use log::info;
use shared::board::Board;
use shared::position;
use shared::store::sender::Sender;
use shared::store::{ItemRecord, StoreError};
use shared::word::{ScoreRecord, TargetWord};
use shared::KEY_SCORE;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, RwLock};
use tokio::time::interval;

/// Score records per player identity, shared between the tracker and the
/// publisher loops.
pub type ScoreTable = Arc<RwLock<HashMap<String, ScoreRecord>>>;

/// One score cycle: for every record with a usable position, look up the
/// symbol under the player on the reference board and reveal the matching
/// slots. A player identity is entered into the table the first time it
/// shows up with a non-empty position.
pub fn apply_positions(
    table: &mut HashMap<String, ScoreRecord>,
    reference: &Board,
    word: &TargetWord,
    records: &[ItemRecord],
) {
    for record in records {
        let Some((x, y)) = position::parse(&record.value) else {
            continue;
        };
        let entry = table
            .entry(record.host.clone())
            .or_insert_with(|| ScoreRecord::hidden(word.len()));

        let Some(symbol) = reference.get(x, y) else {
            continue;
        };
        if !word.contains(symbol) {
            continue;
        }

        let was_complete = entry.is_complete();
        for index in word.reveal_indices(symbol) {
            entry.reveal(index, symbol);
        }
        if !was_complete && entry.is_complete() {
            info!("{} completed the word", record.host);
        }
    }
}

/// Advances the score table from the latest position batch on a fixed
/// cadence, independent of the position tracker.
pub async fn track_scores(
    reference: Arc<Board>,
    word: Arc<TargetWord>,
    feed: watch::Receiver<Arc<Vec<ItemRecord>>>,
    table: ScoreTable,
    every: Duration,
) -> Result<(), StoreError> {
    let mut ticker = interval(every);
    loop {
        ticker.tick().await;
        let records = feed.borrow().clone();
        let mut scores = table.write().await;
        apply_positions(&mut scores, &reference, &word, &records);
    }
}

/// Pushes every player's rendered score string to the store on a fixed
/// cadence, decoupled from score mutation.
pub async fn publish_scores(
    sender: Arc<Sender>,
    table: ScoreTable,
    every: Duration,
) -> Result<(), StoreError> {
    let mut ticker = interval(every);
    loop {
        ticker.tick().await;
        let snapshot: Vec<(String, String)> = {
            let scores = table.read().await;
            scores
                .iter()
                .map(|(host, record)| (host.clone(), record.render()))
                .collect()
        };
        for (host, rendered) in snapshot {
            sender.send_value(&host, KEY_SCORE, &rendered).await?;
        }
    }
}
