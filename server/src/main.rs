use clap::Parser;
use log::{error, info};
use server::scores::ScoreTable;
use server::{publisher, scores, tracker};
use shared::board::{Board, WallWeights};
use shared::store::api::ApiClient;
use shared::store::sender::Sender;
use shared::store::StoreError;
use shared::word::TargetWord;
use shared::{DEFAULT_WORD, KEY_MAP};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, RwLock};

/// Game authority: generates the reference board, tracks players through
/// the external store, and publishes the shared map and scores.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Store query API endpoint
    #[arg(long, default_value = "http://127.0.0.1/zabbix/api_jsonrpc.php")]
    api_url: String,

    /// Admin token for the query API
    #[arg(long)]
    api_token: String,

    /// Store push (trapper) address
    #[arg(long, default_value = "127.0.0.1:10051")]
    store_addr: String,

    /// Host identity the shared map is published under
    #[arg(long, default_value = "Main Game")]
    game_host: String,

    /// Board side length
    #[arg(short, long, default_value = "40")]
    size: usize,

    /// Target word players collect
    #[arg(short, long, default_value = DEFAULT_WORD)]
    word: String,

    /// Relative weight of empty cells in the wall draw
    #[arg(long, default_value = "17")]
    empty_weight: u32,

    /// Relative weight of each wall symbol in the wall draw
    #[arg(long, default_value = "1")]
    wall_weight: u32,

    /// Position poll and overlay rebuild interval (milliseconds)
    #[arg(long, default_value = "100")]
    track_ms: u64,

    /// Score reveal interval (milliseconds)
    #[arg(long, default_value = "500")]
    score_ms: u64,

    /// Map and score publish interval (milliseconds)
    #[arg(long, default_value = "250")]
    publish_ms: u64,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    if std::env::var("RUST_LOG").is_err() {
        eprintln!("Set RUST_LOG=info for detailed logging");
    }

    let args = Args::parse();

    // Board and word exist before any loop starts and are read-only from
    // here on.
    let word = Arc::new(TargetWord::new(&args.word));
    let weights = WallWeights {
        empty: args.empty_weight,
        vertical: args.wall_weight,
        horizontal: args.wall_weight,
    };
    let reference = Arc::new(Board::generate(
        args.size,
        &weights,
        &word,
        &mut rand::thread_rng(),
    )?);
    info!(
        "Generated {0}x{0} board for word {1:?}",
        args.size, args.word
    );

    let api = ApiClient::new(&args.api_url, &args.api_token);
    let sender = Arc::new(Sender::new(&args.store_addr));

    // Clients need a map before the first overlay lands.
    sender
        .send_value(&args.game_host, KEY_MAP, &reference.encode())
        .await?;
    info!("Pushed reference board to {:?}", args.game_host);

    let (feed_tx, feed_rx) = watch::channel(Arc::new(Vec::new()));
    let (overlay_tx, overlay_rx) = watch::channel(Arc::clone(&reference));
    let score_table: ScoreTable = Arc::new(RwLock::new(HashMap::new()));

    let track_every = Duration::from_millis(args.track_ms);
    let score_every = Duration::from_millis(args.score_ms);
    let publish_every = Duration::from_millis(args.publish_ms);

    let feed = tokio::spawn(tracker::poll_positions(api, track_every, feed_tx));
    let track = tokio::spawn(tracker::track_positions(
        Arc::clone(&reference),
        feed_rx.clone(),
        overlay_tx,
        track_every,
    ));
    let score = tokio::spawn(scores::track_scores(
        Arc::clone(&reference),
        Arc::clone(&word),
        feed_rx,
        Arc::clone(&score_table),
        score_every,
    ));
    let score_push = tokio::spawn(scores::publish_scores(
        Arc::clone(&sender),
        score_table,
        publish_every,
    ));
    let map_push = tokio::spawn(publisher::publish_map(
        sender,
        args.game_host,
        overlay_rx,
        publish_every,
    ));

    info!("Authority running");

    tokio::select! {
        result = feed => finish("position feed", result),
        result = track => finish("position tracker", result),
        result = score => finish("score tracker", result),
        result = score_push => finish("score publisher", result),
        result = map_push => finish("map publisher", result),
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down");
            Ok(())
        }
    }
}

/// Collapses a finished loop into the process exit path. Loops only return
/// on store failure, which is fatal for the whole authority.
fn finish(
    name: &str,
    result: Result<Result<(), StoreError>, tokio::task::JoinError>,
) -> Result<(), Box<dyn std::error::Error>> {
    match result {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => {
            error!("{name} loop failed: {e}");
            Err(e.into())
        }
        Err(e) => {
            error!("{name} task panicked: {e}");
            Err(e.into())
        }
    }
}
