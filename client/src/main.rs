use clap::Parser;
use client::rendering::Viewport;
use client::webhook::WebhookState;
use client::{movement, rendering, sync, webhook};
use log::{error, info};
use shared::store::api::ApiClient;
use shared::store::sender::Sender;
use shared::store::StoreError;
use shared::{DEFAULT_BOARD_SIZE, KEY_POSITION_PREFIX};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// Game client: receives pushed map snapshots, polls its own position and
/// score back from the store, and publishes validated moves.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Store query API endpoint
    #[arg(long, default_value = "http://127.0.0.1/zabbix/api_jsonrpc.php")]
    api_url: String,

    /// This player's access token; also the webhook bearer token and the
    /// position key suffix
    #[arg(long)]
    token: String,

    /// Store push (trapper) address
    #[arg(long, default_value = "127.0.0.1:10051")]
    store_addr: String,

    /// This player's host identity in the store
    #[arg(long, default_value = "Player 1")]
    player_host: String,

    /// Address the map webhook listens on
    #[arg(long, default_value = "0.0.0.0:8001")]
    webhook_addr: String,

    /// Board side length, must match the authority
    #[arg(short, long, default_value_t = DEFAULT_BOARD_SIZE)]
    size: usize,

    /// Viewport height in cells
    #[arg(long, default_value = "10")]
    view_rows: usize,

    /// Viewport width in cells
    #[arg(long, default_value = "10")]
    view_cols: usize,

    /// Position/score poll and redraw interval (milliseconds)
    #[arg(long, default_value = "100")]
    sync_ms: u64,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    if std::env::var("RUST_LOG").is_err() {
        eprintln!("Set RUST_LOG=info for detailed logging");
    }

    let args = Args::parse();
    let position_key = format!("{KEY_POSITION_PREFIX}{}", args.token);

    info!("Starting client for {:?}", args.player_host);
    info!("Controls: w/a/s/d + enter to move");

    let api = Arc::new(ApiClient::new(&args.api_url, &args.token));
    let sender = Arc::new(Sender::new(&args.store_addr));

    let (map_tx, map_rx) = watch::channel(String::new());
    let (pos_tx, pos_rx) = watch::channel((0, 0));
    let (score_tx, score_rx) = watch::channel(String::new());

    let every = Duration::from_millis(args.sync_ms);
    let viewport = Viewport::new(args.view_rows, args.view_cols);

    let webhook_state = Arc::new(WebhookState {
        token: args.token.clone(),
        map_tx,
    });
    let webhook_addr = args.webhook_addr.clone();
    let receiver =
        tokio::spawn(async move { webhook::serve(&webhook_addr, webhook_state).await });

    let position = tokio::spawn(sync::poll_position(
        Arc::clone(&api),
        position_key.clone(),
        pos_tx,
        every,
    ));
    let score = tokio::spawn(sync::poll_score(Arc::clone(&api), score_tx, every));
    let draw = tokio::spawn(rendering::draw_loop(
        map_rx.clone(),
        pos_rx.clone(),
        score_rx,
        args.size,
        viewport,
        every,
    ));
    let input = tokio::spawn(movement::read_moves(
        sender,
        args.player_host,
        position_key,
        map_rx,
        pos_rx,
        args.size,
    ));

    tokio::select! {
        result = receiver => match result {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => {
                error!("webhook server failed: {e}");
                Err(e.into())
            }
            Err(e) => {
                error!("webhook task panicked: {e}");
                Err(e.into())
            }
        },
        result = position => finish("position poller", result),
        result = score => finish("score poller", result),
        result = input => {
            // Stdin closed: the player quit.
            finish("input reader", result)
        }
        result = draw => match result {
            Ok(()) => Ok(()),
            Err(e) => {
                error!("draw task panicked: {e}");
                Err(e.into())
            }
        },
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down");
            Ok(())
        }
    }
}

/// Collapses a finished loop into the process exit path; store failures
/// are fatal for the whole client.
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
