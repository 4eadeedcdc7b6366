//! # Game Authority Library
//!
//! The authority owns the reference board and the canonical view of every
//! player. It never talks to clients directly: all state flows through the
//! external telemetry store. The authority continuously pulls raw player
//! positions from the store's query API, rebuilds the shared overlay board,
//! advances each player's score record, and pushes the overlay and the
//! scores back into the store, where clients pick them up.
//!
//! ## Loop layout
//!
//! Each concern runs as its own fixed-interval tokio task:
//!
//! - **Position feed** (`tracker::poll_positions`): queries the store for
//!   every player's raw position record and publishes the batch.
//! - **Position tracker** (`tracker::track_positions`): rebuilds the overlay
//!   board from the reference board plus the latest batch.
//! - **Score tracker** (`scores::track_scores`): reveals word letters for
//!   players standing on them.
//! - **Score publisher** (`scores::publish_scores`): pushes each player's
//!   rendered score string.
//! - **Map publisher** (`publisher::publish_map`): pushes the flat overlay
//!   encoding under the game identity's map key.
//!
//! Loops exchange snapshots through `tokio::sync::watch` slots and an
//! `RwLock`ed score table; a reader may observe a value that is one cycle
//! stale, never one that is half-built. There is no signaling between
//! loops and no per-loop recovery: a store failure in any loop unwinds to
//! `main`, which logs it once and exits non-zero.

pub mod publisher;
pub mod scores;
pub mod tracker;
