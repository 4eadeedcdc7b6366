//! Common game model and store plumbing shared by the authority and clients.
//!
//! Everything both processes must agree on lives here: the board codec and
//! its symbol alphabet, the target-word model with per-letter score slots,
//! raw position parsing/clamping, and the two halves of the external store
//! client (HTTP query API and framed TCP push protocol). The authority and
//! the clients never talk to each other directly; every byte goes through
//! the store using the formats defined in this crate.

pub mod board;
pub mod position;
pub mod store;
pub mod word;

pub use board::{Board, BoardError, WallWeights};
pub use word::{ScoreRecord, TargetWord};

/// Cell symbol for walkable ground.
pub const SYMBOL_EMPTY: char = ' ';
/// Vertical wall segment.
pub const SYMBOL_WALL_V: char = '│';
/// Horizontal wall segment.
pub const SYMBOL_WALL_H: char = '─';
/// Marker the authority stamps on the overlay for every known player.
pub const SYMBOL_PLAYER: char = '*';
/// Marker a client draws over its own cell at render time.
pub const SYMBOL_SELF: char = '@';
/// Placeholder for a score slot that has not been revealed yet.
pub const SYMBOL_SLOT_HIDDEN: char = '_';

/// Store item key the shared map snapshot is published under.
pub const KEY_MAP: &str = "game.map";
/// Store item key each player's score string is published under.
pub const KEY_SCORE: &str = "player.score";
/// Store item key prefix for player positions; the per-player access token
/// is appended to form the full key.
pub const KEY_POSITION_PREFIX: &str = "player.position.";

pub const DEFAULT_BOARD_SIZE: usize = 40;
pub const DEFAULT_WORD: &str = "ZABBIX";

/// True for cell symbols that block movement.
pub fn is_wall(symbol: char) -> bool {
    symbol == SYMBOL_WALL_V || symbol == SYMBOL_WALL_H
}
