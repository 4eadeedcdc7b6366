//! Direction input and client-side move validation.
//!
//! A move is validated against the latest map the client has seen, not
//! against live authority state. The position write is the whole move:
//! nothing is applied locally, and the new cell only shows up once the
//! authority polls it back.

use shared::board::Board;
use shared::store::sender::Sender;
use shared::store::StoreError;
use shared::{is_wall, position};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// w/a/s/d to a direction; every other key means nothing.
    pub fn from_key(key: char) -> Option<Self> {
        match key {
            'w' => Some(Direction::Up),
            'a' => Some(Direction::Left),
            's' => Some(Direction::Down),
            'd' => Some(Direction::Right),
            _ => None,
        }
    }

    pub fn offset(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

/// Candidate position for a move, or `None` when the move leaves the board
/// or runs into a wall on the latest known map. `None` means no publish.
pub fn plan_move(dir: Direction, from: (i32, i32), map: &Board) -> Option<(i32, i32)> {
    let (dx, dy) = dir.offset();
    let (x, y) = (from.0.saturating_add(dx), from.1.saturating_add(dy));
    let size = map.size() as i32;
    if x < 0 || y < 0 || x >= size || y >= size {
        return None;
    }
    if is_wall(map.at(x as usize, y as usize)) {
        return None;
    }
    Some((x, y))
}

/// Reads movement keys from stdin and publishes each accepted move to the
/// player's position key. Input is line-buffered; every w/a/s/d character
/// on a line is one move attempt, anything else is ignored. Returns when
/// stdin closes.
pub async fn read_moves(
    sender: Arc<Sender>,
    player_host: String,
    position_key: String,
    map_rx: watch::Receiver<String>,
    pos_rx: watch::Receiver<(i32, i32)>,
    size: usize,
) -> Result<(), StoreError> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        for key in line.chars() {
            let Some(dir) = Direction::from_key(key) else {
                continue;
            };
            // No validated map yet means no safe move to make.
            let flat = map_rx.borrow().clone();
            let Ok(map) = Board::decode(&flat, size) else {
                continue;
            };
            let from = *pos_rx.borrow();
            let Some(next) = plan_move(dir, from, &map) else {
                continue;
            };
            sender
                .send_value(&player_host, &position_key, &position::format(next))
                .await?;
        }
    }
    Ok(())
}
