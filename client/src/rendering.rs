//! Scrolled viewport over the shared map and the terminal draw loop.

use shared::board::Board;
use shared::{position, SYMBOL_SELF};
use std::io::Write;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::interval;

/// Fixed-size window scrolled to keep the local player in view. Dimensions
/// are in cells; each cell spans two display columns in the pretty
/// encoding (symbol plus separator).
#[derive(Debug, Clone, Copy)]
pub struct Viewport {
    pub rows: usize,
    pub cols: usize,
}

impl Viewport {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    /// Renders the window around `player`, stamping the self marker over
    /// whatever the shared overlay drew there. The window is clamped so it
    /// never starts before the first row/column or runs past the last.
    pub fn render(&self, map: &Board, player: (usize, usize)) -> Vec<String> {
        let size = map.size();
        let rows = self.rows.min(size);
        let cols = self.cols.min(size);

        let mut own = map.clone();
        if player.0 < size && player.1 < size {
            own.set(player.0, player.1, SYMBOL_SELF);
        }

        let top = player.1.saturating_sub(rows / 2).min(size - rows);
        let left = player.0.saturating_sub(cols / 2).min(size - cols);

        own.pretty()
            .lines()
            .skip(top)
            .take(rows)
            .map(|line| line.chars().skip(left * 2).take(cols * 2).collect())
            .collect()
    }
}

/// Redraws the score line and the viewport on a fixed cadence. Until the
/// first full-length map snapshot arrives there is nothing to draw.
pub async fn draw_loop(
    map_rx: watch::Receiver<String>,
    pos_rx: watch::Receiver<(i32, i32)>,
    score_rx: watch::Receiver<String>,
    size: usize,
    viewport: Viewport,
    every: Duration,
) {
    let mut ticker = interval(every);
    loop {
        ticker.tick().await;

        let flat = map_rx.borrow().clone();
        let Ok(map) = Board::decode(&flat, size) else {
            continue;
        };
        let player = position::clamp(*pos_rx.borrow(), size);
        let score = score_rx.borrow().clone();

        let mut frame = String::from("\x1b[2J\x1b[H");
        frame.push_str(&score);
        frame.push('\n');
        for line in viewport.render(&map, player) {
            frame.push_str(&line);
            frame.push('\n');
        }
        print!("{frame}");
        let _ = std::io::stdout().flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{SYMBOL_PLAYER, SYMBOL_SELF};

    fn board_with_marker(size: usize, x: usize, y: usize) -> Board {
        let mut board = Board::decode(&" ".repeat(size * size), size).unwrap();
        board.set(x, y, SYMBOL_PLAYER);
        board
    }

    #[test]
    fn window_is_centered_on_the_player() {
        let map = board_with_marker(20, 10, 10);
        let window = Viewport::new(5, 5).render(&map, (10, 10));
        assert_eq!(window.len(), 5);
        // Rows 8..13, columns 8..13; the self marker sits dead center.
        assert_eq!(window[2].chars().nth(4), Some(SYMBOL_SELF));
    }

    #[test]
    fn window_clamps_at_the_origin() {
        let map = board_with_marker(20, 0, 0);
        let window = Viewport::new(5, 5).render(&map, (0, 0));
        assert_eq!(window.len(), 5);
        // Window cannot scroll past row/column zero, so the player sits in
        // the top-left corner.
        assert_eq!(window[0].chars().next(), Some(SYMBOL_SELF));
    }

    #[test]
    fn window_clamps_at_the_far_edge() {
        let map = board_with_marker(20, 19, 19);
        let window = Viewport::new(5, 5).render(&map, (19, 19));
        assert_eq!(window.len(), 5);
        // Rows 15..20, columns 15..20: player is the last cell of the last
        // row.
        assert_eq!(window[4].chars().nth(8), Some(SYMBOL_SELF));
    }

    #[test]
    fn each_cell_spans_two_display_columns() {
        let map = board_with_marker(10, 3, 0);
        let window = Viewport::new(10, 10).render(&map, (0, 0));
        assert_eq!(window[0].chars().count(), 20);
        assert_eq!(window[0].chars().nth(6), Some(SYMBOL_PLAYER));
    }

    #[test]
    fn self_marker_overrides_the_shared_marker() {
        // The overlay draws every player the same; the local cell gets the
        // self marker at render time.
        let map = board_with_marker(10, 4, 4);
        let window = Viewport::new(10, 10).render(&map, (4, 4));
        assert_eq!(window[4].chars().nth(8), Some(SYMBOL_SELF));
    }

    #[test]
    fn viewport_larger_than_board_shows_everything() {
        let map = board_with_marker(4, 2, 2);
        let window = Viewport::new(10, 10).render(&map, (2, 2));
        assert_eq!(window.len(), 4);
        assert_eq!(window[0].chars().count(), 8);
    }
}
