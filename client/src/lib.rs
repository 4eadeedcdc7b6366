//! # Game Client Library
//!
//! The player-side process. It never receives anything from the authority
//! directly: map snapshots arrive as store-pushed webhook deliveries, and
//! the client's own position and score are polled back from the store's
//! query API. Moves go the other way, written to the player's position key
//! through the store's push protocol and only becoming visible once the
//! authority's next poll reads them back, so every move has an inherent
//! round-trip latency.
//!
//! ## Module organization
//!
//! - **`webhook`**: axum endpoint the store pushes map snapshots to,
//!   guarded by a static bearer token.
//! - **`sync`**: polling loops for the player's own position and score.
//! - **`movement`**: turns a direction key into a bounds- and wall-checked
//!   position write, or into nothing.
//! - **`rendering`**: scrolled viewport math over the latest map and the
//!   terminal draw loop.
//!
//! Loops share latest-value `watch` slots; each runs on its own fixed
//! interval, uncoordinated with the others, and a stale-by-one-cycle read
//! is normal.

pub mod movement;
pub mod rendering;
pub mod sync;
pub mod webhook;
