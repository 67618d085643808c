//! # golf-engine
//!
//! Rules engine for multiplayer 3x3 Golf: two shuffled decks, secret
//! peeks, draw-or-take turns, column-clearing bonuses, and lowest-total
//! scoring across rounds for 2-4 players.
//!
//! ## Design Principles
//!
//! 1. **Snapshots, not mutation**: every operation takes a `GameState`
//!    and returns a new one. `im` persistent vectors keep cloning cheap,
//!    so undo, time travel, and networked replay fall out for free.
//!
//! 2. **No clocks, no I/O**: deadlines are absolute timestamps stored in
//!    the state; operations take `now_ms` explicitly. An external
//!    scheduler polls [`engine::resolve_expired`].
//!
//! 3. **Deterministic**: all randomness flows through a seeded, forkable
//!    [`rng::GameRng`] embedded in the state. Identically-seeded engines
//!    fed the same intent stream converge to identical snapshots, which
//!    is what lets a dumb relay forward intents without validating them.
//!
//! 4. **Silent no-ops over errors**: illegal-but-harmless calls return
//!    the input snapshot unchanged; callers compare. Only structural
//!    invariant breaks (card loss, doubled cells) are fatal, and only in
//!    debug builds.
//!
//! ## Modules
//!
//! - `cards`: suits, ranks, card identity, deck construction, scoring
//! - `grid`: the 3x3 layout, column clears
//! - `seat`: type-safe seat indices and per-seat storage
//! - `rng`: deterministic forkable RNG
//! - `config`: player count, rounds, joker variant, deadline durations
//! - `state`: `GameState`, the single source of truth per round
//! - `engine`: the rule operations
//! - `action`: relayable intents and replay history
//! - `policy`: heuristic opponent built on the public API
//! - `round`: match progression, totals, the final sweep

pub mod action;
pub mod cards;
pub mod config;
pub mod engine;
pub mod grid;
pub mod policy;
pub mod rng;
pub mod round;
pub mod seat;
pub mod state;

// Re-export commonly used types
pub use crate::action::{ActionRecord, GolfAction};
pub use crate::cards::{Card, CardId, Rank, Suit};
pub use crate::config::{GolfConfig, DEFAULT_PEEK_MS, DEFAULT_TURN_MS};
pub use crate::grid::{Coord, Grid, COLS, ROWS};
pub use crate::policy::DrawChoice;
pub use crate::rng::{GameRng, GameRngState};
pub use crate::round::{MatchState, RoundOutcome};
pub use crate::seat::{Seat, SeatMap};
pub use crate::state::{GameState, Phase, Player};
