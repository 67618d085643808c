//! Relayable action intents and replay.
//!
//! In multi-device play each participant runs its own engine; the relay
//! forwards opaque intent payloads verbatim and validates nothing. A
//! `GolfAction` is therefore a complete, self-contained intent: applying
//! the same intent sequence to identically-seeded engines reproduces
//! identical snapshots.
//!
//! Applied intents are appended to `GameState::history` as
//! [`ActionRecord`]s for replay and diagnostics.

use serde::{Deserialize, Serialize};

use crate::engine;
use crate::grid::{COLS, ROWS};
use crate::seat::Seat;
use crate::state::{GameState, Phase};

/// A complete player intent, serializable for the relay.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GolfAction {
    /// Peek-flip the cell at (row, col).
    Peek { row: u8, col: u8 },
    /// Skip the rest of the current peek (player is done early).
    AdvancePeek,
    /// Draw blind from the deck and commit the card at (row, col).
    DrawReplace { row: u8, col: u8 },
    /// Draw blind from the deck and discard the card unseen by the grid.
    DrawDiscard,
    /// Take the visible discard and commit it at (row, col).
    ///
    /// Under the forced-draw constraint the take is redirected to a deck
    /// draw, identically on every replica.
    TakeReplace { row: u8, col: u8 },
}

/// An applied intent with its acting seat, in application order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    /// Seat that acted.
    pub seat: Seat,
    /// The intent applied.
    pub action: GolfAction,
    /// Position in the history (0-based).
    pub sequence: u32,
}

/// Apply one intent to a snapshot, recording it in the history.
///
/// The acting seat is taken from the input state: the current peeker
/// during the peek phase, the current player otherwise. Component
/// operations keep their silent-no-op semantics; a no-op intent is
/// still recorded (replicas must stay in lockstep on the same stream).
#[must_use]
pub fn apply_action(state: &GameState, action: &GolfAction, now_ms: u64) -> GameState {
    let seat = acting_seat(state);

    // Malformed cells arriving off the wire are no-op intents, not panics.
    let mut next = if !in_bounds(action) {
        state.clone()
    } else {
        match *action {
            GolfAction::Peek { row, col } => {
                engine::flip_for_peek(state, row as usize, col as usize, now_ms)
            }
            GolfAction::AdvancePeek => engine::advance_peek(state, now_ms),
            GolfAction::DrawReplace { row, col } => {
                let (mid, drawn) = engine::draw_from_deck(state, now_ms);
                match drawn {
                    Some(card) => {
                        let seat = mid.current;
                        engine::replace_grid_card(
                            &mid, seat, row as usize, col as usize, card, now_ms,
                        )
                    }
                    None => mid,
                }
            }
            GolfAction::DrawDiscard => {
                let (mid, drawn) = engine::draw_from_deck(state, now_ms);
                match drawn {
                    Some(card) => engine::discard_drawn(&mid, card, now_ms),
                    None => mid,
                }
            }
            GolfAction::TakeReplace { row, col } => {
                let (mid, taken) = engine::take_discard(state, now_ms);
                match taken {
                    Some(card) => {
                        let seat = mid.current;
                        engine::replace_grid_card(
                            &mid, seat, row as usize, col as usize, card, now_ms,
                        )
                    }
                    None => mid,
                }
            }
        }
    };

    let sequence = next.history.len() as u32;
    next.history.push_back(ActionRecord {
        seat,
        action: *action,
        sequence,
    });
    next
}

fn in_bounds(action: &GolfAction) -> bool {
    match *action {
        GolfAction::Peek { row, col }
        | GolfAction::DrawReplace { row, col }
        | GolfAction::TakeReplace { row, col } => (row as usize) < ROWS && (col as usize) < COLS,
        GolfAction::AdvancePeek | GolfAction::DrawDiscard => true,
    }
}

fn acting_seat(state: &GameState) -> Seat {
    if state.phase == Phase::Peek {
        state.peek_turn.unwrap_or(state.current)
    } else {
        state.current
    }
}
