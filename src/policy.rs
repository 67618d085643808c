//! Heuristic opponent policy.
//!
//! A pure decision layer over read-only state: it never touches
//! `GameState` directly, only calls the public engine operations. The
//! heuristic mirrors how a cautious human plays Golf:
//!
//! - take the visible discard when it completes or extends a column
//!   match, or beats the worst already-revealed card; otherwise draw blind
//! - place the incoming card to complete a match, to evict the worst
//!   revealed card, or to reveal an unknown cell; discard it only when
//!   the grid is fully revealed and the card helps nothing.

use tracing::debug;

use crate::cards::{Card, Rank};
use crate::engine;
use crate::grid::{Coord, Grid, COLS, ROWS};
use crate::seat::Seat;
use crate::state::{GameState, Phase};

/// Where to source this turn's card.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrawChoice {
    /// Take the visible top of the discard pile.
    TakeDiscard,
    /// Draw blind from the deck.
    DrawFromDeck,
}

/// Decide between the visible discard and a blind deck draw.
///
/// The discard is taken iff it would complete or extend a column match,
/// or scores lower than the worst revealed card. A seat under the
/// forced-draw constraint always draws (the engine would redirect anyway).
#[must_use]
pub fn choose_draw(state: &GameState, seat: Seat) -> DrawChoice {
    if state.must_draw_from_deck == Some(seat) {
        return DrawChoice::DrawFromDeck;
    }
    let Some(top) = state.top_discard() else {
        return DrawChoice::DrawFromDeck;
    };

    let grid = &state.player(seat).grid;
    if completion_target(grid, top.rank).is_some() || extends_column(grid, top.rank) {
        return DrawChoice::TakeDiscard;
    }
    if let Some((_, worst_value)) = worst_revealed(grid) {
        if top.value() < worst_value {
            return DrawChoice::TakeDiscard;
        }
    }
    DrawChoice::DrawFromDeck
}

/// Pick the cell to commit an incoming card to.
///
/// Preference order: (1) a cell completing a three-of-a-kind, (2) the
/// worst revealed cell when the incoming card scores lower, (3) the first
/// still-face-down cell, (4) the first face-up cell as a fallback.
#[must_use]
pub fn choose_target(state: &GameState, seat: Seat, card: &Card) -> Option<Coord> {
    let grid = &state.player(seat).grid;

    if let Some(target) = completion_target(grid, card.rank) {
        return Some(target);
    }
    if let Some((coord, worst_value)) = worst_revealed(grid) {
        if card.value() < worst_value {
            return Some(coord);
        }
    }
    if let Some(&coord) = grid.face_down_coords().first() {
        return Some(coord);
    }
    grid.iter().map(|(coord, _)| coord).next()
}

/// Play one full turn for a seat through the public engine API:
/// choose a source, draw or take, then replace or discard.
///
/// A drawn card that helps nothing on a fully-revealed grid is discarded;
/// that is the only path that declines to place. Silent no-op outside
/// the turn phase or out of turn; the guard comes before the draw so an
/// off-turn call cannot strand a drawn card.
#[must_use]
pub fn take_turn(state: &GameState, seat: Seat, now_ms: u64) -> GameState {
    if state.phase != Phase::Turn || seat != state.current {
        return state.clone();
    }
    let choice = choose_draw(state, seat);
    let (mid, drawn) = match choice {
        DrawChoice::TakeDiscard => engine::take_discard(state, now_ms),
        DrawChoice::DrawFromDeck => engine::draw_from_deck(state, now_ms),
    };
    let Some(card) = drawn else {
        // Empty discard or wrong phase; nothing to commit.
        return mid;
    };

    let grid = &mid.player(seat).grid;
    let useless = completion_target(grid, card.rank).is_none()
        && grid.all_face_up()
        && worst_revealed(grid).map_or(true, |(_, worst)| card.value() >= worst);
    if useless {
        debug!(%seat, card = %card, "policy discards a useless draw");
        return engine::discard_drawn(&mid, card, now_ms);
    }

    match choose_target(&mid, seat, &card) {
        Some((row, col)) => engine::replace_grid_card(&mid, seat, row, col, card, now_ms),
        None => engine::discard_drawn(&mid, card, now_ms),
    }
}

/// The face-up cell with the highest value, with its value.
fn worst_revealed(grid: &Grid) -> Option<(Coord, i32)> {
    grid.iter()
        .filter(|(_, card)| card.face_up)
        .map(|(coord, card)| (coord, card.value()))
        .max_by_key(|&(coord, value)| (value, std::cmp::Reverse(coord)))
}

/// A cell where placing `rank` face-up would complete a column
/// three-of-a-kind: two face-up cards of that rank already stand in the
/// column and the returned cell is the odd one out.
fn completion_target(grid: &Grid, rank: Rank) -> Option<Coord> {
    for col in 0..COLS {
        let matched: Vec<usize> = (0..ROWS)
            .filter(|&row| {
                grid.get(row, col)
                    .is_some_and(|card| card.face_up && card.rank == rank && !card.zeroed)
            })
            .collect();
        if matched.len() == 2 {
            let odd = (0..ROWS).find(|row| !matched.contains(row));
            if let Some(row) = odd {
                return Some((row, col));
            }
        }
    }
    None
}

/// Does any column hold exactly one face-up card of `rank` alongside a
/// face-down cell? Taking such a card keeps the match alive.
fn extends_column(grid: &Grid, rank: Rank) -> bool {
    for col in 0..COLS {
        let mut matched = 0;
        let mut hidden = 0;
        for row in 0..ROWS {
            match grid.get(row, col) {
                Some(card) if card.face_up && card.rank == rank && !card.zeroed => matched += 1,
                Some(card) if !card.face_up => hidden += 1,
                _ => {}
            }
        }
        if matched == 1 && hidden > 0 {
            return true;
        }
    }
    false
}
