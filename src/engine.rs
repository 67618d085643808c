//! Rule operations: the Golf state machine.
//!
//! Every operation is a pure transformation: it takes a state snapshot
//! (plus an explicit `now_ms` when deadlines are involved), clones it,
//! and returns the transformed clone. Illegal-but-harmless calls are
//! silent no-ops; callers detect no-effect by comparing snapshots.
//! Structural invariant breaks (card loss, doubled cells, a dangling
//! forced-draw flag) are debug assertions, not user-facing errors.
//!
//! ## Phases
//!
//! `Peek -> Turn -> RoundEnd`, driven by:
//! [`deal`] -> [`flip_for_peek`]/[`advance_peek`]/[`auto_complete_current_peek`]
//! -> [`start_turns`] -> draw/replace/discard cycling -> [`finish_round`].

use tracing::{debug, info};

use crate::cards::{build_deck, Card};
use crate::config::GolfConfig;
use crate::grid::{Grid, COLS, ROWS};
use crate::rng::GameRng;
use crate::seat::Seat;
use crate::state::{GameState, Phase, Player};

/// Deal a fresh round: face-down 3x3 grids from one shuffled double
/// deck, one face-up starter on the discard pile, peek phase armed for
/// seat 0.
#[must_use]
pub fn deal(config: &GolfConfig, seed: u64, now_ms: u64) -> GameState {
    let mut rng = GameRng::new(seed);
    let mut deck = build_deck(config, &mut rng);
    // Deck always covers 4 grids + starter (37 of 104 cards).
    debug_assert!(deck.len() > config.player_count() * ROWS * COLS);

    let mut players = im::Vector::new();
    for seat in Seat::all(config.player_count()) {
        let mut player = Player::new(seat, format!("Player {}", seat.index() + 1));
        for row in 0..ROWS {
            for col in 0..COLS {
                if let Some(card) = deck.pop() {
                    player.grid.place(row, col, card);
                }
            }
        }
        players.push_back(player);
    }

    let mut discard_pile = im::Vector::new();
    if let Some(mut starter) = deck.pop() {
        starter.face_up = true;
        discard_pile.push_back(starter);
    }

    let state = GameState {
        config: config.clone(),
        players,
        current: Seat::new(0),
        draw_pile: deck.into_iter().collect(),
        discard_pile,
        phase: Phase::Peek,
        peek_turn: Some(Seat::new(0)),
        peek_ends_at: Some(now_ms + config.peek_duration()),
        turn_ends_at: None,
        must_draw_from_deck: None,
        history: im::Vector::new(),
        rng,
    };

    debug_assert_eq!(state.card_count(), config.deck_size());
    state.debug_validate();
    info!(
        players = config.player_count(),
        seed,
        jokers = config.jokers_enabled(),
        "dealt new round"
    );
    state
}

/// Flip one of the current peeker's face-down cards.
///
/// Silent no-op when out of peek phase, out of turn, out of bounds, on a
/// face-up cell, or past the two-flip cap. Reaching the cap hands the
/// peek to the next player, or starts turns when everyone is done.
#[must_use]
pub fn flip_for_peek(state: &GameState, row: usize, col: usize, now_ms: u64) -> GameState {
    let mut next = state.clone();
    let Some(seat) = next.peek_turn else {
        return next;
    };
    if next.phase != Phase::Peek || row >= ROWS || col >= COLS {
        return next;
    }

    let flips = {
        let player = next.player_mut(seat);
        if player.peek_flips >= 2 {
            return next;
        }
        if player.grid.flip_up(row, col) {
            player.peek_flips += 1;
        }
        player.peek_flips
    };

    if flips >= 2 {
        if next.all_peeked() {
            start_turns_mut(&mut next, now_ms);
        } else {
            advance_peek_mut(&mut next, now_ms);
        }
    }

    next.debug_validate();
    next
}

/// Hand the peek to the next player with fewer than two flips, or start
/// turns when no such player remains.
#[must_use]
pub fn advance_peek(state: &GameState, now_ms: u64) -> GameState {
    let mut next = state.clone();
    advance_peek_mut(&mut next, now_ms);
    next.debug_validate();
    next
}

fn advance_peek_mut(state: &mut GameState, now_ms: u64) {
    if state.phase != Phase::Peek {
        return;
    }
    let Some(from) = state.peek_turn else {
        return;
    };

    if state.all_peeked() {
        start_turns_mut(state, now_ms);
        return;
    }

    let count = state.player_count();
    let mut seat = from;
    for _ in 0..count {
        seat = seat.next(count);
        if state.player(seat).peek_flips < 2 {
            state.peek_turn = Some(seat);
            state.peek_ends_at = Some(now_ms + state.config.peek_duration());
            return;
        }
    }
    // No candidate found; shouldn't happen once all_peeked is checked.
    start_turns_mut(state, now_ms);
}

/// Deadline-expiry fallback: randomly flip face-down cards for the
/// current peeker until they reach two flips, then move on.
#[must_use]
pub fn auto_complete_current_peek(state: &GameState, now_ms: u64) -> GameState {
    let mut next = state.clone();
    let Some(seat) = next.peek_turn else {
        return next;
    };
    if next.phase != Phase::Peek {
        return next;
    }

    let mut coords = next.player(seat).grid.face_down_coords();
    loop {
        if coords.is_empty() || next.player(seat).peek_flips >= 2 {
            break;
        }
        let pick = next.rng.gen_range_usize(0..coords.len());
        let (row, col) = coords.swap_remove(pick);
        let player = next.player_mut(seat);
        if player.grid.flip_up(row, col) {
            player.peek_flips += 1;
        }
    }
    debug!(%seat, "peek auto-completed on deadline expiry");

    if next.all_peeked() {
        start_turns_mut(&mut next, now_ms);
    } else {
        advance_peek_mut(&mut next, now_ms);
    }

    next.debug_validate();
    next
}

/// Leave the peek phase: pick a uniformly random starting player, arm
/// the first turn deadline, clear peek sub-state and any forced-draw flag.
#[must_use]
pub fn start_turns(state: &GameState, now_ms: u64) -> GameState {
    let mut next = state.clone();
    start_turns_mut(&mut next, now_ms);
    next.debug_validate();
    next
}

fn start_turns_mut(state: &mut GameState, now_ms: u64) {
    state.phase = Phase::Turn;
    state.peek_turn = None;
    state.peek_ends_at = None;
    let starter = state.rng.gen_range_usize(0..state.player_count());
    state.current = Seat::new(starter as u8);
    state.turn_ends_at = Some(now_ms + state.config.turn_duration());
    state.must_draw_from_deck = None;
    debug!(starter = %state.current, "peek complete, turns begin");
}

/// Draw the top card of the draw pile, face-up, for the caller to hold.
///
/// Recycles the discard pile first if the draw pile is empty. Consumes
/// the forced-draw flag when the current seat was under it. Returns
/// `None` (state unchanged) outside the turn phase.
#[must_use]
pub fn draw_from_deck(state: &GameState, now_ms: u64) -> (GameState, Option<Card>) {
    let mut next = state.clone();
    if next.phase != Phase::Turn {
        return (next, None);
    }

    if next.draw_pile.is_empty() {
        reshuffle_mut(&mut next);
    }
    let Some(mut card) = next.draw_pile.pop_back() else {
        return (next, None);
    };
    card.face_up = true;

    if next.must_draw_from_deck == Some(next.current) {
        next.must_draw_from_deck = None;
    }
    next.turn_ends_at = Some(now_ms + next.config.turn_duration());

    debug_assert_eq!(next.card_count() + 1, state.card_count());
    next.debug_validate();
    (next, Some(card))
}

/// Take the visible top discard for the caller to hold.
///
/// A seat under the forced-draw constraint is silently redirected to
/// [`draw_from_deck`]; the constraint always wins over intent. An empty
/// discard pile yields `None` with only the turn deadline refreshed.
#[must_use]
pub fn take_discard(state: &GameState, now_ms: u64) -> (GameState, Option<Card>) {
    let mut next = state.clone();
    if next.phase != Phase::Turn {
        return (next, None);
    }

    if next.must_draw_from_deck == Some(next.current) {
        debug!(seat = %next.current, "take-discard redirected to deck draw");
        return draw_from_deck(state, now_ms);
    }

    let card = next.discard_pile.pop_back().map(|mut card| {
        card.face_up = true;
        card
    });
    next.turn_ends_at = Some(now_ms + next.config.turn_duration());

    if card.is_some() {
        debug_assert_eq!(next.card_count() + 1, state.card_count());
    }
    next.debug_validate();
    (next, card)
}

/// Commit a held card into a grid cell.
///
/// The displaced card goes face-up onto the discard pile, then every
/// column is checked left-to-right for newly completed three-of-a-kinds.
/// Any clear grants the acting seat an immediate bonus turn constrained
/// to deck-only draws; otherwise the turn advances normally. Silent
/// no-op outside the turn phase, out of turn, or out of bounds (the
/// caller keeps the held card).
#[must_use]
pub fn replace_grid_card(
    state: &GameState,
    seat: Seat,
    row: usize,
    col: usize,
    card: Card,
    now_ms: u64,
) -> GameState {
    let mut next = state.clone();
    if next.phase != Phase::Turn || seat != next.current || row >= ROWS || col >= COLS {
        return next;
    }

    let mut card = card;
    card.face_up = true;
    card.zeroed = false;
    let displaced = next.player_mut(seat).grid.replace(row, col, card);
    if let Some(mut displaced) = displaced {
        displaced.face_up = true;
        // Zeroing belongs to the column it happened in, not the card.
        displaced.zeroed = false;
        next.discard_pile.push_back(displaced);
    }

    let cleared = next.player_mut(seat).grid.clear_matched_columns();
    if cleared {
        info!(%seat, "column cleared, bonus turn with deck-only draw");
        next.must_draw_from_deck = Some(seat);
        next.turn_ends_at = Some(now_ms + next.config.turn_duration());
    } else {
        advance_turn_mut(&mut next, now_ms);
    }

    debug_assert_eq!(next.card_count(), state.card_count() + 1);
    next.debug_validate();
    next
}

/// Decline to place a held card: straight to the discard pile, turn
/// advances. The legal disposal path for a player whose grid is already
/// fully revealed. Silent no-op outside the turn phase.
#[must_use]
pub fn discard_drawn(state: &GameState, card: Card, now_ms: u64) -> GameState {
    let mut next = state.clone();
    if next.phase != Phase::Turn {
        return next;
    }

    let mut card = card;
    card.face_up = true;
    card.zeroed = false;
    next.discard_pile.push_back(card);
    advance_turn_mut(&mut next, now_ms);

    debug_assert_eq!(next.card_count(), state.card_count() + 1);
    next.debug_validate();
    next
}

fn advance_turn_mut(state: &mut GameState, now_ms: u64) {
    state.current = state.current.next(state.player_count());
    state.turn_ends_at = Some(now_ms + state.config.turn_duration());
    state.must_draw_from_deck = None;
}

/// Recycle the discard pile into a fresh draw pile: set the top card
/// aside, shuffle the remainder face-down under it, keep the set-aside
/// card as the sole discard.
fn reshuffle_mut(state: &mut GameState) {
    let Some(top) = state.discard_pile.pop_back() else {
        return;
    };
    let mut pool: Vec<Card> = state.discard_pile.iter().cloned().collect();
    state.discard_pile = im::Vector::unit(top);

    state.rng.shuffle(&mut pool);
    let recycled = pool.len();
    for mut card in pool {
        card.face_up = false;
        card.zeroed = false;
        state.draw_pile.push_back(card);
    }
    debug!(recycled, "discard pile reshuffled into draw pile");
}

/// True iff every cell of every player's grid is face-up.
///
/// Note the final sweep arms on a *single* grid going face-up, not on
/// this predicate; a round can end with other players' cards still
/// face-down (they score at rank value). See [`crate::round::MatchState`].
#[must_use]
pub fn is_round_over(state: &GameState) -> bool {
    state.players.iter().all(|p| p.grid.all_face_up())
}

/// Sum of card values over a grid. Zeroed cards contribute 0.
#[must_use]
pub fn compute_score(grid: &Grid) -> i32 {
    grid.score()
}

/// Freeze the round: phase to `RoundEnd`, deadlines cleared, each grid's
/// score folded into the owner's cumulative total. No-op if already done.
#[must_use]
pub fn finish_round(state: &GameState) -> GameState {
    if state.phase == Phase::RoundEnd {
        return state.clone();
    }
    let mut next = state.clone();
    next.phase = Phase::RoundEnd;
    next.peek_turn = None;
    next.peek_ends_at = None;
    next.turn_ends_at = None;
    next.must_draw_from_deck = None;

    for player in next.players.iter_mut() {
        let round_score = player.grid.score();
        player.score += round_score;
        info!(seat = %player.seat, round_score, total = player.score, "round scored");
    }

    next.debug_validate();
    next
}

/// Check-and-resolve deadline expiry; the single entry point for the
/// external scheduler.
///
/// Returns `None` when nothing has expired. On expiry the deterministic
/// fallback runs exactly once: peek deadline triggers
/// [`auto_complete_current_peek`]; turn deadline auto-draws from the deck
/// and discards. The returned snapshot carries a refreshed deadline, so
/// polling with the new state cannot double-fire.
#[must_use]
pub fn resolve_expired(state: &GameState, now_ms: u64) -> Option<GameState> {
    match state.phase {
        Phase::Peek => {
            let deadline = state.peek_ends_at?;
            if now_ms < deadline {
                return None;
            }
            debug!(deadline, now_ms, "peek deadline expired");
            Some(auto_complete_current_peek(state, now_ms))
        }
        Phase::Turn => {
            let deadline = state.turn_ends_at?;
            if now_ms < deadline {
                return None;
            }
            debug!(deadline, now_ms, seat = %state.current, "turn deadline expired, auto draw-and-discard");
            let (next, drawn) = draw_from_deck(state, now_ms);
            Some(match drawn {
                Some(card) => discard_drawn(&next, card, now_ms),
                None => next,
            })
        }
        Phase::RoundEnd => None,
    }
}
