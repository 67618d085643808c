//! Game state: the single source of truth for one round.
//!
//! `GameState` is a plain value. Engine operations never mutate a caller's
//! state; they clone the snapshot, transform the clone, and return it.
//! Piles, players, and history use `im` persistent vectors so that
//! snapshot cloning stays cheap, which makes time-travel and networked
//! replay trivial.
//!
//! Deadlines are absolute timestamps (milliseconds, caller's clock).
//! The engine never reads a clock; every deadline-touching operation
//! takes `now_ms` explicitly.

use im::Vector;
use serde::{Deserialize, Serialize};

use crate::action::ActionRecord;
use crate::cards::{Card, CardId};
use crate::config::GolfConfig;
use crate::grid::Grid;
use crate::rng::GameRng;
use crate::seat::Seat;

/// Round phase. Peek precedes all turn-taking; `RoundEnd` is terminal
/// per round (a fresh `deal` starts the next one).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Each player secretly flips two of their own cards.
    Peek,
    /// Normal draw/replace turn-taking.
    Turn,
    /// Scored and frozen; waiting for the next deal.
    RoundEnd,
}

/// One participant and their table area.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Fixed seat at the table.
    pub seat: Seat,
    /// Display name.
    pub name: String,
    /// The player's own 3x3 layout.
    pub grid: Grid,
    /// Cumulative score across rounds (lower is better).
    pub score: i32,
    /// Peek flips taken this round (capped at 2; peek phase only).
    pub peek_flips: u8,
}

impl Player {
    /// A fresh player with an empty grid.
    #[must_use]
    pub fn new(seat: Seat, name: impl Into<String>) -> Self {
        Self {
            seat,
            name: name.into(),
            grid: Grid::new(),
            score: 0,
            peek_flips: 0,
        }
    }
}

/// Complete state of one round.
///
/// All fields are public: the state is data, the rules live in
/// [`crate::engine`]. Shells and tests may read anything; only the
/// engine operations should write.
#[derive(Clone, Debug, PartialEq)]
pub struct GameState {
    /// Configuration this round was dealt under.
    pub config: GolfConfig,
    /// Players in seat order.
    pub players: Vector<Player>,
    /// Whose turn it is (meaningful in `Turn` phase).
    pub current: Seat,
    /// Face-down draw pile; back of the vector is the next draw.
    pub draw_pile: Vector<Card>,
    /// Discard pile; back of the vector is the visible top card.
    pub discard_pile: Vector<Card>,
    /// Current phase.
    pub phase: Phase,
    /// Which seat is currently peeking (peek phase only).
    pub peek_turn: Option<Seat>,
    /// Absolute deadline for the current peeker.
    pub peek_ends_at: Option<u64>,
    /// Absolute deadline for the current turn.
    pub turn_ends_at: Option<u64>,
    /// If set, this seat's next draw must come from the deck. Always the
    /// current seat; cleared when consumed or when the turn advances.
    pub must_draw_from_deck: Option<Seat>,
    /// Applied-intent history for replay and diagnostics.
    pub history: Vector<ActionRecord>,
    /// Deterministic RNG; all in-round randomness flows through it.
    pub rng: GameRng,
}

impl GameState {
    /// Number of seats at the table.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    /// The player at a seat.
    ///
    /// Panics on an out-of-range seat; a dangling seat is a fatal
    /// invariant break, not a user-facing error.
    #[must_use]
    pub fn player(&self, seat: Seat) -> &Player {
        &self.players[seat.index()]
    }

    pub(crate) fn player_mut(&mut self, seat: Seat) -> &mut Player {
        &mut self.players[seat.index()]
    }

    /// The player whose turn it is.
    #[must_use]
    pub fn current_player(&self) -> &Player {
        self.player(self.current)
    }

    /// The visible top of the discard pile.
    #[must_use]
    pub fn top_discard(&self) -> Option<&Card> {
        self.discard_pile.back()
    }

    /// Every player has taken both peek flips?
    #[must_use]
    pub fn all_peeked(&self) -> bool {
        self.players.iter().all(|p| p.peek_flips >= 2)
    }

    /// Total cards across all grids and both piles.
    ///
    /// Equals the configured deck size except while a drawn card is held
    /// by the caller (then it is exactly one less).
    #[must_use]
    pub fn card_count(&self) -> usize {
        let in_grids: usize = self.players.iter().map(|p| p.grid.card_count()).sum();
        in_grids + self.draw_pile.len() + self.discard_pile.len()
    }

    /// Sorted identities of every card in grids and piles.
    ///
    /// The conservation property: this is always a subset of the dealt
    /// deck with no duplicates, and the full set whenever no card is held.
    #[must_use]
    pub fn card_ids(&self) -> Vec<CardId> {
        let mut ids: Vec<CardId> = self
            .players
            .iter()
            .flat_map(|p| p.grid.iter().map(|(_, card)| card.id))
            .chain(self.draw_pile.iter().map(|c| c.id))
            .chain(self.discard_pile.iter().map(|c| c.id))
            .collect();
        ids.sort();
        ids
    }

    /// Structural sanity checks shared by every engine operation.
    /// Debug builds only; release builds trust the operations.
    pub(crate) fn debug_validate(&self) {
        debug_assert!(
            self.top_discard().map_or(true, |c| c.face_up),
            "discard top must be face-up"
        );
        debug_assert!(
            self.draw_pile.iter().all(|c| !c.face_up),
            "draw pile must be face-down"
        );
        debug_assert!(
            self.must_draw_from_deck.map_or(true, |s| s == self.current),
            "forced-draw flag must point at the current seat"
        );
        debug_assert!(
            self.players.iter().all(|p| p.peek_flips <= 2),
            "peek flips are capped at 2"
        );
        {
            let ids = self.card_ids();
            let mut deduped = ids.clone();
            deduped.dedup();
            debug_assert_eq!(ids.len(), deduped.len(), "duplicate card identity");
        }
    }
}
