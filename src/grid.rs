//! The 3x3 card grid owned by each player.
//!
//! A cell is either empty (only transiently while dealing) or holds
//! exactly one card. Column clearing and grid scoring live here; the
//! engine decides *when* to invoke them.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::cards::Card;

/// Grid height.
pub const ROWS: usize = 3;

/// Grid width.
pub const COLS: usize = 3;

/// (row, column) cell coordinate.
pub type Coord = (usize, usize);

/// A player's 3x3 layout.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    cells: [[Option<Card>; COLS]; ROWS],
}

impl Grid {
    /// An empty grid (all nine cells vacant), ready for dealing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the card at a cell, if any.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<&Card> {
        self.cells[row][col].as_ref()
    }

    /// Deal a card into an empty cell.
    ///
    /// Panics if the cell is occupied; two cards in one cell is a
    /// fatal invariant break.
    pub fn place(&mut self, row: usize, col: usize, card: Card) {
        assert!(
            self.cells[row][col].is_none(),
            "cell ({row},{col}) already holds a card"
        );
        self.cells[row][col] = Some(card);
    }

    /// Swap a new card into a cell, returning the displaced card.
    pub fn replace(&mut self, row: usize, col: usize, card: Card) -> Option<Card> {
        self.cells[row][col].replace(card)
    }

    /// Flip a cell face-up. Returns true only if it was face-down.
    pub fn flip_up(&mut self, row: usize, col: usize) -> bool {
        match &mut self.cells[row][col] {
            Some(card) if !card.face_up => {
                card.face_up = true;
                true
            }
            _ => false,
        }
    }

    /// Number of cards currently in the grid.
    #[must_use]
    pub fn card_count(&self) -> usize {
        self.iter().count()
    }

    /// All nine cells occupied?
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.card_count() == ROWS * COLS
    }

    /// Every card face-up? (Vacant cells don't count against this;
    /// they only exist mid-deal.)
    #[must_use]
    pub fn all_face_up(&self) -> bool {
        self.iter().all(|(_, card)| card.face_up)
    }

    /// Coordinates of face-down cards, row-major.
    #[must_use]
    pub fn face_down_coords(&self) -> SmallVec<[Coord; 9]> {
        self.iter()
            .filter(|(_, card)| !card.face_up)
            .map(|(coord, _)| coord)
            .collect()
    }

    /// Iterate occupied cells row-major as (coord, card).
    pub fn iter(&self) -> impl Iterator<Item = (Coord, &Card)> {
        self.cells.iter().enumerate().flat_map(|(r, row)| {
            row.iter()
                .enumerate()
                .filter_map(move |(c, cell)| cell.as_ref().map(|card| ((r, c), card)))
        })
    }

    /// Zero every column that newly completed a three-of-a-kind.
    ///
    /// A column clears when all three cells are face-up with equal rank
    /// and the column is not already fully zeroed. Columns are evaluated
    /// left to right; multiple simultaneous matches all clear in one call.
    /// Returns true if at least one column newly cleared.
    pub fn clear_matched_columns(&mut self) -> bool {
        let mut cleared = false;
        for col in 0..COLS {
            let column = [
                self.cells[0][col].as_ref(),
                self.cells[1][col].as_ref(),
                self.cells[2][col].as_ref(),
            ];
            let all_up = column.iter().all(|c| c.is_some_and(|card| card.face_up));
            if !all_up {
                continue;
            }
            let already_zeroed = column.iter().all(|c| c.is_some_and(|card| card.zeroed));
            let rank = column[0].map(|card| card.rank);
            let matched = column.iter().all(|c| c.map(|card| card.rank) == rank);
            if matched && !already_zeroed {
                for row in 0..ROWS {
                    if let Some(card) = &mut self.cells[row][col] {
                        card.zeroed = true;
                        card.face_up = true;
                    }
                }
                cleared = true;
            }
        }
        cleared
    }

    /// Sum of card values over all nine cells.
    ///
    /// Scoring only happens once the round is over, so every card is
    /// face-up by then; face-down cards would still sum their rank.
    #[must_use]
    pub fn score(&self) -> i32 {
        self.iter().map(|(_, card)| card.value()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardId, Rank, Suit};

    fn card(id: u16, rank: Rank) -> Card {
        let mut c = Card::new(CardId::new(id), Suit::Spades, rank);
        c.face_up = true;
        c
    }

    fn filled_grid(rank: Rank) -> Grid {
        let mut grid = Grid::new();
        for r in 0..ROWS {
            for c in 0..COLS {
                grid.place(r, c, card((r * COLS + c) as u16, rank));
            }
        }
        grid
    }

    /// Rows of twos, threes, fours: no column matches anywhere.
    fn mixed_grid() -> Grid {
        let ranks = [Rank::Two, Rank::Three, Rank::Four];
        let mut grid = Grid::new();
        for r in 0..ROWS {
            for c in 0..COLS {
                grid.place(r, c, card((r * COLS + c) as u16, ranks[r]));
            }
        }
        grid
    }

    #[test]
    fn test_place_and_get() {
        let mut grid = Grid::new();
        assert!(grid.get(1, 1).is_none());

        grid.place(1, 1, card(0, Rank::Seven));
        assert_eq!(grid.get(1, 1).unwrap().rank, Rank::Seven);
        assert_eq!(grid.card_count(), 1);
        assert!(!grid.is_full());
    }

    #[test]
    #[should_panic(expected = "already holds a card")]
    fn test_double_place_is_fatal() {
        let mut grid = Grid::new();
        grid.place(0, 0, card(0, Rank::Ace));
        grid.place(0, 0, card(1, Rank::Two));
    }

    #[test]
    fn test_flip_up_only_once() {
        let mut grid = Grid::new();
        let mut c = card(0, Rank::Ace);
        c.face_up = false;
        grid.place(2, 2, c);

        assert!(grid.flip_up(2, 2));
        assert!(!grid.flip_up(2, 2)); // Already face-up
        assert!(!grid.flip_up(0, 0)); // Empty cell
    }

    #[test]
    fn test_column_clear_sets_all_three() {
        let mut grid = mixed_grid();
        // Column 1 gets three jacks, the rest stay twos.
        for r in 0..ROWS {
            grid.replace(r, 1, card(10 + r as u16, Rank::Jack));
        }

        assert!(grid.clear_matched_columns());
        for r in 0..ROWS {
            let c = grid.get(r, 1).unwrap();
            assert!(c.zeroed);
            assert!(c.face_up);
            assert_eq!(c.value(), 0);
        }
        // Other columns untouched.
        assert!(!grid.get(0, 0).unwrap().zeroed);
    }

    #[test]
    fn test_column_clear_requires_face_up() {
        let mut grid = mixed_grid();
        let mut hidden = card(10, Rank::Jack);
        hidden.face_up = false;
        grid.replace(0, 0, hidden);
        grid.replace(1, 0, card(11, Rank::Jack));
        grid.replace(2, 0, card(12, Rank::Jack));

        // Top jack is face-down, so the column must not clear.
        assert!(!grid.clear_matched_columns());
    }

    #[test]
    fn test_column_does_not_clear_twice() {
        let mut grid = mixed_grid();
        for r in 0..ROWS {
            grid.replace(r, 0, card(10 + r as u16, Rank::Queen));
        }

        assert!(grid.clear_matched_columns());
        // Fully-zeroed column must not report a fresh clear.
        assert!(!grid.clear_matched_columns());
    }

    #[test]
    fn test_multiple_columns_clear_in_one_call() {
        let mut grid = Grid::new();
        for r in 0..ROWS {
            grid.place(r, 0, card((r) as u16, Rank::Jack));
            grid.place(r, 1, card((10 + r) as u16, Rank::Four));
            grid.place(r, 2, card((20 + r) as u16, Rank::Nine));
        }

        assert!(grid.clear_matched_columns());
        assert_eq!(grid.score(), 0);
    }

    #[test]
    fn test_score_mixed_grid() {
        let mut grid = Grid::new();
        grid.place(0, 0, card(0, Rank::Five)); // -5
        grid.place(0, 1, card(1, Rank::King)); // 0
        grid.place(0, 2, card(2, Rank::Ace)); // 1
        grid.place(1, 0, card(3, Rank::Queen)); // 10

        assert_eq!(grid.score(), 6);
    }

    #[test]
    fn test_score_is_deterministic() {
        let grid = filled_grid(Rank::Seven);
        assert_eq!(grid.score(), 63);
        assert_eq!(grid.score(), 63);
    }

    #[test]
    fn test_face_down_coords() {
        let mut grid = filled_grid(Rank::Three);
        let mut hidden = card(99, Rank::Three);
        hidden.face_up = false;
        grid.replace(1, 2, hidden);

        let coords = grid.face_down_coords();
        assert_eq!(coords.as_slice(), &[(1, 2)]);
        assert!(!grid.all_face_up());
    }
}
