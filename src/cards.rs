//! Cards, deck construction, and rank scoring.
//!
//! Golf is played with two physical 52-card decks shuffled together
//! (104 cards; 108 when the joker variant is on). Every physical card
//! gets a unique `CardId` at deck build time so the full set can be
//! tracked through grids and piles without ambiguity.
//!
//! ## Scoring
//!
//! Score is a pure function of rank, never stored on the card:
//! A=1, 2-4 and 6-10 at face value, 5=-5, J/Q=10, K=0, Joker=-2.
//! A card whose column was cleared (`zeroed`) scores 0 regardless of rank.

use serde::{Deserialize, Serialize};

use crate::config::GolfConfig;
use crate::rng::GameRng;

/// Card suit. Never affects scoring or matching; kept for display.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Suit {
    Spades,
    Hearts,
    Diamonds,
    Clubs,
}

impl Suit {
    /// All four suits in deck-build order.
    pub const ALL: [Suit; 4] = [Suit::Spades, Suit::Hearts, Suit::Diamonds, Suit::Clubs];

    /// Unicode symbol for display.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Suit::Spades => '\u{2660}',
            Suit::Hearts => '\u{2665}',
            Suit::Diamonds => '\u{2666}',
            Suit::Clubs => '\u{2663}',
        }
    }
}

/// Card rank. `Joker` only appears when the joker variant is enabled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rank {
    Ace,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
    Joker,
}

impl Rank {
    /// The thirteen standard ranks in deck-build order.
    pub const STANDARD: [Rank; 13] = [
        Rank::Ace,
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
    ];

    /// Point value of this rank.
    ///
    /// ```
    /// use golf_engine::cards::Rank;
    ///
    /// assert_eq!(Rank::Five.value(), -5);
    /// assert_eq!(Rank::King.value(), 0);
    /// assert_eq!(Rank::Queen.value(), 10);
    /// ```
    #[must_use]
    pub const fn value(self) -> i32 {
        match self {
            Rank::Ace => 1,
            Rank::Two => 2,
            Rank::Three => 3,
            Rank::Four => 4,
            Rank::Five => -5,
            Rank::Six => 6,
            Rank::Seven => 7,
            Rank::Eight => 8,
            Rank::Nine => 9,
            Rank::Ten | Rank::Jack | Rank::Queen => 10,
            Rank::King => 0,
            Rank::Joker => -2,
        }
    }

    /// Short display label ("A", "2", ... "K", "?").
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Rank::Ace => "A",
            Rank::Two => "2",
            Rank::Three => "3",
            Rank::Four => "4",
            Rank::Five => "5",
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "10",
            Rank::Jack => "J",
            Rank::Queen => "Q",
            Rank::King => "K",
            Rank::Joker => "?",
        }
    }
}

/// Unique identifier for a physical card within one game.
///
/// Assigned sequentially at deck build time. Two cards with the same
/// suit and rank (there are always at least two of each) have distinct IDs,
/// which is what makes the conservation invariant checkable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CardId(pub u16);

impl CardId {
    #[must_use]
    pub const fn new(id: u16) -> Self {
        Self(id)
    }
}

/// A physical card and its table state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    /// Unique identity within the game.
    pub id: CardId,
    /// Suit (display only; jokers carry a decorative suit).
    pub suit: Suit,
    /// Rank, the only thing matching and scoring look at.
    pub rank: Rank,
    /// Face-up on the table?
    pub face_up: bool,
    /// Set when this card's column was cleared by a three-of-a-kind.
    /// Only meaningful while the card sits in a grid.
    pub zeroed: bool,
}

impl Card {
    /// Create a face-down, un-zeroed card.
    #[must_use]
    pub const fn new(id: CardId, suit: Suit, rank: Rank) -> Self {
        Self {
            id,
            suit,
            rank,
            face_up: false,
            zeroed: false,
        }
    }

    /// Point value: 0 when zeroed, otherwise the rank value.
    #[must_use]
    pub const fn value(&self) -> i32 {
        if self.zeroed {
            0
        } else {
            self.rank.value()
        }
    }
}

impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.rank.label(), self.suit.symbol())
    }
}

/// Build the shuffled double deck for one round, all cards face-down.
///
/// Two standard 52-card decks, plus two jokers per deck when the joker
/// variant is on. Shuffled with the unbiased Fisher-Yates in [`GameRng`].
#[must_use]
pub fn build_deck(config: &GolfConfig, rng: &mut GameRng) -> Vec<Card> {
    let mut deck = Vec::with_capacity(config.deck_size());
    let mut next_id = 0u16;
    let mut push = |deck: &mut Vec<Card>, suit, rank| {
        deck.push(Card::new(CardId::new(next_id), suit, rank));
        next_id += 1;
    };

    for _ in 0..2 {
        for suit in Suit::ALL {
            for rank in Rank::STANDARD {
                push(&mut deck, suit, rank);
            }
        }
        if config.jokers_enabled() {
            // Joker suits are decorative; rules never read them.
            push(&mut deck, Suit::Spades, Rank::Joker);
            push(&mut deck, Suit::Hearts, Rank::Joker);
        }
    }

    debug_assert_eq!(deck.len(), config.deck_size());
    rng.shuffle(&mut deck);
    deck
}
