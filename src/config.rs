//! Game configuration.
//!
//! `GolfConfig` is the one knob panel recognized by the engine: player
//! count (2-4), rounds per game (the settings screen offers 5 or 9),
//! the joker variant flag, and the two deadline durations. Built with
//! assert-validated chained setters.

use serde::{Deserialize, Serialize};

/// Default turn deadline: 25 seconds.
pub const DEFAULT_TURN_MS: u64 = 25_000;

/// Default peek deadline: 15 seconds.
pub const DEFAULT_PEEK_MS: u64 = 15_000;

/// Configuration for one game of Golf.
///
/// ```
/// use golf_engine::config::GolfConfig;
///
/// let config = GolfConfig::new(3).rounds(5).jokers(true);
/// assert_eq!(config.player_count(), 3);
/// assert_eq!(config.deck_size(), 108);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GolfConfig {
    player_count: usize,
    rounds: u32,
    jokers: bool,
    turn_duration_ms: u64,
    peek_duration_ms: u64,
}

impl Default for GolfConfig {
    fn default() -> Self {
        Self::new(2)
    }
}

impl GolfConfig {
    /// Create a configuration for `player_count` players with the
    /// canonical defaults: 9 rounds, no jokers, 25 s turns, 15 s peeks.
    #[must_use]
    pub fn new(player_count: usize) -> Self {
        assert!(
            (2..=4).contains(&player_count),
            "Player count must be 2-4"
        );
        Self {
            player_count,
            rounds: 9,
            jokers: false,
            turn_duration_ms: DEFAULT_TURN_MS,
            peek_duration_ms: DEFAULT_PEEK_MS,
        }
    }

    /// Set the number of rounds per game.
    #[must_use]
    pub fn rounds(mut self, rounds: u32) -> Self {
        assert!(rounds >= 1, "Must play at least 1 round");
        self.rounds = rounds;
        self
    }

    /// Enable or disable the joker variant (108-card deck, jokers score -2).
    #[must_use]
    pub fn jokers(mut self, jokers: bool) -> Self {
        self.jokers = jokers;
        self
    }

    /// Set the turn deadline duration in milliseconds.
    #[must_use]
    pub fn turn_duration_ms(mut self, ms: u64) -> Self {
        assert!(ms > 0, "Turn duration must be positive");
        self.turn_duration_ms = ms;
        self
    }

    /// Set the peek deadline duration in milliseconds.
    #[must_use]
    pub fn peek_duration_ms(mut self, ms: u64) -> Self {
        assert!(ms > 0, "Peek duration must be positive");
        self.peek_duration_ms = ms;
        self
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.player_count
    }

    #[must_use]
    pub fn rounds_per_game(&self) -> u32 {
        self.rounds
    }

    #[must_use]
    pub fn jokers_enabled(&self) -> bool {
        self.jokers
    }

    #[must_use]
    pub fn turn_duration(&self) -> u64 {
        self.turn_duration_ms
    }

    #[must_use]
    pub fn peek_duration(&self) -> u64 {
        self.peek_duration_ms
    }

    /// Total number of physical cards in play.
    #[must_use]
    pub fn deck_size(&self) -> usize {
        if self.jokers {
            108
        } else {
            104
        }
    }
}
