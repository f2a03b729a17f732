//! Error types for the game engine.

use std::fmt;

/// Errors the engine can surface to callers.
///
/// Everything else that can go "wrong" during play (out-of-bounds moves,
/// blocked pickups, collisions) is an expected game-flow outcome and resolves
/// to a no-op or a reward adjustment, never an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameError {
    /// A player index outside the roster was passed to the engine.
    PlayerIndexOutOfRange {
        /// The offending index.
        index: usize,
        /// Number of players in the roster.
        player_count: usize,
    },
    /// Free-cell sampling exhausted the field without finding a legal cell.
    ///
    /// Indicates a misconfiguration (too many entities for the field size);
    /// the engine aborts the operation rather than degrade placement
    /// invariants.
    PlacementExhausted {
        /// Number of sampling attempts made before giving up.
        attempts: usize,
    },
    /// A game was constructed with an empty player roster.
    NoPlayers,
    /// A game was constructed with a zero or negative field dimension.
    InvalidDimensions {
        /// Configured field width.
        width: i32,
        /// Configured field height.
        height: i32,
    },
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::PlayerIndexOutOfRange {
                index,
                player_count,
            } => {
                write!(f, "player index {index} out of range (roster size {player_count})")
            }
            GameError::PlacementExhausted { attempts } => {
                write!(f, "no free cell found after {attempts} sampling attempts")
            }
            GameError::NoPlayers => write!(f, "at least one player is required"),
            GameError::InvalidDimensions { width, height } => {
                write!(f, "field dimensions {width}x{height} must be positive")
            }
        }
    }
}

impl std::error::Error for GameError {}

/// Result type for engine operations.
pub type GameResult<T> = Result<T, GameError>;
