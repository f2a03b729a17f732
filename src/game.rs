//! Game layer for Collect.
//!
//! Implements the simulation rules:
//! - Grid geometry and free-cell sampling with exclusion zones
//! - Players, actions and the observation encoding agents consume
//! - The `GameState` transition engine (moves, collisions, pickup/delivery,
//!   reward shaping, monster AI)

mod action;
mod config;
mod geometry;
mod invariants;
mod observation;
mod player;
mod state;

pub use action::Action;
pub use config::GameConfig;
pub use geometry::{GridPosition, adjacent_positions, is_within_bounds, target_exclusion_zone};
pub use invariants::{InvariantViolation, assert_invariants, check_invariants};
pub use observation::{FEATURE_COUNT, Observation};
pub use player::{ControllerKind, Player, PlayerId};
pub use state::GameState;
