// Allow unwrap and unreadable literals in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::unreadable_literal))]
//! Collect: a deterministic grid-world resource game for training agents.
//!
//! Players roam a bounded field gathering resources and delivering them to a
//! fixed central target while a monster hunts whoever is carrying. Each tick
//! the engine resolves every player in roster order, steps the monster, and
//! hands each agent a shaped reward plus a fresh observation.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │    Session (ticks, feedback)        │
//! ├─────────────────────────────────────┤
//! │  Controllers (greedy, exploring)    │
//! ├─────────────────────────────────────┤
//! │    Game Engine (GameState)          │
//! └─────────────────────────────────────┘
//! ```

pub mod controllers;
pub mod error;
pub mod game;
pub mod session;
pub mod stats;

pub use error::{GameError, GameResult};

// Re-export key game types at crate root for convenience
pub use game::{
    Action, ControllerKind, GameConfig, GameState, GridPosition, Observation, Player, PlayerId,
};
