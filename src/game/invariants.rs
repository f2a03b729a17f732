//! Game invariants - sanity checks that detect bugs.
//!
//! These should NEVER trigger in a correctly implemented engine. If they
//! do, it indicates a bug in movement resolution or object placement.
//!
//! Deliberately absent: monster/player cell disjointness. The monster
//! steals by landing on a carrier, so sharing a cell is a legal state.

use std::collections::HashSet;

use crate::game::{GameState, is_within_bounds, target_exclusion_zone};

/// Invariant violation error.
#[derive(Debug, Clone)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub message: String,
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invariant violation: {}", self.message)
    }
}

impl std::error::Error for InvariantViolation {}

/// Check all game invariants.
///
/// Returns a list of violations found, or empty if all invariants hold.
/// These are bug detectors, not gameplay limits.
#[must_use]
pub fn check_invariants(state: &GameState) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();
    let width = state.config.width;
    let height = state.config.height;

    if !is_within_bounds(state.target, width, height) {
        violations.push(InvariantViolation {
            message: format!(
                "Target at {:?} is outside the {width}x{height} field",
                state.target
            ),
        });
    }

    if !is_within_bounds(state.monster, width, height) {
        violations.push(InvariantViolation {
            message: format!(
                "Monster at {:?} is outside the {width}x{height} field",
                state.monster
            ),
        });
    }

    for player in &state.players {
        if !is_within_bounds(player.position, width, height) {
            violations.push(InvariantViolation {
                message: format!(
                    "Player {} at {:?} is outside the {width}x{height} field",
                    player.identifier, player.position
                ),
            });
        }
    }

    // Two players on one cell means collision resolution failed.
    for (index, player) in state.players.iter().enumerate() {
        for other in state.players.iter().skip(index + 1) {
            if player.position == other.position {
                violations.push(InvariantViolation {
                    message: format!(
                        "Players {} and {} share cell {:?}",
                        player.identifier, other.identifier, player.position
                    ),
                });
            }
        }
    }

    let zone = target_exclusion_zone(state.target, width, height);
    let mut seen = HashSet::with_capacity(state.resources.len());
    for cell in &state.resources {
        if !is_within_bounds(*cell, width, height) {
            violations.push(InvariantViolation {
                message: format!("Resource at {cell:?} is outside the {width}x{height} field"),
            });
        }
        if zone.contains(cell) {
            violations.push(InvariantViolation {
                message: format!("Resource at {cell:?} sits inside the target exclusion zone"),
            });
        }
        if !seen.insert(*cell) {
            violations.push(InvariantViolation {
                message: format!("Duplicate resource at {cell:?}"),
            });
        }
    }

    violations
}

/// Assert all game invariants hold, panicking if any are violated.
///
/// Only active in debug builds. No-op in release builds.
///
/// # Panics
///
/// Panics with detailed message if any invariant is violated.
#[cfg(debug_assertions)]
pub fn assert_invariants(state: &GameState) {
    let violations = check_invariants(state);
    if !violations.is_empty() {
        let messages: Vec<_> = violations.iter().map(|v| v.message.as_str()).collect();
        panic!("Game invariant violations:\n  - {}", messages.join("\n  - "));
    }
}

/// No-op in release builds.
#[cfg(not(debug_assertions))]
pub fn assert_invariants(_state: &GameState) {}
