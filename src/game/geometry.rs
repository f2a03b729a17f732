//! Grid geometry and cell sampling.

use std::collections::HashSet;

use rand::Rng;
use rand::rngs::StdRng;

use crate::error::{GameError, GameResult};

/// A cell coordinate on the field.
///
/// Coordinates are signed so that a move can be computed first and
/// bounds-checked second; a legal position always satisfies
/// `0 <= x < width` and `0 <= y < height`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridPosition {
    /// X coordinate (column).
    pub x: i32,
    /// Y coordinate (row, increasing downward).
    pub y: i32,
}

impl GridPosition {
    /// Create a new position.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Apply a movement delta without bounds clamping.
    ///
    /// Bounds are checked by the caller.
    #[must_use]
    pub const fn moved_by(self, delta: (i32, i32)) -> Self {
        Self {
            x: self.x + delta.0,
            y: self.y + delta.1,
        }
    }

    /// One Chebyshev step toward `other`: each axis moves by the sign of
    /// its remaining difference.
    #[must_use]
    pub const fn step_toward(self, other: Self) -> Self {
        Self {
            x: self.x + (other.x - self.x).signum(),
            y: self.y + (other.y - self.y).signum(),
        }
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance_to(self, other: Self) -> f64 {
        f64::from(other.x - self.x).hypot(f64::from(other.y - self.y))
    }

    /// Squared Euclidean distance to `other`.
    ///
    /// Exact integer form, for nearest-entity comparisons.
    #[must_use]
    pub fn distance_squared(self, other: Self) -> i64 {
        let dx = i64::from(other.x - self.x);
        let dy = i64::from(other.y - self.y);
        dx * dx + dy * dy
    }
}

/// Check that a position lies within a `width` x `height` field.
#[must_use]
pub const fn is_within_bounds(pos: GridPosition, width: i32, height: i32) -> bool {
    pos.x >= 0 && pos.x < width && pos.y >= 0 && pos.y < height
}

/// Get the in-bounds Chebyshev neighbors of a cell.
///
/// Returns a fixed-size array and count to avoid heap allocation.
/// The array contains valid positions in indices 0..count; the cell itself
/// is excluded, and fewer than 8 neighbors come back at edges and corners.
#[must_use]
pub fn adjacent_positions(pos: GridPosition, width: i32, height: i32) -> ([GridPosition; 8], u8) {
    let mut result = [GridPosition::new(0, 0); 8];
    let mut count = 0u8;

    for dy in -1..=1 {
        for dx in -1..=1 {
            if dx == 0 && dy == 0 {
                continue;
            }
            let neighbor = pos.moved_by((dx, dy));
            if is_within_bounds(neighbor, width, height) {
                result[usize::from(count)] = neighbor;
                count += 1;
            }
        }
    }

    (result, count)
}

/// The forbidden zone for resource and monster spawn: the target cell plus
/// its in-bounds 8-neighborhood.
#[must_use]
pub fn target_exclusion_zone(
    target: GridPosition,
    width: i32,
    height: i32,
) -> HashSet<GridPosition> {
    let mut zone = HashSet::with_capacity(9);
    zone.insert(target);
    let (neighbors, count) = adjacent_positions(target, width, height);
    for neighbor in &neighbors[..usize::from(count)] {
        zone.insert(*neighbor);
    }
    zone
}

/// Uniformly sample a cell outside `exclusions`, retrying up to
/// `width * height` times.
///
/// # Errors
///
/// Returns [`GameError::InvalidDimensions`] for a non-positive field and
/// [`GameError::PlacementExhausted`] if every attempt landed on an
/// excluded cell.
pub(crate) fn random_free_cell(
    rng: &mut StdRng,
    width: i32,
    height: i32,
    exclusions: &HashSet<GridPosition>,
) -> GameResult<GridPosition> {
    if width <= 0 || height <= 0 {
        return Err(GameError::InvalidDimensions { width, height });
    }
    let max_attempts = usize::try_from(width.saturating_mul(height)).unwrap_or(0);

    for _ in 0..max_attempts {
        let candidate = GridPosition::new(rng.gen_range(0..width), rng.gen_range(0..height));
        if !exclusions.contains(&candidate) {
            return Ok(candidate);
        }
    }

    Err(GameError::PlacementExhausted {
        attempts: max_attempts,
    })
}
