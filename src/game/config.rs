//! Engine configuration.

use crate::game::GridPosition;

/// Numeric configuration for a game.
///
/// Everything the engine needs is plain data; the CLI layer maps flags onto
/// the fields it exposes and leaves the rest at their defaults.
#[derive(Debug, Clone, Copy)]
pub struct GameConfig {
    /// Field width in cells.
    pub width: i32,
    /// Field height in cells.
    pub height: i32,
    /// Number of players placed at game start.
    pub player_count: usize,
    /// Number of resources kept on the field.
    pub resource_count: usize,
    /// Shaping reward magnitude at zero remaining distance.
    pub shaping_reward_min: f64,
    /// Shaping reward magnitude at maximal remaining distance.
    pub shaping_reward_max: f64,
    /// Monster-proximity reward per cell of distance change.
    pub monster_reward_scale: f64,
    /// Cap on the monster-proximity reward magnitude.
    pub monster_reward_max: f64,
    /// Per-tick probability that the monster steps toward a carrier.
    pub monster_move_chance: f64,
    /// Penalty added when a move collides with another player.
    pub collision_penalty: f64,
    /// Penalty added when a move would leave the field.
    pub out_of_bounds_penalty: f64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: 200,
            height: 200,
            player_count: 6,
            resource_count: 15,
            shaping_reward_min: 0.01,
            shaping_reward_max: 0.1,
            monster_reward_scale: 0.05,
            monster_reward_max: 0.05,
            monster_move_chance: 0.3,
            collision_penalty: 0.0,
            out_of_bounds_penalty: 0.0,
        }
    }
}

impl GameConfig {
    /// The delivery target, fixed at the field center.
    #[must_use]
    pub const fn target_position(&self) -> GridPosition {
        GridPosition::new(self.width / 2, self.height / 2)
    }

    /// The largest possible goal distance: the corner-to-corner span.
    ///
    /// Shaping magnitudes scale against this so they stay comparable across
    /// field sizes.
    #[must_use]
    pub fn max_goal_distance(&self) -> f64 {
        GridPosition::new(0, 0).distance_to(GridPosition::new(self.width - 1, self.height - 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_is_field_center() {
        let config = GameConfig::default();
        assert_eq!(config.target_position(), GridPosition::new(100, 100));

        let small = GameConfig {
            width: 10,
            height: 10,
            ..GameConfig::default()
        };
        assert_eq!(small.target_position(), GridPosition::new(5, 5));
    }

    #[test]
    fn test_max_goal_distance() {
        let small = GameConfig {
            width: 10,
            height: 10,
            ..GameConfig::default()
        };
        let expected = 9.0f64.hypot(9.0);
        assert!((small.max_goal_distance() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_defaults() {
        let config = GameConfig::default();
        assert_eq!(config.width, 200);
        assert_eq!(config.height, 200);
        assert_eq!(config.player_count, 6);
        assert_eq!(config.resource_count, 15);
        assert!(config.shaping_reward_min < config.shaping_reward_max);
    }
}
