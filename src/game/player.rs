//! Player records.

use crate::game::GridPosition;

/// Unique identifier for a player, stable for the life of the process.
pub type PlayerId = usize;

/// Who is driving a player this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerKind {
    /// An agent policy selects the action.
    Ai,
    /// Keyboard input selects the action.
    Human,
}

/// State for a single player.
///
/// Immutable value semantics: every mutation returns a new record, and
/// `identifier` never changes after construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Player {
    /// Unique identifier, assigned at construction.
    pub identifier: PlayerId,
    /// Current cell.
    pub position: GridPosition,
    /// Who is driving this player.
    pub controller: ControllerKind,
    /// Whether the player currently holds a resource.
    pub has_resource: bool,
    /// Deliveries completed this round.
    pub score: u32,
}

impl Player {
    /// Create a new player with no resource and zero score.
    #[must_use]
    pub const fn new(
        identifier: PlayerId,
        position: GridPosition,
        controller: ControllerKind,
    ) -> Self {
        Self {
            identifier,
            position,
            controller,
            has_resource: false,
            score: 0,
        }
    }

    /// Copy of this player at a different cell.
    #[must_use]
    pub const fn with_position(self, position: GridPosition) -> Self {
        Self { position, ..self }
    }

    /// Copy of this player with the carry flag set.
    #[must_use]
    pub const fn with_resource(self, has_resource: bool) -> Self {
        Self {
            has_resource,
            ..self
        }
    }

    /// Copy of this player with a new score.
    #[must_use]
    pub const fn with_score(self, score: u32) -> Self {
        Self { score, ..self }
    }

    /// Copy of this player under a different controller.
    #[must_use]
    pub const fn with_controller(self, controller: ControllerKind) -> Self {
        Self { controller, ..self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_creation() {
        let player = Player::new(3, GridPosition::new(5, 5), ControllerKind::Ai);
        assert_eq!(player.identifier, 3);
        assert_eq!(player.position, GridPosition::new(5, 5));
        assert_eq!(player.controller, ControllerKind::Ai);
        assert!(!player.has_resource);
        assert_eq!(player.score, 0);
    }

    #[test]
    fn test_with_constructors_preserve_identity() {
        let player = Player::new(1, GridPosition::new(0, 0), ControllerKind::Ai);

        let moved = player.with_position(GridPosition::new(4, 2));
        assert_eq!(moved.identifier, 1);
        assert_eq!(moved.position, GridPosition::new(4, 2));
        assert_eq!(player.position, GridPosition::new(0, 0));

        let carrying = moved.with_resource(true);
        assert!(carrying.has_resource);
        assert!(!moved.has_resource);

        let scored = carrying.with_score(carrying.score + 1);
        assert_eq!(scored.score, 1);

        let human = scored.with_controller(ControllerKind::Human);
        assert_eq!(human.controller, ControllerKind::Human);
        assert_eq!(human.identifier, 1);
    }
}
