//! Player actions and the delta mapping.

/// One of the nine discrete moves a player can make per tick.
///
/// Deltas use the screen convention: negative y is up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// No movement.
    Stay,
    /// Move one cell up.
    Up,
    /// Move one cell down.
    Down,
    /// Move one cell left.
    Left,
    /// Move one cell right.
    Right,
    /// Move one cell diagonally up-left.
    UpLeft,
    /// Move one cell diagonally up-right.
    UpRight,
    /// Move one cell diagonally down-left.
    DownLeft,
    /// Move one cell diagonally down-right.
    DownRight,
}

impl Action {
    /// All actions, in the stable index order agent adapters rely on.
    pub const ALL: [Action; 9] = [
        Action::Stay,
        Action::Up,
        Action::Down,
        Action::Left,
        Action::Right,
        Action::UpLeft,
        Action::UpRight,
        Action::DownLeft,
        Action::DownRight,
    ];

    /// The unit movement delta `(dx, dy)` for this action.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Action::Stay => (0, 0),
            Action::Up => (0, -1),
            Action::Down => (0, 1),
            Action::Left => (-1, 0),
            Action::Right => (1, 0),
            Action::UpLeft => (-1, -1),
            Action::UpRight => (1, -1),
            Action::DownLeft => (-1, 1),
            Action::DownRight => (1, 1),
        }
    }

    /// Resolve an arbitrary integer delta to the best-matching action.
    ///
    /// Each axis is clamped to `{-1, 0, 1}` independently, so any desired
    /// direction collapses onto a legal single-cell move. This is the bridge
    /// from a raw "head that way" output to a discrete action.
    #[must_use]
    pub const fn from_delta(dx: i32, dy: i32) -> Self {
        match (dx.signum(), dy.signum()) {
            (0, 0) => Action::Stay,
            (0, -1) => Action::Up,
            (0, 1) => Action::Down,
            (-1, 0) => Action::Left,
            (1, 0) => Action::Right,
            (-1, -1) => Action::UpLeft,
            (1, -1) => Action::UpRight,
            (-1, 1) => Action::DownLeft,
            _ => Action::DownRight,
        }
    }
}
