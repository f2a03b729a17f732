//! Per-player observation encoding.

use crate::game::{GridPosition, Player};

/// Length of the encoded feature vector.
pub const FEATURE_COUNT: usize = 9;

/// A read-only snapshot of the world from one player's point of view.
///
/// Captured fresh each tick; offsets are raw cell deltas, with `(0, 0)`
/// standing in when the entity does not exist. The encoded form normalizes
/// each axis by `max(1, span - 1)` so features stay roughly in `[-1, 1]`.
#[derive(Debug, Clone, Copy)]
pub struct Observation {
    resource_offset: (i32, i32),
    target_offset: (i32, i32),
    other_player_offset: (i32, i32),
    monster_offset: (i32, i32),
    has_resource: bool,
    width: i32,
    height: i32,
}

impl Observation {
    /// Capture an observation for `player` from the current world.
    pub(crate) fn capture(
        player: &Player,
        players: &[Player],
        resources: &[GridPosition],
        target: GridPosition,
        monster: GridPosition,
        width: i32,
        height: i32,
    ) -> Self {
        let position = player.position;

        Self {
            resource_offset: nearest_offset(position, resources.iter().copied()),
            target_offset: offset(position, target),
            other_player_offset: nearest_offset(
                position,
                players
                    .iter()
                    .filter(|other| other.identifier != player.identifier)
                    .map(|other| other.position),
            ),
            monster_offset: offset(position, monster),
            has_resource: player.has_resource,
            width,
            height,
        }
    }

    /// Cell offset to the nearest uncollected resource, `(0, 0)` if none.
    #[must_use]
    pub const fn nearest_resource_offset(&self) -> (i32, i32) {
        self.resource_offset
    }

    /// Cell offset to the delivery target.
    ///
    /// Always the real target, even while the player is still seeking a
    /// resource; the two goal phases never leak into each other's features.
    #[must_use]
    pub const fn target_offset(&self) -> (i32, i32) {
        self.target_offset
    }

    /// Cell offset to the nearest other player, `(0, 0)` if there is none.
    #[must_use]
    pub const fn nearest_other_player_offset(&self) -> (i32, i32) {
        self.other_player_offset
    }

    /// Cell offset to the monster.
    #[must_use]
    pub const fn monster_offset(&self) -> (i32, i32) {
        self.monster_offset
    }

    /// Whether the observed player holds a resource.
    #[must_use]
    pub const fn has_resource(&self) -> bool {
        self.has_resource
    }

    /// Encode the observation as a fixed-length normalized vector.
    ///
    /// Order: resource offset, target offset, other-player offset, monster
    /// offset (x then y each), carry flag.
    #[must_use]
    pub fn feature_vector(&self) -> [f64; FEATURE_COUNT] {
        [
            self.normalized_x(self.resource_offset.0),
            self.normalized_y(self.resource_offset.1),
            self.normalized_x(self.target_offset.0),
            self.normalized_y(self.target_offset.1),
            self.normalized_x(self.other_player_offset.0),
            self.normalized_y(self.other_player_offset.1),
            self.normalized_x(self.monster_offset.0),
            self.normalized_y(self.monster_offset.1),
            if self.has_resource { 1.0 } else { 0.0 },
        ]
    }

    fn normalized_x(&self, delta: i32) -> f64 {
        normalize(delta, self.width)
    }

    fn normalized_y(&self, delta: i32) -> f64 {
        normalize(delta, self.height)
    }
}

const fn offset(from: GridPosition, to: GridPosition) -> (i32, i32) {
    (to.x - from.x, to.y - from.y)
}

/// Offset to whichever candidate is closest by squared Euclidean distance.
///
/// Ties resolve to the earliest candidate, `(0, 0)` when there are none.
fn nearest_offset(
    from: GridPosition,
    candidates: impl Iterator<Item = GridPosition>,
) -> (i32, i32) {
    candidates
        .min_by_key(|candidate| from.distance_squared(*candidate))
        .map_or((0, 0), |nearest| offset(from, nearest))
}

fn normalize(delta: i32, span: i32) -> f64 {
    let limit = (span - 1).max(1);
    f64::from(delta) / f64::from(limit)
}

#[cfg(test)]
mod tests {
    use crate::game::ControllerKind;

    use super::*;

    fn approx(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-12, "{a} != {b}");
    }

    #[test]
    fn test_feature_vector_order_and_normalization() {
        let focal = Player::new(0, GridPosition::new(2, 3), ControllerKind::Ai);
        let other = Player::new(1, GridPosition::new(4, 4), ControllerKind::Ai);
        let players = [focal, other];
        let resources = [GridPosition::new(5, 7)];

        let obs = Observation::capture(
            &focal,
            &players,
            &resources,
            GridPosition::new(5, 5),
            GridPosition::new(8, 2),
            10,
            10,
        );
        let vector = obs.feature_vector();

        approx(vector[0], 3.0 / 9.0);
        approx(vector[1], 4.0 / 9.0);
        approx(vector[2], 3.0 / 9.0);
        approx(vector[3], 2.0 / 9.0);
        approx(vector[4], 2.0 / 9.0);
        approx(vector[5], 1.0 / 9.0);
        approx(vector[6], 6.0 / 9.0);
        approx(vector[7], -1.0 / 9.0);
        approx(vector[8], 0.0);
    }

    #[test]
    fn test_absent_entities_default_to_zero() {
        let focal = Player::new(0, GridPosition::new(3, 3), ControllerKind::Ai).with_resource(true);
        let players = [focal];

        let obs = Observation::capture(
            &focal,
            &players,
            &[],
            GridPosition::new(5, 5),
            GridPosition::new(3, 3),
            10,
            10,
        );
        let vector = obs.feature_vector();

        assert_eq!(obs.nearest_resource_offset(), (0, 0));
        assert_eq!(obs.nearest_other_player_offset(), (0, 0));
        approx(vector[0], 0.0);
        approx(vector[1], 0.0);
        approx(vector[4], 0.0);
        approx(vector[5], 0.0);
        approx(vector[8], 1.0);

        // The target offset stays the real target while carrying.
        assert_eq!(obs.target_offset(), (2, 2));
    }

    #[test]
    fn test_nearest_resource_selection() {
        let focal = Player::new(0, GridPosition::new(0, 0), ControllerKind::Ai);
        let players = [focal];
        let resources = [
            GridPosition::new(7, 7),
            GridPosition::new(2, 1),
            GridPosition::new(1, 2),
        ];

        let obs = Observation::capture(
            &focal,
            &players,
            &resources,
            GridPosition::new(5, 5),
            GridPosition::new(9, 9),
            10,
            10,
        );

        // (2, 1) and (1, 2) tie; the earlier entry wins.
        assert_eq!(obs.nearest_resource_offset(), (2, 1));
    }

    #[test]
    fn test_normalization_uses_each_axis_span() {
        let focal = Player::new(0, GridPosition::new(0, 0), ControllerKind::Ai);
        let players = [focal];
        let resources = [GridPosition::new(4, 2)];

        let obs = Observation::capture(
            &focal,
            &players,
            &resources,
            GridPosition::new(2, 1),
            GridPosition::new(4, 0),
            5,
            3,
        );
        let vector = obs.feature_vector();

        approx(vector[0], 4.0 / 4.0);
        approx(vector[1], 2.0 / 2.0);
        approx(vector[2], 2.0 / 4.0);
        approx(vector[3], 1.0 / 2.0);
    }
}
