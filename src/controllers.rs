//! Agent policies that drive AI players.
//!
//! A [`Controller`] turns observations into actions and hears back how the
//! action went. Policies own whatever randomness they use, so a session
//! made of seeded controllers replays identically.

use std::fmt;

use rand::Rng;
use rand::rngs::StdRng;

use crate::game::{Action, Observation};

const INITIAL_EPSILON: f64 = 1.0;
const EPSILON_DECAY: f64 = 0.995;
const EPSILON_FLOOR: f64 = 0.05;

/// An agent policy driving a single player.
pub trait Controller: fmt::Debug {
    /// Choose the next action from the current observation.
    fn select_action(&mut self, observation: &Observation) -> Action;

    /// Receive feedback for the action selected last tick.
    fn observe(&mut self, reward: f64, next_observation: &Observation, done: bool);

    /// Current exploration rate, if the policy explores.
    fn exploration_rate(&self) -> Option<f64> {
        None
    }
}

/// Deterministic policy: flee an adjacent monster, otherwise head straight
/// for the current goal (nearest resource, or the target while carrying).
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedyController;

impl GreedyController {
    /// Create a greedy controller.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Controller for GreedyController {
    fn select_action(&mut self, observation: &Observation) -> Action {
        let (monster_dx, monster_dy) = observation.monster_offset();
        let monster_adjacent = monster_dx.abs() <= 1
            && monster_dy.abs() <= 1
            && (monster_dx, monster_dy) != (0, 0);
        if monster_adjacent {
            return Action::from_delta(-monster_dx, -monster_dy);
        }

        let (dx, dy) = if observation.has_resource() {
            observation.target_offset()
        } else {
            observation.nearest_resource_offset()
        };
        Action::from_delta(dx, dy)
    }

    fn observe(&mut self, _reward: f64, _next_observation: &Observation, _done: bool) {}
}

/// Explore-then-exploit wrapper around another policy.
///
/// With probability epsilon the action is uniformly random; otherwise the
/// inner policy decides. Epsilon decays multiplicatively on every feedback
/// until it reaches the floor.
#[derive(Debug)]
pub struct EpsilonGreedyController {
    inner: Box<dyn Controller>,
    epsilon: f64,
    decay: f64,
    floor: f64,
    rng: StdRng,
}

impl EpsilonGreedyController {
    /// Wrap `inner` with the standard exploration schedule.
    #[must_use]
    pub fn new(inner: Box<dyn Controller>, rng: StdRng) -> Self {
        Self::with_schedule(inner, INITIAL_EPSILON, EPSILON_DECAY, EPSILON_FLOOR, rng)
    }

    /// Wrap `inner` with an explicit exploration schedule.
    #[must_use]
    pub fn with_schedule(
        inner: Box<dyn Controller>,
        epsilon: f64,
        decay: f64,
        floor: f64,
        rng: StdRng,
    ) -> Self {
        Self {
            inner,
            epsilon,
            decay,
            floor,
            rng,
        }
    }
}

impl Controller for EpsilonGreedyController {
    fn select_action(&mut self, observation: &Observation) -> Action {
        if self.rng.r#gen::<f64>() < self.epsilon {
            Action::ALL[self.rng.gen_range(0..Action::ALL.len())]
        } else {
            self.inner.select_action(observation)
        }
    }

    fn observe(&mut self, reward: f64, next_observation: &Observation, done: bool) {
        self.epsilon = (self.epsilon * self.decay).max(self.floor);
        self.inner.observe(reward, next_observation, done);
    }

    fn exploration_rate(&self) -> Option<f64> {
        Some(self.epsilon)
    }
}

/// Uniformly random policy, a baseline for comparing learners against.
#[derive(Debug)]
pub struct RandomController {
    rng: StdRng,
}

impl RandomController {
    /// Create a random controller driven by `rng`.
    #[must_use]
    pub fn new(rng: StdRng) -> Self {
        Self { rng }
    }
}

impl Controller for RandomController {
    fn select_action(&mut self, _observation: &Observation) -> Action {
        Action::ALL[self.rng.gen_range(0..Action::ALL.len())]
    }

    fn observe(&mut self, _reward: f64, _next_observation: &Observation, _done: bool) {}
}
