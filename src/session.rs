//! Session runtime: ticks, controller feedback and round bookkeeping.
//!
//! A [`Session`] owns a [`GameState`] plus one policy per AI player and
//! drives them through the fixed per-tick sequence: every player acts in
//! roster order, then the environment advances, then feedback reaches the
//! policies. Rounds recycle the world on a fixed tick budget while
//! identities, policies and cumulative statistics carry over.

use std::collections::HashMap;

use crate::controllers::Controller;
use crate::error::GameResult;
use crate::game::{Action, ControllerKind, GameState, Observation, PlayerId};
use crate::stats::{RollingReward, RollingScore};

/// Simulation pacing assumed by tick-based durations.
pub const TICKS_PER_SECOND: u64 = 30;

/// Round length: 3 minutes of play.
const DEFAULT_ROUND_TICKS: u64 = 180 * TICKS_PER_SECOND;

/// Rolling-statistics window: the last 5 minutes.
const ROLLING_WINDOW_TICKS: u64 = 300 * TICKS_PER_SECOND;

/// Reward history bucket width.
const REWARD_BUCKET_TICKS: u64 = TICKS_PER_SECOND;

/// Feedback produced for one player by one tick.
///
/// `next_observation` is the mid-tick snapshot taken immediately after this
/// player resolved, before later players and the monster moved. Policies
/// learn from the world as their action left it.
#[derive(Debug, Clone, Copy)]
pub struct AgentFeedback {
    /// The player the feedback belongs to.
    pub player: PlayerId,
    /// Shaped reward for the action taken this tick.
    pub reward: f64,
    /// Snapshot captured right after the player's own update.
    pub next_observation: Observation,
}

/// A running game bound to its policies and statistics.
#[derive(Debug)]
pub struct Session {
    game: GameState,
    controllers: HashMap<PlayerId, Box<dyn Controller>>,
    rolling_scores: RollingScore,
    rolling_rewards: RollingReward,
    cumulative_scores: HashMap<PlayerId, u64>,
    cumulative_rewards: HashMap<PlayerId, f64>,
    tick: u64,
    round_tick: u64,
    round: u32,
    round_ticks: u64,
    steals: u64,
    human_player: Option<PlayerId>,
    pending_action: Option<Action>,
}

impl Session {
    /// Bind `game` to `controllers`, keyed by player identifier.
    ///
    /// Players without an entry fall back to [`Action::Stay`] when driven
    /// by the AI path.
    #[must_use]
    pub fn new(game: GameState, controllers: HashMap<PlayerId, Box<dyn Controller>>) -> Self {
        Self {
            game,
            controllers,
            rolling_scores: RollingScore::new(ROLLING_WINDOW_TICKS),
            rolling_rewards: RollingReward::new(ROLLING_WINDOW_TICKS, REWARD_BUCKET_TICKS),
            cumulative_scores: HashMap::new(),
            cumulative_rewards: HashMap::new(),
            tick: 0,
            round_tick: 0,
            round: 0,
            round_ticks: DEFAULT_ROUND_TICKS,
            steals: 0,
            human_player: None,
            pending_action: None,
        }
    }

    /// Override the round length in ticks (clamped to at least 1).
    #[must_use]
    pub fn with_round_ticks(mut self, round_ticks: u64) -> Self {
        self.round_ticks = round_ticks.max(1);
        self
    }

    /// Advance the simulation by one tick.
    ///
    /// If the previous tick finished a round, the world is re-placed first.
    /// Then each player resolves in roster order (humans consume the pending
    /// action, AI players ask their policy), the monster moves, and each AI
    /// policy hears its reward with the round-`done` flag.
    ///
    /// # Errors
    ///
    /// Propagates engine errors; the session is left mid-tick only if the
    /// underlying placement sampling fails.
    pub fn tick(&mut self) -> GameResult<Vec<AgentFeedback>> {
        if self.round_tick >= self.round_ticks {
            self.begin_round()?;
        }

        let player_count = self.game.players().len();
        let mut feedback = Vec::with_capacity(player_count);

        for index in 0..player_count {
            let acting = self.game.players()[index];
            let action = match acting.controller {
                ControllerKind::Human => self.pending_action.take().unwrap_or(Action::Stay),
                ControllerKind::Ai => {
                    let observation = self.game.observe(index)?;
                    self.controllers
                        .get_mut(&acting.identifier)
                        .map_or(Action::Stay, |controller| {
                            controller.select_action(&observation)
                        })
                }
            };

            let reward = self.game.update_player(index, action)?;
            let updated = self.game.players()[index];
            let next_observation = self.game.observe(index)?;
            let delivered = updated.score.saturating_sub(acting.score);

            self.rolling_scores
                .record(updated.identifier, self.tick, delivered);
            self.rolling_rewards
                .record(updated.identifier, self.tick, reward);
            *self.cumulative_scores.entry(updated.identifier).or_insert(0) += u64::from(delivered);
            *self.cumulative_rewards.entry(updated.identifier).or_insert(0.0) += reward;

            feedback.push(AgentFeedback {
                player: updated.identifier,
                reward,
                next_observation,
            });
        }

        let carriers_before = self.carrier_count();
        self.game.advance_environment()?;
        if self.carrier_count() < carriers_before {
            self.steals += 1;
        }

        let done = self.round_tick + 1 >= self.round_ticks;
        for entry in &feedback {
            let ai_driven = self
                .game
                .players()
                .iter()
                .find(|p| p.identifier == entry.player)
                .is_some_and(|p| p.controller == ControllerKind::Ai);
            if ai_driven && let Some(controller) = self.controllers.get_mut(&entry.player) {
                controller.observe(entry.reward, &entry.next_observation, done);
            }
        }

        self.tick += 1;
        self.round_tick += 1;
        Ok(feedback)
    }

    /// Flip player 0 between AI and keyboard control.
    ///
    /// Releasing control discards any pending action; the player's policy
    /// resumes on the next tick.
    ///
    /// # Errors
    ///
    /// Propagates engine errors if the player roster is inconsistent.
    pub fn toggle_human_control(&mut self) -> GameResult<()> {
        if let Some(player) = self.human_player {
            let index = self
                .game
                .players()
                .iter()
                .position(|p| p.identifier == player)
                .unwrap_or(0);
            self.game.set_player_controller(index, ControllerKind::Ai)?;
            self.human_player = None;
            self.pending_action = None;
        } else {
            self.game.set_player_controller(0, ControllerKind::Human)?;
            self.human_player = Some(self.game.players()[0].identifier);
        }
        Ok(())
    }

    /// Queue the action the human player takes next tick.
    ///
    /// Ignored while no player is under keyboard control; a newer action
    /// replaces an unconsumed one.
    pub fn set_pending_action(&mut self, action: Action) {
        if self.human_player.is_some() {
            self.pending_action = Some(action);
        }
    }

    /// The underlying game world.
    #[must_use]
    pub const fn game(&self) -> &GameState {
        &self.game
    }

    /// Ticks simulated since the session started.
    #[must_use]
    pub const fn elapsed_ticks(&self) -> u64 {
        self.tick
    }

    /// Completed-round counter, starting at 0.
    #[must_use]
    pub const fn round(&self) -> u32 {
        self.round
    }

    /// Ticks already played in the current round.
    #[must_use]
    pub const fn round_tick(&self) -> u64 {
        self.round_tick
    }

    /// Configured round length in ticks.
    #[must_use]
    pub const fn round_ticks(&self) -> u64 {
        self.round_ticks
    }

    /// Resources stolen by the monster so far.
    #[must_use]
    pub const fn steals(&self) -> u64 {
        self.steals
    }

    /// The player under keyboard control, if any.
    #[must_use]
    pub const fn human_player(&self) -> Option<PlayerId> {
        self.human_player
    }

    /// Deliveries by `player` within the rolling window.
    #[must_use]
    pub fn rolling_score(&self, player: PlayerId) -> u32 {
        self.rolling_scores.total(player, self.tick)
    }

    /// Reward gathered by `player` within the rolling window.
    #[must_use]
    pub fn rolling_reward(&self, player: PlayerId) -> f64 {
        self.rolling_rewards.total(player, self.tick)
    }

    /// Deliveries by `player` across all rounds of this session.
    #[must_use]
    pub fn cumulative_score(&self, player: PlayerId) -> u64 {
        self.cumulative_scores.get(&player).copied().unwrap_or(0)
    }

    /// Total reward earned by `player` across all rounds of this session.
    #[must_use]
    pub fn cumulative_reward(&self, player: PlayerId) -> f64 {
        self.cumulative_rewards.get(&player).copied().unwrap_or(0.0)
    }

    /// Exploration rate reported by `player`'s policy, if it explores.
    #[must_use]
    pub fn exploration_rate(&self, player: PlayerId) -> Option<f64> {
        self.controllers
            .get(&player)
            .and_then(|controller| controller.exploration_rate())
    }

    fn carrier_count(&self) -> usize {
        self.game.players().iter().filter(|p| p.has_resource).count()
    }

    fn begin_round(&mut self) -> GameResult<()> {
        self.game.reset_round()?;
        self.round += 1;
        self.round_tick = 0;
        self.pending_action = None;
        Ok(())
    }
}
