//! CLI command implementations for Collect.

pub(crate) mod episodes;
pub(crate) mod run;
pub(crate) mod watch;

mod output;

use clap::ValueEnum;
use collect::controllers::{
    Controller, EpsilonGreedyController, GreedyController, RandomController,
};
use collect::session::Session;
use collect::{GameConfig, GameState, PlayerId};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// Output format for the `run` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Output format for the `episodes` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum BatchFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
    /// CSV format.
    Csv,
}

/// Policy driving the AI-controlled players.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum PolicyKind {
    /// Head for the current objective, flee an adjacent monster.
    Greedy,
    /// Greedy with a decaying uniform-random exploration rate.
    Epsilon,
    /// Uniformly random moves.
    Random,
}

impl PolicyKind {
    /// Build one controller instance of this kind.
    fn build(self, rng: StdRng) -> Box<dyn Controller> {
        match self {
            PolicyKind::Greedy => Box::new(GreedyController::new()),
            PolicyKind::Epsilon => {
                Box::new(EpsilonGreedyController::new(Box::new(GreedyController::new()), rng))
            }
            PolicyKind::Random => Box::new(RandomController::new(rng)),
        }
    }
}

/// CLI error type.
#[derive(Debug)]
pub(crate) struct CliError {
    message: String,
}

impl CliError {
    /// Create a new CLI error.
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for CliError {}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        Self::new(e.to_string())
    }
}

impl From<collect::GameError> for CliError {
    fn from(e: collect::GameError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::new(e.to_string())
    }
}

/// Seed fallback when none is given on the command line.
pub(crate) fn random_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(42)
}

/// Assemble a game config from the world flags every command shares.
pub(crate) fn game_config(width: i32, height: i32, players: usize, resources: usize) -> GameConfig {
    GameConfig {
        width,
        height,
        player_count: players,
        resource_count: resources,
        ..GameConfig::default()
    }
}

/// Build a fully seeded session: the engine RNG comes straight from `seed`,
/// and each player's policy gets its own stream derived from it so runs with
/// the same seed replay identically.
pub(crate) fn build_session(
    config: GameConfig,
    seed: u64,
    policy: PolicyKind,
) -> Result<Session, CliError> {
    let game = GameState::new(config, StdRng::seed_from_u64(seed))?;
    let mut controllers: HashMap<PlayerId, Box<dyn Controller>> = HashMap::new();
    for (slot, player) in game.players().iter().enumerate() {
        let policy_seed = seed.wrapping_add(slot as u64).wrapping_add(1);
        controllers.insert(player.identifier, policy.build(StdRng::seed_from_u64(policy_seed)));
    }
    Ok(Session::new(game, controllers))
}
