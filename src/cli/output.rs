//! Output formatting utilities for CLI.

use collect::session::Session;
use serde::Serialize;

/// Final tallies for one finished session.
#[derive(Debug, Clone)]
pub(super) struct EpisodeSummary {
    /// Random seed used.
    pub(super) seed: u64,
    /// Total ticks simulated.
    pub(super) ticks: u64,
    /// Resources the monster stole.
    pub(super) steals: u64,
    /// Per-player outcomes, in roster order.
    pub(super) players: Vec<PlayerOutcome>,
}

/// Per-player outcome of one session.
#[derive(Debug, Clone, Copy)]
pub(super) struct PlayerOutcome {
    /// Player identifier (0-based).
    pub(super) identifier: usize,
    /// Resources delivered to the target.
    pub(super) deliveries: u64,
    /// Cumulative reward over the whole session.
    pub(super) reward: f64,
    /// Current exploration rate, for policies that have one.
    pub(super) exploration_rate: Option<f64>,
}

impl EpisodeSummary {
    /// Read the final tallies out of a finished session.
    pub(super) fn from_session(session: &Session, seed: u64) -> Self {
        let players = session
            .game()
            .players()
            .iter()
            .map(|player| PlayerOutcome {
                identifier: player.identifier,
                deliveries: session.cumulative_score(player.identifier),
                reward: session.cumulative_reward(player.identifier),
                exploration_rate: session.exploration_rate(player.identifier),
            })
            .collect();

        Self {
            seed,
            ticks: session.elapsed_ticks(),
            steals: session.steals(),
            players,
        }
    }
}

/// JSON-serializable episode result.
#[derive(Debug, Serialize)]
pub(super) struct JsonEpisodeResult {
    /// Random seed used.
    seed: u64,
    /// Total ticks simulated.
    ticks: u64,
    /// Resources the monster stole.
    steals: u64,
    /// Per-player results.
    players: Vec<JsonPlayerResult>,
}

/// JSON-serializable player result.
#[derive(Debug, Serialize)]
pub(super) struct JsonPlayerResult {
    /// Player identifier (0-based).
    player: usize,
    /// Resources delivered to the target.
    deliveries: u64,
    /// Cumulative reward.
    reward: f64,
    /// Exploration rate (null for policies without one).
    exploration_rate: Option<f64>,
}

impl JsonEpisodeResult {
    /// Create from an episode summary.
    pub(super) fn from_summary(summary: &EpisodeSummary) -> Self {
        Self {
            seed: summary.seed,
            ticks: summary.ticks,
            steals: summary.steals,
            players: summary
                .players
                .iter()
                .map(|p| JsonPlayerResult {
                    player: p.identifier,
                    deliveries: p.deliveries,
                    reward: p.reward,
                    exploration_rate: p.exploration_rate,
                })
                .collect(),
        }
    }
}

/// Format an episode summary as human-readable text.
pub(super) fn format_text(summary: &EpisodeSummary) -> String {
    let mut output = String::new();

    output.push_str(&format!("Episode complete (seed: {})\n", summary.seed));
    output.push_str(&format!("  Ticks: {}  Steals: {}\n\n", summary.ticks, summary.steals));

    for player in &summary.players {
        output.push_str(&format!(
            "  Player {}: {} deliveries, reward {:.2}",
            player.identifier, player.deliveries, player.reward
        ));
        if let Some(epsilon) = player.exploration_rate {
            output.push_str(&format!(" (exploration {:.1}%)", epsilon * 100.0));
        }
        output.push('\n');
    }

    output
}

/// Batch statistics for aggregated episode results.
#[derive(Debug, Default)]
pub(super) struct BatchStats {
    /// Total episodes played.
    pub(super) episodes_played: u64,
    /// Total ticks across all episodes.
    total_ticks: u64,
    /// Total monster steals across all episodes.
    total_steals: u64,
    /// Delivery count per player.
    total_deliveries: Vec<u64>,
    /// Reward sum per player.
    reward_sums: Vec<f64>,
    /// Reward sum of squares for std dev calculation.
    reward_sq_sums: Vec<f64>,
}

impl BatchStats {
    /// Create new stats for n players.
    pub(super) fn new(num_players: usize) -> Self {
        Self {
            episodes_played: 0,
            total_ticks: 0,
            total_steals: 0,
            total_deliveries: vec![0; num_players],
            reward_sums: vec![0.0; num_players],
            reward_sq_sums: vec![0.0; num_players],
        }
    }

    /// Add an episode summary to the stats.
    pub(super) fn add_summary(&mut self, summary: &EpisodeSummary) {
        self.episodes_played += 1;
        self.total_ticks += summary.ticks;
        self.total_steals += summary.steals;

        for (i, player) in summary.players.iter().enumerate() {
            if i < self.total_deliveries.len() {
                self.total_deliveries[i] += player.deliveries;
                self.reward_sums[i] += player.reward;
                self.reward_sq_sums[i] += player.reward * player.reward;
            }
        }
    }

    /// Fold another stats block into this one.
    pub(super) fn merge(&mut self, other: &Self) {
        self.episodes_played += other.episodes_played;
        self.total_ticks += other.total_ticks;
        self.total_steals += other.total_steals;
        for (a, b) in self.total_deliveries.iter_mut().zip(&other.total_deliveries) {
            *a += b;
        }
        for (a, b) in self.reward_sums.iter_mut().zip(&other.reward_sums) {
            *a += b;
        }
        for (a, b) in self.reward_sq_sums.iter_mut().zip(&other.reward_sq_sums) {
            *a += b;
        }
    }

    /// Get average deliveries per episode for a player.
    pub(super) fn avg_deliveries(&self, player_idx: usize) -> f64 {
        if self.episodes_played == 0 {
            return 0.0;
        }
        self.total_deliveries.get(player_idx).copied().unwrap_or(0) as f64
            / self.episodes_played as f64
    }

    /// Get average reward per episode for a player.
    pub(super) fn avg_reward(&self, player_idx: usize) -> f64 {
        if self.episodes_played == 0 {
            return 0.0;
        }
        self.reward_sums.get(player_idx).copied().unwrap_or(0.0) / self.episodes_played as f64
    }

    /// Get reward standard deviation for a player.
    pub(super) fn reward_std_dev(&self, player_idx: usize) -> f64 {
        if self.episodes_played == 0 {
            return 0.0;
        }
        let n = self.episodes_played as f64;
        let mean = self.avg_reward(player_idx);
        let sq_sum = self.reward_sq_sums.get(player_idx).copied().unwrap_or(0.0);
        let variance = (sq_sum / n) - (mean * mean);
        if variance < 0.0 {
            0.0
        } else {
            variance.sqrt()
        }
    }

    /// Get average steals per episode.
    pub(super) fn avg_steals(&self) -> f64 {
        if self.episodes_played == 0 {
            return 0.0;
        }
        self.total_steals as f64 / self.episodes_played as f64
    }

    /// Get average episode length.
    pub(super) fn avg_ticks(&self) -> f64 {
        if self.episodes_played == 0 {
            return 0.0;
        }
        self.total_ticks as f64 / self.episodes_played as f64
    }
}

/// JSON-serializable batch result.
#[derive(Debug, Serialize)]
pub(super) struct JsonBatchResult {
    /// Total episodes played.
    episodes_played: u64,
    /// Per-player statistics.
    players: Vec<JsonBatchPlayer>,
    /// Average monster steals per episode.
    avg_steals: f64,
    /// Average episode length in ticks.
    avg_ticks: f64,
}

/// JSON-serializable per-player batch stats.
#[derive(Debug, Serialize)]
pub(super) struct JsonBatchPlayer {
    /// Player identifier (0-based).
    player: usize,
    /// Average deliveries per episode.
    avg_deliveries: f64,
    /// Average reward per episode.
    avg_reward: f64,
    /// Reward standard deviation.
    reward_std_dev: f64,
}

impl JsonBatchResult {
    /// Create from stats.
    pub(super) fn from_stats(stats: &BatchStats, num_players: usize) -> Self {
        let players = (0..num_players)
            .map(|i| JsonBatchPlayer {
                player: i,
                avg_deliveries: stats.avg_deliveries(i),
                avg_reward: stats.avg_reward(i),
                reward_std_dev: stats.reward_std_dev(i),
            })
            .collect();

        Self {
            episodes_played: stats.episodes_played,
            players,
            avg_steals: stats.avg_steals(),
            avg_ticks: stats.avg_ticks(),
        }
    }
}

/// Format batch stats as human-readable text.
pub(super) fn format_batch_text(stats: &BatchStats, num_players: usize) -> String {
    let mut output = String::new();

    output.push_str(&format!("Batch Results ({} episodes)\n", stats.episodes_played));
    output.push_str("========================================\n\n");

    output.push_str("Deliveries:\n");
    for i in 0..num_players {
        output.push_str(&format!("  Player {}: {:.1} per episode\n", i, stats.avg_deliveries(i)));
    }

    output.push_str("\nRewards:\n");
    for i in 0..num_players {
        output.push_str(&format!(
            "  Player {}: {:.2} (+/- {:.2})\n",
            i,
            stats.avg_reward(i),
            stats.reward_std_dev(i)
        ));
    }

    output.push_str(&format!("\nAverage Steals: {:.1} per episode\n", stats.avg_steals()));
    output.push_str(&format!("Average Episode Length: {:.0} ticks\n", stats.avg_ticks()));

    output
}

/// Format batch stats as CSV.
pub(super) fn format_batch_csv(stats: &BatchStats, num_players: usize) -> String {
    let mut output = String::new();

    // Header
    output.push_str("player,avg_deliveries,avg_reward,reward_std_dev\n");

    // Data rows
    for i in 0..num_players {
        output.push_str(&format!(
            "{},{:.2},{:.2},{:.2}\n",
            i,
            stats.avg_deliveries(i),
            stats.avg_reward(i),
            stats.reward_std_dev(i)
        ));
    }

    output
}
