//! Rolling per-player statistics over a sliding tick window.
//!
//! Both trackers answer "how is this player doing lately" questions for
//! live displays, without rescanning full game history. Entries are purged
//! lazily on record; reads filter by timestamp, so a stale tracker still
//! answers correctly.

use std::collections::{HashMap, VecDeque};

use crate::game::PlayerId;

/// Sliding-window count of deliveries per player.
#[derive(Debug, Clone)]
pub struct RollingScore {
    window_ticks: u64,
    entries: HashMap<PlayerId, VecDeque<(u64, u32)>>,
}

impl RollingScore {
    /// Create a tracker that remembers deliveries for `window_ticks`.
    #[must_use]
    pub fn new(window_ticks: u64) -> Self {
        Self {
            window_ticks,
            entries: HashMap::new(),
        }
    }

    /// Record deliveries completed by `player` at `tick`. Zero is a no-op.
    pub fn record(&mut self, player: PlayerId, tick: u64, delivered: u32) {
        if delivered == 0 {
            return;
        }
        let window = self.window_ticks;
        let entries = self.entries.entry(player).or_default();
        while entries
            .front()
            .is_some_and(|(stamp, _)| tick.saturating_sub(*stamp) >= window)
        {
            entries.pop_front();
        }
        entries.push_back((tick, delivered));
    }

    /// Deliveries by `player` within the window ending at `tick`.
    #[must_use]
    pub fn total(&self, player: PlayerId, tick: u64) -> u32 {
        self.entries.get(&player).map_or(0, |entries| {
            entries
                .iter()
                .filter(|(stamp, _)| tick.saturating_sub(*stamp) < self.window_ticks)
                .map(|(_, delivered)| delivered)
                .sum()
        })
    }

    /// Windowed totals for every player with recorded deliveries.
    #[must_use]
    pub fn totals(&self, tick: u64) -> HashMap<PlayerId, u32> {
        self.entries
            .keys()
            .map(|player| (*player, self.total(*player, tick)))
            .collect()
    }

    /// Forget all recorded history.
    pub fn reset(&mut self) {
        self.entries.clear();
    }
}

/// Sliding-window reward sums per player, bucketed to keep memory flat.
///
/// Rewards land in fixed-width tick buckets; a bucket accumulates until
/// time moves past it. Exact zeros are dropped at the door so idle ticks
/// do not churn buckets.
#[derive(Debug, Clone)]
pub struct RollingReward {
    window_ticks: u64,
    bucket_ticks: u64,
    buckets: HashMap<PlayerId, VecDeque<(u64, f64)>>,
}

impl RollingReward {
    /// Create a tracker spanning `window_ticks`, grouped into buckets of
    /// `bucket_ticks` (clamped to at least 1).
    #[must_use]
    pub fn new(window_ticks: u64, bucket_ticks: u64) -> Self {
        Self {
            window_ticks,
            bucket_ticks: bucket_ticks.max(1),
            buckets: HashMap::new(),
        }
    }

    /// Record `reward` earned by `player` at `tick`. Zero is a no-op.
    pub fn record(&mut self, player: PlayerId, tick: u64, reward: f64) {
        if reward.abs() < f64::EPSILON {
            return;
        }
        let bucket = tick / self.bucket_ticks;
        let window = self.window_buckets();
        let buckets = self.buckets.entry(player).or_default();
        while buckets
            .front()
            .is_some_and(|(index, _)| bucket.saturating_sub(*index) >= window)
        {
            buckets.pop_front();
        }
        match buckets.back_mut() {
            Some((index, sum)) if *index == bucket => *sum += reward,
            _ => buckets.push_back((bucket, reward)),
        }
    }

    /// Reward gathered by `player` within the window ending at `tick`.
    #[must_use]
    pub fn total(&self, player: PlayerId, tick: u64) -> f64 {
        let now = tick / self.bucket_ticks;
        let window = self.window_buckets();
        self.buckets.get(&player).map_or(0.0, |buckets| {
            buckets
                .iter()
                .filter(|(index, _)| now.saturating_sub(*index) < window)
                .map(|(_, sum)| sum)
                .sum()
        })
    }

    /// Forget all recorded history.
    pub fn reset(&mut self) {
        self.buckets.clear();
    }

    fn window_buckets(&self) -> u64 {
        self.window_ticks / self.bucket_ticks
    }
}
