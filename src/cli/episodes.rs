//! Episodes command implementation.

use super::output::{
    BatchStats, EpisodeSummary, JsonBatchResult, format_batch_csv, format_batch_text,
};
use super::{BatchFormat, CliError, PolicyKind};
use collect::GameConfig;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::time::Instant;

/// Execute the episodes command.
///
/// # Errors
///
/// Returns an error if the batch fails.
#[allow(clippy::too_many_arguments)]
pub(crate) fn execute(
    episodes: u64,
    ticks: u64,
    width: i32,
    height: i32,
    players: usize,
    resources: usize,
    seed: Option<u64>,
    threads: Option<usize>,
    policy: PolicyKind,
    format: BatchFormat,
    progress: bool,
) -> Result<(), CliError> {
    // Set thread pool size if specified
    if let Some(num_threads) = threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .ok(); // Ignore error if already initialized
    }

    // Base seed
    let base_seed = seed.unwrap_or_else(super::random_seed);
    let config = super::game_config(width, height, players, resources);

    // Progress bar
    let pb = if progress {
        let pb = ProgressBar::new(episodes);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} episodes ({per_sec})")
                .expect("valid template")
                .progress_chars("=>-"),
        );
        Some(pb)
    } else {
        None
    };

    let start = Instant::now();

    // Run episodes in parallel using lock-free fold/reduce pattern
    // Each thread accumulates into its own BatchStats, then we merge at the end
    // Progress is tracked via episodes_played in stats (no atomics in hot path)
    let stats = (0..episodes)
        .into_par_iter()
        .fold(
            || BatchStats::new(players),
            |mut local_stats, i| {
                let episode_seed = base_seed.wrapping_add(i);

                if let Ok(summary) = run_episode(config, episode_seed, ticks, policy) {
                    local_stats.add_summary(&summary);
                }

                local_stats
            },
        )
        .reduce(
            || BatchStats::new(players),
            |mut a, b| {
                a.merge(&b);
                a
            },
        );

    // Update progress bar after completion (no atomic overhead in hot path)
    if let Some(pb) = pb {
        pb.set_position(stats.episodes_played);
        pb.finish_with_message("done");
    }

    let duration = start.elapsed();

    // Calculate episodes per second
    let episodes_per_sec = if duration.as_secs_f64() > 0.0 {
        stats.episodes_played as f64 / duration.as_secs_f64()
    } else {
        0.0
    };

    // Output based on format
    match format {
        BatchFormat::Text => {
            println!();
            print!("{}", format_batch_text(&stats, players));
            println!();
            println!(
                "Duration: {:.2}s ({:.0} episodes/sec)",
                duration.as_secs_f64(),
                episodes_per_sec
            );
        }
        BatchFormat::Json => {
            let json_result = JsonBatchResult::from_stats(&stats, players);
            let json = serde_json::to_string_pretty(&json_result)?;
            println!("{json}");
        }
        BatchFormat::Csv => {
            print!("{}", format_batch_csv(&stats, players));
        }
    }

    Ok(())
}

/// Run a single seeded episode to completion.
fn run_episode(
    config: GameConfig,
    seed: u64,
    ticks: u64,
    policy: PolicyKind,
) -> Result<EpisodeSummary, CliError> {
    let mut session = super::build_session(config, seed, policy)?.with_round_ticks(ticks.max(1));
    for _ in 0..ticks {
        session.tick()?;
    }
    Ok(EpisodeSummary::from_session(&session, seed))
}
