//! Run command implementation.

use super::output::{EpisodeSummary, JsonEpisodeResult, format_text};
use super::{CliError, OutputFormat, PolicyKind};

/// Execute the run command.
///
/// # Errors
///
/// Returns an error if the session fails to run.
#[allow(clippy::too_many_arguments)]
pub(crate) fn execute(
    width: i32,
    height: i32,
    players: usize,
    resources: usize,
    ticks: u64,
    seed: Option<u64>,
    policy: PolicyKind,
    format: OutputFormat,
    quiet: bool,
) -> Result<(), CliError> {
    // Generate seed if not provided
    let seed = seed.unwrap_or_else(super::random_seed);
    let config = super::game_config(width, height, players, resources);

    if !quiet {
        println!("Running session with seed {seed}...");
        println!("Players: {players} ({policy:?} policy), field: {width}x{height}");
        println!();
    }

    let mut session = super::build_session(config, seed, policy)?.with_round_ticks(ticks.max(1));
    for _ in 0..ticks {
        session.tick()?;
    }

    let summary = EpisodeSummary::from_session(&session, seed);

    // Output based on format
    match format {
        OutputFormat::Text => {
            print!("{}", format_text(&summary));
        }
        OutputFormat::Json => {
            let json_result = JsonEpisodeResult::from_summary(&summary);
            let json = serde_json::to_string_pretty(&json_result)?;
            println!("{json}");
        }
    }

    Ok(())
}
