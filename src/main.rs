//! Collect CLI - Command-line interface for running and viewing Collect sessions.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]

mod cli;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

/// Collect - A deterministic grid-world resource game
#[derive(Parser, Debug)]
#[command(name = "collect")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a single headless session and print the result
    Run {
        /// Field width in cells
        #[arg(long, default_value = "200")]
        width: i32,

        /// Field height in cells
        #[arg(long, default_value = "200")]
        height: i32,

        /// Number of players
        #[arg(short, long, default_value = "6")]
        players: usize,

        /// Number of resources kept on the field
        #[arg(short, long, default_value = "15")]
        resources: usize,

        /// Ticks to simulate (default: one 3-minute round)
        #[arg(short, long, default_value = "5400")]
        ticks: u64,

        /// Random seed (default: random)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Policy driving the AI players
        #[arg(long, default_value = "epsilon")]
        policy: cli::PolicyKind,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,

        /// Suppress the startup banner
        #[arg(short, long)]
        quiet: bool,
    },

    /// Run mass parallel episodes and aggregate statistics
    Episodes {
        /// Number of episodes to run
        #[arg(short, long, default_value = "100")]
        episodes: u64,

        /// Ticks per episode
        #[arg(short, long, default_value = "5400")]
        ticks: u64,

        /// Field width in cells
        #[arg(long, default_value = "200")]
        width: i32,

        /// Field height in cells
        #[arg(long, default_value = "200")]
        height: i32,

        /// Number of players
        #[arg(short, long, default_value = "6")]
        players: usize,

        /// Number of resources kept on the field
        #[arg(short, long, default_value = "15")]
        resources: usize,

        /// Starting seed (increments for each episode)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Parallel threads (default: CPU count)
        #[arg(short = 'j', long)]
        threads: Option<usize>,

        /// Policy driving the AI players
        #[arg(long, default_value = "epsilon")]
        policy: cli::PolicyKind,

        /// Output format: text, json, or csv
        #[arg(short, long, default_value = "text")]
        format: cli::BatchFormat,

        /// Show progress bar
        #[arg(long)]
        progress: bool,
    },

    /// Interactive TUI to watch a session in real-time
    Watch {
        /// Field width in cells
        #[arg(long, default_value = "200")]
        width: i32,

        /// Field height in cells
        #[arg(long, default_value = "200")]
        height: i32,

        /// Number of players
        #[arg(short, long, default_value = "6")]
        players: usize,

        /// Number of resources kept on the field
        #[arg(short, long, default_value = "15")]
        resources: usize,

        /// Random seed
        #[arg(short, long)]
        seed: Option<u64>,

        /// Policy driving the AI players
        #[arg(long, default_value = "epsilon")]
        policy: cli::PolicyKind,

        /// Tick delay in milliseconds (default: 30 ticks/sec)
        #[arg(long, default_value = "33")]
        speed: u64,
    },
}

fn main() -> ExitCode {
    let args = Args::parse();

    let result = match args.command {
        Commands::Run {
            width,
            height,
            players,
            resources,
            ticks,
            seed,
            policy,
            format,
            quiet,
        } => cli::run::execute(
            width, height, players, resources, ticks, seed, policy, format, quiet,
        ),

        Commands::Episodes {
            episodes,
            ticks,
            width,
            height,
            players,
            resources,
            seed,
            threads,
            policy,
            format,
            progress,
        } => cli::episodes::execute(
            episodes, ticks, width, height, players, resources, seed, threads, policy, format,
            progress,
        ),

        Commands::Watch {
            width,
            height,
            players,
            resources,
            seed,
            policy,
            speed,
        } => cli::watch::execute(width, height, players, resources, seed, policy, speed),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
