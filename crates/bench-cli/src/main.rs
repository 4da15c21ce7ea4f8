//! Demonstration driver for `bench-core`.
//!
//! This is intentionally small: a real assembler front-end and a general
//! CLI/driver surface are both out of scope for this repository (see
//! `SPEC_FULL.md`). This binary exists only to exercise the core end to end
//! with a fixed table of hand-assembled snippets.

mod commands;
mod demos;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "insn-bench")]
#[command(about = "micro-architectural instruction-sequence benchmark harness")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register the demo snippet table and run the live dashboard.
    Run {
        /// How long to run before exiting cleanly.
        #[arg(long, default_value = "30")]
        duration_secs: u64,
    },
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run { duration_secs } => {
            commands::run::run(commands::run::RunConfig { duration_secs })
        }
    }
}
