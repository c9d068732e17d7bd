//! Command implementations for the wind timeseries viewer CLI.
//!
//! `explore` and `summary` first load the configuration, the case window
//! registry and both source tables; any failure there ends the run before
//! output.

use clap::Subcommand;

pub mod cases;
pub mod explore;
pub mod startup;
pub mod summary;

pub use startup::SourceArgs;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run an interactive session reading one event per stdin line
    Explore {
        #[command(flatten)]
        source: SourceArgs,
    },

    /// Print per-station threshold-crossing frequencies as CSV
    Summary {
        #[command(flatten)]
        source: SourceArgs,
    },

    /// List the configured case windows
    Cases {
        /// Case window CSV (label,start,end); defaults to the embedded registry
        #[arg(long)]
        cases: Option<std::path::PathBuf>,
    },
}

pub async fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Explore { source } => explore::run_explore(&source).await,
        Command::Summary { source } => summary::run_summary(&source).await,
        Command::Cases { cases: path } => cases::run_cases(path.as_deref()),
    }
}
