//! CLI command definitions for the `coach` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod chat;
pub mod config;
pub mod rounds;
pub mod wizard;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

/// Practice technical interviews with an AI interviewer.
#[derive(Parser)]
#[command(name = "coach", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Export tracing spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    /// Path to the config file (defaults to ~/.coach/config.toml).
    #[arg(long, global = true, env = "COACH_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start a mock interview.
    #[command(alias = "interview")]
    Start(StartArgs),

    /// List interview rounds and what each one covers.
    Rounds,

    /// Show the resolved configuration.
    Config,

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

/// Interview settings. Anything left out is asked for interactively.
#[derive(Args, Debug, Clone, Default)]
pub struct StartArgs {
    /// Target job role (e.g. "Backend Engineer").
    #[arg(long)]
    pub role: Option<String>,

    /// Interview round: screening, coding, system-design, managerial, hr, bar-raiser.
    #[arg(long)]
    pub round: Option<String>,

    /// Experience level: intern, junior, mid, senior, staff.
    #[arg(long)]
    pub level: Option<String>,

    /// Topic to focus questions on (e.g. "React performance").
    #[arg(long)]
    pub focus: Option<String>,

    /// Override the configured model.
    #[arg(long)]
    pub model: Option<String>,
}

impl StartArgs {
    /// Whether every required interview setting was given on the command line.
    pub fn is_complete(&self) -> bool {
        self.role.is_some() && self.round.is_some() && self.level.is_some()
    }

    /// Arguments for a follow-up interview: keep the model, ask for the rest.
    pub fn for_next_interview(&self) -> Self {
        Self {
            model: self.model.clone(),
            ..Self::default()
        }
    }
}
