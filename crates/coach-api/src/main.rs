//! Interview coach CLI entry point.
//!
//! Binary name: `coach`
//!
//! Parses CLI arguments, initializes tracing and configuration, then
//! dispatches to the command handler.

mod cli;
mod state;

use clap::Parser;
use clap_complete::generate;

use coach_observe::tracing_setup::{TracingOptions, init_tracing, shutdown_tracing};

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Shell completions don't need tracing or config
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "coach", &mut std::io::stdout());
        return Ok(());
    }

    let options = TracingOptions::from_verbosity(cli.verbose, cli.quiet)
        .with_json(cli.json)
        .with_otel(cli.otel);
    init_tracing(&options).map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let result = run(cli).await;
    shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let state = AppState::init(cli.config).await?;

    match cli.command {
        Commands::Start(args) => cli::chat::loop_runner::run_interview_loop(&state, args).await?,
        Commands::Rounds => cli::rounds::list_rounds(cli.json)?,
        Commands::Config => cli::config::show_config(&state, cli.json)?,
        Commands::Completions { .. } => unreachable!("handled above"),
    }

    Ok(())
}
