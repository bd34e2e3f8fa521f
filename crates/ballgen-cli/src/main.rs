//! ballgen CLI entry point.
//!
//! Binary name: `ballgen`
//!
//! Parses CLI arguments, sets up tracing, loads configuration, then
//! dispatches to the command handler.

mod cli;
mod state;

use clap::Parser;
use clap_complete::generate;

use ballgen_observe::tracing_setup::{default_filter, init_tracing, shutdown_tracing};

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Shell completions don't need tracing or config
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "ballgen", &mut std::io::stdout());
        return Ok(());
    }

    if let Err(e) = init_tracing(default_filter(cli.quiet, cli.verbose), cli.otel) {
        eprintln!("Warning: failed to initialize tracing: {e}");
    }

    let result = run(cli).await;
    shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let state = AppState::init(cli.config.as_deref(), &cli.overrides, cli.openai_api_key).await?;

    match cli.command {
        Commands::Generate(args) => cli::generate::generate(&state, args, cli.json, cli.quiet).await,
        Commands::Normalize(args) => cli::normalize::normalize(&state, args).await,
        Commands::Deploy => cli::deploy::deploy(&state, cli.json, cli.quiet).await,
        Commands::Config => cli::config::show_config(&state, cli.json),
        Commands::Completions { .. } => Ok(()),
    }
}
