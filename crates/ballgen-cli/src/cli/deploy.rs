//! `ballgen deploy`: build and push the site on its own.

use std::time::Duration;

use chrono::Local;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::Instrument;

use ballgen_core::publish::{Deployer, commit_message};
use ballgen_observe::genai_attrs::{GEN_AI_OPERATION_NAME, OP_DEPLOY};

use crate::state::AppState;

pub async fn deploy(state: &AppState, json: bool, quiet: bool) -> anyhow::Result<()> {
    let span = tracing::info_span!("deploy_command", { GEN_AI_OPERATION_NAME } = OP_DEPLOY);
    let deployer = state.deployer();
    let message = commit_message(
        &state.config.deploy.commit_message_prefix,
        Local::now().naive_local(),
    );

    let spinner = if json || quiet {
        ProgressBar::hidden()
    } else {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")?);
        spinner.enable_steady_tick(Duration::from_millis(80));
        spinner
    };
    spinner.set_message(format!("Deploying {}...", state.config.content.site_root));

    let result = deployer.deploy(&message).instrument(span).await;
    spinner.finish_and_clear();

    if json {
        let status = match &result {
            Ok(()) => serde_json::json!({ "status": "succeeded", "commit_message": message }),
            Err(e) => serde_json::json!({ "status": "failed", "message": e.to_string() }),
        };
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else if !quiet {
        match &result {
            Ok(()) => println!("  {} Site deployed", style("✓").green().bold()),
            Err(e) => eprintln!("  {} {e}", style("✗").red().bold()),
        }
    }

    result.map_err(Into::into)
}
