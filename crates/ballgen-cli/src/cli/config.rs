//! `ballgen config`: show the effective configuration.

use anyhow::Context;

use ballgen_infra::config::to_toml;

use crate::state::AppState;

pub fn show_config(state: &AppState, json: bool) -> anyhow::Result<()> {
    let rendered = if json {
        serde_json::to_string_pretty(&state.config)?
    } else {
        to_toml(&state.config).context("failed to render configuration")?
    };
    println!("{rendered}");
    Ok(())
}
