//! `ballgen normalize`: run a saved model response through the normalizer.

use std::io::Read;
use std::path::Path;

use anyhow::Context;
use serde::Serialize;

use ballgen_core::normalize::Normalizer;
use ballgen_observe::genai_attrs::{BALLGEN_CONTENT_KIND, GEN_AI_OPERATION_NAME, OP_NORMALIZE};
use ballgen_types::content::{ContentRequest, NormalizedContent, ResponseSource};

use super::NormalizeArgs;
use crate::state::AppState;

#[derive(Debug, Serialize)]
struct NormalizeReport {
    source: ResponseSource,
    record: NormalizedContent,
}

async fn read_input(file: Option<&Path>) -> anyhow::Result<String> {
    match file {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut raw = String::new();
            std::io::stdin()
                .read_to_string(&mut raw)
                .context("failed to read stdin")?;
            Ok(raw)
        }
    }
}

/// Normalize `raw` and render the report as pretty JSON.
pub fn normalize_report(normalizer: &Normalizer, raw: &str, request: &ContentRequest) -> anyhow::Result<String> {
    let outcome = normalizer.normalize(raw, request);
    let report = NormalizeReport {
        source: outcome.source,
        record: outcome.content,
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

pub async fn normalize(state: &AppState, args: NormalizeArgs) -> anyhow::Result<()> {
    let raw = read_input(args.file.as_deref()).await?;
    let request = ContentRequest::new(args.kind, args.topic);
    let normalizer = Normalizer::new(state.config.content.title_max_len);

    let report = tracing::info_span!(
        "normalize_command",
        { GEN_AI_OPERATION_NAME } = OP_NORMALIZE,
        { BALLGEN_CONTENT_KIND } = %request.kind,
    )
    .in_scope(|| normalize_report(&normalizer, &raw, &request))?;
    println!("{report}");
    Ok(())
}
