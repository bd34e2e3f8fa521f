//! `ballgen generate`: one full run of the pipeline.

use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::Instrument;

use ballgen_core::catalog::random_request;
use ballgen_core::pipeline::{DeployStatus, PublishOutcome, RunOptions};
use ballgen_observe::genai_attrs::{
    BALLGEN_CONTENT_KIND, BALLGEN_CONTENT_TOPIC, BALLGEN_IMAGE_PROVIDER, GEN_AI_OPERATION_NAME,
    GEN_AI_PROVIDER_NAME, GEN_AI_REQUEST_MAX_TOKENS, GEN_AI_REQUEST_MODEL, GEN_AI_USAGE_INPUT_TOKENS,
    GEN_AI_USAGE_OUTPUT_TOKENS, OP_GENERATE_CONTENT,
};
use ballgen_types::content::ContentRequest;
use ballgen_types::llm::Usage;

use super::GenerateArgs;
use crate::state::AppState;

/// Build the request from flags; missing topic and category are drawn at random.
pub fn build_request(args: &GenerateArgs) -> ContentRequest {
    let mut request = random_request(args.kind, &mut rand::thread_rng());
    if let Some(topic) = args.topic.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        request.topic = topic.to_string();
    }
    if let Some(category) = args.category.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
        request.category = Some(category.to_string());
    }
    request
}

/// Span for one run; the usage fields are filled by [`record_usage`].
fn generate_span(state: &AppState, request: &ContentRequest) -> tracing::Span {
    tracing::info_span!(
        "generate",
        { GEN_AI_OPERATION_NAME } = OP_GENERATE_CONTENT,
        { GEN_AI_PROVIDER_NAME } = %state.config.text.provider,
        { GEN_AI_REQUEST_MODEL } = state.config.text.model(),
        { GEN_AI_REQUEST_MAX_TOKENS } = state.config.text.max_tokens,
        { GEN_AI_USAGE_INPUT_TOKENS } = tracing::field::Empty,
        { GEN_AI_USAGE_OUTPUT_TOKENS } = tracing::field::Empty,
        { BALLGEN_CONTENT_KIND } = %request.kind,
        { BALLGEN_CONTENT_TOPIC } = %request.topic,
        { BALLGEN_IMAGE_PROVIDER } = %state.config.image.provider,
    )
}

fn record_usage(span: &tracing::Span, usage: &Usage) {
    span.record(GEN_AI_USAGE_INPUT_TOKENS, usage.input_tokens);
    span.record(GEN_AI_USAGE_OUTPUT_TOKENS, usage.output_tokens);
}

pub async fn generate(state: &AppState, args: GenerateArgs, json: bool, quiet: bool) -> anyhow::Result<()> {
    let request = build_request(&args);
    let options = RunOptions {
        generate_images: !args.no_images,
        deploy: state.config.deploy.enabled && !args.no_deploy,
        draft: args.draft || state.config.content.draft,
    };
    let pipeline = state.pipeline(options.generate_images)?;

    let span = generate_span(state, &request);

    let spinner = if json || quiet {
        ProgressBar::hidden()
    } else {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")?);
        spinner.enable_steady_tick(Duration::from_millis(80));
        spinner
    };
    spinner.set_message(format!("Writing a {} about a {}...", request.kind, request.topic));

    let result = pipeline.run(&request, options).instrument(span.clone()).await;
    spinner.finish_and_clear();
    let outcome = result?;
    record_usage(&span, &outcome.usage);

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else if !quiet {
        print_outcome(&outcome);
    } else if let DeployStatus::Failed(ref message) = outcome.deploy {
        eprintln!("warning: deploy failed: {message}");
    }
    Ok(())
}

fn print_outcome(outcome: &PublishOutcome) {
    println!();
    println!("  {} {}", style("✓").green().bold(), style(&outcome.title).bold());
    println!("  {} {}", style("Path:").dim(), outcome.path.display());
    println!("  {} {}", style("Parsed from:").dim(), outcome.source);
    let image_count = [&outcome.images.main, &outcome.images.scene]
        .iter()
        .filter(|i| i.is_some())
        .count();
    println!("  {} {image_count}", style("Images:").dim());
    match &outcome.deploy {
        DeployStatus::Skipped => println!("  {} skipped", style("Deploy:").dim()),
        DeployStatus::Succeeded => println!("  {} {}", style("Deploy:").dim(), style("done").green()),
        DeployStatus::Failed(message) => {
            println!("  {} {}", style("Deploy:").dim(), style("failed").yellow());
            eprintln!("  {} {message}", style("warning:").yellow().bold());
        }
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use ballgen_core::catalog::{BALL_TYPES, NEWS_CATEGORIES};
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    use ballgen_types::config::GlobalConfig;
    use ballgen_types::content::ContentKind;
    use tracing_subscriber::fmt::format::FmtSpan;

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn args(kind: ContentKind) -> GenerateArgs {
        GenerateArgs {
            kind,
            topic: None,
            category: None,
            no_images: false,
            no_deploy: false,
            draft: false,
        }
    }

    #[test]
    fn test_random_article_request_has_category() {
        let request = build_request(&args(ContentKind::Article));
        assert!(BALL_TYPES.contains(&request.topic.as_str()));
        let category = request.category.unwrap();
        assert!(NEWS_CATEGORIES.contains(&category.as_str()));
    }

    #[test]
    fn test_flags_override_random_picks() {
        let mut args = args(ContentKind::Article);
        args.topic = Some(" golf ball ".to_string());
        args.category = Some("sports".to_string());
        let request = build_request(&args);
        assert_eq!(request.topic, "golf ball");
        assert_eq!(request.category.as_deref(), Some("sports"));
    }

    #[test]
    fn test_story_request_without_category() {
        let request = build_request(&args(ContentKind::Story));
        assert_eq!(request.kind, ContentKind::Story);
        assert!(request.category.is_none());
    }

    #[test]
    fn test_span_records_token_usage_under_genai_names() {
        let buf = SharedBuf::default();
        let writer = buf.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_span_events(FmtSpan::CLOSE)
            .finish();

        let state = AppState::new(GlobalConfig::default(), None);
        let request = ContentRequest::new(ContentKind::Story, "beach ball");
        tracing::subscriber::with_default(subscriber, || {
            let span = generate_span(&state, &request);
            record_usage(
                &span,
                &Usage {
                    input_tokens: 42,
                    output_tokens: 17,
                },
            );
        });

        let output = String::from_utf8(buf.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("gen_ai.request.max_tokens=1024"), "{output}");
        assert!(output.contains("gen_ai.usage.input_tokens=42"), "{output}");
        assert!(output.contains("gen_ai.usage.output_tokens=17"), "{output}");
    }
}
