//! OpenTelemetry GenAI Semantic Convention attribute names.
//!
//! Usable as constant field names in `tracing` macros
//! (`info_span!("generate", { GEN_AI_OPERATION_NAME } = OP_GENERATE_CONTENT)`).

// --- Required attributes ---

/// The name of the operation being performed.
pub const GEN_AI_OPERATION_NAME: &str = "gen_ai.operation.name";

/// The name of the GenAI provider (e.g., "ollama").
pub const GEN_AI_PROVIDER_NAME: &str = "gen_ai.provider.name";

// --- Recommended attributes ---

pub const GEN_AI_REQUEST_MODEL: &str = "gen_ai.request.model";
pub const GEN_AI_REQUEST_MAX_TOKENS: &str = "gen_ai.request.max_tokens";
pub const GEN_AI_USAGE_INPUT_TOKENS: &str = "gen_ai.usage.input_tokens";
pub const GEN_AI_USAGE_OUTPUT_TOKENS: &str = "gen_ai.usage.output_tokens";

// --- ballgen-specific attributes ---

/// Story or article.
pub const BALLGEN_CONTENT_KIND: &str = "ballgen.content.kind";

/// The ball type the content is about.
pub const BALLGEN_CONTENT_TOPIC: &str = "ballgen.content.topic";

/// Name of the image backend, when images are enabled.
pub const BALLGEN_IMAGE_PROVIDER: &str = "ballgen.image.provider";

// --- Operation name values ---

/// One full generate-and-publish run.
pub const OP_GENERATE_CONTENT: &str = "generate_content";

/// Offline normalization of a saved model response.
pub const OP_NORMALIZE: &str = "normalize";

/// Site build and push.
pub const OP_DEPLOY: &str = "deploy";
