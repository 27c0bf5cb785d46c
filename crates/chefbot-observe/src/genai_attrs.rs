//! OpenTelemetry GenAI Semantic Convention attribute names.
//!
//! Span fields in `tracing` macros must be written inline, so these are used
//! as the names passed to `Span::record` and as the attribute values for
//! operation and provider names.
//!
//! Span naming convention: `"gen_ai.{operation}"` (e.g. `"gen_ai.chat"`).

// --- Required attributes ---

/// The name of the operation being performed (e.g., "chat").
pub const GEN_AI_OPERATION_NAME: &str = "gen_ai.operation.name";

/// The name of the GenAI provider (e.g., "openrouter").
pub const GEN_AI_PROVIDER_NAME: &str = "gen_ai.provider.name";

// --- Recommended attributes ---


/// The number of input tokens consumed.
pub const GEN_AI_USAGE_INPUT_TOKENS: &str = "gen_ai.usage.input_tokens";

/// The number of output tokens generated.
pub const GEN_AI_USAGE_OUTPUT_TOKENS: &str = "gen_ai.usage.output_tokens";

/// The finish reasons for the response (e.g., "end_turn", "max_tokens").
pub const GEN_AI_RESPONSE_FINISH_REASONS: &str = "gen_ai.response.finish_reasons";

// --- Operation name values ---

/// Streaming chat completion.
pub const OP_CHAT: &str = "chat";

/// Text-to-image generation.
pub const OP_GENERATE_IMAGE: &str = "generate_image";

// --- Provider name values ---

pub const PROVIDER_OPENROUTER: &str = "openrouter";

pub const PROVIDER_STABILITY: &str = "stability";
