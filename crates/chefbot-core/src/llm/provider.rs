//! LlmProvider trait definition.
//!
//! This is the core abstraction that all chat backends implement. Streaming
//! is the only call the turn engine makes, so the trait is object-safe and
//! providers are shared as `Arc<dyn LlmProvider>`.

use std::pin::Pin;

use futures_util::Stream;

use chefbot_types::llm::{CompletionRequest, LlmError, StreamEvent};

/// Boxed stream of chat events, as returned by [`LlmProvider::stream`].
pub type ChatStream = Pin<Box<dyn Stream<Item = Result<StreamEvent, LlmError>> + Send + 'static>>;

/// Trait for chat provider backends (OpenRouter, OpenAI, test fakes).
///
/// Implementations live in chefbot-infra (e.g., `OpenAiCompatibleProvider`).
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (e.g., "openrouter").
    fn name(&self) -> &str;

    /// Default model identifier used when a request leaves `model` empty.
    fn model(&self) -> &str;

    /// Send a streaming completion request. Returns a lazy stream of events.
    ///
    /// Connection errors surface as the first item of the stream rather than
    /// as a separate result, so callers handle every failure in one place.
    fn stream(&self, request: CompletionRequest) -> ChatStream;
}
