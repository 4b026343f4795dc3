//! The abstraction over streaming completion APIs.
//!
//! A backend takes a server-assembled system prompt plus the normalized
//! conversation and returns text deltas as they arrive. Implementations
//! live in the providers crate; the pipeline only ever sees this trait.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::error::ProviderError;
use crate::message::ChatMessage;

/// Content deltas in arrival order.
///
/// Lazy and single-pass: nothing is pulled from the upstream connection
/// until the receiver is polled, and dropping the receiver aborts the
/// upstream request. The stream ends at upstream completion or at the
/// first error item.
pub type DeltaStream = mpsc::Receiver<std::result::Result<String, ProviderError>>;

/// One streaming completion call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// The model identifier (e.g., "deepseek/deepseek-chat").
    pub model: String,

    /// The assembled instruction message, sent with the `system` role.
    pub system_prompt: String,

    /// The normalized conversation, oldest first.
    pub messages: Vec<ChatMessage>,

    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

fn default_temperature() -> f32 {
    0.7
}

/// The completion-backend trait.
///
/// The pipeline calls `stream_chat()` without knowing which provider is
/// behind it, so tests can substitute a scripted backend.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// A human-readable name for this backend (e.g., "openrouter").
    fn name(&self) -> &str;

    /// Open a streaming completion for the given request.
    ///
    /// Control-only chunks carrying no text are filtered out before they
    /// reach the stream, so every `Ok` item is non-empty.
    async fn stream_chat(
        &self,
        request: CompletionRequest,
    ) -> std::result::Result<DeltaStream, ProviderError>;
}
