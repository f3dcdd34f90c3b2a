use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc::Sender;

use crate::core::message::Message;

/// Errors that can occur during provider operations.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Provider misconfigured (missing API key, bad URL).
    #[error("config error: {0}")]
    Config(String),
    /// Network-level failure (timeout, DNS, connection refused).
    #[error("network error: {0}")]
    Network(String),
    /// API returned an error response.
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },
    /// Failed to parse the provider's response.
    #[error("parse error: {0}")]
    Parse(String),
    /// The chunk receiver was dropped before the stream finished.
    #[error("channel closed")]
    ChannelClosed,
}

/// A piece of streamed model output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamChunk {
    /// Visible assistant text, appended to the current reply.
    Content(String),
    /// The provider finished the response.
    Completed,
}

/// Everything a provider needs to fulfill a completion request.
pub struct CompletionRequest<'a> {
    /// Conversation so far, oldest first. Does not include the system prompt.
    pub messages: &'a [Message],
    pub model: &'a str,
    pub system_prompt: &'a str,
}

#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Returns the name of the provider.
    fn name(&self) -> &str;

    /// Streams a completion based on the given request, sending chunks to the provided channel.
    async fn stream_completion(
        &self,
        request: CompletionRequest<'_>,
        sender: Sender<StreamChunk>,
    ) -> Result<(), ProviderError>;
}
