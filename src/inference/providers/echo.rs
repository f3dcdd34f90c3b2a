//! Offline provider that streams the latest user message back.
//!
//! Handy for trying the interface without credentials, and for exercising
//! the streaming path in tests without a network.

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use tokio::sync::mpsc::Sender;

use crate::core::message::MessageType;
use crate::inference::{CompletionProvider, CompletionRequest, ProviderError, StreamChunk};

pub struct EchoProvider {
    delay: Duration,
}

impl EchoProvider {
    /// `delay` is slept between words to imitate token streaming.
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for EchoProvider {
    fn default() -> Self {
        Self::new(Duration::from_millis(40))
    }
}

#[async_trait]
impl CompletionProvider for EchoProvider {
    fn name(&self) -> &str {
        "echo"
    }

    async fn stream_completion(
        &self,
        request: CompletionRequest<'_>,
        sender: Sender<StreamChunk>,
    ) -> Result<(), ProviderError> {
        let prompt = request
            .messages
            .iter()
            .rev()
            .find(|msg| msg.kind == MessageType::User)
            .map(|msg| msg.text.as_str())
            .unwrap_or_default();

        debug!("Echoing {} bytes", prompt.len());

        for word in prompt.split_inclusive(char::is_whitespace) {
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            sender
                .send(StreamChunk::Content(word.to_string()))
                .await
                .map_err(|_| ProviderError::ChannelClosed)?;
        }

        sender
            .send(StreamChunk::Completed)
            .await
            .map_err(|_| ProviderError::ChannelClosed)
    }
}
