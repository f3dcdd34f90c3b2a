//! Streaming client for the OpenAI-style Responses API.
//!
//! Works against any server that speaks `/responses` with SSE streaming
//! (OpenRouter, LM Studio, OpenAI). The API key is optional so local servers
//! without auth can be used.
//!
//! The event type may arrive either on an `event:` line or inside the JSON
//! `type` field; both are accepted.

use async_trait::async_trait;
use futures::StreamExt;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::Sender;

use crate::core::message::{Message, MessageType};
use crate::inference::{CompletionProvider, CompletionRequest, ProviderError, StreamChunk};

// ============================================================================
// Responses API Types
// ============================================================================

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
enum Role {
    System,
    User,
    Assistant,
}

#[derive(Serialize, Debug, Clone)]
struct InputMessage {
    role: Role,
    content: String,
}

#[derive(Serialize, Debug)]
struct ResponsesRequest {
    model: String,
    input: Vec<InputMessage>,
    stream: bool,
}

#[derive(Deserialize, Debug)]
struct SseEvent {
    #[serde(rename = "type", default)]
    event_type: String,
    #[serde(default)]
    delta: String,
    #[serde(default)]
    message: String,
}

/// Decoded meaning of one `data:` payload.
#[derive(Debug, PartialEq)]
enum SseOutcome {
    Content(String),
    Completed,
    Failed(String),
    Ignored,
}

// ============================================================================
// Translation Layer
// ============================================================================

/// Converts the transcript into Responses API input, system prompt first.
///
/// Tool entries are forwarded as system text so the model still sees them.
fn messages_to_input(system_prompt: &str, messages: &[Message]) -> Vec<InputMessage> {
    let mut input = Vec::with_capacity(messages.len() + 1);
    if !system_prompt.is_empty() {
        input.push(InputMessage {
            role: Role::System,
            content: system_prompt.to_string(),
        });
    }
    input.extend(messages.iter().map(|msg| InputMessage {
        role: match msg.kind {
            MessageType::User => Role::User,
            MessageType::Assistant => Role::Assistant,
            MessageType::System | MessageType::Tool => Role::System,
        },
        content: msg.text.clone(),
    }));
    input
}

/// Incremental SSE line splitter. Network chunks can cut lines anywhere,
/// including inside a multi-byte character, so raw bytes are buffered and
/// only complete lines are decoded as UTF-8.
#[derive(Default)]
struct SseDecoder {
    buffer: Vec<u8>,
    event_type: Option<String>,
}

impl SseDecoder {
    fn push(&mut self, chunk: &[u8]) -> Vec<SseOutcome> {
        self.buffer.extend_from_slice(chunk);
        let mut outcomes = Vec::new();

        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let raw: Vec<u8> = self.buffer.drain(..=pos).collect();
            let Ok(line) = std::str::from_utf8(&raw) else {
                warn!("Skipping SSE line that is not valid UTF-8 ({} bytes)", raw.len());
                continue;
            };
            let line = line.trim();

            if line.is_empty() {
                self.event_type = None;
                continue;
            }
            debug!("SSE line: {}", line);

            if let Some(event_type) = line.strip_prefix("event:") {
                self.event_type = Some(event_type.trim().to_string());
                continue;
            }

            if let Some(data) = line.strip_prefix("data:") {
                let data = data.trim();
                if data == "[DONE]" {
                    outcomes.push(SseOutcome::Completed);
                    continue;
                }
                outcomes.push(self.decode(data));
                self.event_type = None;
            }
        }

        outcomes
    }

    fn decode(&self, data: &str) -> SseOutcome {
        let event = match serde_json::from_str::<SseEvent>(data) {
            Ok(event) => event,
            Err(e) => {
                warn!("Skipping malformed SSE payload ({}): {}", e, data);
                return SseOutcome::Ignored;
            }
        };
        let event_type = self
            .event_type
            .clone()
            .unwrap_or_else(|| event.event_type.clone());

        match event_type.as_str() {
            "response.output_text.delta" if !event.delta.is_empty() => {
                SseOutcome::Content(event.delta)
            }
            "response.completed" => SseOutcome::Completed,
            "error" | "response.failed" => {
                let message = if event.message.is_empty() {
                    data.to_string()
                } else {
                    event.message
                };
                SseOutcome::Failed(message)
            }
            "response.reasoning_text.delta" | "response.reasoning_summary_text.delta" => {
                debug!("Dropping reasoning delta ({} bytes)", event.delta.len());
                SseOutcome::Ignored
            }
            other => {
                debug!("Unhandled SSE event type '{}'", other);
                SseOutcome::Ignored
            }
        }
    }
}

// ============================================================================
// Provider Implementation
// ============================================================================

/// Responses API provider (OpenRouter, LM Studio and compatible servers).
pub struct ResponsesProvider {
    api_key: Option<String>,
    base_url: String,
    client: reqwest::Client,
}

impl ResponsesProvider {
    pub fn new(api_key: Option<String>, base_url: String) -> Self {
        Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    async fn send_request(
        &self,
        request: &ResponsesRequest,
    ) -> Result<reqwest::Response, ProviderError> {
        let mut builder = self
            .client
            .post(format!("{}/responses", self.base_url))
            .json(request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        debug!("Responses API status: {}", response.status());

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let err_body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            warn!("Responses API error: {} - {}", status, err_body);
            return Err(ProviderError::Api {
                status,
                message: err_body,
            });
        }

        Ok(response)
    }
}

#[async_trait]
impl CompletionProvider for ResponsesProvider {
    fn name(&self) -> &str {
        "responses"
    }

    async fn stream_completion(
        &self,
        request: CompletionRequest<'_>,
        sender: Sender<StreamChunk>,
    ) -> Result<(), ProviderError> {
        if request.model.is_empty() {
            return Err(ProviderError::Config("no model configured".to_string()));
        }

        let body = ResponsesRequest {
            model: request.model.to_string(),
            input: messages_to_input(request.system_prompt, request.messages),
            stream: true,
        };

        info!(
            "Responses API request: model={}, input_count={}",
            body.model,
            body.input.len()
        );

        let response = self.send_request(&body).await?;
        let status = response.status().as_u16();

        let mut stream = response.bytes_stream();
        let mut decoder = SseDecoder::default();
        let mut chunk_count = 0usize;
        let mut total_content_len = 0usize;

        while let Some(bytes) = stream.next().await {
            let bytes = bytes.map_err(|e| ProviderError::Network(e.to_string()))?;
            for outcome in decoder.push(&bytes) {
                match outcome {
                    SseOutcome::Content(text) => {
                        chunk_count += 1;
                        total_content_len += text.len();
                        if sender.send(StreamChunk::Content(text)).await.is_err() {
                            warn!("Content chunk send failed: receiver dropped");
                            return Err(ProviderError::ChannelClosed);
                        }
                    }
                    SseOutcome::Completed => {
                        info!(
                            "Stream complete: {} chunks, {} content bytes",
                            chunk_count, total_content_len
                        );
                        sender
                            .send(StreamChunk::Completed)
                            .await
                            .map_err(|_| ProviderError::ChannelClosed)?;
                        return Ok(());
                    }
                    SseOutcome::Failed(message) => {
                        warn!("Responses API stream failed: {}", message);
                        return Err(ProviderError::Api { status, message });
                    }
                    SseOutcome::Ignored => {}
                }
            }
        }

        info!(
            "Stream ended without completion event: {} chunks, {} content bytes",
            chunk_count, total_content_len
        );
        sender
            .send(StreamChunk::Completed)
            .await
            .map_err(|_| ProviderError::ChannelClosed)
    }
}
