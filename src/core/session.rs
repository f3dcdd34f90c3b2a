//! # Assistant Session
//!
//! The conversation the screen talks to. The UI only sees it through the
//! [`ChatSession`] trait: it can read the transcript and the running flag,
//! and push user messages into the input sink.
//!
//! ```text
//!  UI thread                     tokio task
//!  ─────────                     ──────────
//!  send(user msg) ──unbounded──▶ assistant loop ──▶ provider.stream_completion
//!       │                              │
//!       ▼                              ▼ (per chunk)
//!  Arc<Mutex<Transcript>> ◀──── append to reply, then notify()
//! ```
//!
//! `notify` is how new output reaches the UI: the host turns it into a
//! notification event on the same queue the screen drains.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::{debug, info, warn};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::core::message::{Message, MessageType};
use crate::inference::{CompletionProvider, CompletionRequest, StreamChunk};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    /// The assistant task is gone; submitted input can no longer be delivered.
    #[error("assistant input channel is closed")]
    InputClosed,
}

/// Read access to the conversation plus the input sink.
pub trait ChatSession {
    fn has_messages(&self) -> bool;
    fn is_running(&self) -> bool;
    /// Snapshot of the transcript in arrival order.
    fn messages(&self) -> Vec<Message>;
    /// Hands a user message to the assistant. Never drops: either the
    /// message is queued or the sink is reported closed.
    fn send(&self, message: Message) -> Result<(), SessionError>;
}

#[derive(Debug, Default)]
struct Transcript {
    running: bool,
    messages: Vec<Message>,
}

impl Transcript {
    /// Appends streamed text to the trailing assistant reply, starting one if needed.
    fn append_reply(&mut self, text: &str) {
        if let Some(last) = self.messages.last_mut()
            && last.kind == MessageType::Assistant
        {
            last.text.push_str(text);
            return;
        }
        self.messages.push(Message::assistant(text));
    }
}

/// Model settings used for every request of a session.
#[derive(Debug, Clone)]
pub struct AssistantSettings {
    pub model: String,
    pub system_prompt: String,
}

/// Cloneable handle to a running assistant session.
#[derive(Clone)]
pub struct Session {
    transcript: Arc<Mutex<Transcript>>,
    input: mpsc::UnboundedSender<Message>,
}

impl Session {
    /// Spawns the assistant task on the current tokio runtime.
    ///
    /// `notify` is called after every transcript change made by the task.
    pub fn spawn<F>(
        provider: Arc<dyn CompletionProvider>,
        settings: AssistantSettings,
        notify: F,
    ) -> (Self, JoinHandle<()>)
    where
        F: Fn() + Send + Sync + 'static,
    {
        let transcript = Arc::new(Mutex::new(Transcript::default()));
        let (input, input_rx) = mpsc::unbounded_channel();

        info!(
            "Starting assistant session (provider={}, model={})",
            provider.name(),
            settings.model
        );
        let handle = tokio::spawn(run_assistant(
            provider,
            settings,
            input_rx,
            transcript.clone(),
            notify,
        ));

        (Self { transcript, input }, handle)
    }

    fn lock(&self) -> MutexGuard<'_, Transcript> {
        lock(&self.transcript)
    }
}

fn lock(transcript: &Mutex<Transcript>) -> MutexGuard<'_, Transcript> {
    transcript.lock().unwrap_or_else(PoisonError::into_inner)
}

impl ChatSession for Session {
    fn has_messages(&self) -> bool {
        !self.lock().messages.is_empty()
    }

    fn is_running(&self) -> bool {
        self.lock().running
    }

    fn messages(&self) -> Vec<Message> {
        self.lock().messages.clone()
    }

    fn send(&self, message: Message) -> Result<(), SessionError> {
        // Delivered and recorded under one lock: the task cannot snapshot the
        // history before the message is in it, and a second submit in the
        // same frame already sees the session busy.
        let mut transcript = self.lock();
        if self.input.send(message.clone()).is_err() {
            warn!("User message could not be delivered: assistant task has stopped");
            return Err(SessionError::InputClosed);
        }
        transcript.messages.push(message);
        transcript.running = true;
        Ok(())
    }
}

async fn run_assistant<F>(
    provider: Arc<dyn CompletionProvider>,
    settings: AssistantSettings,
    mut input_rx: mpsc::UnboundedReceiver<Message>,
    transcript: Arc<Mutex<Transcript>>,
    notify: F,
) where
    F: Fn() + Send + Sync + 'static,
{
    while let Some(message) = input_rx.recv().await {
        debug!(
            "Assistant received user message ({} bytes)",
            message.text.len()
        );
        notify();

        let history = lock(&transcript).messages.clone();
        let (chunk_tx, mut chunk_rx) = mpsc::channel::<StreamChunk>(100);

        let request = CompletionRequest {
            messages: &history,
            model: &settings.model,
            system_prompt: &settings.system_prompt,
        };

        let forward = async {
            let mut count = 0usize;
            while let Some(chunk) = chunk_rx.recv().await {
                match chunk {
                    StreamChunk::Content(text) => {
                        count += 1;
                        lock(&transcript).append_reply(&text);
                        notify();
                    }
                    StreamChunk::Completed => debug!("Provider reported completion"),
                }
            }
            count
        };

        let (result, count) = tokio::join!(provider.stream_completion(request, chunk_tx), forward);

        match result {
            Ok(()) => info!("Assistant reply finished: {} chunks", count),
            Err(e) => {
                warn!("Assistant request failed after {} chunks: {}", count, e);
                let mut guard = lock(&transcript);
                let replied = guard
                    .messages
                    .last()
                    .is_some_and(|m| m.kind == MessageType::Assistant && !m.text.is_empty());
                let prefix = if replied { "\n" } else { "" };
                guard.append_reply(&format!("{prefix}[Error: {e}]"));
            }
        }

        lock(&transcript).running = false;
        notify();
    }

    info!("Assistant input closed, session task exiting");
}
