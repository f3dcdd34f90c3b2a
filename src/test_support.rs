//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::cell::RefCell;
use std::rc::Rc;

use async_trait::async_trait;
use ratatui::buffer::Buffer;
use tokio::sync::mpsc::Sender;
use unicode_width::UnicodeWidthStr;

use crate::core::message::Message;
use crate::core::session::{ChatSession, SessionError};
use crate::inference::{CompletionProvider, CompletionRequest, ProviderError, StreamChunk};

/// A no-op provider for tests that don't need real API calls.
pub struct NoopProvider;

#[async_trait]
impl CompletionProvider for NoopProvider {
    fn name(&self) -> &str {
        "noop"
    }

    async fn stream_completion(
        &self,
        _request: CompletionRequest<'_>,
        _sender: Sender<StreamChunk>,
    ) -> Result<(), ProviderError> {
        Ok(())
    }
}

/// A provider whose every request fails before producing output.
pub struct FailingProvider;

#[async_trait]
impl CompletionProvider for FailingProvider {
    fn name(&self) -> &str {
        "failing"
    }

    async fn stream_completion(
        &self,
        _request: CompletionRequest<'_>,
        _sender: Sender<StreamChunk>,
    ) -> Result<(), ProviderError> {
        Err(ProviderError::Network("connection refused".to_string()))
    }
}

#[derive(Default)]
struct FakeState {
    running: bool,
    closed: bool,
    messages: Vec<Message>,
    sent: Vec<Message>,
}

/// Scripted session for screen tests. Clones share state, so a test can keep
/// one handle while the screen owns another.
#[derive(Clone, Default)]
pub struct FakeSession {
    state: Rc<RefCell<FakeState>>,
}

impl FakeSession {
    pub fn set_running(&self, running: bool) {
        self.state.borrow_mut().running = running;
    }

    /// Appends a message as if the assistant had produced it.
    pub fn push(&self, message: Message) {
        self.state.borrow_mut().messages.push(message);
    }

    /// Makes every later `send` fail with [`SessionError::InputClosed`].
    pub fn close(&self) {
        self.state.borrow_mut().closed = true;
    }

    /// Messages handed over through `send`, in order.
    pub fn sent(&self) -> Vec<Message> {
        self.state.borrow().sent.clone()
    }
}

impl ChatSession for FakeSession {
    fn has_messages(&self) -> bool {
        !self.state.borrow().messages.is_empty()
    }

    fn is_running(&self) -> bool {
        self.state.borrow().running
    }

    fn messages(&self) -> Vec<Message> {
        self.state.borrow().messages.clone()
    }

    fn send(&self, message: Message) -> Result<(), SessionError> {
        let mut state = self.state.borrow_mut();
        if state.closed {
            return Err(SessionError::InputClosed);
        }
        state.messages.push(message.clone());
        state.sent.push(message);
        Ok(())
    }
}

/// Buffer contents as one string per row, trailing blanks trimmed.
///
/// Cells covered by a double-width glyph are skipped so rows read as the
/// text that was drawn.
pub fn buffer_rows(buffer: &Buffer) -> Vec<String> {
    let area = buffer.area;
    (area.top()..area.bottom())
        .map(|y| {
            let mut row = String::new();
            let mut skip = 0;
            for x in area.left()..area.right() {
                if skip > 0 {
                    skip -= 1;
                    continue;
                }
                let symbol = buffer[(x, y)].symbol();
                skip = symbol.width().saturating_sub(1);
                row.push_str(symbol);
            }
            row.trim_end().to_string()
        })
        .collect()
}
