use serde::{Deserialize, Serialize};

/// Who produced a transcript entry.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    System,
    User,
    Assistant,
    Tool,
}

/// A single transcript entry. Entries are append-only: once the session
/// pushes one, only the session itself may grow its text (streaming).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Message {
    #[serde(rename = "type")]
    pub kind: MessageType,
    pub text: String,
}

impl Message {
    pub fn new(kind: MessageType, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    /// Builds the message the composer hands to the session on submit.
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(MessageType::User, text)
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(MessageType::Assistant, text)
    }
}
