//! aicli library exports for testing

use clap::ValueEnum;

pub mod core;
pub mod error;
pub mod inference;
pub mod tui;

#[cfg(test)]
pub mod test_support;

/// Completion backend selectable on the command line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Provider {
    /// Streaming Responses API over HTTP.
    #[default]
    Responses,
    /// Offline provider that echoes the last user message.
    Echo,
}

impl Provider {
    /// Name used in config files and environment variables.
    pub fn as_str(self) -> &'static str {
        match self {
            Provider::Responses => "responses",
            Provider::Echo => "echo",
        }
    }
}
