pub mod provider;
pub mod providers;

pub use provider::{CompletionProvider, CompletionRequest, ProviderError, StreamChunk};
pub use providers::{EchoProvider, ResponsesProvider};
