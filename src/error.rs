use thiserror::Error;

use crate::core::config::ConfigError;
use crate::core::session::SessionError;

/// Top-level failure of the application. Anything that reaches `main` as an
/// `AppError` ends the process with a non-zero exit code.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("terminal I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("session error: {0}")]
    Session(#[from] SessionError),
}
