//! # Core
//!
//! Everything that is not terminal-specific: the message model, the
//! assistant session the screen talks to, and configuration.
//!
//! ```text
//!   ┌──────────────┐  has_messages / is_running / messages  ┌──────────┐
//!   │  tui::screen │ ──────────────────────────────────────▶│ session  │
//!   │  (UI loop)   │ ─────────── send(user message) ───────▶│ (tokio)  │
//!   └──────────────┘ ◀──────── notification events ─────────└──────────┘
//! ```
//!
//! ## Modules
//!
//! - [`message`]: `Message` and `MessageType`
//! - [`session`]: the `ChatSession` trait and the provider-backed `Session`
//! - [`config`]: TOML config with env and CLI overrides

pub mod config;
pub mod message;
pub mod session;
