//! # TUI Components
//!
//! The three regions of the chat screen, top to bottom:
//!
//! - `Viewport`: scrollable transcript (stateful: scroll offset)
//! - `Composer`: multi-line input box (stateful: buffer, cursor, focus)
//! - `Footer`: one-line status bar (props from the screen each cycle)
//!
//! Each file holds the component's state, event handling, rendering and
//! tests. Components never read the session directly; the screen passes in
//! what they need.
//!
//! ```text
//! components/
//! ├── mod.rs        (this file)
//! ├── viewport.rs
//! ├── composer/     (buffer editing, visual rows, cursor)
//! └── footer.rs
//! ```

pub mod composer;
mod footer;
mod viewport;

pub use composer::{Composer, ComposerEvent};
pub use footer::Footer;
pub use viewport::Viewport;
