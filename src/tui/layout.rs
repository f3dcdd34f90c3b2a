//! Shared screen dimensions.
//!
//! Owned by [`ChatScreen`](super::screen::ChatScreen), which is the only
//! writer; regions get it by shared reference when they need the width.

/// Content rows inside the composer border.
pub const COMPOSER_LINES: u16 = 2;
/// Rows the composer occupies on screen: content plus top and bottom border.
pub const COMPOSER_HEIGHT: u16 = COMPOSER_LINES + 2;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LayoutContext {
    pub width: u16,
    pub height: u16,
}

impl LayoutContext {
    /// Rows left for the transcript once the composer and footer are placed.
    pub fn viewport_height(&self, footer_height: u16) -> u16 {
        self.height
            .saturating_sub(COMPOSER_HEIGHT)
            .saturating_sub(footer_height)
    }
}
