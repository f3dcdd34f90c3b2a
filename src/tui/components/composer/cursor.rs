//! Cursor position and internal scrolling for the composer.
//!
//! `CursorState` owns the cursor byte offset and the first visible row. The
//! text itself stays in `Composer`, so every method takes the buffer
//! explicitly.

use ratatui::layout::Rect;
use unicode_width::UnicodeWidthStr;

use super::rows::{BORDER_OFFSET, row_of, visual_rows};
use crate::tui::layout::COMPOSER_LINES;

pub(super) struct CursorState {
    /// Cursor position as byte offset in buffer (0..=buffer.len())
    pub pos: usize,
    /// First visible row (0 when content fits)
    pub scroll_offset: u16,
}

impl CursorState {
    pub fn new() -> Self {
        Self {
            pos: 0,
            scroll_offset: 0,
        }
    }

    pub fn reset(&mut self) {
        self.pos = 0;
        self.scroll_offset = 0;
    }

    /// Move one visual row up (`-1`) or down (`1`), keeping the char column.
    ///
    /// Returns `false` when already on the first/last row.
    pub fn move_vertically(&mut self, buffer: &str, direction: i8, width: u16) -> bool {
        let rows = visual_rows(buffer, width);
        let current = row_of(&rows, self.pos);
        let target = match direction {
            d if d < 0 && current > 0 => current - 1,
            d if d > 0 && current + 1 < rows.len() => current + 1,
            _ => return false,
        };

        let column = buffer[rows[current].start..self.pos].chars().count();
        let target_row = &rows[target];
        self.pos = buffer[target_row.clone()]
            .char_indices()
            .nth(column)
            .map(|(offset, _)| target_row.start + offset)
            .unwrap_or(target_row.end);
        true
    }

    /// Row the cursor is on, counted from the top of the buffer.
    pub fn row(&self, buffer: &str, width: u16) -> u16 {
        let rows = visual_rows(buffer, width);
        u16::try_from(row_of(&rows, self.pos)).unwrap_or(u16::MAX)
    }

    /// Scroll just enough to keep the cursor row inside the visible window.
    pub fn update_scroll_offset(&mut self, buffer: &str, width: u16) {
        let row = self.row(buffer, width);
        if row < self.scroll_offset {
            self.scroll_offset = row;
        } else if row >= self.scroll_offset + COMPOSER_LINES {
            self.scroll_offset = row + 1 - COMPOSER_LINES;
        }
    }

    /// Screen cell for the terminal cursor inside `area` (the bordered box).
    pub fn screen_pos(&self, buffer: &str, area: Rect, width: u16) -> (u16, u16) {
        let rows = visual_rows(buffer, width);
        let row = row_of(&rows, self.pos);
        let before_cursor = &buffer[rows[row].start..self.pos];
        let column = u16::try_from(before_cursor.width()).unwrap_or(u16::MAX);
        let visible_row = u16::try_from(row)
            .unwrap_or(u16::MAX)
            .saturating_sub(self.scroll_offset);

        (
            area.x + BORDER_OFFSET + column.min(width.saturating_sub(1)),
            area.y + BORDER_OFFSET + visible_row,
        )
    }
}
