//! # Composer Component
//!
//! The input box at the bottom of the screen.
//!
//! ## Responsibilities
//!
//! - Capture text input (chars, paste, Ctrl+J newlines)
//! - Handle editing (backspace, delete, cursor movement)
//! - Show a placeholder while empty and the terminal cursor while focused
//!
//! Submission is not handled here: the screen intercepts Enter, reads
//! [`Composer::value`] and calls [`Composer::reset`] once the message has
//! been handed to the session. An unfocused composer ignores all input.

mod cursor;
mod rows;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Paragraph};

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;
use crate::tui::layout::COMPOSER_LINES;

use cursor::CursorState;
use rows::{inner_width, next_char_boundary, prev_char_boundary, visual_rows};

pub const PLACEHOLDER: &str = "How can I help you today?";

/// Follow-up reported to the screen after an edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComposerEvent {
    /// Buffer or cursor changed.
    Changed,
}

pub struct Composer {
    buffer: String,
    cursor: CursorState,
    focused: bool,
    width: u16,
}

impl Default for Composer {
    fn default() -> Self {
        Self::new()
    }
}

impl Composer {
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
            cursor: CursorState::new(),
            focused: false,
            width: 0,
        }
    }

    pub fn value(&self) -> &str {
        &self.buffer
    }

    /// Clears the buffer and puts the cursor back at the start.
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.cursor.reset();
    }

    pub fn focus(&mut self) {
        self.focused = true;
    }

    pub fn blur(&mut self) {
        self.focused = false;
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn set_width(&mut self, width: u16) {
        self.width = width;
        self.cursor.update_scroll_offset(&self.buffer, self.inner_width());
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    fn inner_width(&self) -> u16 {
        inner_width(self.width)
    }

    fn visible_lines(&self) -> Vec<Line<'_>> {
        let width = self.inner_width();
        visual_rows(&self.buffer, width)
            .into_iter()
            .skip(usize::from(self.cursor.scroll_offset))
            .take(usize::from(COMPOSER_LINES))
            .map(|row| Line::raw(&self.buffer[row]))
            .collect()
    }

    fn insert(&mut self, text: &str) {
        self.buffer.insert_str(self.cursor.pos, text);
        self.cursor.pos += text.len();
    }

    fn move_to(&mut self, pos: usize) -> Option<ComposerEvent> {
        if pos == self.cursor.pos {
            return None;
        }
        self.cursor.pos = pos;
        self.edited()
    }

    fn edited(&mut self) -> Option<ComposerEvent> {
        self.cursor
            .update_scroll_offset(&self.buffer, inner_width(self.width));
        Some(ComposerEvent::Changed)
    }
}

impl EventHandler for Composer {
    type Event = ComposerEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        if !self.focused {
            return None;
        }
        let pos = self.cursor.pos;
        match event {
            TuiEvent::InputChar(c) => {
                let mut utf8 = [0u8; 4];
                self.insert(c.encode_utf8(&mut utf8));
                self.edited()
            }
            TuiEvent::Paste(text) => {
                // Terminals send CR for pasted line breaks
                self.insert(&text.replace("\r\n", "\n").replace('\r', "\n"));
                self.edited()
            }
            TuiEvent::Backspace if pos > 0 => {
                let prev = prev_char_boundary(&self.buffer, pos);
                self.buffer.drain(prev..pos);
                self.cursor.pos = prev;
                self.edited()
            }
            TuiEvent::Delete if pos < self.buffer.len() => {
                let next = next_char_boundary(&self.buffer, pos);
                self.buffer.drain(pos..next);
                self.edited()
            }
            TuiEvent::CursorLeft if pos > 0 => {
                self.cursor.pos = prev_char_boundary(&self.buffer, pos);
                self.edited()
            }
            TuiEvent::CursorRight if pos < self.buffer.len() => {
                self.cursor.pos = next_char_boundary(&self.buffer, pos);
                self.edited()
            }
            TuiEvent::CursorHome => {
                let line_start = self.buffer[..pos].rfind('\n').map_or(0, |i| i + 1);
                self.move_to(line_start)
            }
            TuiEvent::CursorEnd => {
                let line_end = self.buffer[pos..]
                    .find('\n')
                    .map_or(self.buffer.len(), |i| pos + i);
                self.move_to(line_end)
            }
            TuiEvent::CursorUp | TuiEvent::CursorDown => {
                let direction = if *event == TuiEvent::CursorUp { -1 } else { 1 };
                let width = self.inner_width();
                if self.cursor.move_vertically(&self.buffer, direction, width) {
                    self.edited()
                } else {
                    None
                }
            }
            _ => None,
        }
    }
}

impl Component for Composer {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let width = inner_width(area.width);
        self.cursor.update_scroll_offset(&self.buffer, width);

        let border_style = if self.focused {
            Style::default().fg(Color::Green)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border_style);

        let paragraph = if self.buffer.is_empty() {
            Paragraph::new(PLACEHOLDER).style(Style::default().fg(Color::DarkGray))
        } else {
            Paragraph::new(self.visible_lines())
        };
        frame.render_widget(paragraph.block(block), area);

        if self.focused && width > 0 {
            let (x, y) = self.cursor.screen_pos(&self.buffer, area, width);
            frame.set_cursor_position((x, y));
        }
    }
}
