//! # Viewport Component
//!
//! Scrollable, read-only text area that shows the rendered transcript.
//!
//! The screen owns what goes in (`set_content`) and how big it is
//! (`set_size`); the viewport owns only its scroll offset. Content arrives
//! pre-wrapped, so one content line is one screen row.

use ratatui::Frame;
use ratatui::layout::{Position, Rect, Size};
use ratatui::widgets::Paragraph;
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

pub struct Viewport {
    scroll_state: ScrollViewState,
    content: String,
    line_count: u16,
    width: u16,
    height: u16,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new()
    }
}

impl Viewport {
    pub fn new() -> Self {
        Self {
            scroll_state: ScrollViewState::default(),
            content: String::new(),
            line_count: 0,
            width: 0,
            height: 0,
        }
    }

    pub fn set_size(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.clamp_scroll();
    }

    pub fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    /// Replaces the displayed text, keeping the scroll offset where possible.
    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
        self.line_count = u16::try_from(self.content.lines().count()).unwrap_or(u16::MAX);
        self.clamp_scroll();
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// First visible content line.
    pub fn y_offset(&self) -> u16 {
        self.scroll_state.offset().y
    }

    pub fn max_offset(&self) -> u16 {
        self.line_count.saturating_sub(self.height)
    }

    pub fn at_bottom(&self) -> bool {
        self.y_offset() >= self.max_offset()
    }

    pub fn goto_bottom(&mut self) {
        self.set_y(self.max_offset());
    }

    pub fn goto_top(&mut self) {
        self.set_y(0);
    }

    fn set_y(&mut self, y: u16) {
        self.scroll_state.set_offset(Position { x: 0, y });
    }

    fn clamp_scroll(&mut self) {
        let max_y = self.max_offset();
        if self.y_offset() > max_y {
            self.set_y(max_y);
        }
    }
}

impl EventHandler for Viewport {
    /// The new scroll offset, reported only when it moved.
    type Event = u16;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        let before = self.y_offset();
        match event {
            TuiEvent::ScrollUp => self.scroll_state.scroll_up(),
            TuiEvent::ScrollDown => {
                self.scroll_state.scroll_down();
                self.clamp_scroll();
            }
            TuiEvent::ScrollPageUp => self.set_y(self.y_offset().saturating_sub(self.height)),
            TuiEvent::ScrollPageDown => {
                self.set_y(self.y_offset().saturating_add(self.height));
                self.clamp_scroll();
            }
            TuiEvent::ScrollToTop => self.goto_top(),
            TuiEvent::ScrollToBottom => self.goto_bottom(),
            _ => {}
        }
        let after = self.y_offset();
        (after != before).then_some(after)
    }
}

impl Component for Viewport {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let canvas_height = self.line_count.max(area.height);
        let mut scroll_view = ScrollView::new(Size::new(area.width, canvas_height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Never)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);

        scroll_view.render_widget(
            Paragraph::new(self.content.as_str()),
            Rect::new(0, 0, area.width, canvas_height),
        );
        frame.render_stateful_widget(scroll_view, area, &mut self.scroll_state);
    }
}
