//! # Footer Component
//!
//! Bottom status line: app name and version, the provider/model in use, and
//! a status cell that reads `Ready` or shows a spinner while the assistant
//! is working.
//!
//! The footer keeps only what it needs to draw itself. The screen hands it
//! every event together with the shared [`LayoutContext`] and the session's
//! running flag; the spinner advances once per notification, so it moves
//! exactly as fast as output arrives.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::tui::component::Component;
use crate::tui::event::TuiEvent;
use crate::tui::layout::LayoutContext;

const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
const SEPARATOR: &str = " │ ";

pub struct Footer {
    provider_name: String,
    model_name: String,
    running: bool,
    spinner_frame: usize,
    width: u16,
}

impl Footer {
    pub fn new(provider_name: impl Into<String>, model_name: impl Into<String>) -> Self {
        Self {
            provider_name: provider_name.into(),
            model_name: model_name.into(),
            running: false,
            spinner_frame: 0,
            width: 0,
        }
    }

    pub fn update(&mut self, event: &TuiEvent, ctx: &LayoutContext, running: bool) {
        self.width = ctx.width;
        if running && *event == TuiEvent::Notification {
            self.spinner_frame = (self.spinner_frame + 1) % SPINNER_FRAMES.len();
        }
        if !running {
            self.spinner_frame = 0;
        }
        self.running = running;
    }

    pub fn height(&self) -> u16 {
        1
    }

    fn status(&self) -> String {
        if self.running {
            format!("{} Thinking…", SPINNER_FRAMES[self.spinner_frame])
        } else {
            "Ready".to_string()
        }
    }

    /// The footer text before truncation.
    pub fn text(&self) -> String {
        format!(
            "aicli v{}{SEPARATOR}{}/{}{SEPARATOR}{}",
            env!("CARGO_PKG_VERSION"),
            self.provider_name,
            self.model_name,
            self.status()
        )
    }
}

impl Component for Footer {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let width = if self.width == 0 {
            area.width
        } else {
            self.width.min(area.width)
        };
        let text: String = self.text().chars().take(usize::from(width)).collect();
        let style = if self.running {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        frame.render_widget(Line::from(Span::styled(text, style)), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::buffer_rows;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn ctx(width: u16) -> LayoutContext {
        LayoutContext { width, height: 24 }
    }

    fn draw(footer: &mut Footer, width: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, 1)).unwrap();
        terminal.draw(|f| footer.render(f, f.area())).unwrap();
        buffer_rows(terminal.backend().buffer()).remove(0)
    }

    #[test]
    fn test_footer_idle_shows_ready() {
        let mut footer = Footer::new("echo", "test-model");
        let resize = TuiEvent::Resize {
            width: 80,
            height: 24,
        };
        footer.update(&resize, &ctx(80), false);

        let row = draw(&mut footer, 80);
        assert!(row.starts_with("aicli v"));
        assert!(row.contains("echo/test-model"));
        assert!(row.ends_with("Ready"));
        assert_eq!(footer.height(), 1);
    }

    #[test]
    fn test_spinner_advances_on_notification_only() {
        let mut footer = Footer::new("echo", "m");
        footer.update(&TuiEvent::Submit, &ctx(80), true);
        assert!(footer.text().contains("⠋ Thinking…"));

        footer.update(&TuiEvent::Notification, &ctx(80), true);
        assert!(footer.text().contains("⠙ Thinking…"));

        footer.update(&TuiEvent::InputChar('a'), &ctx(80), true);
        assert!(footer.text().contains("⠙ Thinking…"));

        footer.update(&TuiEvent::Notification, &ctx(80), false);
        assert!(footer.text().ends_with("Ready"));
    }

    #[test]
    fn test_footer_truncates_to_layout_width() {
        let mut footer = Footer::new("responses", "openai/gpt-4o-mini");
        footer.update(&TuiEvent::Notification, &ctx(10), false);

        let row = draw(&mut footer, 40);
        assert_eq!(row, "aicli v".to_string() + &env!("CARGO_PKG_VERSION")[..3]);
    }
}
