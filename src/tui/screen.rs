//! # Chat Screen
//!
//! The reconciliation loop: every [`TuiEvent`] goes through
//! [`ChatScreen::update`], which applies the screen-level policy (quit,
//! submit, resize, follow new output), refreshes the transcript from the
//! session, and forwards the event to the regions. [`ChatScreen::draw`] then
//! stacks viewport, composer and footer top to bottom.
//!
//! ```text
//!             ┌──────────── update(event) ────────────┐
//!  event ───▶ │ Quit / Submit / Resize / Notification │
//!             │ session → welcome text or transcript  │
//!             │ focus composer                        │
//!             │ forward: viewport, composer*, footer  │
//!             └───────────────────────────────────────┘
//!                      * only while the assistant is idle
//! ```
//!
//! The screen owns the [`LayoutContext`] and is its only writer.

use log::{debug, info};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};

use crate::core::message::Message;
use crate::core::session::{ChatSession, SessionError};
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::{Composer, ComposerEvent, Footer, Viewport};
use crate::tui::event::TuiEvent;
use crate::tui::layout::{COMPOSER_HEIGHT, LayoutContext};
use crate::tui::transcript;

/// Typing this and pressing Enter quits instead of sending.
pub const QUIT_COMMAND: &str = "/quit";

/// Where the conversation stands, as seen by the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenState {
    /// Assistant idle, composer empty.
    Idle,
    /// Assistant idle, composer holds text.
    Composing,
    /// The assistant is generating; input is not forwarded to the composer.
    AwaitingAssistant,
    /// Quit was requested. Terminal: later events are ignored.
    Exited,
}

/// What the host loop should do after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

enum Submit {
    Ignored,
    Sent,
    Quit,
}

pub struct ChatScreen<S: ChatSession> {
    session: S,
    layout: LayoutContext,
    viewport: Viewport,
    composer: Composer,
    footer: Footer,
    welcome_text: String,
    state: ScreenState,
}

impl<S: ChatSession> ChatScreen<S> {
    pub fn new(session: S, footer: Footer, welcome_text: impl Into<String>) -> Self {
        let mut screen = Self {
            session,
            layout: LayoutContext::default(),
            viewport: Viewport::new(),
            composer: Composer::new(),
            footer,
            welcome_text: welcome_text.into(),
            state: ScreenState::Idle,
        };
        screen.refresh_content(false);
        screen.composer.focus();
        screen
    }

    pub fn state(&self) -> ScreenState {
        self.state
    }

    pub fn layout(&self) -> LayoutContext {
        self.layout
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn composer(&self) -> &Composer {
        &self.composer
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    #[cfg(test)]
    fn blur_composer(&mut self) {
        self.composer.blur();
    }

    /// Runs one reconciliation cycle for `event`.
    ///
    /// Returns `Err` only when a submitted message could not be handed to
    /// the session; the host should treat that as fatal.
    pub fn update(&mut self, event: &TuiEvent) -> Result<Flow, SessionError> {
        if self.state == ScreenState::Exited {
            return Ok(Flow::Quit);
        }

        let mut follow_output = false;
        let mut composer_reset = false;
        match event {
            TuiEvent::Quit => return Ok(self.quit()),
            TuiEvent::Submit => match self.submit()? {
                Submit::Quit => return Ok(self.quit()),
                Submit::Sent => {
                    follow_output = true;
                    composer_reset = true;
                }
                Submit::Ignored => {}
            },
            TuiEvent::Resize { width, height } => self.resize(*width, *height),
            TuiEvent::Notification => follow_output = true,
            _ => {}
        }

        let running = self.session.is_running();
        self.refresh_content(follow_output);
        self.composer.focus();

        if let Some(y) = self.viewport.handle_event(event) {
            debug!("Viewport scrolled to line {}", y);
        }
        let edited = !running && self.composer.handle_event(event) == Some(ComposerEvent::Changed);
        self.footer.update(event, &self.layout, running);

        // The composer's value only moves on an edit or a reset, so Idle vs
        // Composing is re-derived only then or when the assistant finishes.
        self.state = if running {
            ScreenState::AwaitingAssistant
        } else if edited || composer_reset || self.state == ScreenState::AwaitingAssistant {
            if self.composer.value().is_empty() {
                ScreenState::Idle
            } else {
                ScreenState::Composing
            }
        } else {
            self.state
        };
        Ok(Flow::Continue)
    }

    /// Draws the three regions top to bottom.
    pub fn draw(&mut self, frame: &mut Frame) {
        let [viewport_area, composer_area, footer_area] = Layout::vertical([
            Constraint::Length(self.viewport.size().1),
            Constraint::Length(COMPOSER_HEIGHT),
            Constraint::Length(self.footer.height()),
        ])
        .areas(frame.area());

        self.viewport.render(frame, viewport_area);
        self.composer.render(frame, composer_area);
        self.footer.render(frame, footer_area);
    }

    fn quit(&mut self) -> Flow {
        info!("Quit requested");
        self.state = ScreenState::Exited;
        Flow::Quit
    }

    /// Handles Enter. Anything that is not a real message is a silent no-op.
    fn submit(&mut self) -> Result<Submit, SessionError> {
        if self.session.is_running() {
            debug!("Submit ignored: assistant is running");
            return Ok(Submit::Ignored);
        }
        let value = self.composer.value();
        if value.is_empty() {
            return Ok(Submit::Ignored);
        }
        if value == QUIT_COMMAND {
            return Ok(Submit::Quit);
        }

        info!("Submitting user message ({} bytes)", value.len());
        self.session.send(Message::user(value))?;
        self.composer.reset();
        Ok(Submit::Sent)
    }

    fn resize(&mut self, width: u16, height: u16) {
        debug!("Resize to {}x{}", width, height);
        self.layout = LayoutContext { width, height };
        self.composer.set_width(width);
        self.viewport
            .set_size(width, self.layout.viewport_height(self.footer.height()));
    }

    /// Welcome text while nothing has happened yet, otherwise the transcript.
    fn refresh_content(&mut self, goto_bottom: bool) {
        if !self.session.has_messages() && !self.session.is_running() {
            self.viewport.set_content(self.welcome_text.as_str());
        } else {
            let messages = self.session.messages();
            self.viewport
                .set_content(transcript::render(&messages, self.layout.width));
        }
        if goto_bottom {
            self.viewport.goto_bottom();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::message::MessageType;
    use crate::test_support::{FakeSession, buffer_rows};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    const WELCOME: &str = "Welcome to the AI CLI!";

    fn screen(session: &FakeSession) -> ChatScreen<FakeSession> {
        ChatScreen::new(session.clone(), Footer::new("fake", "m"), WELCOME)
    }

    fn type_str(screen: &mut ChatScreen<FakeSession>, text: &str) {
        for c in text.chars() {
            screen.update(&TuiEvent::InputChar(c)).unwrap();
        }
    }

    fn resize(width: u16, height: u16) -> TuiEvent {
        TuiEvent::Resize { width, height }
    }

    #[test]
    fn test_empty_session_shows_welcome_and_ignores_empty_submit() {
        let session = FakeSession::default();
        let mut screen = screen(&session);
        assert_eq!(screen.viewport().content(), WELCOME);

        assert_eq!(screen.update(&TuiEvent::Submit), Ok(Flow::Continue));
        assert!(session.sent().is_empty());
        assert_eq!(screen.viewport().content(), WELCOME);
        assert_eq!(screen.state(), ScreenState::Idle);
        assert_eq!(screen.layout().width, 0);
    }

    #[test]
    fn test_transcript_replaces_welcome_text() {
        let session = FakeSession::default();
        session.push(Message::user("hi"));
        session.push(Message::assistant("hello"));
        let mut screen = screen(&session);

        screen.update(&resize(80, 24)).unwrap();
        assert_eq!(screen.viewport().content(), "👤 hi\n\n🤖 hello\n");
    }

    #[test]
    fn test_running_session_without_messages_drops_welcome() {
        let session = FakeSession::default();
        session.set_running(true);
        let mut screen = screen(&session);
        screen.update(&TuiEvent::Notification).unwrap();
        // running with nothing to show yet renders an empty transcript
        assert_eq!(screen.viewport().content(), "");
    }

    #[test]
    fn test_keys_are_not_forwarded_while_running() {
        let session = FakeSession::default();
        let mut screen = screen(&session);
        screen.update(&resize(80, 24)).unwrap();
        type_str(&mut screen, "draft");

        session.set_running(true);
        type_str(&mut screen, "xyz");
        screen.update(&TuiEvent::Backspace).unwrap();

        assert_eq!(screen.composer().value(), "draft");
        assert_eq!(screen.state(), ScreenState::AwaitingAssistant);
    }

    #[test]
    fn test_submit_while_running_sends_nothing() {
        let session = FakeSession::default();
        let mut screen = screen(&session);
        screen.update(&resize(80, 24)).unwrap();
        type_str(&mut screen, "abc");

        session.set_running(true);
        assert_eq!(screen.update(&TuiEvent::Submit), Ok(Flow::Continue));
        assert!(session.sent().is_empty());
        assert_eq!(screen.composer().value(), "abc");
    }

    #[test]
    fn test_quit_command_terminates_without_sending() {
        let session = FakeSession::default();
        let mut screen = screen(&session);
        screen.update(&resize(80, 24)).unwrap();
        type_str(&mut screen, QUIT_COMMAND);

        assert_eq!(screen.update(&TuiEvent::Submit), Ok(Flow::Quit));
        assert!(session.sent().is_empty());
        assert_eq!(screen.state(), ScreenState::Exited);

        // Exited is terminal
        assert_eq!(screen.update(&TuiEvent::InputChar('a')), Ok(Flow::Quit));
        assert_eq!(screen.composer().value(), QUIT_COMMAND);
    }

    #[test]
    fn test_quit_key_exits_even_while_running() {
        let session = FakeSession::default();
        session.set_running(true);
        let mut screen = screen(&session);
        assert_eq!(screen.update(&TuiEvent::Quit), Ok(Flow::Quit));
        assert_eq!(screen.state(), ScreenState::Exited);
    }

    #[test]
    fn test_submit_sends_once_clears_composer_and_scrolls_to_bottom() {
        let session = FakeSession::default();
        for i in 0..20 {
            session.push(Message::assistant(format!("reply {i}")));
        }
        let mut screen = screen(&session);
        screen.update(&resize(40, 12)).unwrap();
        screen.update(&TuiEvent::ScrollToTop).unwrap();
        assert_eq!(screen.viewport().y_offset(), 0);

        type_str(&mut screen, "hello there");
        assert_eq!(screen.state(), ScreenState::Composing);
        assert_eq!(screen.update(&TuiEvent::Submit), Ok(Flow::Continue));

        assert_eq!(session.sent(), vec![Message::user("hello there")]);
        assert_eq!(screen.composer().value(), "");
        assert!(screen.viewport().y_offset() > 0);
        assert!(screen.viewport().at_bottom());
    }

    #[test]
    fn test_closed_sink_is_reported_and_value_kept() {
        let session = FakeSession::default();
        session.close();
        let mut screen = screen(&session);
        screen.update(&resize(80, 24)).unwrap();
        type_str(&mut screen, "lost?");

        assert_eq!(
            screen.update(&TuiEvent::Submit),
            Err(SessionError::InputClosed)
        );
        assert_eq!(screen.composer().value(), "lost?");
    }

    #[test]
    fn test_resize_is_idempotent() {
        let session = FakeSession::default();
        let mut screen = screen(&session);

        screen.update(&resize(100, 30)).unwrap();
        let first = (
            screen.layout(),
            screen.viewport().size(),
            screen.composer().width(),
        );
        screen.update(&resize(100, 30)).unwrap();
        let second = (
            screen.layout(),
            screen.viewport().size(),
            screen.composer().width(),
        );

        assert_eq!(first, second);
        assert_eq!(first.1, (100, 30 - COMPOSER_HEIGHT - 1));
        assert_eq!(first.2, 100);
    }

    #[test]
    fn test_tiny_terminal_clamps_viewport_height() {
        let session = FakeSession::default();
        let mut screen = screen(&session);
        screen.update(&resize(0, 0)).unwrap();
        assert_eq!(screen.viewport().size(), (0, 0));
        screen.update(&resize(10, 2)).unwrap();
        assert_eq!(screen.viewport().size(), (10, 0));
    }

    #[test]
    fn test_composer_regains_focus_after_every_event() {
        let session = FakeSession::default();
        let mut screen = screen(&session);
        let events = [
            resize(60, 20),
            TuiEvent::InputChar('a'),
            TuiEvent::ScrollUp,
            TuiEvent::Notification,
            TuiEvent::Submit,
            TuiEvent::CursorLeft,
        ];
        for event in &events {
            screen.blur_composer();
            assert!(!screen.composer().is_focused());
            screen.update(event).unwrap();
            assert!(screen.composer().is_focused(), "after {event:?}");
        }
        // the blurred composer was refocused before the key reached it
        assert_eq!(session.sent(), vec![Message::user("a")]);
    }

    #[test]
    fn test_state_tracks_composer_edits_and_finished_replies() {
        let session = FakeSession::default();
        let mut screen = screen(&session);
        screen.update(&resize(60, 20)).unwrap();

        type_str(&mut screen, "x");
        assert_eq!(screen.state(), ScreenState::Composing);
        screen.update(&TuiEvent::ScrollDown).unwrap();
        assert_eq!(screen.state(), ScreenState::Composing);
        screen.update(&TuiEvent::Backspace).unwrap();
        assert_eq!(screen.state(), ScreenState::Idle);

        type_str(&mut screen, "hi");
        session.set_running(true);
        screen.update(&TuiEvent::Notification).unwrap();
        assert_eq!(screen.state(), ScreenState::AwaitingAssistant);
        session.set_running(false);
        screen.update(&TuiEvent::Notification).unwrap();
        assert_eq!(screen.state(), ScreenState::Composing);
    }

    #[test]
    fn test_notification_follows_streamed_output() {
        let session = FakeSession::default();
        session.push(Message::user("tell me a story"));
        session.set_running(true);
        let mut screen = screen(&session);
        screen.update(&resize(40, 10)).unwrap();

        for i in 0..15 {
            session.push(Message::new(MessageType::Tool, format!("step {i}")));
            screen.update(&TuiEvent::Notification).unwrap();
            assert!(screen.viewport().at_bottom());
        }
        assert!(screen.viewport().y_offset() > 0);
    }

    #[test]
    fn test_draw_stacks_viewport_composer_footer() {
        let session = FakeSession::default();
        let mut screen = screen(&session);
        screen.update(&resize(40, 10)).unwrap();

        let mut terminal = Terminal::new(TestBackend::new(40, 10)).unwrap();
        terminal.draw(|f| screen.draw(f)).unwrap();
        let rows = buffer_rows(terminal.backend().buffer());

        assert_eq!(rows[0], WELCOME);
        let composer_top = usize::from(10 - COMPOSER_HEIGHT - 1);
        assert!(rows[composer_top].starts_with('╭'));
        assert!(rows[composer_top + 1].contains("How can I help you today?"));
        assert!(rows[9].starts_with("aicli v"));
        assert!(rows[9].ends_with("Ready"));
    }
}
