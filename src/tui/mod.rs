//! # TUI Adapter
//!
//! The ratatui-specific layer. Sets up the terminal, starts the assistant
//! session and the input thread, and drives [`ChatScreen`] from a single
//! event queue.
//!
//! ## Event Flow
//!
//! ```text
//!  input thread ──(keys, mouse, resize)──┐
//!                                        ├──▶ mpsc queue ──▶ ChatScreen::update ──▶ draw
//!  assistant task ──(Notification)───────┘
//! ```
//!
//! The loop blocks on the queue, then drains everything already pending
//! before drawing, so a burst of streamed chunks costs one redraw.

mod component;
pub mod components;
pub mod event;
pub mod layout;
pub mod screen;
pub mod transcript;
pub mod wrap;

use log::{info, warn};
use std::io::stdout;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, mpsc};

use crossterm::cursor::SetCursorStyle;
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
};
use crossterm::execute;
use ratatui::DefaultTerminal;

use crate::core::config::ResolvedConfig;
use crate::core::session::{AssistantSettings, ChatSession, Session};
use crate::error::AppError;
use crate::inference::{CompletionProvider, EchoProvider, ResponsesProvider};
use crate::tui::components::Footer;
use crate::tui::event::{TuiEvent, spawn_input_reader};
use crate::tui::screen::{ChatScreen, Flow};

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            SetCursorStyle::SteadyBlock, // Blinking resets on every draw() and looks erratic
        )?;
        info!("Terminal modes enabled (mouse, bracketed paste, steady block cursor)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            DisableMouseCapture,
            DisableBracketedPaste,
            SetCursorStyle::DefaultUserShape
        );
    }
}

/// Build a provider from a resolved config's provider name and credentials.
pub fn build_provider(config: &ResolvedConfig) -> Arc<dyn CompletionProvider> {
    match config.provider.as_str() {
        "echo" => Arc::new(EchoProvider::default()),
        "responses" => Arc::new(ResponsesProvider::new(
            config.api_key.clone(),
            config.base_url.clone(),
        )),
        other => {
            warn!("Unknown provider '{}', falling back to responses", other);
            Arc::new(ResponsesProvider::new(
                config.api_key.clone(),
                config.base_url.clone(),
            ))
        }
    }
}

/// Runs the chat screen until the user quits.
///
/// Must be called from within a tokio runtime: the assistant session is
/// spawned onto it.
pub fn run(config: ResolvedConfig) -> Result<(), AppError> {
    let provider = build_provider(&config);
    let footer = Footer::new(provider.name(), config.model.as_str());

    let (tx, rx) = mpsc::channel();
    let notify_tx = tx.clone();
    let (session, assistant) = Session::spawn(
        provider,
        AssistantSettings {
            model: config.model.clone(),
            system_prompt: config.system_prompt.clone(),
        },
        move || {
            // The UI may already be gone during shutdown
            let _ = notify_tx.send(TuiEvent::Notification);
        },
    );
    let mut screen = ChatScreen::new(session, footer, config.welcome_message);

    let mut terminal = ratatui::init();
    let result = drive(&mut terminal, &mut screen, tx, &rx);
    ratatui::restore();

    // Quitting does not wait for an in-flight reply
    assistant.abort();
    match &result {
        Ok(()) => info!("Chat screen closed"),
        Err(e) => warn!("Chat screen failed: {}", e),
    }
    result
}

fn drive<S: ChatSession>(
    terminal: &mut DefaultTerminal,
    screen: &mut ChatScreen<S>,
    tx: mpsc::Sender<TuiEvent>,
    rx: &mpsc::Receiver<TuiEvent>,
) -> Result<(), AppError> {
    let _terminal_mode_guard = TerminalModeGuard::new()?;

    let stop = Arc::new(AtomicBool::new(false));
    let input = spawn_input_reader(tx.clone(), stop.clone())?;

    // The first Resize is what sizes the layout; the terminal does not send one on start.
    let size = terminal.size()?;
    let _ = tx.send(TuiEvent::Resize {
        width: size.width,
        height: size.height,
    });
    drop(tx);

    let result = event_loop(terminal, screen, rx);

    stop.store(true, Ordering::Relaxed);
    if input.join().is_err() {
        warn!("Terminal input thread panicked");
    }
    result
}

fn event_loop<S: ChatSession>(
    terminal: &mut DefaultTerminal,
    screen: &mut ChatScreen<S>,
    rx: &mpsc::Receiver<TuiEvent>,
) -> Result<(), AppError> {
    loop {
        terminal.draw(|f| screen.draw(f))?;

        let Ok(first) = rx.recv() else {
            info!("Event queue closed");
            return Ok(());
        };
        for event in std::iter::once(first).chain(rx.try_iter()) {
            if screen.update(&event)? == Flow::Quit {
                return Ok(());
            }
        }
    }
}
