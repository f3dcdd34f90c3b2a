//! Plain-text transcript rendering.
//!
//! Each message becomes `<glyph> <text>`, hard-wrapped to the terminal width,
//! with one blank line between messages. No markdown, no styling.

use crate::core::message::{Message, MessageType};
use crate::tui::wrap::wrap;

/// Prefix shown before a message of the given type.
pub fn glyph(kind: MessageType) -> &'static str {
    match kind {
        MessageType::System => "🤖",
        MessageType::User => "👤",
        MessageType::Assistant => "🤖",
        MessageType::Tool => "🔧",
    }
}

/// Renders the transcript at `width` columns.
///
/// An empty slice renders as an empty string; the screen shows its welcome
/// text instead of calling this in that case.
pub fn render(messages: &[Message], width: u16) -> String {
    let mut rendered = String::new();
    for (idx, message) in messages.iter().enumerate() {
        if idx > 0 {
            rendered.push('\n');
        }
        let text = format!("{} {}", glyph(message.kind), message.text);
        let lines: Vec<String> = text
            .split('\n')
            .flat_map(|line| wrap(line, width as usize))
            .collect();
        rendered.push_str(lines.join("\n").trim_matches('\n'));
        rendered.push('\n');
    }
    rendered
}
