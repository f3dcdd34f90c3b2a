//! Fixed-width line splitting for the transcript.
//!
//! Widths are counted in `char`s, not terminal columns: a double-width glyph
//! counts as one, so lines containing emoji may overflow by a column or two.

/// Splits `line` into chunks of exactly `max_width` chars, remainder last.
///
/// A line that already fits is returned as-is, as is any line when
/// `max_width` is 0 (nothing sensible can be cut at zero width).
pub fn wrap(line: &str, max_width: usize) -> Vec<String> {
    if max_width == 0 || line.chars().count() <= max_width {
        return vec![line.to_string()];
    }

    let mut chunks = Vec::new();
    let mut rest = line;
    while let Some((cut, _)) = rest.char_indices().nth(max_width) {
        chunks.push(rest[..cut].to_string());
        rest = &rest[cut..];
    }
    if !rest.is_empty() {
        chunks.push(rest.to_string());
    }
    chunks
}
