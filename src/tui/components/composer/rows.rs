//! Visual row layout for the composer buffer.
//!
//! Text is hard-wrapped at the inner width in `char`s. Every row is a byte
//! range into the buffer (newlines are never part of a row), so cursor
//! positions map to rows without re-scanning wrapped strings.

use std::ops::Range;

/// Rounded border on the left and right.
pub(super) const HORIZONTAL_OVERHEAD: u16 = 2;
/// Offset from area edge to content (border width)
pub(super) const BORDER_OFFSET: u16 = 1;

/// Inner content width for a composer of `outer_width` columns.
pub(super) fn inner_width(outer_width: u16) -> u16 {
    outer_width.saturating_sub(HORIZONTAL_OVERHEAD)
}

/// Splits `text` into visual rows of at most `width` chars.
///
/// A non-empty logical line whose length is an exact multiple of `width`
/// gets an extra empty row after it, so a cursor sitting at its end lands on
/// a fresh row instead of the right border. `width == 0` disables wrapping.
pub(super) fn visual_rows(text: &str, width: u16) -> Vec<Range<usize>> {
    let width = usize::from(width);
    let mut rows = Vec::new();
    let mut line_start = 0;

    for line in text.split('\n') {
        let line_end = line_start + line.len();
        if line.is_empty() || width == 0 {
            rows.push(line_start..line_end);
        } else {
            let mut row_start = line_start;
            let mut count = 0;
            for (offset, _) in line.char_indices() {
                if count == width {
                    rows.push(row_start..line_start + offset);
                    row_start = line_start + offset;
                    count = 0;
                }
                count += 1;
            }
            rows.push(row_start..line_end);
            if count == width {
                rows.push(line_end..line_end);
            }
        }
        line_start = line_end + 1;
    }

    rows
}

/// Index of the row holding byte offset `pos`.
pub(super) fn row_of(rows: &[Range<usize>], pos: usize) -> usize {
    rows.iter().rposition(|row| row.start <= pos).unwrap_or(0)
}

/// Find the byte offset of the previous character boundary before `pos` in `text`.
pub(super) fn prev_char_boundary(text: &str, pos: usize) -> usize {
    text[..pos]
        .char_indices()
        .next_back()
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Find the byte offset of the next character boundary after `pos` in `text`.
pub(super) fn next_char_boundary(text: &str, pos: usize) -> usize {
    text[pos..]
        .chars()
        .next()
        .map(|c| pos + c.len_utf8())
        .unwrap_or(text.len())
}
