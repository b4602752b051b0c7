//! Text measurement on a fixed-advance grid.
//!
//! Wrapping uses `textwrap` with the same options the terminal renderer
//! uses, so a measured height matches what ratatui draws.

use unicode_width::UnicodeWidthStr;

use crate::core::geometry::Size;
use crate::layout::metrics::LayoutMetrics;

/// Wrapping options shared by measurement and rendering.
pub fn wrap_options(columns: usize) -> textwrap::Options<'static> {
    textwrap::Options::new(columns)
        .break_words(true)
        .word_separator(textwrap::WordSeparator::AsciiSpace)
}

/// Wraps `text` into lines no wider than `columns`.
pub fn wrap_lines(text: &str, columns: usize) -> Vec<String> {
    if columns == 0 {
        return Vec::new();
    }
    textwrap::wrap(text, wrap_options(columns))
        .into_iter()
        .map(|line| line.into_owned())
        .collect()
}

/// Bounding size of `text` wrapped to `max_width`, scaled by `scale`
/// (1.0 for body text). Both dimensions round up to whole units.
pub fn measure(text: &str, max_width: f32, metrics: &LayoutMetrics, scale: f32) -> Size {
    let char_width = metrics.char_width * scale;
    let line_height = metrics.line_height * scale;
    if text.is_empty() || char_width <= 0.0 || max_width <= 0.0 {
        return Size::ZERO;
    }

    let columns = (max_width / char_width).floor() as usize;
    let lines = wrap_lines(text, columns);
    if lines.is_empty() {
        return Size::ZERO;
    }

    let widest = lines
        .iter()
        .map(|line| UnicodeWidthStr::width(line.as_str()))
        .max()
        .unwrap_or(0);
    Size::new(
        (widest as f32 * char_width).ceil(),
        (lines.len() as f32 * line_height).ceil(),
    )
}
