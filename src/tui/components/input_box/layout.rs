//! Wrapping helpers, dimensions and the terminal-row grow policies.

use crate::core::autogrow::{GrowPolicy, GrowSurface};

/// Border (2) + padding (2) consumed horizontally by the bordered block
pub(super) const HORIZONTAL_OVERHEAD: u16 = 4;
/// Top + bottom borders consumed vertically
pub const VERTICAL_OVERHEAD: u16 = 2;
/// Offset from area edge to content (border + padding)
pub(super) const CONTENT_OFFSET: u16 = 2;

/// Pixels per terminal row when scaling the page policies.
pub const ROW_PX: u16 = 28;

/// Chat composer policy in terminal rows. The box borders sit inside the
/// container along with the hint row.
pub const CHAT_COMPOSER_ROWS: GrowPolicy =
    GrowPolicy::CHAT_COMPOSER.in_rows(ROW_PX, VERTICAL_OVERHEAD);

/// Landing search policy in terminal rows.
pub const LANDING_SEARCH_ROWS: GrowPolicy =
    GrowPolicy::LANDING_SEARCH.in_rows(ROW_PX, VERTICAL_OVERHEAD);

pub(super) fn wrap_options(inner_width: u16) -> textwrap::Options<'static> {
    textwrap::Options::new(inner_width as usize)
        .break_words(true)
        .word_separator(textwrap::WordSeparator::AsciiSpace)
}

/// Returns 0 if the area is too narrow.
pub(super) fn inner_width(outer_width: u16) -> u16 {
    outer_width.saturating_sub(HORIZONTAL_OVERHEAD)
}

/// Wrapped row count, counting a trailing newline as its own row.
pub(super) fn wrap_line_count(text: &str, width: u16) -> u16 {
    if width == 0 || text.is_empty() {
        return 1;
    }

    let lines = textwrap::wrap(text, wrap_options(width));
    let mut count = (lines.len() as u16).max(1);

    if text.ends_with('\n') && !lines.last().is_some_and(|l| l.is_empty()) {
        count += 1;
    }

    count
}

pub(super) fn prev_char_boundary(text: &str, pos: usize) -> usize {
    text[..pos]
        .char_indices()
        .next_back()
        .map(|(i, _)| i)
        .unwrap_or(0)
}

pub(super) fn next_char_boundary(text: &str, pos: usize) -> usize {
    text[pos..]
        .char_indices()
        .nth(1)
        .map(|(i, _)| pos + i)
        .unwrap_or(text.len())
}

/// One sizing pass over an input's buffer, in rows.
pub(super) struct RowSurface<'a> {
    pub buffer: &'a str,
    pub outer_width: u16,
    pub viewport: Option<u16>,
    pub has_container: bool,
    pub rows: Option<u16>,
    pub container_rows: Option<u16>,
    pub compact: bool,
    pub list_padding: Option<u16>,
}

impl<'a> RowSurface<'a> {
    pub fn new(buffer: &'a str, outer_width: u16, viewport: Option<u16>, has_container: bool) -> Self {
        Self {
            buffer,
            outer_width,
            viewport,
            has_container,
            rows: None,
            container_rows: None,
            compact: false,
            list_padding: None,
        }
    }
}

impl GrowSurface for RowSurface<'_> {
    fn reset_height(&mut self) {
        self.rows = None;
    }

    fn measure(&self) -> u16 {
        wrap_line_count(self.buffer, inner_width(self.outer_width))
    }

    fn viewport_height(&self) -> Option<u16> {
        self.viewport
    }

    fn set_height(&mut self, height: u16) {
        self.rows = Some(height);
    }

    fn set_container_height(&mut self, height: u16) -> bool {
        if self.has_container {
            self.container_rows = Some(height);
        }
        self.has_container
    }

    fn set_compact(&mut self, compact: bool) {
        self.compact = compact;
    }

    fn pad_message_list(&mut self, padding: u16) {
        self.list_padding = Some(padding);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::autogrow::resize;

    #[test]
    fn wrap_line_count_empty_string() {
        assert_eq!(wrap_line_count("", 10), 1);
    }

    #[test]
    fn wrap_line_count_wraps_long_text() {
        assert_eq!(wrap_line_count("aaaa bbbb cccc", 5), 3);
    }

    #[test]
    fn wrap_line_count_trailing_newline_adds_line() {
        assert_eq!(wrap_line_count("halo\n", 10), 2);
    }

    #[test]
    fn char_boundaries_respect_multibyte() {
        let text = "aé😀";
        assert_eq!(prev_char_boundary(text, text.len()), 3);
        assert_eq!(next_char_boundary(text, 1), 3);
        assert_eq!(next_char_boundary(text, 3), text.len());
        assert_eq!(prev_char_boundary(text, 0), 0);
    }

    #[test]
    fn composer_grows_up_to_forty_percent() {
        let text = "baris\n".repeat(30);
        let mut surface = RowSurface::new(&text, 40, Some(20), true);
        let outcome = resize(&mut surface, &CHAT_COMPOSER_ROWS);

        assert_eq!(outcome.cap, 8);
        assert_eq!(surface.rows, Some(8));
        assert_eq!(surface.container_rows, Some(8 + 3));
        assert!(!surface.compact);
        assert_eq!(surface.list_padding, Some(8 + 3 + 1));
    }

    #[test]
    fn single_row_composer_is_compact() {
        let mut surface = RowSurface::new("halo", 40, Some(30), true);
        resize(&mut surface, &CHAT_COMPOSER_ROWS);
        assert_eq!(surface.rows, Some(1));
        assert!(surface.compact);
    }

    #[test]
    fn two_rows_stay_compact() {
        let mut surface = RowSurface::new("satu\ndua", 40, Some(30), true);
        resize(&mut surface, &CHAT_COMPOSER_ROWS);
        assert_eq!(surface.rows, Some(2));
        assert!(surface.compact);

        let mut surface = RowSurface::new("satu\ndua\ntiga", 40, Some(30), true);
        resize(&mut surface, &CHAT_COMPOSER_ROWS);
        assert!(!surface.compact);
    }

    #[test]
    fn landing_search_has_no_container() {
        let text = "x\n".repeat(20);
        let mut surface = RowSurface::new(&text, 40, Some(10), true);
        let outcome = resize(&mut surface, &LANDING_SEARCH_ROWS);
        assert_eq!(outcome.height, 5);
        assert_eq!(surface.container_rows, None);
        assert_eq!(surface.list_padding, None);
    }
}
