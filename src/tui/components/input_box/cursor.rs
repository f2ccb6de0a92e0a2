//! Cursor tracking for the InputBox.
//!
//! `CursorState` owns the byte offset, the row scroll offset and the width
//! seen at the last render. The buffer itself stays with `InputBox`.

use ratatui::layout::Rect;
use unicode_width::UnicodeWidthStr;

use super::layout::{CONTENT_OFFSET, inner_width, wrap_line_count, wrap_options};

pub(super) struct CursorState {
    /// Byte offset in the buffer (0..=buffer.len())
    pub pos: usize,
    /// First visible wrapped row
    pub scroll_offset: u16,
    pub last_width: u16,
}

impl CursorState {
    const DEFAULT_WIDTH: u16 = 80;

    pub fn new() -> Self {
        Self {
            pos: 0,
            scroll_offset: 0,
            last_width: Self::DEFAULT_WIDTH,
        }
    }

    pub fn reset(&mut self) {
        self.pos = 0;
        self.scroll_offset = 0;
    }

    /// Move one wrapped row up (`-1`) or down (`1`), keeping the column.
    ///
    /// Returns `false` at the first or last row.
    pub fn move_vertically(&mut self, buffer: &str, direction: i16, width: u16) -> bool {
        let width = inner_width(width);
        if width == 0 || buffer.is_empty() {
            return false;
        }

        let rows = textwrap::wrap(buffer, wrap_options(width));
        if rows.is_empty() {
            return false;
        }

        // Byte length of a row plus the newline that ended it, if any.
        let row_span = |row: &str, offset: usize| -> usize {
            let end = offset + row.len();
            row.len() + usize::from(end < buffer.len() && buffer.as_bytes()[end] == b'\n')
        };

        let mut offset = 0;
        let mut current = 0;
        let mut column = 0;
        for (idx, row) in rows.iter().enumerate() {
            if offset + row.len() >= self.pos {
                current = idx;
                column = self.pos - offset;
                break;
            }
            offset += row_span(row, offset);
        }

        let target = match direction {
            d if d < 0 && current > 0 => current - 1,
            d if d > 0 && current + 1 < rows.len() => current + 1,
            _ => return false,
        };

        let mut target_start = 0;
        for row in rows.iter().take(target) {
            target_start += row_span(row, target_start);
        }

        self.pos = target_start + column.min(rows[target].len());
        true
    }

    /// Wrapped row (0-based) holding the cursor.
    pub fn row(&self, buffer: &str, width: u16) -> u16 {
        let width = inner_width(width);
        if width == 0 {
            return 0;
        }

        let before = &buffer[..self.pos];
        let rows = textwrap::wrap(before, wrap_options(width));
        let mut row = rows.len().saturating_sub(1) as u16;

        // A trailing newline textwrap didn't turn into an empty row.
        if self.pos > 0
            && buffer.as_bytes()[self.pos - 1] == b'\n'
            && !rows.last().is_some_and(|l| l.is_empty())
        {
            row += 1;
        }
        row
    }

    /// Keep the cursor row inside a window of `visible` rows.
    pub fn update_scroll_offset(&mut self, buffer: &str, width: u16, visible: u16) {
        let total = wrap_line_count(buffer, inner_width(width));
        let visible = visible.max(1);

        if total <= visible {
            self.scroll_offset = 0;
            return;
        }

        let row = self.row(buffer, width);
        if row < self.scroll_offset {
            self.scroll_offset = row;
        } else if row >= self.scroll_offset + visible {
            self.scroll_offset = row + 1 - visible;
        }
        self.scroll_offset = self.scroll_offset.min(total - visible);
    }

    /// Terminal (column, row) of the cursor inside the bordered `area`.
    pub fn screen_pos(&self, buffer: &str, area: Rect) -> (u16, u16) {
        let width = inner_width(area.width);
        if width == 0 {
            return (area.x + CONTENT_OFFSET, area.y + 1);
        }

        let options = wrap_options(width);
        let before = &buffer[..self.pos];

        // Columns come from the logical line since textwrap trims spaces.
        let line_start = before.rfind('\n').map_or(0, |i| i + 1);
        let logical = &before[line_start..];
        let segments = textwrap::wrap(logical, options);
        let column = match segments.split_last() {
            None => 0,
            Some((_, earlier)) => {
                let consumed: usize = earlier.iter().map(|s| s.width()).sum();
                logical.width().saturating_sub(consumed) as u16
            }
        };

        let row = self.row(buffer, area.width).saturating_sub(self.scroll_offset);
        (
            area.x + CONTENT_OFFSET + column.min(width),
            area.y + 1 + row,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertical_moves_keep_column() {
        let buffer = "abcd\nefgh";
        let mut cursor = CursorState::new();
        cursor.pos = 7; // "ef|gh"
        assert!(cursor.move_vertically(buffer, -1, 20));
        assert_eq!(cursor.pos, 2);
        assert!(!cursor.move_vertically(buffer, -1, 20));
        assert!(cursor.move_vertically(buffer, 1, 20));
        assert_eq!(cursor.pos, 7);
    }

    #[test]
    fn row_counts_trailing_newline() {
        let mut cursor = CursorState::new();
        cursor.pos = 5;
        assert_eq!(cursor.row("halo\n", 20), 1);
    }

    #[test]
    fn scroll_follows_cursor_within_window() {
        let buffer = "1\n2\n3\n4\n5\n6";
        let mut cursor = CursorState::new();
        cursor.pos = buffer.len();
        cursor.update_scroll_offset(buffer, 20, 3);
        assert_eq!(cursor.scroll_offset, 3);

        cursor.pos = 0;
        cursor.update_scroll_offset(buffer, 20, 3);
        assert_eq!(cursor.scroll_offset, 0);

        cursor.update_scroll_offset(buffer, 20, 10);
        assert_eq!(cursor.scroll_offset, 0);
    }

    #[test]
    fn screen_pos_is_inside_borders() {
        let mut cursor = CursorState::new();
        cursor.pos = 3;
        let area = Rect::new(5, 10, 20, 3);
        assert_eq!(cursor.screen_pos("abc", area), (5 + 2 + 3, 11));
    }

    #[test]
    fn wide_chars_take_two_columns() {
        let mut cursor = CursorState::new();
        cursor.pos = "日本".len();
        let area = Rect::new(0, 0, 20, 3);
        assert_eq!(cursor.screen_pos("日本", area), (2 + 4, 1));
    }
}
