//! # InputBox Component
//!
//! Auto-growing text input used as the chat composer and the landing
//! search box.
//!
//! ## Responsibilities
//!
//! - Capture text input and editing (backspace, delete, cursor, paste)
//! - Emit `Submit` on Enter when the buffer has visible text
//! - Size itself with [`crate::core::autogrow::resize`] in terminal rows
//! - Scroll internally once the content passes the row cap
//!
//! ## State Management
//!
//! The buffer is internal state. `disabled` and `focused` are props set by
//! the parent each frame. `resize` must run before `render` so the row
//! count matches the width about to be drawn.

mod cursor;
mod layout;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, BorderType, Padding, Paragraph};

use crate::core::autogrow::{GrowOutcome, GrowPolicy, resize};
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

use cursor::CursorState;
use layout::{RowSurface, inner_width, next_char_boundary, prev_char_boundary, wrap_options};

pub use layout::{CHAT_COMPOSER_ROWS, LANDING_SEARCH_ROWS, VERTICAL_OVERHEAD};

/// High-level events emitted by the InputBox
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Enter pressed with non-blank text. Carries the raw buffer.
    Submit(String),
    /// Buffer or cursor changed
    ContentChanged,
}

pub struct InputBox {
    pub buffer: String,
    /// Prop: ignore edits and submits (a request is in flight).
    pub disabled: bool,
    /// Prop: draw the cursor and highlight the border.
    pub focused: bool,
    placeholder: &'static str,
    title: Option<&'static str>,
    policy: GrowPolicy,
    /// The policy's container (box + hint row) exists for this input.
    has_container: bool,
    cursor: CursorState,
    rows: u16,
    compact: bool,
}

impl InputBox {
    /// The chat composer: capped at 40% of the screen, with a hint row.
    pub fn composer() -> Self {
        Self::new("Tanya sesuatu...", CHAT_COMPOSER_ROWS, true)
    }

    /// The landing search box: capped at half the screen.
    pub fn search() -> Self {
        Self::new("Cari informasi apapun..", LANDING_SEARCH_ROWS, false)
    }

    fn new(placeholder: &'static str, policy: GrowPolicy, has_container: bool) -> Self {
        Self {
            buffer: String::new(),
            disabled: false,
            focused: true,
            placeholder,
            title: None,
            policy,
            has_container,
            cursor: CursorState::new(),
            rows: 1,
            compact: true,
        }
    }

    pub fn with_title(mut self, title: &'static str) -> Self {
        self.title = Some(title);
        self
    }

    /// Run one grow pass for a box `width` columns wide in a screen of
    /// `viewport_rows` rows.
    pub fn resize(&mut self, width: u16, viewport_rows: Option<u16>) -> GrowOutcome {
        let mut surface = RowSurface::new(&self.buffer, width, viewport_rows, self.has_container);
        let outcome = resize(&mut surface, &self.policy);
        self.rows = surface.rows.unwrap_or(outcome.height).max(1);
        self.compact = surface.compact;
        self.cursor.last_width = width;
        outcome
    }

    /// Total height including borders, as of the last `resize`.
    pub fn height(&self) -> u16 {
        self.rows + VERTICAL_OVERHEAD
    }

    pub fn is_compact(&self) -> bool {
        self.compact
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
        self.cursor.reset();
    }

    fn visible_text(&self, width: u16) -> String {
        let width = inner_width(width);
        if width == 0 {
            return String::new();
        }
        if self.cursor.scroll_offset == 0 && !self.overflows(width) {
            return self.buffer.clone();
        }

        let lines = textwrap::wrap(&self.buffer, wrap_options(width));
        let start = (self.cursor.scroll_offset as usize).min(lines.len());
        let end = (start + self.rows as usize).min(lines.len());
        lines[start..end].join("\n")
    }

    fn overflows(&self, inner: u16) -> bool {
        layout::wrap_line_count(&self.buffer, inner) > self.rows
    }

    fn render_scrollbar(&self, frame: &mut Frame, area: Rect) {
        use ratatui::widgets::{Scrollbar, ScrollbarOrientation, ScrollbarState};

        let total = layout::wrap_line_count(&self.buffer, inner_width(area.width));
        if total <= self.rows {
            return;
        }

        // content_length is the max scroll position, not the row count
        let mut state = ScrollbarState::default()
            .content_length(total.saturating_sub(self.rows) as usize)
            .position(self.cursor.scroll_offset as usize);

        let bar = Rect {
            x: area.x + area.width.saturating_sub(1),
            y: area.y + 1,
            width: 1,
            height: area.height.saturating_sub(VERTICAL_OVERHEAD),
        };
        frame.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight),
            bar,
            &mut state,
        );
    }
}

impl Component for InputBox {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        self.cursor.last_width = area.width;
        self.cursor
            .update_scroll_offset(&self.buffer, area.width, self.rows);

        let border = match (self.disabled, self.focused) {
            (true, _) => Style::default().fg(Color::DarkGray),
            (false, true) => Style::default().fg(Color::Cyan),
            (false, false) => Style::default(),
        };
        let mut block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border)
            .padding(Padding::horizontal(1));
        if self.disabled {
            block = block.title(" menunggu jawaban… ");
        } else if let Some(title) = self.title {
            block = block.title(format!(" {title} "));
        }

        let paragraph = if self.buffer.is_empty() {
            Paragraph::new(self.placeholder).style(
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            )
        } else {
            let fg = if self.disabled { Color::DarkGray } else { Color::Green };
            Paragraph::new(self.visible_text(area.width)).style(Style::default().fg(fg))
        };
        frame.render_widget(paragraph.block(block), area);
        self.render_scrollbar(frame, area);

        if self.focused && !self.disabled {
            frame.set_cursor_position(self.cursor.screen_pos(&self.buffer, area));
        }
    }
}

impl EventHandler for InputBox {
    type Event = InputEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        if self.disabled {
            return None;
        }
        let pos = self.cursor.pos;
        match event {
            TuiEvent::InputChar(c) => {
                self.buffer.insert(pos, *c);
                self.cursor.pos += c.len_utf8();
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Paste(text) => {
                // Terminals send CR for pasted line breaks
                let text = text.replace("\r\n", "\n").replace('\r', "\n");
                self.buffer.insert_str(pos, &text);
                self.cursor.pos += text.len();
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Backspace => (pos > 0).then(|| {
                let prev = prev_char_boundary(&self.buffer, pos);
                self.buffer.drain(prev..pos);
                self.cursor.pos = prev;
                InputEvent::ContentChanged
            }),
            TuiEvent::Delete => (pos < self.buffer.len()).then(|| {
                let next = next_char_boundary(&self.buffer, pos);
                self.buffer.drain(pos..next);
                InputEvent::ContentChanged
            }),
            TuiEvent::CursorLeft => (pos > 0).then(|| {
                self.cursor.pos = prev_char_boundary(&self.buffer, pos);
                InputEvent::ContentChanged
            }),
            TuiEvent::CursorRight => (pos < self.buffer.len()).then(|| {
                self.cursor.pos = next_char_boundary(&self.buffer, pos);
                InputEvent::ContentChanged
            }),
            TuiEvent::LineStart => {
                let start = self.buffer[..pos].rfind('\n').map_or(0, |i| i + 1);
                (pos != start).then(|| {
                    self.cursor.pos = start;
                    InputEvent::ContentChanged
                })
            }
            TuiEvent::LineEnd => {
                let end = self.buffer[pos..]
                    .find('\n')
                    .map_or(self.buffer.len(), |i| pos + i);
                (pos != end).then(|| {
                    self.cursor.pos = end;
                    InputEvent::ContentChanged
                })
            }
            TuiEvent::CursorUp => self
                .cursor
                .move_vertically(&self.buffer, -1, self.cursor.last_width)
                .then_some(InputEvent::ContentChanged),
            TuiEvent::CursorDown => self
                .cursor
                .move_vertically(&self.buffer, 1, self.cursor.last_width)
                .then_some(InputEvent::ContentChanged),
            TuiEvent::Submit => (!self.buffer.trim().is_empty()).then(|| {
                let text = std::mem::take(&mut self.buffer);
                self.cursor.reset();
                InputEvent::Submit(text)
            }),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn typing_and_backspace() {
        let mut input = InputBox::composer();

        assert_eq!(
            input.handle_event(&TuiEvent::InputChar('a')),
            Some(InputEvent::ContentChanged)
        );
        input.handle_event(&TuiEvent::InputChar('b'));
        assert_eq!(input.buffer, "ab");

        input.handle_event(&TuiEvent::Backspace);
        assert_eq!(input.buffer, "a");
    }

    #[test]
    fn submit_takes_buffer() {
        let mut input = InputBox::composer();
        input.handle_event(&TuiEvent::Paste("  halo  ".into()));

        assert_eq!(
            input.handle_event(&TuiEvent::Submit),
            Some(InputEvent::Submit("  halo  ".into()))
        );
        assert!(input.buffer.is_empty());
    }

    #[test]
    fn blank_submit_is_ignored() {
        let mut input = InputBox::composer();
        input.handle_event(&TuiEvent::Paste(" \n ".into()));
        assert_eq!(input.handle_event(&TuiEvent::Submit), None);
        assert_eq!(input.buffer, " \n ");
    }

    #[test]
    fn disabled_input_ignores_everything() {
        let mut input = InputBox::composer();
        input.buffer = "tunggu".into();
        input.disabled = true;

        assert_eq!(input.handle_event(&TuiEvent::InputChar('x')), None);
        assert_eq!(input.handle_event(&TuiEvent::Submit), None);
        assert_eq!(input.buffer, "tunggu");
    }

    #[test]
    fn pasted_carriage_returns_become_newlines() {
        let mut input = InputBox::search();
        input.handle_event(&TuiEvent::Paste("a\r\nb\rc".into()));
        assert_eq!(input.buffer, "a\nb\nc");
    }

    #[test]
    fn line_start_and_end() {
        let mut input = InputBox::composer();
        input.handle_event(&TuiEvent::Paste("satu\ndua".into()));
        input.handle_event(&TuiEvent::LineStart);
        input.handle_event(&TuiEvent::InputChar('>'));
        assert_eq!(input.buffer, "satu\n>dua");

        input.handle_event(&TuiEvent::CursorUp);
        input.handle_event(&TuiEvent::LineEnd);
        input.handle_event(&TuiEvent::InputChar('!'));
        assert_eq!(input.buffer, "satu!\n>dua");
    }

    #[test]
    fn resize_grows_with_content_until_cap() {
        let mut input = InputBox::composer();
        input.resize(40, Some(30));
        assert_eq!(input.height(), 1 + VERTICAL_OVERHEAD);
        assert!(input.is_compact());

        input.buffer = "baris\n".repeat(4);
        let outcome = input.resize(40, Some(30));
        assert_eq!(outcome.height, 5);
        assert!(!input.is_compact());

        input.buffer = "baris\n".repeat(40);
        let outcome = input.resize(40, Some(30));
        assert_eq!(outcome.height, 12);
        assert_eq!(outcome.list_padding, Some(12 + 3 + 1));
        assert_eq!(input.height(), 12 + VERTICAL_OVERHEAD);
    }

    #[test]
    fn clear_shrinks_back_to_one_row() {
        let mut input = InputBox::composer();
        input.buffer = "a\nb\nc".into();
        input.resize(40, Some(30));
        input.clear();
        input.resize(40, Some(30));
        assert_eq!(input.height(), 1 + VERTICAL_OVERHEAD);
    }

    #[test]
    fn render_shows_placeholder_when_empty() {
        let mut terminal = Terminal::new(TestBackend::new(40, 3)).unwrap();
        let mut input = InputBox::search();
        input.resize(40, Some(24));

        terminal.draw(|f| input.render(f, f.area())).unwrap();

        assert!(screen_text(&terminal).contains("Cari informasi apapun.."));
    }

    #[test]
    fn render_disabled_shows_waiting_title() {
        let mut terminal = Terminal::new(TestBackend::new(40, 3)).unwrap();
        let mut input = InputBox::composer();
        input.disabled = true;
        input.resize(40, Some(24));

        terminal.draw(|f| input.render(f, f.area())).unwrap();

        assert!(screen_text(&terminal).contains("menunggu jawaban"));
    }

    #[test]
    fn render_scrolls_to_cursor_past_cap() {
        let mut terminal = Terminal::new(TestBackend::new(30, 5)).unwrap();
        let mut input = InputBox::composer();
        input.handle_event(&TuiEvent::Paste("l1\nl2\nl3\nl4\nl5\nakhir".into()));
        input.resize(30, Some(8));
        assert_eq!(input.height(), 3 + VERTICAL_OVERHEAD);

        terminal.draw(|f| input.render(f, f.area())).unwrap();

        let text = screen_text(&terminal);
        assert!(text.contains("akhir"));
        assert!(!text.contains("l1"));
    }
}
