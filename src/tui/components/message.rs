use chrono::{DateTime, Local};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Text};
use ratatui::widgets::{Block, BorderType, Padding, Paragraph, Widget, Wrap};

use crate::core::conversation::{Message as ChatMessage, Sender};
use crate::core::format::format;
use crate::tui::component::Component;
use crate::tui::rich_text;

/// Horizontal padding (per side) between the border and text content.
const CONTENT_PAD_H: u16 = 1;
/// Borders (1 left + 1 right) and padding.
const HORIZONTAL_OVERHEAD: u16 = 2 + CONTENT_PAD_H * 2;
/// Borders (1 top + 1 bottom).
const VERTICAL_OVERHEAD: u16 = 2;

/// Key hint shown on a selected bot message.
pub const ACTION_HINT: &str = " c salin · d unduh ";

fn sender_color(sender: Sender) -> Color {
    match sender {
        Sender::User => Color::Green,
        Sender::Bot => Color::Blue,
    }
}

/// Format a message and turn it into styled terminal text.
pub fn render_body(message: &ChatMessage) -> Text<'static> {
    let color = sender_color(message.sender);
    rich_text::render(&format(&message.text, message.is_bot()), color)
}

/// A transient component that renders one chat bubble.
///
/// The body is pre-rendered (see [`render_body`]) and owned by the parent
/// list's cache, so formatting runs once per message instead of per frame.
#[derive(Clone, Copy)]
pub struct Message<'a> {
    pub message: &'a ChatMessage,
    pub body: &'a Text<'static>,
    /// Selected in Cursor mode
    pub is_selected: bool,
}

impl<'a> Message<'a> {
    pub fn new(message: &'a ChatMessage, body: &'a Text<'static>, is_selected: bool) -> Self {
        Self {
            message,
            body,
            is_selected,
        }
    }

    /// Rendered height at `width`, borders included.
    ///
    /// Uses the same `Paragraph` that `render` draws, so the list's layout
    /// cache and the actual frame agree.
    pub fn calculate_height(body: &Text<'static>, width: u16) -> u16 {
        let content_width = width.saturating_sub(HORIZONTAL_OVERHEAD);
        if content_width == 0 {
            return 1;
        }
        if body.lines.is_empty() {
            return VERTICAL_OVERHEAD;
        }
        let lines = paragraph(body).line_count(content_width);
        u16::try_from(lines.max(1))
            .unwrap_or(u16::MAX)
            .saturating_add(VERTICAL_OVERHEAD)
    }
}

fn paragraph(body: &Text<'static>) -> Paragraph<'static> {
    Paragraph::new(body.clone()).wrap(Wrap { trim: false })
}

/// "HH:MM" in local time, or nothing for an unparseable stamp.
fn clock(timestamp: &str) -> Option<String> {
    DateTime::parse_from_rfc3339(timestamp)
        .ok()
        .map(|t| t.with_timezone(&Local).format("%H:%M").to_string())
}

impl Widget for Message<'_> {
    fn render(self, area: Rect, buf: &mut ratatui::buffer::Buffer) {
        let color = sender_color(self.message.sender);
        let role = match self.message.sender {
            Sender::User => " Anda ",
            Sender::Bot => " 360 AI ",
        };

        let border_style = if self.is_selected {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(color).add_modifier(Modifier::DIM)
        };

        let mut block = Block::bordered()
            .title(role)
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title_style(border_style)
            .padding(Padding::horizontal(CONTENT_PAD_H));
        if let Some(time) = clock(&self.message.timestamp) {
            block = block.title(Line::from(format!(" {time} ")).right_aligned());
        }
        if self.is_selected && self.message.is_bot() {
            block = block.title_bottom(Line::from(ACTION_HINT).right_aligned());
        }

        let inner = block.inner(area);
        block.render(area, buf);
        paragraph(self.body).render(inner, buf);
    }
}

impl Component for Message<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(*self, area);
    }
}
