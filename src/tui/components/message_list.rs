//! # MessageList Component
//!
//! Scrollable view of the conversation.
//!
//! ## Responsibilities
//!
//! - Display the messages, the empty state and the typing indicator
//! - Keep the view pinned to the bottom until the user scrolls away
//! - Cache formatted bodies and heights per message
//!
//! ## Architecture
//!
//! `MessageList` is a transient component (created each frame) that wraps
//! `&'a mut MessageListState` (persistent state) and the message slice
//! (props). `Component::render` takes `&mut self`, so the layout cache and
//! scroll state are updated during the render pass.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Position, Rect, Size};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, BorderType, Padding, Paragraph};
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::core::conversation::{Message as ChatMessage, MessageId};
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::message::{Message, render_body};
use crate::tui::event::TuiEvent;

const SPINNER: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
/// Bordered "typing" bubble: borders plus one row.
const TYPING_HEIGHT: u16 = 3;

pub const EMPTY_TITLE: &str = "Mulai Percakapan";
pub const EMPTY_SUBTITLE: &str = "Tanyakan apapun tentang HIMASIF, dan AI saya akan siap membantu!";

/// Layout and scroll state for the message list.
/// Must be persisted in the parent TuiState.
pub struct MessageListState {
    pub scroll_state: ScrollViewState,
    pub layout: LayoutCache,
    /// When true, auto-scroll to bottom on new content
    pub stick_to_bottom: bool,
    /// Selected message index (Cursor mode)
    pub selected_index: Option<usize>,
    /// Last known viewport height (for scroll clamping between frames)
    pub viewport_height: u16,
}

impl Default for MessageListState {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageListState {
    pub fn new() -> Self {
        Self {
            scroll_state: ScrollViewState::default(),
            layout: LayoutCache::new(),
            stick_to_bottom: true,
            selected_index: None,
            viewport_height: 0,
        }
    }

    fn max_offset(&self) -> u16 {
        self.layout
            .total_height()
            .saturating_sub(self.viewport_height)
    }

    /// Clamp scroll offset so it never exceeds the content bounds.
    pub fn clamp_scroll(&mut self) {
        let max_y = self.max_offset();
        let current = self.scroll_state.offset();
        if current.y > max_y {
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }

    /// Re-engage auto-scroll once the user has scrolled to the end.
    pub fn repin_if_at_bottom(&mut self) {
        let max_y = self.max_offset();
        let current = self.scroll_state.offset();
        if current.y >= max_y {
            self.stick_to_bottom = true;
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }

    pub fn scroll_to_bottom(&mut self) {
        self.stick_to_bottom = true;
        self.scroll_state.scroll_to_bottom();
    }

    pub fn is_at_bottom(&self) -> bool {
        self.stick_to_bottom || self.scroll_state.offset().y >= self.max_offset()
    }

    /// Scroll the viewport so the selected message is fully visible.
    /// A message taller than the viewport is aligned by its top edge.
    pub fn scroll_to_selected(&mut self) {
        let Some(idx) = self.selected_index else {
            return;
        };
        let Some(&bottom) = self.layout.prefix_heights.get(idx) else {
            return;
        };
        let top = bottom - self.layout.heights[idx];
        let offset_y = self.scroll_state.offset().y;

        if top < offset_y {
            self.scroll_state.set_offset(Position { x: 0, y: top });
            self.stick_to_bottom = false;
        } else if bottom > offset_y + self.viewport_height {
            let new_y = bottom.saturating_sub(self.viewport_height).min(top);
            self.scroll_state.set_offset(Position { x: 0, y: new_y });
            self.stick_to_bottom = new_y >= self.max_offset();
        }
    }

    /// Move the selection up, starting from the newest message.
    pub fn select_previous(&mut self, count: usize) {
        if count == 0 {
            return;
        }
        self.selected_index = Some(match self.selected_index {
            Some(idx) => idx.saturating_sub(1),
            None => count - 1,
        });
        self.scroll_to_selected();
    }

    pub fn select_next(&mut self, count: usize) {
        if count == 0 {
            return;
        }
        self.selected_index = Some(match self.selected_index {
            Some(idx) => (idx + 1).min(count - 1),
            None => count - 1,
        });
        self.scroll_to_selected();
    }

    /// Back to a fresh, bottom-pinned list (new chat).
    pub fn reset(&mut self) {
        self.selected_index = None;
        self.scroll_state = ScrollViewState::default();
        self.stick_to_bottom = true;
    }
}

/// Scrollable conversation view component.
/// Created fresh each frame with references to state and data.
pub struct MessageList<'a> {
    pub state: &'a mut MessageListState,
    pub messages: &'a [ChatMessage],
    pub is_loading: bool,
    pub spinner_frame: usize,
}

impl<'a> MessageList<'a> {
    pub fn new(
        state: &'a mut MessageListState,
        messages: &'a [ChatMessage],
        is_loading: bool,
        spinner_frame: usize,
    ) -> Self {
        Self {
            state,
            messages,
            is_loading,
            spinner_frame,
        }
    }

    fn render_empty(frame: &mut Frame, area: Rect) {
        let [_, title, subtitle, _] = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(2),
            Constraint::Length(2),
            Constraint::Fill(1),
        ])
        .areas(area);

        frame.render_widget(
            Paragraph::new(EMPTY_TITLE)
                .alignment(Alignment::Center)
                .style(Style::default().add_modifier(Modifier::BOLD)),
            title,
        );
        frame.render_widget(
            Paragraph::new(EMPTY_SUBTITLE)
                .alignment(Alignment::Center)
                .wrap(ratatui::widgets::Wrap { trim: true })
                .style(Style::default().fg(Color::DarkGray)),
            subtitle,
        );
    }

    fn typing_bubble(&self) -> Paragraph<'static> {
        let frame = SPINNER[self.spinner_frame % SPINNER.len()];
        let style = Style::default().fg(Color::Blue).add_modifier(Modifier::DIM);
        Paragraph::new(Line::from(vec![
            Span::styled(format!("{frame} "), Style::default().fg(Color::Blue)),
            Span::styled(
                "sedang mengetik…",
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            ),
        ]))
        .block(
            Block::bordered()
                .title(" 360 AI ")
                .border_type(BorderType::Rounded)
                .border_style(style)
                .title_style(style)
                .padding(Padding::horizontal(1)),
        )
    }

    fn render_scroll_hint(frame: &mut Frame, area: Rect) {
        let label = " ↓ End ";
        let width = (label.chars().count() as u16).min(area.width);
        if area.height == 0 || width == 0 {
            return;
        }
        let hint = Rect::new(
            area.x + area.width.saturating_sub(width + 2),
            area.y + area.height - 1,
            width,
            1,
        );
        frame.render_widget(
            Paragraph::new(label).style(
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            hint,
        );
    }
}

impl Component for MessageList<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        self.state.viewport_height = area.height;

        if self.messages.is_empty() && !self.is_loading {
            self.state.layout.sync(self.messages, 0);
            Self::render_empty(frame, area);
            return;
        }

        let content_width = area.width.saturating_sub(1); // scrollbar column
        self.state.layout.sync(self.messages, content_width);

        let messages_height = self.state.layout.total_height();
        let typing = if self.is_loading { TYPING_HEIGHT } else { 0 };
        let canvas_height = messages_height.saturating_add(typing);

        if !self.state.stick_to_bottom {
            self.state.clamp_scroll();
        }

        let scroll_offset = self.state.scroll_state.offset().y;
        let visible = self.state.layout.visible_range(scroll_offset, area.height);

        let mut scroll_view = ScrollView::new(Size::new(content_width, canvas_height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Always)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);

        for i in visible {
            let height = self.state.layout.heights[i];
            let top = self.state.layout.prefix_heights[i] - height;
            let is_selected = self.state.selected_index == Some(i);
            let message = Message::new(&self.messages[i], self.state.layout.body(i), is_selected);
            scroll_view.render_widget(message, Rect::new(0, top, content_width, height));
        }

        if self.is_loading {
            let rect = Rect::new(0, messages_height, content_width, TYPING_HEIGHT);
            scroll_view.render_widget(self.typing_bubble(), rect);
        }

        if self.state.stick_to_bottom {
            self.state.scroll_state.scroll_to_bottom();
        }

        frame.render_stateful_widget(scroll_view, area, &mut self.state.scroll_state);

        let overflow = canvas_height > area.height;
        if overflow && !self.state.is_at_bottom() {
            Self::render_scroll_hint(frame, area);
        }
    }
}

/// Lives on `MessageListState` since the state persists across frames while
/// `MessageList` is rebuilt each one.
impl EventHandler for MessageListState {
    type Event = ();

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::ScrollUp => {
                self.scroll_state.scroll_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollDown => {
                self.scroll_state.scroll_down();
                self.repin_if_at_bottom();
            }
            TuiEvent::ScrollPageUp => {
                self.scroll_state.scroll_page_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollPageDown => {
                self.scroll_state.scroll_page_down();
                self.repin_if_at_bottom();
            }
            TuiEvent::ScrollToBottom => self.scroll_to_bottom(),
            _ => {}
        }
        None
    }
}

/// Formatted bodies and measured heights, one entry per message.
///
/// Messages never change after they are appended, so an entry stays valid
/// while its id sits at the same index. Heights also depend on the width.
pub struct LayoutCache {
    pub heights: Vec<u16>,
    pub prefix_heights: Vec<u16>,
    bodies: Vec<(MessageId, Text<'static>)>,
    content_width: u16,
}

impl Default for LayoutCache {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutCache {
    pub fn new() -> Self {
        Self {
            heights: Vec::new(),
            prefix_heights: Vec::new(),
            bodies: Vec::new(),
            content_width: 0,
        }
    }

    /// Leading cache entries that still match `messages`.
    pub fn reusable_count(&self, messages: &[ChatMessage]) -> usize {
        self.bodies
            .iter()
            .zip(messages)
            .take_while(|((id, _), message)| *id == message.id)
            .count()
    }

    pub fn sync(&mut self, messages: &[ChatMessage], content_width: u16) {
        let keep = self.reusable_count(messages);
        self.bodies.truncate(keep);
        let keep_heights = if content_width == self.content_width {
            keep
        } else {
            0
        };
        self.heights.truncate(keep_heights);

        self.bodies
            .extend(messages[keep..].iter().map(|m| (m.id, render_body(m))));
        for (_, body) in &self.bodies[self.heights.len()..] {
            self.heights
                .push(Message::calculate_height(body, content_width));
        }

        self.content_width = content_width;
        self.rebuild_prefix_heights();
    }

    pub fn body(&self, idx: usize) -> &Text<'static> {
        &self.bodies[idx].1
    }

    pub fn total_height(&self) -> u16 {
        self.prefix_heights.last().copied().unwrap_or(0)
    }

    pub fn rebuild_prefix_heights(&mut self) {
        self.prefix_heights = self
            .heights
            .iter()
            .scan(0u16, |acc, &h| {
                *acc = acc.saturating_add(h);
                Some(*acc)
            })
            .collect();
    }

    /// Items overlapping the viewport, plus half a viewport either side.
    pub fn visible_range(&self, scroll_offset: u16, viewport_height: u16) -> std::ops::Range<usize> {
        let buffer = viewport_height / 2;
        let buffered_start = scroll_offset.saturating_sub(buffer);
        let buffered_end = scroll_offset
            .saturating_add(viewport_height)
            .saturating_add(buffer);

        let start = self
            .prefix_heights
            .partition_point(|&end| end <= buffered_start);
        let end = self
            .prefix_heights
            .partition_point(|&end| end < buffered_end)
            .saturating_add(1)
            .min(self.prefix_heights.len());

        start..end
    }
}
