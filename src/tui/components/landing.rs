//! # Landing Page Component
//!
//! Hero, search box and quick prompts shown before a chat starts.
//!
//! ```text
//!            360 AI HIMASIF
//!     selalu aktif, siap membantu
//!  ╭──────────────────────────────╮
//!  │ Cari informasi apapun..      │
//!  ╰──────────────────────────────╯
//!          [ Tentang HIMASIF ]
//!          [ Anggota Pengurus ]
//!
//!          360 AI HIMASIF UPJ
//! ```

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::core::state::QUICK_PROMPTS;
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::input_box::{InputBox, InputEvent};
use crate::tui::event::TuiEvent;

pub const HERO: &str = "360 AI HIMASIF";
pub const TAGLINE: &str = "selalu aktif, siap membantu";
pub const FOOTER: &str = "360 AI HIMASIF UPJ";

const MAX_SEARCH_WIDTH: u16 = 72;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LandingFocus {
    Search,
    Prompt(usize),
}

#[derive(Debug, Clone, PartialEq)]
pub enum LandingEvent {
    /// Free text or a quick prompt's query, to open the chat with.
    Search(String),
}

/// Persistent landing state. Lives in TuiState.
pub struct LandingState {
    pub search: InputBox,
    pub focus: LandingFocus,
}

impl Default for LandingState {
    fn default() -> Self {
        Self::new()
    }
}

impl LandingState {
    pub fn new() -> Self {
        Self {
            search: InputBox::search(),
            focus: LandingFocus::Search,
        }
    }

    fn cycle(&mut self, forward: bool) {
        let count = QUICK_PROMPTS.len();
        self.focus = match (self.focus, forward) {
            (LandingFocus::Search, true) => LandingFocus::Prompt(0),
            (LandingFocus::Search, false) => LandingFocus::Prompt(count - 1),
            (LandingFocus::Prompt(i), true) if i + 1 < count => LandingFocus::Prompt(i + 1),
            (LandingFocus::Prompt(0), false) => LandingFocus::Search,
            (LandingFocus::Prompt(i), false) => LandingFocus::Prompt(i - 1),
            (LandingFocus::Prompt(_), true) => LandingFocus::Search,
        };
    }
}

impl EventHandler for LandingState {
    type Event = LandingEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match (event, self.focus) {
            (TuiEvent::Tab, _) => {
                self.cycle(true);
                None
            }
            (TuiEvent::BackTab, _) => {
                self.cycle(false);
                None
            }
            (TuiEvent::Submit, LandingFocus::Prompt(i)) => QUICK_PROMPTS
                .get(i)
                .map(|prompt| LandingEvent::Search(prompt.query.to_string())),
            (TuiEvent::Escape, LandingFocus::Prompt(_)) => {
                self.focus = LandingFocus::Search;
                None
            }
            // Typing from a prompt button goes back to the search box
            (TuiEvent::InputChar(_) | TuiEvent::Paste(_), LandingFocus::Prompt(_)) => {
                self.focus = LandingFocus::Search;
                self.handle_event(event)
            }
            (_, LandingFocus::Prompt(_)) => None,
            (_, LandingFocus::Search) => match self.search.handle_event(event)? {
                InputEvent::Submit(text) => Some(LandingEvent::Search(text)),
                InputEvent::ContentChanged => None,
            },
        }
    }
}

/// Transient landing view, built each frame.
pub struct Landing<'a> {
    pub state: &'a mut LandingState,
}

impl<'a> Landing<'a> {
    pub fn new(state: &'a mut LandingState) -> Self {
        Self { state }
    }

    fn prompt_line(&self, idx: usize, label: &'static str) -> Line<'static> {
        let focused = self.state.focus == LandingFocus::Prompt(idx);
        let style = if focused {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Cyan)
        };
        Line::from(Span::styled(format!("[ {label} ]"), style))
    }
}

impl Component for Landing<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let search_width = area.width.min(MAX_SEARCH_WIDTH);
        self.state.search.focused = self.state.focus == LandingFocus::Search;
        self.state.search.resize(search_width, Some(area.height));
        let search_height = self.state.search.height();
        let prompts_height = QUICK_PROMPTS.len() as u16;

        let [body, footer] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(area);
        let [hero, tagline, _, search_row, _, prompts] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(search_height),
            Constraint::Length(1),
            Constraint::Length(prompts_height),
        ])
        .flex(Flex::Center)
        .areas(body);

        frame.render_widget(
            Paragraph::new(HERO)
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::LightBlue).add_modifier(Modifier::BOLD)),
            hero,
        );
        frame.render_widget(
            Paragraph::new(TAGLINE)
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC)),
            tagline,
        );

        let [search_area] = Layout::horizontal([Constraint::Length(search_width)])
            .flex(Flex::Center)
            .areas(search_row);
        self.state.search.render(frame, search_area);

        let lines: Vec<Line> = QUICK_PROMPTS
            .iter()
            .enumerate()
            .map(|(i, prompt)| self.prompt_line(i, prompt.label))
            .collect();
        frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), prompts);

        frame.render_widget(
            Paragraph::new(FOOTER)
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::DarkGray)),
            footer,
        );
    }
}
