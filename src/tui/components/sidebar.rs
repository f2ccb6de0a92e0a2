//! # Sidebar Component
//!
//! Navigation column on wide terminals and overlay drawer on narrow ones.
//! Both show the same entries:
//!
//! ```text
//! 360 AI            ← home (landing)
//! + CHAT BARU
//!   Beranda
//!   Agenda
//!   Dokumen
//!   Kontak
//! Masuk | <name>    ← sign in, or the account menu when signed in
//!   Keluar          ← only while the account menu is open
//! ```
//!
//! Ctrl+B reaches this component as a bare toggle: on narrow terminals it
//! opens or closes the drawer, on wide ones it moves focus here.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Padding, Paragraph};

use crate::core::state::NavItem;
use crate::identity::UserProfile;
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

/// Width of the sidebar column, borders included.
pub const SIDEBAR_WIDTH: u16 = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SidebarEntry {
    Home,
    NewChat,
    Nav(NavItem),
    SignIn,
    Account,
    SignOut,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SidebarEvent {
    GoHome,
    NewChat,
    Open(NavItem),
    SignIn,
    SignOut,
    /// Esc: hand focus back to the composer.
    Dismiss,
}

pub struct SidebarState {
    pub selected: usize,
    /// Keyboard focus is in the sidebar (wide layout).
    pub focused: bool,
    /// Drawer overlay is shown (narrow layout).
    pub drawer_open: bool,
    pub account_open: bool,
    /// Prop synced from App each loop turn.
    pub signed_in: bool,
}

impl Default for SidebarState {
    fn default() -> Self {
        Self::new()
    }
}

impl SidebarState {
    pub fn new() -> Self {
        Self {
            selected: 0,
            focused: false,
            drawer_open: false,
            account_open: false,
            signed_in: false,
        }
    }

    pub fn entries(&self) -> Vec<SidebarEntry> {
        let mut entries = vec![SidebarEntry::Home, SidebarEntry::NewChat];
        entries.extend(NavItem::ALL.into_iter().map(SidebarEntry::Nav));
        if self.signed_in {
            entries.push(SidebarEntry::Account);
            if self.account_open {
                entries.push(SidebarEntry::SignOut);
            }
        } else {
            entries.push(SidebarEntry::SignIn);
        }
        entries
    }

    /// Whether keys should be routed here.
    pub fn is_active(&self) -> bool {
        self.focused || self.drawer_open
    }

    /// The menu signal. `wide` picks focus over the drawer.
    pub fn toggle(&mut self, wide: bool) {
        if wide {
            self.drawer_open = false;
            self.focused = !self.focused;
        } else {
            self.drawer_open = !self.drawer_open;
            self.focused = false;
        }
        self.account_open = false;
    }

    pub fn close(&mut self) {
        self.focused = false;
        self.drawer_open = false;
        self.account_open = false;
    }

    fn activate(&mut self, entry: SidebarEntry) -> Option<SidebarEvent> {
        let event = match entry {
            SidebarEntry::Account => {
                self.account_open = !self.account_open;
                return None;
            }
            SidebarEntry::Home => SidebarEvent::GoHome,
            SidebarEntry::NewChat => SidebarEvent::NewChat,
            SidebarEntry::Nav(item) => SidebarEvent::Open(item),
            SidebarEntry::SignIn => SidebarEvent::SignIn,
            SidebarEntry::SignOut => SidebarEvent::SignOut,
        };
        self.close();
        Some(event)
    }
}

impl EventHandler for SidebarState {
    type Event = SidebarEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        let entries = self.entries();
        self.selected = self.selected.min(entries.len() - 1);
        match event {
            TuiEvent::CursorUp | TuiEvent::BackTab => {
                self.selected = self.selected.checked_sub(1).unwrap_or(entries.len() - 1);
                None
            }
            TuiEvent::CursorDown | TuiEvent::Tab => {
                self.selected = (self.selected + 1) % entries.len();
                None
            }
            TuiEvent::Submit => self.activate(entries[self.selected]),
            TuiEvent::Escape => {
                self.close();
                Some(SidebarEvent::Dismiss)
            }
            _ => None,
        }
    }
}

/// Transient sidebar view. `overlay` draws it as the narrow-layout drawer.
pub struct Sidebar<'a> {
    pub state: &'a SidebarState,
    pub user: Option<&'a UserProfile>,
    pub auth_pending: bool,
    pub overlay: bool,
}

impl Sidebar<'_> {
    fn label(&self, entry: SidebarEntry) -> Line<'static> {
        match entry {
            SidebarEntry::Home => Line::from(Span::styled(
                "360 AI",
                Style::default()
                    .fg(Color::LightBlue)
                    .add_modifier(Modifier::BOLD),
            )),
            SidebarEntry::NewChat => Line::from(Span::styled(
                "+ CHAT BARU",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            SidebarEntry::Nav(item) => Line::from(format!("  {}", item.label())),
            SidebarEntry::SignIn if self.auth_pending => Line::from(Span::styled(
                "Memproses...",
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            )),
            SidebarEntry::SignIn => Line::from(Span::styled(
                "Masuk",
                Style::default().fg(Color::Green),
            )),
            SidebarEntry::Account => {
                let name = self
                    .user
                    .map(|u| u.display_name.as_str())
                    .filter(|n| !n.is_empty())
                    .unwrap_or("Akun");
                let marker = if self.state.account_open { "▾" } else { "▸" };
                Line::from(Span::styled(
                    format!("{marker} {name}"),
                    Style::default().fg(Color::Green),
                ))
            }
            SidebarEntry::SignOut => Line::from(Span::styled(
                "  Keluar",
                Style::default().fg(Color::Red),
            )),
        }
    }
}

impl Component for Sidebar<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let highlight = self.state.is_active();
        let lines: Vec<Line> = self
            .state
            .entries()
            .into_iter()
            .enumerate()
            .map(|(i, entry)| {
                let line = self.label(entry);
                if highlight && i == self.state.selected {
                    line.patch_style(Style::default().add_modifier(Modifier::REVERSED))
                } else {
                    line
                }
            })
            .collect();

        let border_style = if highlight {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let block = if self.overlay {
            frame.render_widget(Clear, area);
            Block::bordered()
                .border_type(BorderType::Rounded)
                .title(" Menu ")
        } else {
            Block::new().borders(Borders::RIGHT)
        }
        .border_style(border_style)
        .padding(Padding::horizontal(1));

        frame.render_widget(Paragraph::new(lines).block(block), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn focused(signed_in: bool) -> SidebarState {
        let mut state = SidebarState::new();
        state.signed_in = signed_in;
        state.toggle(true);
        state
    }

    fn select(state: &mut SidebarState, entry: SidebarEntry) {
        state.selected = state
            .entries()
            .iter()
            .position(|e| *e == entry)
            .expect("entry present");
    }

    #[test]
    fn signed_out_entries_end_with_sign_in() {
        let state = SidebarState::new();
        let entries = state.entries();
        assert_eq!(entries.len(), 7);
        assert_eq!(entries[0], SidebarEntry::Home);
        assert_eq!(entries.last(), Some(&SidebarEntry::SignIn));
    }

    #[test]
    fn account_menu_reveals_sign_out() {
        let mut state = focused(true);
        select(&mut state, SidebarEntry::Account);

        assert_eq!(state.handle_event(&TuiEvent::Submit), None);
        assert!(state.account_open);
        assert_eq!(state.entries().last(), Some(&SidebarEntry::SignOut));

        state.handle_event(&TuiEvent::CursorDown);
        assert_eq!(state.handle_event(&TuiEvent::Submit), Some(SidebarEvent::SignOut));
        assert!(!state.is_active());
    }

    #[test]
    fn navigation_wraps() {
        let mut state = focused(false);
        state.handle_event(&TuiEvent::CursorUp);
        assert_eq!(state.selected, 6);
        state.handle_event(&TuiEvent::CursorDown);
        assert_eq!(state.selected, 0);
    }

    #[test]
    fn activating_entry_closes_drawer() {
        let mut state = SidebarState::new();
        state.toggle(false);
        assert!(state.drawer_open);

        select(&mut state, SidebarEntry::Nav(NavItem::Agenda));
        assert_eq!(
            state.handle_event(&TuiEvent::Submit),
            Some(SidebarEvent::Open(NavItem::Agenda))
        );
        assert!(!state.drawer_open);
    }

    #[test]
    fn toggle_is_a_bare_signal() {
        let mut state = SidebarState::new();
        state.toggle(false);
        state.toggle(false);
        assert!(!state.drawer_open);

        state.toggle(true);
        assert!(state.focused);
        assert!(!state.drawer_open);
    }

    #[test]
    fn escape_dismisses() {
        let mut state = focused(false);
        assert_eq!(state.handle_event(&TuiEvent::Escape), Some(SidebarEvent::Dismiss));
        assert!(!state.focused);
    }

    #[test]
    fn render_shows_user_name_and_pending_label() {
        let mut terminal = Terminal::new(TestBackend::new(SIDEBAR_WIDTH, 10)).unwrap();
        let user = UserProfile::named("Rina");
        let mut state = SidebarState::new();
        state.signed_in = true;

        terminal
            .draw(|f| {
                Sidebar {
                    state: &state,
                    user: Some(&user),
                    auth_pending: false,
                    overlay: false,
                }
                .render(f, f.area())
            })
            .unwrap();
        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("Rina"));
        assert!(text.contains("CHAT BARU"));

        state.signed_in = false;
        terminal
            .draw(|f| {
                Sidebar {
                    state: &state,
                    user: None,
                    auth_pending: true,
                    overlay: true,
                }
                .render(f, f.area())
            })
            .unwrap();
        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("Memproses..."));
    }
}
