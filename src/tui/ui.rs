use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::core::state::{App, View};
use crate::tui::component::Component;
use crate::tui::components::sidebar::SIDEBAR_WIDTH;
use crate::tui::components::{Header, Landing, MessageList, Sidebar, Toast};
use crate::tui::{InputMode, TuiState};

/// Terminals at least this wide get the fixed sidebar column.
pub const WIDE_BREAKPOINT: u16 = 100;

pub const COMPACT_HINT: &str = "Enter kirim · Esc pilih pesan";
pub const FULL_HINT: &str = "Enter kirim · Ctrl+J baris baru · Esc pilih pesan · Ctrl+N chat baru";
pub const CURSOR_HINT: &str = "↑↓ pilih · c salin · d unduh · Enter kembali";

pub fn is_wide(width: u16) -> bool {
    width >= WIDE_BREAKPOINT
}

pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState, spinner_frame: usize) {
    let area = frame.area();

    let main = if is_wide(area.width) {
        let [sidebar_area, main] =
            Layout::horizontal([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)])
                .areas(area);
        Sidebar {
            state: &tui.sidebar,
            user: app.user.as_ref(),
            auth_pending: app.auth_pending,
            overlay: false,
        }
        .render(frame, sidebar_area);
        main
    } else {
        let [header_area, main] =
            Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).areas(area);
        Header {
            user: app.user.as_ref(),
            drawer_open: tui.sidebar.drawer_open,
        }
        .render(frame, header_area);
        main
    };

    match app.view {
        View::Landing => Landing::new(&mut tui.landing).render(frame, main),
        View::Chat => draw_chat(frame, main, app, tui, spinner_frame),
    }

    if tui.sidebar.drawer_open && !is_wide(area.width) {
        let height = (tui.sidebar.entries().len() as u16 + 2).min(main.height);
        let drawer = Rect::new(main.x, main.y, (SIDEBAR_WIDTH + 2).min(main.width), height);
        Sidebar {
            state: &tui.sidebar,
            user: app.user.as_ref(),
            auth_pending: app.auth_pending,
            overlay: true,
        }
        .render(frame, drawer);
    }

    if let Some(notification) = &app.notification {
        Toast { notification }.render(frame, area);
    }
}

fn draw_chat(frame: &mut Frame, area: Rect, app: &App, tui: &mut TuiState, spinner_frame: usize) {
    let outcome = tui.composer.resize(area.width, Some(area.height));
    let reserve = outcome
        .list_padding
        .unwrap_or(tui.composer.height() + 2)
        .min(area.height);

    let [list_area, reserve_area] =
        Layout::vertical([Constraint::Min(0), Constraint::Length(reserve)]).areas(area);
    let [_, composer_area, hint_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(tui.composer.height()),
        Constraint::Length(1),
    ])
    .areas(reserve_area);

    MessageList::new(
        &mut tui.message_list,
        app.conversation.messages(),
        app.is_loading,
        spinner_frame,
    )
    .render(frame, list_area);

    tui.composer.render(frame, composer_area);

    let hint = match tui.input_mode {
        InputMode::Cursor => CURSOR_HINT,
        InputMode::Input if tui.composer.is_compact() => COMPACT_HINT,
        InputMode::Input => FULL_HINT,
    };
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            hint,
            Style::default().fg(Color::DarkGray),
        )))
        .centered(),
        hint_area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::state::{Notification, NotificationKind};
    use crate::identity::UserProfile;
    use crate::test_support::test_app;
    use crate::tui::components::landing::{HERO, TAGLINE};
    use crate::tui::components::message_list::EMPTY_TITLE;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn render(app: &App, tui: &mut TuiState, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        tui.sync_props(app);
        terminal.draw(|f| draw_ui(f, app, tui, 0)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    // ==========================================================================
    // Layout
    // ==========================================================================

    #[test]
    fn narrow_landing_shows_header_and_hero() {
        let app = test_app();
        let mut tui = TuiState::new();
        let text = render(&app, &mut tui, 60, 24);
        assert!(text.starts_with("☰ 360 AI HIMASIF"));
        assert!(text.contains(TAGLINE));
        assert!(text.contains("Tentang HIMASIF"));
        assert!(!text.contains("CHAT BARU"));
    }

    #[test]
    fn wide_layout_shows_sidebar() {
        let app = test_app();
        let mut tui = TuiState::new();
        let text = render(&app, &mut tui, 120, 24);
        assert!(text.contains("CHAT BARU"));
        assert!(text.contains("Agenda"));
        assert!(text.contains(HERO));
        assert!(!text.contains("☰"));
    }

    #[test]
    fn drawer_overlays_narrow_layout() {
        let app = test_app();
        let mut tui = TuiState::new();
        tui.sidebar.toggle(false);
        let text = render(&app, &mut tui, 60, 24);
        assert!(text.contains("Menu"));
        assert!(text.contains("CHAT BARU"));
    }

    #[test]
    fn signed_in_user_appears_in_sidebar() {
        let mut app = test_app();
        app.user = Some(UserProfile::named("Sari"));
        let mut tui = TuiState::new();
        let text = render(&app, &mut tui, 120, 24);
        assert!(text.contains("▸ Sari"));
        assert!(!text.contains("Masuk"));
    }

    // ==========================================================================
    // Chat view
    // ==========================================================================

    #[test]
    fn empty_chat_shows_empty_state_and_hint() {
        let mut app = test_app();
        app.view = View::Chat;
        let mut tui = TuiState::new();
        let text = render(&app, &mut tui, 80, 24);
        assert!(text.contains(EMPTY_TITLE));
        assert!(text.contains(COMPACT_HINT));
        assert!(text.contains("Tanya sesuatu..."));
    }

    #[test]
    fn chat_shows_messages() {
        let mut app = test_app();
        app.view = View::Chat;
        app.conversation.push_user("Siapa ketua?");
        app.conversation.push_bot("Ketua HIMASIF adalah Andi.");
        let mut tui = TuiState::new();
        let text = render(&app, &mut tui, 80, 24);
        assert!(text.contains("Siapa ketua?"));
        assert!(text.contains("Andi."));
        assert!(!text.contains(EMPTY_TITLE));
    }

    #[test]
    fn cursor_mode_changes_hint() {
        let mut app = test_app();
        app.view = View::Chat;
        app.conversation.push_bot("halo");
        let mut tui = TuiState::new();
        tui.input_mode = InputMode::Cursor;
        tui.message_list.selected_index = Some(0);
        let text = render(&app, &mut tui, 80, 24);
        assert!(text.contains(CURSOR_HINT));
    }

    #[test]
    fn loading_chat_shows_typing_bubble() {
        let mut app = test_app();
        app.view = View::Chat;
        app.conversation.push_user("halo");
        app.is_loading = true;
        let mut tui = TuiState::new();
        let text = render(&app, &mut tui, 80, 24);
        assert!(text.contains("sedang mengetik"));
        assert!(text.contains("menunggu jawaban"));
    }

    #[test]
    fn notification_draws_toast() {
        let mut app = test_app();
        app.notification = Some(Notification::new(NotificationKind::Success, "Berhasil masuk"));
        let mut tui = TuiState::new();
        let text = render(&app, &mut tui, 80, 24);
        assert!(text.contains("Berhasil masuk"));
    }
}
