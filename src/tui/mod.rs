//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! and translates keyboard events into core::Action values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Redraw Strategy
//!
//! - **Animating** (request in flight): draws every ~80ms for the spinner.
//! - **Idle**: sleeps up to 500ms and only redraws on events, background
//!   actions or an expiring notification.
//!
//! A `SteadyBlock` cursor style is used instead of a blinking cursor because
//! ratatui's `set_cursor_position` resets the terminal's blink timer on every
//! `draw()` call.

mod component;
mod components;
mod event;
mod message_actions;
mod rich_text;
mod ui;

use std::io::stdout;
use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};

use crossterm::cursor::{SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;
use log::{debug, info, warn};

use crate::core::action::{Action, Effect, update};
use crate::core::config::ResolvedConfig;
use crate::core::conversation::Message as ChatMessage;
use crate::core::state::{App, NotificationKind, View};
use crate::identity::{
    DisabledIdentity, GoogleDeviceIdentity, GoogleEndpoints, IdentityProvider, SignInPrompt,
};
use crate::transport::{ChatTransport, HttpChatTransport};
use crate::tui::component::EventHandler;
use crate::tui::components::{
    InputBox, InputEvent, LandingEvent, LandingState, MessageListState, SidebarEvent,
    SidebarState,
};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

/// Non-sticky notifications disappear after this long.
pub const NOTIFICATION_TTL: Duration = Duration::from_secs(4);

pub const COPIED_TEXT: &str = "Berhasil disalin";
pub const COPY_FAILED_TEXT: &str = "Gagal menyalin";
pub const DOWNLOAD_FAILED_TEXT: &str = "Gagal mengunduh";

/// Modal input mode for the chat view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Select messages with arrow keys. Typing switches back to Input.
    Cursor,
    /// Text editing in the composer. Esc switches to Cursor.
    Input,
}

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    pub message_list: MessageListState,
    pub composer: InputBox,
    pub landing: LandingState,
    pub sidebar: SidebarState,
    pub input_mode: InputMode,
}

impl Default for TuiState {
    fn default() -> Self {
        Self::new()
    }
}

impl TuiState {
    pub fn new() -> Self {
        Self {
            message_list: MessageListState::new(),
            composer: InputBox::composer(),
            landing: LandingState::new(),
            sidebar: SidebarState::new(),
            input_mode: InputMode::Input,
        }
    }

    /// Copy App-derived props into the components.
    pub fn sync_props(&mut self, app: &App) {
        self.composer.disabled = app.is_loading;
        self.composer.focused = self.input_mode == InputMode::Input && !self.sidebar.is_active();
        self.sidebar.signed_in = app.is_signed_in();
    }

    fn enter_cursor_mode(&mut self, message_count: usize) {
        self.input_mode = InputMode::Cursor;
        self.message_list.selected_index = None;
        self.message_list.select_previous(message_count);
    }

    fn enter_input_mode(&mut self) {
        self.input_mode = InputMode::Input;
        self.message_list.selected_index = None;
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        // Kitty keyboard protocol lets Shift+Enter through; terminals
        // without it ignore the request.
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            Show,
            SetCursorStyle::SteadyBlock,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )?;
        info!("Terminal modes enabled (mouse, bracketed paste, steady cursor, keyboard enhancement)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            PopKeyboardEnhancementFlags,
            DisableMouseCapture,
            DisableBracketedPaste,
            SetCursorStyle::DefaultUserShape
        );
    }
}

/// Google device flow when credentials are configured, otherwise sign-in
/// is disabled.
pub fn build_identity(config: &ResolvedConfig) -> Arc<dyn IdentityProvider> {
    match &config.google {
        Some(credentials) => Arc::new(GoogleDeviceIdentity::new(
            credentials.client_id.clone(),
            credentials.client_secret.clone(),
            GoogleEndpoints {
                oauth_base: config.oauth_base_url.clone(),
                userinfo_url: config.userinfo_url.clone(),
            },
        )),
        None => {
            info!("Google sign-in not configured");
            Arc::new(DisabledIdentity)
        }
    }
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    let transport: Arc<dyn ChatTransport> = Arc::new(HttpChatTransport::new(&config.backend_url));
    info!("Chat backend: {}", config.backend_url);
    let mut app = App::new(transport, build_identity(&config), config.site_url.clone());
    let mut tui = TuiState::new();

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new()
        .inspect_err(|e| warn!("Terminal modes unavailable: {}", e))
        .ok();

    // Actions from background tasks
    let (tx, rx) = mpsc::channel();

    let start_time = Instant::now();
    let mut needs_redraw = true;
    let mut mounted_view: Option<View> = None;

    'main: loop {
        // Entering the chat view replays a query handed over from the landing page
        if app.view != View::Chat {
            mounted_view = Some(app.view);
        } else if mounted_view != Some(View::Chat) {
            mounted_view = Some(View::Chat);
            tui.enter_input_mode();
            if dispatch(&mut app, &mut tui, Action::ChatMounted, &tx) {
                break;
            }
        }

        if let Some(notification) = &app.notification
            && !notification.sticky
            && notification.raised_at.elapsed() >= NOTIFICATION_TTL
        {
            update(&mut app, Action::DismissNotification);
            needs_redraw = true;
        }

        tui.sync_props(&app);

        let animating = app.is_loading;
        if animating {
            needs_redraw = true;
        }

        if needs_redraw {
            let spinner_frame = (start_time.elapsed().as_secs_f32() * 12.0) as usize;
            terminal.draw(|f| ui::draw_ui(f, &app, &mut tui, spinner_frame))?;
            needs_redraw = false;
        }

        let timeout = if animating {
            Duration::from_millis(80)
        } else {
            Duration::from_millis(500)
        };
        let first_event = poll_event_timeout(timeout);
        if first_event.is_some() {
            needs_redraw = true;
        }

        // Process first event + drain all pending events before next draw
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            let wide = terminal
                .size()
                .map(|size| ui::is_wide(size.width))
                .unwrap_or(true);
            tui.sync_props(&app);
            if handle_event(&mut app, &mut tui, event, wide, &tx) {
                break 'main;
            }
        }

        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            if dispatch(&mut app, &mut tui, action, &tx) {
                break 'main;
            }
        }
    }

    ratatui::restore();
    Ok(())
}

/// Route one terminal event. Returns true to quit.
fn handle_event(
    app: &mut App,
    tui: &mut TuiState,
    event: TuiEvent,
    wide: bool,
    tx: &mpsc::Sender<Action>,
) -> bool {
    match event {
        TuiEvent::Resize => return false,
        TuiEvent::ForceQuit => return dispatch(app, tui, Action::Quit, tx),
        TuiEvent::ToggleSidebar => {
            tui.sidebar.toggle(wide);
            return false;
        }
        TuiEvent::NewChat => return dispatch(app, tui, Action::NewChat, tx),
        _ => {}
    }

    if tui.sidebar.is_active() {
        let action = match tui.sidebar.handle_event(&event) {
            Some(SidebarEvent::GoHome) => Action::GoHome,
            Some(SidebarEvent::NewChat) => Action::NewChat,
            Some(SidebarEvent::Open(item)) => Action::OpenNavItem(item),
            Some(SidebarEvent::SignIn) => Action::SignInRequested,
            Some(SidebarEvent::SignOut) => Action::SignOutRequested,
            Some(SidebarEvent::Dismiss) | None => return false,
        };
        return dispatch(app, tui, action, tx);
    }

    // Esc closes a visible notification before anything else
    if matches!(event, TuiEvent::Escape) && app.notification.is_some() {
        return dispatch(app, tui, Action::DismissNotification, tx);
    }

    match app.view {
        View::Landing => match tui.landing.handle_event(&event) {
            Some(LandingEvent::Search(query)) => dispatch(app, tui, Action::Search(query), tx),
            None => false,
        },
        View::Chat => handle_chat_event(app, tui, event, tx),
    }
}

fn handle_chat_event(
    app: &mut App,
    tui: &mut TuiState,
    event: TuiEvent,
    tx: &mpsc::Sender<Action>,
) -> bool {
    if matches!(
        event,
        TuiEvent::ScrollUp
            | TuiEvent::ScrollDown
            | TuiEvent::ScrollPageUp
            | TuiEvent::ScrollPageDown
            | TuiEvent::ScrollToBottom
    ) {
        tui.message_list.handle_event(&event);
        return false;
    }

    let count = app.conversation.len();
    match tui.input_mode {
        InputMode::Input => {
            if matches!(event, TuiEvent::Escape) {
                if count > 0 {
                    tui.enter_cursor_mode(count);
                }
                return false;
            }
            match tui.composer.handle_event(&event) {
                Some(InputEvent::Submit(text)) => dispatch(app, tui, Action::Submit(text), tx),
                Some(InputEvent::ContentChanged) => {
                    tui.message_list.scroll_to_bottom();
                    false
                }
                None => false,
            }
        }
        InputMode::Cursor => match event {
            TuiEvent::CursorUp => {
                tui.message_list.select_previous(count);
                false
            }
            TuiEvent::CursorDown => {
                tui.message_list.select_next(count);
                false
            }
            TuiEvent::InputChar('c') => copy_selected(app, tui, tx),
            TuiEvent::InputChar('d') => download_selected(app, tui, tx),
            TuiEvent::InputChar(_) | TuiEvent::Paste(_) => {
                tui.enter_input_mode();
                tui.composer.handle_event(&event);
                false
            }
            TuiEvent::Submit | TuiEvent::Escape => {
                tui.enter_input_mode();
                false
            }
            _ => false,
        },
    }
}

fn selected_bot_message(app: &App, tui: &TuiState) -> Option<ChatMessage> {
    let idx = tui.message_list.selected_index?;
    app.conversation
        .messages()
        .get(idx)
        .filter(|message| message.is_bot())
        .cloned()
}

fn copy_selected(app: &mut App, tui: &mut TuiState, tx: &mpsc::Sender<Action>) -> bool {
    let Some(message) = selected_bot_message(app, tui) else {
        return false;
    };
    let action = match message_actions::copy_to_clipboard(&message.text) {
        Ok(()) => Action::Notify(NotificationKind::Success, COPIED_TEXT.to_string()),
        Err(e) => {
            warn!("Clipboard write failed: {}", e);
            Action::Notify(NotificationKind::Error, COPY_FAILED_TEXT.to_string())
        }
    };
    dispatch(app, tui, action, tx)
}

fn download_selected(app: &mut App, tui: &mut TuiState, tx: &mpsc::Sender<Action>) -> bool {
    let Some(message) = selected_bot_message(app, tui) else {
        return false;
    };
    let result =
        std::env::current_dir().and_then(|dir| message_actions::download(&message, &dir));
    let action = match result {
        Ok(path) => Action::Notify(
            NotificationKind::Success,
            format!("Berhasil diunduh: {}", path.display()),
        ),
        Err(e) => {
            warn!("Download failed: {}", e);
            Action::Notify(NotificationKind::Error, DOWNLOAD_FAILED_TEXT.to_string())
        }
    };
    dispatch(app, tui, action, tx)
}

/// Run `action` through the reducer and perform its effect.
/// Returns true to quit.
fn dispatch(app: &mut App, tui: &mut TuiState, action: Action, tx: &mpsc::Sender<Action>) -> bool {
    match update(app, action) {
        Effect::None => false,
        Effect::Quit => true,
        Effect::SpawnRequest(text) => {
            tui.message_list.scroll_to_bottom();
            spawn_request(app.transport.clone(), text, tx.clone());
            false
        }
        Effect::ClearComposer => {
            tui.composer.clear();
            tui.message_list.reset();
            tui.enter_input_mode();
            false
        }
        Effect::SignIn => {
            spawn_sign_in(app.identity.clone(), tx.clone());
            false
        }
        Effect::SignOut => {
            spawn_sign_out(app.identity.clone(), tx.clone());
            false
        }
    }
}

fn spawn_request(transport: Arc<dyn ChatTransport>, text: String, tx: mpsc::Sender<Action>) {
    info!("Spawning chat request via {} ({} bytes)", transport.name(), text.len());
    tokio::spawn(async move {
        let action = match transport.send(&text).await {
            Ok(reply) => Action::ReplyReceived(reply),
            Err(e) => Action::RequestFailed(e.to_string()),
        };
        if tx.send(action).is_err() {
            warn!("Failed to deliver chat result: receiver dropped");
        }
    });
}

fn spawn_sign_in(identity: Arc<dyn IdentityProvider>, tx: mpsc::Sender<Action>) {
    info!("Spawning sign-in via {}", identity.name());
    let (prompt_tx, mut prompt_rx) = tokio::sync::mpsc::channel::<SignInPrompt>(4);

    let prompt_forward = tx.clone();
    tokio::spawn(async move {
        while let Some(prompt) = prompt_rx.recv().await {
            if prompt_forward.send(Action::SignInPrompt(prompt)).is_err() {
                warn!("Failed to forward sign-in prompt: receiver dropped");
                return;
            }
        }
    });

    tokio::spawn(async move {
        let action = match identity.sign_in(prompt_tx).await {
            Ok(profile) => Action::SignedIn(profile),
            Err(e) => Action::SignInFailed(e.to_string()),
        };
        if tx.send(action).is_err() {
            warn!("Failed to deliver sign-in result: receiver dropped");
        }
    });
}

fn spawn_sign_out(identity: Arc<dyn IdentityProvider>, tx: mpsc::Sender<Action>) {
    info!("Spawning sign-out via {}", identity.name());
    tokio::spawn(async move {
        let action = match identity.sign_out().await {
            Ok(()) => Action::SignedOut,
            Err(e) => Action::SignOutFailed(e.to_string()),
        };
        if tx.send(action).is_err() {
            warn!("Failed to deliver sign-out result: receiver dropped");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::state::NavItem;
    use crate::identity::UserProfile;
    use crate::test_support::test_app;

    fn setup() -> (App, TuiState, mpsc::Sender<Action>, mpsc::Receiver<Action>) {
        let (tx, rx) = mpsc::channel();
        (test_app(), TuiState::new(), tx, rx)
    }

    fn type_text(app: &mut App, tui: &mut TuiState, tx: &mpsc::Sender<Action>, text: &str) {
        for c in text.chars() {
            handle_event(app, tui, TuiEvent::InputChar(c), true, tx);
        }
    }

    // ==========================================================================
    // Routing
    // ==========================================================================

    #[test]
    fn force_quit_quits_from_anywhere() {
        let (mut app, mut tui, tx, _rx) = setup();
        tui.sidebar.toggle(true);
        assert!(handle_event(&mut app, &mut tui, TuiEvent::ForceQuit, true, &tx));
    }

    #[test]
    fn landing_search_switches_to_chat_with_seed_query() {
        let (mut app, mut tui, tx, _rx) = setup();
        type_text(&mut app, &mut tui, &tx, "jadwal rapat");
        handle_event(&mut app, &mut tui, TuiEvent::Submit, true, &tx);

        assert_eq!(app.view, View::Chat);
        assert_eq!(app.nav_query.as_deref(), Some("jadwal rapat"));
        assert!(app.conversation.is_empty());
    }

    #[test]
    fn sidebar_routes_nav_items_to_actions() {
        let (mut app, mut tui, tx, _rx) = setup();
        handle_event(&mut app, &mut tui, TuiEvent::ToggleSidebar, true, &tx);
        assert!(tui.sidebar.focused);

        // Home, NewChat, Beranda, Agenda
        for _ in 0..3 {
            handle_event(&mut app, &mut tui, TuiEvent::CursorDown, true, &tx);
        }
        handle_event(&mut app, &mut tui, TuiEvent::Submit, true, &tx);

        let notification = app.notification.as_ref().expect("nav notification");
        assert!(notification.text.contains(NavItem::Agenda.label()));
        assert!(!tui.sidebar.is_active());
    }

    #[test]
    fn narrow_toggle_opens_drawer() {
        let (mut app, mut tui, tx, _rx) = setup();
        handle_event(&mut app, &mut tui, TuiEvent::ToggleSidebar, false, &tx);
        assert!(tui.sidebar.drawer_open);
        handle_event(&mut app, &mut tui, TuiEvent::ToggleSidebar, false, &tx);
        assert!(!tui.sidebar.drawer_open);
    }

    #[test]
    fn escape_dismisses_notification_first() {
        let (mut app, mut tui, tx, _rx) = setup();
        dispatch(
            &mut app,
            &mut tui,
            Action::Notify(NotificationKind::Info, "hai".into()),
            &tx,
        );
        handle_event(&mut app, &mut tui, TuiEvent::Escape, true, &tx);
        assert!(app.notification.is_none());
    }

    #[test]
    fn new_chat_clears_composer_and_selection() {
        let (mut app, mut tui, tx, _rx) = setup();
        app.view = View::Chat;
        app.conversation.push_bot("lama");
        tui.composer.buffer = "draf".into();
        tui.message_list.selected_index = Some(0);

        handle_event(&mut app, &mut tui, TuiEvent::NewChat, true, &tx);

        assert!(app.conversation.is_empty());
        assert!(tui.composer.buffer.is_empty());
        assert_eq!(tui.message_list.selected_index, None);
    }

    // ==========================================================================
    // Chat view modes
    // ==========================================================================

    #[test]
    fn escape_enters_cursor_mode_on_newest_message() {
        let (mut app, mut tui, tx, _rx) = setup();
        app.view = View::Chat;
        app.conversation.push_user("a");
        app.conversation.push_bot("b");

        handle_event(&mut app, &mut tui, TuiEvent::Escape, true, &tx);
        assert_eq!(tui.input_mode, InputMode::Cursor);
        assert_eq!(tui.message_list.selected_index, Some(1));

        handle_event(&mut app, &mut tui, TuiEvent::CursorUp, true, &tx);
        assert_eq!(tui.message_list.selected_index, Some(0));

        // Typing returns to the composer
        handle_event(&mut app, &mut tui, TuiEvent::InputChar('x'), true, &tx);
        assert_eq!(tui.input_mode, InputMode::Input);
        assert_eq!(tui.composer.buffer, "x");
    }

    #[test]
    fn escape_with_empty_chat_stays_in_input() {
        let (mut app, mut tui, tx, _rx) = setup();
        app.view = View::Chat;
        handle_event(&mut app, &mut tui, TuiEvent::Escape, true, &tx);
        assert_eq!(tui.input_mode, InputMode::Input);
    }

    #[test]
    fn copy_on_user_message_does_nothing() {
        let (mut app, mut tui, tx, _rx) = setup();
        app.view = View::Chat;
        app.conversation.push_user("pertanyaan");
        tui.enter_cursor_mode(1);

        assert!(!handle_event(&mut app, &mut tui, TuiEvent::InputChar('c'), true, &tx));
        assert!(app.notification.is_none());
    }

    #[test]
    fn composer_is_disabled_while_loading() {
        let (mut app, mut tui, _tx, _rx) = setup();
        app.is_loading = true;
        tui.sync_props(&app);
        assert!(tui.composer.disabled);

        app.user = Some(UserProfile::named("Rina"));
        app.is_loading = false;
        tui.sync_props(&app);
        assert!(!tui.composer.disabled);
        assert!(tui.sidebar.signed_in);
    }

    // ==========================================================================
    // Background tasks
    // ==========================================================================

    #[tokio::test]
    async fn submit_spawns_request_and_reports_reply() {
        let (mut app, mut tui, tx, rx) = setup();
        app.view = View::Chat;

        assert!(!dispatch(&mut app, &mut tui, Action::Submit("halo".into()), &tx));
        assert!(app.is_loading);

        let action = tokio::task::spawn_blocking(move || rx.recv_timeout(Duration::from_secs(5)))
            .await
            .unwrap()
            .expect("reply action");
        dispatch(&mut app, &mut tui, action, &tx);

        assert!(!app.is_loading);
        assert_eq!(app.conversation.len(), 2);
        assert_eq!(app.conversation.last().unwrap().text, "halo");
    }

    #[tokio::test]
    async fn sign_in_round_trip() {
        let (mut app, mut tui, tx, rx) = setup();

        dispatch(&mut app, &mut tui, Action::SignInRequested, &tx);
        assert!(app.auth_pending);

        let action = tokio::task::spawn_blocking(move || rx.recv_timeout(Duration::from_secs(5)))
            .await
            .unwrap()
            .expect("sign-in action");
        dispatch(&mut app, &mut tui, action, &tx);

        assert_eq!(app.user.as_ref().map(|u| u.display_name.as_str()), Some("Tester"));
        assert!(!app.auth_pending);
    }
}
