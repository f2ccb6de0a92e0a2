//! # Actions
//!
//! Everything that can happen in the client becomes an `Action`.
//! User presses Enter? That's `Action::Submit(text)`.
//! Backend answers? That's `Action::ReplyReceived(reply)`.
//!
//! The `update()` function takes the current state and an action, mutates
//! the state, and returns an [`Effect`] describing any I/O the adapter
//! must perform. No side effects here. I/O happens elsewhere.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```

use log::{debug, info, warn};

use crate::core::state::{App, NavItem, Notification, NotificationKind, View};
use crate::identity::{SignInPrompt, UserProfile};
use crate::transport::ChatReply;

/// Bot text when the backend answers without a `response`.
pub const EMPTY_REPLY_TEXT: &str = "Maaf, terjadi kesalahan.";
/// Bot text when the request itself failed.
pub const CONNECTION_ERROR_TEXT: &str =
    "Maaf, saya tidak bisa terhubung ke server. Silakan coba lagi.";
pub const SUGGESTIONS_LABEL: &str = "Coba tanyakan juga:";

pub const SIGNED_IN_TEXT: &str = "Berhasil masuk dengan Google";
pub const SIGN_IN_FAILED_TEXT: &str = "Gagal masuk, coba lagi";
pub const SIGNED_OUT_TEXT: &str = "Berhasil keluar";
pub const SIGN_OUT_FAILED_TEXT: &str = "Gagal keluar, coba lagi";

#[derive(Debug, Clone)]
pub enum Action {
    /// Composer submitted.
    Submit(String),
    ReplyReceived(ChatReply),
    RequestFailed(String),
    NewChat,
    /// Landing search or quick prompt.
    Search(String),
    /// The chat view became active.
    ChatMounted,
    GoHome,
    OpenNavItem(NavItem),
    SignInRequested,
    SignInPrompt(SignInPrompt),
    SignedIn(UserProfile),
    SignInFailed(String),
    SignOutRequested,
    SignedOut,
    SignOutFailed(String),
    Notify(NotificationKind, String),
    DismissNotification,
    Quit,
}

/// I/O the adapter performs after an update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    Quit,
    /// Send this text to the chat backend.
    SpawnRequest(String),
    /// Empty the composer draft.
    ClearComposer,
    SignIn,
    SignOut,
}

pub fn update(app: &mut App, action: Action) -> Effect {
    match action {
        Action::Submit(text) => submit(app, &text),

        Action::ReplyReceived(reply) => {
            let text = reply_text(&reply);
            info!("Reply received ({} bytes)", text.len());
            app.conversation.push_bot(text);
            app.is_loading = false;
            replay_seed_query(app)
        }

        Action::RequestFailed(reason) => {
            warn!("Chat request failed: {}", reason);
            app.conversation.push_bot(CONNECTION_ERROR_TEXT);
            app.is_loading = false;
            replay_seed_query(app)
        }

        Action::NewChat => {
            info!("New chat, dropping {} messages", app.conversation.len());
            app.conversation.clear();
            app.view = View::Chat;
            Effect::ClearComposer
        }

        Action::Search(query) => {
            let query = query.trim();
            if query.is_empty() {
                return Effect::None;
            }
            app.nav_query = Some(query.to_string());
            app.initial_query_processed = false;
            app.view = View::Chat;
            Effect::None
        }

        Action::ChatMounted => replay_seed_query(app),

        Action::GoHome | Action::OpenNavItem(NavItem::Beranda) => {
            app.view = View::Landing;
            Effect::None
        }

        Action::OpenNavItem(item) => {
            if let Some(url) = app.page_url(item) {
                app.notification = Some(Notification::new(
                    NotificationKind::Info,
                    format!("{}: {url}", item.label()),
                ));
            }
            Effect::None
        }

        Action::SignInRequested => {
            if app.is_signed_in() {
                return Effect::None;
            }
            if app.auth_pending {
                // Flow still polling: bring the code back if it was dismissed
                if let Some(prompt) = &app.sign_in_prompt {
                    app.notification = Some(prompt_notification(prompt));
                }
                return Effect::None;
            }
            app.auth_pending = true;
            Effect::SignIn
        }

        Action::SignInPrompt(prompt) => {
            app.notification = Some(prompt_notification(&prompt));
            app.sign_in_prompt = Some(prompt);
            Effect::None
        }

        Action::SignedIn(profile) => {
            info!("Signed in as {}", profile.display_name);
            app.user = Some(profile);
            app.auth_pending = false;
            app.sign_in_prompt = None;
            app.notification = Some(Notification::new(NotificationKind::Success, SIGNED_IN_TEXT));
            Effect::None
        }

        Action::SignInFailed(reason) => {
            warn!("Sign-in failed: {}", reason);
            app.user = None;
            app.auth_pending = false;
            app.sign_in_prompt = None;
            app.notification = Some(Notification::new(NotificationKind::Error, SIGN_IN_FAILED_TEXT));
            Effect::None
        }

        Action::SignOutRequested => {
            if !app.is_signed_in() || app.auth_pending {
                return Effect::None;
            }
            app.auth_pending = true;
            Effect::SignOut
        }

        Action::SignedOut => {
            app.user = None;
            app.auth_pending = false;
            app.notification = Some(Notification::new(NotificationKind::Success, SIGNED_OUT_TEXT));
            Effect::None
        }

        Action::SignOutFailed(reason) => {
            warn!("Sign-out failed: {}", reason);
            app.user = None;
            app.auth_pending = false;
            app.notification = Some(Notification::new(NotificationKind::Error, SIGN_OUT_FAILED_TEXT));
            Effect::None
        }

        Action::Notify(kind, text) => {
            app.notification = Some(Notification::new(kind, text));
            Effect::None
        }

        Action::DismissNotification => {
            app.notification = None;
            Effect::None
        }

        Action::Quit => Effect::Quit,
    }
}

/// Send the query handed over from the landing page, once. While another
/// request is in flight the query stays queued until that one settles.
fn replay_seed_query(app: &mut App) -> Effect {
    if app.view != View::Chat || app.initial_query_processed || app.is_loading {
        return Effect::None;
    }
    let Some(query) = app.nav_query.take() else {
        return Effect::None;
    };
    app.initial_query_processed = true;
    debug!("Replaying initial query");
    submit(app, &query)
}

fn prompt_notification(prompt: &SignInPrompt) -> Notification {
    Notification::new(
        NotificationKind::Info,
        format!(
            "Buka {} dan masukkan kode {}",
            prompt.verification_url, prompt.user_code
        ),
    )
    .sticky()
}

/// Single-flight submit shared by the composer and the seed query.
fn submit(app: &mut App, text: &str) -> Effect {
    let text = text.trim();
    if text.is_empty() {
        return Effect::None;
    }
    if app.is_loading {
        debug!("Submit ignored, request already in flight");
        return Effect::None;
    }
    app.conversation.push_user(text);
    app.is_loading = true;
    Effect::SpawnRequest(text.to_string())
}

/// Bot message text for a backend reply, with any suggestions appended.
pub fn reply_text(reply: &ChatReply) -> String {
    let mut text = reply
        .response
        .as_deref()
        .filter(|response| !response.is_empty())
        .unwrap_or(EMPTY_REPLY_TEXT)
        .to_string();

    if let Some(suggestions) = reply.suggestions.as_ref().filter(|s| !s.is_empty()) {
        text.push_str("<br/><br/><span class='bot-suggest-label'>");
        text.push_str(SUGGESTIONS_LABEL);
        text.push_str("</span><br/>");
        let items: Vec<String> = suggestions.iter().map(|q| format!("• {q}")).collect();
        text.push_str(&items.join("<br/>"));
    }
    text
}
