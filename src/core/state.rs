//! # Application State
//!
//! Core business state for the client. This module contains domain logic
//! only, no TUI-specific types. Presentation state lives in the `tui`
//! module.
//!
//! ```text
//! App
//! ├── transport: Arc<dyn ChatTransport>     // backend chat endpoint
//! ├── identity: Arc<dyn IdentityProvider>   // sign-in provider
//! ├── conversation: Conversation            // message log
//! ├── view: View                            // Landing | Chat
//! ├── nav_query: Option<String>             // seed query for the chat view
//! ├── initial_query_processed: bool         // seed already replayed
//! ├── is_loading: bool                      // chat request in flight
//! ├── user: Option<UserProfile>             // signed-in user
//! ├── auth_pending: bool                    // sign-in/out in flight
//! ├── notification: Option<Notification>    // toast
//! └── site_url: String                      // base for external nav pages
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.

use std::sync::Arc;
use std::time::Instant;

use crate::core::conversation::Conversation;
use crate::identity::{IdentityProvider, SignInPrompt, UserProfile};
use crate::transport::ChatTransport;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Landing,
    Chat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub text: String,
    pub kind: NotificationKind,
    pub raised_at: Instant,
    /// Sticky notifications stay until replaced or dismissed.
    pub sticky: bool,
}

impl Notification {
    pub fn new(kind: NotificationKind, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind,
            raised_at: Instant::now(),
            sticky: false,
        }
    }

    pub fn sticky(mut self) -> Self {
        self.sticky = true;
        self
    }
}

/// A one-tap question on the landing page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuickPrompt {
    pub label: &'static str,
    pub query: &'static str,
}

pub const QUICK_PROMPTS: [QuickPrompt; 3] = [
    QuickPrompt {
        label: "Tentang HIMASIF",
        query: "Apa itu HIMASIF dan apa visinya?",
    },
    QuickPrompt {
        label: "Anggota Pengurus",
        query: "Siapa saja anggota BPH HIMASIF?",
    },
    QuickPrompt {
        label: "Divisi & Departemen",
        query: "Apa saja divisi di HIMASIF?",
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavItem {
    Beranda,
    Agenda,
    Dokumen,
    Kontak,
}

impl NavItem {
    pub const ALL: [NavItem; 4] = [
        NavItem::Beranda,
        NavItem::Agenda,
        NavItem::Dokumen,
        NavItem::Kontak,
    ];

    pub fn label(self) -> &'static str {
        match self {
            NavItem::Beranda => "Beranda",
            NavItem::Agenda => "Agenda",
            NavItem::Dokumen => "Dokumen",
            NavItem::Kontak => "Kontak",
        }
    }

    /// Path on the organization site. Beranda is the in-app home.
    pub fn path(self) -> Option<&'static str> {
        match self {
            NavItem::Beranda => None,
            NavItem::Agenda => Some("/agenda"),
            NavItem::Dokumen => Some("/dokumen"),
            NavItem::Kontak => Some("/kontak"),
        }
    }
}

pub struct App {
    pub transport: Arc<dyn ChatTransport>,
    pub identity: Arc<dyn IdentityProvider>,
    pub conversation: Conversation,
    pub view: View,
    /// Query handed from the landing page to the chat view.
    pub nav_query: Option<String>,
    pub initial_query_processed: bool,
    pub is_loading: bool,
    pub user: Option<UserProfile>,
    pub auth_pending: bool,
    /// Device code of the sign-in in progress, re-shown on request.
    pub sign_in_prompt: Option<SignInPrompt>,
    pub notification: Option<Notification>,
    pub site_url: String,
}

impl App {
    pub fn new(
        transport: Arc<dyn ChatTransport>,
        identity: Arc<dyn IdentityProvider>,
        site_url: String,
    ) -> Self {
        Self {
            transport,
            identity,
            conversation: Conversation::new(),
            view: View::default(),
            nav_query: None,
            initial_query_processed: false,
            is_loading: false,
            user: None,
            auth_pending: false,
            sign_in_prompt: None,
            notification: None,
            site_url,
        }
    }

    pub fn is_signed_in(&self) -> bool {
        self.user.is_some()
    }

    pub fn page_url(&self, item: NavItem) -> Option<String> {
        item.path().map(|path| format!("{}{path}", self.site_url))
    }
}
