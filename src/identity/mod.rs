//! # Identity
//!
//! Sign-in and sign-out against an external identity provider. The UI only
//! sees a [`UserProfile`]; tokens stay inside the provider.

pub mod google;

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::Sender;

pub use google::{GoogleDeviceIdentity, GoogleEndpoints};

/// The signed-in user as shown in the sidebar.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct UserProfile {
    #[serde(rename = "name", default)]
    pub display_name: String,
    #[serde(rename = "picture", default)]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl UserProfile {
    pub fn named(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            photo_url: None,
            email: None,
        }
    }
}

/// What the user must do on another device to finish signing in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignInPrompt {
    pub verification_url: String,
    pub user_code: String,
}

#[derive(Debug)]
pub enum IdentityError {
    /// No client id configured, or sign-in disabled.
    NotConfigured,
    Network(String),
    Api { status: u16, message: String },
    /// The user refused the consent screen.
    Denied(String),
    /// The device code ran out before the user finished.
    Expired,
    Parse(String),
}

impl fmt::Display for IdentityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdentityError::NotConfigured => write!(f, "sign-in is not configured"),
            IdentityError::Network(msg) => write!(f, "network error: {msg}"),
            IdentityError::Api { status, message } => {
                write!(f, "identity API error (HTTP {status}): {message}")
            }
            IdentityError::Denied(msg) => write!(f, "access denied: {msg}"),
            IdentityError::Expired => write!(f, "device code expired"),
            IdentityError::Parse(msg) => write!(f, "parse error: {msg}"),
        }
    }
}

impl std::error::Error for IdentityError {}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Run a full sign-in. Instructions for the user are sent on `prompts`
    /// while the flow waits for them.
    async fn sign_in(&self, prompts: Sender<SignInPrompt>) -> Result<UserProfile, IdentityError>;

    async fn sign_out(&self) -> Result<(), IdentityError>;
}

/// Used when no client id is configured or `--no-auth` is given.
pub struct DisabledIdentity;

#[async_trait]
impl IdentityProvider for DisabledIdentity {
    fn name(&self) -> &str {
        "disabled"
    }

    async fn sign_in(&self, _prompts: Sender<SignInPrompt>) -> Result<UserProfile, IdentityError> {
        Err(IdentityError::NotConfigured)
    }

    async fn sign_out(&self) -> Result<(), IdentityError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_reads_userinfo_fields() {
        let profile: UserProfile = serde_json::from_str(
            r#"{"sub":"1","name":"Budi","picture":"https://x/p.png","email":"budi@upj.ac.id"}"#,
        )
        .unwrap();
        assert_eq!(profile.display_name, "Budi");
        assert_eq!(profile.photo_url.as_deref(), Some("https://x/p.png"));
        assert_eq!(profile.email.as_deref(), Some("budi@upj.ac.id"));
    }

    #[test]
    fn disabled_identity_refuses_sign_in() {
        let (tx, _rx) = tokio::sync::mpsc::channel(1);
        let result = tokio_test::block_on(DisabledIdentity.sign_in(tx));
        assert!(matches!(result, Err(IdentityError::NotConfigured)));
        assert!(tokio_test::block_on(DisabledIdentity.sign_out()).is_ok());
    }
}
