//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc::Sender;

use crate::core::state::App;
use crate::identity::{IdentityError, IdentityProvider, SignInPrompt, UserProfile};
use crate::transport::{ChatReply, ChatTransport, TransportError};

/// A transport that echoes the message back without any network.
pub struct EchoTransport;

#[async_trait]
impl ChatTransport for EchoTransport {
    fn name(&self) -> &str {
        "echo"
    }

    async fn send(&self, message: &str) -> Result<ChatReply, TransportError> {
        Ok(ChatReply::text(message))
    }
}

/// An identity provider that signs everyone in as "Tester".
pub struct StaticIdentity;

#[async_trait]
impl IdentityProvider for StaticIdentity {
    fn name(&self) -> &str {
        "static"
    }

    async fn sign_in(&self, _prompts: Sender<SignInPrompt>) -> Result<UserProfile, IdentityError> {
        Ok(UserProfile::named("Tester"))
    }

    async fn sign_out(&self) -> Result<(), IdentityError> {
        Ok(())
    }
}

/// Creates a test App with the echo transport and static identity.
pub fn test_app() -> App {
    App::new(
        Arc::new(EchoTransport),
        Arc::new(StaticIdentity),
        "https://himasif.org".to_string(),
    )
}
