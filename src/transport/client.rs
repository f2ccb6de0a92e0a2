use std::fmt;

use async_trait::async_trait;

use super::types::ChatReply;

/// Ways a chat request can fail. The UI answers all of them with the same
/// apology; the variants exist for the log.
#[derive(Debug)]
pub enum TransportError {
    /// Connection refused, DNS, timeout.
    Network(String),
    /// Non-2xx status, whatever the body says.
    Api { status: u16, message: String },
    /// 2xx with a body that is not the expected JSON.
    Parse(String),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::Network(msg) => write!(f, "network error: {msg}"),
            TransportError::Api { status, message } => {
                write!(f, "API error (HTTP {status}): {message}")
            }
            TransportError::Parse(msg) => write!(f, "parse error: {msg}"),
        }
    }
}

impl std::error::Error for TransportError {}

#[async_trait]
pub trait ChatTransport: Send + Sync {
    fn name(&self) -> &str;

    /// Send one user message and wait for the backend's reply.
    async fn send(&self, message: &str) -> Result<ChatReply, TransportError>;
}
