//! # Chat Transport
//!
//! Delivers one user message to the assistant backend and returns its
//! reply. One call per message, no retry, no streaming.

pub mod client;
pub mod http;
pub mod types;

pub use client::{ChatTransport, TransportError};
pub use http::HttpChatTransport;
pub use types::{ChatReply, ChatRequest};
