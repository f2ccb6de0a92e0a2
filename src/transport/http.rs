//! HTTP transport: `POST {base}/chat` with a JSON body.

use async_trait::async_trait;
use log::{debug, info, warn};

use super::{ChatReply, ChatRequest, ChatTransport, TransportError};

pub struct HttpChatTransport {
    base_url: String,
    client: reqwest::Client,
}

impl HttpChatTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }

    pub fn endpoint(&self) -> String {
        format!("{}/chat", self.base_url)
    }
}

#[async_trait]
impl ChatTransport for HttpChatTransport {
    fn name(&self) -> &str {
        "http"
    }

    async fn send(&self, message: &str) -> Result<ChatReply, TransportError> {
        let endpoint = self.endpoint();
        info!("Chat request: endpoint={}, message_len={}", endpoint, message.len());

        let response = self
            .client
            .post(&endpoint)
            .json(&ChatRequest {
                message: message.to_string(),
            })
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        debug!("Chat response status: {}", response.status());

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let err_body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            warn!("Chat API error: {} - {}", status, err_body);
            return Err(TransportError::Api {
                status,
                message: err_body,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;
        let reply: ChatReply =
            serde_json::from_str(&body).map_err(|e| TransportError::Parse(e.to_string()))?;

        info!(
            "Chat reply: response_len={}, suggestions={}",
            reply.response.as_deref().map_or(0, str::len),
            reply.suggestions.as_ref().map_or(0, Vec::len)
        );
        Ok(reply)
    }
}
