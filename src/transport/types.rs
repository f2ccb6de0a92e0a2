use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Body of `POST /chat`.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ChatRequest {
    pub message: String,
}

/// Body of a successful `/chat` response. Both fields may be absent, and a
/// field of the wrong shape reads as absent instead of failing the reply.
#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatReply {
    #[serde(default, deserialize_with = "lenient_string")]
    pub response: Option<String>,
    #[serde(default, deserialize_with = "lenient_string_list")]
    pub suggestions: Option<Vec<String>>,
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => Some(text),
        _ => None,
    })
}

/// Only an array counts; non-string items inside it are skipped.
fn lenient_string_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => Some(
            items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(text) => Some(text),
                    _ => None,
                })
                .collect(),
        ),
        _ => None,
    })
}

impl ChatReply {
    pub fn text(response: impl Into<String>) -> Self {
        Self {
            response: Some(response.into()),
            suggestions: None,
        }
    }

    pub fn with_suggestions(mut self, suggestions: Vec<String>) -> Self {
        self.suggestions = Some(suggestions);
        self
    }
}
