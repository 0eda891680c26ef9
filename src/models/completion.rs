use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

// ============================================================================
// Chat Completions Response Models
// ============================================================================

/// Assistant message in a non-streaming completion.
///
/// `context` is the Azure "on your data" attachment (citations, intent). It is
/// kept as raw JSON; a JSON `null` deserializes to `None` and counts as absent.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompletionMessage {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub context: Option<serde_json::Value>,
}

/// Choice in a non-streaming completion
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompletionChoice {
    #[serde(default)]
    pub index: u32,
    #[serde(default)]
    pub message: Option<CompletionMessage>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Complete Chat Completions response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletion {
    pub id: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub created: u64,
    #[serde(default)]
    pub object: String, // "chat.completion"
    #[serde(default)]
    pub choices: Vec<CompletionChoice>,
}

// ============================================================================
// Chat Completions Streaming Response Models
// ============================================================================

/// Delta in a streaming chunk
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompletionDelta {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub context: Option<serde_json::Value>,
}

/// Choice in a streaming chunk
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StreamChoice {
    #[serde(default)]
    pub index: u32,
    #[serde(default)]
    pub delta: Option<CompletionDelta>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Streaming chunk response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletionChunk {
    pub id: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub created: u64,
    #[serde(default)]
    pub object: String, // "chat.completion.chunk"
    #[serde(default)]
    pub choices: Vec<StreamChoice>,
}

/// Either shape the completion service can hand back.
#[derive(Debug, Clone, PartialEq)]
pub enum CompletionEvent {
    Completion(ChatCompletion),
    Chunk(ChatCompletionChunk),
}

impl CompletionEvent {
    /// Decode a raw completion object. Chunks are recognized by a `delta` on the
    /// first choice or by `object == "chat.completion.chunk"`.
    pub fn from_value(v: serde_json::Value) -> Result<Self, serde_json::Error> {
        let is_chunk = v.get("object").and_then(|o| o.as_str()) == Some("chat.completion.chunk")
            || v.get("choices")
                .and_then(|c| c.as_array())
                .and_then(|arr| arr.first())
                .map(|first| first.get("delta").is_some())
                .unwrap_or(false);

        if is_chunk {
            serde_json::from_value(v).map(CompletionEvent::Chunk)
        } else {
            serde_json::from_value(v).map(CompletionEvent::Completion)
        }
    }
}
