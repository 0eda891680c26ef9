use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

/// Message role in the normalized envelope.
///
/// Uses lowercase serialization to match the chat front-end:
/// "system" | "user" | "assistant" | "tool"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

/// The single body key carried by an envelope message.
///
/// Flattened into the message, so a message serializes as either
/// `{"role": ..., "content": ...}` or `{"role": ..., "context": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageBody {
    /// Text (or pre-serialized JSON text for tool messages).
    Content(serde_json::Value),
    /// Raw context object, emitted without serializing it to text.
    Context(serde_json::Value),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvelopeMessage {
    pub role: Role,
    #[serde(flatten)]
    pub body: MessageBody,
}

impl EnvelopeMessage {
    pub fn content(role: Role, content: impl Into<serde_json::Value>) -> Self {
        Self {
            role,
            body: MessageBody::Content(content.into()),
        }
    }

    pub fn context(role: Role, context: serde_json::Value) -> Self {
        Self {
            role,
            body: MessageBody::Context(context),
        }
    }

    /// Content value, if this message carries `content`.
    pub fn content_value(&self) -> Option<&serde_json::Value> {
        match &self.body {
            MessageBody::Content(v) => Some(v),
            MessageBody::Context(_) => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnvelopeChoice {
    pub messages: Vec<EnvelopeMessage>,
}

/// Normalized response shape consumed by the chat front-end, whichever backend produced it.
///
/// `created` is an integer timestamp for completion responses and `""` for prompt flow
/// replies, so it is kept as raw JSON.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub id: String,
    pub model: String,
    pub created: serde_json::Value,
    pub object: String,
    pub choices: Vec<EnvelopeChoice>,
    pub history_metadata: serde_json::Value,
    #[serde(rename = "apim-request-id", default)]
    pub apim_request_id: Option<String>,
}

impl Envelope {
    /// Messages of the single choice an envelope carries.
    pub fn messages(&self) -> &[EnvelopeMessage] {
        self.choices
            .first()
            .map(|c| c.messages.as_slice())
            .unwrap_or(&[])
    }
}

/// Outcome of formatting a backend response.
///
/// Serializes untagged: the envelope itself, `{"error": ...}`, or `{}` when there was
/// nothing to emit.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FormattedResponse {
    Envelope(Box<Envelope>),
    Error { error: serde_json::Value },
    Empty {},
}

impl FormattedResponse {
    pub fn envelope(envelope: Envelope) -> Self {
        FormattedResponse::Envelope(Box::new(envelope))
    }

    pub fn error(error: impl Into<serde_json::Value>) -> Self {
        FormattedResponse::Error {
            error: error.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, FormattedResponse::Empty {})
    }

    pub fn as_envelope(&self) -> Option<&Envelope> {
        match self {
            FormattedResponse::Envelope(e) => Some(e.as_ref()),
            _ => None,
        }
    }

    pub fn error_value(&self) -> Option<&serde_json::Value> {
        match self {
            FormattedResponse::Error { error } => Some(error),
            _ => None,
        }
    }
}
