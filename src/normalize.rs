//! Completion service -> normalized envelope.
//!
//! Both entry points build the same envelope skeleton and differ only in how the first
//! choice is read: `message` for final responses, `delta` for streamed chunks.

use futures_util::{Stream, StreamExt};
use serde_json::Value;

use crate::models::completion::{ChatCompletion, ChatCompletionChunk, CompletionEvent};
use crate::models::envelope::{
    Envelope, EnvelopeChoice, EnvelopeMessage, FormattedResponse, Role,
};

fn envelope_skeleton(
    id: &str,
    model: &str,
    created: u64,
    object: &str,
    history_metadata: Value,
    apim_request_id: Option<&str>,
    messages: Vec<EnvelopeMessage>,
) -> FormattedResponse {
    FormattedResponse::envelope(Envelope {
        id: id.to_string(),
        model: model.to_string(),
        created: Value::from(created),
        object: object.to_string(),
        choices: vec![EnvelopeChoice { messages }],
        history_metadata,
        apim_request_id: apim_request_id.map(str::to_string),
    })
}

/// Tool message whose content is the JSON text of a context attachment.
fn tool_context_message(context: &Value) -> EnvelopeMessage {
    EnvelopeMessage::content(Role::Tool, context.to_string())
}

/// Normalize a final (non-streaming) completion.
///
/// Returns `{}` when there is no first choice or it has no message. A `context`
/// attachment becomes a leading `tool` message; the `assistant` message always follows.
pub fn format_non_streaming_response(
    completion: &ChatCompletion,
    history_metadata: Value,
    apim_request_id: Option<&str>,
) -> FormattedResponse {
    let Some(message) = completion.choices.first().and_then(|c| c.message.as_ref()) else {
        return FormattedResponse::Empty {};
    };

    let mut messages = Vec::with_capacity(2);
    if let Some(context) = &message.context {
        messages.push(tool_context_message(context));
    }
    messages.push(EnvelopeMessage::content(
        Role::Assistant,
        message.content.clone().map(Value::String).unwrap_or(Value::Null),
    ));

    envelope_skeleton(
        &completion.id,
        &completion.model,
        completion.created,
        &completion.object,
        history_metadata,
        apim_request_id,
        messages,
    )
}

/// Normalize one streamed chunk.
///
/// Priority:
/// 1. `context` present: a single `tool` message; content is not emitted in this call.
/// 2. role `assistant` with `context`: an `assistant` message carrying the raw context.
/// 3. non-empty `content`: a single `assistant` message.
///
/// Anything else returns `{}`.
pub fn format_stream_response(
    chunk: &ChatCompletionChunk,
    history_metadata: Value,
    apim_request_id: Option<&str>,
) -> FormattedResponse {
    let Some(delta) = chunk.choices.first().and_then(|c| c.delta.as_ref()) else {
        return FormattedResponse::Empty {};
    };

    let message = if let Some(context) = &delta.context {
        tool_context_message(context)
    } else if let (Some("assistant"), Some(context)) =
        (delta.role.as_deref(), delta.context.as_ref())
    {
        // Unreachable while case 1 matches on `context` alone; kept pending a decision on
        // whether assistant deltas should carry their context unserialized.
        EnvelopeMessage::context(Role::Assistant, context.clone())
    } else {
        match delta.content.as_deref() {
            Some(content) if !content.is_empty() => {
                EnvelopeMessage::content(Role::Assistant, content)
            }
            _ => return FormattedResponse::Empty {},
        }
    };

    envelope_skeleton(
        &chunk.id,
        &chunk.model,
        chunk.created,
        &chunk.object,
        history_metadata,
        apim_request_id,
        vec![message],
    )
}

/// Normalize either completion shape.
pub fn format_response(
    event: &CompletionEvent,
    history_metadata: Value,
    apim_request_id: Option<&str>,
) -> FormattedResponse {
    match event {
        CompletionEvent::Completion(c) => {
            format_non_streaming_response(c, history_metadata, apim_request_id)
        }
        CompletionEvent::Chunk(c) => format_stream_response(c, history_metadata, apim_request_id),
    }
}

/// Map a stream of chunks to envelopes, passing upstream errors through untouched.
///
/// Chunks with nothing to emit map to `{}`, as the front-end expects one line per chunk.
pub fn stream_responses<S, E>(
    chunks: S,
    history_metadata: Value,
    apim_request_id: Option<String>,
) -> impl Stream<Item = Result<FormattedResponse, E>>
where
    S: Stream<Item = Result<ChatCompletionChunk, E>>,
{
    chunks.map(move |item| {
        item.map(|chunk| {
            format_stream_response(&chunk, history_metadata.clone(), apim_request_id.as_deref())
        })
    })
}
