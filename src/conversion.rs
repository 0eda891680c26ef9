use serde_json::Value;

use crate::models::envelope::{
    Envelope, EnvelopeChoice, EnvelopeMessage, FormattedResponse, Role,
};
use crate::models::flow::FlowPair;

/// Returned when the prompt flow call produced no result at all.
pub const NO_FLOW_RESPONSE_ERROR: &str = "No response received from promptflow endpoint increase PROMPTFLOW_RESPONSE_TIMEOUT parameter or check the promptflow endpoint.";

/// Align a chat request body (`{"messages": [...]}`) with the history format of a prompt flow chat flow.
///
/// Mapping:
/// - `user` opens a new pair: `{inputs: {request_field: content}, outputs: {response_field: ""}}`.
/// - `assistant` fills `response_field` of the most recent pair; with no pair yet it is dropped.
/// - Other roles and null/empty entries are skipped.
pub fn to_flow_format(request: &Value, request_field: &str, response_field: &str) -> Vec<FlowPair> {
    tracing::debug!("Input json: {}", request);

    let mut pairs: Vec<FlowPair> = Vec::new();
    let messages = request
        .get("messages")
        .and_then(|m| m.as_array())
        .map(Vec::as_slice)
        .unwrap_or(&[]);

    for m in messages {
        if is_blank(m) {
            continue;
        }
        let content = m.get("content").cloned().unwrap_or(Value::Null);
        match m.get("role").and_then(|r| r.as_str()) {
            Some("user") => pairs.push(FlowPair::open(request_field, response_field, content)),
            Some("assistant") => {
                if let Some(last) = pairs.last_mut() {
                    last.outputs.insert(response_field.to_string(), content);
                }
            }
            _ => {}
        }
    }

    tracing::debug!("PF formatted response: {:?}", pairs);
    pairs
}

fn is_blank(v: &Value) -> bool {
    match v {
        Value::Null => true,
        Value::Object(o) => o.is_empty(),
        _ => false,
    }
}

/// Normalize a prompt flow reply into the chat envelope.
///
/// Checked in order:
/// 1. no result -> `{"error": NO_FLOW_RESPONSE_ERROR}`
/// 2. result carries `error` -> `{"error": <that value>}`
/// 3. `assistant` message from `response_field`, then `tool` message from `citations_field`
///
/// A JSON `null` result counts as no result. Citations come after the answer here, the
/// reverse of the completion normalizer. The envelope id is always the result's `id`;
/// `message_uuid` is accepted and ignored. `model`, `created` and
/// `object` are empty strings. A result that is not an object or has no id is logged and
/// yields `{}`.
pub fn from_flow_response(
    flow_result: Option<&Value>,
    history_metadata: Value,
    response_field: &str,
    citations_field: &str,
    _message_uuid: Option<&str>,
) -> FormattedResponse {
    let Some(result) = flow_result.filter(|v| !v.is_null()) else {
        tracing::error!(
            "Prompt flow result is missing - increase PROMPTFLOW_RESPONSE_TIMEOUT parameter"
        );
        return FormattedResponse::error(NO_FLOW_RESPONSE_ERROR);
    };

    let Some(obj) = result.as_object() else {
        tracing::error!("Unexpected prompt flow result shape: {}", result);
        return FormattedResponse::Empty {};
    };

    if let Some(err) = obj.get("error") {
        tracing::error!("Error in promptflow response api: {}", err);
        return FormattedResponse::error(err.clone());
    }

    tracing::debug!("promptflow result: {}", result);

    let mut messages = Vec::with_capacity(2);
    if let Some(answer) = obj.get(response_field) {
        messages.push(EnvelopeMessage::content(Role::Assistant, answer.clone()));
    }
    if let Some(citations) = obj.get(citations_field) {
        messages.push(EnvelopeMessage::content(Role::Tool, citations.clone()));
    }

    let id = match obj.get("id") {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => {
            tracing::error!("Prompt flow result has no id");
            return FormattedResponse::Empty {};
        }
    };

    FormattedResponse::envelope(Envelope {
        id,
        model: String::new(),
        created: Value::String(String::new()),
        object: String::new(),
        choices: vec![EnvelopeChoice { messages }],
        history_metadata,
        apim_request_id: None,
    })
}
