#![forbid(unsafe_code)]
#![doc = r#"
Chat2Envelope

Response-shaping and authorization helpers for a chat backend that sits in front of a hosted
chat completion service and a prompt flow endpoint.

Crate highlights
- Normalization: completion responses and streamed chunks become one chat envelope
  (`format_non_streaming_response`, `format_stream_response`).
- Prompt flow bridge: chat history to flow input/output pairs and flow replies back to the
  envelope (`to_flow_format`, `from_flow_response`).
- Authorization: `GroupFilterResolver` pages through the caller's group memberships and renders
  a `search.in` filter for the permitted-groups column.
- Streaming: `format_as_ndjson` turns a stream of events into NDJSON lines.

Modules
- `models`: Completion, envelope and prompt flow data structures.
- `normalize`: Completion -> envelope mapping.
- `conversion`: Envelope <-> prompt flow mapping.
- `groups`: Identity-graph group lookup and filter rendering.
- `ndjson`: NDJSON stream encoding and response wrapping.
- `config`: Environment/file settings.
- `util`: Shared helpers (tracing, env, HTTP client, column lists).

Note: every public operation turns failures into well-formed JSON values (`{}` or
`{"error": ...}`) instead of returning errors.
"#]

pub mod config;
pub mod conversion;
pub mod error;
pub mod groups;
pub mod models;
pub mod ndjson;
pub mod normalize;
pub mod util;

// Re-export the primary operations for ergonomic library use.
pub use crate::config::Settings;
pub use crate::conversion::{from_flow_response, to_flow_format};
pub use crate::groups::{GroupFilterResolver, GroupMembership};
pub use crate::ndjson::{format_as_ndjson, ndjson_response};
pub use crate::normalize::{
    format_non_streaming_response, format_response, format_stream_response, stream_responses,
};

// Re-export model namespaces for convenience (downstream users can do `use chat2envelope::envelope`).
pub use crate::models::{completion, envelope, flow};
