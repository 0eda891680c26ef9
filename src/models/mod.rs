//! Data models for the completion service, the normalized envelope and the prompt flow backend.
//!
//! This module groups three submodules:
//! - `completion`: The subset of Chat Completions response objects (final and streamed) we read.
//! - `envelope`: The normalized envelope returned to the chat front-end.
//! - `flow`: Input/output pairs expected by the prompt flow chat endpoint.
//!
//! The mapping logic lives in `crate::normalize` (completion -> envelope) and
//! `crate::conversion` (envelope <-> prompt flow).

pub mod completion;
pub mod envelope;
pub mod flow;

pub use completion::{
    ChatCompletion, ChatCompletionChunk, CompletionChoice, CompletionDelta, CompletionEvent,
    CompletionMessage, StreamChoice,
};
pub use envelope::{Envelope, EnvelopeChoice, EnvelopeMessage, FormattedResponse, MessageBody, Role};
pub use flow::FlowPair;
