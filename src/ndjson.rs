//! Newline-delimited JSON for streamed chat responses.

use std::convert::Infallible;

use axum::body::Body;
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use futures_util::{Stream, StreamExt};
use http::{header, StatusCode};
use serde::Serialize;

/// Content type announced for NDJSON bodies.
pub const NDJSON_CONTENT_TYPE: &str = "application/json-lines";

/// Serialize each event to one JSON line, emitted as soon as the event arrives.
///
/// The first upstream error (or an event that fails to serialize) is logged and
/// replaced by a final `{"error": "<message>"}` line; the stream ends after it.
/// Lines already emitted are unaffected.
pub fn format_as_ndjson<S, T, E>(events: S) -> impl Stream<Item = String>
where
    S: Stream<Item = Result<T, E>>,
    T: Serialize,
    E: std::fmt::Display,
{
    async_stream::stream! {
        futures_util::pin_mut!(events);
        while let Some(item) = events.next().await {
            let line = match item {
                Ok(event) => serde_json::to_string(&event).map_err(|e| e.to_string()),
                Err(e) => Err(e.to_string()),
            };
            match line {
                Ok(mut line) => {
                    line.push('\n');
                    yield line;
                }
                Err(msg) => {
                    tracing::error!("Exception while generating response stream: {}", msg);
                    yield error_line(&msg);
                    break;
                }
            }
        }
    }
}

fn error_line(msg: &str) -> String {
    let mut line = serde_json::json!({ "error": msg }).to_string();
    line.push('\n');
    line
}

/// Wrap NDJSON lines into a streaming `200 OK` response.
pub fn ndjson_response<S>(lines: S) -> Response
where
    S: Stream<Item = String> + Send + 'static,
{
    let body = Body::from_stream(lines.map(|l| Ok::<_, Infallible>(Bytes::from(l))));
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, NDJSON_CONTENT_TYPE)],
        body,
    )
        .into_response()
}
