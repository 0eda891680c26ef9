use thiserror::Error;

/// Failures talking to the identity-graph API.
///
/// These never leave the crate's public operations: the group resolver logs them and
/// degrades to the groups collected so far.
#[derive(Error, Debug)]
pub enum GraphError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected status {status}: {body}")]
    Status {
        status: http::StatusCode,
        body: String,
    },
    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),
}
