//! Client error types.
//!
//! [`ClientError`] covers the failures that stop a run before or while a
//! session is set up. Problems inside a live session (malformed frames,
//! socket errors) are logged and recorded in the
//! [`SessionReport`](crate::domain::SessionReport) instead.

use tokio_tungstenite::tungstenite;

/// Errors returned by the demo client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The WebSocket handshake failed or the peer was unreachable.
    #[error("failed to connect to {url}: {source}")]
    Connect {
        /// Target URL of the attempted connection.
        url: String,
        /// Underlying transport error.
        #[source]
        source: tungstenite::Error,
    },

    /// An outbound envelope could not be serialized.
    #[error("failed to encode outbound message: {0}")]
    Encode(#[from] serde_json::Error),

    /// Configuration was rejected during validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ClientError {
    /// Returns `true` if the error happened while opening the connection.
    ///
    /// Connection failures end the run like any other close: the binary
    /// logs them and exits cleanly.
    #[must_use]
    pub const fn is_connect(&self) -> bool {
        matches!(self, Self::Connect { .. })
    }
}
