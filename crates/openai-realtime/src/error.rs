use tokio_tungstenite::tungstenite;

/// Errors raised while talking to the Realtime API.
#[derive(Debug, thiserror::Error)]
pub enum RealtimeError {
    /// The handshake request could not be built (bad URL or header value).
    #[error("invalid connection request: {0}")]
    InvalidRequest(String),
    /// The WebSocket handshake failed.
    #[error("failed to connect to realtime endpoint: {0}")]
    Connect(#[source] tungstenite::Error),
    #[error("failed to encode client event: {0}")]
    Encode(#[from] serde_json::Error),
    /// Writing a frame to the socket failed.
    #[error("failed to send {event_type}: {source}")]
    Send {
        event_type: &'static str,
        #[source]
        source: tungstenite::Error,
    },
    #[error("failed to close connection: {0}")]
    Close(#[source] tungstenite::Error),
}
