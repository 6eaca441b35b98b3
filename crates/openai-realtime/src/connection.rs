//! Opens the Realtime WebSocket and serializes writes to it.

use crate::{error::RealtimeError, events::ClientEvent};
use async_trait::async_trait;
use futures_util::{
    Sink, SinkExt, StreamExt,
    stream::{SplitSink, SplitStream},
};
use secrecy::{ExposeSecret, SecretString};
use tokio::{net::TcpStream, sync::Mutex};
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async,
    tungstenite::{
        self,
        client::IntoClientRequest,
        http::{HeaderValue, header::AUTHORIZATION},
        protocol::Message as WsMessage,
    },
};
use tracing::{debug, info};

/// Beta opt-in header required by the Realtime API.
pub const BETA_HEADER: &str = "OpenAI-Beta";
/// Protocol version pinned by this client.
pub const BETA_VERSION: &str = "realtime=v1";

pub type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
pub type WsSink = SplitSink<WsStream, WsMessage>;
pub type WsEvents = SplitStream<WsStream>;

/// Where and how to connect.
#[derive(Debug)]
pub struct ConnectOptions {
    pub url: String,
    pub api_key: SecretString,
}

/// Anything that can deliver client events to the remote peer.
///
/// Implementations must serialize concurrent calls so frames never interleave.
#[cfg_attr(feature = "mock", mockall::automock)]
#[async_trait]
pub trait EventSender: Send + Sync {
    async fn send(&self, event: ClientEvent) -> Result<(), RealtimeError>;

    /// Starts the closing handshake.
    async fn close(&self) -> Result<(), RealtimeError>;
}

/// The write half of a WebSocket behind an async mutex.
pub struct WsEventSender<S> {
    sink: Mutex<S>,
}

impl<S> WsEventSender<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink: Mutex::new(sink),
        }
    }
}

#[async_trait]
impl<S> EventSender for WsEventSender<S>
where
    S: Sink<WsMessage, Error = tungstenite::Error> + Unpin + Send,
{
    async fn send(&self, event: ClientEvent) -> Result<(), RealtimeError> {
        let event_type = event.event_type();
        let payload = serde_json::to_string(&event)?;
        debug!(event_type, "Sending client event");
        self.sink
            .lock()
            .await
            .send(WsMessage::Text(payload.into()))
            .await
            .map_err(|source| RealtimeError::Send { event_type, source })
    }

    async fn close(&self) -> Result<(), RealtimeError> {
        self.sink
            .lock()
            .await
            .close()
            .await
            .map_err(RealtimeError::Close)
    }
}

/// An open Realtime connection, split into its two directions.
pub struct RealtimeConnection {
    pub sender: WsEventSender<WsSink>,
    pub events: WsEvents,
}

/// Performs the WebSocket handshake with bearer auth and the beta header.
pub async fn connect(options: &ConnectOptions) -> Result<RealtimeConnection, RealtimeError> {
    let mut request = options
        .url
        .as_str()
        .into_client_request()
        .map_err(|e| RealtimeError::InvalidRequest(e.to_string()))?;

    let mut bearer =
        HeaderValue::from_str(&format!("Bearer {}", options.api_key.expose_secret()))
            .map_err(|e| RealtimeError::InvalidRequest(format!("authorization header: {e}")))?;
    bearer.set_sensitive(true);
    request.headers_mut().insert(AUTHORIZATION, bearer);
    request
        .headers_mut()
        .insert(BETA_HEADER, HeaderValue::from_static(BETA_VERSION));

    let (ws_stream, _) = connect_async(request)
        .await
        .map_err(RealtimeError::Connect)?;
    info!(url = %options.url, "Connected to Realtime API.");

    let (sink, events) = ws_stream.split();
    Ok(RealtimeConnection {
        sender: WsEventSender::new(sink),
        events,
    })
}
