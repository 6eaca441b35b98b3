//! Client-side plumbing for the OpenAI Realtime API over WebSocket.
//!
//! - `events`: typed client and server events and their wire encoding.
//! - `connection`: the authenticated handshake and a write half that is safe
//!   to share between tasks.

pub mod connection;
pub mod error;
pub mod events;

pub use connection::{ConnectOptions, EventSender, RealtimeConnection, WsEventSender, connect};
pub use error::RealtimeError;
pub use events::{ClientEvent, FunctionCallArgumentsDone, ServerEvent, SessionConfig};

#[cfg(feature = "mock")]
pub use connection::MockEventSender;
