//! Connects, configures the session, and runs the conversation to completion.

use crate::{
    config::Config,
    console::Console,
    ws::{EventListener, ToolDispatcher, TurnDriver, turn_channel},
};
use anyhow::{Context, Result};
use chat_core::{ToolRegistry, session_config};
use openai_realtime::{
    ClientEvent, EventSender, RealtimeConnection, RealtimeError, SessionConfig, connect,
};
use std::sync::Arc;
use tokio::{io::AsyncBufRead, sync::watch};
use tracing::{Instrument, error, info, info_span};

/// Sends the one `session.update` that opens every conversation.
pub async fn configure_session(
    sender: &dyn EventSender,
    session: SessionConfig,
) -> Result<(), RealtimeError> {
    sender.send(ClientEvent::session_update(session)).await
}

/// Runs one chat session, reading user lines from `input`.
///
/// Connection and session-configuration failures are returned as errors;
/// everything after that is logged and handled inside the session.
pub async fn run<R>(config: &Config, input: R, console: Console) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let RealtimeConnection { sender, events } = connect(&config.realtime)
        .await
        .context("Error connecting to OpenAI")?;
    let sender: Arc<dyn EventSender> = Arc::new(sender);

    let tools = Arc::new(if config.tools_enabled {
        ToolRegistry::with_defaults()
    } else {
        ToolRegistry::new()
    });
    configure_session(
        sender.as_ref(),
        session_config(&config.instructions, &tools),
    )
    .await
    .context("Failed to configure realtime session")?;
    info!(tools_enabled = !tools.is_empty(), "Connected to OpenAI WebSocket");

    let (notifier, waiter) = turn_channel();
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let dispatcher = ToolDispatcher::new(sender.clone(), tools, console.clone());
    let listener = EventListener::new(events, dispatcher, console.clone(), notifier, shutdown_rx);
    let listener_handle = tokio::spawn(listener.run().instrument(info_span!("event_listener")));

    TurnDriver::new(sender, waiter, console.clone(), shutdown_tx)
        .run(input)
        .await;

    if let Err(e) = listener_handle.await {
        error!(error = ?e, "Message listener task failed");
    }
    console.print("\nGoodbye!\n");
    Ok(())
}
