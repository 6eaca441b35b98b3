//! Reads server events for the lifetime of the session.

use super::{
    dispatch::ToolDispatcher,
    turn::{TurnNotifier, TurnOutcome},
};
use crate::console::Console;
use futures_util::{Stream, StreamExt};
use openai_realtime::{ServerEvent, events::ErrorEvent};
use tokio::sync::watch;
use tokio_tungstenite::tungstenite::{self, protocol::Message as WsMessage};
use tracing::{debug, error, info, warn};

/// Decodes inbound frames and routes them by event type.
///
/// When `run` returns, the turn notifier is dropped, so a driver waiting on
/// the current turn is released no matter why the listener stopped.
///
/// At most one signal is pushed per response. A response that streams text
/// and then calls a tool has already released its turn, so the text of the
/// follow-up response it triggers does not signal again.
pub struct EventListener<St> {
    events: St,
    dispatcher: ToolDispatcher,
    console: Console,
    turns: TurnNotifier,
    shutdown: watch::Receiver<bool>,
    /// A signal was pushed since the last `response.created`.
    released: bool,
    /// The next `response.text.done` ends a follow-up to a released turn.
    skip_next_done: bool,
}

impl<St> EventListener<St>
where
    St: Stream<Item = Result<WsMessage, tungstenite::Error>> + Unpin,
{
    pub fn new(
        events: St,
        dispatcher: ToolDispatcher,
        console: Console,
        turns: TurnNotifier,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            events,
            dispatcher,
            console,
            turns,
            shutdown,
            released: false,
            skip_next_done: false,
        }
    }

    pub async fn run(mut self) {
        loop {
            if *self.shutdown.borrow() {
                info!("Shutting down message listener...");
                return;
            }

            let frame = tokio::select! {
                biased;
                // Either shutdown was raised or the driver is gone.
                _ = self.shutdown.changed() => {
                    info!("Shutting down message listener...");
                    return;
                }
                frame = self.events.next() => frame,
            };

            match frame {
                Some(Ok(WsMessage::Text(text))) => self.handle_text(&text).await,
                Some(Ok(WsMessage::Close(frame))) => {
                    info!(?frame, "Realtime connection closed by server.");
                    return;
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    error!(error = %e, "Error reading message");
                    return;
                }
                None => {
                    info!("Realtime connection ended.");
                    return;
                }
            }
        }
    }

    async fn handle_text(&mut self, text: &str) {
        let event = match ServerEvent::decode(text) {
            Ok(event) => event,
            Err(e) => {
                warn!(error = %e, "Failed to decode server event; skipping it");
                return;
            }
        };

        match event {
            ServerEvent::TextDelta(delta) => self.console.print(&delta.delta),
            ServerEvent::TextDone => {
                self.console.print("\n");
                if std::mem::take(&mut self.skip_next_done) {
                    debug!("Follow-up response finished; its turn was already released");
                } else {
                    self.release(TurnOutcome::Completed);
                }
            }
            ServerEvent::FunctionCallArgumentsDone(call) => {
                let call_id = call.call_id.clone();
                match self.dispatcher.dispatch(call).await {
                    Ok(_) if self.released => self.skip_next_done = true,
                    Ok(_) => {}
                    Err(e) => {
                        error!(%call_id, error = %e, "Tool call failed; abandoning turn");
                        self.abort();
                    }
                }
            }
            ServerEvent::ResponseCreated => self.released = false,
            ServerEvent::SessionCreated => debug!("Session created"),
            ServerEvent::SessionUpdated => info!("Session configuration acknowledged"),
            ServerEvent::Error(ErrorEvent { error }) => {
                error!(
                    kind = ?error.kind,
                    code = ?error.code,
                    message = %error.message,
                    "Realtime API reported an error"
                );
                // No follow-up text will arrive for a rejected request.
                self.skip_next_done = false;
                self.abort();
            }
            ServerEvent::Unknown(event_type) => {
                debug!(%event_type, "Ignoring unhandled server event");
            }
        }
    }

    fn release(&mut self, outcome: TurnOutcome) {
        self.turns.notify(outcome);
        self.released = true;
    }

    fn abort(&mut self) {
        if !self.released {
            self.release(TurnOutcome::Aborted);
        }
    }
}
