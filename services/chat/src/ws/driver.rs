//! The interactive input loop: one user message per turn.

use super::turn::{TurnOutcome, TurnWaiter};
use crate::console::Console;
use openai_realtime::{ClientEvent, EventSender, RealtimeError};
use std::sync::Arc;
use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt},
    sync::watch,
};
use tracing::{debug, error, warn};

const PROMPT: &str = "\nYou: ";

/// Reads lines and sends each one as a user message, waiting for the turn to
/// end before reading the next.
pub struct TurnDriver {
    sender: Arc<dyn EventSender>,
    turns: TurnWaiter,
    console: Console,
    shutdown: watch::Sender<bool>,
}

impl TurnDriver {
    pub fn new(
        sender: Arc<dyn EventSender>,
        turns: TurnWaiter,
        console: Console,
        shutdown: watch::Sender<bool>,
    ) -> Self {
        Self {
            sender,
            turns,
            console,
            shutdown,
        }
    }

    /// Runs until `exit`, `quit`, end of input, or the listener stopping, then
    /// raises shutdown and closes the connection.
    pub async fn run<R>(mut self, mut input: R)
    where
        R: AsyncBufRead + Unpin,
    {
        let mut buf = Vec::new();
        loop {
            self.console.print(PROMPT);
            buf.clear();
            let line = match input.read_until(b'\n', &mut buf).await {
                Ok(0) => {
                    debug!("End of input");
                    break;
                }
                Ok(_) => match std::str::from_utf8(trim_line_ending(&buf)) {
                    Ok(line) => line.to_string(),
                    Err(e) => {
                        warn!(error = %e, "Input line is not valid UTF-8; skipping it");
                        continue;
                    }
                },
                Err(e) => {
                    error!(error = %e, "Failed to read input");
                    break;
                }
            };

            match line.as_str() {
                "exit" | "quit" => break,
                "" => continue,
                _ => {}
            }

            self.turns.discard_stale();
            self.console.print("AI: ");
            if let Err(e) = self.send_user_message(line).await {
                error!(error = %e, "Failed to send message; turn abandoned");
                continue;
            }

            match self.turns.wait().await {
                Some(TurnOutcome::Completed) => {}
                Some(TurnOutcome::Aborted) => warn!("Turn ended without a response"),
                None => {
                    warn!("Message listener stopped; ending session");
                    break;
                }
            }
        }

        self.shutdown().await;
    }

    async fn send_user_message(&self, text: String) -> Result<(), RealtimeError> {
        self.sender.send(ClientEvent::user_text(text)).await?;
        self.sender.send(ClientEvent::response_create()).await
    }

    async fn shutdown(&self) {
        self.shutdown.send_replace(true);
        if let Err(e) = self.sender.close().await {
            warn!(error = %e, "Failed to close realtime connection");
        }
    }
}

fn trim_line_ending(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}
