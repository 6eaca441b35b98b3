//! The turn-completion signal between the event listener and the turn driver.

use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, warn};

/// How a turn ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    /// The model finished its text response.
    Completed,
    /// The turn failed, locally or on the server, and no further output will
    /// arrive for it.
    Aborted,
}

/// Creates a single-slot signal. Notifying never blocks.
///
/// Dropping the [`TurnNotifier`] closes the signal, which releases a waiting
/// [`TurnWaiter`] with `None`.
pub fn turn_channel() -> (TurnNotifier, TurnWaiter) {
    let (tx, rx) = mpsc::channel(1);
    (TurnNotifier { tx }, TurnWaiter { rx })
}

/// Producer half, owned by the event listener.
#[derive(Debug)]
pub struct TurnNotifier {
    tx: mpsc::Sender<TurnOutcome>,
}

impl TurnNotifier {
    pub fn notify(&self, outcome: TurnOutcome) {
        match self.tx.try_send(outcome) {
            Ok(()) => {}
            Err(TrySendError::Full(outcome)) => {
                warn!(?outcome, "Previous turn signal not consumed yet; dropping this one");
            }
            Err(TrySendError::Closed(outcome)) => {
                debug!(?outcome, "Turn driver is gone; signal dropped");
            }
        }
    }
}

/// Consumer half, owned by the turn driver.
#[derive(Debug)]
pub struct TurnWaiter {
    rx: mpsc::Receiver<TurnOutcome>,
}

impl TurnWaiter {
    /// Waits for the current turn to end. `None` means the listener has stopped.
    pub async fn wait(&mut self) -> Option<TurnOutcome> {
        self.rx.recv().await
    }

    /// Drops a signal left over from an earlier turn, e.g. an error reported
    /// while no message was pending. Call before sending the next message.
    pub fn discard_stale(&mut self) {
        while let Ok(outcome) = self.rx.try_recv() {
            debug!(?outcome, "Discarding turn signal from an earlier turn");
        }
    }
}
