//! Realtime Conversation Loop
//!
//! The pieces that run while the socket is open:
//!
//! - `listener`: reads server events and routes them by type.
//! - `dispatch`: answers the model's tool calls.
//! - `driver`: reads user input and sends one message per turn.
//! - `turn`: the completion signal that keeps turns from overlapping.

mod dispatch;
mod driver;
mod listener;
mod turn;

#[cfg(test)]
pub(crate) mod testing;

pub use dispatch::{DispatchError, ToolDispatcher};
pub use driver::TurnDriver;
pub use listener::EventListener;
pub use turn::{TurnNotifier, TurnOutcome, TurnWaiter, turn_channel};
