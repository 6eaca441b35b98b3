//! Runs tool calls requested by the model and returns their results.

use crate::console::Console;
use chat_core::{
    ToolError, ToolRegistry,
    tools::{format_output, parse_arguments},
};
use openai_realtime::{ClientEvent, EventSender, FunctionCallArgumentsDone, RealtimeError};
use std::sync::Arc;
use tracing::{instrument, warn};

#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error(transparent)]
    Arguments(#[from] ToolError),
    #[error(transparent)]
    Send(#[from] RealtimeError),
}

/// Answers `response.function_call_arguments.done` events.
pub struct ToolDispatcher {
    sender: Arc<dyn EventSender>,
    tools: Arc<ToolRegistry>,
    console: Console,
}

impl ToolDispatcher {
    pub fn new(sender: Arc<dyn EventSender>, tools: Arc<ToolRegistry>, console: Console) -> Self {
        Self {
            sender,
            tools,
            console,
        }
    }

    /// Invokes the requested tool and sends its output back, followed by
    /// `response.create` so the model continues with the result.
    ///
    /// Arguments that do not decode are an error and nothing is sent. A tool
    /// name that is not registered is answered with `0.00`.
    #[instrument(skip_all, fields(call_id = %call.call_id, name = %call.name))]
    pub async fn dispatch(&self, call: FunctionCallArgumentsDone) -> Result<f64, DispatchError> {
        self.console.print(&format!(
            "\n[Calling function: {} with args: {}]\n",
            call.name, call.arguments
        ));

        let args = parse_arguments(&call.arguments)?;
        let result = match self.tools.invoke(&call.name, &args) {
            Some(result) => {
                self.console
                    .print(&format!("Result: {}\n", format_output(result)));
                result
            }
            None => {
                warn!("Model called an undeclared tool; replying with 0");
                0.0
            }
        };

        self.sender
            .send(ClientEvent::function_output(
                call.call_id,
                format_output(result),
            ))
            .await?;
        self.sender.send(ClientEvent::response_create()).await?;
        Ok(result)
    }
}
