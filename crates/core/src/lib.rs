//! Chat Core
//!
//! Domain pieces of the realtime chat client that do not touch the network:
//! the local tools the model may call, and the session configuration that
//! declares them.

pub mod session;
pub mod tools;

pub use session::{DEFAULT_INSTRUCTIONS, session_config};
pub use tools::{LocalTool, Multiply, ToolArguments, ToolError, ToolRegistry};
