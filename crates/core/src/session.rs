//! Session configuration sent once, right after the connection opens.

use crate::tools::ToolRegistry;
use openai_realtime::SessionConfig;

/// Instructions used when none are configured.
pub const DEFAULT_INSTRUCTIONS: &str =
    "You are a helpful assistant. When asked to multiply numbers, use the multiply function.";

/// Builds the text-only session, declaring every tool in `tools`.
///
/// With an empty registry the session carries no tools and no tool choice.
pub fn session_config(instructions: &str, tools: &ToolRegistry) -> SessionConfig {
    SessionConfig::text_only(instructions).with_tools(tools.declarations())
}
