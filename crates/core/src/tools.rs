//! Local Tool Capabilities
//!
//! Functions the remote model may call during a conversation. Each tool
//! declares a name, a description, and a JSON Schema for its arguments, and
//! evaluates to a single number.

use openai_realtime::events::{FunctionDefinition, ToolDefinition};
use serde_json::{Value, json};
use std::collections::BTreeMap;
use tracing::info;

/// Decoded tool arguments: argument name to numeric value.
pub type ToolArguments = BTreeMap<String, f64>;

/// Errors raised while preparing a tool call.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("invalid tool arguments: {0}")]
    InvalidArguments(#[from] serde_json::Error),
}

/// Decodes the model's JSON-encoded arguments string.
///
/// Fails if the string is not a JSON object whose values are all numbers.
pub fn parse_arguments(raw: &str) -> Result<ToolArguments, ToolError> {
    Ok(serde_json::from_str(raw)?)
}

/// Formats a tool result the way it is returned to the model.
pub fn format_output(value: f64) -> String {
    format!("{value:.2}")
}

/// A capability the model can invoke by name.
pub trait LocalTool: Send + Sync {
    fn name(&self) -> &'static str;
    fn description(&self) -> &'static str;
    /// JSON Schema of the arguments object.
    fn parameters(&self) -> Value;
    fn invoke(&self, args: &ToolArguments) -> f64;

    fn definition(&self) -> ToolDefinition {
        ToolDefinition::Function(FunctionDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters(),
        })
    }
}

/// `multiply(a, b) = a * b`.
///
/// A missing `a` or `b` reads as `0`, so a call that omits a required
/// argument still produces a result instead of an error.
#[derive(Debug, Default, Clone, Copy)]
pub struct Multiply;

impl Multiply {
    pub fn apply(a: f64, b: f64) -> f64 {
        a * b
    }
}

impl LocalTool for Multiply {
    fn name(&self) -> &'static str {
        "multiply"
    }

    fn description(&self) -> &'static str {
        "Multiplies two numbers and returns the result"
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "a": { "type": "number", "description": "First number to multiply" },
                "b": { "type": "number", "description": "Second number to multiply" }
            },
            "required": ["a", "b"]
        })
    }

    fn invoke(&self, args: &ToolArguments) -> f64 {
        let a = args.get("a").copied().unwrap_or_default();
        let b = args.get("b").copied().unwrap_or_default();
        let result = Self::apply(a, b);
        info!(a, b, result, "Executing tool 'multiply'");
        result
    }
}

/// The set of tools declared to the model, keyed by name.
#[derive(Default)]
pub struct ToolRegistry {
    tools: BTreeMap<&'static str, Box<dyn LocalTool>>,
}

impl ToolRegistry {
    /// An empty registry; the session is configured without tools.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every built-in tool.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Multiply);
        registry
    }

    /// Adds `tool`, replacing any tool with the same name.
    pub fn register<T: LocalTool + 'static>(&mut self, tool: T) {
        self.tools.insert(tool.name(), Box::new(tool));
    }

    pub fn get(&self, name: &str) -> Option<&dyn LocalTool> {
        self.tools.get(name).map(|tool| tool.as_ref())
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Invokes the named tool, or returns `None` if no such tool is registered.
    pub fn invoke(&self, name: &str, args: &ToolArguments) -> Option<f64> {
        self.get(name).map(|tool| tool.invoke(args))
    }

    /// Wire declarations for `session.update`, in name order.
    pub fn declarations(&self) -> Vec<ToolDefinition> {
        self.tools.values().map(|tool| tool.definition()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_numeric_arguments() {
        let args = parse_arguments(r#"{"a":3,"b":4.5}"#).unwrap();
        assert_eq!(args.get("a"), Some(&3.0));
        assert_eq!(args.get("b"), Some(&4.5));
    }

    #[test]
    fn rejects_arguments_that_are_not_a_numeric_object() {
        assert!(parse_arguments("not json").is_err());
        assert!(parse_arguments(r#"{"a":"three","b":4}"#).is_err());
        assert!(parse_arguments("[3,4]").is_err());
    }

    #[test]
    fn formats_with_two_decimals() {
        assert_eq!(format_output(12.0), "12.00");
        assert_eq!(format_output(2.0 / 3.0), "0.67");
        assert_eq!(format_output(-2.5), "-2.50");
    }

    #[test]
    fn multiply_reads_missing_arguments_as_zero() {
        let args = parse_arguments(r#"{"a":7}"#).unwrap();
        assert_eq!(Multiply.invoke(&args), 0.0);

        let args = parse_arguments(r#"{"a":3,"b":4}"#).unwrap();
        assert_eq!(Multiply.invoke(&args), 12.0);
    }

    #[test]
    fn registry_invokes_known_tools_only() {
        let registry = ToolRegistry::with_defaults();
        let args = parse_arguments(r#"{"a":1.5,"b":2}"#).unwrap();

        assert_eq!(registry.invoke("multiply", &args), Some(3.0));
        assert_eq!(registry.invoke("divide", &args), None);
    }

    #[test]
    fn empty_registry_declares_nothing() {
        let registry = ToolRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.declarations().is_empty());
    }

    #[test]
    fn multiply_declaration_requires_a_and_b() {
        let declarations = ToolRegistry::with_defaults().declarations();
        assert_eq!(declarations.len(), 1);

        let ToolDefinition::Function(function) = &declarations[0];
        assert_eq!(function.name, "multiply");
        assert_eq!(function.parameters["type"], "object");
        assert_eq!(function.parameters["properties"]["a"]["type"], "number");
        assert_eq!(function.parameters["properties"]["b"]["type"], "number");
        assert_eq!(function.parameters["required"], json!(["a", "b"]));
    }
}
