//! Typed wire events for the OpenAI Realtime API.
//!
//! Outbound events are built through [`ClientEvent`]'s constructors and
//! serialized with a single `serde_json` call. Inbound events are decoded by
//! reading the `type` tag first and then the variant body, so an unfamiliar
//! tag never fails the decode.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;

pub const SESSION_UPDATE: &str = "session.update";
pub const CONVERSATION_ITEM_CREATE: &str = "conversation.item.create";
pub const RESPONSE_CREATE: &str = "response.create";

pub const SESSION_CREATED: &str = "session.created";
pub const SESSION_UPDATED: &str = "session.updated";
pub const RESPONSE_CREATED: &str = "response.created";
pub const RESPONSE_TEXT_DELTA: &str = "response.text.delta";
pub const RESPONSE_TEXT_DONE: &str = "response.text.done";
pub const RESPONSE_FUNCTION_CALL_ARGUMENTS_DONE: &str = "response.function_call_arguments.done";
pub const ERROR: &str = "error";

// --- Client events ---

/// A client-to-server event. Discriminated by the `type` field on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClientEvent {
    /// Replaces the session configuration.
    #[serde(rename = "session.update")]
    SessionUpdate { session: SessionConfig },
    /// Adds an item to the conversation.
    #[serde(rename = "conversation.item.create")]
    ConversationItemCreate { item: Item },
    /// Asks the model to generate a response from the conversation so far.
    #[serde(rename = "response.create")]
    ResponseCreate,
}

impl ClientEvent {
    pub fn session_update(session: SessionConfig) -> Self {
        Self::SessionUpdate { session }
    }

    /// A user message made of a single `input_text` part.
    pub fn user_text(text: impl Into<String>) -> Self {
        Self::ConversationItemCreate {
            item: Item::Message {
                role: Role::User,
                content: vec![ContentPart::InputText { text: text.into() }],
            },
        }
    }

    /// The result of a tool call, correlated by the model's `call_id`.
    pub fn function_output(call_id: impl Into<String>, output: impl Into<String>) -> Self {
        Self::ConversationItemCreate {
            item: Item::FunctionCallOutput {
                call_id: call_id.into(),
                output: output.into(),
            },
        }
    }

    pub fn response_create() -> Self {
        Self::ResponseCreate
    }

    /// Returns the wire tag, e.g. `"session.update"`.
    pub const fn event_type(&self) -> &'static str {
        match self {
            Self::SessionUpdate { .. } => SESSION_UPDATE,
            Self::ConversationItemCreate { .. } => CONVERSATION_ITEM_CREATE,
            Self::ResponseCreate => RESPONSE_CREATE,
        }
    }
}

/// Session parameters sent with `session.update`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub modalities: Vec<Modality>,
    pub instructions: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<ToolDefinition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<ToolChoice>,
}

impl SessionConfig {
    /// A text-only session with no tools.
    pub fn text_only(instructions: impl Into<String>) -> Self {
        Self {
            modalities: vec![Modality::Text],
            instructions: instructions.into(),
            tools: Vec::new(),
            tool_choice: None,
        }
    }

    /// Declares `tools` and lets the model decide when to call them.
    ///
    /// An empty list leaves the session without tools or a tool choice.
    pub fn with_tools(mut self, tools: Vec<ToolDefinition>) -> Self {
        self.tool_choice = (!tools.is_empty()).then_some(ToolChoice::Auto);
        self.tools = tools;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modality {
    Text,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolChoice {
    Auto,
}

/// A callable declared to the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ToolDefinition {
    Function(FunctionDefinition),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDefinition {
    pub name: String,
    pub description: String,
    /// JSON Schema for the arguments object.
    pub parameters: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Item {
    Message {
        role: Role,
        content: Vec<ContentPart>,
    },
    FunctionCallOutput {
        call_id: String,
        output: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    InputText { text: String },
}

// --- Server events ---

/// A server-to-client event.
#[derive(Debug, Clone, PartialEq)]
pub enum ServerEvent {
    SessionCreated,
    SessionUpdated,
    /// A new response started; every later response event belongs to it
    /// until the next one.
    ResponseCreated,
    TextDelta(TextDelta),
    TextDone,
    FunctionCallArgumentsDone(FunctionCallArgumentsDone),
    Error(ErrorEvent),
    /// Any tag this client does not consume, kept for logging.
    Unknown(String),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TextDelta {
    pub delta: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FunctionCallArgumentsDone {
    pub call_id: String,
    pub name: String,
    /// JSON-encoded arguments object, as produced by the model.
    pub arguments: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ErrorEvent {
    pub error: ApiError,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ApiError {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    pub message: String,
}

#[derive(Deserialize)]
struct Envelope<'a> {
    #[serde(rename = "type", borrow)]
    kind: Cow<'a, str>,
}

impl ServerEvent {
    /// Decodes one text frame.
    ///
    /// Fails only when the frame is not a JSON object with a string `type`,
    /// or when a known tag is missing a field this client reads.
    pub fn decode(text: &str) -> Result<Self, serde_json::Error> {
        let Envelope { kind } = serde_json::from_str(text)?;
        let event = match kind.as_ref() {
            SESSION_CREATED => Self::SessionCreated,
            SESSION_UPDATED => Self::SessionUpdated,
            RESPONSE_CREATED => Self::ResponseCreated,
            RESPONSE_TEXT_DELTA => Self::TextDelta(serde_json::from_str(text)?),
            RESPONSE_TEXT_DONE => Self::TextDone,
            RESPONSE_FUNCTION_CALL_ARGUMENTS_DONE => {
                Self::FunctionCallArgumentsDone(serde_json::from_str(text)?)
            }
            ERROR => Self::Error(serde_json::from_str(text)?),
            _ => Self::Unknown(kind.to_string()),
        };
        Ok(event)
    }

    pub fn event_type(&self) -> &str {
        match self {
            Self::SessionCreated => SESSION_CREATED,
            Self::SessionUpdated => SESSION_UPDATED,
            Self::ResponseCreated => RESPONSE_CREATED,
            Self::TextDelta(_) => RESPONSE_TEXT_DELTA,
            Self::TextDone => RESPONSE_TEXT_DONE,
            Self::FunctionCallArgumentsDone(_) => RESPONSE_FUNCTION_CALL_ARGUMENTS_DONE,
            Self::Error(_) => ERROR,
            Self::Unknown(kind) => kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn multiply_tool() -> ToolDefinition {
        ToolDefinition::Function(FunctionDefinition {
            name: "multiply".to_string(),
            description: "Multiplies two numbers and returns the result".to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "a": { "type": "number", "description": "First number to multiply" },
                    "b": { "type": "number", "description": "Second number to multiply" }
                },
                "required": ["a", "b"]
            }),
        })
    }

    #[test]
    fn session_update_wire_shape() {
        let event = ClientEvent::session_update(
            SessionConfig::text_only("Be brief.").with_tools(vec![multiply_tool()]),
        );
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "session.update",
                "session": {
                    "modalities": ["text"],
                    "instructions": "Be brief.",
                    "tools": [{
                        "type": "function",
                        "name": "multiply",
                        "description": "Multiplies two numbers and returns the result",
                        "parameters": {
                            "type": "object",
                            "properties": {
                                "a": { "type": "number", "description": "First number to multiply" },
                                "b": { "type": "number", "description": "Second number to multiply" }
                            },
                            "required": ["a", "b"]
                        }
                    }],
                    "tool_choice": "auto"
                }
            })
        );
    }

    #[test]
    fn session_update_without_tools_omits_tool_fields() {
        let event = ClientEvent::session_update(SessionConfig::text_only("Hi").with_tools(vec![]));
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "session.update",
                "session": { "modalities": ["text"], "instructions": "Hi" }
            })
        );
    }

    #[test]
    fn session_update_reads_back_what_was_sent() {
        let sent = ClientEvent::session_update(
            SessionConfig::text_only("You are a helpful assistant.")
                .with_tools(vec![multiply_tool()]),
        );
        let wire = serde_json::to_string(&sent).unwrap();
        let received: ClientEvent = serde_json::from_str(&wire).unwrap();

        assert_eq!(received.event_type(), "session.update");
        let ClientEvent::SessionUpdate { session } = received else {
            panic!("expected session.update");
        };
        assert_eq!(session.modalities, vec![Modality::Text]);
        assert_eq!(session.instructions, "You are a helpful assistant.");
        assert_eq!(session.tools, vec![multiply_tool()]);
        assert_eq!(session.tool_choice, Some(ToolChoice::Auto));
    }

    #[test]
    fn user_message_wire_shape() {
        let value = serde_json::to_value(ClientEvent::user_text("hello")).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "conversation.item.create",
                "item": {
                    "type": "message",
                    "role": "user",
                    "content": [{ "type": "input_text", "text": "hello" }]
                }
            })
        );
    }

    #[test]
    fn function_output_and_response_create_wire_shapes() {
        let output = serde_json::to_value(ClientEvent::function_output("call_1", "12.00")).unwrap();
        assert_eq!(
            output,
            json!({
                "type": "conversation.item.create",
                "item": { "type": "function_call_output", "call_id": "call_1", "output": "12.00" }
            })
        );

        let trigger = serde_json::to_string(&ClientEvent::response_create()).unwrap();
        assert_eq!(trigger, r#"{"type":"response.create"}"#);
    }

    #[test]
    fn decodes_consumed_server_events() {
        let delta = ServerEvent::decode(
            r#"{"type":"response.text.delta","event_id":"ev_1","response_id":"r","delta":"Hel"}"#,
        )
        .unwrap();
        assert_eq!(
            delta,
            ServerEvent::TextDelta(TextDelta {
                delta: "Hel".to_string()
            })
        );

        let done =
            ServerEvent::decode(r#"{"type":"response.text.done","text":"Hello"}"#).unwrap();
        assert_eq!(done, ServerEvent::TextDone);

        let created =
            ServerEvent::decode(r#"{"type":"response.created","response":{"id":"resp_1"}}"#)
                .unwrap();
        assert_eq!(created, ServerEvent::ResponseCreated);

        let call = ServerEvent::decode(
            r#"{"type":"response.function_call_arguments.done","call_id":"call_1","name":"multiply","arguments":"{\"a\":3,\"b\":4}","output_index":0}"#,
        )
        .unwrap();
        assert_eq!(
            call,
            ServerEvent::FunctionCallArgumentsDone(FunctionCallArgumentsDone {
                call_id: "call_1".to_string(),
                name: "multiply".to_string(),
                arguments: r#"{"a":3,"b":4}"#.to_string(),
            })
        );
    }

    #[test]
    fn decodes_error_event() {
        let event = ServerEvent::decode(
            r#"{"type":"error","error":{"type":"invalid_request_error","code":"bad","message":"nope"}}"#,
        )
        .unwrap();
        let ServerEvent::Error(ErrorEvent { error }) = event else {
            panic!("expected error event");
        };
        assert_eq!(error.kind.as_deref(), Some("invalid_request_error"));
        assert_eq!(error.message, "nope");
    }

    #[test]
    fn unknown_tags_are_kept_not_rejected() {
        let event = ServerEvent::decode(r#"{"type":"rate_limits.updated","rate_limits":[]}"#).unwrap();
        assert_eq!(event, ServerEvent::Unknown("rate_limits.updated".to_string()));
        assert_eq!(event.event_type(), "rate_limits.updated");
    }

    #[test]
    fn malformed_frames_fail_to_decode() {
        assert!(ServerEvent::decode("not json").is_err());
        assert!(ServerEvent::decode(r#"{"delta":"x"}"#).is_err());
        assert!(ServerEvent::decode(r#"{"type":"response.text.delta"}"#).is_err());
    }
}
