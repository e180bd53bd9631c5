//! Chat completions wire format types
//!
//! Shared by every vendor that speaks the `OpenAI` chat shape; vendor
//! extensions such as `reasoning_content` are plain optional fields.

use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

// -- Response types --

/// Chat completion response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatResponse {
    /// Response identifier
    #[serde(default)]
    pub id: Option<String>,
    /// Model that generated the response
    #[serde(default)]
    pub model: Option<String>,
    /// Completion choices; only the first is assembled
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

/// Single choice in a chat completion
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatChoice {
    /// Index of this choice
    #[serde(default)]
    pub index: u32,
    /// Generated message
    #[serde(default)]
    pub message: ChatChoiceMessage,
    /// Reason generation stopped
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Message within a chat completion choice
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatChoiceMessage {
    /// Role (always "assistant")
    #[serde(default)]
    pub role: Option<String>,
    /// Text content
    #[serde(default)]
    pub content: Option<String>,
    /// Reasoning trace (`DeepSeek`, Kimi, `DashScope`, ...)
    #[serde(default)]
    pub reasoning_content: Option<String>,
    /// Reasoning trace (`OpenRouter` and some gateways)
    #[serde(default)]
    pub reasoning: Option<String>,
    /// Native tool calls
    #[serde(default)]
    pub tool_calls: Option<Vec<ChatToolCall>>,
}

impl ChatChoiceMessage {
    /// Reasoning trace from whichever field the vendor used
    pub fn reasoning_text(&self) -> Option<&str> {
        self.reasoning_content
            .as_deref()
            .or(self.reasoning.as_deref())
            .filter(|text| !text.trim().is_empty())
    }
}

/// Native tool call in a response
#[derive(Debug, Clone, Deserialize)]
pub struct ChatToolCall {
    /// Call identifier
    #[serde(default)]
    pub id: Option<String>,
    /// Function name and arguments
    pub function: ChatFunctionCall,
}

/// Function invocation in a response tool call
#[derive(Debug, Clone, Deserialize)]
pub struct ChatFunctionCall {
    /// Function name
    pub name: String,
    /// Arguments: a JSON string per the API, an object from some gateways
    #[serde(default)]
    pub arguments: Option<Box<RawValue>>,
}

impl ChatFunctionCall {
    /// Argument text as the model produced it
    ///
    /// A JSON string is unescaped to its contents; any other JSON value is
    /// returned as written.
    pub fn arguments_text(&self) -> Result<String, serde_json::Error> {
        match &self.arguments {
            None => Ok(String::new()),
            Some(raw) if raw.get() == "null" => Ok(String::new()),
            Some(raw) if raw.get().starts_with('"') => serde_json::from_str(raw.get()),
            Some(raw) => Ok(raw.get().to_owned()),
        }
    }
}

// -- Streaming types --

/// Streaming chunk
#[derive(Debug, Clone, Deserialize)]
pub struct ChatStreamChunk {
    /// Response identifier
    #[serde(default)]
    pub id: Option<String>,
    /// Model generating the response
    #[serde(default)]
    pub model: Option<String>,
    /// Delta choices
    #[serde(default)]
    pub choices: Vec<ChatStreamChoice>,
}

/// Choice within a streaming chunk
#[derive(Debug, Clone, Deserialize)]
pub struct ChatStreamChoice {
    /// Choice index
    #[serde(default)]
    pub index: u32,
    /// Incremental content
    #[serde(default)]
    pub delta: ChatStreamDelta,
    /// Reason generation stopped
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Incremental content in a streaming chunk
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatStreamDelta {
    /// Text fragment
    #[serde(default)]
    pub content: Option<String>,
    /// Reasoning fragment
    #[serde(default)]
    pub reasoning_content: Option<String>,
    /// Reasoning fragment under the alternate field name
    #[serde(default)]
    pub reasoning: Option<String>,
    /// Tool call fragments
    #[serde(default)]
    pub tool_calls: Option<Vec<ChatStreamToolCall>>,
}

/// Tool call fragment
#[derive(Debug, Clone, Deserialize)]
pub struct ChatStreamToolCall {
    /// Position of the call this fragment extends
    #[serde(default)]
    pub index: u32,
    /// Call identifier, present on the first fragment
    #[serde(default)]
    pub id: Option<String>,
    /// Function fragment
    #[serde(default)]
    pub function: Option<ChatStreamFunctionCall>,
}

/// Function fragment of a streamed tool call
#[derive(Debug, Clone, Deserialize)]
pub struct ChatStreamFunctionCall {
    /// Function name, present on the first fragment
    #[serde(default)]
    pub name: Option<String>,
    /// Arguments fragment
    #[serde(default)]
    pub arguments: Option<String>,
}

// -- Request types --

/// History portion of a chat completions request
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequestBody {
    /// Conversation messages
    pub messages: Vec<ChatMessage>,
    /// Reasoning switch for vendors that expose one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_thinking: Option<bool>,
}

/// Chat message
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    /// Role ("user", "assistant" or "tool")
    pub role: String,
    /// Text content
    pub content: Option<String>,
    /// Reasoning trace echoed back to the vendor
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning_content: Option<String>,
    /// Tool calls made by the assistant
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ChatRequestToolCall>>,
    /// ID of the tool call this message answers
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
    /// Tool name on tool messages, for vendors that want it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl ChatMessage {
    /// Message with only a role and text
    pub fn text(role: &str, content: Option<String>) -> Self {
        Self {
            role: role.to_owned(),
            content,
            reasoning_content: None,
            tool_calls: None,
            tool_call_id: None,
            name: None,
        }
    }
}

/// Tool call in a request message
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequestToolCall {
    /// Call identifier
    pub id: String,
    /// Always "function"
    #[serde(rename = "type")]
    pub call_type: String,
    /// Function name and arguments
    pub function: ChatRequestFunction,
}

/// Function invocation in a request tool call
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequestFunction {
    /// Function name
    pub name: String,
    /// Arguments as a JSON-encoded string
    pub arguments: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_arguments_are_unescaped_verbatim() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":null,
            "tool_calls":[{"id":"call_1","type":"function","function":{"name":"f","arguments":"{\"a\":  1}"}}]}}]}"#;
        let resp: ChatResponse = serde_json::from_str(body).unwrap();
        let call = &resp.choices[0].message.tool_calls.as_ref().unwrap()[0];
        assert_eq!(call.function.arguments_text().unwrap(), r#"{"a":  1}"#);
    }

    #[test]
    fn object_arguments_are_kept_as_written() {
        let body = r#"{"choices":[{"message":{"tool_calls":[{"id":"c","function":{"name":"f","arguments":{"b": 2}}}]}}]}"#;
        let resp: ChatResponse = serde_json::from_str(body).unwrap();
        let call = &resp.choices[0].message.tool_calls.as_ref().unwrap()[0];
        assert_eq!(call.function.arguments_text().unwrap(), r#"{"b": 2}"#);
    }

    #[test]
    fn reasoning_prefers_reasoning_content() {
        let msg: ChatChoiceMessage =
            serde_json::from_str(r#"{"reasoning_content":"a","reasoning":"b","content":"c"}"#).unwrap();
        assert_eq!(msg.reasoning_text(), Some("a"));

        let blank: ChatChoiceMessage = serde_json::from_str(r#"{"reasoning_content":"  "}"#).unwrap();
        assert_eq!(blank.reasoning_text(), None);
    }
}
