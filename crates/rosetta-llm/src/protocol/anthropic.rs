//! Anthropic Messages API wire format types

use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

// -- Response types --

/// Anthropic messages API response
#[derive(Debug, Clone, Deserialize)]
pub struct AnthropicResponse {
    /// Response identifier
    #[serde(default)]
    pub id: Option<String>,
    /// Model that generated the response
    #[serde(default)]
    pub model: Option<String>,
    /// Content blocks in emission order
    #[serde(default)]
    pub content: Vec<AnthropicResponseBlock>,
    /// Reason generation stopped
    #[serde(default)]
    pub stop_reason: Option<String>,
}

/// Content block in an Anthropic response
///
/// Kept flat rather than tagged so `input` can stay a raw value; unknown
/// block types decode and are skipped by the assembler.
#[derive(Debug, Clone, Deserialize)]
pub struct AnthropicResponseBlock {
    /// Block type (`text`, `thinking`, `redacted_thinking`, `tool_use`, ...)
    #[serde(rename = "type")]
    pub block_type: String,
    /// Text of a `text` block
    #[serde(default)]
    pub text: Option<String>,
    /// Reasoning of a `thinking` block
    #[serde(default)]
    pub thinking: Option<String>,
    /// Signature of a `thinking` block
    #[serde(default)]
    pub signature: Option<String>,
    /// Encrypted payload of a `redacted_thinking` block
    #[serde(default)]
    pub data: Option<String>,
    /// Tool use identifier
    #[serde(default)]
    pub id: Option<String>,
    /// Tool name
    #[serde(default)]
    pub name: Option<String>,
    /// Tool input, byte for byte
    #[serde(default)]
    pub input: Option<Box<RawValue>>,
}

// -- Request types --

/// History portion of an Anthropic messages request
#[derive(Debug, Clone, Serialize)]
pub struct AnthropicRequestBody {
    /// Conversation messages, roles alternating
    pub messages: Vec<AnthropicMessage>,
    /// Extended thinking switch
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thinking: Option<AnthropicThinking>,
}

/// Anthropic message
#[derive(Debug, Clone, Serialize)]
pub struct AnthropicMessage {
    /// Role ("user" or "assistant")
    pub role: String,
    /// Content blocks
    pub content: Vec<AnthropicContentBlock>,
}

/// Content block in an Anthropic request message
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnthropicContentBlock {
    /// Text content
    Text {
        /// The text string
        text: String,
    },
    /// Reasoning replayed with its signature
    Thinking {
        /// Reasoning text
        thinking: String,
        /// Signature exactly as received
        #[serde(skip_serializing_if = "Option::is_none")]
        signature: Option<String>,
    },
    /// Encrypted reasoning replayed as received
    RedactedThinking {
        /// Opaque payload
        data: String,
    },
    /// Tool use request from the assistant
    ToolUse {
        /// Tool use identifier
        id: String,
        /// Tool name
        name: String,
        /// Tool input object
        input: Box<RawValue>,
    },
    /// Tool result from the user
    ToolResult {
        /// ID of the tool use this result corresponds to
        tool_use_id: String,
        /// Result content
        content: String,
        /// Whether the tool call failed
        #[serde(skip_serializing_if = "std::ops::Not::not")]
        is_error: bool,
    },
}

/// Extended thinking configuration
#[derive(Debug, Clone, Serialize)]
pub struct AnthropicThinking {
    /// `enabled` or `disabled`
    #[serde(rename = "type")]
    pub mode: String,
    /// Token budget for thinking, required when enabled
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget_tokens: Option<u32>,
}
