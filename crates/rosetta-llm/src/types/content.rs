use rosetta_config::Dialect;
use serde::{Deserialize, Serialize};

/// One piece of a conversation turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    /// Visible text
    Text {
        /// The text, whitespace preserved
        value: String,
    },
    /// A tool call made by the assistant
    ToolInvocation(ToolInvocation),
    /// The caller's answer to a tool call
    ToolResult(ToolResult),
    /// Model reasoning, possibly signed
    Reasoning(Reasoning),
}

impl ContentBlock {
    /// Text block from anything string-like
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text { value: value.into() }
    }

    /// Text content if this is a text block
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text { value } => Some(value),
            _ => None,
        }
    }

    /// Invocation if this is a tool-invocation block
    pub const fn as_tool_invocation(&self) -> Option<&ToolInvocation> {
        match self {
            Self::ToolInvocation(invocation) => Some(invocation),
            _ => None,
        }
    }

    /// Result if this is a tool-result block
    pub const fn as_tool_result(&self) -> Option<&ToolResult> {
        match self {
            Self::ToolResult(result) => Some(result),
            _ => None,
        }
    }

    /// Reasoning if this is a reasoning block
    pub const fn as_reasoning(&self) -> Option<&Reasoning> {
        match self {
            Self::Reasoning(reasoning) => Some(reasoning),
            _ => None,
        }
    }
}

impl From<ToolInvocation> for ContentBlock {
    fn from(invocation: ToolInvocation) -> Self {
        Self::ToolInvocation(invocation)
    }
}

impl From<ToolResult> for ContentBlock {
    fn from(result: ToolResult) -> Self {
        Self::ToolResult(result)
    }
}

impl From<Reasoning> for ContentBlock {
    fn from(reasoning: Reasoning) -> Self {
        Self::Reasoning(reasoning)
    }
}

/// A tool call, however the model expressed it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolInvocation {
    /// Identifier echoed by the matching [`ToolResult`]
    pub call_id: String,
    /// Tool name
    pub name: String,
    /// Arguments exactly as the model produced them
    pub arguments: String,
    /// Where in the response the call was found
    pub origin: InvocationOrigin,
}

impl ToolInvocation {
    /// Invocation read from a vendor's structured tool-call field
    pub fn native(call_id: impl Into<String>, name: impl Into<String>, arguments: impl Into<String>) -> Self {
        Self {
            call_id: call_id.into(),
            name: name.into(),
            arguments: arguments.into(),
            origin: InvocationOrigin::NativeStructured,
        }
    }

    /// Invocation recovered from text written in `dialect`
    pub fn degraded(
        dialect: Dialect,
        call_id: impl Into<String>,
        name: impl Into<String>,
        arguments: impl Into<String>,
    ) -> Self {
        Self {
            call_id: call_id.into(),
            name: name.into(),
            arguments: arguments.into(),
            origin: InvocationOrigin::DegradedText(dialect),
        }
    }

    /// Same tool with byte-identical arguments
    pub fn same_call(&self, other: &Self) -> bool {
        self.name == other.name && self.arguments == other.arguments
    }
}

/// Provenance of a [`ToolInvocation`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "dialect", rename_all = "snake_case")]
pub enum InvocationOrigin {
    /// Read from the vendor's documented tool-call field
    NativeStructured,
    /// Recovered from free text in the given dialect
    DegradedText(Dialect),
}

/// Result of a tool call supplied by the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolResult {
    /// Call id of the invocation being answered
    pub call_id: String,
    /// Result payload
    pub content: String,
    /// Whether the tool failed
    #[serde(default)]
    pub is_error: bool,
}

impl ToolResult {
    /// Successful result for `call_id`
    pub fn new(call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            call_id: call_id.into(),
            content: content.into(),
            is_error: false,
        }
    }

    /// Failed result for `call_id`
    pub fn error(call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            is_error: true,
            ..Self::new(call_id, content)
        }
    }
}

/// Opaque provider signature over a reasoning block
///
/// Stored and replayed byte for byte; never parsed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Signature(String);

impl Signature {
    /// Wrap a signature exactly as received
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// The signature exactly as received
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Model reasoning attached to an assistant turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reasoning {
    /// Reasoning text; empty when only a signature was returned
    pub text: String,
    /// Provider signature that must be replayed unchanged
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<Signature>,
    /// Text is a summary of a longer hidden trace
    #[serde(default)]
    pub summarized: bool,
    /// Provider returned the trace encrypted; `signature` holds the payload
    #[serde(default)]
    pub redacted: bool,
}

impl Reasoning {
    /// Unsigned reasoning text
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            signature: None,
            summarized: false,
            redacted: false,
        }
    }

    /// Reasoning text with its provider signature
    pub fn signed(text: impl Into<String>, signature: Signature) -> Self {
        Self {
            signature: Some(signature),
            ..Self::plain(text)
        }
    }

    /// Encrypted trace; only the opaque payload is kept
    pub fn redacted(payload: Signature) -> Self {
        Self {
            redacted: true,
            ..Self::signed(String::new(), payload)
        }
    }

    /// Mark the text as a summary
    #[must_use]
    pub const fn summarized(mut self, summarized: bool) -> Self {
        self.summarized = summarized;
        self
    }
}
