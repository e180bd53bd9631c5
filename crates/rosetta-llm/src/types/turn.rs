use rosetta_config::{Dialect, Vendor};
use serde::{Deserialize, Serialize};

use super::{ContentBlock, Reasoning, ToolInvocation, ToolResult};

/// Author of a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Caller input, including tool results
    User,
    /// Model output
    Assistant,
}

/// One turn of canonical conversation history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    /// Position in the conversation
    pub index: u64,
    /// Who produced the turn
    pub role: Role,
    /// Vendor that produced an assistant turn
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor: Option<Vendor>,
    /// Model that produced an assistant turn
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Degraded dialects observed while assembling this turn
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dialects: Vec<Dialect>,
    /// Ordered content
    pub blocks: Vec<ContentBlock>,
}

impl ConversationTurn {
    /// Caller turn with arbitrary blocks
    pub const fn user(index: u64, blocks: Vec<ContentBlock>) -> Self {
        Self {
            index,
            role: Role::User,
            vendor: None,
            model: None,
            dialects: Vec::new(),
            blocks,
        }
    }

    /// Caller turn carrying only text
    pub fn user_text(index: u64, text: impl Into<String>) -> Self {
        Self::user(index, vec![ContentBlock::text(text)])
    }

    /// Caller turn answering tool calls
    pub fn tool_results(index: u64, results: impl IntoIterator<Item = ToolResult>) -> Self {
        Self::user(index, results.into_iter().map(ContentBlock::ToolResult).collect())
    }

    /// Assistant turn produced by `vendor`
    pub fn assistant(index: u64, vendor: Vendor, model: Option<String>, blocks: Vec<ContentBlock>) -> Self {
        Self {
            index,
            role: Role::Assistant,
            vendor: Some(vendor),
            model,
            dialects: Vec::new(),
            blocks,
        }
    }

    /// Tool invocations in block order
    pub fn invocations(&self) -> impl Iterator<Item = &ToolInvocation> {
        self.blocks.iter().filter_map(ContentBlock::as_tool_invocation)
    }

    /// Tool results in block order
    pub fn results(&self) -> impl Iterator<Item = &ToolResult> {
        self.blocks.iter().filter_map(ContentBlock::as_tool_result)
    }

    /// Reasoning blocks in block order
    pub fn reasoning(&self) -> impl Iterator<Item = &Reasoning> {
        self.blocks.iter().filter_map(ContentBlock::as_reasoning)
    }

    /// Whether the turn invoked at least one tool
    pub fn has_tool_invocation(&self) -> bool {
        self.invocations().next().is_some()
    }

    /// Visible text blocks joined with newlines
    pub fn text(&self) -> String {
        self.blocks
            .iter()
            .filter_map(ContentBlock::as_text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}
