use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// Response/request shape family a provider speaks
///
/// Aggregators and regional endpoints map onto one of these in the
/// provider table; there is exactly one assembler and one writer per variant.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter, IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Vendor {
    /// Anthropic Messages API
    Anthropic,
    /// `OpenAI` chat completions
    Openai,
    /// Google Generative Language API
    Google,
    /// `DeepSeek` chat completions with `reasoning_content`
    Deepseek,
    /// Moonshot Kimi chat completions
    Kimi,
    /// `MiniMax` chat completions with inline `<think>` reasoning
    Minimax,
}

/// Degraded text encoding a model may fall back to
///
/// Declaration order is registration order: detection tries dialects in
/// this order and the first match wins.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Dialect {
    /// `<think>` / `<thinking>` reasoning spans
    ThinkTag,
    /// `<minimax:tool_call>` wrapper around `invoke` elements
    MinimaxXml,
    /// `<function_calls>` wrapper around `invoke` elements
    FunctionCallsXml,
    /// Kimi K2 `<|tool_calls_section_begin|>` sentinel tokens
    KimiTokens,
    /// Bare `{"name": ..., "arguments": {...}}` objects in text
    JsonObject,
}

impl Dialect {
    /// Whether this dialect carries reasoning rather than tool calls
    pub const fn is_reasoning(self) -> bool {
        matches!(self, Self::ThinkTag)
    }
}
