use indexmap::IndexMap;
use serde::Deserialize;

use crate::vendor::{Dialect, Vendor};

/// Capability record for a single provider
///
/// Every field except `vendor` is optional; unset values fall back to the
/// vendor defaults when the registry is built.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProviderConfig {
    /// Wire shape the provider speaks
    pub vendor: Vendor,
    /// Whether the provider documents a structured tool-call field
    #[serde(default)]
    pub native_tool_calls: Option<bool>,
    /// Degraded dialects the provider is known to emit
    #[serde(default)]
    pub dialects: Option<Vec<Dialect>>,
    /// What to do when a response carries both native and text tool calls
    #[serde(default)]
    pub mixed_tool_calls: Option<MixedToolCallPolicy>,
    /// Reasoning behavior
    #[serde(default)]
    pub reasoning: ReasoningConfig,
    /// Per-model overrides keyed by a regex over the model id
    #[serde(default)]
    pub models: IndexMap<String, ModelOverride>,
}

impl ProviderConfig {
    /// Minimal record for a vendor with every capability left at its default
    pub fn for_vendor(vendor: Vendor) -> Self {
        Self {
            vendor,
            native_tool_calls: None,
            dialects: None,
            mixed_tool_calls: None,
            reasoning: ReasoningConfig::default(),
            models: IndexMap::new(),
        }
    }
}

/// Reasoning capability flags
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReasoningConfig {
    /// Reasoning can be switched on or off per request
    #[serde(default)]
    pub togglable: Option<bool>,
    /// Which assistant turns must carry their reasoning on replay
    #[serde(default)]
    pub echo: Option<ReasoningEcho>,
    /// Reasoning blocks carry a signature that must be replayed verbatim
    #[serde(default)]
    pub signature: Option<bool>,
    /// Displayed reasoning is a summary of a longer, separately billed trace
    #[serde(default)]
    pub summarized: Option<bool>,
}

/// Replay policy for reasoning blocks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasoningEcho {
    /// Never send reasoning back
    Never,
    /// Send reasoning back only for turns that invoked a tool
    ToolTurns,
    /// Send reasoning back for every assistant turn
    Always,
}

/// Precedence between a native tool-call field and tool calls found in text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MixedToolCallPolicy {
    /// Trust the native field; skip tool dialect scanning of the text
    #[default]
    NativeOnly,
    /// Scan the text too, dropping calls identical to a native one
    Merge,
}

/// Per-model capability override
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelOverride {
    /// Override for native tool-call support
    #[serde(default)]
    pub native_tool_calls: Option<bool>,
    /// Override for the dialect list
    #[serde(default)]
    pub dialects: Option<Vec<Dialect>>,
    /// Override for the mixed tool-call policy
    #[serde(default)]
    pub mixed_tool_calls: Option<MixedToolCallPolicy>,
    /// Override for reasoning flags
    #[serde(default)]
    pub reasoning: ReasoningConfig,
}
