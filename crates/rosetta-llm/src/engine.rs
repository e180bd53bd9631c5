//! Engine facade
//!
//! Resolves the provider's capabilities, then hands off to the vendor
//! codec. The engine holds only an immutable registry snapshot, so clones
//! are cheap and can be shared across threads.

use std::sync::Arc;

use rosetta_config::Config;
use serde::Deserialize;

use crate::convert::{self, ReconstituteOptions, VendorRequestBody};
use crate::error::{AssembleError, ReconstituteError, RegistryError};
use crate::registry::{Capabilities, CapabilityRegistry};
use crate::stream::ChatStreamAccumulator;
use crate::types::{ConversationTurn, Role, ToolResult};

/// Normalizes vendor responses and rewrites history for replay
#[derive(Debug, Clone)]
pub struct Engine {
    registry: Arc<CapabilityRegistry>,
}

/// Model id fields of every supported response shape
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModelProbe {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    model_version: Option<String>,
}

impl Engine {
    pub const fn new(registry: Arc<CapabilityRegistry>) -> Self {
        Self { registry }
    }

    /// Build a registry from `config` and wrap it
    pub fn from_config(config: &Config) -> Result<Self, RegistryError> {
        Ok(Self::new(Arc::new(CapabilityRegistry::from_config(config)?)))
    }

    pub fn registry(&self) -> &CapabilityRegistry {
        &self.registry
    }

    /// Capabilities that would apply to `provider` and `model`
    pub fn capabilities(&self, provider: &str, model: Option<&str>) -> Option<Capabilities> {
        self.registry.resolve(provider, model)
    }

    /// Assemble one response body into a canonical assistant turn
    ///
    /// The model id is read from the body so per-model overrides apply.
    pub fn assemble(&self, provider: &str, body: &str, turn_index: u64) -> Result<ConversationTurn, AssembleError> {
        let model = probe_model(body);
        let caps = self.resolve_for_assembly(provider, model.as_deref())?;
        convert::assemble(&caps, body, turn_index)
    }

    /// Assemble a chat completion stream into a canonical assistant turn
    ///
    /// Chunks are raw SSE payloads, with or without the `data:` prefix.
    pub fn assemble_stream<I, S>(&self, provider: &str, chunks: I, turn_index: u64) -> Result<ConversationTurn, AssembleError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let base = self.resolve_for_assembly(provider, None)?;
        let mut accumulator = ChatStreamAccumulator::new(base.vendor);
        for chunk in chunks {
            accumulator.push(chunk.as_ref())?;
        }

        let response = accumulator.finish()?;
        let caps = self.resolve_for_assembly(provider, response.model.as_deref())?;
        convert::assemble_chat(&caps, response, turn_index)
    }

    /// Rewrite history and new tool results into `provider`'s request shape
    pub fn reconstitute(
        &self,
        provider: &str,
        history: &[ConversationTurn],
        new_tool_results: &[ToolResult],
    ) -> Result<VendorRequestBody, ReconstituteError> {
        self.reconstitute_with(provider, history, new_tool_results, ReconstituteOptions::default())
    }

    /// [`Engine::reconstitute`] with per-request options
    ///
    /// Per-model overrides follow the model of the latest assistant turn.
    pub fn reconstitute_with(
        &self,
        provider: &str,
        history: &[ConversationTurn],
        new_tool_results: &[ToolResult],
        options: ReconstituteOptions,
    ) -> Result<VendorRequestBody, ReconstituteError> {
        let model = history
            .iter()
            .rev()
            .filter(|turn| turn.role == Role::Assistant)
            .find_map(|turn| turn.model.as_deref());

        let caps = self
            .registry
            .resolve(provider, model)
            .ok_or_else(|| ReconstituteError::UnsupportedVendor {
                provider: provider.to_owned(),
            })?;
        convert::reconstitute(&caps, history, new_tool_results, options)
    }

    fn resolve_for_assembly(&self, provider: &str, model: Option<&str>) -> Result<Capabilities, AssembleError> {
        self.registry
            .resolve(provider, model)
            .ok_or_else(|| AssembleError::UnsupportedVendor {
                provider: provider.to_owned(),
            })
    }
}

/// Model id named in a response body, if any
///
/// Decode problems are left for the assembler to report.
fn probe_model(body: &str) -> Option<String> {
    let probe: ModelProbe = serde_json::from_str(body).ok()?;
    probe.model.or(probe.model_version)
}
