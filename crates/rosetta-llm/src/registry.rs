//! Per-provider capability records
//!
//! Built once from [`Config`]; lookups are read-only. A
//! [`RegistryHandle`] swaps in a rebuilt registry without blocking readers.

use std::sync::Arc;

use arc_swap::ArcSwap;
use indexmap::IndexMap;
use regex::Regex;
use rosetta_config::{
    Config, Dialect, MixedToolCallPolicy, ModelOverride, ProviderConfig, ReasoningConfig, ReasoningEcho, Vendor,
};

use crate::error::RegistryError;
use crate::types::ConversationTurn;

/// Resolved capabilities for one provider and model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capabilities {
    /// Provider id the record was resolved for
    pub provider: String,
    /// Wire shape family
    pub vendor: Vendor,
    /// Provider documents a structured tool-call field
    pub native_tool_calls: bool,
    /// Degraded dialects to look for in text
    pub dialects: Vec<Dialect>,
    /// Precedence between native and text tool calls
    pub mixed_tool_calls: MixedToolCallPolicy,
    /// Reasoning behavior
    pub reasoning: ReasoningCapabilities,
}

/// Reasoning behavior of a provider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReasoningCapabilities {
    /// Reasoning can be switched per request
    pub togglable: bool,
    /// Which assistant turns replay their reasoning
    pub echo: ReasoningEcho,
    /// Reasoning is signed and the signature must be replayed
    pub signature: bool,
    /// Returned reasoning is a summary
    pub summarized: bool,
}

impl Capabilities {
    /// Capabilities a vendor has before any configuration is applied
    pub fn vendor_defaults(provider: impl Into<String>, vendor: Vendor) -> Self {
        use Dialect::{FunctionCallsXml, JsonObject, KimiTokens, MinimaxXml, ThinkTag};
        use ReasoningEcho::{Always, Never, ToolTurns};

        let (dialects, echo, signature, summarized, togglable): (&[Dialect], _, _, _, _) = match vendor {
            Vendor::Anthropic => (&[ThinkTag, FunctionCallsXml], Always, true, false, true),
            Vendor::Openai => (&[ThinkTag, FunctionCallsXml, JsonObject], Never, false, false, false),
            Vendor::Google => (&[ThinkTag], Always, true, true, true),
            Vendor::Deepseek => (&[ThinkTag], ToolTurns, false, false, false),
            Vendor::Kimi => (&[ThinkTag, KimiTokens], ToolTurns, false, false, false),
            Vendor::Minimax => (&[ThinkTag, MinimaxXml], Always, false, false, false),
        };

        Self {
            provider: provider.into(),
            vendor,
            native_tool_calls: true,
            dialects: dialects.to_vec(),
            mixed_tool_calls: MixedToolCallPolicy::default(),
            reasoning: ReasoningCapabilities {
                togglable,
                echo,
                signature,
                summarized,
            },
        }
    }

    fn apply(
        &mut self,
        native_tool_calls: Option<bool>,
        dialects: Option<&[Dialect]>,
        mixed_tool_calls: Option<MixedToolCallPolicy>,
        reasoning: &ReasoningConfig,
    ) {
        if let Some(native) = native_tool_calls {
            self.native_tool_calls = native;
        }
        if let Some(dialects) = dialects {
            self.dialects = dialects.to_vec();
        }
        if let Some(policy) = mixed_tool_calls {
            self.mixed_tool_calls = policy;
        }
        let current = &mut self.reasoning;
        current.togglable = reasoning.togglable.unwrap_or(current.togglable);
        current.echo = reasoning.echo.unwrap_or(current.echo);
        current.signature = reasoning.signature.unwrap_or(current.signature);
        current.summarized = reasoning.summarized.unwrap_or(current.summarized);
    }

    fn apply_provider(&mut self, config: &ProviderConfig) {
        self.apply(
            config.native_tool_calls,
            config.dialects.as_deref(),
            config.mixed_tool_calls,
            &config.reasoning,
        );
    }

    fn apply_model(&mut self, over: &ModelOverride) {
        self.apply(
            over.native_tool_calls,
            over.dialects.as_deref(),
            over.mixed_tool_calls,
            &over.reasoning,
        );
    }

    /// Whether text should be scanned for tool dialects
    ///
    /// Native calls win under [`MixedToolCallPolicy::NativeOnly`] unless
    /// the provider has no trustworthy native field at all.
    pub fn scans_text_for_tools(&self, has_native_calls: bool) -> bool {
        !has_native_calls || !self.native_tool_calls || self.mixed_tool_calls == MixedToolCallPolicy::Merge
    }

    /// Whether `turn`'s reasoning must be replayed
    pub fn echoes_reasoning(&self, turn: &ConversationTurn) -> bool {
        match self.reasoning.echo {
            ReasoningEcho::Never => false,
            ReasoningEcho::ToolTurns => turn.has_tool_invocation(),
            ReasoningEcho::Always => true,
        }
    }
}

#[derive(Debug)]
struct ProviderProfile {
    base: Capabilities,
    models: Vec<(Regex, ModelOverride)>,
}

/// Capability records keyed by provider id
#[derive(Debug, Default)]
pub struct CapabilityRegistry {
    providers: IndexMap<String, ProviderProfile>,
}

impl CapabilityRegistry {
    /// Build the registry from loaded configuration
    ///
    /// Model patterns match the whole model id.
    pub fn from_config(config: &Config) -> Result<Self, RegistryError> {
        let mut providers = IndexMap::with_capacity(config.providers.len());

        for (id, provider) in &config.providers {
            let mut base = Capabilities::vendor_defaults(id.clone(), provider.vendor);
            base.apply_provider(provider);

            let models = provider
                .models
                .iter()
                .map(|(pattern, over)| {
                    Regex::new(&format!("^(?:{pattern})$"))
                        .map(|re| (re, over.clone()))
                        .map_err(|source| RegistryError::InvalidModelPattern {
                            provider: id.clone(),
                            pattern: pattern.clone(),
                            source,
                        })
                })
                .collect::<Result<Vec<_>, _>>()?;

            tracing::debug!(
                provider = %id,
                vendor = %provider.vendor,
                dialects = ?base.dialects,
                overrides = models.len(),
                "registered provider capabilities"
            );
            providers.insert(id.clone(), ProviderProfile { base, models });
        }

        Ok(Self { providers })
    }

    /// Capabilities for `provider`, refined by every override matching `model`
    ///
    /// Overrides apply in declaration order, so later ones win.
    pub fn resolve(&self, provider: &str, model: Option<&str>) -> Option<Capabilities> {
        let profile = self.providers.get(provider)?;
        let mut caps = profile.base.clone();

        if let Some(model) = model {
            for (pattern, over) in &profile.models {
                if pattern.is_match(model) {
                    caps.apply_model(over);
                }
            }
        }

        Some(caps)
    }

    /// Configured provider ids in declaration order
    pub fn providers(&self) -> impl Iterator<Item = &str> {
        self.providers.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

/// Swappable registry snapshot
///
/// Readers take an `Arc` and keep it for as long as they need; a reload
/// only affects lookups made after it.
#[derive(Debug)]
pub struct RegistryHandle {
    current: ArcSwap<CapabilityRegistry>,
}

impl RegistryHandle {
    pub fn new(registry: CapabilityRegistry) -> Self {
        Self {
            current: ArcSwap::from_pointee(registry),
        }
    }

    /// Current registry
    pub fn snapshot(&self) -> Arc<CapabilityRegistry> {
        self.current.load_full()
    }

    /// Rebuild from `config` and swap it in
    ///
    /// On error the current registry stays in place.
    pub fn reload(&self, config: &Config) -> Result<(), RegistryError> {
        let next = CapabilityRegistry::from_config(config)?;
        tracing::info!(providers = next.len(), "capability registry reloaded");
        self.current.store(Arc::new(next));
        Ok(())
    }
}
