//! Programmatic configuration builder for integration tests

use std::io::Write;

use rosetta_config::{Config, Dialect, MixedToolCallPolicy, ModelOverride, ProviderConfig, ReasoningEcho, Vendor};
use rosetta_llm::Engine;

/// Builder for constructing test configurations
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a builder with no providers
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// Start from the bundled provider table
    pub fn builtin() -> Self {
        Self {
            config: Config::builtin().expect("bundled provider table is valid"),
        }
    }

    /// Add a provider with every capability at its vendor default
    pub fn with_provider(mut self, id: &str, vendor: Vendor) -> Self {
        self.config.providers.insert(id.to_owned(), ProviderConfig::for_vendor(vendor));
        self
    }

    /// Replace a provider's dialect list
    pub fn with_dialects(mut self, id: &str, dialects: &[Dialect]) -> Self {
        self.provider(id).dialects = Some(dialects.to_vec());
        self
    }

    /// Set a provider's mixed tool-call policy
    pub fn with_mixed_tool_calls(mut self, id: &str, policy: MixedToolCallPolicy) -> Self {
        self.provider(id).mixed_tool_calls = Some(policy);
        self
    }

    /// Set a provider's reasoning echo policy
    pub fn with_echo(mut self, id: &str, echo: ReasoningEcho) -> Self {
        self.provider(id).reasoning.echo = Some(echo);
        self
    }

    /// Mark a provider's reasoning as togglable
    pub fn with_togglable_reasoning(mut self, id: &str) -> Self {
        self.provider(id).reasoning.togglable = Some(true);
        self
    }

    /// Add a per-model override
    pub fn with_model_override(mut self, id: &str, pattern: &str, over: ModelOverride) -> Self {
        self.provider(id).models.insert(pattern.to_owned(), over);
        self
    }

    fn provider(&mut self, id: &str) -> &mut ProviderConfig {
        self.config
            .providers
            .get_mut(id)
            .unwrap_or_else(|| panic!("provider '{id}' must be added first"))
    }

    /// Build the final config
    pub fn build(self) -> Config {
        self.config.validate().expect("test config is valid");
        self.config
    }

    /// Build an engine over the final config
    pub fn engine(self) -> Engine {
        Engine::from_config(&self.build()).expect("registry builds")
    }
}

/// Write TOML to a temporary file and load it through the normal path
pub fn load_toml(toml: &str) -> anyhow::Result<Config> {
    let mut file = tempfile::NamedTempFile::new()?;
    file.write_all(toml.as_bytes())?;
    Config::load(file.path())
}
