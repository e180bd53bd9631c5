use std::collections::HashSet;
use std::path::Path;

use crate::Config;
use crate::providers::ReasoningEcho;

/// Provider table shipped with the crate
const BUILTIN_PROVIDERS: &str = include_str!("../defaults/providers.toml");

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Reads the file, expands `{{ env.VAR }}` placeholders, then
    /// deserializes and validates the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, environment variable
    /// expansion fails, TOML parsing fails, or validation fails
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;

        let config = Self::from_toml_str(&raw)?;
        tracing::debug!(path = %path.display(), providers = config.providers.len(), "loaded provider configuration");

        Ok(config)
    }

    /// Parse and validate configuration from TOML text
    ///
    /// # Errors
    ///
    /// Returns an error if placeholder expansion, parsing or validation fails
    pub fn from_toml_str(raw: &str) -> anyhow::Result<Self> {
        let expanded =
            crate::env::expand_env(raw).map_err(|e| anyhow::anyhow!("config variable expansion failed: {e}"))?;

        let config: Self = toml::from_str(&expanded).map_err(|e| anyhow::anyhow!("failed to parse config: {e}"))?;

        config.validate()?;

        Ok(config)
    }

    /// Provider table bundled with the crate
    ///
    /// # Errors
    ///
    /// Returns an error only if the bundled table is itself invalid
    pub fn builtin() -> anyhow::Result<Self> {
        Self::from_toml_str(BUILTIN_PROVIDERS).map_err(|e| anyhow::anyhow!("bundled provider table is invalid: {e}"))
    }

    /// Overlay `other` on top of `self`
    ///
    /// Providers present in `other` replace those with the same id; the
    /// logging section of `other` wins.
    #[must_use]
    pub fn merge(mut self, other: Self) -> Self {
        for (id, provider) in other.providers {
            self.providers.insert(id, provider);
        }
        self.logging = other.logging;
        self
    }

    /// Validate that the configuration is internally consistent
    ///
    /// # Errors
    ///
    /// Returns an error if no provider is configured, a model pattern is not
    /// a valid regex, a dialect is listed twice, or signatures are required
    /// while reasoning is never echoed
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.providers.is_empty() {
            anyhow::bail!("at least one provider must be configured");
        }

        for (id, provider) in &self.providers {
            validate_dialects(id, provider.dialects.as_deref())?;

            for (pattern, over) in &provider.models {
                regex::Regex::new(pattern)
                    .map_err(|e| anyhow::anyhow!("invalid model pattern '{pattern}' for provider '{id}': {e}"))?;
                validate_dialects(id, over.dialects.as_deref())?;
            }

            let reasoning = &provider.reasoning;
            if reasoning.signature == Some(true) && reasoning.echo == Some(ReasoningEcho::Never) {
                anyhow::bail!("provider '{id}' requires reasoning signatures but never echoes reasoning");
            }
        }

        Ok(())
    }
}

fn validate_dialects(id: &str, dialects: Option<&[crate::Dialect]>) -> anyhow::Result<()> {
    let mut seen = HashSet::new();
    for dialect in dialects.unwrap_or_default() {
        if !seen.insert(dialect) {
            anyhow::bail!("provider '{id}' lists dialect '{dialect}' more than once");
        }
    }
    Ok(())
}
