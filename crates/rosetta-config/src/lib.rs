//! Configuration for rosetta
//!
//! Describes which providers exist, which wire shape each one speaks and
//! which degraded dialects and reasoning rules apply to it.

#![allow(clippy::must_use_candidate)]

mod env;
mod loader;
pub mod logging;
pub mod providers;
pub mod vendor;

use indexmap::IndexMap;
use serde::Deserialize;

pub use env::ExpandError;
pub use logging::*;
pub use providers::*;
pub use vendor::*;

/// Top-level rosetta configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Log output settings
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Provider capability records keyed by provider id
    #[serde(default)]
    pub providers: IndexMap<String, ProviderConfig>,
}
