use rosetta_config::{Dialect, Vendor};
use thiserror::Error;

/// A span matched a dialect's delimiters but its interior did not parse
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DialectError {
    /// Delimiters were present but the grammar inside them was not
    #[error("malformed {dialect} span: {reason}")]
    MalformedDialect {
        /// Dialect whose grammar rejected the span
        dialect: Dialect,
        /// What was wrong with it
        reason: String,
    },
}

impl DialectError {
    pub(crate) fn malformed(dialect: Dialect, reason: impl Into<String>) -> Self {
        Self::MalformedDialect {
            dialect,
            reason: reason.into(),
        }
    }
}

/// Errors raised while turning a vendor response into a canonical turn
#[derive(Debug, Error)]
pub enum AssembleError {
    /// The response decoded but held nothing to assemble
    #[error("response contained no decodable content")]
    EmptyResponse,

    /// No capability record exists for the named provider
    #[error("no capability record for provider: {provider}")]
    UnsupportedVendor { provider: String },

    /// The provider's vendor has no chat-completions stream shape
    #[error("{vendor} responses cannot be assembled from chat stream chunks")]
    UnsupportedStream { vendor: Vendor },

    /// The body was not valid JSON for the vendor's response shape
    #[error("failed to decode {vendor} response: {source}")]
    Decode {
        vendor: Vendor,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors raised while writing canonical history back to a vendor
#[derive(Debug, Error)]
pub enum ReconstituteError {
    /// A tool result references a call id no earlier assistant turn issued
    #[error("tool result references unknown call id: {call_id}")]
    UnknownCallId { call_id: String },

    /// No capability record exists for the named provider
    #[error("no capability record for provider: {provider}")]
    UnsupportedVendor { provider: String },

    /// A request fragment could not be encoded as JSON
    #[error("failed to encode request: {0}")]
    Encode(#[from] serde_json::Error),
}

impl ReconstituteError {
    /// Whether the caller's history, not the configuration, is at fault
    pub const fn is_history_error(&self) -> bool {
        matches!(self, Self::UnknownCallId { .. })
    }
}

/// Errors raised while building the capability registry
#[derive(Debug, Error)]
pub enum RegistryError {
    /// A per-model override key is not a valid regex
    #[error("invalid model pattern '{pattern}' for provider '{provider}': {source}")]
    InvalidModelPattern {
        provider: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },
}
