//! LLM response normalization and tool-call recovery for rosetta
//!
//! Turns heterogeneous provider responses into one canonical turn model,
//! recovering tool calls and reasoning that models wrote into free text
//! instead of the documented fields, and writes canonical history back in
//! each provider's request shape with signatures and call ids intact.

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

pub mod convert;
pub mod dialect;
pub mod engine;
pub mod error;
pub mod protocol;
pub mod registry;
pub mod stream;
pub mod types;

pub use convert::{ReconstituteOptions, VendorRequestBody};
pub use engine::Engine;
pub use error::{AssembleError, DialectError, ReconstituteError, RegistryError};
pub use registry::{Capabilities, CapabilityRegistry, ReasoningCapabilities, RegistryHandle};
pub use rosetta_config::{Dialect, Vendor};
pub use stream::ChatStreamAccumulator;
pub use types::{
    ContentBlock, ConversationTurn, InvocationOrigin, Reasoning, Role, Signature, ToolInvocation, ToolResult,
};
