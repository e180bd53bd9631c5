//! Vendor-neutral conversation model
//!
//! Every assembler produces these types and every writer consumes them.
//! Nothing here knows which vendor a block came from except the
//! [`ConversationTurn`] metadata.

mod content;
mod turn;

pub use content::{ContentBlock, InvocationOrigin, Reasoning, Signature, ToolInvocation, ToolResult};
pub use turn::{ConversationTurn, Role};
