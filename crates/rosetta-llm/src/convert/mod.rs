//! Conversion between vendor wire shapes and canonical turns
//!
//! Assembly turns one decoded response into a [`ConversationTurn`];
//! reconstitution writes canonical history back into a request body. There
//! is one codec per [`Vendor`] and dispatch is a single match on it.

mod anthropic;
mod deepseek;
mod google;
mod kimi;
mod minimax;
mod openai;

use std::collections::HashMap;

use rosetta_config::{Dialect, Vendor};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::value::{RawValue, to_raw_value};

use crate::dialect::{self, CallIds};
use crate::error::{AssembleError, ReconstituteError};
use crate::protocol::anthropic::AnthropicRequestBody;
use crate::protocol::google::GoogleRequestBody;
use crate::protocol::openai::{ChatRequestBody, ChatResponse};
use crate::registry::Capabilities;
use crate::types::{ContentBlock, ConversationTurn, InvocationOrigin, Reasoning, Role, ToolInvocation, ToolResult};

/// Request body fragment holding the rewritten history
///
/// Only conversation content and the reasoning switch are written; model,
/// tool definitions and system prompt belong to the caller.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum VendorRequestBody {
    /// Anthropic messages shape
    Anthropic(AnthropicRequestBody),
    /// Chat completions shape
    OpenAi(ChatRequestBody),
    /// Google contents shape
    Google(GoogleRequestBody),
}

impl VendorRequestBody {
    /// Encode as JSON, leaving argument bytes untouched
    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub const fn as_anthropic(&self) -> Option<&AnthropicRequestBody> {
        match self {
            Self::Anthropic(body) => Some(body),
            _ => None,
        }
    }

    pub const fn as_chat(&self) -> Option<&ChatRequestBody> {
        match self {
            Self::OpenAi(body) => Some(body),
            _ => None,
        }
    }

    pub const fn as_google(&self) -> Option<&GoogleRequestBody> {
        match self {
            Self::Google(body) => Some(body),
            _ => None,
        }
    }
}

/// Per-request reconstitution settings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconstituteOptions {
    /// Turn reasoning on or off; ignored when the provider cannot toggle it
    pub reasoning: Option<bool>,
}

trait VendorCodec {
    type Response: DeserializeOwned;

    fn assemble(
        caps: &Capabilities,
        response: Self::Response,
        turn_index: u64,
    ) -> Result<ConversationTurn, AssembleError>;

    fn reconstitute(
        caps: &Capabilities,
        history: &[ConversationTurn],
        calls: &CallIndex<'_>,
        new_results: &[ToolResult],
        options: ReconstituteOptions,
    ) -> Result<VendorRequestBody, ReconstituteError>;
}

/// Assemble a raw response body into a canonical turn
pub fn assemble(caps: &Capabilities, body: &str, turn_index: u64) -> Result<ConversationTurn, AssembleError> {
    match caps.vendor {
        Vendor::Anthropic => assemble_body::<anthropic::AnthropicCodec>(caps, body, turn_index),
        Vendor::Openai => assemble_body::<openai::OpenAiCodec>(caps, body, turn_index),
        Vendor::Google => assemble_body::<google::GoogleCodec>(caps, body, turn_index),
        Vendor::Deepseek => assemble_body::<deepseek::DeepseekCodec>(caps, body, turn_index),
        Vendor::Kimi => assemble_body::<kimi::KimiCodec>(caps, body, turn_index),
        Vendor::Minimax => assemble_body::<minimax::MinimaxCodec>(caps, body, turn_index),
    }
}

/// Assemble an already-decoded chat completion, e.g. one rebuilt from a stream
pub fn assemble_chat(
    caps: &Capabilities,
    response: ChatResponse,
    turn_index: u64,
) -> Result<ConversationTurn, AssembleError> {
    let turn = match caps.vendor {
        Vendor::Openai => openai::OpenAiCodec::assemble(caps, response, turn_index),
        Vendor::Deepseek => deepseek::DeepseekCodec::assemble(caps, response, turn_index),
        Vendor::Kimi => kimi::KimiCodec::assemble(caps, response, turn_index),
        Vendor::Minimax => minimax::MinimaxCodec::assemble(caps, response, turn_index),
        vendor @ (Vendor::Anthropic | Vendor::Google) => Err(AssembleError::UnsupportedStream { vendor }),
    }?;
    log_assembled(caps, &turn);
    Ok(turn)
}

fn assemble_body<C: VendorCodec>(
    caps: &Capabilities,
    body: &str,
    turn_index: u64,
) -> Result<ConversationTurn, AssembleError> {
    let response = serde_json::from_str(body).map_err(|source| AssembleError::Decode {
        vendor: caps.vendor,
        source,
    })?;
    let turn = C::assemble(caps, response, turn_index)?;
    log_assembled(caps, &turn);
    Ok(turn)
}

fn log_assembled(caps: &Capabilities, turn: &ConversationTurn) {
    if !turn.dialects.is_empty() {
        tracing::info!(provider = %caps.provider, model = ?turn.model, dialects = ?turn.dialects, "recovered content from degraded dialects");
    }
    tracing::debug!(provider = %caps.provider, turn = turn.index, blocks = turn.blocks.len(), "assembled turn");
}

/// Write canonical history back into the vendor's request shape
///
/// Every tool result, in history or in `new_results`, must answer an
/// invocation from an earlier assistant turn.
pub fn reconstitute(
    caps: &Capabilities,
    history: &[ConversationTurn],
    new_results: &[ToolResult],
    options: ReconstituteOptions,
) -> Result<VendorRequestBody, ReconstituteError> {
    let calls = CallIndex::build(history, new_results)?;

    let body = match caps.vendor {
        Vendor::Anthropic => anthropic::AnthropicCodec::reconstitute(caps, history, &calls, new_results, options),
        Vendor::Openai => openai::OpenAiCodec::reconstitute(caps, history, &calls, new_results, options),
        Vendor::Google => google::GoogleCodec::reconstitute(caps, history, &calls, new_results, options),
        Vendor::Deepseek => deepseek::DeepseekCodec::reconstitute(caps, history, &calls, new_results, options),
        Vendor::Kimi => kimi::KimiCodec::reconstitute(caps, history, &calls, new_results, options),
        Vendor::Minimax => minimax::MinimaxCodec::reconstitute(caps, history, &calls, new_results, options),
    }?;

    tracing::debug!(provider = %caps.provider, turns = history.len(), new_results = new_results.len(), "reconstituted history");
    Ok(body)
}

/// Call ids issued by assistant turns, with their tool names
struct CallIndex<'a> {
    names: HashMap<&'a str, &'a str>,
}

impl<'a> CallIndex<'a> {
    fn build(history: &'a [ConversationTurn], new_results: &[ToolResult]) -> Result<Self, ReconstituteError> {
        let mut names = HashMap::new();

        for turn in history {
            match turn.role {
                Role::Assistant => {
                    for invocation in turn.invocations() {
                        names.insert(invocation.call_id.as_str(), invocation.name.as_str());
                    }
                }
                Role::User => {
                    for result in turn.results() {
                        check_known(&names, result)?;
                    }
                }
            }
        }

        for result in new_results {
            check_known(&names, result)?;
        }

        Ok(Self { names })
    }

    fn name(&self, call_id: &str) -> Option<&'a str> {
        self.names.get(call_id).copied()
    }
}

fn check_known(names: &HashMap<&str, &str>, result: &ToolResult) -> Result<(), ReconstituteError> {
    if names.contains_key(result.call_id.as_str()) {
        Ok(())
    } else {
        Err(ReconstituteError::UnknownCallId {
            call_id: result.call_id.clone(),
        })
    }
}

/// Incremental builder shared by every assembler
struct TurnBuilder<'a> {
    caps: &'a Capabilities,
    scan_tools: bool,
    ids: CallIds,
    blocks: Vec<ContentBlock>,
    dialects: Vec<Dialect>,
}

impl<'a> TurnBuilder<'a> {
    fn new(caps: &'a Capabilities, has_native_calls: bool) -> Self {
        Self {
            caps,
            scan_tools: caps.scans_text_for_tools(has_native_calls),
            ids: CallIds::new(),
            blocks: Vec::new(),
            dialects: Vec::new(),
        }
    }

    /// Free text, split into reasoning, recovered calls and text
    fn text(&mut self, text: &str) {
        let extraction = dialect::extract(text, &self.caps.dialects, self.scan_tools, &mut self.ids);
        self.blocks.extend(extraction.blocks);
        for dialect in extraction.dialects {
            if !self.dialects.contains(&dialect) {
                self.dialects.push(dialect);
            }
        }
    }

    /// Reasoning block; blank unsigned reasoning is dropped
    fn reasoning(&mut self, reasoning: Reasoning) {
        if reasoning.text.trim().is_empty() && reasoning.signature.is_none() {
            return;
        }
        self.blocks.push(reasoning.into());
    }

    /// Call from the vendor's structured field; ids are minted when absent
    fn native(&mut self, call_id: Option<String>, name: String, arguments: String) {
        let call_id = match call_id.filter(|id| !id.is_empty()) {
            Some(id) => self.ids.adopt(id),
            None => {
                let prefix: &'static str = self.caps.vendor.into();
                self.ids.synthesize(prefix, &name)
            }
        };
        self.blocks.push(ToolInvocation::native(call_id, name, arguments).into());
    }

    /// The assembled turn; a response that produced no block is empty
    fn finish(mut self, turn_index: u64, model: Option<String>) -> Result<ConversationTurn, AssembleError> {
        if self.blocks.is_empty() {
            return Err(AssembleError::EmptyResponse);
        }


        let natives: Vec<ToolInvocation> = self
            .blocks
            .iter()
            .filter_map(ContentBlock::as_tool_invocation)
            .filter(|inv| inv.origin == InvocationOrigin::NativeStructured)
            .cloned()
            .collect();

        if !natives.is_empty() {
            self.blocks.retain(|block| match block.as_tool_invocation() {
                Some(inv) if inv.origin != InvocationOrigin::NativeStructured => {
                    let duplicate = natives.iter().any(|native| native.same_call(inv));
                    if duplicate {
                        tracing::debug!(call_id = %inv.call_id, tool = %inv.name, "dropping text call that repeats a native call");
                    }
                    !duplicate
                }
                _ => true,
            });
        }

        let mut turn = ConversationTurn::assistant(turn_index, self.caps.vendor, model, self.blocks);
        turn.dialects = self.dialects;
        Ok(turn)
    }
}

/// Whether `block` survives the provider's reasoning echo policy for `turn`
fn keep_block(caps: &Capabilities, turn: &ConversationTurn, block: &ContentBlock) -> bool {
    !matches!(block, ContentBlock::Reasoning(_)) || caps.echoes_reasoning(turn)
}

/// Arguments as a JSON object for vendors whose wire field must be one
///
/// Text that is not an object is wrapped as `{"raw": <text>}`.
fn object_arguments(invocation: &ToolInvocation) -> Result<Box<RawValue>, serde_json::Error> {
    let trimmed = invocation.arguments.trim();
    if trimmed.is_empty() {
        return RawValue::from_string("{}".to_owned());
    }
    if trimmed.starts_with('{')
        && let Ok(raw) = RawValue::from_string(trimmed.to_owned())
    {
        return Ok(raw);
    }

    tracing::warn!(
        call_id = %invocation.call_id,
        tool = %invocation.name,
        "tool arguments are not a JSON object, wrapping as raw text"
    );
    to_raw_value(&serde_json::json!({ "raw": invocation.arguments }))
}

/// Tool result as a JSON object for vendors whose wire field must be one
fn result_object(result: &ToolResult) -> Result<Box<RawValue>, serde_json::Error> {
    let trimmed = result.content.trim();
    if trimmed.starts_with('{')
        && let Ok(raw) = RawValue::from_string(trimmed.to_owned())
    {
        return Ok(raw);
    }
    let key = if result.is_error { "error" } else { "result" };
    let mut wrapped = serde_json::Map::new();
    wrapped.insert(key.to_owned(), serde_json::Value::String(result.content.clone()));
    to_raw_value(&wrapped)
}

/// Reasoning switch to send, if the provider exposes one
fn reasoning_toggle(caps: &Capabilities, options: ReconstituteOptions) -> Option<bool> {
    let requested = options.reasoning?;
    if caps.reasoning.togglable {
        Some(requested)
    } else {
        tracing::debug!(provider = %caps.provider, "provider cannot toggle reasoning, ignoring request");
        None
    }
}
