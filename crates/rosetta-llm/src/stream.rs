//! Reassembly of chat completion streams
//!
//! Dialect spans (Kimi sentinels especially) are routinely split across
//! chunks, so nothing is scanned until the stream is complete; the
//! accumulator rebuilds a whole [`ChatResponse`] for the normal assembler.

use std::collections::BTreeMap;

use rosetta_config::Vendor;
use serde_json::value::to_raw_value;

use crate::error::AssembleError;
use crate::protocol::openai::{
    ChatChoice, ChatChoiceMessage, ChatFunctionCall, ChatResponse, ChatStreamChunk, ChatToolCall,
};

/// Accumulates chat completion chunks for the first choice
#[derive(Debug)]
pub struct ChatStreamAccumulator {
    vendor: Vendor,
    chunks: usize,
    id: Option<String>,
    model: Option<String>,
    content: Option<String>,
    reasoning: String,
    calls: BTreeMap<u32, PartialCall>,
    finish_reason: Option<String>,
}

#[derive(Debug, Default)]
struct PartialCall {
    id: Option<String>,
    name: String,
    arguments: String,
}

impl ChatStreamAccumulator {
    pub const fn new(vendor: Vendor) -> Self {
        Self {
            vendor,
            chunks: 0,
            id: None,
            model: None,
            content: None,
            reasoning: String::new(),
            calls: BTreeMap::new(),
            finish_reason: None,
        }
    }

    /// Feed one raw chunk
    ///
    /// Accepts the JSON payload with or without its SSE `data:` prefix;
    /// blank payloads and the `[DONE]` sentinel are ignored.
    pub fn push(&mut self, raw: &str) -> Result<(), AssembleError> {
        let payload = raw.trim();
        let payload = payload.strip_prefix("data:").map_or(payload, str::trim_start);
        if payload.is_empty() || payload == "[DONE]" {
            return Ok(());
        }

        let chunk: ChatStreamChunk = serde_json::from_str(payload).map_err(|source| AssembleError::Decode {
            vendor: self.vendor,
            source,
        })?;
        self.push_chunk(chunk);
        Ok(())
    }

    /// Feed one decoded chunk
    pub fn push_chunk(&mut self, chunk: ChatStreamChunk) {
        self.chunks += 1;
        if self.id.is_none() {
            self.id = chunk.id;
        }
        if self.model.is_none() {
            self.model = chunk.model;
        }

        for choice in chunk.choices.into_iter().filter(|choice| choice.index == 0) {
            let delta = choice.delta;

            if let Some(text) = delta.content {
                self.content.get_or_insert_with(String::new).push_str(&text);
            }
            if let Some(text) = delta.reasoning_content.or(delta.reasoning) {
                self.reasoning.push_str(&text);
            }

            for fragment in delta.tool_calls.unwrap_or_default() {
                let call = self.calls.entry(fragment.index).or_default();
                if let Some(id) = fragment.id.filter(|id| !id.is_empty()) {
                    call.id = Some(id);
                }
                if let Some(function) = fragment.function {
                    if let Some(name) = function.name
                        && call.name.is_empty()
                    {
                        call.name = name;
                    }
                    if let Some(arguments) = function.arguments {
                        call.arguments.push_str(&arguments);
                    }
                }
            }

            if choice.finish_reason.is_some() {
                self.finish_reason = choice.finish_reason;
            }
        }
    }

    /// The complete response
    pub fn finish(self) -> Result<ChatResponse, AssembleError> {
        if self.chunks == 0 {
            return Err(AssembleError::EmptyResponse);
        }
        tracing::trace!(chunks = self.chunks, calls = self.calls.len(), "chat stream complete");

        let vendor = self.vendor;
        let tool_calls = self
            .calls
            .into_values()
            .map(|call| {
                Ok(ChatToolCall {
                    id: call.id,
                    function: ChatFunctionCall {
                        name: call.name,
                        arguments: Some(to_raw_value(&call.arguments)?),
                    },
                })
            })
            .collect::<Result<Vec<_>, serde_json::Error>>()
            .map_err(|source| AssembleError::Decode { vendor, source })?;

        Ok(ChatResponse {
            id: self.id,
            model: self.model,
            choices: vec![ChatChoice {
                index: 0,
                message: ChatChoiceMessage {
                    role: Some("assistant".to_owned()),
                    content: self.content,
                    reasoning_content: (!self.reasoning.is_empty()).then_some(self.reasoning),
                    reasoning: None,
                    tool_calls: (!tool_calls.is_empty()).then_some(tool_calls),
                },
                finish_reason: self.finish_reason,
            }],
        })
    }
}
