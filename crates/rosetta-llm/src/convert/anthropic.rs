//! Anthropic Messages codec
//!
//! Thinking blocks carry signatures that Anthropic verifies on replay, so
//! they are written back exactly as received and in their original
//! position ahead of the `tool_use` they led to.

use super::{
    CallIndex, ReconstituteOptions, TurnBuilder, VendorCodec, VendorRequestBody, keep_block, object_arguments,
    reasoning_toggle,
};
use crate::error::{AssembleError, ReconstituteError};
use crate::protocol::anthropic::{
    AnthropicContentBlock, AnthropicMessage, AnthropicRequestBody, AnthropicResponse, AnthropicThinking,
};
use crate::registry::Capabilities;
use crate::types::{ContentBlock, ConversationTurn, Reasoning, Role, Signature, ToolResult};

/// Thinking budget sent when reasoning is switched on
const DEFAULT_THINKING_BUDGET: u32 = 4096;

pub(super) struct AnthropicCodec;

impl VendorCodec for AnthropicCodec {
    type Response = AnthropicResponse;

    fn assemble(
        caps: &Capabilities,
        response: AnthropicResponse,
        turn_index: u64,
    ) -> Result<ConversationTurn, AssembleError> {
        let has_native = response.content.iter().any(|block| block.block_type == "tool_use");
        let mut turn = TurnBuilder::new(caps, has_native);

        for block in response.content {
            match block.block_type.as_str() {
                "text" => turn.text(block.text.as_deref().unwrap_or_default()),
                "thinking" => {
                    let text = block.thinking.unwrap_or_default();
                    let reasoning = match block.signature {
                        Some(signature) => Reasoning::signed(text, Signature::new(signature)),
                        None => Reasoning::plain(text),
                    };
                    turn.reasoning(reasoning.summarized(caps.reasoning.summarized));
                }
                "redacted_thinking" => {
                    if let Some(data) = block.data {
                        turn.reasoning(Reasoning::redacted(Signature::new(data)));
                    }
                }
                "tool_use" => {
                    let Some(name) = block.name else {
                        tracing::warn!(id = ?block.id, "skipping tool_use block without a name");
                        continue;
                    };
                    let arguments = block.input.map_or_else(|| "{}".to_owned(), |raw| raw.get().to_owned());
                    turn.native(block.id, name, arguments);
                }
                other => tracing::debug!(block_type = other, "skipping unrecognized content block"),
            }
        }

        turn.finish(turn_index, response.model)
    }

    fn reconstitute(
        caps: &Capabilities,
        history: &[ConversationTurn],
        _calls: &CallIndex<'_>,
        new_results: &[ToolResult],
        options: ReconstituteOptions,
    ) -> Result<VendorRequestBody, ReconstituteError> {
        let mut messages = Vec::new();

        for turn in history {
            let mut content = Vec::with_capacity(turn.blocks.len());
            for block in turn.blocks.iter().filter(|block| keep_block(caps, turn, block)) {
                if let Some(written) = write_block(caps, turn.role, block)? {
                    content.push(written);
                }
            }
            push_message(&mut messages, turn.role, content);
        }

        let results = new_results.iter().map(result_block).collect();
        push_message(&mut messages, Role::User, results);

        let thinking = reasoning_toggle(caps, options).map(|enabled| {
            if enabled {
                AnthropicThinking {
                    mode: "enabled".to_owned(),
                    budget_tokens: Some(DEFAULT_THINKING_BUDGET),
                }
            } else {
                AnthropicThinking {
                    mode: "disabled".to_owned(),
                    budget_tokens: None,
                }
            }
        });

        Ok(VendorRequestBody::Anthropic(AnthropicRequestBody { messages, thinking }))
    }
}

fn write_block(
    caps: &Capabilities,
    role: Role,
    block: &ContentBlock,
) -> Result<Option<AnthropicContentBlock>, ReconstituteError> {
    Ok(match (role, block) {
        (_, ContentBlock::Text { value }) if value.is_empty() => None,
        (_, ContentBlock::Text { value }) => Some(AnthropicContentBlock::Text { text: value.clone() }),
        (Role::Assistant, ContentBlock::Reasoning(reasoning)) => thinking_block(caps, reasoning),
        (Role::Assistant, ContentBlock::ToolInvocation(invocation)) => Some(AnthropicContentBlock::ToolUse {
            id: invocation.call_id.clone(),
            name: invocation.name.clone(),
            input: object_arguments(invocation)?,
        }),
        (Role::User, ContentBlock::ToolResult(result)) => Some(result_block(result)),
        (role, _) => {
            tracing::debug!(?role, "skipping block that does not belong to this role");
            None
        }
    })
}

fn thinking_block(caps: &Capabilities, reasoning: &Reasoning) -> Option<AnthropicContentBlock> {
    match &reasoning.signature {
        Some(payload) if reasoning.redacted => Some(AnthropicContentBlock::RedactedThinking {
            data: payload.as_str().to_owned(),
        }),
        Some(signature) => Some(AnthropicContentBlock::Thinking {
            thinking: reasoning.text.clone(),
            signature: Some(signature.as_str().to_owned()),
        }),
        None if caps.reasoning.signature => {
            tracing::debug!(provider = %caps.provider, "dropping unsigned reasoning the provider would reject");
            None
        }
        None => Some(AnthropicContentBlock::Thinking {
            thinking: reasoning.text.clone(),
            signature: None,
        }),
    }
}

fn result_block(result: &ToolResult) -> AnthropicContentBlock {
    AnthropicContentBlock::ToolResult {
        tool_use_id: result.call_id.clone(),
        content: result.content.clone(),
        is_error: result.is_error,
    }
}

/// Append blocks, merging into the previous message when the role repeats
fn push_message(messages: &mut Vec<AnthropicMessage>, role: Role, content: Vec<AnthropicContentBlock>) {
    if content.is_empty() {
        return;
    }
    let role = match role {
        Role::User => "user",
        Role::Assistant => "assistant",
    };
    match messages.last_mut() {
        Some(last) if last.role == role => last.content.extend(content),
        _ => messages.push(AnthropicMessage {
            role: role.to_owned(),
            content,
        }),
    }
}
