//! Google Generative Language codec
//!
//! Thought summaries arrive as `thought: true` parts. A `thoughtSignature`
//! may ride on any part; on a non-thought part it becomes a signature-only
//! reasoning block placed just before that part, and the writer reattaches
//! it to whatever part follows.

use super::{
    CallIndex, ReconstituteOptions, TurnBuilder, VendorCodec, VendorRequestBody, keep_block, object_arguments,
    reasoning_toggle, result_object,
};
use crate::error::{AssembleError, ReconstituteError};
use crate::protocol::google::{
    GoogleContent, GoogleFunctionCall, GoogleFunctionResponse, GoogleGenerationConfig, GooglePart, GoogleRequestBody,
    GoogleResponse, GoogleThinkingConfig,
};
use crate::registry::Capabilities;
use crate::types::{ContentBlock, ConversationTurn, Reasoning, Role, Signature, ToolResult};

pub(super) struct GoogleCodec;

impl VendorCodec for GoogleCodec {
    type Response = GoogleResponse;

    fn assemble(
        caps: &Capabilities,
        response: GoogleResponse,
        turn_index: u64,
    ) -> Result<ConversationTurn, AssembleError> {
        let Some(candidate) = response.candidates.into_iter().next() else {
            return Err(AssembleError::EmptyResponse);
        };
        let parts = candidate.content.map(|content| content.parts).unwrap_or_default();
        let has_native = parts.iter().any(|part| part.function_call.is_some());
        let mut turn = TurnBuilder::new(caps, has_native);

        for part in parts {
            let signature = part.thought_signature.map(Signature::new);

            if part.thought {
                turn.reasoning(Reasoning {
                    text: part.text.unwrap_or_default(),
                    signature,
                    summarized: caps.reasoning.summarized,
                    redacted: false,
                });
                continue;
            }

            if let Some(signature) = signature {
                turn.reasoning(Reasoning::signed(String::new(), signature).summarized(caps.reasoning.summarized));
            }
            if let Some(call) = part.function_call {
                let arguments = call.args.map_or_else(|| "{}".to_owned(), |raw| raw.get().to_owned());
                turn.native(call.id, call.name, arguments);
            }
            if let Some(text) = part.text.as_deref() {
                turn.text(text);
            }
        }

        turn.finish(turn_index, response.model_version)
    }

    fn reconstitute(
        caps: &Capabilities,
        history: &[ConversationTurn],
        calls: &CallIndex<'_>,
        new_results: &[ToolResult],
        options: ReconstituteOptions,
    ) -> Result<VendorRequestBody, ReconstituteError> {
        let mut contents = Vec::new();

        for turn in history {
            let parts = match turn.role {
                Role::Assistant => model_parts(caps, turn)?,
                Role::User => user_parts(&turn.blocks, calls)?,
            };
            push_content(&mut contents, turn.role, parts);
        }

        let results = new_results
            .iter()
            .map(|result| result_part(result, calls))
            .collect::<Result<Vec<_>, _>>()?;
        push_content(&mut contents, Role::User, results);

        let generation_config = reasoning_toggle(caps, options).map(|include_thoughts| GoogleGenerationConfig {
            thinking_config: GoogleThinkingConfig { include_thoughts },
        });

        Ok(VendorRequestBody::Google(GoogleRequestBody {
            contents,
            generation_config,
        }))
    }
}

fn model_parts(caps: &Capabilities, turn: &ConversationTurn) -> Result<Vec<GooglePart>, ReconstituteError> {
    let mut parts = Vec::with_capacity(turn.blocks.len());
    let mut pending_signature: Option<String> = None;

    for block in turn.blocks.iter().filter(|block| keep_block(caps, turn, block)) {
        match block {
            ContentBlock::Reasoning(reasoning) if reasoning.redacted => {
                tracing::debug!("skipping redacted reasoning the provider cannot accept");
            }
            ContentBlock::Reasoning(reasoning) if reasoning.text.is_empty() => {
                pending_signature = reasoning.signature.as_ref().map(|s| s.as_str().to_owned());
            }
            ContentBlock::Reasoning(reasoning) => parts.push(GooglePart {
                text: Some(reasoning.text.clone()),
                thought: true,
                thought_signature: reasoning.signature.as_ref().map(|s| s.as_str().to_owned()),
                ..GooglePart::default()
            }),
            ContentBlock::Text { value } => parts.push(GooglePart {
                text: Some(value.clone()),
                thought_signature: pending_signature.take(),
                ..GooglePart::default()
            }),
            ContentBlock::ToolInvocation(invocation) => parts.push(GooglePart {
                function_call: Some(GoogleFunctionCall {
                    id: Some(invocation.call_id.clone()),
                    name: invocation.name.clone(),
                    args: object_arguments(invocation)?,
                }),
                thought_signature: pending_signature.take(),
                ..GooglePart::default()
            }),
            ContentBlock::ToolResult(_) => tracing::debug!("skipping tool result in a model turn"),
        }
    }

    if let Some(signature) = pending_signature {
        parts.push(GooglePart {
            text: Some(String::new()),
            thought_signature: Some(signature),
            ..GooglePart::default()
        });
    }

    Ok(parts)
}

fn user_parts(blocks: &[ContentBlock], calls: &CallIndex<'_>) -> Result<Vec<GooglePart>, ReconstituteError> {
    let mut parts = Vec::new();

    for block in blocks {
        match block {
            ContentBlock::Text { value } => parts.push(GooglePart {
                text: Some(value.clone()),
                ..GooglePart::default()
            }),
            ContentBlock::ToolResult(result) => parts.push(result_part(result, calls)?),
            ContentBlock::ToolInvocation(_) | ContentBlock::Reasoning(_) => {
                tracing::debug!("skipping assistant-only block in a user turn");
            }
        }
    }

    Ok(parts)
}

fn result_part(result: &ToolResult, calls: &CallIndex<'_>) -> Result<GooglePart, ReconstituteError> {
    Ok(GooglePart {
        function_response: Some(GoogleFunctionResponse {
            id: Some(result.call_id.clone()),
            name: calls.name(&result.call_id).unwrap_or_default().to_owned(),
            response: result_object(result)?,
        }),
        ..GooglePart::default()
    })
}

/// Append parts, merging into the previous entry when the role repeats
fn push_content(contents: &mut Vec<GoogleContent>, role: Role, parts: Vec<GooglePart>) {
    if parts.is_empty() {
        return;
    }
    let role = match role {
        Role::User => "user",
        Role::Assistant => "model",
    };
    match contents.last_mut() {
        Some(last) if last.role == role => last.parts.extend(parts),
        _ => contents.push(GoogleContent {
            role: role.to_owned(),
            parts,
        }),
    }
}
