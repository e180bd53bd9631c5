//! Chat completions codec
//!
//! Assembly and the history writer are shared by every vendor that speaks
//! the chat shape; the per-vendor codecs only pick a [`ChatStyle`].

use super::{CallIndex, ReconstituteOptions, TurnBuilder, VendorCodec, VendorRequestBody, reasoning_toggle};
use crate::error::{AssembleError, ReconstituteError};
use crate::protocol::openai::{ChatMessage, ChatRequestBody, ChatRequestFunction, ChatRequestToolCall, ChatResponse};
use crate::registry::Capabilities;
use crate::types::{ContentBlock, ConversationTurn, Reasoning, Role, ToolResult};

pub(super) struct OpenAiCodec;

impl VendorCodec for OpenAiCodec {
    type Response = ChatResponse;

    fn assemble(
        caps: &Capabilities,
        response: ChatResponse,
        turn_index: u64,
    ) -> Result<ConversationTurn, AssembleError> {
        assemble_chat(caps, response, turn_index)
    }

    fn reconstitute(
        caps: &Capabilities,
        history: &[ConversationTurn],
        calls: &CallIndex<'_>,
        new_results: &[ToolResult],
        options: ReconstituteOptions,
    ) -> Result<VendorRequestBody, ReconstituteError> {
        Ok(VendorRequestBody::OpenAi(write_chat(
            caps,
            history,
            calls,
            new_results,
            options,
            ChatStyle::PLAIN,
        )))
    }
}

/// Vendor-specific details of the chat history writer
#[derive(Debug, Clone, Copy)]
pub(super) struct ChatStyle {
    /// Where echoed reasoning goes
    pub reasoning: ReasoningPlacement,
    /// Tool messages carry the tool name
    pub tool_names: bool,
}

impl ChatStyle {
    pub(super) const PLAIN: Self = Self {
        reasoning: ReasoningPlacement::Field,
        tool_names: false,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum ReasoningPlacement {
    /// `reasoning_content` on the assistant message
    Field,
    /// `<think>` block at the start of the assistant content
    InlineThink,
}

// -- Assembly --

pub(super) fn assemble_chat(
    caps: &Capabilities,
    response: ChatResponse,
    turn_index: u64,
) -> Result<ConversationTurn, AssembleError> {
    let Some(choice) = response.choices.into_iter().next() else {
        return Err(AssembleError::EmptyResponse);
    };
    let mut message = choice.message;
    let calls = message.tool_calls.take().unwrap_or_default();

    let mut turn = TurnBuilder::new(caps, !calls.is_empty());

    if let Some(reasoning) = message.reasoning_text() {
        turn.reasoning(Reasoning::plain(reasoning.trim()).summarized(caps.reasoning.summarized));
    }

    if let Some(content) = message.content.as_deref() {
        turn.text(content);
    }

    for call in calls {
        let arguments = call.function.arguments_text().map_err(|source| AssembleError::Decode {
            vendor: caps.vendor,
            source,
        })?;
        turn.native(call.id, call.function.name, arguments);
    }

    turn.finish(turn_index, response.model)
}

// -- Reconstitution --

pub(super) fn write_chat(
    caps: &Capabilities,
    history: &[ConversationTurn],
    calls: &CallIndex<'_>,
    new_results: &[ToolResult],
    options: ReconstituteOptions,
    style: ChatStyle,
) -> ChatRequestBody {
    let mut messages = Vec::new();

    for turn in history {
        match turn.role {
            Role::Assistant => messages.push(assistant_message(caps, turn, style)),
            Role::User => user_messages(&mut messages, &turn.blocks, calls, style),
        }
    }

    for result in new_results {
        messages.push(tool_message(result, calls, style));
    }

    ChatRequestBody {
        messages,
        enable_thinking: reasoning_toggle(caps, options),
    }
}

fn assistant_message(caps: &Capabilities, turn: &ConversationTurn, style: ChatStyle) -> ChatMessage {
    let reasoning: Vec<&str> = if caps.echoes_reasoning(turn) {
        turn.reasoning()
            .filter(|r| !r.redacted && !r.text.is_empty())
            .map(|r| r.text.as_str())
            .collect()
    } else {
        Vec::new()
    };
    let reasoning = (!reasoning.is_empty()).then(|| reasoning.join("\n"));
    let text = turn.text();

    let (content, reasoning_content) = match (style.reasoning, reasoning) {
        (ReasoningPlacement::InlineThink, Some(r)) if text.is_empty() => (Some(format!("<think>\n{r}\n</think>")), None),
        (ReasoningPlacement::InlineThink, Some(r)) => (Some(format!("<think>\n{r}\n</think>\n\n{text}")), None),
        (_, reasoning) => ((!text.is_empty()).then_some(text), reasoning),
    };

    let tool_calls: Vec<ChatRequestToolCall> = turn
        .invocations()
        .map(|invocation| ChatRequestToolCall {
            id: invocation.call_id.clone(),
            call_type: "function".to_owned(),
            function: ChatRequestFunction {
                name: invocation.name.clone(),
                arguments: if invocation.arguments.trim().is_empty() {
                    "{}".to_owned()
                } else {
                    invocation.arguments.clone()
                },
            },
        })
        .collect();

    ChatMessage {
        content,
        reasoning_content,
        tool_calls: (!tool_calls.is_empty()).then_some(tool_calls),
        ..ChatMessage::text("assistant", None)
    }
}

fn user_messages(messages: &mut Vec<ChatMessage>, blocks: &[ContentBlock], calls: &CallIndex<'_>, style: ChatStyle) {
    let mut text = Vec::new();

    for block in blocks {
        match block {
            ContentBlock::Text { value } => text.push(value.as_str()),
            ContentBlock::ToolResult(result) => {
                flush_user_text(messages, &mut text);
                messages.push(tool_message(result, calls, style));
            }
            ContentBlock::ToolInvocation(_) | ContentBlock::Reasoning(_) => {
                tracing::debug!("skipping assistant-only block in a user turn");
            }
        }
    }

    flush_user_text(messages, &mut text);
}

fn flush_user_text(messages: &mut Vec<ChatMessage>, text: &mut Vec<&str>) {
    if !text.is_empty() {
        messages.push(ChatMessage::text("user", Some(text.join("\n"))));
        text.clear();
    }
}

fn tool_message(result: &ToolResult, calls: &CallIndex<'_>, style: ChatStyle) -> ChatMessage {
    let name = if style.tool_names {
        calls.name(&result.call_id).map(str::to_owned)
    } else {
        None
    };

    ChatMessage {
        tool_call_id: Some(result.call_id.clone()),
        name,
        ..ChatMessage::text("tool", Some(result.content.clone()))
    }
}

#[cfg(test)]
mod tests {
    use rosetta_config::{Dialect, MixedToolCallPolicy, ReasoningEcho, Vendor};

    use super::*;
    use crate::convert::{assemble, reconstitute};
    use crate::types::InvocationOrigin;

    fn caps() -> Capabilities {
        Capabilities::vendor_defaults("openai", Vendor::Openai)
    }

    #[test]
    fn plain_answer() {
        let body = r#"{"id":"chatcmpl-1","model":"gpt-4.1","choices":[{"index":0,"message":{"role":"assistant","content":"Paris."},"finish_reason":"stop"}]}"#;
        let turn = assemble(&caps(), body, 3).unwrap();

        assert_eq!(turn.index, 3);
        assert_eq!(turn.model.as_deref(), Some("gpt-4.1"));
        assert_eq!(turn.blocks, vec![ContentBlock::text("Paris.")]);
        assert!(turn.dialects.is_empty());
    }

    #[test]
    fn no_choices_is_empty_response() {
        let err = assemble(&caps(), r#"{"choices":[]}"#, 0).unwrap_err();
        assert!(matches!(err, AssembleError::EmptyResponse));
    }

    #[test]
    fn blank_message_is_empty_response() {
        let err = assemble(&caps(), r#"{"choices":[{"message":{"content":""}}]}"#, 0).unwrap_err();
        assert!(matches!(err, AssembleError::EmptyResponse));

        let err = assemble(&caps(), r#"{"choices":[{"message":{"content":null,"reasoning_content":"  "}}]}"#, 0).unwrap_err();
        assert!(matches!(err, AssembleError::EmptyResponse));
    }

    #[test]
    fn invalid_json_is_decode_error() {
        let err = assemble(&caps(), "{\"choices\":", 0).unwrap_err();
        assert!(matches!(err, AssembleError::Decode { vendor: Vendor::Openai, .. }));
    }

    #[test]
    fn native_calls_skip_text_scan_by_default() {
        let body = r#"{"choices":[{"message":{"content":"{\"name\": \"search\", \"arguments\": {\"q\": \"x\"}}",
            "tool_calls":[{"id":"call_1","type":"function","function":{"name":"search","arguments":"{\"q\": \"x\"}"}}]}}]}"#;
        let turn = assemble(&caps(), body, 1).unwrap();

        let calls: Vec<_> = turn.invocations().collect();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].call_id, "call_1");
        assert_eq!(calls[0].origin, InvocationOrigin::NativeStructured);
        assert_eq!(turn.text(), r#"{"name": "search", "arguments": {"q": "x"}}"#);
    }

    #[test]
    fn merge_policy_drops_duplicates_and_keeps_new_calls() {
        let mut caps = caps();
        caps.mixed_tool_calls = MixedToolCallPolicy::Merge;
        let body = r#"{"choices":[{"message":{"content":"{\"name\": \"search\", \"arguments\": {\"q\": \"x\"}} and {\"name\": \"fetch\", \"arguments\": {}}",
            "tool_calls":[{"id":"call_1","function":{"name":"search","arguments":"{\"q\": \"x\"}"}}]}}]}"#;
        let turn = assemble(&caps, body, 1).unwrap();

        let calls: Vec<_> = turn.invocations().map(|c| (c.name.as_str(), c.origin)).collect();
        assert_eq!(
            calls,
            vec![
                ("fetch", InvocationOrigin::DegradedText(Dialect::JsonObject)),
                ("search", InvocationOrigin::NativeStructured),
            ]
        );
    }

    #[test]
    fn missing_call_id_is_synthesized() {
        let body = r#"{"choices":[{"message":{"tool_calls":[{"function":{"name":"search","arguments":"{}"}}]}}]}"#;
        let turn = assemble(&caps(), body, 1).unwrap();
        assert_eq!(turn.invocations().next().unwrap().call_id, "openai.search:0");
    }

    #[test]
    fn reasoning_field_is_assembled_first() {
        let body = r#"{"choices":[{"message":{"reasoning":"think hard","content":"4"}}]}"#;
        let turn = assemble(&caps(), body, 1).unwrap();
        assert_eq!(turn.blocks[0], ContentBlock::Reasoning(Reasoning::plain("think hard")));
        assert_eq!(turn.blocks[1], ContentBlock::text("4"));
    }

    #[test]
    fn writer_drops_reasoning_when_echo_is_never() {
        let history = vec![
            ConversationTurn::user_text(0, "2+2?"),
            ConversationTurn::assistant(
                1,
                Vendor::Openai,
                None,
                vec![Reasoning::plain("add").into(), ContentBlock::text("4")],
            ),
        ];
        let body = reconstitute(&caps(), &history, &[], ReconstituteOptions::default()).unwrap();
        assert_eq!(
            body.to_json_string().unwrap(),
            r#"{"messages":[{"role":"user","content":"2+2?"},{"role":"assistant","content":"4"}]}"#
        );
    }

    #[test]
    fn arguments_are_written_byte_for_byte() {
        let mut caps = caps();
        caps.reasoning.echo = ReasoningEcho::ToolTurns;
        let history = vec![ConversationTurn::assistant(
            1,
            Vendor::Openai,
            None,
            vec![
                Reasoning::plain("look it up").into(),
                crate::types::ToolInvocation::native("call_1", "search", "{\"q\" :  \"ünï\"}").into(),
            ],
        )];

        let body = reconstitute(&caps, &history, &[ToolResult::new("call_1", "found")], ReconstituteOptions::default())
            .unwrap();
        assert_eq!(
            body.to_json_string().unwrap(),
            r#"{"messages":[{"role":"assistant","content":null,"reasoning_content":"look it up","tool_calls":[{"id":"call_1","type":"function","function":{"name":"search","arguments":"{\"q\" :  \"ünï\"}"}}]},{"role":"tool","content":"found","tool_call_id":"call_1"}]}"#
        );
    }
}
