//! `MiniMax` chat completions
//!
//! Reasoning comes back inline as a leading `<think>` block in `content`
//! and must be replayed the same way; `MiniMax` rejects history whose
//! assistant turns lost it.

use super::openai::{ChatStyle, ReasoningPlacement, assemble_chat, write_chat};
use super::{CallIndex, ReconstituteOptions, VendorCodec, VendorRequestBody};
use crate::error::{AssembleError, ReconstituteError};
use crate::protocol::openai::ChatResponse;
use crate::registry::Capabilities;
use crate::types::{ConversationTurn, ToolResult};

const STYLE: ChatStyle = ChatStyle {
    reasoning: ReasoningPlacement::InlineThink,
    tool_names: false,
};

pub(super) struct MinimaxCodec;

impl VendorCodec for MinimaxCodec {
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
            STYLE,
        )))
    }
}

#[cfg(test)]
mod tests {
    use rosetta_config::{Dialect, Vendor};

    use crate::convert::{ReconstituteOptions, assemble, reconstitute};
    use crate::registry::Capabilities;
    use crate::types::{ContentBlock, ConversationTurn, Reasoning};

    fn caps() -> Capabilities {
        Capabilities::vendor_defaults("minimax", Vendor::Minimax)
    }

    const DEGRADED_TURN: &str = r#"{"model":"MiniMax-M2","choices":[{"message":{"role":"assistant",
        "content":"<think>\nThe user wants Beijing weather.\n</think>\n\n<minimax:tool_call>\n<invoke name=\"get_weather\">\n<parameter name=\"location\">北京</parameter>\n</invoke>\n</minimax:tool_call>"}}]}"#;

    #[test]
    fn inline_reasoning_and_xml_call() {
        let turn = assemble(&caps(), DEGRADED_TURN, 1).unwrap();

        assert_eq!(turn.dialects, vec![Dialect::ThinkTag, Dialect::MinimaxXml]);
        assert_eq!(turn.blocks.len(), 2);
        assert_eq!(turn.blocks[0], ContentBlock::Reasoning(Reasoning::plain("The user wants Beijing weather.")));
        let call = turn.blocks[1].as_tool_invocation().unwrap();
        assert_eq!(call.call_id, "minimax.get_weather:0");
        assert_eq!(call.arguments, r#"{"location":"北京"}"#);
    }

    #[test]
    fn reasoning_is_replayed_inline() {
        let caps = caps();
        let history = vec![
            ConversationTurn::user_text(0, "Weather?"),
            assemble(&caps, DEGRADED_TURN, 1).unwrap(),
        ];
        let body = reconstitute(&caps, &history, &[], ReconstituteOptions::default()).unwrap();
        let assistant = &body.as_chat().unwrap().messages[1];

        assert_eq!(assistant.content.as_deref(), Some("<think>\nThe user wants Beijing weather.\n</think>"));
        assert_eq!(assistant.reasoning_content, None);
        let calls = assistant.tool_calls.as_ref().unwrap();
        assert_eq!(calls[0].id, "minimax.get_weather:0");
        assert_eq!(calls[0].function.arguments, r#"{"location":"北京"}"#);
    }

    #[test]
    fn text_follows_inline_reasoning() {
        let caps = caps();
        let answer = assemble(&caps, r#"{"choices":[{"message":{"content":"<think>easy</think>It is sunny."}}]}"#, 1)
            .unwrap();
        let body = reconstitute(&caps, &[answer], &[], ReconstituteOptions::default()).unwrap();
        assert_eq!(
            body.as_chat().unwrap().messages[0].content.as_deref(),
            Some("<think>\neasy\n</think>\n\nIt is sunny.")
        );
    }
}
