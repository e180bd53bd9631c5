//! Moonshot Kimi chat completions
//!
//! Kimi K2 may fall back to sentinel-token tool calls inside `content`;
//! those ids are normalized to `functions.<name>:<index>` and echoed back
//! unchanged. Tool messages carry the tool name.

use super::openai::{ChatStyle, ReasoningPlacement, assemble_chat, write_chat};
use super::{CallIndex, ReconstituteOptions, VendorCodec, VendorRequestBody};
use crate::error::{AssembleError, ReconstituteError};
use crate::protocol::openai::ChatResponse;
use crate::registry::Capabilities;
use crate::types::{ConversationTurn, ToolResult};

const STYLE: ChatStyle = ChatStyle {
    reasoning: ReasoningPlacement::Field,
    tool_names: true,
};

pub(super) struct KimiCodec;

impl VendorCodec for KimiCodec {
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
