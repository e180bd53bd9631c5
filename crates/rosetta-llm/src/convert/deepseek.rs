//! `DeepSeek`-shaped chat completions
//!
//! Reasoning arrives in `reasoning_content` and goes back in the same field
//! on turns the echo policy selects.

use super::openai::{ChatStyle, assemble_chat, write_chat};
use super::{CallIndex, ReconstituteOptions, VendorCodec, VendorRequestBody};
use crate::error::{AssembleError, ReconstituteError};
use crate::protocol::openai::ChatResponse;
use crate::registry::Capabilities;
use crate::types::{ConversationTurn, ToolResult};

pub(super) struct DeepseekCodec;

impl VendorCodec for DeepseekCodec {
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
