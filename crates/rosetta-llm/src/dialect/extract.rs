use rosetta_config::Dialect;

use super::{CallIds, DialectMatch, DialectSignature, SIGNATURES, parse, reasoning, signature};
use crate::types::ContentBlock;

/// Blocks recovered from one free-text field
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Extraction {
    /// Canonical blocks in text order
    pub blocks: Vec<ContentBlock>,
    /// Dialects that produced at least one block or stripped span
    pub dialects: Vec<Dialect>,
}

impl Extraction {
    fn record(&mut self, dialect: Dialect) {
        if !self.dialects.contains(&dialect) {
            self.dialects.push(dialect);
        }
    }

    fn push_text(&mut self, piece: &str) {
        let piece = piece.trim();
        if !piece.is_empty() {
            self.blocks.push(ContentBlock::text(piece));
        }
    }
}

/// Split a text field into reasoning, tool invocations and text
///
/// Reasoning spans are taken out first. Each remaining segment is then
/// claimed by the first enabled tool dialect, in registration order, that
/// matches anywhere in it. Spans whose interior does not parse stay in the
/// text. Text next to an extracted span is trimmed; a field with nothing
/// extracted comes back as one verbatim text block.
pub fn extract(text: &str, enabled: &[Dialect], scan_tools: bool, ids: &mut CallIds) -> Extraction {
    let mut out = Extraction::default();
    if text.is_empty() {
        return out;
    }

    let mut touched = false;
    let mut cursor = 0;

    if enabled.contains(&Dialect::ThinkTag) {
        let think = signature(Dialect::ThinkTag);
        while let Some(found) = think.find(text, cursor) {
            touched |= claim_tools(&text[cursor..found.span.start], enabled, scan_tools, ids, &mut out);

            let interior = found.inner_text(text);
            if let Some(reasoning) = reasoning::parse(interior) {
                out.blocks.push(reasoning.into());
            }
            out.record(Dialect::ThinkTag);
            touched = true;
            cursor = found.span.end;
        }
    }

    touched |= claim_tools(&text[cursor..], enabled, scan_tools, ids, &mut out);

    if !touched {
        out.blocks = vec![ContentBlock::text(text)];
    }
    out
}

/// Hand `segment` to the first matching tool dialect; `true` if anything parsed
fn claim_tools(segment: &str, enabled: &[Dialect], scan_tools: bool, ids: &mut CallIds, out: &mut Extraction) -> bool {
    if scan_tools {
        let claimed = SIGNATURES
            .iter()
            .filter(|sig| !sig.dialect.is_reasoning() && enabled.contains(&sig.dialect))
            .find_map(|sig| sig.find(segment, 0).map(|first| (sig, first)));
        if let Some((sig, first)) = claimed {
            return extract_spans(sig, first, segment, ids, out);
        }
    }
    out.push_text(segment);
    false
}

fn extract_spans(
    sig: &DialectSignature,
    first: DialectMatch,
    segment: &str,
    ids: &mut CallIds,
    out: &mut Extraction,
) -> bool {
    let mut pending = 0;
    let mut parsed_any = false;
    let mut next = Some(first);

    while let Some(found) = next {
        match parse(sig.dialect, found.span_text(segment), ids) {
            Ok(blocks) => {
                out.push_text(&segment[pending..found.span.start]);
                out.blocks.extend(blocks);
                out.record(sig.dialect);
                pending = found.span.end;
                parsed_any = true;
            }
            Err(err) => tracing::warn!(dialect = %sig.dialect, error = %err, "leaving malformed dialect span in text"),
        }
        next = sig.find(segment, found.span.end);
    }

    out.push_text(&segment[pending..]);
    parsed_any
}

#[cfg(test)]
mod tests {
    use rosetta_config::Dialect;
    use strum::IntoEnumIterator;

    use super::*;
    use crate::types::{InvocationOrigin, Reasoning};

    fn all() -> Vec<Dialect> {
        Dialect::iter().collect()
    }

    #[test]
    fn plain_text_is_verbatim() {
        let text = "  Hello,\n world  ";
        let out = extract(text, &all(), true, &mut CallIds::new());
        assert_eq!(out.blocks, vec![ContentBlock::text(text)]);
        assert!(out.dialects.is_empty());
    }

    #[test]
    fn empty_text_yields_nothing() {
        assert!(extract("", &all(), true, &mut CallIds::new()).blocks.is_empty());
    }

    #[test]
    fn reasoning_then_tool_then_text() {
        let text = "<think>need weather</think>\nLet me check.\n<minimax:tool_call>\n<invoke name=\"get_weather\">\n<parameter name=\"location\">北京</parameter>\n</invoke>\n</minimax:tool_call>\nOne moment.";
        let out = extract(text, &all(), true, &mut CallIds::new());

        assert_eq!(out.dialects, vec![Dialect::ThinkTag, Dialect::MinimaxXml]);
        assert_eq!(out.blocks.len(), 4);
        assert_eq!(out.blocks[0], ContentBlock::Reasoning(Reasoning::plain("need weather")));
        assert_eq!(out.blocks[1], ContentBlock::text("Let me check."));
        let call = out.blocks[2].as_tool_invocation().unwrap();
        assert_eq!(call.arguments, r#"{"location":"北京"}"#);
        assert_eq!(call.origin, InvocationOrigin::DegradedText(Dialect::MinimaxXml));
        assert_eq!(out.blocks[3], ContentBlock::text("One moment."));
    }

    #[test]
    fn first_registered_dialect_claims_segment() {
        let text = "<minimax:tool_call><invoke name=\"a\"></invoke></minimax:tool_call>\n\
                    <|tool_calls_section_begin|><|tool_call_begin|>functions.b:0<|tool_call_argument_begin|>{}<|tool_call_end|><|tool_calls_section_end|>";
        let out = extract(text, &all(), true, &mut CallIds::new());

        let calls: Vec<_> = out.blocks.iter().filter_map(ContentBlock::as_tool_invocation).collect();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].name, "a");
        assert_eq!(out.dialects, vec![Dialect::MinimaxXml]);
        assert!(out.blocks.last().unwrap().as_text().unwrap().starts_with("<|tool_calls_section_begin|>"));
    }

    #[test]
    fn malformed_span_stays_in_text() {
        let text = "Calling <function_calls>search(q)</function_calls> now";
        let out = extract(text, &all(), true, &mut CallIds::new());
        assert_eq!(out.blocks, vec![ContentBlock::text(text)]);
    }

    #[test]
    fn incomplete_invoke_keeps_the_whole_wrapper() {
        let text = "Checking.\n<minimax:tool_call><invoke name=\"a\"><parameter name=\"x\">1</parameter></invoke>\
                    <invoke name=\"b\"><parameter name=\"y\">2</parameter></minimax:tool_call>";
        let mut ids = CallIds::new();
        let out = extract(text, &all(), true, &mut ids);
        assert_eq!(out.blocks, vec![ContentBlock::text(text)]);
        assert!(out.dialects.is_empty());
        assert_eq!(ids.position(), 0);
    }

    #[test]
    fn doubled_braces_leave_no_text_behind() {
        let text = r#"{{"name": "browser_open", "arguments": {"visible": true}}}"#;
        let out = extract(text, &all(), true, &mut CallIds::new());
        assert_eq!(out.blocks.len(), 1);
        let call = out.blocks[0].as_tool_invocation().unwrap();
        assert_eq!(call.call_id, "json.browser_open:0");
        assert_eq!(call.arguments, r#"{"visible": true}"#);
    }

    #[test]
    fn disabled_dialects_are_ignored() {
        let text = "<think>x</think>{\"name\": \"a\", \"arguments\": {}}";
        let out = extract(text, &[Dialect::KimiTokens], true, &mut CallIds::new());
        assert_eq!(out.blocks, vec![ContentBlock::text(text)]);
    }

    #[test]
    fn tool_scan_can_be_skipped() {
        let text = "<think>plan</think>{\"name\": \"a\", \"arguments\": {}}";
        let out = extract(text, &all(), false, &mut CallIds::new());
        assert_eq!(out.blocks.len(), 2);
        assert_eq!(out.blocks[1], ContentBlock::text("{\"name\": \"a\", \"arguments\": {}}"));
    }

    #[test]
    fn orphan_close_tag_splits_leading_reasoning() {
        let out = extract("weigh it\n</think>\n\nAnswer: 4", &[Dialect::ThinkTag], true, &mut CallIds::new());
        assert_eq!(
            out.blocks,
            vec![
                ContentBlock::Reasoning(Reasoning::plain("weigh it")),
                ContentBlock::text("Answer: 4")
            ]
        );
    }

    #[test]
    fn unclosed_think_is_text() {
        let text = "<think>still reasoning";
        let out = extract(text, &all(), true, &mut CallIds::new());
        assert_eq!(out.blocks, vec![ContentBlock::text(text)]);
    }

    #[test]
    fn json_ids_count_every_invocation() {
        let text = r#"{"name": "a", "arguments": {}} then {"name": "b", "arguments": {"k": [1, 2]}}"#;
        let mut ids = CallIds::new();
        ids.adopt("call_native");
        let out = extract(text, &all(), true, &mut ids);

        let ids: Vec<_> = out
            .blocks
            .iter()
            .filter_map(ContentBlock::as_tool_invocation)
            .map(|c| c.call_id.as_str())
            .collect();
        assert_eq!(ids, vec!["json.a:1", "json.b:2"]);
        assert_eq!(out.blocks[1], ContentBlock::text("then"));
    }
}
