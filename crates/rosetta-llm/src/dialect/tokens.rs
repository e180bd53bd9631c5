use std::ops::Range;

use super::{CallIds, DialectSignature};
use crate::error::DialectError;
use crate::types::{ContentBlock, ToolInvocation};

/// One spelling of the tool-call sentinel tokens
#[derive(Debug)]
pub struct Sentinels {
    pub section_begin: &'static str,
    pub section_end: &'static str,
    pub call_begin: &'static str,
    pub argument_begin: &'static str,
    pub call_end: &'static str,
}

/// Accepted spellings; the doubled-angle form must come first since the
/// single form is a substring of it
pub(super) const SENTINELS: &[Sentinels] = &[
    Sentinels {
        section_begin: "<<|tool_calls_section_begin|>>",
        section_end: "<<|tool_calls_section_end|>>",
        call_begin: "<<|tool_call_begin|>>",
        argument_begin: "<<|tool_call_argument_begin|>>",
        call_end: "<<|tool_call_end|>>",
    },
    Sentinels {
        section_begin: "<|tool_calls_section_begin|>",
        section_end: "<|tool_calls_section_end|>",
        call_begin: "<|tool_call_begin|>",
        argument_begin: "<|tool_call_argument_begin|>",
        call_end: "<|tool_call_end|>",
    },
];

pub(super) fn find(sets: &[Sentinels], text: &str, from: usize) -> Option<(Range<usize>, Range<usize>)> {
    let hay = &text[from..];
    let (at, set) = sets
        .iter()
        .filter_map(|set| hay.find(set.section_begin).map(|at| (at, set)))
        .min_by_key(|(at, _)| *at)?;

    let start = from + at;
    let inner_start = start + set.section_begin.len();
    Some(match text[inner_start..].find(set.section_end) {
        Some(len) => (start..inner_start + len + set.section_end.len(), inner_start..inner_start + len),
        None => (start..text.len(), inner_start..text.len()),
    })
}

/// Parse a sentinel section into invocations
///
/// Headers look like `functions.<name>:<index>`. The call id is
/// `functions.<name>:<index>` with the header's own index, never
/// renumbered; the argument text is kept byte for byte.
pub(super) fn parse(
    sig: &DialectSignature,
    sets: &[Sentinels],
    span: &str,
    ids: &mut CallIds,
) -> Result<Vec<ContentBlock>, DialectError> {
    let Some((set, mut rest)) = sets
        .iter()
        .find_map(|set| span.strip_prefix(set.section_begin).map(|rest| (set, rest)))
    else {
        return Err(DialectError::malformed(sig.dialect, "missing section begin token"));
    };
    rest = rest.strip_suffix(set.section_end).unwrap_or(rest);

    let mut calls = Vec::new();
    while let Some(at) = rest.find(set.call_begin) {
        let after = &rest[at + set.call_begin.len()..];
        let Some(header_len) = after.find(set.argument_begin) else {
            return Err(DialectError::malformed(sig.dialect, "call without an argument marker"));
        };
        let header = after[..header_len].trim();
        let (name, index) = split_header(header).ok_or_else(|| {
            DialectError::malformed(sig.dialect, format!("call header '{header}' is not <namespace>.<name>:<index>"))
        })?;

        let body = &after[header_len + set.argument_begin.len()..];
        let (arguments, consumed) = match body.find(set.call_end) {
            Some(len) => (&body[..len], len + set.call_end.len()),
            None => (body, body.len()),
        };

        calls.push((name, index, arguments));
        rest = &body[consumed..];
    }

    if calls.is_empty() {
        return Err(DialectError::malformed(sig.dialect, "section holds no calls"));
    }

    Ok(calls
        .into_iter()
        .map(|(name, index, arguments)| {
            let call_id = ids.adopt(format!("{}.{name}:{index}", sig.id_prefix));
            ToolInvocation::degraded(sig.dialect, call_id, name, arguments).into()
        })
        .collect())
}

/// Tool name and index from `functions.<name>:<index>` or `<name>:<index>`
///
/// The name is whatever follows the last `.` of the path.
fn split_header(header: &str) -> Option<(&str, &str)> {
    let (path, index) = header.rsplit_once(':')?;
    if index.is_empty() || !index.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let name = path.rsplit_once('.').map_or(path, |(_, name)| name);
    (!name.is_empty()).then_some((name, index))
}

#[cfg(test)]
mod tests {
    use rosetta_config::Dialect;

    use super::super::{CallIds, parse as parse_span, signature};
    use super::*;

    const SECTION: &str = "<|tool_calls_section_begin|>\
        <|tool_call_begin|>functions.get_weather:0<|tool_call_argument_begin|>{\"city\": \"Beijing\"}<|tool_call_end|>\
        <|tool_call_begin|>functions.get_time:1<|tool_call_argument_begin|>{}<|tool_call_end|>\
        <|tool_calls_section_end|>";

    #[test]
    fn header_becomes_call_id() {
        let blocks = parse_span(Dialect::KimiTokens, SECTION, &mut CallIds::new()).unwrap();
        let calls: Vec<_> = blocks.iter().filter_map(ContentBlock::as_tool_invocation).collect();

        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].call_id, "functions.get_weather:0");
        assert_eq!(calls[0].name, "get_weather");
        assert_eq!(calls[0].arguments, "{\"city\": \"Beijing\"}");
        assert_eq!(calls[1].call_id, "functions.get_time:1");
    }

    #[test]
    fn doubled_angle_spelling() {
        let span = "<<|tool_calls_section_begin|>><<|tool_call_begin|>>functions.search:3<<|tool_call_argument_begin|>>{\"q\":\"x\"}<<|tool_call_end|>><<|tool_calls_section_end|>>";
        let found = signature(Dialect::KimiTokens).find(span, 0).unwrap();
        assert_eq!(found.span, 0..span.len());

        let blocks = parse_span(Dialect::KimiTokens, span, &mut CallIds::new()).unwrap();
        let call = blocks[0].as_tool_invocation().unwrap();
        assert_eq!(call.call_id, "functions.search:3");
        assert_eq!(call.arguments, "{\"q\":\"x\"}");
    }

    #[test]
    fn bad_header_is_malformed() {
        let span = "<|tool_calls_section_begin|><|tool_call_begin|>functions.search<|tool_call_argument_begin|>{}<|tool_call_end|><|tool_calls_section_end|>";
        let mut ids = CallIds::new();
        assert!(parse_span(Dialect::KimiTokens, span, &mut ids).is_err());
        assert_eq!(ids.position(), 0);
    }

    #[test]
    fn header_forms() {
        assert_eq!(split_header("functions.get_weather:0"), Some(("get_weather", "0")));
        assert_eq!(split_header("functions.ns.get_weather:0"), Some(("get_weather", "0")));
        assert_eq!(split_header("get_weather:12"), Some(("get_weather", "12")));
        assert_eq!(split_header("functions.get_weather:x"), None);
        assert_eq!(split_header("functions.:0"), None);
    }

    #[test]
    fn ids_use_the_header_index_under_the_functions_namespace() {
        let span = "<|tool_calls_section_begin|>\
            <|tool_call_begin|>functions.ns.get_weather:4<|tool_call_argument_begin|>{}<|tool_call_end|>\
            <|tool_call_begin|> get_time:12 <|tool_call_argument_begin|>{}<|tool_call_end|>\
            <|tool_calls_section_end|>";
        let blocks = parse_span(Dialect::KimiTokens, span, &mut CallIds::new()).unwrap();
        let calls: Vec<_> = blocks.iter().filter_map(ContentBlock::as_tool_invocation).collect();

        assert_eq!(calls[0].name, "get_weather");
        assert_eq!(calls[0].call_id, "functions.get_weather:4");
        assert_eq!(calls[1].name, "get_time");
        assert_eq!(calls[1].call_id, "functions.get_time:12");
    }
}
