use std::ops::Range;
use std::sync::OnceLock;

use regex::Regex;

use super::{CallIds, DialectSignature};
use crate::error::DialectError;
use crate::types::{ContentBlock, ToolInvocation};

fn header() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Group 1: tool name; the match ends right before the arguments value
    RE.get_or_init(|| {
        Regex::new(r#"\{\s*"name"\s*:\s*"([^"\\]+)"\s*,\s*"(?:arguments|parameters)"\s*:\s*"#)
            .expect("must be valid regex")
    })
}

/// Byte length of the balanced `{...}` object at the start of `text`
///
/// Braces inside JSON strings do not count.
fn balanced_object(text: &str) -> Option<usize> {
    if !text.starts_with('{') {
        return None;
    }

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for (at, byte) in text.bytes().enumerate() {
        if in_string {
            match byte {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match byte {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(at + 1);
                }
            }
            _ => {}
        }
    }
    None
}

/// Span of the outer object and range of its arguments value
///
/// Redundant braces wrapped around the object, as in `{{"name": ...}}`,
/// belong to the span when they are paired.
fn locate(text: &str, header_start: usize, header_end: usize) -> Option<(Range<usize>, Range<usize>)> {
    let args_len = balanced_object(&text[header_end..])?;
    let args_end = header_end + args_len;
    let after = text[args_end..].trim_start().strip_prefix('}')?;
    let end = text.len() - after.len();

    let opening: Vec<usize> = text[..header_start]
        .char_indices()
        .rev()
        .take_while(|(_, c)| *c == '{' || c.is_whitespace())
        .filter_map(|(at, c)| (c == '{').then_some(at))
        .collect();
    let closing: Vec<usize> = text[end..]
        .char_indices()
        .take_while(|(_, c)| *c == '}' || c.is_whitespace())
        .filter_map(|(at, c)| (c == '}').then_some(end + at + 1))
        .take(opening.len())
        .collect();

    let span = match closing.len().checked_sub(1) {
        Some(last) => opening[last]..closing[last],
        None => header_start..end,
    };
    Some((span, header_end..args_end))
}

pub(super) fn find(text: &str, from: usize) -> Option<(Range<usize>, Range<usize>)> {
    header()
        .find_iter(&text[from..])
        .find_map(|m| locate(text, from + m.start(), from + m.end()))
}

/// Parse one `{"name": ..., "arguments": {...}}` object
///
/// The arguments object is kept exactly as written.
pub(super) fn parse(sig: &DialectSignature, span: &str, ids: &mut CallIds) -> Result<Vec<ContentBlock>, DialectError> {
    let caps = header()
        .captures(span)
        .filter(|caps| {
            caps.get(0)
                .is_some_and(|m| span[..m.start()].chars().all(|c| c == '{' || c.is_whitespace()))
        })
        .ok_or_else(|| DialectError::malformed(sig.dialect, "object does not start with a name field"))?;
    let (name, head) = match (caps.get(1), caps.get(0)) {
        (Some(name), Some(whole)) => (name.as_str(), whole.range()),
        _ => return Err(DialectError::malformed(sig.dialect, "object does not start with a name field")),
    };

    let Some((_, arguments)) = locate(span, head.start, head.end) else {
        return Err(DialectError::malformed(sig.dialect, "arguments object is not balanced"));
    };

    let call_id = ids.synthesize(sig.id_prefix, name);
    Ok(vec![
        ToolInvocation::degraded(sig.dialect, call_id, name, &span[arguments]).into(),
    ])
}
