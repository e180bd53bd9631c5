use std::sync::OnceLock;

use indexmap::IndexMap;
use regex::Regex;
use serde_json::Value;

use super::{CallIds, DialectSignature};
use crate::error::DialectError;
use crate::types::{ContentBlock, ToolInvocation};

fn invoke() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?is)<invoke\s+name\s*=\s*["']([^"']+)["']\s*>(.*?)</invoke>"#).expect("must be valid regex")
    })
}

fn parameter() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?is)<parameter\s+name\s*=\s*["']([^"']+)["']\s*>(.*?)</parameter>"#)
            .expect("must be valid regex")
    })
}

/// Any `<invoke` or `<parameter` opening tag, well formed or not
fn opener() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)<(invoke|parameter)\b").expect("must be valid regex"))
}

/// Parse `<invoke>` elements inside a wrapper
///
/// Parameter values are read as JSON when they parse as JSON and kept as
/// strings otherwise; the arguments object keeps document order. Every
/// `invoke` and `parameter` element in the wrapper must be complete, or
/// the whole wrapper is rejected.
pub(super) fn parse(sig: &DialectSignature, interior: &str, ids: &mut CallIds) -> Result<Vec<ContentBlock>, DialectError> {
    let (mut invokes_opened, mut params_opened) = (0, 0);
    for tag in opener().captures_iter(interior) {
        if tag[1].eq_ignore_ascii_case("invoke") {
            invokes_opened += 1;
        } else {
            params_opened += 1;
        }
    }

    let mut calls = Vec::new();
    let mut params_parsed = 0;

    for invocation in invoke().captures_iter(interior) {
        let name = invocation[1].trim();
        if name.is_empty() {
            return Err(DialectError::malformed(sig.dialect, "invoke element without a tool name"));
        }

        let mut arguments = IndexMap::new();
        for param in parameter().captures_iter(&invocation[2]) {
            let raw = param[2].trim();
            let value = serde_json::from_str::<Value>(raw).unwrap_or_else(|_| Value::String(raw.to_owned()));
            arguments.insert(param[1].trim().to_owned(), value);
            params_parsed += 1;
        }

        let arguments = serde_json::to_string(&arguments)
            .map_err(|e| DialectError::malformed(sig.dialect, format!("unencodable parameters: {e}")))?;
        calls.push((name.to_owned(), arguments));
    }

    if calls.is_empty() {
        return Err(DialectError::malformed(sig.dialect, "no complete invoke element"));
    }
    if calls.len() != invokes_opened {
        return Err(DialectError::malformed(
            sig.dialect,
            format!("only {} of {invokes_opened} invoke elements are complete", calls.len()),
        ));
    }
    if params_parsed != params_opened {
        return Err(DialectError::malformed(sig.dialect, "parameter element is incomplete"));
    }

    Ok(calls
        .into_iter()
        .map(|(name, arguments)| {
            let call_id = ids.synthesize(sig.id_prefix, &name);
            ToolInvocation::degraded(sig.dialect, call_id, name, arguments).into()
        })
        .collect())
}
