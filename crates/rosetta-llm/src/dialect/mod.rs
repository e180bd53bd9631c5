//! Degraded tool-call and reasoning dialects
//!
//! Each dialect is described once in [`SIGNATURES`]: how its spans are
//! delimited in free text and which call-id prefix it synthesizes. Parsing
//! the interior of a span is delegated to the grammar module for that
//! dialect family. Nothing outside this module matches delimiters.

mod extract;
mod inline;
mod json;
mod reasoning;
mod tokens;

use std::collections::HashSet;
use std::ops::Range;

use rosetta_config::Dialect;

pub use extract::{Extraction, extract};
pub use tokens::Sentinels;

use crate::error::DialectError;
use crate::types::ContentBlock;

/// Registered dialects in registration order
pub static SIGNATURES: [DialectSignature; 5] = [
    DialectSignature {
        dialect: Dialect::ThinkTag,
        matcher: Matcher::Tags(TagPairs {
            pairs: &[("<think>", "</think>"), ("<thinking>", "</thinking>")],
            unterminated: Unterminated::Reject,
            orphan_close: true,
            ignore_case: false,
        }),
        id_prefix: "think",
    },
    DialectSignature {
        dialect: Dialect::MinimaxXml,
        matcher: Matcher::Tags(TagPairs {
            pairs: &[("<minimax:tool_call>", "</minimax:tool_call>")],
            unterminated: Unterminated::ToEnd,
            orphan_close: false,
            ignore_case: true,
        }),
        id_prefix: "minimax",
    },
    DialectSignature {
        dialect: Dialect::FunctionCallsXml,
        matcher: Matcher::Tags(TagPairs {
            pairs: &[("<function_calls>", "</function_calls>")],
            unterminated: Unterminated::ToEnd,
            orphan_close: false,
            ignore_case: true,
        }),
        id_prefix: "function_calls",
    },
    DialectSignature {
        dialect: Dialect::KimiTokens,
        matcher: Matcher::Sentinels(tokens::SENTINELS),
        id_prefix: "functions",
    },
    DialectSignature {
        dialect: Dialect::JsonObject,
        matcher: Matcher::JsonHeader,
        id_prefix: "json",
    },
];

/// Static description of one dialect
#[derive(Debug)]
pub struct DialectSignature {
    /// Dialect described
    pub dialect: Dialect,
    /// How spans are delimited
    pub matcher: Matcher,
    /// Prefix of call ids synthesized for this dialect
    pub id_prefix: &'static str,
}

/// Span delimiting strategy
#[derive(Debug)]
pub enum Matcher {
    /// Literal open/close tag pairs
    Tags(TagPairs),
    /// Section/call sentinel tokens, one set per accepted spelling
    Sentinels(&'static [Sentinels]),
    /// `{"name": ..., "arguments": {...}}` header plus balanced braces
    JsonHeader,
}

/// Literal tag pairs; a span opened by pair `i` is closed by pair `i`
#[derive(Debug)]
pub struct TagPairs {
    /// `(open, close)` spellings
    pub pairs: &'static [(&'static str, &'static str)],
    /// What an open tag without its close tag means
    pub unterminated: Unterminated,
    /// A close tag before any open tag closes a span starting at offset 0
    pub orphan_close: bool,
    /// Delimiters match regardless of ASCII case
    pub ignore_case: bool,
}

/// Treatment of an open delimiter with no matching close
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unterminated {
    /// Not a match
    Reject,
    /// The span runs to the end of the text
    ToEnd,
}

/// A located dialect span
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialectMatch {
    /// Dialect that matched
    pub dialect: Dialect,
    /// Byte range of the whole span, delimiters included
    pub span: Range<usize>,
    /// Byte range of the interior
    pub inner: Range<usize>,
}

impl DialectMatch {
    /// The matched span within `text`
    pub fn span_text<'a>(&self, text: &'a str) -> &'a str {
        &text[self.span.clone()]
    }

    /// The interior within `text`
    pub fn inner_text<'a>(&self, text: &'a str) -> &'a str {
        &text[self.inner.clone()]
    }
}

impl DialectSignature {
    /// First span of this dialect at or after byte offset `from`
    pub fn find(&self, text: &str, from: usize) -> Option<DialectMatch> {
        let (span, inner) = match &self.matcher {
            Matcher::Tags(tags) => tags.find(text, from)?,
            Matcher::Sentinels(sets) => tokens::find(sets, text, from)?,
            Matcher::JsonHeader => json::find(text, from)?,
        };
        Some(DialectMatch {
            dialect: self.dialect,
            span,
            inner,
        })
    }
}

impl TagPairs {
    fn find(&self, text: &str, from: usize) -> Option<(Range<usize>, Range<usize>)> {
        let hay = &text[from..];
        let open = self
            .pairs
            .iter()
            .filter_map(|(open, close)| self.locate(hay, open).map(|at| (at, *open, *close)))
            .min_by_key(|(at, ..)| *at);

        if self.orphan_close && from == 0 {
            let close = self
                .pairs
                .iter()
                .filter_map(|(_, close)| self.locate(hay, close).map(|at| (at, *close)))
                .min_by_key(|(at, _)| *at);
            if let Some((at, close)) = close
                && open.is_none_or(|(open_at, ..)| at < open_at)
            {
                return Some((0..at + close.len(), 0..at));
            }
        }

        let (at, open, close) = open?;
        let start = from + at;
        let inner_start = start + open.len();
        match self.locate(&text[inner_start..], close) {
            Some(len) => Some((start..inner_start + len + close.len(), inner_start..inner_start + len)),
            None if self.unterminated == Unterminated::ToEnd => Some((start..text.len(), inner_start..text.len())),
            None => None,
        }
    }

    fn locate(&self, hay: &str, tag: &str) -> Option<usize> {
        if !self.ignore_case {
            return hay.find(tag);
        }
        hay.as_bytes()
            .windows(tag.len())
            .position(|window| window.eq_ignore_ascii_case(tag.as_bytes()))
    }

    fn has_affix(&self, affix: Option<&str>, tag: &str) -> bool {
        affix.is_some_and(|affix| if self.ignore_case { affix.eq_ignore_ascii_case(tag) } else { affix == tag })
    }

    /// Interior of a span, stripping whichever delimiters are present
    fn interior<'a>(&self, span: &'a str) -> &'a str {
        let mut inner = span;
        if let Some(open) = self.pairs.iter().map(|(open, _)| *open).find(|open| self.has_affix(inner.get(..open.len()), open)) {
            inner = &inner[open.len()..];
        }
        if let Some(close) = self
            .pairs
            .iter()
            .map(|(_, close)| *close)
            .find(|close| self.has_affix(inner.len().checked_sub(close.len()).and_then(|at| inner.get(at..)), close))
        {
            inner = &inner[..inner.len() - close.len()];
        }
        inner
    }
}

/// Signature of a registered dialect
pub fn signature(dialect: Dialect) -> &'static DialectSignature {
    &SIGNATURES[dialect as usize]
}

/// First enabled dialect, in registration order, that matches `text`
pub fn detect(text: &str, enabled: &[Dialect]) -> Option<DialectMatch> {
    SIGNATURES
        .iter()
        .filter(|sig| enabled.contains(&sig.dialect))
        .find_map(|sig| sig.find(text, 0))
}

/// Parse one matched span into canonical blocks
///
/// Call ids are only drawn from `ids` when the whole span parses, so a
/// rejected span never consumes a position.
pub fn parse(dialect: Dialect, span: &str, ids: &mut CallIds) -> Result<Vec<ContentBlock>, DialectError> {
    let sig = signature(dialect);
    match &sig.matcher {
        Matcher::Tags(tags) if dialect.is_reasoning() => {
            Ok(reasoning::parse(tags.interior(span)).into_iter().map(ContentBlock::from).collect())
        }
        Matcher::Tags(tags) => inline::parse(sig, tags.interior(span), ids),
        Matcher::Sentinels(sets) => tokens::parse(sig, sets, span, ids),
        Matcher::JsonHeader => json::parse(sig, span, ids),
    }
}

/// Allocator for call ids within one assembled turn
///
/// Positions count every invocation in the turn, native or recovered, so
/// a synthesized id is stable for a given response body.
#[derive(Debug, Default)]
pub struct CallIds {
    issued: HashSet<String>,
    position: usize,
}

impl CallIds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an id the provider supplied
    pub fn adopt(&mut self, id: impl Into<String>) -> String {
        let id = id.into();
        if !self.issued.insert(id.clone()) {
            tracing::warn!(call_id = %id, "provider repeated a call id within one turn");
        }
        self.position += 1;
        id
    }

    /// Mint `<prefix>.<name>:<position>`, skipping ids already taken
    pub fn synthesize(&mut self, prefix: &str, name: &str) -> String {
        loop {
            let id = format!("{prefix}.{name}:{}", self.position);
            self.position += 1;
            if self.issued.insert(id.clone()) {
                return id;
            }
        }
    }

    /// Number of invocations seen so far
    pub const fn position(&self) -> usize {
        self.position
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn table_follows_declaration_order() {
        for (sig, dialect) in SIGNATURES.iter().zip(Dialect::iter()) {
            assert_eq!(sig.dialect, dialect);
            assert_eq!(signature(dialect).dialect, dialect);
        }
    }

    #[test]
    fn detect_prefers_registration_order() {
        let text = "<minimax:tool_call><invoke name=\"a\"></invoke></minimax:tool_call> \
                    <|tool_calls_section_begin|><|tool_call_begin|>functions.b:0<|tool_call_argument_begin|>{}<|tool_call_end|><|tool_calls_section_end|>";
        let all: Vec<_> = Dialect::iter().collect();
        assert_eq!(detect(text, &all).unwrap().dialect, Dialect::MinimaxXml);
        assert_eq!(detect(text, &[Dialect::KimiTokens]).unwrap().dialect, Dialect::KimiTokens);
        assert!(detect("plain answer", &all).is_none());
    }

    #[test]
    fn unterminated_wrapper_runs_to_end() {
        let text = "intro <function_calls><invoke name=\"x\"></invoke>";
        let found = signature(Dialect::FunctionCallsXml).find(text, 0).unwrap();
        assert_eq!(found.span, 6..text.len());
        assert_eq!(found.inner_text(text), "<invoke name=\"x\"></invoke>");
    }

    #[test]
    fn unterminated_think_is_not_a_match() {
        assert!(signature(Dialect::ThinkTag).find("<think>still going", 0).is_none());
    }

    #[test]
    fn orphan_close_only_at_start() {
        let sig = signature(Dialect::ThinkTag);
        let text = "plan quietly</think>answer";
        let found = sig.find(text, 0).unwrap();
        assert_eq!(found.span_text(text), "plan quietly</think>");
        assert_eq!(found.inner_text(text), "plan quietly");
        assert!(sig.find(text, 4).is_none());
    }

    #[test]
    fn tool_wrappers_ignore_case_but_think_does_not() {
        let text = "ok <MiniMax:Tool_Call><invoke name=\"a\"></invoke></MINIMAX:TOOL_CALL> done";
        let found = signature(Dialect::MinimaxXml).find(text, 0).unwrap();
        assert_eq!(found.span_text(text), "<MiniMax:Tool_Call><invoke name=\"a\"></invoke></MINIMAX:TOOL_CALL>");
        assert_eq!(found.inner_text(text), "<invoke name=\"a\"></invoke>");

        assert!(signature(Dialect::ThinkTag).find("<THINK>plan</THINK>", 0).is_none());
    }

    #[test]
    fn call_ids_skip_taken_positions() {
        let mut ids = CallIds::new();
        assert_eq!(ids.adopt("call_abc"), "call_abc");
        assert_eq!(ids.synthesize("json", "search"), "json.search:1");
        assert_eq!(ids.synthesize("json", "search"), "json.search:2");
        assert_eq!(ids.position(), 3);
    }
}
