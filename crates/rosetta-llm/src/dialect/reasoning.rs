use crate::types::Reasoning;

/// Reasoning block for a think-tag interior, or `None` when it is blank
pub(super) fn parse(interior: &str) -> Option<Reasoning> {
    let text = interior.trim();
    (!text.is_empty()).then(|| Reasoning::plain(text))
}
