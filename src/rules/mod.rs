//! Deterministic accessibility heuristics.
//!
//! Every classifier is an ordered table of [`Rule`]s evaluated top to bottom;
//! the first rule whose predicate holds decides the outcome. Keeping the
//! tables as data makes the tie-break order visible and lets each rule be
//! tested on its own.

mod issues;
mod roles;
pub mod vocabulary;

pub use issues::{
    analyze_alt_text, analyze_link_text, IssueKind, RuleFinding, RuleSeverity, IMAGE_ISSUE_RULES,
    LINK_ISSUE_RULES,
};
pub use roles::{
    classify_image, classify_link, classify_text_block, IMAGE_ROLE_RULES, LINK_ROLE_RULES,
    TEXT_ROLE_RULES,
};

/// One entry of an ordered rule table.
pub struct Rule<T: ?Sized, O: 'static> {
    /// Stable identifier, used in logs and tests.
    pub name: &'static str,
    pub matches: fn(&T) -> bool,
    pub outcome: O,
}

/// Evaluate `rules` in order and return the outcome of the first match.
pub fn first_match<T: ?Sized, O: Copy>(rules: &[Rule<T, O>], item: &T, fallback: O) -> O {
    rules
        .iter()
        .find(|rule| (rule.matches)(item))
        .map(|rule| rule.outcome)
        .unwrap_or(fallback)
}

/// Name of the first matching rule, if any.
pub fn matching_rule<T: ?Sized, O>(rules: &[Rule<T, O>], item: &T) -> Option<&'static str> {
    rules
        .iter()
        .find(|rule| (rule.matches)(item))
        .map(|rule| rule.name)
}
