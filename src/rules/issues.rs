//! Rule-based issue flagging for link text (WCAG 2.4.4) and alt text (WCAG 1.1.1).

use serde::{Serialize, Serializer};

use super::vocabulary::{contains_any, GENERIC_ALT_TERMS, VAGUE_LINK_PHRASES};
use super::{first_match, Rule};
use crate::elements::{Image, Link};

/// Severity of a rule-based finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleSeverity {
    Low,
    Medium,
    High,
}

impl RuleSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleSeverity::Low => "low",
            RuleSeverity::Medium => "medium",
            RuleSeverity::High => "high",
        }
    }
}

impl std::fmt::Display for RuleSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Kinds of issue the heuristics can raise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    VagueLinkText,
    MissingAlt,
    GenericAlt,
    WeakAlt,
}

impl IssueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueKind::VagueLinkText => "vague_link_text",
            IssueKind::MissingAlt => "missing_alt",
            IssueKind::GenericAlt => "generic_alt",
            IssueKind::WeakAlt => "weak_alt",
        }
    }

    /// Every issue kind carries a fixed severity.
    pub fn severity(&self) -> RuleSeverity {
        match self {
            IssueKind::MissingAlt => RuleSeverity::High,
            IssueKind::VagueLinkText | IssueKind::GenericAlt => RuleSeverity::Medium,
            IssueKind::WeakAlt => RuleSeverity::Low,
        }
    }
}

impl std::fmt::Display for IssueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Outcome of a heuristic check.
///
/// Holds at most one issue; the severity is derived from it, so an issue
/// without a severity (or the reverse) cannot be represented. Serializes as
/// `{"issue": ..., "severity": ...}` with both fields null when clean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RuleFinding(Option<IssueKind>);

impl RuleFinding {
    pub const fn clean() -> Self {
        RuleFinding(None)
    }

    pub const fn flag(kind: IssueKind) -> Self {
        RuleFinding(Some(kind))
    }

    pub fn issue(&self) -> Option<IssueKind> {
        self.0
    }

    pub fn severity(&self) -> Option<RuleSeverity> {
        self.0.map(|kind| kind.severity())
    }

    pub fn has_issue(&self) -> bool {
        self.0.is_some()
    }
}

impl Serialize for RuleFinding {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Wire {
            issue: Option<IssueKind>,
            severity: Option<RuleSeverity>,
        }

        Wire {
            issue: self.issue(),
            severity: self.severity(),
        }
        .serialize(serializer)
    }
}

fn has_vague_text(link: &Link) -> bool {
    contains_any(&link.text.to_lowercase(), VAGUE_LINK_PHRASES)
}

pub static LINK_ISSUE_RULES: &[Rule<Link, RuleFinding>] = &[Rule {
    name: "vague_phrase",
    matches: has_vague_text,
    outcome: RuleFinding::flag(IssueKind::VagueLinkText),
}];

/// Flag link text that does not describe its destination.
pub fn analyze_link_text(link: &Link) -> RuleFinding {
    first_match(LINK_ISSUE_RULES, link, RuleFinding::clean())
}

fn has_missing_alt(image: &Image) -> bool {
    image.alt_text().is_empty()
}

fn has_generic_alt(image: &Image) -> bool {
    GENERIC_ALT_TERMS.contains(image.alt_text().to_lowercase().as_str())
}

fn has_weak_alt(image: &Image) -> bool {
    image.alt_text().split_whitespace().count() < 3
}

pub static IMAGE_ISSUE_RULES: &[Rule<Image, RuleFinding>] = &[
    Rule {
        name: "missing_alt",
        matches: has_missing_alt,
        outcome: RuleFinding::flag(IssueKind::MissingAlt),
    },
    Rule {
        name: "generic_alt",
        matches: has_generic_alt,
        outcome: RuleFinding::flag(IssueKind::GenericAlt),
    },
    Rule {
        name: "weak_alt",
        matches: has_weak_alt,
        outcome: RuleFinding::flag(IssueKind::WeakAlt),
    },
];

/// Flag missing, generic or uninformative alt text.
pub fn analyze_alt_text(image: &Image) -> RuleFinding {
    first_match(IMAGE_ISSUE_RULES, image, RuleFinding::clean())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(text: &str) -> Link {
        Link {
            text: text.to_string(),
            ..Default::default()
        }
    }

    fn image(alt: Option<&str>) -> Image {
        Image {
            alt: alt.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_vague_link_text() {
        let finding = analyze_link_text(&link("Klik HIER"));
        assert_eq!(finding.issue(), Some(IssueKind::VagueLinkText));
        assert_eq!(finding.severity(), Some(RuleSeverity::Medium));

        // substring match: "Lees meer over de opleiding" contains "lees meer"
        assert!(analyze_link_text(&link("Lees meer over de opleiding")).has_issue());
    }

    #[test]
    fn test_descriptive_link_text() {
        let finding = analyze_link_text(&link("Bachelor Software Engineering"));
        assert_eq!(finding, RuleFinding::clean());
        assert_eq!(finding.severity(), None);
    }

    #[test]
    fn test_alt_text_priority() {
        assert_eq!(
            analyze_alt_text(&image(None)).issue(),
            Some(IssueKind::MissingAlt)
        );
        assert_eq!(
            analyze_alt_text(&image(Some(""))).severity(),
            Some(RuleSeverity::High)
        );
        // "Photo" is both generic and short; generic is checked first
        assert_eq!(
            analyze_alt_text(&image(Some("Photo"))).issue(),
            Some(IssueKind::GenericAlt)
        );
        assert_eq!(
            analyze_alt_text(&image(Some("Campus building"))).issue(),
            Some(IssueKind::WeakAlt)
        );
        assert_eq!(
            analyze_alt_text(&image(Some("Students at the main campus"))),
            RuleFinding::clean()
        );
    }

    #[test]
    fn test_weak_alt_token_threshold() {
        let finding = analyze_alt_text(&image(Some("red bicycle")));
        assert_eq!(finding.issue(), Some(IssueKind::WeakAlt));
        assert_eq!(finding.severity(), Some(RuleSeverity::Low));

        let finding = analyze_alt_text(&image(Some("red racing bicycle")));
        assert_eq!(finding, RuleFinding::clean());
        assert_eq!(finding.severity(), None);
    }

    #[test]
    fn test_issue_iff_severity() {
        let findings = [
            analyze_alt_text(&image(None)),
            analyze_alt_text(&image(Some("icon"))),
            analyze_alt_text(&image(Some("a b"))),
            analyze_alt_text(&image(Some("a b c"))),
            analyze_link_text(&link("meer")),
            analyze_link_text(&link("Contact us today")),
        ];
        for f in findings {
            assert_eq!(f.issue().is_none(), f.severity().is_none());
        }
    }

    #[test]
    fn test_serialized_shape() {
        let v = serde_json::to_value(analyze_alt_text(&image(Some("image")))).unwrap();
        assert_eq!(v["issue"], "generic_alt");
        assert_eq!(v["severity"], "medium");

        let v = serde_json::to_value(RuleFinding::clean()).unwrap();
        assert!(v["issue"].is_null());
        assert!(v["severity"].is_null());
    }
}
