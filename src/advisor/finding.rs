//! Outcome of a model-assisted evaluation of one element.

use serde::{Deserialize, Serialize};

use crate::vision::VisionResult;

/// Issue text of the finding produced when a model reply cannot be parsed.
pub const INVALID_FORMAT_ISSUE: &str = "Invalid AI response format";

/// Severity reported by the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AiSeverity {
    Critical,
    Serious,
    Moderate,
    Minor,
    /// Any value outside the requested vocabulary.
    Unknown,
}

impl AiSeverity {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "critical" => AiSeverity::Critical,
            "serious" => AiSeverity::Serious,
            "moderate" => AiSeverity::Moderate,
            "minor" => AiSeverity::Minor,
            _ => AiSeverity::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AiSeverity::Critical => "critical",
            AiSeverity::Serious => "serious",
            AiSeverity::Moderate => "moderate",
            AiSeverity::Minor => "minor",
            AiSeverity::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for AiSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The model's verdict on an element. Any field may be null.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub is_accessible: Option<bool>,
    pub wcag_criterion: Option<String>,
    pub severity: Option<AiSeverity>,
    pub issue: Option<String>,
    pub recommendation: Option<String>,
    pub reasoning: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vision_validation: Option<VisionResult>,
}

impl Assessment {
    /// Placeholder verdict for a reply that could not be parsed.
    pub fn invalid_format(diagnostic: impl Into<String>) -> Self {
        Self {
            is_accessible: None,
            issue: Some(INVALID_FORMAT_ISSUE.to_string()),
            recommendation: None,
            reasoning: Some(diagnostic.into()),
            ..Default::default()
        }
    }

    pub fn is_invalid_format(&self) -> bool {
        self.issue.as_deref() == Some(INVALID_FORMAT_ISSUE) && self.is_accessible.is_none()
    }
}

/// A failed evaluation: the model or vision call did not complete.
///
/// Serializes as `{"is_accessible": null, "error": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Failure {
    is_accessible: Option<bool>,
    pub error: String,
}

impl Failure {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            is_accessible: None,
            error: error.into(),
        }
    }
}

/// Per-element AI outcome: either a verdict or a degraded result carrying a
/// diagnostic. Evaluation never returns anything else, so one bad element
/// cannot abort a batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AiFinding {
    Assessed(Assessment),
    Failed(Failure),
}

impl AiFinding {
    pub fn failed(error: impl Into<String>) -> Self {
        AiFinding::Failed(Failure::new(error))
    }

    pub fn assessment(&self) -> Option<&Assessment> {
        match self {
            AiFinding::Assessed(a) => Some(a),
            AiFinding::Failed(_) => None,
        }
    }

    pub fn is_accessible(&self) -> Option<bool> {
        self.assessment().and_then(|a| a.is_accessible)
    }

    pub fn issue(&self) -> Option<&str> {
        self.assessment().and_then(|a| a.issue.as_deref())
    }

    pub fn recommendation(&self) -> Option<&str> {
        self.assessment().and_then(|a| a.recommendation.as_deref())
    }

    pub fn vision_validation(&self) -> Option<&VisionResult> {
        self.assessment().and_then(|a| a.vision_validation.as_ref())
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            AiFinding::Failed(f) => Some(&f.error),
            AiFinding::Assessed(_) => None,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, AiFinding::Failed(_))
    }

    /// The model judged the element inaccessible.
    pub fn flags_issue(&self) -> bool {
        self.is_accessible() == Some(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_shape() {
        let finding = AiFinding::failed("request timed out");
        let v = serde_json::to_value(&finding).unwrap();
        assert!(v["is_accessible"].is_null());
        assert_eq!(v["error"], "request timed out");
        assert!(v.get("issue").is_none());
        assert_eq!(finding.error(), Some("request timed out"));
        assert!(finding.is_degraded());
        assert_eq!(finding.is_accessible(), None);
    }

    #[test]
    fn test_assessed_shape() {
        let finding = AiFinding::Assessed(Assessment {
            is_accessible: Some(false),
            wcag_criterion: Some("2.4.4".to_string()),
            severity: Some(AiSeverity::Serious),
            issue: Some("Link text is vague".to_string()),
            ..Default::default()
        });
        let v = serde_json::to_value(&finding).unwrap();
        assert_eq!(v["is_accessible"], false);
        assert_eq!(v["severity"], "serious");
        assert!(v["recommendation"].is_null());
        assert!(v.get("error").is_none());
        assert!(v.get("vision_validation").is_none());
        assert!(finding.flags_issue());
        assert_eq!(finding.issue(), Some("Link text is vague"));
        assert_eq!(finding.recommendation(), None);
        assert_eq!(AiFinding::failed("x").recommendation(), None);
    }

    #[test]
    fn test_invalid_format_placeholder() {
        let a = Assessment::invalid_format("expected value at line 1 column 1");
        assert!(a.is_invalid_format());
        assert_eq!(a.issue.as_deref(), Some(INVALID_FORMAT_ISSUE));
        assert_eq!(a.recommendation, None);
    }

    #[test]
    fn test_severity_parse() {
        assert_eq!(AiSeverity::parse("Critical"), AiSeverity::Critical);
        assert_eq!(AiSeverity::parse(" minor "), AiSeverity::Minor);
        assert_eq!(AiSeverity::parse("blocker"), AiSeverity::Unknown);
    }
}
