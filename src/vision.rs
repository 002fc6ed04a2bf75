//! Cross-check declared alt text against an independently derived
//! description of the image.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::elements::Image;

pub const REASON_MISSING_ALT: &str = "Missing alt text";
pub const REASON_MISMATCH: &str = "Alt text does not match image meaning";
pub const REASON_MATCH: &str = "Alt text matches image meaning";

const SUGGEST_ADD_ALT: &str = "Provide a meaningful description of the image.";
const SUGGEST_UPDATE_ALT: &str = "Update alt text to reflect the image content.";

/// Result of a vision consistency check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisionResult {
    pub issue: bool,
    pub reason: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

/// Errors a vision validator may report.
#[derive(Error, Debug)]
pub enum VisionError {
    #[error("vision backend unavailable: {0}")]
    Unavailable(String),
}

/// Compares an image's alt text with a description of what it shows.
pub trait VisionValidator: Send + Sync {
    fn validate(&self, image: &Image, description: &str) -> Result<VisionResult, VisionError>;
}

/// Containment heuristic: the description must appear, case-insensitively,
/// inside the alt text.
///
/// This is a weak proxy for semantic equivalence and flags paraphrased alt
/// text as a mismatch.
#[derive(Debug, Clone, Copy, Default)]
pub struct AltTextConsistency;

impl VisionValidator for AltTextConsistency {
    fn validate(&self, image: &Image, description: &str) -> Result<VisionResult, VisionError> {
        Ok(cross_validate(image, description))
    }
}

/// Run the containment heuristic. A missing alt always wins over a mismatch.
pub fn cross_validate(image: &Image, description: &str) -> VisionResult {
    let alt = image.alt_text().to_lowercase();

    if alt.is_empty() {
        return VisionResult {
            issue: true,
            reason: REASON_MISSING_ALT.to_string(),
            suggestion: Some(SUGGEST_ADD_ALT.to_string()),
        };
    }

    if !alt.contains(&description.to_lowercase()) {
        return VisionResult {
            issue: true,
            reason: REASON_MISMATCH.to_string(),
            suggestion: Some(SUGGEST_UPDATE_ALT.to_string()),
        };
    }

    VisionResult {
        issue: false,
        reason: REASON_MATCH.to_string(),
        suggestion: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(alt: Option<&str>) -> Image {
        Image {
            alt: alt.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_missing_alt_regardless_of_description() {
        for description in ["", "a red bicycle", "anything at all"] {
            let result = cross_validate(&image(Some("")), description);
            assert!(result.issue);
            assert_eq!(result.reason, REASON_MISSING_ALT);
            assert!(result.suggestion.is_some());
        }
        assert_eq!(cross_validate(&image(None), "").reason, REASON_MISSING_ALT);
    }

    #[test]
    fn test_mismatch() {
        let result = cross_validate(&image(Some("Company logo")), "A red bicycle");
        assert!(result.issue);
        assert_eq!(result.reason, REASON_MISMATCH);
    }

    #[test]
    fn test_case_insensitive_containment() {
        let result = cross_validate(&image(Some("A RED BICYCLE against a wall")), "red bicycle");
        assert!(!result.issue);
        assert_eq!(result.reason, REASON_MATCH);
        assert_eq!(result.suggestion, None);
    }

    #[test]
    fn test_paraphrase_is_flagged() {
        // known limitation of the containment heuristic
        let result = cross_validate(&image(Some("Crimson bike")), "red bicycle");
        assert!(result.issue);
    }

    #[test]
    fn test_no_suggestion_serialized_when_clean() {
        let result = cross_validate(&image(Some("red bicycle")), "red bicycle");
        let v = serde_json::to_value(&result).unwrap();
        assert!(v.get("suggestion").is_none());
    }
}
