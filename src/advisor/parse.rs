//! Defensive parsing of model replies.
//!
//! Replies are asked to be a bare JSON object but routinely arrive wrapped
//! in a markdown fence or surrounded by prose. Extraction tries, in order:
//! the whole (unfenced) body, the span from the first `{` to the last `}`,
//! then every balanced `{...}` candidate. Whatever happens, [`parse_response`]
//! returns an [`Assessment`].

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::{Map, Value};
use thiserror::Error;

use super::finding::{AiSeverity, Assessment};

lazy_static! {
    /// Opening fence with optional language tag; body runs to the next fence
    /// or the end of the reply.
    static ref FENCED_BODY: Regex =
        Regex::new(r"(?s)\A```[A-Za-z0-9_+-]*[ \t]*\r?\n?(.*?)(?:```|\z)").unwrap();
}

/// Why a reply could not be turned into a JSON object.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("no JSON object found in response")]
    NoJsonObject,
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("response JSON is not an object")]
    NotAnObject,
}

/// Strip surrounding whitespace and a leading markdown fence.
pub fn unfence(response: &str) -> &str {
    let trimmed = response.trim();
    if !trimmed.starts_with("```") {
        return trimmed;
    }
    FENCED_BODY
        .captures(trimmed)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim())
        .unwrap_or(trimmed)
}

fn parse_object(candidate: &str) -> Result<Map<String, Value>, ParseError> {
    match serde_json::from_str::<Value>(candidate)? {
        Value::Object(map) => Ok(map),
        _ => Err(ParseError::NotAnObject),
    }
}

/// Byte ranges of balanced `{...}` spans, one per opening brace, skipping
/// braces inside string literals.
fn balanced_candidates(body: &str) -> Vec<&str> {
    let bytes = body.as_bytes();
    let mut candidates = Vec::new();

    for (start, _) in body.match_indices('{') {
        let mut depth = 0usize;
        let mut in_string = false;
        let mut escaped = false;

        for (offset, &b) in bytes[start..].iter().enumerate() {
            if in_string {
                if escaped {
                    escaped = false;
                } else if b == b'\\' {
                    escaped = true;
                } else if b == b'"' {
                    in_string = false;
                }
                continue;
            }
            match b {
                b'"' => in_string = true,
                b'{' => depth += 1,
                b'}' => {
                    depth -= 1;
                    if depth == 0 {
                        candidates.push(&body[start..start + offset + 1]);
                        break;
                    }
                }
                _ => {}
            }
        }
    }

    candidates
}

/// Locate and parse the JSON object in a model reply.
pub fn extract_json_object(response: &str) -> Result<Map<String, Value>, ParseError> {
    let body = unfence(response);

    // strict
    let mut last_error = match parse_object(body) {
        Ok(map) => return Ok(map),
        Err(e) => e,
    };

    // first '{' to last '}'
    if let (Some(start), Some(end)) = (body.find('{'), body.rfind('}')) {
        if start < end {
            match parse_object(&body[start..=end]) {
                Ok(map) => return Ok(map),
                Err(e) => last_error = e,
            }
        }
    } else {
        return Err(ParseError::NoJsonObject);
    }

    // balanced spans
    for candidate in balanced_candidates(body) {
        if let Ok(map) = parse_object(candidate) {
            return Ok(map);
        }
    }

    Err(last_error)
}

/// Parse a reply into an assessment, falling back to the invalid-format
/// placeholder. `criterion` fills in a missing `wcag_criterion`.
pub fn parse_response(response: &str, criterion: &str) -> Assessment {
    match extract_json_object(response) {
        Ok(map) => assessment_from_object(&map, criterion),
        Err(e) => {
            tracing::debug!(error = %e, "unparseable model response");
            Assessment::invalid_format(e.to_string())
        }
    }
}

/// Read the expected fields leniently: wrong types become null.
fn assessment_from_object(map: &Map<String, Value>, criterion: &str) -> Assessment {
    Assessment {
        is_accessible: bool_field(map, "is_accessible"),
        wcag_criterion: string_field(map, "wcag_criterion").or_else(|| Some(criterion.to_string())),
        severity: string_field(map, "severity").map(|s| AiSeverity::parse(&s)),
        issue: string_field(map, "issue"),
        recommendation: string_field(map, "recommendation"),
        reasoning: string_field(map, "reasoning"),
        vision_validation: None,
    }
}

fn bool_field(map: &Map<String, Value>, key: &str) -> Option<bool> {
    match map.get(key)? {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.trim().to_lowercase().as_str() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// String field; the literal text "null" and empty strings count as absent.
fn string_field(map: &Map<String, Value>, key: &str) -> Option<String> {
    match map.get(key)? {
        Value::String(s) if s.trim().is_empty() || s.trim().eq_ignore_ascii_case("null") => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advisor::finding::INVALID_FORMAT_ISSUE;

    #[test]
    fn test_plain_object() {
        let a = parse_response(
            r#"{"is_accessible": true, "wcag_criterion": "2.4.4", "severity": null, "issue": null, "recommendation": null, "reasoning": "Clear link"}"#,
            "2.4.4",
        );
        assert_eq!(a.is_accessible, Some(true));
        assert_eq!(a.wcag_criterion.as_deref(), Some("2.4.4"));
        assert_eq!(a.severity, None);
        assert_eq!(a.reasoning.as_deref(), Some("Clear link"));
    }

    #[test]
    fn test_fenced_equals_unfenced() {
        let body = r#"{"is_accessible": true, "wcag_criterion":"2.4.4"}"#;
        let fenced = format!("```json\n{}\n```", body);
        assert_eq!(parse_response(&fenced, "2.4.4"), parse_response(body, "2.4.4"));
        assert_eq!(parse_response(&fenced, "2.4.4").is_accessible, Some(true));
    }

    #[test]
    fn test_fence_without_tag_or_close() {
        let a = parse_response("```\n{\"is_accessible\": false}", "1.1.1");
        assert_eq!(a.is_accessible, Some(false));
        assert_eq!(a.wcag_criterion.as_deref(), Some("1.1.1"));
    }

    #[test]
    fn test_not_json_falls_back() {
        let a = parse_response("not json at all", "2.4.4");
        assert_eq!(a.is_accessible, None);
        assert_eq!(a.issue.as_deref(), Some(INVALID_FORMAT_ISSUE));
        assert_eq!(a.recommendation, None);
        assert!(a.reasoning.is_some());
    }

    #[test]
    fn test_empty_response_falls_back() {
        assert!(parse_response("", "3.1.5").is_invalid_format());
        assert!(parse_response("   \n ", "3.1.5").is_invalid_format());
    }

    #[test]
    fn test_prose_around_object() {
        let a = parse_response(
            "Here is my analysis:\n{\"is_accessible\": false, \"severity\": \"serious\"}\nHope this helps.",
            "2.4.4",
        );
        assert_eq!(a.is_accessible, Some(false));
        assert_eq!(a.severity, Some(AiSeverity::Serious));
    }

    #[test]
    fn test_unbalanced_brace_in_prose() {
        // first-to-last span is invalid; the balanced scan recovers the object
        let a = parse_response(
            "Note: the {template placeholder was odd. {\"is_accessible\": true, \"reasoning\": \"uses } in text\"}",
            "2.4.4",
        );
        assert_eq!(a.is_accessible, Some(true));
        assert_eq!(a.reasoning.as_deref(), Some("uses } in text"));
    }

    #[test]
    fn test_non_object_json_falls_back() {
        assert!(parse_response("[1, 2, 3]", "2.4.4").is_invalid_format());
        assert!(parse_response("42", "2.4.4").is_invalid_format());
    }

    #[test]
    fn test_lenient_fields() {
        let a = parse_response(
            r#"{"is_accessible": "False", "issue": "null", "recommendation": 5, "severity": "blocker"}"#,
            "1.1.1",
        );
        assert_eq!(a.is_accessible, Some(false));
        assert_eq!(a.issue, None);
        assert_eq!(a.recommendation.as_deref(), Some("5"));
        assert_eq!(a.severity, Some(AiSeverity::Unknown));
    }

    #[test]
    fn test_balanced_candidates_skip_string_braces() {
        let body = r#"x {"a": "{"} y {"b": 1}"#;
        let candidates = balanced_candidates(body);
        assert_eq!(candidates[0], r#"{"a": "{"}"#);
        assert!(candidates.contains(&r#"{"b": 1}"#));
    }
}
