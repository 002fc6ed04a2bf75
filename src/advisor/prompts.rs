//! Evaluation prompts, one per element category.

use crate::elements::{EnrichedImage, EnrichedLink, EnrichedTextBlock};
use crate::readability::Readability;

/// A WCAG success criterion an element category is judged against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Criterion {
    pub id: &'static str,
    pub title: &'static str,
}

pub const LINK_PURPOSE: Criterion = Criterion {
    id: "2.4.4",
    title: "Link Purpose in Context",
};

pub const NON_TEXT_CONTENT: Criterion = Criterion {
    id: "1.1.1",
    title: "Non-text Content",
};

pub const READING_LEVEL: Criterion = Criterion {
    id: "3.1.5",
    title: "Reading Level",
};

/// Characters of a text block included in its prompt.
const TEXT_EXCERPT_CHARS: usize = 500;

const NO_CONTEXT: &str = "No context available";

fn or_default<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.trim().is_empty() {
        fallback
    } else {
        value
    }
}

fn response_format(
    criterion: Criterion,
    severities: &str,
    issue: &str,
    recommendation: &str,
) -> String {
    format!(
        r#"Respond with ONLY a JSON object (no markdown backticks):
{{
  "is_accessible": true or false,
  "wcag_criterion": "{}",
  "severity": {} or null,
  "issue": "{}, or null",
  "recommendation": "{} or null",
  "reasoning": "brief explanation"
}}"#,
        criterion.id, severities, issue, recommendation
    )
}

pub fn link_prompt(link: &EnrichedLink) -> String {
    format!(
        r#"You are a WCAG accessibility expert. Analyze this link for WCAG {id} ({title}).

Link Text: "{text}"
Destination: {href}
Context: {context}
Semantic Role: {role}

Evaluate whether a screen reader user can understand this link's purpose without visual context.

{format}"#,
        id = LINK_PURPOSE.id,
        title = LINK_PURPOSE.title,
        text = link.text,
        href = link.href,
        context = or_default(&link.context, NO_CONTEXT),
        role = link.semantic_role,
        format = response_format(
            LINK_PURPOSE,
            r#""critical" or "serious" or "moderate" or "minor""#,
            "brief description if problematic",
            "specific improvement",
        ),
    )
}

pub fn image_prompt(image: &EnrichedImage) -> String {
    format!(
        r#"You are a WCAG accessibility expert. Analyze this image's alt text for WCAG {id} ({title}).

Alt Text: "{alt}"
Context: {context}
Is Decorative: {decorative}
Semantic Role: {role}

Evaluate whether the alt text appropriately describes the image for screen reader users.

{format}"#,
        id = NON_TEXT_CONTENT.id,
        title = NON_TEXT_CONTENT.title,
        alt = image.alt.as_deref().unwrap_or("(missing)"),
        context = or_default(&image.context, NO_CONTEXT),
        decorative = image.is_decorative,
        role = image.semantic_role,
        format = response_format(
            NON_TEXT_CONTENT,
            r#""critical" or "serious" or "moderate" or "minor""#,
            "brief description if problematic",
            "specific alt text suggestion",
        ),
    )
}

pub fn text_block_prompt(block: &EnrichedTextBlock, readability: &Readability) -> String {
    let excerpt: String = block.text.chars().take(TEXT_EXCERPT_CHARS).collect();
    let heading = block.heading_context.as_deref().unwrap_or("");

    format!(
        r#"You are a WCAG accessibility expert. Analyze this text for WCAG {id} ({title}).

Text: "{excerpt}"
Word Count: {words}
Heading: {heading}
Context: {context}
Semantic Role: {role}

Current readability: {level}
(avg {wps} words/sentence, avg {wl} characters/word)

Evaluate whether this text is understandable for a broad audience (general public education level).

{format}"#,
        id = READING_LEVEL.id,
        title = READING_LEVEL.title,
        excerpt = excerpt,
        words = block.effective_word_count(),
        heading = or_default(heading, "No heading"),
        context = or_default(&block.context, NO_CONTEXT),
        role = block.semantic_role,
        level = readability.level,
        wps = readability.avg_words_per_sentence,
        wl = readability.avg_word_length,
        format = response_format(
            READING_LEVEL,
            r#""moderate" or "minor""#,
            "brief description if too complex",
            "how to simplify",
        ),
    )
}
