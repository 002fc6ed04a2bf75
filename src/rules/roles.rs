//! Semantic role classification for links, images and text blocks.

use super::vocabulary::{
    contains_any, ACTION_TERMS, INSTRUCTIONAL_TERMS, MARKETING_TERMS, NAVIGATION_TERMS,
    TECHNICAL_TERMS,
};
use super::{first_match, Rule};
use crate::elements::{Classification, Image, ImageRole, Link, LinkRole, TextBlock, TextRole};

// Links

fn is_navigation_link(link: &Link) -> bool {
    NAVIGATION_TERMS.contains(link.text.to_lowercase().as_str())
}

fn is_action_link(link: &Link) -> bool {
    contains_any(&link.text.to_lowercase(), ACTION_TERMS)
}

fn is_ambiguous_link(link: &Link) -> bool {
    link.href.starts_with('#') || link.text.split_whitespace().count() <= 1
}

pub static LINK_ROLE_RULES: &[Rule<Link, Classification<LinkRole>>] = &[
    Rule {
        name: "navigation_term",
        matches: is_navigation_link,
        outcome: Classification::new(LinkRole::Navigation, 0.9),
    },
    Rule {
        name: "action_term",
        matches: is_action_link,
        outcome: Classification::new(LinkRole::Action, 0.85),
    },
    Rule {
        name: "fragment_or_single_word",
        matches: is_ambiguous_link,
        outcome: Classification::new(LinkRole::Ambiguous, 0.6),
    },
];

/// Classify a link by its role in the page structure.
pub fn classify_link(link: &Link) -> Classification<LinkRole> {
    first_match(
        LINK_ROLE_RULES,
        link,
        Classification::new(LinkRole::Reference, 0.7),
    )
}

// Images

fn is_decorative_image(image: &Image) -> bool {
    let role = image.role.as_deref().unwrap_or("").to_lowercase();
    role == "presentation" || image.alt_text().trim().is_empty()
}

fn is_informative_image(image: &Image) -> bool {
    image.alt_text().split_whitespace().count() >= 5
}

pub static IMAGE_ROLE_RULES: &[Rule<Image, Classification<ImageRole>>] = &[
    Rule {
        name: "presentation_or_empty_alt",
        matches: is_decorative_image,
        outcome: Classification::new(ImageRole::Decorative, 0.9),
    },
    Rule {
        name: "descriptive_alt",
        matches: is_informative_image,
        outcome: Classification::new(ImageRole::Informative, 0.8),
    },
];

/// Classify an image from its alt text and ARIA role.
pub fn classify_image(image: &Image) -> Classification<ImageRole> {
    first_match(
        IMAGE_ROLE_RULES,
        image,
        Classification::new(ImageRole::Functional, 0.7),
    )
}

// Text blocks

fn is_instructional(block: &TextBlock) -> bool {
    contains_any(&block.text.to_lowercase(), INSTRUCTIONAL_TERMS)
}

fn is_technical(block: &TextBlock) -> bool {
    contains_any(&block.text.to_lowercase(), TECHNICAL_TERMS)
}

fn is_marketing(block: &TextBlock) -> bool {
    contains_any(&block.text.to_lowercase(), MARKETING_TERMS)
}

pub static TEXT_ROLE_RULES: &[Rule<TextBlock, Classification<TextRole>>] = &[
    Rule {
        name: "instructional_term",
        matches: is_instructional,
        outcome: Classification::new(TextRole::Instructional, 0.8),
    },
    Rule {
        name: "policy_term",
        matches: is_technical,
        outcome: Classification::new(TextRole::Technical, 0.85),
    },
    Rule {
        name: "marketing_term",
        matches: is_marketing,
        outcome: Classification::new(TextRole::Marketing, 0.75),
    },
];

/// Classify the purpose of a text block.
pub fn classify_text_block(block: &TextBlock) -> Classification<TextRole> {
    first_match(
        TEXT_ROLE_RULES,
        block,
        Classification::new(TextRole::Informational, 0.7),
    )
}
