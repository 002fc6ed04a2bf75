//! Fixed vocabularies used by the rule classifier.
//!
//! The vocabularies target Dutch and English page copy.

use phf::{phf_set, Set};

/// Link texts that identify site navigation (exact, lowercased match).
pub static NAVIGATION_TERMS: Set<&'static str> = phf_set! {
    "home",
    "contact",
    "over ons",
    "about",
    "services",
};

/// Substrings that mark a link as triggering an action.
pub const ACTION_TERMS: &[&str] = &["download", "bestel", "inschrijven", "apply", "order"];

/// Substrings that mark a text block as instructions.
pub const INSTRUCTIONAL_TERMS: &[&str] = &["stap", "hoe", "handleiding", "volg"];

/// Substrings that mark a text block as legal or policy copy.
pub const TECHNICAL_TERMS: &[&str] = &["voorwaarden", "privacy", "beleid"];

/// Substrings that mark a text block as marketing copy.
pub const MARKETING_TERMS: &[&str] = &["voordelen", "waarom", "ontdek"];

/// Phrases that give a screen reader user no idea where a link goes.
pub const VAGUE_LINK_PHRASES: &[&str] = &["klik hier", "lees meer", "meer", "hier", "link"];

/// Alt texts that describe nothing (exact, lowercased match).
pub static GENERIC_ALT_TERMS: Set<&'static str> = phf_set! {
    "image",
    "photo",
    "picture",
    "icon",
};

/// Whether `text` contains any of `terms`.
pub fn contains_any(text: &str, terms: &[&str]) -> bool {
    terms.iter().any(|t| text.contains(t))
}
