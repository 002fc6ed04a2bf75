//! Page elements handed over by the extraction step.
//!
//! Raw records are deserialized leniently: every field has a default, so a
//! record missing its text or alt attribute still loads (with an empty or
//! absent value) instead of failing the whole input.

use serde::{Deserialize, Serialize};
use std::ops::Deref;

/// A hyperlink with the text a screen reader would announce.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Link {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub href: String,
    #[serde(default)]
    pub context: String,
    #[serde(default)]
    pub aria_label: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

/// An `<img>` element.
///
/// `alt` is `None` when the attribute is absent and `Some("")` when it is
/// explicitly empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Image {
    #[serde(default)]
    pub src: String,
    #[serde(default)]
    pub alt: Option<String>,
    #[serde(default)]
    pub aria_label: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub context: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub is_decorative: bool,
}

impl Image {
    /// Alt text with an absent attribute treated as empty.
    pub fn alt_text(&self) -> &str {
        self.alt.as_deref().unwrap_or("")
    }
}

/// A paragraph of body copy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextBlock {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub context: String,
    #[serde(default)]
    pub heading_context: Option<String>,
    /// Word count reported by the extractor; 0 when it did not supply one.
    #[serde(default)]
    pub word_count: usize,
}

impl TextBlock {
    /// Extractor-supplied word count, falling back to a whitespace count.
    pub fn effective_word_count(&self) -> usize {
        if self.word_count > 0 {
            self.word_count
        } else {
            self.text.split_whitespace().count()
        }
    }
}

/// Functional purpose of a link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkRole {
    Navigation,
    Action,
    Ambiguous,
    Reference,
}

/// Functional purpose of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageRole {
    Decorative,
    Informative,
    Functional,
}

/// Functional purpose of a text block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextRole {
    Instructional,
    Technical,
    Marketing,
    Informational,
}

macro_rules! role_names {
    ($ty:ty { $($variant:ident => $name:literal),+ $(,)? }) => {
        impl $ty {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $name,)+
                }
            }
        }

        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.as_str())
            }
        }
    };
}

role_names!(LinkRole {
    Navigation => "navigation",
    Action => "action",
    Ambiguous => "ambiguous",
    Reference => "reference",
});

role_names!(ImageRole {
    Decorative => "decorative",
    Informative => "informative",
    Functional => "functional",
});

role_names!(TextRole {
    Instructional => "instructional",
    Technical => "technical",
    Marketing => "marketing",
    Informational => "informational",
});

/// A semantic role paired with the classifier's confidence in it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification<R> {
    pub role: R,
    pub confidence: f64,
}

impl<R> Classification<R> {
    pub const fn new(role: R, confidence: f64) -> Self {
        Self { role, confidence }
    }
}

/// An element with its semantic role attached.
///
/// Serializes flat: the element's own fields followed by `semantic_role` and
/// `confidence`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enriched<T, R> {
    #[serde(flatten)]
    pub element: T,
    pub semantic_role: R,
    pub confidence: f64,
}

impl<T, R> Deref for Enriched<T, R> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.element
    }
}

pub type EnrichedLink = Enriched<Link, LinkRole>;
pub type EnrichedImage = Enriched<Image, ImageRole>;
pub type EnrichedTextBlock = Enriched<TextBlock, TextRole>;

/// Element collections as produced by the extractor.
///
/// Absent categories deserialize as empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawElements {
    #[serde(default)]
    pub links: Vec<Link>,
    #[serde(default)]
    pub images: Vec<Image>,
    #[serde(default)]
    pub text_blocks: Vec<TextBlock>,
}

impl RawElements {
    /// Parse extractor output from JSON.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty() && self.images.is_empty() && self.text_blocks.is_empty()
    }
}

/// Role-tagged element collections; all three categories are always present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnrichedElements {
    pub links: Vec<EnrichedLink>,
    pub images: Vec<EnrichedImage>,
    pub text_blocks: Vec<EnrichedTextBlock>,
}

impl EnrichedElements {
    /// Strip the enrichment and return the underlying raw records.
    pub fn to_raw(&self) -> RawElements {
        RawElements {
            links: self.links.iter().map(|e| e.element.clone()).collect(),
            images: self.images.iter().map(|e| e.element.clone()).collect(),
            text_blocks: self.text_blocks.iter().map(|e| e.element.clone()).collect(),
        }
    }
}
