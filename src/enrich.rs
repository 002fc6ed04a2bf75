//! Attach semantic roles and confidence scores to extracted elements.

use crate::elements::{
    Classification, Enriched, EnrichedElements, Image, ImageRole, Link, LinkRole, RawElements,
    TextBlock, TextRole,
};
use crate::rules::{classify_image, classify_link, classify_text_block};

/// An element type with a rule-based role classifier.
pub trait Classify: Clone {
    type Role: Copy;

    fn classify(&self) -> Classification<Self::Role>;
}

impl Classify for Link {
    type Role = LinkRole;

    fn classify(&self) -> Classification<LinkRole> {
        classify_link(self)
    }
}

impl Classify for Image {
    type Role = ImageRole;

    fn classify(&self) -> Classification<ImageRole> {
        classify_image(self)
    }
}

impl Classify for TextBlock {
    type Role = TextRole;

    fn classify(&self) -> Classification<TextRole> {
        classify_text_block(self)
    }
}

/// Classify every element in input order.
pub fn enrich<T: Classify>(items: &[T]) -> Vec<Enriched<T, T::Role>> {
    items
        .iter()
        .map(|item| {
            let Classification { role, confidence } = item.classify();
            Enriched {
                element: item.clone(),
                semantic_role: role,
                confidence,
            }
        })
        .collect()
}

/// Enrich all three categories.
///
/// Classification only reads the element's own fields, so enriching the
/// output of [`EnrichedElements::to_raw`] again yields identical results.
pub fn enrich_elements(elements: &RawElements) -> EnrichedElements {
    EnrichedElements {
        links: enrich(&elements.links),
        images: enrich(&elements.images),
        text_blocks: enrich(&elements.text_blocks),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RawElements {
        RawElements::from_json(
            r##"{
                "links": [
                    {"text": "Over ons", "href": "/about"},
                    {"text": "Lees meer", "href": "#"},
                    {"text": "Download the prospectus", "href": "/p.pdf"}
                ],
                "images": [
                    {"src": "a.png", "alt": ""},
                    {"src": "b.png", "alt": "Students collaborating in the new library"}
                ],
                "text_blocks": [
                    {"text": "Volg de stappen hieronder."}
                ]
            }"##,
        )
        .unwrap()
    }

    #[test]
    fn test_roles_and_confidence_set() {
        let enriched = enrich_elements(&sample());
        assert_eq!(enriched.links.len(), 3);
        assert_eq!(enriched.links[0].semantic_role, LinkRole::Navigation);
        assert_eq!(enriched.links[2].semantic_role, LinkRole::Action);
        assert_eq!(enriched.images[0].semantic_role, ImageRole::Decorative);
        assert_eq!(enriched.images[1].semantic_role, ImageRole::Informative);
        assert_eq!(enriched.text_blocks[0].semantic_role, TextRole::Instructional);

        let confidences = enriched
            .links
            .iter()
            .map(|e| e.confidence)
            .chain(enriched.images.iter().map(|e| e.confidence))
            .chain(enriched.text_blocks.iter().map(|e| e.confidence));
        for c in confidences {
            assert!((0.0..=1.0).contains(&c));
        }
    }

    #[test]
    fn test_preserves_input_order() {
        let enriched = enrich_elements(&sample());
        let hrefs: Vec<_> = enriched.links.iter().map(|l| l.href.as_str()).collect();
        assert_eq!(hrefs, vec!["/about", "#", "/p.pdf"]);
    }

    #[test]
    fn test_missing_categories_present_and_empty() {
        let enriched = enrich_elements(&RawElements::from_json("{}").unwrap());
        assert!(enriched.links.is_empty());
        assert!(enriched.images.is_empty());
        assert!(enriched.text_blocks.is_empty());

        let value = serde_json::to_value(&enriched).unwrap();
        assert!(value["links"].is_array());
        assert!(value["images"].is_array());
        assert!(value["text_blocks"].is_array());
    }

    #[test]
    fn test_enrichment_is_idempotent() {
        let once = enrich_elements(&sample());
        let twice = enrich_elements(&once.to_raw());
        assert_eq!(once, twice);

        // round trip through the serialized form, which carries the role fields
        let json = serde_json::to_string(&once).unwrap();
        let reparsed = RawElements::from_json(&json).unwrap();
        assert_eq!(enrich_elements(&reparsed), once);
    }
}
