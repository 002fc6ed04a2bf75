//! AI-assisted evaluation of enriched elements.
//!
//! For each category only a bounded prefix of the collection is evaluated
//! (see [`CategoryLimits`]). Every element gets its rule-based finding, one
//! model call and, for images, a vision cross-check. Failures are folded
//! into the element's [`AiFinding`]; they never escape this module.

pub mod finding;
pub mod parse;
pub mod prompts;

pub use finding::{AiFinding, AiSeverity, Assessment, Failure, INVALID_FORMAT_ISSUE};
pub use parse::{extract_json_object, parse_response, ParseError};

use futures::stream::{self, StreamExt};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::{AuditConfig, CategoryLimits};
use crate::elements::{EnrichedImage, EnrichedLink, EnrichedTextBlock};
use crate::model::{ModelClient, ModelError};
use crate::readability::{analyze_readability, Readability};
use crate::rules::{
    analyze_alt_text, analyze_link_text, matching_rule, RuleFinding, IMAGE_ISSUE_RULES,
    LINK_ISSUE_RULES,
};
use crate::vision::{AltTextConsistency, VisionValidator};

use prompts::{Criterion, LINK_PURPOSE, NON_TEXT_CONTENT, READING_LEVEL};

/// Advice for one link.
#[derive(Debug, Clone, Serialize)]
pub struct LinkAdvice {
    pub link: EnrichedLink,
    pub rule_based: RuleFinding,
    pub ai_analysis: AiFinding,
}

/// Advice for one image.
#[derive(Debug, Clone, Serialize)]
pub struct ImageAdvice {
    pub image: EnrichedImage,
    pub rule_based: RuleFinding,
    pub ai_analysis: AiFinding,
}

/// Advice for one text block.
#[derive(Debug, Clone, Serialize)]
pub struct TextBlockAdvice {
    pub text_block: EnrichedTextBlock,
    pub readability: Readability,
    pub ai_analysis: AiFinding,
}

/// Timeout and retry behavior around a single model call.
#[derive(Debug, Clone, Copy)]
struct CallPolicy {
    timeout: Duration,
    max_retries: u32,
    backoff: Duration,
}

impl CallPolicy {
    fn delay(&self, attempt: u32) -> Duration {
        self.backoff.saturating_mul(1u32 << attempt.min(16))
    }
}

/// Combines rule-based checks with model judgment per element.
pub struct AiAdvisor {
    client: Arc<dyn ModelClient>,
    vision: Arc<dyn VisionValidator>,
    limits: CategoryLimits,
    concurrency: usize,
    policy: CallPolicy,
}

impl AiAdvisor {
    /// Create an advisor using the containment vision heuristic.
    pub fn new(client: Arc<dyn ModelClient>, config: &AuditConfig) -> Self {
        Self {
            client,
            vision: Arc::new(AltTextConsistency),
            limits: config.limits,
            concurrency: config.concurrency.max(1),
            policy: CallPolicy {
                timeout: Duration::from_millis(config.model.timeout_ms),
                max_retries: config.model.max_retries,
                backoff: Duration::from_millis(config.model.retry_backoff_ms),
            },
        }
    }

    /// Replace the vision validator.
    pub fn with_vision(mut self, vision: Arc<dyn VisionValidator>) -> Self {
        self.vision = vision;
        self
    }

    pub fn limits(&self) -> CategoryLimits {
        self.limits
    }

    /// Evaluate link purpose (WCAG 2.4.4) for the first `limits.links` links.
    pub async fn advise_links(&self, links: &[EnrichedLink]) -> Vec<LinkAdvice> {
        stream::iter(links.iter().take(self.limits.links))
            .map(|link| self.advise_link(link))
            .buffered(self.concurrency)
            .collect()
            .await
    }

    /// Evaluate alt text (WCAG 1.1.1) for the first `limits.images` images.
    pub async fn advise_images(&self, images: &[EnrichedImage]) -> Vec<ImageAdvice> {
        stream::iter(images.iter().take(self.limits.images))
            .map(|image| self.advise_image(image))
            .buffered(self.concurrency)
            .collect()
            .await
    }

    /// Evaluate reading level (WCAG 3.1.5) for the first `limits.text_blocks` blocks.
    pub async fn advise_text_blocks(&self, blocks: &[EnrichedTextBlock]) -> Vec<TextBlockAdvice> {
        stream::iter(blocks.iter().take(self.limits.text_blocks))
            .map(|block| self.advise_text_block(block))
            .buffered(self.concurrency)
            .collect()
            .await
    }

    async fn advise_link(&self, link: &EnrichedLink) -> LinkAdvice {
        let rule_based = analyze_link_text(link);
        if let Some(rule) = matching_rule(LINK_ISSUE_RULES, &link.element) {
            debug!(link = %link.text, rule, "rule flagged link");
        }
        let prompt = prompts::link_prompt(link);

        let ai_analysis = match self.assess(&prompt, LINK_PURPOSE).await {
            Ok(assessment) => AiFinding::Assessed(assessment),
            Err(e) => {
                warn!(link = %link.text, error = %e, "AI analysis failed for link");
                AiFinding::failed(e.to_string())
            }
        };

        LinkAdvice {
            link: link.clone(),
            rule_based,
            ai_analysis,
        }
    }

    async fn advise_image(&self, image: &EnrichedImage) -> ImageAdvice {
        let rule_based = analyze_alt_text(image);
        if let Some(rule) = matching_rule(IMAGE_ISSUE_RULES, &image.element) {
            debug!(src = %image.src, rule, "rule flagged image");
        }
        let prompt = prompts::image_prompt(image);

        let ai_analysis = match self.assess(&prompt, NON_TEXT_CONTENT).await {
            Ok(mut assessment) => {
                // the model's reasoning stands in for an independent visual description
                let description = assessment.reasoning.clone().unwrap_or_default();
                if description.is_empty() {
                    // an empty description is contained in any alt text
                    debug!(src = %image.src, "no reasoning in reply, vision check is vacuous");
                }
                match self.vision.validate(image, &description) {
                    Ok(vision) => {
                        assessment.vision_validation = Some(vision);
                        AiFinding::Assessed(assessment)
                    }
                    Err(e) => {
                        warn!(src = %image.src, error = %e, "vision validation failed for image");
                        AiFinding::failed(e.to_string())
                    }
                }
            }
            Err(e) => {
                warn!(src = %image.src, error = %e, "AI analysis failed for image");
                AiFinding::failed(e.to_string())
            }
        };

        ImageAdvice {
            image: image.clone(),
            rule_based,
            ai_analysis,
        }
    }

    async fn advise_text_block(&self, block: &EnrichedTextBlock) -> TextBlockAdvice {
        let readability = analyze_readability(&block.text);
        let prompt = prompts::text_block_prompt(block, &readability);

        let ai_analysis = match self.assess(&prompt, READING_LEVEL).await {
            Ok(assessment) => AiFinding::Assessed(assessment),
            Err(e) => {
                warn!(error = %e, "AI analysis failed for text block");
                AiFinding::failed(e.to_string())
            }
        };

        TextBlockAdvice {
            text_block: block.clone(),
            readability,
            ai_analysis,
        }
    }

    /// Call the model and parse its reply. Only call failures are errors;
    /// an unparseable reply becomes the invalid-format assessment.
    async fn assess(&self, prompt: &str, criterion: Criterion) -> Result<Assessment, ModelError> {
        let reply = self.call_model(prompt).await?;
        Ok(parse_response(&reply, criterion.id))
    }

    /// One model call under the timeout, retrying transient failures with
    /// exponential backoff.
    async fn call_model(&self, prompt: &str) -> Result<String, ModelError> {
        let mut attempt = 0;
        loop {
            let call = self.client.complete(prompt);
            let result = match tokio::time::timeout(self.policy.timeout, call).await {
                Ok(result) => result,
                Err(_) => Err(ModelError::Timeout),
            };

            match result {
                Err(e) if e.is_transient() && attempt < self.policy.max_retries => {
                    let delay = self.policy.delay(attempt);
                    debug!(
                        model = self.client.name(),
                        attempt = attempt + 1,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "retrying model call"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                other => return other,
            }
        }
    }
}
