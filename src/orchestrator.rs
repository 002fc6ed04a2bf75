//! Runs the full pipeline for one page: enrichment, then AI evaluation of
//! links, images and text blocks, in that order.

use anyhow::Context;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::advisor::{AiAdvisor, ImageAdvice, LinkAdvice, TextBlockAdvice};
use crate::elements::{EnrichedElements, RawElements};
use crate::enrich::enrich_elements;

/// Per-category AI advice rows, in input order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AiAdvice {
    pub links: Vec<LinkAdvice>,
    pub images: Vec<ImageAdvice>,
    pub text_blocks: Vec<TextBlockAdvice>,
}

/// Output of one audit run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AnalysisResult {
    pub semantic_analysis: EnrichedElements,
    pub ai_advice: AiAdvice,
}

/// Supplier of extracted elements, e.g. a browser session.
///
/// `close` releases the underlying session and is always called once a run
/// has started, whether extraction succeeded or not.
pub trait ElementSource {
    fn extract(&mut self) -> anyhow::Result<RawElements>;

    fn close(&mut self) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Elements previously extracted and saved as JSON.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl ElementSource for JsonFileSource {
    fn extract(&mut self) -> anyhow::Result<RawElements> {
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("reading elements {}", self.path.display()))?;
        RawElements::from_json(&content)
            .with_context(|| format!("parsing elements {}", self.path.display()))
    }
}

/// Pipeline driver.
pub struct Auditor {
    advisor: AiAdvisor,
}

impl Auditor {
    pub fn new(advisor: AiAdvisor) -> Self {
        Self { advisor }
    }

    /// Analyze already extracted elements. Model failures only degrade
    /// individual findings, so this cannot fail.
    pub async fn analyze(&self, elements: &RawElements) -> AnalysisResult {
        if elements.is_empty() {
            warn!("no elements to analyze");
        }

        info!("Enriching elements with semantic roles");
        let semantic_analysis = enrich_elements(elements);
        let limits = self.advisor.limits();
        debug!(
            links = semantic_analysis.links.len(),
            images = semantic_analysis.images.len(),
            text_blocks = semantic_analysis.text_blocks.len(),
            link_limit = limits.links,
            image_limit = limits.images,
            text_block_limit = limits.text_blocks,
            "enriched"
        );

        info!("Analyzing links with AI");
        let links = self.advisor.advise_links(&semantic_analysis.links).await;

        info!("Analyzing images with AI");
        let images = self.advisor.advise_images(&semantic_analysis.images).await;

        info!("Analyzing text blocks with AI");
        let text_blocks = self
            .advisor
            .advise_text_blocks(&semantic_analysis.text_blocks)
            .await;

        info!("Analysis complete");
        AnalysisResult {
            semantic_analysis,
            ai_advice: AiAdvice {
                links,
                images,
                text_blocks,
            },
        }
    }

    /// Extract from `source`, analyze, and release the source.
    ///
    /// An extraction error is returned after the source has been closed.
    /// A failure to close is logged and does not discard a finished result.
    pub async fn audit_source<S: ElementSource + ?Sized>(
        &self,
        source: &mut S,
    ) -> anyhow::Result<AnalysisResult> {
        let result = match source.extract() {
            Ok(elements) => Ok(self.analyze(&elements).await),
            Err(e) => Err(e),
        };

        if let Err(e) = source.close() {
            warn!(error = %e, "failed to close element source");
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AuditConfig;
    use crate::elements::{Image, Link, TextBlock};
    use crate::model::{ModelClient, ModelError};
    use async_trait::async_trait;
    use std::sync::Arc;

    struct EchoClient;

    #[async_trait]
    impl ModelClient for EchoClient {
        fn name(&self) -> &str {
            "echo"
        }

        async fn complete(&self, _: &str) -> Result<String, ModelError> {
            Ok(r#"{"is_accessible": true, "reasoning": "fine"}"#.to_string())
        }
    }

    struct DownClient;

    #[async_trait]
    impl ModelClient for DownClient {
        fn name(&self) -> &str {
            "down"
        }

        async fn complete(&self, _: &str) -> Result<String, ModelError> {
            Err(ModelError::Auth("no key".to_string()))
        }
    }

    #[derive(Default)]
    struct RecordingSource {
        fail: bool,
        closed: usize,
    }

    impl ElementSource for RecordingSource {
        fn extract(&mut self) -> anyhow::Result<RawElements> {
            if self.fail {
                anyhow::bail!("page did not load");
            }
            Ok(RawElements {
                links: vec![Link {
                    text: "Over ons".to_string(),
                    href: "/about".to_string(),
                    ..Default::default()
                }],
                ..Default::default()
            })
        }

        fn close(&mut self) -> anyhow::Result<()> {
            self.closed += 1;
            Ok(())
        }
    }

    fn auditor(client: Arc<dyn ModelClient>) -> Auditor {
        Auditor::new(AiAdvisor::new(client, &AuditConfig::default()))
    }

    fn sample() -> RawElements {
        RawElements {
            links: vec![Link {
                text: "Lees meer".to_string(),
                href: "/nieuws".to_string(),
                ..Default::default()
            }],
            images: vec![Image {
                src: "logo.png".to_string(),
                alt: Some("logo".to_string()),
                ..Default::default()
            }],
            text_blocks: vec![TextBlock {
                text: "Meld je aan voor de open dag.".to_string(),
                ..Default::default()
            }],
        }
    }

    #[tokio::test]
    async fn test_analyze_all_categories() {
        let result = auditor(Arc::new(EchoClient)).analyze(&sample()).await;
        assert_eq!(result.semantic_analysis.links.len(), 1);
        assert_eq!(result.ai_advice.links.len(), 1);
        assert_eq!(result.ai_advice.images.len(), 1);
        assert_eq!(result.ai_advice.text_blocks.len(), 1);
        assert!(result.ai_advice.links[0].rule_based.has_issue());
    }

    #[tokio::test]
    async fn test_model_outage_does_not_fail_run() {
        let result = auditor(Arc::new(DownClient)).analyze(&sample()).await;
        assert!(result.ai_advice.links[0].ai_analysis.is_degraded());
        assert!(result.ai_advice.images[0].ai_analysis.is_degraded());
        assert!(result.ai_advice.text_blocks[0].ai_analysis.is_degraded());
    }

    #[tokio::test]
    async fn test_empty_input() {
        let result = auditor(Arc::new(EchoClient))
            .analyze(&RawElements::default())
            .await;
        let v = serde_json::to_value(&result).unwrap();
        assert_eq!(v["semantic_analysis"]["links"], serde_json::json!([]));
        assert_eq!(v["ai_advice"]["text_blocks"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_source_closed_on_success() {
        let mut source = RecordingSource::default();
        let result = auditor(Arc::new(EchoClient))
            .audit_source(&mut source)
            .await
            .unwrap();
        assert_eq!(source.closed, 1);
        assert_eq!(
            result.semantic_analysis.links[0].semantic_role.as_str(),
            "navigation"
        );
    }

    #[tokio::test]
    async fn test_source_closed_on_extraction_failure() {
        let mut source = RecordingSource {
            fail: true,
            ..Default::default()
        };
        let err = auditor(Arc::new(EchoClient))
            .audit_source(&mut source)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("page did not load"));
        assert_eq!(source.closed, 1);
    }

    #[test]
    fn test_json_file_source_missing_file() {
        let mut source = JsonFileSource::new("does/not/exist.json");
        let err = source.extract().unwrap_err();
        assert!(format!("{:#}", err).contains("does/not/exist.json"));
    }
}
