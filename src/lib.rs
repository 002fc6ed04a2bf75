//! wcagaudit - accessibility audit pipeline for extracted web page elements.
//!
//! Links, images and text blocks pulled from a page are classified by
//! deterministic rules, then judged by a language model against WCAG 2.4.4
//! (Link Purpose in Context), 1.1.1 (Non-text Content) and 3.1.5 (Reading
//! Level). A failed model call degrades the finding for that one element;
//! it never aborts a run.
//!
//! # Architecture
//!
//! - `elements`: element records and their role-tagged (enriched) forms
//! - `rules`: ordered rule tables for roles and heuristic issues
//! - `enrich`: attaches semantic roles and confidence scores
//! - `readability`: sentence and word statistics for text blocks
//! - `vision`: alt text consistency check
//! - `model`: language model boundary and the Anthropic client
//! - `advisor`: prompts, defensive reply parsing, per-element evaluation
//! - `orchestrator`: runs the pipeline for one page
//! - `config`: YAML configuration
//! - `report`: output formatting (pretty, JSON)

pub mod advisor;
pub mod cli;
pub mod config;
pub mod elements;
pub mod enrich;
pub mod model;
pub mod orchestrator;
pub mod readability;
pub mod report;
pub mod rules;
pub mod vision;

pub use advisor::{AiAdvisor, AiFinding, Assessment};
pub use config::AuditConfig;
pub use elements::{EnrichedElements, Image, Link, RawElements, TextBlock};
pub use enrich::enrich_elements;
pub use model::{AnthropicClient, ModelClient, ModelError};
pub use orchestrator::{AnalysisResult, Auditor, ElementSource, JsonFileSource};
pub use readability::{analyze_readability, Readability};
pub use vision::{AltTextConsistency, VisionResult, VisionValidator};
