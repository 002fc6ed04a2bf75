//! Audit configuration.
//!
//! Loaded from YAML; every field has a default so an empty file (or no file
//! at all) yields the reference behavior: temperature 0, a 500-token ceiling,
//! per-category caps of 10/10/5 and strictly sequential evaluation.

use anyhow::Context;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Config file names searched for in the working directory.
pub const DEFAULT_CONFIG_NAMES: &[&str] = &["wcagaudit.yaml", ".wcagaudit.yaml"];

/// Upper bound on concurrent model calls.
pub const MAX_CONCURRENCY: usize = 32;

/// Upper bound on retries of a single model call.
pub const MAX_RETRIES: u32 = 10;

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct AuditConfig {
    #[serde(default)]
    pub model: ModelSettings,
    #[serde(default)]
    pub limits: CategoryLimits,
    /// Elements evaluated at once within a category (default: 1)
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

fn default_concurrency() -> usize {
    1
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            model: ModelSettings::default(),
            limits: CategoryLimits::default(),
            concurrency: default_concurrency(),
        }
    }
}

impl AuditConfig {
    /// Parse a configuration from a YAML file.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: AuditConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(config)
    }

    /// Load the explicit config if given, else the first discovered one,
    /// else defaults. Returns the path that was used, if any.
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<(Self, Option<PathBuf>)> {
        let path = match explicit {
            Some(p) => Some(p.to_path_buf()),
            None => discover_config(),
        };

        let config = match &path {
            Some(p) => Self::parse_file(p)?,
            None => Self::default(),
        };
        validate(&config)?;
        Ok((config, path))
    }
}

/// Model invocation settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ModelSettings {
    /// Model identifier (default: claude-sonnet-4-20250514)
    #[serde(default = "default_model_name")]
    pub name: String,
    /// Output-token ceiling per call (default: 500)
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Sampling temperature (default: 0.0)
    #[serde(default)]
    pub temperature: f32,
    /// Per-call timeout in milliseconds (default: 30000)
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Retries for transient failures (default: 2)
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Base delay between retries, doubled per attempt (default: 500)
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
    /// Environment variable holding the API key (default: ANTHROPIC_API_KEY)
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_model_name() -> String {
    "claude-sonnet-4-20250514".to_string()
}

fn default_max_tokens() -> u32 {
    500
}

fn default_timeout_ms() -> u64 {
    30_000
}

fn default_max_retries() -> u32 {
    2
}

fn default_retry_backoff_ms() -> u64 {
    500
}

fn default_api_key_env() -> String {
    "ANTHROPIC_API_KEY".to_string()
}

fn default_base_url() -> String {
    "https://api.anthropic.com/v1".to_string()
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            name: default_model_name(),
            max_tokens: default_max_tokens(),
            temperature: 0.0,
            timeout_ms: default_timeout_ms(),
            max_retries: default_max_retries(),
            retry_backoff_ms: default_retry_backoff_ms(),
            api_key_env: default_api_key_env(),
            base_url: default_base_url(),
        }
    }
}

impl ModelSettings {
    /// Read the API key from the configured environment variable.
    pub fn api_key(&self) -> anyhow::Result<String> {
        match std::env::var(&self.api_key_env) {
            Ok(key) if !key.trim().is_empty() => Ok(key),
            Ok(_) => anyhow::bail!("{} is empty", self.api_key_env),
            Err(_) => anyhow::bail!("{} environment variable not set", self.api_key_env),
        }
    }
}

/// How many elements of each category are sent to the model.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
pub struct CategoryLimits {
    #[serde(default = "default_link_limit")]
    pub links: usize,
    #[serde(default = "default_image_limit")]
    pub images: usize,
    #[serde(default = "default_text_block_limit")]
    pub text_blocks: usize,
}

fn default_link_limit() -> usize {
    10
}

fn default_image_limit() -> usize {
    10
}

fn default_text_block_limit() -> usize {
    5
}

impl Default for CategoryLimits {
    fn default() -> Self {
        Self {
            links: default_link_limit(),
            images: default_image_limit(),
            text_blocks: default_text_block_limit(),
        }
    }
}

/// Find a config file in the working directory, then the user config dir.
pub fn discover_config() -> Option<PathBuf> {
    for name in DEFAULT_CONFIG_NAMES {
        let path = PathBuf::from(name);
        if path.exists() {
            return Some(path);
        }
    }

    ProjectDirs::from("", "", "wcagaudit")
        .map(|dirs| dirs.config_dir().join(DEFAULT_CONFIG_NAMES[0]))
        .filter(|path| path.exists())
}

/// Validate a configuration for correctness.
pub fn validate(config: &AuditConfig) -> anyhow::Result<()> {
    let model = &config.model;

    if model.name.trim().is_empty() {
        anyhow::bail!("model.name must not be empty");
    }
    if model.max_tokens == 0 {
        anyhow::bail!("model.max_tokens must be greater than 0");
    }
    if !(0.0..=1.0).contains(&model.temperature) {
        anyhow::bail!(
            "model.temperature {} out of range, must be between 0 and 1",
            model.temperature
        );
    }
    if model.timeout_ms == 0 {
        anyhow::bail!("model.timeout_ms must be greater than 0");
    }
    if model.max_retries > MAX_RETRIES {
        anyhow::bail!(
            "model.max_retries {} out of range, must be at most {}",
            model.max_retries,
            MAX_RETRIES
        );
    }
    if config.concurrency == 0 || config.concurrency > MAX_CONCURRENCY {
        anyhow::bail!(
            "concurrency {} out of range, must be between 1 and {}",
            config.concurrency,
            MAX_CONCURRENCY
        );
    }

    Ok(())
}
