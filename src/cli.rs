//! Command-line interface for wcagaudit.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use crate::advisor::AiAdvisor;
use crate::config::{self, AuditConfig};
use crate::model::{AnthropicClient, ModelClient};
use crate::orchestrator::{Auditor, JsonFileSource};
use crate::report::{self, Summary};

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILED: i32 = 1;
pub const EXIT_ERROR: i32 = 2;

/// Prompt sent by the `ping` command.
const PING_PROMPT: &str = "API connection successful!";
const PING_MAX_TOKENS: u32 = 100;

/// Accessibility audit pipeline - rule heuristics plus AI-assisted WCAG judgment.
///
/// Reads elements extracted from a web page (links, images, text blocks),
/// classifies them, and asks a language model to judge them against
/// WCAG 2.4.4, 1.1.1 and 3.1.5.
#[derive(Parser)]
#[command(name = "wcagaudit")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Audit extracted page elements
    Audit(AuditArgs),
    /// Check connectivity to the configured model
    Ping(PingArgs),
    /// Create a wcagaudit config file from the template
    Init(InitArgs),
}

/// Arguments for the audit command.
#[derive(Parser)]
pub struct AuditArgs {
    /// JSON file with extracted elements (links, images, text_blocks)
    pub input: PathBuf,

    /// Path to config YAML file (default: auto-discover)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output format: pretty or json
    #[arg(short, long, default_value = "pretty")]
    pub format: String,

    /// Elements evaluated at once (overrides config)
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Exit non-zero when any rule-based or AI finding flags an issue
    #[arg(long)]
    pub strict: bool,
}

/// Arguments for the ping command.
#[derive(Parser)]
pub struct PingArgs {
    /// Path to config YAML file (default: auto-discover)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Arguments for the init command.
#[derive(Parser)]
pub struct InitArgs {
    /// Output file path
    #[arg(short, long, default_value = "wcagaudit.yaml")]
    pub output: PathBuf,
}

const CONFIG_TEMPLATE: &str = include_str!("templates/default.yaml");

/// Install the stderr log subscriber. `RUST_LOG` overrides the default filter.
pub fn init_logging(verbose: bool) {
    let default = if verbose {
        "wcagaudit=debug"
    } else {
        "wcagaudit=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    // a second init (e.g. in tests) is harmless
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Load and validate configuration, printing the error on failure.
fn load_config(explicit: Option<&Path>) -> Option<(AuditConfig, Option<PathBuf>)> {
    match AuditConfig::load(explicit) {
        Ok(loaded) => Some(loaded),
        Err(e) => {
            eprintln!("Error: invalid config: {:#}", e);
            None
        }
    }
}

fn build_client(config: &AuditConfig) -> anyhow::Result<AnthropicClient> {
    let api_key = config.model.api_key()?;
    Ok(AnthropicClient::new(config.model.clone(), api_key)?)
}

/// Run the audit command.
pub fn run_audit(args: &AuditArgs) -> anyhow::Result<i32> {
    if args.format != "pretty" && args.format != "json" {
        eprintln!(
            "Error: invalid format {:?}, must be 'pretty' or 'json'",
            args.format
        );
        return Ok(EXIT_ERROR);
    }

    let Some((mut config, config_path)) = load_config(args.config.as_deref()) else {
        return Ok(EXIT_ERROR);
    };
    if let Some(concurrency) = args.concurrency {
        config.concurrency = concurrency;
        if let Err(e) = config::validate(&config) {
            eprintln!("Error: {}", e);
            return Ok(EXIT_ERROR);
        }
    }
    match &config_path {
        Some(p) => tracing::debug!(config = %p.display(), "using config"),
        None => tracing::debug!("no config file found, using defaults"),
    }

    let client = match build_client(&config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(EXIT_ERROR);
        }
    };

    let advisor = AiAdvisor::new(Arc::new(client), &config);
    let auditor = Auditor::new(advisor);
    let mut source = JsonFileSource::new(&args.input);

    let runtime = tokio::runtime::Runtime::new()?;
    let result = match runtime.block_on(auditor.audit_source(&mut source)) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return Ok(EXIT_ERROR);
        }
    };

    match args.format.as_str() {
        "json" => report::write_json(&result)?,
        _ => report::write_pretty(
            &args.input.to_string_lossy(),
            &config.model.name,
            &result,
        ),
    }

    if args.strict && Summary::from_result(&result).has_issues() {
        Ok(EXIT_FAILED)
    } else {
        Ok(EXIT_SUCCESS)
    }
}

/// Run the ping command.
pub fn run_ping(args: &PingArgs) -> anyhow::Result<i32> {
    let Some((config, _)) = load_config(args.config.as_deref()) else {
        return Ok(EXIT_ERROR);
    };

    println!("Testing connection to {}...", config.model.name);

    let client = match build_client(&config) {
        Ok(c) => c.with_max_tokens(PING_MAX_TOKENS),
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(EXIT_ERROR);
        }
    };

    let runtime = tokio::runtime::Runtime::new()?;
    match runtime.block_on(client.complete(PING_PROMPT)) {
        Ok(reply) => {
            println!("Model is reachable.");
            println!("Reply: {}", reply.trim());
            Ok(EXIT_SUCCESS)
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            Ok(EXIT_FAILED)
        }
    }
}

/// Run the init command.
pub fn run_init(args: &InitArgs) -> anyhow::Result<i32> {
    if args.output.exists() {
        eprintln!("Error: file already exists: {}", args.output.display());
        eprintln!("Remove it or use --output to specify a different path");
        return Ok(EXIT_ERROR);
    }

    if let Some(parent) = args.output.parent() {
        if !parent.as_os_str().is_empty() && parent != Path::new(".") {
            if let Err(e) = std::fs::create_dir_all(parent) {
                eprintln!("Error: failed to create directory: {}", e);
                return Ok(EXIT_ERROR);
            }
        }
    }

    if let Err(e) = std::fs::write(&args.output, CONFIG_TEMPLATE) {
        eprintln!("Error: failed to write config: {}", e);
        return Ok(EXIT_ERROR);
    }

    println!("Created {}", args.output.display());
    println!();
    println!("Next steps:");
    println!("  1. Export your API key: export ANTHROPIC_API_KEY=...");
    println!("  2. Run: wcagaudit ping --config {}", args.output.display());
    println!(
        "  3. Run: wcagaudit audit elements.json --config {}",
        args.output.display()
    );

    Ok(EXIT_SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_audit_args() {
        let cli = Cli::try_parse_from([
            "wcagaudit",
            "audit",
            "page.json",
            "--format",
            "json",
            "--concurrency",
            "4",
            "--strict",
            "-v",
        ])
        .unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::Audit(args) => {
                assert_eq!(args.input, PathBuf::from("page.json"));
                assert_eq!(args.format, "json");
                assert_eq!(args.concurrency, Some(4));
                assert!(args.strict);
            }
            _ => panic!("expected audit command"),
        }
    }

    #[test]
    fn test_template_is_valid_config() {
        let config: AuditConfig = serde_yaml::from_str(CONFIG_TEMPLATE).unwrap();
        assert!(config::validate(&config).is_ok());
        assert_eq!(config, AuditConfig::default());
    }

    #[test]
    fn test_init_writes_template_once() {
        let dir = tempfile::TempDir::new().unwrap();
        let output = dir.path().join("nested").join("wcagaudit.yaml");
        let args = InitArgs {
            output: output.clone(),
        };

        assert_eq!(run_init(&args).unwrap(), EXIT_SUCCESS);
        assert_eq!(std::fs::read_to_string(&output).unwrap(), CONFIG_TEMPLATE);
        assert_eq!(run_init(&args).unwrap(), EXIT_ERROR);
    }

    #[test]
    fn test_invalid_format_rejected() {
        let args = AuditArgs {
            input: PathBuf::from("page.json"),
            config: None,
            format: "sarif".to_string(),
            concurrency: None,
            strict: false,
        };
        assert_eq!(run_audit(&args).unwrap(), EXIT_ERROR);
    }
}
