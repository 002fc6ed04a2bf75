//! Output formatting for audit results.
//!
//! - Pretty: colored terminal summary for humans
//! - JSON: the full analysis result for programmatic consumption

use colored::*;
use serde::Serialize;

use crate::advisor::{AiFinding, AiSeverity};
use crate::orchestrator::AnalysisResult;
use crate::rules::{RuleFinding, RuleSeverity};

/// Counts derived from an analysis result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub links_found: usize,
    pub images_found: usize,
    pub text_blocks_found: usize,
    pub links_evaluated: usize,
    pub images_evaluated: usize,
    pub text_blocks_evaluated: usize,
    /// Rows whose rule-based check raised an issue.
    pub rule_flags: usize,
    /// Rows the model judged inaccessible.
    pub ai_flags: usize,
    /// Rows whose model or vision call failed.
    pub degraded: usize,
    pub vision_mismatches: usize,
}

impl Summary {
    pub fn from_result(result: &AnalysisResult) -> Self {
        let semantic = &result.semantic_analysis;
        let advice = &result.ai_advice;

        let findings = advice
            .links
            .iter()
            .map(|row| &row.ai_analysis)
            .chain(advice.images.iter().map(|row| &row.ai_analysis))
            .chain(advice.text_blocks.iter().map(|row| &row.ai_analysis));

        let mut summary = Summary {
            links_found: semantic.links.len(),
            images_found: semantic.images.len(),
            text_blocks_found: semantic.text_blocks.len(),
            links_evaluated: advice.links.len(),
            images_evaluated: advice.images.len(),
            text_blocks_evaluated: advice.text_blocks.len(),
            rule_flags: advice.links.iter().filter(|r| r.rule_based.has_issue()).count()
                + advice.images.iter().filter(|r| r.rule_based.has_issue()).count(),
            ..Default::default()
        };

        for finding in findings {
            if finding.flags_issue() {
                summary.ai_flags += 1;
            }
            if finding.is_degraded() {
                summary.degraded += 1;
            }
            if finding.vision_validation().map_or(false, |v| v.issue) {
                summary.vision_mismatches += 1;
            }
        }

        summary
    }

    /// Any rule-based or AI finding flagged an issue.
    pub fn has_issues(&self) -> bool {
        self.rule_flags > 0 || self.ai_flags > 0
    }
}

// =============================================================================
// JSON Format
// =============================================================================

/// Serialize the result as pretty-printed JSON.
pub fn render_json(result: &AnalysisResult) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(result)?)
}

/// Write the result in JSON format to stdout.
pub fn write_json(result: &AnalysisResult) -> anyhow::Result<()> {
    println!("{}", render_json(result)?);
    Ok(())
}

// =============================================================================
// Pretty Format
// =============================================================================

/// One flagged element, flattened for display.
struct Entry<'a> {
    label: String,
    finding: &'a AiFinding,
    rule: Option<RuleFinding>,
}

fn entries(result: &AnalysisResult) -> Vec<Entry<'_>> {
    let advice = &result.ai_advice;
    let mut out = Vec::new();

    for row in &advice.links {
        out.push(Entry {
            label: format!("link \"{}\" -> {}", row.link.text, row.link.href),
            finding: &row.ai_analysis,
            rule: Some(row.rule_based),
        });
    }
    for row in &advice.images {
        out.push(Entry {
            label: format!("image {}", row.image.src),
            finding: &row.ai_analysis,
            rule: Some(row.rule_based),
        });
    }
    for row in &advice.text_blocks {
        let excerpt: String = row.text_block.text.chars().take(48).collect();
        out.push(Entry {
            label: format!("text \"{}\" ({})", excerpt, row.readability.level),
            finding: &row.ai_analysis,
            rule: None,
        });
    }

    out
}

/// Write a colored summary of the result to stdout.
pub fn write_pretty(source: &str, model: &str, result: &AnalysisResult) {
    let summary = Summary::from_result(result);
    let entries = entries(result);

    // Header
    println!();
    print!("  ");
    print!("{}", "wcagaudit".cyan().bold());
    println!(" v{}", env!("CARGO_PKG_VERSION"));
    println!();

    print!("  {}", "Source: ".dimmed());
    println!("{}", source);
    print!("  {}", "Model:  ".dimmed());
    println!("{}", model);
    println!();

    write_counts(&summary);
    println!();

    let rule_flagged: Vec<&Entry> = entries
        .iter()
        .filter(|e| e.rule.map_or(false, |r| r.has_issue()))
        .collect();
    if !rule_flagged.is_empty() {
        println!("  {} ({}):", "Rule findings".bold(), rule_flagged.len());
        println!();
        for entry in rule_flagged {
            if let (Some(issue), Some(severity)) = (
                entry.rule.and_then(|r| r.issue()),
                entry.rule.and_then(|r| r.severity()),
            ) {
                write_rule_severity_tag(severity);
                print!("   {:<18}", issue.as_str().dimmed());
                println!("{}", entry.label.blue());
            }
        }
        println!();
    }

    let ai_flagged: Vec<&Entry> = entries.iter().filter(|e| e.finding.flags_issue()).collect();
    if !ai_flagged.is_empty() {
        println!("  {} ({}):", "AI findings".bold(), ai_flagged.len());
        println!();
        for entry in ai_flagged {
            let Some(assessment) = entry.finding.assessment() else {
                continue;
            };
            write_ai_severity_tag(assessment.severity);
            print!(
                "   {:<18}",
                format!("WCAG {}", assessment.wcag_criterion.as_deref().unwrap_or("?")).dimmed()
            );
            println!("{}", entry.label.blue());
            if let Some(issue) = entry.finding.issue() {
                println!("            {}", issue);
            }
            if let Some(recommendation) = entry.finding.recommendation() {
                println!("            {} {}", "fix:".dimmed(), recommendation);
            }
            println!();
        }
    }

    let vision_flagged: Vec<&Entry> = entries
        .iter()
        .filter(|e| e.finding.vision_validation().map_or(false, |v| v.issue))
        .collect();
    if !vision_flagged.is_empty() {
        println!("  {} ({}):", "Vision mismatches".bold(), vision_flagged.len());
        println!();
        for entry in vision_flagged {
            if let Some(vision) = entry.finding.vision_validation() {
                print!("    {} ", "VISN ".magenta());
                println!("  {}", entry.label.blue());
                println!("            {}", vision.reason);
            }
        }
        println!();
    }

    let degraded: Vec<&Entry> = entries.iter().filter(|e| e.finding.is_degraded()).collect();
    if !degraded.is_empty() {
        println!("  {} ({}):", "Not evaluated".bold(), degraded.len());
        println!();
        for entry in degraded {
            print!("    {} ", "SKIP ".dimmed());
            println!("  {}", entry.label);
            if let Some(error) = entry.finding.error() {
                println!("            {}", error.dimmed());
            }
        }
        println!();
    }

    write_final_status(&summary);
    println!();
}

fn write_counts(summary: &Summary) {
    let rows = [
        ("Links", summary.links_found, summary.links_evaluated),
        ("Images", summary.images_found, summary.images_evaluated),
        ("Text blocks", summary.text_blocks_found, summary.text_blocks_evaluated),
    ];
    for (name, found, evaluated) in rows {
        print!("  {:<13}", name.dimmed());
        println!("{} found, {} evaluated", found, evaluated);
    }
}

fn write_rule_severity_tag(severity: RuleSeverity) {
    match severity {
        RuleSeverity::High => print!("    {} ", "HIGH ".red()),
        RuleSeverity::Medium => print!("    {} ", "MED  ".yellow()),
        RuleSeverity::Low => print!("    {} ", "LOW  ".blue()),
    }
}

fn write_ai_severity_tag(severity: Option<AiSeverity>) {
    match severity {
        Some(AiSeverity::Critical) => print!("    {} ", "CRIT ".red().bold()),
        Some(AiSeverity::Serious) => print!("    {} ", "SERI ".red()),
        Some(AiSeverity::Moderate) => print!("    {} ", "MOD  ".yellow()),
        Some(AiSeverity::Minor) => print!("    {} ", "MIN  ".blue()),
        Some(AiSeverity::Unknown) | None => print!("    {} ", "???  ".dimmed()),
    }
}

fn write_final_status(summary: &Summary) {
    if summary.has_issues() {
        print!("  {}", "✗ ISSUES FOUND".red());
    } else {
        print!("  {}", "✓ NO ISSUES".green());
    }
    print!(
        "  {} rule, {} AI",
        summary.rule_flags, summary.ai_flags
    );
    if summary.degraded > 0 {
        print!("  {}", format!("({} not evaluated)", summary.degraded).dimmed());
    }
    println!();
}
