//! Inspect the sales funnel
//! Usage: leadengine stages [list|check|next]

use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;

use crate::models::sales_stage::{allowed_transitions, assert_transition, SalesStage};

#[derive(Debug, Serialize)]
pub struct StageSummary {
    pub id: &'static str,
    pub alias: &'static str,
    pub label: &'static str,
    pub transitions: Vec<&'static str>,
}

impl StageSummary {
    pub fn of(stage: SalesStage) -> Self {
        Self {
            id: stage.as_str(),
            alias: stage.alias(),
            label: stage.label(),
            transitions: allowed_transitions(stage)
                .iter()
                .map(|target| target.as_str())
                .collect(),
        }
    }
}

/// Print every stage with its identifiers and legal targets.
pub fn list(json: bool) -> Result<()> {
    let summaries: Vec<StageSummary> = SalesStage::ALL.into_iter().map(StageSummary::of).collect();

    if json {
        let out = serde_json::to_string_pretty(&summaries).context("Failed to serialize stages")?;
        println!("{out}");
        return Ok(());
    }

    println!("{}", "Sales Funnel Stages".bold().blue());
    println!("{}", "=".repeat(50));
    for summary in &summaries {
        println!(
            "  {:<28} {:<22} {}",
            summary.label.bold(),
            summary.id,
            summary.alias.dimmed()
        );
    }
    Ok(())
}

/// Report whether `from -> to` is legal. Returns the transition error when it
/// is not, so the process exits non-zero.
pub fn check(from: SalesStage, to: SalesStage) -> Result<()> {
    match assert_transition(from, to) {
        Ok(()) => {
            println!(
                "  {} {} -> {} is allowed",
                "✓".green().bold(),
                from.label(),
                to.label()
            );
            Ok(())
        }
        Err(e) => {
            println!("  {} {}", "✗".red().bold(), e.user_message());
            Err(e.into())
        }
    }
}

/// List the stages reachable from `stage` in one move.
pub fn next(stage: SalesStage, json: bool) -> Result<()> {
    let targets = allowed_transitions(stage);

    if json {
        let ids: Vec<&str> = targets.iter().map(|t| t.as_str()).collect();
        let out = serde_json::to_string_pretty(&ids).context("Failed to serialize stages")?;
        println!("{out}");
        return Ok(());
    }

    println!("{} {}", "From".bold(), stage.label().bold().blue());
    for target in targets {
        let marker = if target == stage { " (current)" } else { "" };
        println!("  → {} {}{}", target.label(), target.as_str().dimmed(), marker.dimmed());
    }
    Ok(())
}
