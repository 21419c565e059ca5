//! Lead management
//! Usage: leadengine lead [create|show|list|move|history]

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;

use crate::config::Config;
use crate::fs::lead_dir::LeadDir;
use crate::fs::lead_files::{
    create_lead, force_lead_stage, list_all_leads, load_lead, transition_lead,
};
use crate::models::lead::Lead;
use crate::models::sales_stage::{SalesStage, StageTransitionError};
use crate::validation::validate_text;

fn open(root: &Path) -> Result<(LeadDir, Config)> {
    let lead_dir = LeadDir::new(root);
    lead_dir.load()?;
    let config = Config::load(&lead_dir.config_path())?;
    Ok((lead_dir, config))
}

fn generate_lead_id() -> String {
    let uuid = uuid::Uuid::new_v4().simple().to_string();
    format!("lead-{}", &uuid[..8])
}

/// Create a lead at the configured initial stage.
pub fn create(root: &Path, name: String, id: Option<String>, contact: Option<String>) -> Result<Lead> {
    validate_text(&name).context("Invalid lead name")?;
    let (lead_dir, config) = open(root)?;

    let id = id.unwrap_or_else(generate_lead_id);
    let mut lead = Lead::new(id, name, config.stages.initial_stage);
    if contact.is_some() {
        lead.set_contact(contact);
    }

    create_lead(&lead, &lead_dir)?;
    tracing::info!(lead = %lead.id, stage = %lead.stage(), "created lead");

    println!(
        "  {} Created lead '{}' at {}",
        "✓".green().bold(),
        lead.id,
        lead.stage().label()
    );
    Ok(lead)
}

pub fn show(root: &Path, lead_id: &str, json: bool) -> Result<()> {
    let (lead_dir, _) = open(root)?;
    let lead = load_lead(lead_id, &lead_dir)?;

    if json {
        let out = serde_json::to_string_pretty(&lead).context("Failed to serialize lead")?;
        println!("{out}");
        return Ok(());
    }

    println!("{} {}", "Lead".bold(), lead.id.bold().blue());
    println!("  Name:     {}", lead.name);
    if let Some(contact) = &lead.contact {
        println!("  Contact:  {contact}");
    }
    println!(
        "  Stage:    {} {}",
        lead.stage().label().bold(),
        lead.stage().as_str().dimmed()
    );
    println!(
        "  Since:    {}",
        lead.stage_changed_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    println!("  Changes:  {}", lead.history.len());
    Ok(())
}

/// List leads, optionally only those currently at `stage`.
pub fn list(root: &Path, stage: Option<SalesStage>, json: bool) -> Result<Vec<Lead>> {
    let (lead_dir, _) = open(root)?;
    let leads: Vec<Lead> = list_all_leads(&lead_dir)?
        .into_iter()
        .filter(|lead| stage.is_none_or(|s| lead.stage() == s))
        .collect();

    if json {
        let out = serde_json::to_string_pretty(&leads).context("Failed to serialize leads")?;
        println!("{out}");
        return Ok(leads);
    }

    if leads.is_empty() {
        println!("{}", "No leads found".dimmed());
        return Ok(leads);
    }

    for lead in &leads {
        println!(
            "  {:<24} {:<28} {}",
            lead.id,
            lead.stage().label(),
            lead.name.dimmed()
        );
    }
    Ok(leads)
}

/// Move a lead to `stage`.
///
/// With `force_unsafe` the transition table is skipped; this needs
/// `allow_forced_moves` in the config and is meant for repairs and imports.
pub fn move_stage(
    root: &Path,
    lead_id: &str,
    stage: SalesStage,
    force_unsafe: bool,
    reason: Option<String>,
) -> Result<Lead> {
    let (lead_dir, config) = open(root)?;

    let result = if force_unsafe {
        force_lead_stage(lead_id, stage, reason, &lead_dir, &config)
    } else {
        transition_lead(lead_id, stage, &lead_dir)
    };

    let lead = result.map_err(|e| match e.downcast_ref::<StageTransitionError>() {
        Some(transition_err) => {
            let message = transition_err.user_message();
            e.context(message)
        }
        None => e,
    })?;

    println!(
        "  {} Lead '{}' is now at {}",
        "✓".green().bold(),
        lead.id,
        lead.stage().label().bold()
    );
    if force_unsafe {
        println!(
            "  {} Stage was forced outside the transition table",
            "!".yellow().bold()
        );
    }
    Ok(lead)
}

pub fn history(root: &Path, lead_id: &str) -> Result<()> {
    let (lead_dir, _) = open(root)?;
    let lead = load_lead(lead_id, &lead_dir)?;

    println!("{} {}", "Stage history for".bold(), lead.id.bold().blue());
    if lead.history.is_empty() {
        println!(
            "  {} (since {})",
            lead.stage().label(),
            lead.created_at.format("%Y-%m-%d %H:%M:%S UTC")
        );
        return Ok(());
    }

    for change in &lead.history {
        let line = format!(
            "  {}  {} → {}",
            change.at.format("%Y-%m-%d %H:%M:%S UTC"),
            change.from.label(),
            change.to.label()
        );
        if change.forced {
            let reason = change.reason.as_deref().unwrap_or("no reason given");
            println!("{} {}", line, format!("(forced: {reason})").yellow());
        } else {
            println!("{line}");
        }
    }
    Ok(())
}
