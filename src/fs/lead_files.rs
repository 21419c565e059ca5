//! Lead persistence in `.leads/leads/`
//!
//! Each lead is one `{id}.md` file: YAML frontmatter with the record, then a
//! short markdown summary for people browsing the directory. Stage changes are
//! read-validate-write sequences under one exclusive lock per file.

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::fs::lead_dir::LeadDir;
use crate::fs::locking::{atomic_create, locked_read, locked_update, locked_write};
use crate::models::lead::Lead;
use crate::models::sales_stage::SalesStage;
use crate::parser::frontmatter::{parse_from_markdown, render_markdown};

/// Path of the file holding lead `lead_id`.
pub fn lead_file_path(lead_dir: &LeadDir, lead_id: &str) -> Result<PathBuf> {
    crate::validation::validate_id(lead_id).context("Invalid lead ID")?;
    Ok(lead_dir.leads_dir().join(format!("{lead_id}.md")))
}

/// Store a new lead. Fails if a lead with the same id already exists.
pub fn create_lead(lead: &Lead, lead_dir: &LeadDir) -> Result<()> {
    let path = lead_file_path(lead_dir, &lead.id)?;
    if path.exists() {
        bail!("Lead '{}' already exists", lead.id);
    }

    ensure_leads_dir(lead_dir)?;
    let content = serialize_lead_to_markdown(lead)?;
    atomic_create(&path, &content).with_context(|| format!("Failed to create lead: {}", lead.id))
}

/// Write a lead, replacing any previous version.
pub fn save_lead(lead: &Lead, lead_dir: &LeadDir) -> Result<()> {
    let path = lead_file_path(lead_dir, &lead.id)?;
    ensure_leads_dir(lead_dir)?;
    let content = serialize_lead_to_markdown(lead)?;
    locked_write(&path, &content).with_context(|| format!("Failed to save lead: {}", lead.id))
}

pub fn load_lead(lead_id: &str, lead_dir: &LeadDir) -> Result<Lead> {
    let path = lead_file_path(lead_dir, lead_id)?;
    if !path.exists() {
        bail!("Lead not found: {lead_id}");
    }

    load_lead_from_path(&path)
}

/// All readable leads, sorted by id. Files that fail to parse are skipped
/// with a warning.
pub fn list_all_leads(lead_dir: &LeadDir) -> Result<Vec<Lead>> {
    let leads_dir = lead_dir.leads_dir();

    if !leads_dir.exists() {
        return Ok(Vec::new());
    }

    let entries = fs::read_dir(&leads_dir)
        .with_context(|| format!("Failed to read leads directory: {}", leads_dir.display()))?;

    let mut leads = Vec::new();
    for entry in entries {
        let path = entry?.path();

        if path.extension().and_then(|s| s.to_str()) != Some("md") {
            continue;
        }

        match load_lead_from_path(&path) {
            Ok(lead) => leads.push(lead),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %format!("{e:#}"), "skipping unreadable lead file");
            }
        }
    }

    leads.sort_by(|a, b| a.id.cmp(&b.id));
    Ok(leads)
}

/// Move a stored lead to `new_stage`, provided the transition table allows it.
///
/// The file stays locked from read to write, so two concurrent moves of the
/// same lead are applied one after the other, each validated against the
/// stage the previous one left behind. A rejected move leaves the file
/// untouched and surfaces the [`StageTransitionError`] inside the returned
/// error.
///
/// [`StageTransitionError`]: crate::models::sales_stage::StageTransitionError
pub fn transition_lead(lead_id: &str, new_stage: SalesStage, lead_dir: &LeadDir) -> Result<Lead> {
    update_lead(lead_id, lead_dir, |lead| {
        lead.try_transition(new_stage)?;
        Ok(())
    })
}

/// Set a stored lead's stage without consulting the transition table.
///
/// Refused unless `stages.allow_forced_moves` is enabled in the config.
pub fn force_lead_stage(
    lead_id: &str,
    new_stage: SalesStage,
    reason: Option<String>,
    lead_dir: &LeadDir,
    config: &Config,
) -> Result<Lead> {
    if !config.stages.allow_forced_moves {
        bail!(
            "Forced stage moves are disabled. Set `allow_forced_moves = true` under [stages] in {}",
            lead_dir.config_path().display()
        );
    }

    update_lead(lead_id, lead_dir, |lead| {
        lead.force_stage(new_stage, reason);
        Ok(())
    })
}

fn update_lead<F>(lead_id: &str, lead_dir: &LeadDir, apply: F) -> Result<Lead>
where
    F: FnOnce(&mut Lead) -> Result<()>,
{
    let path = lead_file_path(lead_dir, lead_id)?;
    if !path.exists() {
        bail!("Lead not found: {lead_id}");
    }

    locked_update(&path, |current| {
        let mut lead = parse_lead_from_markdown(current)
            .with_context(|| format!("Failed to parse lead from: {}", path.display()))?;
        let history_len = lead.history.len();

        apply(&mut lead)?;

        if lead.history.len() == history_len {
            return Ok((None, lead));
        }

        let content = serialize_lead_to_markdown(&lead)?;
        Ok((Some(content), lead))
    })
}

fn ensure_leads_dir(lead_dir: &LeadDir) -> Result<()> {
    let leads_dir = lead_dir.leads_dir();
    if !leads_dir.exists() {
        fs::create_dir_all(&leads_dir)
            .with_context(|| format!("Failed to create leads directory: {}", leads_dir.display()))?;
    }
    Ok(())
}

fn load_lead_from_path(path: &Path) -> Result<Lead> {
    let content = locked_read(path)?;
    parse_lead_from_markdown(&content)
        .with_context(|| format!("Failed to parse lead from: {}", path.display()))
}

fn parse_lead_from_markdown(content: &str) -> Result<Lead> {
    parse_from_markdown(content, "Lead")
}

fn serialize_lead_to_markdown(lead: &Lead) -> Result<String> {
    let mut body = format!("# Lead: {}\n\n", lead.name);

    if let Some(contact) = &lead.contact {
        body.push_str(&format!("**Contact**: {contact}\n\n"));
    }

    let stage = lead.stage();
    body.push_str(&format!("**Stage**: {} ({stage})\n", stage.label()));

    if !lead.history.is_empty() {
        body.push_str("\n## Stage History\n\n");
        for change in &lead.history {
            body.push_str(&format!(
                "- {}: {} -> {}",
                change.at.format("%Y-%m-%d %H:%M:%S UTC"),
                change.from.label(),
                change.to.label()
            ));
            if change.forced {
                body.push_str(" (forced");
                if let Some(reason) = &change.reason {
                    body.push_str(&format!(": {reason}"));
                }
                body.push(')');
            }
            body.push('\n');
        }
    }

    render_markdown(lead, "Lead", &body)
}
