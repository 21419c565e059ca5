use anyhow::Result;
use colored::Colorize;
use std::path::Path;

use crate::fs::lead_dir::{LeadDir, LEAD_DIR_NAME};

/// Create the `.leads/` data directory under `root`.
pub fn execute(root: &Path) -> Result<()> {
    let lead_dir = LeadDir::new(root);
    lead_dir.initialize()?;

    println!(
        "  {} Directory structure created {}",
        "✓".green().bold(),
        format!("{LEAD_DIR_NAME}/").dimmed()
    );
    println!(
        "  {} Default config written {}",
        "✓".green().bold(),
        lead_dir.config_path().display().to_string().dimmed()
    );

    Ok(())
}
