use anyhow::{bail, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::Config;

pub const LEAD_DIR_NAME: &str = ".leads";

pub struct LeadDir {
    root: PathBuf,
}

impl LeadDir {
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            root: base_path.as_ref().join(LEAD_DIR_NAME),
        }
    }

    pub fn initialize(&self) -> Result<()> {
        if self.root.exists() {
            bail!("{LEAD_DIR_NAME} directory already exists");
        }

        fs::create_dir_all(self.leads_dir())
            .with_context(|| format!("Failed to create {}", self.leads_dir().display()))?;

        Config::default().save(&self.config_path())?;
        self.create_readme()?;

        Ok(())
    }

    pub fn load(&self) -> Result<()> {
        if !self.root.exists() {
            bail!("{LEAD_DIR_NAME} directory does not exist. Run 'leadengine init' first.");
        }

        let leads_dir = self.leads_dir();
        if !leads_dir.exists() {
            fs::create_dir(&leads_dir)
                .with_context(|| format!("Failed to create missing directory: {}", leads_dir.display()))?;
        }

        Ok(())
    }

    fn create_readme(&self) -> Result<()> {
        let readme_content = r#"# leadengine data directory

- `config.toml` - funnel settings
- `leads/` - one markdown file per lead (YAML frontmatter holds the record)

Stage changes must go through `leadengine lead move`, which validates them
against the sales funnel transition table.
"#;

        fs::write(self.root.join("README.md"), readme_content)
            .context("Failed to create README.md")?;

        Ok(())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn leads_dir(&self) -> PathBuf {
        self.root.join("leads")
    }

    pub fn config_path(&self) -> PathBuf {
        self.root.join("config.toml")
    }
}
