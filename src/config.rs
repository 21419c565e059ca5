//! Funnel settings stored in `.leads/config.toml`
//!
//! Every field has a default, so a missing file or a partial one is valid.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::models::sales_stage::SalesStage;

/// Stages a lead may be created at. Anything later in the funnel has to be
/// reached through guarded moves or a recorded forced move.
pub const INITIAL_STAGES: &[SalesStage] = &[SalesStage::New, SalesStage::Unknown];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub stages: StagesConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StagesConfig {
    /// Stage assigned to newly created leads; one of [`INITIAL_STAGES`]
    #[serde(default = "default_initial_stage")]
    pub initial_stage: SalesStage,

    /// Permit `lead move --force-unsafe`, which skips the transition table
    #[serde(default)]
    pub allow_forced_moves: bool,
}

fn default_initial_stage() -> SalesStage {
    SalesStage::New
}

impl Default for StagesConfig {
    fn default() -> Self {
        Self {
            initial_stage: default_initial_stage(),
            allow_forced_moves: false,
        }
    }
}

impl Config {
    /// Load the config at `path`, falling back to defaults if it does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).context("Invalid config.toml")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let initial = self.stages.initial_stage;
        if !INITIAL_STAGES.contains(&initial) {
            let allowed: Vec<&str> = INITIAL_STAGES.iter().map(|s| s.as_str()).collect();
            bail!(
                "stages.initial_stage = \"{initial}\" is not allowed; use one of: {}",
                allowed.join(", ")
            );
        }
        Ok(())
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        self.validate()?;
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.stages.initial_stage, SalesStage::New);
        assert!(!config.stages.allow_forced_moves);
    }

    #[test]
    fn test_config_partial_toml() {
        let config = Config::parse("[stages]\nallow_forced_moves = true\n").unwrap();
        assert!(config.stages.allow_forced_moves);
        assert_eq!(config.stages.initial_stage, SalesStage::New);
    }

    #[test]
    fn test_config_accepts_stage_alias() {
        let config = Config::parse("[stages]\ninitial_stage = \"unknown\"\n").unwrap();
        assert_eq!(config.stages.initial_stage, SalesStage::Unknown);
    }

    #[test]
    fn test_config_empty_file() {
        assert_eq!(Config::parse("").unwrap(), Config::default());
    }

    #[test]
    fn test_config_rejects_unknown_stage() {
        assert!(Config::parse("[stages]\ninitial_stage = \"won\"\n").is_err());
    }

    #[test]
    fn test_config_rejects_initial_stage_past_the_gates() {
        let err = Config::parse("[stages]\ninitial_stage = \"aprovado_liquidacao\"\n").unwrap_err();
        assert!(err.to_string().contains("not allowed"));
        assert!(Config::parse("[stages]\ninitial_stage = \"proposta\"\n").is_err());

        let mut config = Config::default();
        config.stages.initial_stage = SalesStage::Settlement;
        let temp = TempDir::new().unwrap();
        assert!(config.save(&temp.path().join("config.toml")).is_err());
    }

    #[test]
    fn test_config_missing_file_uses_defaults() {
        let temp = TempDir::new().unwrap();
        let config = Config::load(&temp.path().join("config.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_config_save_and_load() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");

        let mut config = Config::default();
        config.stages.initial_stage = SalesStage::Unknown;
        config.save(&path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("initial_stage = \"desconhecido\""));
        assert_eq!(Config::load(&path).unwrap(), config);
    }
}
