//! Validation of user-supplied CLI input.
//!
//! Lead ids become file names under `.leads/leads/`, so they are checked
//! before any path is built.

use anyhow::{bail, Result};

use crate::models::sales_stage::SalesStage;

/// Maximum allowed length for lead ids.
pub const MAX_ID_LENGTH: usize = 128;

/// Maximum allowed length for lead names and free-text reasons.
pub const MAX_TEXT_LENGTH: usize = 500;

/// Reserved names that cannot be used as ids (case-insensitive).
const RESERVED_NAMES: &[&str] = &[
    ".", "..", "con", "prn", "aux", "nul", "com1", "com2", "com3", "com4", "com5", "com6", "com7",
    "com8", "com9", "lpt1", "lpt2", "lpt3", "lpt4", "lpt5", "lpt6", "lpt7", "lpt8", "lpt9",
];

/// Validates that a lead id is safe for use in file paths.
///
/// ```
/// use leadengine::validation::validate_id;
///
/// assert!(validate_id("lead-001").is_ok());
/// assert!(validate_id("").is_err());
/// assert!(validate_id("../etc/passwd").is_err());
/// ```
pub fn validate_id(id: &str) -> Result<()> {
    if id.is_empty() {
        bail!("ID cannot be empty");
    }

    if id.len() > MAX_ID_LENGTH {
        bail!(
            "ID too long: {} characters (max {})",
            id.len(),
            MAX_ID_LENGTH
        );
    }

    let valid_chars = id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if !valid_chars {
        bail!("ID '{id}' contains invalid characters. Use only alphanumeric characters, dashes (-), and underscores (_)");
    }

    if RESERVED_NAMES.contains(&id.to_lowercase().as_str()) {
        bail!("ID '{id}' uses a reserved name");
    }

    Ok(())
}

/// Validates a lead name, contact or reason: not blank and not too long.
pub fn validate_text(text: &str) -> Result<()> {
    if text.trim().is_empty() {
        bail!("Text cannot be empty");
    }

    if text.len() > MAX_TEXT_LENGTH {
        bail!(
            "Text too long: {} characters (max {})",
            text.len(),
            MAX_TEXT_LENGTH
        );
    }

    Ok(())
}

/// Clap value parser for lead id arguments.
pub fn clap_id_validator(s: &str) -> Result<String, String> {
    validate_id(s).map_err(|e| e.to_string())?;
    Ok(s.to_string())
}

/// Clap value parser for names and reasons.
pub fn clap_text_validator(s: &str) -> Result<String, String> {
    validate_text(s).map_err(|e| e.to_string())?;
    Ok(s.to_string())
}

/// Clap value parser for stage arguments; accepts persisted ids and aliases.
pub fn clap_stage_parser(s: &str) -> Result<SalesStage, String> {
    s.parse::<SalesStage>().map_err(|e| {
        let known: Vec<&str> = SalesStage::ALL.iter().map(|stage| stage.alias()).collect();
        format!("{e}. Known stages: {}", known.join(", "))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_id_valid() {
        assert!(validate_id("lead-001").is_ok());
        assert!(validate_id("lead_2024").is_ok());
        assert!(validate_id("Ab12").is_ok());
    }

    #[test]
    fn test_validate_id_empty() {
        assert!(validate_id("")
            .unwrap_err()
            .to_string()
            .contains("cannot be empty"));
    }

    #[test]
    fn test_validate_id_too_long() {
        let long_id = "a".repeat(MAX_ID_LENGTH + 1);
        assert!(validate_id(&long_id)
            .unwrap_err()
            .to_string()
            .contains("too long"));
    }

    #[test]
    fn test_validate_id_invalid_chars() {
        assert!(validate_id("lead/001").is_err());
        assert!(validate_id("../passwd").is_err());
        assert!(validate_id("lead 001").is_err());
        assert!(validate_id("lead.md").is_err());
    }

    #[test]
    fn test_validate_id_reserved_names() {
        assert!(validate_id("CON").is_err());
        assert!(validate_id("nul").is_err());
    }

    #[test]
    fn test_validate_text() {
        assert!(validate_text("Maria Souza").is_ok());
        assert!(validate_text(&"a".repeat(MAX_TEXT_LENGTH)).is_ok());
        assert!(validate_text(&"a".repeat(MAX_TEXT_LENGTH + 1)).is_err());
    }

    #[test]
    fn test_validate_text_rejects_blank() {
        assert!(validate_text("")
            .unwrap_err()
            .to_string()
            .contains("cannot be empty"));
        assert!(validate_text("   \t").is_err());
        assert!(clap_text_validator("").is_err());
    }

    #[test]
    fn test_clap_stage_parser() {
        assert_eq!(clap_stage_parser("liquidacao"), Ok(SalesStage::Settlement));
        assert_eq!(clap_stage_parser("new"), Ok(SalesStage::New));

        let err = clap_stage_parser("won").unwrap_err();
        assert!(err.contains("Known stages"));
        assert!(err.contains("settlement-approved"));
    }
}
