use anyhow::{bail, Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Deserialize a record from the YAML frontmatter of a markdown document.
///
/// # Errors
///
/// Returns an error if the frontmatter is missing, unterminated, or does not
/// match `T`.
pub fn parse_from_markdown<T: DeserializeOwned>(content: &str, type_name: &str) -> Result<T> {
    let frontmatter = extract_yaml_frontmatter(content)?;
    serde_yaml::from_value(frontmatter)
        .with_context(|| format!("Failed to parse {type_name} from frontmatter"))
}

/// Render `record` as YAML frontmatter followed by a markdown `body`.
pub fn render_markdown<T: Serialize>(record: &T, type_name: &str, body: &str) -> Result<String> {
    let yaml = serde_yaml::to_string(record)
        .with_context(|| format!("Failed to serialize {type_name} to YAML"))?;

    let mut content = String::with_capacity(yaml.len() + body.len() + 16);
    content.push_str("---\n");
    content.push_str(&yaml);
    content.push_str("---\n\n");
    content.push_str(body);
    Ok(content)
}

/// Extract YAML frontmatter delimited by `---` lines.
///
/// The closing delimiter must sit at the same indentation as the opening one,
/// so an indented `---` inside a block scalar does not end the frontmatter.
///
/// # Errors
///
/// Returns an error if:
/// - Content is empty or missing opening `---`
/// - Closing `---` is not found
/// - YAML content cannot be parsed
pub fn extract_yaml_frontmatter(content: &str) -> Result<serde_yaml::Value> {
    let lines: Vec<&str> = content.lines().collect();

    if lines.is_empty() || !lines[0].trim().starts_with("---") {
        bail!("No frontmatter delimiter found at start of content");
    }

    let opening_indent = lines[0].len() - lines[0].trim_start().len();

    let end_idx = lines
        .iter()
        .enumerate()
        .skip(1)
        .find(|(_, line)| {
            let trimmed = line.trim_start();
            trimmed.starts_with("---") && line.len() - trimmed.len() == opening_indent
        })
        .map(|(idx, _)| idx)
        .ok_or_else(|| anyhow::anyhow!("Frontmatter not properly closed with ---"))?;

    let yaml_content = lines[1..end_idx].join("\n");

    serde_yaml::from_str(&yaml_content).context("Failed to parse YAML frontmatter")
}
