//! Front-matter parsing

use anyhow::{anyhow, Result};
use serde::{Deserialize, Deserializer};

/// Accept a string, number or boolean as a string; anything else is `None`
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_yaml::Value::deserialize(deserializer)?;
    Ok(scalar_to_string(&value))
}

/// Custom deserializer that handles both a single string and a list of strings
///
/// Non-scalar list items are dropped; a value of any other shape yields an
/// empty list.
fn string_or_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_yaml::Value::deserialize(deserializer)?;
    Ok(match &value {
        serde_yaml::Value::Sequence(items) => items.iter().filter_map(scalar_to_string).collect(),
        other => scalar_to_string(other).into_iter().collect(),
    })
}

fn scalar_to_string(value: &serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        serde_yaml::Value::Tagged(tagged) => scalar_to_string(&tagged.value),
        _ => None,
    }
}

/// Front-matter of a content file. Every field is optional; wrong-typed
/// fields come through as absent rather than failing the whole block.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct FrontMatter {
    #[serde(deserialize_with = "lenient_string")]
    pub title: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub date: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub author: Option<String>,
    #[serde(deserialize_with = "string_or_vec")]
    pub tags: Vec<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub lang: Option<String>,
}

impl FrontMatter {
    /// Parse front-matter from content string
    /// Returns (front_matter, remaining_content)
    ///
    /// Content without a `---` block (or whose block is unterminated or
    /// does not look like YAML) comes back whole with default metadata.
    /// A block that looks like YAML but fails to parse is an error.
    pub fn parse(content: &str) -> Result<(Self, &str)> {
        let content = content.trim_start_matches('\u{feff}');
        let trimmed = content.trim_start();

        if !trimmed.starts_with("---") {
            return Ok((FrontMatter::default(), content));
        }

        let rest = trimmed[3..].trim_start_matches([' ', '\t']);
        let Some(rest) = rest
            .strip_prefix("\r\n")
            .or_else(|| rest.strip_prefix('\n'))
        else {
            // `---something` on the first line is not a delimiter
            return Ok((FrontMatter::default(), content));
        };

        let (yaml_content, remaining) = match find_closing(rest) {
            Some(split) => split,
            None => return Ok((FrontMatter::default(), content)),
        };

        if yaml_content.trim().is_empty() {
            return Ok((FrontMatter::default(), remaining));
        }

        if !has_yaml_structure(yaml_content) {
            // A thematic break followed by prose, not front-matter
            return Ok((FrontMatter::default(), content));
        }

        match serde_yaml::from_str::<FrontMatter>(yaml_content) {
            Ok(fm) => Ok((fm, remaining)),
            Err(e) => Err(anyhow!("Invalid YAML front-matter: {}", e)),
        }
    }
}

/// Split at the closing `---` line: (yaml, body after the delimiter line)
fn find_closing(rest: &str) -> Option<(&str, &str)> {
    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        let bare = line.trim_end_matches(['\n', '\r']);
        if bare.trim_end() == "---" {
            let yaml = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return Some((yaml, body.trim_start_matches(['\n', '\r'])));
        }
        offset += line.len();
    }
    None
}

/// Valid front-matter has at least one `key: value` line
fn has_yaml_structure(yaml_content: &str) -> bool {
    yaml_content.lines().any(|line| {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return false;
        }
        let Some(colon_pos) = trimmed.find(':') else {
            return false;
        };
        let key = &trimmed[..colon_pos];
        let is_valid_key = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
            && !matches!(key, "http" | "https" | "ftp");
        let after_colon = &trimmed[colon_pos + 1..];
        is_valid_key && (after_colon.is_empty() || after_colon.starts_with(' '))
    })
}
