use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use serde_json::{Map, Value};

// `---` line, a non-empty body, then the first line that is exactly `---`.
static BLOCK_PATTERN: Lazy<Regex> = Lazy::new(|| {
    RegexBuilder::new(r"\A---\r?\n(.+?)\r?\n---\r?(?:\n|\z)")
        .dot_matches_new_line(true)
        .build()
        .unwrap()
});

#[derive(Debug, thiserror::Error)]
pub(crate) enum FrontMatterError {
    #[error("no front-matter block at the top of the file")]
    Missing,
    #[error("invalid YAML: {0}")]
    Malformed(#[from] serde_yaml::Error),
    #[error("front-matter must be a mapping")]
    NotAMapping,
    #[error("front-matter cannot be represented as JSON: {0}")]
    Unrepresentable(#[from] serde_json::Error),
}

/// Returns the raw body between the delimiter lines.
pub(crate) fn extract_block(content: &str) -> Option<&str> {
    BLOCK_PATTERN
        .captures(content)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Extracts and parses the front-matter of a markdown document. An empty
/// YAML document yields an empty mapping.
pub(crate) fn parse(content: &str) -> Result<Map<String, Value>, FrontMatterError> {
    let block = extract_block(content).ok_or(FrontMatterError::Missing)?;

    match serde_yaml::from_str::<serde_yaml::Value>(block)? {
        serde_yaml::Value::Null => Ok(Map::new()),
        mapping @ serde_yaml::Value::Mapping(_) => match serde_json::to_value(mapping)? {
            Value::Object(map) => Ok(map),
            _ => Err(FrontMatterError::NotAMapping),
        },
        _ => Err(FrontMatterError::NotAMapping),
    }
}
