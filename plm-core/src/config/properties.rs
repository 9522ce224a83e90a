//! Reader for flat `key=value` properties files.
//!
//! Blank lines and lines starting with `#` are skipped. Values may contain
//! the separator themselves, and one layer of surrounding double quotes is
//! stripped, so `password="a=b"` yields `a=b`.

use crate::error::PlmError;
use std::collections::HashMap;
use std::path::Path;

const SEPARATOR: char = '=';
const COMMENT_PREFIX: char = '#';

/// Read the file at `path` as a properties file.
///
/// Fails with a configuration error if the file cannot be read; never
/// returns a partial mapping.
pub fn load_properties(path: impl AsRef<Path>) -> Result<HashMap<String, String>, PlmError> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path).map_err(|e| {
        tracing::error!(path = %path.display(), error = %e, "Failed to read properties file");
        PlmError::ConfigError(anyhow::anyhow!(
            "cannot read properties file {}: {}",
            path.display(),
            e
        ))
    })?;

    Ok(parse_properties(&contents))
}

/// Parse properties from an in-memory string.
pub fn parse_properties(contents: &str) -> HashMap<String, String> {
    let mut props = HashMap::new();

    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with(COMMENT_PREFIX) {
            continue;
        }

        let mut segments = line.split(SEPARATOR);
        let key = segments.next().unwrap_or_default().trim().to_string();
        let value = segments.collect::<Vec<_>>().join("=");

        props.insert(key, strip_quotes(value.trim()).to_string());
    }

    props
}

fn strip_quotes(value: &str) -> &str {
    let value = value.strip_prefix('"').unwrap_or(value);
    value.strip_suffix('"').unwrap_or(value)
}
