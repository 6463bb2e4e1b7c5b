use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

// Linux NAME_MAX; entry names become directory names under the output root.
const NAME_MAX_BYTES: usize = 255;

#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Manifest line {line}: expected 2 or 3 fields, found {found}")]
    FieldCount { line: usize, found: usize },

    #[error("Manifest line {line}: invalid model name '{name}': {reason}")]
    InvalidName {
        line: usize,
        name: String,
        reason: String,
    },

    #[error("Manifest line {line}: empty URL prefix for model '{name}'")]
    EmptyUrl { line: usize, name: String },

    #[error("Manifest line {line}: invalid sha256 '{value}'")]
    InvalidChecksum { line: usize, value: String },

    #[error("Manifest line {line}: duplicate model name '{name}'")]
    DuplicateName { line: usize, name: String },
}

pub type ManifestResult<T> = Result<T, ManifestError>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub name: String,
    pub base_url: String,
    pub sha256: Option<String>,
}

impl ManifestEntry {
    pub fn new(name: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into(),
            sha256: None,
        }
    }

    /// The URL prefix is taken verbatim from the manifest; artifact URLs are
    /// plain concatenation, so prefixes normally end with `/`.
    pub fn artifact_url(&self, filename: &str) -> String {
        format!("{}{}", self.base_url, filename)
    }
}

/// Parses a headerless CSV manifest: `name,url_prefix[,sha256]` per row.
/// Blank lines are skipped; anything else malformed is an error with the
/// 1-based line number.
pub fn parse_manifest_str(input: &str) -> ManifestResult<Vec<ManifestEntry>> {
    let mut entries = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    for (index, raw_line) in input.lines().enumerate() {
        let line = index + 1;
        let trimmed = raw_line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let fields: Vec<&str> = trimmed.split(',').map(str::trim).collect();
        if fields.len() < 2 || fields.len() > 3 {
            return Err(ManifestError::FieldCount {
                line,
                found: fields.len(),
            });
        }

        let name = fields[0];
        if let Err(reason) = validate_entry_name(name) {
            return Err(ManifestError::InvalidName {
                line,
                name: name.to_string(),
                reason,
            });
        }

        let base_url = fields[1];
        if base_url.is_empty() {
            return Err(ManifestError::EmptyUrl {
                line,
                name: name.to_string(),
            });
        }

        let sha256 = match fields.get(2) {
            Some(value) if !value.is_empty() => {
                if value.len() != 64 || !value.chars().all(|c| c.is_ascii_hexdigit()) {
                    return Err(ManifestError::InvalidChecksum {
                        line,
                        value: value.to_string(),
                    });
                }
                Some(value.to_ascii_lowercase())
            }
            _ => None,
        };

        if !seen.insert(name.to_string()) {
            return Err(ManifestError::DuplicateName {
                line,
                name: name.to_string(),
            });
        }

        entries.push(ManifestEntry {
            name: name.to_string(),
            base_url: base_url.to_string(),
            sha256,
        });
    }

    Ok(entries)
}

pub async fn load_manifest<P: AsRef<Path>>(path: P) -> ManifestResult<Vec<ManifestEntry>> {
    let raw = tokio::fs::read_to_string(path).await?;
    parse_manifest_str(&raw)
}

/// Entry names become directory names, so anything a filesystem would
/// mangle or that could escape the output root is rejected.
fn validate_entry_name(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("name is empty".to_string());
    }
    if name == "." || name == ".." {
        return Err("name must not be a relative path component".to_string());
    }
    if name.len() > NAME_MAX_BYTES {
        return Err(format!("name exceeds {} bytes", NAME_MAX_BYTES));
    }
    for c in name.chars() {
        if c == '/' || c == '\\' || c == '\0' || c.is_control() {
            return Err("name contains a path separator or control character".to_string());
        }
    }
    Ok(())
}
