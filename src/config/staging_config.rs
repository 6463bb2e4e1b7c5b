use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StagingConfig {
    /// Headerless CSV manifest of model name / URL prefix rows.
    pub manifest: PathBuf,
    /// Sample file copied verbatim into the output root.
    pub sample: PathBuf,
    pub output_root: PathBuf,
    /// Artifact filenames fetched for every manifest entry.
    pub artifact_filenames: Vec<String>,
    /// Re-stage entries even when their artifacts are already present.
    pub force: bool,
}

impl Default for StagingConfig {
    fn default() -> Self {
        Self {
            manifest: PathBuf::from("models.csv"),
            sample: PathBuf::from("sample.json"),
            output_root: PathBuf::from("static"),
            artifact_filenames: vec!["model.onnx".to_string()],
            force: false,
        }
    }
}

impl StagingConfig {
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.artifact_filenames.is_empty() {
            return Err(ConfigError::Invalid(
                "at least one artifact filename is required".to_string(),
            ));
        }

        for filename in &self.artifact_filenames {
            if filename.is_empty() || filename.contains('/') || filename.contains('\\') {
                return Err(ConfigError::Invalid(format!(
                    "artifact filename '{}' must be a bare file name",
                    filename
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, StagingConfig};
    use std::path::PathBuf;

    #[test]
    fn test_staging_config_default() {
        let config = StagingConfig::default();
        assert_eq!(config.manifest, PathBuf::from("models.csv"));
        assert_eq!(config.sample, PathBuf::from("sample.json"));
        assert_eq!(config.output_root, PathBuf::from("static"));
        assert_eq!(config.artifact_filenames, vec!["model.onnx".to_string()]);
        assert!(!config.force);
    }

    #[test]
    fn test_validate_default() {
        assert!(StagingConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_empty_artifact_list() {
        let config = StagingConfig {
            artifact_filenames: vec![],
            ..StagingConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_validate_rejects_artifact_paths() {
        for bad in ["", "nested/model.onnx", "nested\\model.onnx"] {
            let config = StagingConfig {
                artifact_filenames: vec![bad.to_string()],
                ..StagingConfig::default()
            };
            assert!(config.validate().is_err(), "'{}' should be rejected", bad);
        }
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: StagingConfig = toml::from_str("output_root = \"public\"").unwrap();
        assert_eq!(config.output_root, PathBuf::from("public"));
        assert_eq!(config.manifest, PathBuf::from("models.csv"));
        assert_eq!(config.artifact_filenames, vec!["model.onnx".to_string()]);
    }

    #[test]
    fn test_full_toml() {
        let raw = r#"
            manifest = "data/models.csv"
            sample = "data/sample.json"
            output_root = "public"
            artifact_filenames = ["model.onnx", "vocab.txt"]
            force = true
        "#;
        let config: StagingConfig = toml::from_str(raw).unwrap();
        assert_eq!(config.manifest, PathBuf::from("data/models.csv"));
        assert_eq!(config.artifact_filenames.len(), 2);
        assert!(config.force);
    }
}
