use futures_util::future::join_all;
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::StagingConfig;
use crate::modules::manifest::{self, ManifestError};
use crate::utils::asset_manager::{AssetManager, StageOutcome};
use crate::utils::downloader::{AssetDownloader, DownloadError};

#[derive(Error, Debug)]
pub enum SetupError {
    #[error("Manifest error: {0}")]
    Manifest(#[from] ManifestError),

    #[error("Download error: {0}")]
    Download(#[from] DownloadError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Sample file not found: {0}")]
    SampleNotFound(String),

    #[error("Sample path has no file name: {0}")]
    InvalidSamplePath(String),
}

pub type SetupResult<T> = Result<T, SetupError>;

/// Per-entry outcomes of one staging run. Entry failures are collected
/// here instead of aborting the run.
#[derive(Debug, Default)]
pub struct StagingReport {
    pub staged: Vec<String>,
    pub skipped: Vec<String>,
    pub failed: Vec<(String, String)>,
}

impl StagingReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

pub struct StagingUtils;

impl StagingUtils {
    /// Copies the sample file byte-for-byte into the output root, creating
    /// the root if needed. The copy keeps the source file name.
    pub async fn stage_sample_file(sample: &Path, output_root: &Path) -> SetupResult<()> {
        if !sample.exists() {
            return Err(SetupError::SampleNotFound(sample.display().to_string()));
        }

        let file_name = sample
            .file_name()
            .ok_or_else(|| SetupError::InvalidSamplePath(sample.display().to_string()))?;

        tokio::fs::create_dir_all(output_root).await?;

        let destination = output_root.join(file_name);
        tokio::fs::copy(sample, &destination).await?;

        info!(sample = %sample.display(), destination = %destination.display(), "sample file staged");
        Ok(())
    }

    /// Runs the whole staging pass: sample copy, manifest load, then one
    /// concurrent staging task per manifest entry.
    pub async fn run_staging(config: &StagingConfig) -> SetupResult<StagingReport> {
        Self::stage_sample_file(&config.sample, &config.output_root).await?;

        let entries = manifest::load_manifest(&config.manifest).await?;
        info!(
            manifest = %config.manifest.display(),
            entries = entries.len(),
            "manifest loaded"
        );

        let downloader = AssetDownloader::new()?;
        let manager = AssetManager::new(&config.output_root, downloader);

        let tasks = entries.iter().map(|entry| {
            let manager = &manager;
            async move {
                let outcome = manager
                    .ensure_entry(entry, &config.artifact_filenames, config.force)
                    .await;
                (entry.name.clone(), outcome)
            }
        });

        let mut report = StagingReport::default();
        for (name, outcome) in join_all(tasks).await {
            match outcome {
                Ok(StageOutcome::Staged) => report.staged.push(name),
                Ok(StageOutcome::Skipped) => report.skipped.push(name),
                Err(err) => {
                    warn!(name = %name, error = %err, "entry failed to stage");
                    report.failed.push((name, err.to_string()));
                }
            }
        }

        Ok(report)
    }
}
