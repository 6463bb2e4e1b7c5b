use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

use crate::modules::manifest::ManifestEntry;
use crate::utils::downloader::{AssetDownloader, DownloadError};

pub const ASSET_INFO_FILE: &str = "asset_info.json";

#[derive(Error, Debug)]
pub enum AssetManagerError {
    #[error("Download error: {0}")]
    Download(#[from] DownloadError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Asset metadata not found at path: {0}")]
    InfoNotFound(String),
}

pub type AssetManagerResult<T> = Result<T, AssetManagerError>;

/// Metadata written next to the staged artifacts of one manifest entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetInfo {
    pub name: String,
    pub base_url: String,
    pub files: Vec<AssetFile>,
    pub staged_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetFile {
    pub filename: String,
    pub url: String,
    pub sha256: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageOutcome {
    Staged,
    Skipped,
}

pub struct AssetManager {
    output_root: PathBuf,
    downloader: AssetDownloader,
}

impl AssetManager {
    pub fn new<P: AsRef<Path>>(output_root: P, downloader: AssetDownloader) -> Self {
        Self {
            output_root: output_root.as_ref().to_path_buf(),
            downloader,
        }
    }

    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    pub fn entry_path(&self, name: &str) -> PathBuf {
        self.output_root.join(name)
    }

    /// The download plan for one entry: per-artifact URL and checksum.
    /// The manifest checksum applies to the first artifact only; extra
    /// artifact files are fetched unverified.
    pub fn asset_files(entry: &ManifestEntry, filenames: &[String]) -> Vec<AssetFile> {
        filenames
            .iter()
            .enumerate()
            .map(|(index, filename)| AssetFile {
                filename: filename.clone(),
                url: entry.artifact_url(filename),
                sha256: if index == 0 { entry.sha256.clone() } else { None },
            })
            .collect()
    }

    pub async fn assets_exist(&self, entry: &ManifestEntry, filenames: &[String]) -> bool {
        let entry_dir = self.entry_path(&entry.name);

        if !entry_dir.exists() {
            return false;
        }

        for filename in filenames {
            if !entry_dir.join(filename).exists() {
                return false;
            }
        }

        entry_dir.join(ASSET_INFO_FILE).exists()
    }

    /// Stages the entry unless its artifacts are already present.
    pub async fn ensure_entry(
        &self,
        entry: &ManifestEntry,
        filenames: &[String],
        force: bool,
    ) -> AssetManagerResult<StageOutcome> {
        if !force && self.assets_exist(entry, filenames).await {
            debug!(name = %entry.name, "assets already staged, skipping");
            return Ok(StageOutcome::Skipped);
        }

        self.stage_entry(entry, filenames).await?;
        Ok(StageOutcome::Staged)
    }

    pub async fn stage_entry(
        &self,
        entry: &ManifestEntry,
        filenames: &[String],
    ) -> AssetManagerResult<()> {
        let entry_dir = self.entry_path(&entry.name);
        tokio::fs::create_dir_all(&entry_dir).await?;

        let files = Self::asset_files(entry, filenames);
        let downloads: Vec<_> = files
            .iter()
            .map(|file| {
                (
                    file.url.clone(),
                    entry_dir.join(&file.filename),
                    file.sha256.clone(),
                )
            })
            .collect();

        self.downloader.download_files(downloads).await?;

        let info = AssetInfo {
            name: entry.name.clone(),
            base_url: entry.base_url.clone(),
            files,
            staged_at: Utc::now(),
        };
        let info_json = serde_json::to_string_pretty(&info)?;
        tokio::fs::write(entry_dir.join(ASSET_INFO_FILE), info_json).await?;

        info!(name = %entry.name, path = %entry_dir.display(), "entry staged");
        Ok(())
    }

    pub async fn load_asset_info<P: AsRef<Path>>(
        &self,
        entry_dir: P,
    ) -> AssetManagerResult<AssetInfo> {
        let info_path = entry_dir.as_ref().join(ASSET_INFO_FILE);

        if !info_path.exists() {
            return Err(AssetManagerError::InfoNotFound(
                info_path.display().to_string(),
            ));
        }

        let info_json = tokio::fs::read_to_string(info_path).await?;
        let info: AssetInfo = serde_json::from_str(&info_json)?;

        Ok(info)
    }

    pub async fn list_staged(&self) -> AssetManagerResult<Vec<AssetInfo>> {
        let mut staged = Vec::new();

        if !self.output_root.exists() {
            return Ok(staged);
        }

        let mut entries = tokio::fs::read_dir(&self.output_root).await?;

        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_dir() {
                if let Ok(info) = self.load_asset_info(entry.path()).await {
                    staged.push(info);
                }
            }
        }

        Ok(staged)
    }

    pub async fn remove_entry(&self, name: &str) -> AssetManagerResult<()> {
        let entry_dir = self.entry_path(name);

        if entry_dir.exists() {
            tokio::fs::remove_dir_all(entry_dir).await?;
            info!(name, "entry removed");
        }

        Ok(())
    }
}
