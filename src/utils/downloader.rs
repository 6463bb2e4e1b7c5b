use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use reqwest::{Client, Response, StatusCode};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Error, Debug)]
pub enum DownloadError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Progress bar template error: {0}")]
    ProgressTemplate(#[from] indicatif::style::TemplateError),

    #[error("Checksum mismatch for {filename}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        filename: String,
        expected: String,
        actual: String,
    },

    #[error("Unexpected HTTP status {status} for {url}")]
    BadStatus { status: StatusCode, url: String },
}

pub type DownloadResult<T> = Result<T, DownloadError>;

pub struct AssetDownloader {
    client: Client,
    progress: MultiProgress,
}

impl AssetDownloader {
    pub fn new() -> DownloadResult<Self> {
        let client = Client::builder().connect_timeout(CONNECT_TIMEOUT).build()?;
        Ok(Self {
            client,
            progress: MultiProgress::new(),
        })
    }

    /// Streams `url` into `destination`, verifying the optional SHA-256.
    /// A partial or mismatching file is removed before the error is returned.
    pub async fn download_file<P: AsRef<Path>>(
        &self,
        url: &str,
        destination: P,
        expected_sha256: Option<&str>,
    ) -> DownloadResult<()> {
        let destination = destination.as_ref();

        if let Some(parent) = destination.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(DownloadError::BadStatus {
                status: response.status(),
                url: url.to_string(),
            });
        }

        let label = destination
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        let pb = self.progress.add(ProgressBar::new(response.content_length().unwrap_or(0)));
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{msg} [{wide_bar:.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec})")?
                .progress_chars("#>-"),
        );
        pb.set_message(label.clone());

        debug!(url, destination = %destination.display(), "starting download");

        match self.stream_to_file(response, destination, expected_sha256, &pb).await {
            Ok(()) => {
                pb.finish_with_message(format!("done: {}", label));
                info!(url, destination = %destination.display(), "download complete");
                Ok(())
            }
            Err(err) => {
                pb.abandon_with_message(format!("failed: {}", label));
                let _ = tokio::fs::remove_file(destination).await;
                Err(err)
            }
        }
    }

    async fn stream_to_file(
        &self,
        mut response: Response,
        destination: &Path,
        expected_sha256: Option<&str>,
        pb: &ProgressBar,
    ) -> DownloadResult<()> {
        let mut file = File::create(destination).await?;
        let mut hasher = expected_sha256.map(|_| Sha256::new());
        let mut downloaded = 0u64;

        while let Some(chunk) = response.chunk().await? {
            file.write_all(&chunk).await?;

            if let Some(ref mut hasher) = hasher {
                hasher.update(&chunk);
            }

            downloaded += chunk.len() as u64;
            pb.set_position(downloaded);
        }

        file.flush().await?;
        drop(file);

        if let (Some(expected), Some(hasher)) = (expected_sha256, hasher) {
            let actual = hex::encode(hasher.finalize());
            if actual != expected {
                return Err(DownloadError::ChecksumMismatch {
                    filename: destination
                        .file_name()
                        .unwrap_or_default()
                        .to_string_lossy()
                        .to_string(),
                    expected: expected.to_string(),
                    actual,
                });
            }
        }

        Ok(())
    }

    /// Fetches every `(url, destination, sha256)` tuple concurrently, the same
    /// way the manifest fans out one fetch per entry.
    pub async fn download_files(
        &self,
        downloads: Vec<(String, PathBuf, Option<String>)>,
    ) -> DownloadResult<()> {
        let tasks = downloads
            .iter()
            .map(|(url, dest, sha256)| self.download_file(url, dest, sha256.as_deref()));

        let results = futures_util::future::join_all(tasks).await;

        for result in results {
            result?;
        }

        Ok(())
    }
}
