pub mod config;
pub mod modules;
pub mod utils;

pub use config::{ConfigError, StagingConfig};
pub use modules::manifest::{ManifestEntry, ManifestError};
pub use utils::asset_manager::{AssetFile, AssetInfo, AssetManager, StageOutcome};
pub use utils::downloader::{AssetDownloader, DownloadError, DownloadResult};
pub use utils::setup::{SetupError, StagingReport, StagingUtils};
