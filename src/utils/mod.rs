pub mod asset_manager;
pub mod downloader;
pub mod setup;

pub use asset_manager::{
    AssetFile, AssetInfo, AssetManager, AssetManagerError, AssetManagerResult, StageOutcome,
    ASSET_INFO_FILE,
};
pub use downloader::{AssetDownloader, DownloadError, DownloadResult};
pub use setup::{SetupError, SetupResult, StagingReport, StagingUtils};
