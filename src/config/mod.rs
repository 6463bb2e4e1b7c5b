pub mod staging_config;

pub use staging_config::{ConfigError, ConfigResult, StagingConfig};
