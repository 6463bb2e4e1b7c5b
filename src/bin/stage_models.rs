use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use model_staging::config::{ConfigResult, StagingConfig};
use model_staging::utils::setup::StagingUtils;

#[derive(Parser, Debug)]
#[command(
    name = "stage-models",
    about = "Stages sample data and per-model artifacts for a local development server"
)]
struct Cli {
    /// TOML config file; CLI flags override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Headerless CSV manifest of model name / URL prefix rows.
    #[arg(long)]
    manifest: Option<PathBuf>,

    /// Sample file copied verbatim into the output root.
    #[arg(long)]
    sample: Option<PathBuf>,

    #[arg(long)]
    output_root: Option<PathBuf>,

    /// Artifact filename fetched for every manifest entry (repeatable).
    #[arg(long = "artifact")]
    artifacts: Vec<String>,

    /// Re-stage entries even when their artifacts are already present.
    #[arg(long)]
    force: bool,
}

fn build_config(cli: &Cli) -> ConfigResult<StagingConfig> {
    let mut config = match &cli.config {
        Some(path) => StagingConfig::from_toml_file(path)?,
        None => StagingConfig::default(),
    };

    if let Some(manifest) = &cli.manifest {
        config.manifest = manifest.clone();
    }
    if let Some(sample) = &cli.sample {
        config.sample = sample.clone();
    }
    if let Some(output_root) = &cli.output_root {
        config.output_root = output_root.clone();
    }
    if !cli.artifacts.is_empty() {
        config.artifact_filenames = cli.artifacts.clone();
    }
    if cli.force {
        config.force = true;
    }

    config.validate()?;
    Ok(config)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    init_tracing();

    let cli = Cli::parse();
    let config = match build_config(&cli) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("stage-models error: {}", err);
            std::process::exit(2);
        }
    };

    match StagingUtils::run_staging(&config).await {
        Ok(report) => {
            println!(
                "Staging finished: {} staged, {} skipped, {} failed",
                report.staged.len(),
                report.skipped.len(),
                report.failed.len()
            );

            if !report.is_success() {
                for (name, err) in &report.failed {
                    eprintln!("  {}: {}", name, err);
                }
                std::process::exit(1);
            }
        }
        Err(err) => {
            eprintln!("stage-models error: {}", err);
            std::process::exit(1);
        }
    }
}
