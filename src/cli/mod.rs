//! CLI module for the parts-per-hour predictor
//!
//! - `train`: fit the model on a CSV dataset and write the artifacts
//! - `serve`: web form + JSON API over the saved artifacts
//! - `predict`: one prediction from the command line
//! - `inspect`: print the saved schema, features and metrics

pub mod inspect;
pub mod predict;
pub mod serve;
pub mod train;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::domain::{ArtifactRepository, DomainError, ModelBundle};
use crate::infrastructure::artifact::FileArtifactRepository;
use crate::infrastructure::logging;

/// Parts-per-hour predictor - linear regression over machine parameters
#[derive(Parser)]
#[command(name = "parts-forecast")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Train on a CSV dataset and save the artifacts
    Train(train::TrainArgs),

    /// Serve the prediction form and JSON API
    Serve(serve::ServeArgs),

    /// Predict one row from --set and --json inputs
    Predict(predict::PredictArgs),

    /// Show the saved schema, features and metrics
    Inspect(inspect::InspectArgs),
}

/// Load `.env`, then the layered configuration.
/// Absent config files fall back to defaults; invalid values are an error.
pub(crate) fn load_config() -> anyhow::Result<AppConfig> {
    dotenvy::dotenv().ok();

    AppConfig::load().context("Invalid configuration")
}

pub(crate) fn init_logging(config: &AppConfig) {
    logging::init_logging(&config.logging);
}

pub(crate) fn artifact_repository(
    config: &AppConfig,
    dir_override: Option<&PathBuf>,
) -> FileArtifactRepository {
    FileArtifactRepository::new(dir_override.unwrap_or(&config.artifacts.dir).clone())
}

/// Load the bundle, turning missing files into an operator hint
pub(crate) async fn load_bundle(repository: &dyn ArtifactRepository) -> anyhow::Result<ModelBundle> {
    repository.load().await.map_err(|e| match e {
        DomainError::MissingArtifacts { .. } => anyhow::anyhow!(missing_artifacts_hint(
            &e,
            &repository.location()
        )),
        other => anyhow::Error::new(other),
    })
}

fn missing_artifacts_hint(err: &DomainError, location: &str) -> String {
    format!(
        "{} in '{}'. Run `parts-forecast train` first to generate them.",
        err, location
    )
}
