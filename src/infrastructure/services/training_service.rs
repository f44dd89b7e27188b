//! Training service - dataset file to saved artifacts

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::info;

use crate::domain::{ArtifactRepository, DomainError, ModelBundle, Trainer, TrainingPlan};
use crate::infrastructure::dataset::load_csv;

/// Outcome of one training run
#[derive(Debug, Clone)]
pub struct TrainingReport {
    pub bundle: ModelBundle,
    pub location: String,
    pub elapsed: Duration,
}

/// Loads a dataset, trains a bundle and persists it
pub struct TrainingService {
    repository: Arc<dyn ArtifactRepository>,
    plan: TrainingPlan,
}

impl TrainingService {
    pub fn new(repository: Arc<dyn ArtifactRepository>, plan: TrainingPlan) -> Self {
        Self { repository, plan }
    }

    /// Train on the CSV at `dataset` and save the artifacts
    pub async fn train_from_csv(&self, dataset: &Path) -> Result<TrainingReport, DomainError> {
        let start = Instant::now();
        let path: PathBuf = dataset.to_path_buf();
        let trainer = Trainer::new(self.plan.clone());

        info!(
            dataset = %path.display(),
            target = %self.plan.target,
            encoding = %self.plan.encoding,
            "Starting training"
        );

        // CSV parsing and the SVD solve are CPU bound
        let bundle = tokio::task::spawn_blocking(move || {
            let table = load_csv(&path)?;
            trainer.train(table, &path.display().to_string())
        })
        .await
        .map_err(|e| DomainError::internal(format!("Training task failed: {}", e)))??;

        self.repository.save(&bundle).await?;

        let report = TrainingReport {
            bundle,
            location: self.repository.location(),
            elapsed: start.elapsed(),
        };

        info!(
            location = %report.location,
            elapsed_ms = report.elapsed.as_millis() as u64,
            "Training finished"
        );

        Ok(report)
    }
}
