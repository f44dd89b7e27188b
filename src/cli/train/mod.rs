//! Train command - fit the model and write the artifacts

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, ValueEnum};
use tracing::info;

use crate::config::{AppConfig, TrainingConfig};
use crate::domain::EncodingStrategy;
use crate::infrastructure::services::{TrainingReport, TrainingService};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum EncodingArg {
    Label,
    OneHot,
}

impl From<EncodingArg> for EncodingStrategy {
    fn from(arg: EncodingArg) -> Self {
        match arg {
            EncodingArg::Label => EncodingStrategy::Label,
            EncodingArg::OneHot => EncodingStrategy::OneHot,
        }
    }
}

/// Arguments for the train command; unset flags keep the configured values
#[derive(Args, Clone, Debug, Default)]
pub struct TrainArgs {
    /// CSV dataset with a header row
    #[arg(long)]
    pub dataset: Option<PathBuf>,

    /// Target column
    #[arg(long)]
    pub target: Option<String>,

    /// Categorical encoding strategy
    #[arg(long, value_enum)]
    pub encoding: Option<EncodingArg>,

    /// Fraction of rows held out for evaluation
    #[arg(long)]
    pub test_size: Option<f64>,

    /// Seed of the train/test shuffle
    #[arg(long)]
    pub random_state: Option<u64>,

    /// Directory the artifacts are written to
    #[arg(long)]
    pub artifacts_dir: Option<PathBuf>,
}

impl TrainArgs {
    fn apply(&self, training: &mut TrainingConfig) {
        if let Some(dataset) = &self.dataset {
            training.dataset_path = dataset.clone();
        }
        if let Some(target) = &self.target {
            training.target_column = target.clone();
        }
        if let Some(encoding) = self.encoding {
            training.encoding = encoding.into();
        }
        if let Some(test_size) = self.test_size {
            training.test_size = test_size;
        }
        if let Some(random_state) = self.random_state {
            training.random_state = random_state;
        }
    }
}

/// Run the train command
pub async fn run(args: TrainArgs) -> anyhow::Result<()> {
    let config = super::load_config()?;
    super::init_logging(&config);

    let report = execute(&args, &config).await?;
    println!("{}", summary(&report));

    Ok(())
}

pub async fn execute(args: &TrainArgs, config: &AppConfig) -> anyhow::Result<TrainingReport> {
    let mut training = config.training.clone();
    args.apply(&mut training);

    let repository = super::artifact_repository(config, args.artifacts_dir.as_ref());
    let service = TrainingService::new(Arc::new(repository), training.plan());

    info!(dataset = %training.dataset_path.display(), "Training from dataset");

    Ok(service.train_from_csv(&training.dataset_path).await?)
}

fn summary(report: &TrainingReport) -> String {
    let bundle = &report.bundle;
    let schema = bundle.schema();

    let mut lines = vec![
        format!("Model trained and saved to {}", report.location),
        format!(
            "  target: {}  encoding: {}  features: {}",
            schema.target(),
            schema.encoding(),
            schema.n_features()
        ),
    ];

    if let Some(metadata) = bundle.metadata() {
        lines.push(format!(
            "  rows: {} ({} dropped for missing target)",
            metadata.n_rows, metadata.n_dropped_rows
        ));
        lines.push(format!(
            "  train: R2 {:.4}  MAE {:.3}  RMSE {:.3}",
            metadata.train_metrics.r2, metadata.train_metrics.mae, metadata.train_metrics.rmse
        ));
        lines.push(format!(
            "  test:  R2 {:.4}  MAE {:.3}  RMSE {:.3}",
            metadata.test_metrics.r2, metadata.test_metrics.mae, metadata.test_metrics.rmse
        ));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ArtifactRepository;
    use crate::infrastructure::artifact::FileArtifactRepository;
    use std::io::Write;

    #[test]
    fn test_flags_override_config() {
        let args = TrainArgs {
            dataset: Some(PathBuf::from("other.csv")),
            encoding: Some(EncodingArg::OneHot),
            random_state: Some(7),
            ..Default::default()
        };
        let mut training = TrainingConfig::default();

        args.apply(&mut training);

        assert_eq!(training.dataset_path, PathBuf::from("other.csv"));
        assert_eq!(training.encoding, EncodingStrategy::OneHot);
        assert_eq!(training.random_state, 7);
        assert_eq!(training.test_size, 0.2);
    }

    #[tokio::test]
    async fn test_execute_writes_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let dataset = dir.path().join("data.csv");
        let mut file = std::fs::File::create(&dataset).unwrap();
        writeln!(file, "Cycle_Time,Machine_Type,Parts_Per_Hour").unwrap();
        for i in 0..25 {
            let machine = ["Type_A", "Type_B", "Type_C"][i % 3];
            writeln!(file, "{},{},{}", 20 + i % 4, machine, 90 - i % 4).unwrap();
        }

        let args = TrainArgs {
            dataset: Some(dataset),
            artifacts_dir: Some(dir.path().join("artifacts")),
            encoding: Some(EncodingArg::OneHot),
            ..Default::default()
        };

        let report = execute(&args, &AppConfig::default()).await.unwrap();
        assert_eq!(report.bundle.schema().n_features(), 4);

        let text = summary(&report);
        assert!(text.contains("encoding: one_hot"));
        assert!(text.contains("test:"));

        let repository = FileArtifactRepository::new(dir.path().join("artifacts"));
        assert_eq!(repository.load().await.unwrap(), report.bundle);
    }
}
