use std::path::PathBuf;

use serde::Deserialize;

use crate::domain::training::DEFAULT_TARGET;
use crate::domain::{
    EncodingStrategy, MissingValuePolicy, ProjectionOptions, TrainingPlan, UnknownCategoryPolicy,
};
use crate::infrastructure::observability::MetricsConfig;

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub training: TrainingConfig,
    #[serde(default)]
    pub artifacts: ArtifactsConfig,
    #[serde(default)]
    pub serving: ServingConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Dataset location and column roles for `train`
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    pub dataset_path: PathBuf,
    pub target_column: String,
    pub numeric_columns: Vec<String>,
    pub categorical_columns: Vec<String>,
    pub drop_columns: Vec<String>,
    pub encoding: EncodingStrategy,
    pub test_size: f64,
    pub random_state: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ArtifactsConfig {
    pub dir: PathBuf,
}

/// Projection policies applied to prediction requests
#[derive(Debug, Clone, Copy, Deserialize, Default)]
#[serde(default)]
pub struct ServingConfig {
    pub missing_values: MissingValuePolicy,
    pub unknown_categories: UnknownCategoryPolicy,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for TrainingConfig {
    fn default() -> Self {
        let plan = TrainingPlan::default();

        Self {
            dataset_path: PathBuf::from("data/manufacturing_dataset_1000_samples.csv"),
            target_column: DEFAULT_TARGET.to_string(),
            numeric_columns: plan.numeric_columns,
            categorical_columns: plan.categorical_columns,
            drop_columns: plan.drop_columns,
            encoding: plan.encoding,
            test_size: plan.test_size,
            random_state: plan.random_state,
        }
    }
}

impl TrainingConfig {
    pub fn plan(&self) -> TrainingPlan {
        TrainingPlan {
            target: self.target_column.clone(),
            numeric_columns: self.numeric_columns.clone(),
            categorical_columns: self.categorical_columns.clone(),
            drop_columns: self.drop_columns.clone(),
            encoding: self.encoding,
            test_size: self.test_size,
            random_state: self.random_state,
        }
    }
}

impl Default for ArtifactsConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("artifacts"),
        }
    }
}

impl ServingConfig {
    pub fn projection_options(&self) -> ProjectionOptions {
        ProjectionOptions {
            missing_values: self.missing_values,
            unknown_categories: self.unknown_categories,
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_with(Self::environment())
    }

    /// `APP__SECTION__KEY` variables, with comma-separated role lists
    fn environment() -> config::Environment {
        config::Environment::with_prefix("APP")
            .separator("__")
            .list_separator(",")
            .with_list_parse_key("training.numeric_columns")
            .with_list_parse_key("training.categorical_columns")
            .with_list_parse_key("training.drop_columns")
            .try_parsing(true)
    }

    fn load_with(environment: config::Environment) -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(environment)
            .build()?;

        config.try_deserialize()
    }
}
