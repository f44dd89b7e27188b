//! Predict command - one prediction from the command line

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Args;

use crate::api::types::PredictResponse;
use crate::config::AppConfig;
use crate::domain::{InputValue, RawInput};
use crate::infrastructure::services::PredictionService;

/// Arguments for the predict command
#[derive(Args, Clone, Debug, Default)]
pub struct PredictArgs {
    /// Column value as NAME=VALUE; repeatable
    #[arg(long = "set", value_name = "NAME=VALUE", value_parser = parse_key_val)]
    pub set: Vec<(String, String)>,

    /// JSON object of column values; --set entries override it
    #[arg(long)]
    pub json: Option<PathBuf>,

    /// Directory holding the trained artifacts
    #[arg(long)]
    pub artifacts_dir: Option<PathBuf>,

    /// Print the full JSON response instead of the formatted value
    #[arg(long)]
    pub output_json: bool,
}

/// Run the predict command
pub async fn run(args: PredictArgs) -> anyhow::Result<()> {
    let config = super::load_config()?;
    super::init_logging(&config);

    println!("{}", execute(&args, &config).await?);

    Ok(())
}

pub async fn execute(args: &PredictArgs, config: &AppConfig) -> anyhow::Result<String> {
    let repository = super::artifact_repository(config, args.artifacts_dir.as_ref());
    let bundle = Arc::new(super::load_bundle(&repository).await?);

    let input = build_input(args.json.as_deref(), &args.set)?;
    let service = PredictionService::new(bundle.clone(), config.serving.projection_options());
    let prediction = service.predict(&input, "cli")?;

    let response = PredictResponse::from_prediction(&prediction, &bundle);

    if args.output_json {
        Ok(serde_json::to_string_pretty(&response)?)
    } else {
        Ok(format!("{:.2} {}", response.prediction, response.unit))
    }
}

fn build_input(json: Option<&Path>, set: &[(String, String)]) -> anyhow::Result<RawInput> {
    let mut input = match json {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .map_err(|e| anyhow::anyhow!("Cannot read {}: {}", path.display(), e))?;
            serde_json::from_str::<RawInput>(&content)
                .map_err(|e| anyhow::anyhow!("{} is not a JSON object of column values: {}", path.display(), e))?
        }
        None => RawInput::new(),
    };

    for (name, value) in set {
        input.insert(name.clone(), InputValue::Text(value.clone()));
    }

    Ok(input)
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{}'", s))?;

    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing column name in '{}'", s));
    }

    Ok((key.to_string(), value.to_string()))
}
