//! Inspect command - print the saved artifacts

use std::fmt::Write;
use std::path::PathBuf;

use clap::Args;

use crate::api::types::{ModelResponse, SchemaResponse};
use crate::config::AppConfig;
use crate::domain::{ColumnRule, ModelBundle};

/// Arguments for the inspect command
#[derive(Args, Clone, Debug, Default)]
pub struct InspectArgs {
    /// Directory holding the trained artifacts
    #[arg(long)]
    pub artifacts_dir: Option<PathBuf>,

    /// Print schema and model as JSON
    #[arg(long)]
    pub json: bool,
}

/// Run the inspect command
pub async fn run(args: InspectArgs) -> anyhow::Result<()> {
    let config = super::load_config()?;
    super::init_logging(&config);

    println!("{}", execute(&args, &config).await?);

    Ok(())
}

pub async fn execute(args: &InspectArgs, config: &AppConfig) -> anyhow::Result<String> {
    let repository = super::artifact_repository(config, args.artifacts_dir.as_ref());
    let bundle = super::load_bundle(&repository).await?;

    if args.json {
        let value = serde_json::json!({
            "schema": SchemaResponse::from_bundle(&bundle, config.serving.projection_options()),
            "model": ModelResponse::from_bundle(&bundle),
        });
        Ok(serde_json::to_string_pretty(&value)?)
    } else {
        Ok(render_text(&bundle))
    }
}

fn render_text(bundle: &ModelBundle) -> String {
    let schema = bundle.schema();
    let mut out = String::new();

    let _ = writeln!(out, "Target:      {}", schema.target());
    let _ = writeln!(out, "Encoding:    {}", schema.encoding());
    let _ = writeln!(out, "Fingerprint: {}", schema.fingerprint());
    let _ = writeln!(out, "\nColumns:");

    for spec in schema.columns() {
        let rule = match &spec.rule {
            ColumnRule::Numeric { fill_value } => format!("numeric, fill {}", fill_value),
            ColumnRule::Label {
                classes,
                fill_class,
            } => format!(
                "label [{}], fill {}",
                classes.categories().join(", "),
                fill_class
            ),
            ColumnRule::OneHot {
                categories,
                fill_category,
            } => format!(
                "one_hot [{}], fill {}",
                categories.categories().join(", "),
                fill_category
            ),
        };
        let _ = writeln!(out, "  {:<28} {}", spec.name, rule);
    }

    let _ = writeln!(out, "\nFeatures (coefficient on standardized value):");
    for (i, name) in schema.feature_names().iter().enumerate() {
        let _ = writeln!(out, "  {:<28} {:>12.4}", name, bundle.model().coefficients()[i]);
    }
    let _ = writeln!(out, "  {:<28} {:>12.4}", "(intercept)", bundle.model().intercept());

    if let Some(metadata) = bundle.metadata() {
        let _ = writeln!(
            out,
            "\nTrained {} on {} ({} rows, test_size {}, random_state {})",
            metadata.trained_at.to_rfc3339(),
            metadata.dataset,
            metadata.n_rows,
            metadata.test_size,
            metadata.random_state
        );
        let _ = writeln!(
            out,
            "  train R2 {:.4}  test R2 {:.4}  test RMSE {:.3}",
            metadata.train_metrics.r2, metadata.test_metrics.r2, metadata.test_metrics.rmse
        );
    }

    out.trim_end().to_string()
}
