//! Trainer: fits the schema, scaler and regression for one dataset

use chrono::Utc;
use nalgebra::{DMatrix, DVector};
use tracing::{debug, info, warn};

use super::plan::TrainingPlan;
use crate::domain::artifact::{ModelBundle, TrainingMetadata};
use crate::domain::dataset::{parse_numeric, ColumnKind, RawTable};
use crate::domain::preprocessing::{mean_of, most_frequent, CategoryDomain, StandardScaler};
use crate::domain::regression::{
    train_test_split, FittedLinearRegression, LinearRegression, RegressionMetrics,
};
use crate::domain::schema::{
    ColumnRule, ColumnSpec, FeatureSchema, InputValue, ProjectionOptions, RawInput,
};
use crate::domain::DomainError;

/// Runs the training pipeline for a [`TrainingPlan`]
#[derive(Debug, Clone)]
pub struct Trainer {
    plan: TrainingPlan,
}

impl Trainer {
    pub fn new(plan: TrainingPlan) -> Self {
        Self { plan }
    }

    /// Fit every artifact on `table` and return the validated bundle.
    ///
    /// `dataset` is only recorded in the metadata.
    pub fn train(&self, mut table: RawTable, dataset: &str) -> Result<ModelBundle, DomainError> {
        self.plan.validate(table.headers())?;

        let target_index = table
            .column_index(&self.plan.target)
            .ok_or_else(|| DomainError::dataset("Target column disappeared"))?;

        let n_dropped_rows = table.retain_rows(|row| row[target_index].is_some());
        if n_dropped_rows > 0 {
            warn!(
                dropped = n_dropped_rows,
                target = %self.plan.target,
                "Dropped rows with a missing target value"
            );
        }

        let targets = self.parse_targets(&table, target_index)?;
        let schema = self.build_schema(&table)?;
        let features = encode_rows(&schema, &table)?;

        let scaler = StandardScaler::fit(&features)?;
        if scaler.n_features() != schema.feature_names().len() {
            return Err(DomainError::internal(format!(
                "Scaler fitted on {} features but schema lists {}",
                scaler.n_features(),
                schema.feature_names().len()
            )));
        }
        let scaled = scaler.transform(&features)?;

        let split = train_test_split(table.n_rows(), self.plan.test_size, self.plan.random_state)?;
        let (x_train, y_train) = select_rows(&scaled, &targets, &split.train);
        let (x_test, y_test) = select_rows(&scaled, &targets, &split.test);

        let model = LinearRegression::new().fit(&x_train, &y_train)?;
        let train_metrics = evaluate(&model, &x_train, &y_train)?;
        let test_metrics = evaluate(&model, &x_test, &y_test)?;

        info!(
            rows = table.n_rows(),
            features = schema.n_features(),
            encoding = %schema.encoding(),
            train_r2 = train_metrics.r2,
            test_r2 = test_metrics.r2,
            test_rmse = test_metrics.rmse,
            "Model training completed"
        );

        let metadata = TrainingMetadata {
            trained_at: Utc::now(),
            dataset: dataset.to_string(),
            n_rows: table.n_rows(),
            n_dropped_rows,
            test_size: self.plan.test_size,
            random_state: self.plan.random_state,
            schema_fingerprint: schema.fingerprint(),
            train_metrics,
            test_metrics,
        };

        ModelBundle::new(schema, scaler, model, Some(metadata))
    }

    fn parse_targets(&self, table: &RawTable, target_index: usize) -> Result<Vec<f64>, DomainError> {
        table
            .rows()
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let cell = row[target_index].as_deref().unwrap_or_default();
                parse_numeric(cell).ok_or_else(|| {
                    DomainError::dataset(format!(
                        "Target '{}' in data row {} is not numeric: '{}'",
                        self.plan.target,
                        i + 1,
                        cell
                    ))
                })
            })
            .collect()
    }

    fn build_schema(&self, table: &RawTable) -> Result<FeatureSchema, DomainError> {
        let mut columns = Vec::new();

        for name in table.headers() {
            if name == &self.plan.target || self.plan.drop_columns.contains(name) {
                continue;
            }

            let kind = self.column_kind(table, name);
            let rule = match kind {
                ColumnKind::Numeric => numeric_rule(table, name)?,
                ColumnKind::Categorical => self.categorical_rule(table, name)?,
            };

            debug!(column = %name, kind = %kind, "Column rule fitted");
            columns.push(ColumnSpec::new(name.clone(), rule));
        }

        FeatureSchema::new(self.plan.target.clone(), self.plan.encoding, columns)
    }

    fn column_kind(&self, table: &RawTable, name: &str) -> ColumnKind {
        let declared = |list: &[String]| list.iter().any(|c| c == name);

        if declared(&self.plan.numeric_columns) {
            ColumnKind::Numeric
        } else if declared(&self.plan.categorical_columns) {
            ColumnKind::Categorical
        } else {
            table
                .column(name)
                .map(ColumnKind::infer)
                .unwrap_or(ColumnKind::Categorical)
        }
    }

    fn categorical_rule(&self, table: &RawTable, name: &str) -> Result<ColumnRule, DomainError> {
        let cells: Vec<Option<&str>> = column_cells(table, name)?;

        let fill = most_frequent(cells.iter().copied()).ok_or_else(|| {
            DomainError::dataset(format!("Column '{}' has no values", name))
        })?;
        let domain = CategoryDomain::fit(cells);

        Ok(ColumnRule::categorical(self.plan.encoding, domain, fill))
    }
}

fn column_cells<'a>(table: &'a RawTable, name: &str) -> Result<Vec<Option<&'a str>>, DomainError> {
    table
        .column(name)
        .map(|cells| cells.collect())
        .ok_or_else(|| DomainError::dataset(format!("Column '{}' not found", name)))
}

fn numeric_rule(table: &RawTable, name: &str) -> Result<ColumnRule, DomainError> {
    let cells = column_cells(table, name)?;

    let values = cells
        .iter()
        .enumerate()
        .map(|(i, cell)| match cell {
            None => Ok(None),
            Some(text) => parse_numeric(text).map(Some).ok_or_else(|| {
                DomainError::dataset(format!(
                    "Column '{}' data row {} is not numeric: '{}'",
                    name,
                    i + 1,
                    text
                ))
            }),
        })
        .collect::<Result<Vec<Option<f64>>, DomainError>>()?;

    let fill_value = mean_of(&values)
        .ok_or_else(|| DomainError::dataset(format!("Column '{}' has no values", name)))?;

    let missing = values.iter().filter(|v| v.is_none()).count();
    if missing > 0 {
        debug!(column = %name, missing, fill_value, "Imputing missing values with column mean");
    }

    Ok(ColumnRule::Numeric { fill_value })
}

/// Encode every row through the schema, exactly as serving does
fn encode_rows(schema: &FeatureSchema, table: &RawTable) -> Result<DMatrix<f64>, DomainError> {
    let options = ProjectionOptions::training();
    let feature_columns: Vec<(usize, &String)> = table
        .headers()
        .iter()
        .enumerate()
        .filter(|(_, name)| schema.column(name).is_some())
        .collect();

    let mut data = Vec::with_capacity(table.n_rows() * schema.n_features());
    for row in table.rows() {
        let input: RawInput = feature_columns
            .iter()
            .filter_map(|(i, name)| {
                row[*i]
                    .as_ref()
                    .map(|cell| ((*name).clone(), InputValue::Text(cell.clone())))
            })
            .collect();

        data.extend(schema.project(&input, &options)?);
    }

    Ok(DMatrix::from_row_slice(table.n_rows(), schema.n_features(), &data))
}

fn select_rows(x: &DMatrix<f64>, y: &[f64], indices: &[usize]) -> (DMatrix<f64>, DVector<f64>) {
    let rows = DMatrix::from_fn(indices.len(), x.ncols(), |r, c| x[(indices[r], c)]);
    let targets = DVector::from_iterator(indices.len(), indices.iter().map(|&i| y[i]));
    (rows, targets)
}

fn evaluate(
    model: &FittedLinearRegression,
    x: &DMatrix<f64>,
    y: &DVector<f64>,
) -> Result<RegressionMetrics, DomainError> {
    let predictions = model.predict(x)?;
    RegressionMetrics::evaluate(y.as_slice(), predictions.as_slice())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::schema::{EncodingStrategy, MissingValuePolicy};

    const SHIFTS: [&str; 3] = ["Day", "Evening", "Night"];

    /// Parts = 100 - 1.5*cycle + 0.5*temp + shift effect, with a few gaps
    fn dataset(rows: usize) -> RawTable {
        let headers = ["Cycle_Time", "Shift", "Ambient_Temperature", "Parts_Per_Hour"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        let data = (0..rows)
            .map(|i| {
                let cycle = 20.0 + (i % 7) as f64 * 1.5;
                let temp = 18.0 + (i % 5) as f64;
                let shift = SHIFTS[i % 3];
                let shift_effect = match shift {
                    "Day" => 4.0,
                    "Evening" => 2.0,
                    _ => 0.0,
                };
                let parts = 100.0 - 1.5 * cycle + 0.5 * temp + shift_effect;

                vec![
                    if i == 3 { String::new() } else { cycle.to_string() },
                    if i == 4 { "NA".to_string() } else { shift.to_string() },
                    temp.to_string(),
                    if i == 5 { String::new() } else { parts.to_string() },
                ]
            })
            .collect();

        RawTable::from_strings(headers, data).unwrap()
    }

    #[test]
    fn test_train_label_encoding() {
        let bundle = Trainer::new(TrainingPlan::default())
            .train(dataset(60), "synthetic.csv")
            .unwrap();

        let schema = bundle.schema();
        assert_eq!(
            schema.feature_names(),
            vec!["Cycle_Time", "Shift", "Ambient_Temperature"]
        );
        assert_eq!(bundle.scaler().n_features(), schema.feature_names().len());
        assert_eq!(bundle.model().n_features(), 3);

        let metadata = bundle.metadata().unwrap();
        assert_eq!(metadata.n_dropped_rows, 1);
        assert_eq!(metadata.n_rows, 59);
        assert_eq!(metadata.test_metrics.n_samples, 12);
        assert_eq!(metadata.train_metrics.n_samples, 47);
        assert_eq!(metadata.schema_fingerprint, schema.fingerprint());
    }

    #[test]
    fn test_train_one_hot_fits_exact_relation() {
        let plan = TrainingPlan::default().with_encoding(EncodingStrategy::OneHot);
        let mut table = dataset(90);
        // keep only complete rows so the relation is exact
        table.retain_rows(|row| row.iter().all(Option::is_some));

        let bundle = Trainer::new(plan).train(table, "synthetic.csv").unwrap();

        assert_eq!(
            bundle.schema().feature_names(),
            vec![
                "Cycle_Time",
                "Shift_Day",
                "Shift_Evening",
                "Shift_Night",
                "Ambient_Temperature"
            ]
        );
        let metrics = bundle.metadata().unwrap().test_metrics;
        assert!(metrics.r2 > 0.999999, "r2 was {}", metrics.r2);

        let mut input = RawInput::new();
        input.insert("Cycle_Time".to_string(), InputValue::Number(22.0));
        input.insert("Shift".to_string(), InputValue::Text("Evening".to_string()));
        input.insert("Ambient_Temperature".to_string(), InputValue::Number(20.0));

        let prediction = bundle.predict(&input, &ProjectionOptions::default()).unwrap();
        let expected = 100.0 - 1.5 * 22.0 + 0.5 * 20.0 + 2.0;
        assert!((prediction.value - expected).abs() < 1e-6);
    }

    #[test]
    fn test_imputes_with_training_mean() {
        let bundle = Trainer::new(TrainingPlan::default())
            .train(dataset(30), "synthetic.csv")
            .unwrap();

        let ColumnRule::Numeric { fill_value } = bundle.schema().columns()[0].rule else {
            panic!("Cycle_Time should be numeric");
        };

        // rows 3 (missing cycle) and 5 (missing target) excluded from the mean
        let table = dataset(30);
        let present: Vec<f64> = table
            .rows()
            .iter()
            .filter(|row| row[3].is_some())
            .filter_map(|row| row[0].as_deref().and_then(parse_numeric))
            .collect();
        let mean = present.iter().sum::<f64>() / present.len() as f64;
        assert!((fill_value - mean).abs() < 1e-12);

        let ColumnRule::Label { fill_class, .. } = &bundle.schema().columns()[1].rule else {
            panic!("Shift should be label encoded");
        };
        assert!(SHIFTS.contains(&fill_class.as_str()));
    }

    #[test]
    fn test_training_is_reproducible() {
        let trainer = Trainer::new(TrainingPlan::default().with_split(0.25, 7));

        let first = trainer.train(dataset(50), "a.csv").unwrap();
        let second = trainer.train(dataset(50), "a.csv").unwrap();

        let bits = |b: &ModelBundle| -> Vec<u64> {
            b.model().coefficients().iter().map(|c| c.to_bits()).collect()
        };
        assert_eq!(bits(&first), bits(&second));
        assert_eq!(
            first.model().intercept().to_bits(),
            second.model().intercept().to_bits()
        );
        assert_eq!(first.scaler(), second.scaler());
        assert_eq!(first.schema().fingerprint(), second.schema().fingerprint());
    }

    #[test]
    fn test_declared_categorical_numeric_column() {
        let plan = TrainingPlan::default().with_categorical_columns(vec!["Ambient_Temperature".to_string()]);
        let bundle = Trainer::new(plan).train(dataset(40), "synthetic.csv").unwrap();

        let rule = &bundle.schema().column("Ambient_Temperature").unwrap().rule;
        assert_eq!(rule.kind(), ColumnKind::Categorical);
        assert_eq!(rule.domain().unwrap().len(), 5);
    }

    #[test]
    fn test_drop_columns() {
        let plan = TrainingPlan::default().with_drop_columns(vec!["Shift".to_string()]);
        let bundle = Trainer::new(plan).train(dataset(40), "synthetic.csv").unwrap();

        assert_eq!(
            bundle.schema().feature_names(),
            vec!["Cycle_Time", "Ambient_Temperature"]
        );
    }

    #[test]
    fn test_rejects_non_numeric_declared_column() {
        let plan = TrainingPlan::default().with_numeric_columns(vec!["Shift".to_string()]);
        let err = Trainer::new(plan).train(dataset(20), "synthetic.csv").unwrap_err();
        assert!(err.to_string().contains("Shift"));
    }

    #[test]
    fn test_rejects_non_numeric_target() {
        let headers = vec!["x".to_string(), "Parts_Per_Hour".to_string()];
        let rows = vec![
            vec!["1".to_string(), "10".to_string()],
            vec!["2".to_string(), "many".to_string()],
        ];
        let table = RawTable::from_strings(headers, rows).unwrap();

        let err = Trainer::new(TrainingPlan::default()).train(table, "t.csv").unwrap_err();
        assert!(matches!(err, DomainError::Dataset { .. }));
    }

    #[test]
    fn test_serving_reproduces_training_rows() {
        let bundle = Trainer::new(TrainingPlan::default())
            .train(dataset(30), "synthetic.csv")
            .unwrap();

        let mut input = RawInput::new();
        input.insert("Cycle_Time".to_string(), InputValue::Text("23".to_string()));
        input.insert("Shift".to_string(), InputValue::Text("Night".to_string()));
        input.insert("Ambient_Temperature".to_string(), InputValue::Number(19.0));

        let options = ProjectionOptions {
            missing_values: MissingValuePolicy::Reject,
            ..Default::default()
        };
        let prediction = bundle.predict(&input, &options).unwrap();

        assert_eq!(prediction.features, vec![23.0, 2.0, 19.0]);
    }
}
