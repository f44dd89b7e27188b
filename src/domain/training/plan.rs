//! Training plan: which columns to use and how

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::domain::schema::EncodingStrategy;
use crate::domain::DomainError;

/// Default label column of the manufacturing dataset
pub const DEFAULT_TARGET: &str = "Parts_Per_Hour";

/// Column roles and split parameters for one training run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingPlan {
    pub target: String,
    /// Columns forced to numeric; others are inferred
    #[serde(default)]
    pub numeric_columns: Vec<String>,
    /// Columns forced to categorical; others are inferred
    #[serde(default)]
    pub categorical_columns: Vec<String>,
    /// Columns excluded from the features
    #[serde(default)]
    pub drop_columns: Vec<String>,
    #[serde(default)]
    pub encoding: EncodingStrategy,
    pub test_size: f64,
    pub random_state: u64,
}

impl Default for TrainingPlan {
    fn default() -> Self {
        Self {
            target: DEFAULT_TARGET.to_string(),
            numeric_columns: Vec::new(),
            categorical_columns: Vec::new(),
            drop_columns: Vec::new(),
            encoding: EncodingStrategy::Label,
            test_size: 0.2,
            random_state: 42,
        }
    }
}

impl TrainingPlan {
    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = target.into();
        self
    }

    pub fn with_encoding(mut self, encoding: EncodingStrategy) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn with_numeric_columns(mut self, columns: Vec<String>) -> Self {
        self.numeric_columns = columns;
        self
    }

    pub fn with_categorical_columns(mut self, columns: Vec<String>) -> Self {
        self.categorical_columns = columns;
        self
    }

    pub fn with_drop_columns(mut self, columns: Vec<String>) -> Self {
        self.drop_columns = columns;
        self
    }

    pub fn with_split(mut self, test_size: f64, random_state: u64) -> Self {
        self.test_size = test_size;
        self.random_state = random_state;
        self
    }

    /// Check the plan is self-consistent and only names existing columns
    pub fn validate(&self, headers: &[String]) -> Result<(), DomainError> {
        let known: HashSet<&str> = headers.iter().map(String::as_str).collect();

        if !known.contains(self.target.as_str()) {
            return Err(DomainError::dataset(format!(
                "Target column '{}' not found in dataset",
                self.target
            )));
        }

        let role_lists = [
            ("numeric_columns", &self.numeric_columns),
            ("categorical_columns", &self.categorical_columns),
            ("drop_columns", &self.drop_columns),
        ];

        for (list, columns) in role_lists {
            for column in columns {
                if !known.contains(column.as_str()) {
                    return Err(DomainError::configuration(format!(
                        "{} names unknown column '{}'",
                        list, column
                    )));
                }
                if column == &self.target {
                    return Err(DomainError::configuration(format!(
                        "{} cannot include the target column '{}'",
                        list, column
                    )));
                }
            }
        }

        let numeric: HashSet<&String> = self.numeric_columns.iter().collect();
        if let Some(both) = self
            .categorical_columns
            .iter()
            .find(|c| numeric.contains(c))
        {
            return Err(DomainError::configuration(format!(
                "Column '{}' is declared both numeric and categorical",
                both
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers() -> Vec<String> {
        ["Cycle_Time", "Shift", "Parts_Per_Hour"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn test_default_plan() {
        let plan = TrainingPlan::default();
        assert_eq!(plan.target, "Parts_Per_Hour");
        assert_eq!(plan.encoding, EncodingStrategy::Label);
        assert_eq!(plan.test_size, 0.2);
        assert_eq!(plan.random_state, 42);
        assert!(plan.validate(&headers()).is_ok());
    }

    #[test]
    fn test_missing_target() {
        let plan = TrainingPlan::default().with_target("Output");
        assert!(matches!(
            plan.validate(&headers()),
            Err(DomainError::Dataset { .. })
        ));
    }

    #[test]
    fn test_unknown_role_column() {
        let plan = TrainingPlan::default().with_drop_columns(vec!["Machine_ID".to_string()]);
        let err = plan.validate(&headers()).unwrap_err();
        assert!(err.to_string().contains("Machine_ID"));
    }

    #[test]
    fn test_conflicting_roles() {
        let plan = TrainingPlan::default()
            .with_numeric_columns(vec!["Shift".to_string()])
            .with_categorical_columns(vec!["Shift".to_string()]);
        assert!(plan.validate(&headers()).is_err());
    }

    #[test]
    fn test_target_in_role_list() {
        let plan = TrainingPlan::default().with_numeric_columns(vec!["Parts_Per_Hour".to_string()]);
        assert!(plan.validate(&headers()).is_err());
    }
}
