//! Projection of raw column values onto the schema's feature vector.
//!
//! Training and serving both call [`FeatureSchema::project`], so a CSV row
//! and a form submission go through exactly the same encoding.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::entity::{ColumnRule, ColumnSpec, FeatureSchema};
use crate::domain::dataset::{is_missing_token, parse_numeric};
use crate::domain::preprocessing::CategoryDomain;
use crate::domain::DomainError;

/// A raw value for one source column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InputValue {
    Number(f64),
    Text(String),
}

impl InputValue {
    /// `None` when the value is a missing-value token
    fn present(&self) -> Option<&Self> {
        match self {
            Self::Text(text) if is_missing_token(text) => None,
            other => Some(other),
        }
    }

    fn as_category(&self) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Text(text) => text.trim().to_string(),
        }
    }
}

impl From<f64> for InputValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for InputValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for InputValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Raw values keyed by source column name
pub type RawInput = BTreeMap<String, InputValue>;

/// What to do when a schema column is absent from the input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingValuePolicy {
    /// Use the fill value learned at training time
    #[default]
    Impute,
    /// Emit 0.0 for every feature of the column
    Zero,
    /// Fail the projection
    Reject,
}

/// What to do with a categorical value outside the training domain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownCategoryPolicy {
    /// Fail the projection
    #[default]
    Reject,
    /// Use the column's fill category
    Fallback,
}

/// Policies applied while projecting one input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProjectionOptions {
    #[serde(default)]
    pub missing_values: MissingValuePolicy,
    #[serde(default)]
    pub unknown_categories: UnknownCategoryPolicy,
}

impl ProjectionOptions {
    /// Options used when encoding training rows
    pub fn training() -> Self {
        Self {
            missing_values: MissingValuePolicy::Impute,
            unknown_categories: UnknownCategoryPolicy::Reject,
        }
    }
}

impl FeatureSchema {
    /// Build the feature vector for one input.
    ///
    /// The output always has `n_features()` entries in `feature_names()`
    /// order. Keys that are not schema columns are rejected.
    pub fn project(
        &self,
        input: &RawInput,
        options: &ProjectionOptions,
    ) -> Result<Vec<f64>, DomainError> {
        if let Some(unknown) = input.keys().find(|key| self.column(key).is_none()) {
            let message = if unknown == self.target() {
                "the target column cannot be an input"
            } else {
                "not a feature column of the trained model"
            };
            return Err(DomainError::schema(unknown, message));
        }

        let mut row = Vec::with_capacity(self.n_features());
        for column in self.columns() {
            let value = input.get(&column.name).and_then(InputValue::present);
            column.encode_into(value, options, &mut row)?;
        }

        debug_assert_eq!(row.len(), self.n_features());
        Ok(row)
    }
}

impl ColumnSpec {
    fn encode_into(
        &self,
        value: Option<&InputValue>,
        options: &ProjectionOptions,
        out: &mut Vec<f64>,
    ) -> Result<(), DomainError> {
        match &self.rule {
            ColumnRule::Numeric { fill_value } => {
                let number = match value {
                    Some(value) => self.parse_number(value)?,
                    None => match options.missing_values {
                        MissingValuePolicy::Impute => *fill_value,
                        MissingValuePolicy::Zero => 0.0,
                        MissingValuePolicy::Reject => return Err(self.missing_error()),
                    },
                };
                out.push(number);
            }
            ColumnRule::Label {
                classes,
                fill_class,
            } => match self.resolve_category(value, classes, fill_class, options)? {
                Some(index) => out.push(index as f64),
                None => out.push(0.0),
            },
            ColumnRule::OneHot {
                categories,
                fill_category,
            } => {
                let index = self.resolve_category(value, categories, fill_category, options)?;
                out.extend(categories.one_hot(index));
            }
        }

        Ok(())
    }

    /// Category index to emit, or `None` for the all-zero encoding
    fn resolve_category(
        &self,
        value: Option<&InputValue>,
        domain: &CategoryDomain,
        fill: &str,
        options: &ProjectionOptions,
    ) -> Result<Option<usize>, DomainError> {
        let Some(value) = value else {
            return match options.missing_values {
                MissingValuePolicy::Impute => Ok(domain.index_of(fill)),
                MissingValuePolicy::Zero => Ok(None),
                MissingValuePolicy::Reject => Err(self.missing_error()),
            };
        };

        let category = value.as_category();
        match domain.index_of(&category) {
            Some(index) => Ok(Some(index)),
            None => match options.unknown_categories {
                UnknownCategoryPolicy::Reject => {
                    Err(DomainError::unknown_category(&self.name, category))
                }
                UnknownCategoryPolicy::Fallback => {
                    tracing::debug!(
                        column = %self.name,
                        value = %category,
                        fallback = %fill,
                        "Unknown category mapped to fallback"
                    );
                    Ok(domain.index_of(fill))
                }
            },
        }
    }

    fn parse_number(&self, value: &InputValue) -> Result<f64, DomainError> {
        match value {
            InputValue::Number(n) if n.is_finite() => Ok(*n),
            InputValue::Number(n) => Err(DomainError::schema(
                &self.name,
                format!("expected a finite number, got {}", n),
            )),
            InputValue::Text(text) => parse_numeric(text).ok_or_else(|| {
                DomainError::schema(&self.name, format!("expected a number, got '{}'", text))
            }),
        }
    }

    fn missing_error(&self) -> DomainError {
        DomainError::schema(&self.name, "value is required")
    }
}
