//! Feature schema entity and per-column transform rules

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::validation::validate_column_name;
use crate::domain::dataset::ColumnKind;
use crate::domain::preprocessing::CategoryDomain;
use crate::domain::DomainError;

/// How categorical columns are turned into numbers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EncodingStrategy {
    /// One feature per column holding the category's sorted index
    #[default]
    Label,
    /// One 0/1 indicator feature per category
    OneHot,
}

impl std::fmt::Display for EncodingStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Label => write!(f, "label"),
            Self::OneHot => write!(f, "one_hot"),
        }
    }
}

/// Transform rule for one source column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColumnRule {
    Numeric {
        fill_value: f64,
    },
    Label {
        classes: CategoryDomain,
        fill_class: String,
    },
    OneHot {
        categories: CategoryDomain,
        fill_category: String,
    },
}

impl ColumnRule {
    /// Build the categorical rule matching an encoding strategy
    pub fn categorical(
        encoding: EncodingStrategy,
        domain: CategoryDomain,
        fill: String,
    ) -> Self {
        match encoding {
            EncodingStrategy::Label => Self::Label {
                classes: domain,
                fill_class: fill,
            },
            EncodingStrategy::OneHot => Self::OneHot {
                categories: domain,
                fill_category: fill,
            },
        }
    }

    pub fn kind(&self) -> ColumnKind {
        match self {
            Self::Numeric { .. } => ColumnKind::Numeric,
            Self::Label { .. } | Self::OneHot { .. } => ColumnKind::Categorical,
        }
    }

    /// Categorical domain, if any
    pub fn domain(&self) -> Option<&CategoryDomain> {
        match self {
            Self::Numeric { .. } => None,
            Self::Label { classes, .. } => Some(classes),
            Self::OneHot { categories, .. } => Some(categories),
        }
    }

    /// Number of output features this rule produces
    pub fn width(&self) -> usize {
        match self {
            Self::Numeric { .. } | Self::Label { .. } => 1,
            Self::OneHot { categories, .. } => categories.len(),
        }
    }
}

/// A source column and its transform rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub name: String,
    pub rule: ColumnRule,
}

impl ColumnSpec {
    pub fn new(name: impl Into<String>, rule: ColumnRule) -> Self {
        Self {
            name: name.into(),
            rule,
        }
    }

    /// Output feature names, in order
    pub fn feature_names(&self) -> Vec<String> {
        match &self.rule {
            ColumnRule::Numeric { .. } | ColumnRule::Label { .. } => vec![self.name.clone()],
            ColumnRule::OneHot { categories, .. } => categories
                .categories()
                .iter()
                .map(|c| format!("{}_{}", self.name, c))
                .collect(),
        }
    }

    fn validate(&self, encoding: EncodingStrategy) -> Result<(), DomainError> {
        validate_column_name(&self.name)
            .map_err(|e| DomainError::schema(&self.name, e.to_string()))?;

        match &self.rule {
            ColumnRule::Numeric { fill_value } => {
                if !fill_value.is_finite() {
                    return Err(DomainError::schema(&self.name, "fill value is not finite"));
                }
            }
            ColumnRule::Label { classes: domain, fill_class: fill }
            | ColumnRule::OneHot { categories: domain, fill_category: fill } => {
                let expected = matches!(
                    (&self.rule, encoding),
                    (ColumnRule::Label { .. }, EncodingStrategy::Label)
                        | (ColumnRule::OneHot { .. }, EncodingStrategy::OneHot)
                );
                if !expected {
                    return Err(DomainError::schema(
                        &self.name,
                        format!("rule does not match the schema's {} encoding", encoding),
                    ));
                }
                if domain.is_empty() {
                    return Err(DomainError::schema(&self.name, "category domain is empty"));
                }
                if !domain.contains(fill) {
                    return Err(DomainError::schema(
                        &self.name,
                        format!("fill category '{}' is not in the domain", fill),
                    ));
                }
            }
        }

        Ok(())
    }
}

/// Ordered feature columns fixed at training time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSchema {
    target: String,
    encoding: EncodingStrategy,
    columns: Vec<ColumnSpec>,
}

#[derive(Serialize)]
struct FingerprintView<'a> {
    target: &'a str,
    encoding: EncodingStrategy,
    columns: &'a [ColumnSpec],
}

impl FeatureSchema {
    /// Create a schema after validation
    pub fn new(
        target: impl Into<String>,
        encoding: EncodingStrategy,
        columns: Vec<ColumnSpec>,
    ) -> Result<Self, DomainError> {
        let schema = Self {
            target: target.into(),
            encoding,
            columns,
        };
        schema.validate()?;
        Ok(schema)
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn encoding(&self) -> EncodingStrategy {
        self.encoding
    }

    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&ColumnSpec> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Ordered output feature names
    pub fn feature_names(&self) -> Vec<String> {
        self.columns.iter().flat_map(ColumnSpec::feature_names).collect()
    }

    pub fn n_features(&self) -> usize {
        self.columns.iter().map(|c| c.rule.width()).sum()
    }

    /// SHA-256 over the canonical JSON of target, encoding and columns
    pub fn fingerprint(&self) -> String {
        let view = FingerprintView {
            target: &self.target,
            encoding: self.encoding,
            columns: &self.columns,
        };
        // Serialising plain data with string keys cannot fail
        let bytes = serde_json::to_vec(&view).unwrap_or_default();
        hex::encode(Sha256::digest(&bytes))
    }

    /// Check names, rules and output uniqueness
    pub fn validate(&self) -> Result<(), DomainError> {
        validate_column_name(&self.target)
            .map_err(|e| DomainError::schema(&self.target, e.to_string()))?;

        if self.columns.is_empty() {
            return Err(DomainError::validation("Schema has no feature columns"));
        }

        let mut names = HashSet::new();
        for column in &self.columns {
            if column.name == self.target {
                return Err(DomainError::schema(
                    &column.name,
                    "target column cannot be a feature",
                ));
            }
            if !names.insert(column.name.as_str()) {
                return Err(DomainError::schema(&column.name, "duplicate column"));
            }
            column.validate(self.encoding)?;
        }

        let mut features = HashSet::new();
        for feature in self.feature_names() {
            if !features.insert(feature.clone()) {
                return Err(DomainError::schema(
                    feature,
                    "output feature name is produced twice",
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shift_domain() -> CategoryDomain {
        CategoryDomain::fit(vec![Some("Day"), Some("Night"), Some("Evening")])
    }

    fn label_schema() -> FeatureSchema {
        FeatureSchema::new(
            "Parts_Per_Hour",
            EncodingStrategy::Label,
            vec![
                ColumnSpec::new("Injection_Temperature", ColumnRule::Numeric { fill_value: 215.0 }),
                ColumnSpec::new(
                    "Shift",
                    ColumnRule::categorical(EncodingStrategy::Label, shift_domain(), "Day".into()),
                ),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_label_feature_names() {
        let schema = label_schema();
        assert_eq!(schema.feature_names(), vec!["Injection_Temperature", "Shift"]);
        assert_eq!(schema.n_features(), 2);
    }

    #[test]
    fn test_one_hot_feature_names() {
        let schema = FeatureSchema::new(
            "Parts_Per_Hour",
            EncodingStrategy::OneHot,
            vec![
                ColumnSpec::new("Cycle_Time", ColumnRule::Numeric { fill_value: 30.0 }),
                ColumnSpec::new(
                    "Shift",
                    ColumnRule::categorical(EncodingStrategy::OneHot, shift_domain(), "Day".into()),
                ),
            ],
        )
        .unwrap();

        assert_eq!(
            schema.feature_names(),
            vec!["Cycle_Time", "Shift_Day", "Shift_Evening", "Shift_Night"]
        );
        assert_eq!(schema.n_features(), 4);
    }

    #[test]
    fn test_rejects_target_as_feature() {
        let result = FeatureSchema::new(
            "Parts_Per_Hour",
            EncodingStrategy::Label,
            vec![ColumnSpec::new("Parts_Per_Hour", ColumnRule::Numeric { fill_value: 1.0 })],
        );
        assert!(matches!(result, Err(DomainError::Schema { .. })));
    }

    #[test]
    fn test_rejects_mixed_encoding() {
        let result = FeatureSchema::new(
            "y",
            EncodingStrategy::Label,
            vec![ColumnSpec::new(
                "Shift",
                ColumnRule::categorical(EncodingStrategy::OneHot, shift_domain(), "Day".into()),
            )],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_fill_outside_domain() {
        let result = FeatureSchema::new(
            "y",
            EncodingStrategy::Label,
            vec![ColumnSpec::new(
                "Shift",
                ColumnRule::categorical(EncodingStrategy::Label, shift_domain(), "Weekend".into()),
            )],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_colliding_one_hot_names() {
        let result = FeatureSchema::new(
            "y",
            EncodingStrategy::OneHot,
            vec![
                ColumnSpec::new("Shift_Day", ColumnRule::Numeric { fill_value: 0.0 }),
                ColumnSpec::new(
                    "Shift",
                    ColumnRule::categorical(EncodingStrategy::OneHot, shift_domain(), "Day".into()),
                ),
            ],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_fingerprint_is_stable_and_sensitive() {
        let a = label_schema();
        let b = label_schema();
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_eq!(a.fingerprint().len(), 64);

        let c = FeatureSchema::new(
            "Parts_Per_Hour",
            EncodingStrategy::Label,
            vec![
                ColumnSpec::new(
                    "Shift",
                    ColumnRule::categorical(EncodingStrategy::Label, shift_domain(), "Day".into()),
                ),
                ColumnSpec::new("Injection_Temperature", ColumnRule::Numeric { fill_value: 215.0 }),
            ],
        )
        .unwrap();
        // same columns, different order
        assert_ne!(a.fingerprint(), c.fingerprint());
    }

    #[test]
    fn test_serde_round_trip_keeps_rules() {
        let schema = label_schema();
        let json = serde_json::to_string(&schema).unwrap();
        assert!(json.contains("\"kind\":\"label\""));
        assert!(json.contains("\"fill_value\":215.0"));

        let restored: FeatureSchema = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, schema);
        assert_eq!(restored.fingerprint(), schema.fingerprint());
    }
}
