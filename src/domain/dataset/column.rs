//! Column classification and cell parsing

use serde::{Deserialize, Serialize};

/// Cell contents treated as missing values
pub const MISSING_TOKENS: &[&str] = &[
    "", "NA", "N/A", "n/a", "NaN", "nan", "-nan", "null", "NULL", "None", "#N/A",
];

/// Whether a raw cell denotes a missing value
pub fn is_missing_token(cell: &str) -> bool {
    MISSING_TOKENS.contains(&cell.trim())
}

/// Parse a cell as a finite number
pub fn parse_numeric(cell: &str) -> Option<f64> {
    cell.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// How a feature column is treated during encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    Numeric,
    Categorical,
}

impl ColumnKind {
    /// Infer the kind from the non-missing cells of a column.
    ///
    /// A column is numeric when every present cell parses as a finite number.
    /// Columns with no present cells are reported as numeric so the caller
    /// can reject them with a clearer "all values missing" error.
    pub fn infer<'a>(cells: impl IntoIterator<Item = Option<&'a str>>) -> Self {
        let all_numeric = cells
            .into_iter()
            .flatten()
            .all(|cell| parse_numeric(cell).is_some());

        if all_numeric {
            Self::Numeric
        } else {
            Self::Categorical
        }
    }
}

impl std::fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Numeric => write!(f, "numeric"),
            Self::Categorical => write!(f, "categorical"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_tokens() {
        assert!(is_missing_token(""));
        assert!(is_missing_token("  NaN "));
        assert!(is_missing_token("NA"));
        assert!(!is_missing_token("0"));
        assert!(!is_missing_token("Night"));
    }

    #[test]
    fn test_parse_numeric_rejects_non_finite() {
        assert_eq!(parse_numeric(" 3.5 "), Some(3.5));
        assert_eq!(parse_numeric("inf"), None);
        assert_eq!(parse_numeric("abc"), None);
    }

    #[test]
    fn test_infer_kind() {
        let numeric = vec![Some("1.0"), None, Some("2")];
        assert_eq!(ColumnKind::infer(numeric), ColumnKind::Numeric);

        let categorical = vec![Some("Day"), Some("1"), None];
        assert_eq!(ColumnKind::infer(categorical), ColumnKind::Categorical);
    }
}
