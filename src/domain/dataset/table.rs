//! Raw table of string cells with a header row

use std::collections::HashSet;

use super::column::is_missing_token;
use crate::domain::DomainError;

/// Header names plus rows of optional cells (`None` = missing)
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    headers: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
}

impl RawTable {
    /// Build a table, validating the header and row widths
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Option<String>>>) -> Result<Self, DomainError> {
        if headers.is_empty() {
            return Err(DomainError::dataset("Dataset has no columns"));
        }

        let mut seen = HashSet::new();
        for header in &headers {
            if header.trim().is_empty() {
                return Err(DomainError::dataset("Dataset has an empty column name"));
            }
            if !seen.insert(header.as_str()) {
                return Err(DomainError::dataset(format!(
                    "Duplicate column name '{}'",
                    header
                )));
            }
        }

        for (index, row) in rows.iter().enumerate() {
            if row.len() != headers.len() {
                return Err(DomainError::dataset(format!(
                    "Row {} has {} cells, expected {}",
                    index + 1,
                    row.len(),
                    headers.len()
                )));
            }
        }

        Ok(Self { headers, rows })
    }

    /// Build a table from raw string cells, mapping missing tokens to `None`
    pub fn from_strings(headers: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self, DomainError> {
        let rows = rows
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|cell| {
                        if is_missing_token(&cell) {
                            None
                        } else {
                            Some(cell.trim().to_string())
                        }
                    })
                    .collect()
            })
            .collect();

        Self::new(headers, rows)
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<Option<String>>] {
        &self.rows
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_columns(&self) -> usize {
        self.headers.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Cells of one column, in row order
    pub fn column(&self, name: &str) -> Option<impl Iterator<Item = Option<&str>> + '_> {
        let index = self.column_index(name)?;
        Some(self.rows.iter().map(move |row| row[index].as_deref()))
    }

    /// Keep only rows matching the predicate
    pub fn retain_rows(&mut self, mut keep: impl FnMut(&[Option<String>]) -> bool) -> usize {
        let before = self.rows.len();
        self.rows.retain(|row| keep(row));
        before - self.rows.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_from_strings_maps_missing_tokens() {
        let table = RawTable::from_strings(
            headers(&["a", "b"]),
            vec![vec!["1".into(), "".into()], vec!["NaN".into(), " x ".into()]],
        )
        .unwrap();

        let a: Vec<_> = table.column("a").unwrap().collect();
        let b: Vec<_> = table.column("b").unwrap().collect();
        assert_eq!(a, vec![Some("1"), None]);
        assert_eq!(b, vec![None, Some("x")]);
    }

    #[test]
    fn test_rejects_duplicate_headers() {
        let result = RawTable::new(headers(&["a", "a"]), vec![]);
        assert!(matches!(result, Err(DomainError::Dataset { .. })));
    }

    #[test]
    fn test_rejects_ragged_rows() {
        let result = RawTable::new(headers(&["a", "b"]), vec![vec![Some("1".into())]]);
        let err = result.unwrap_err();
        assert!(err.to_string().contains("Row 1 has 1 cells, expected 2"));
    }

    #[test]
    fn test_retain_rows_reports_dropped() {
        let mut table = RawTable::new(
            headers(&["a"]),
            vec![vec![Some("1".into())], vec![None], vec![Some("3".into())]],
        )
        .unwrap();

        let dropped = table.retain_rows(|row| row[0].is_some());
        assert_eq!(dropped, 1);
        assert_eq!(table.n_rows(), 2);
    }

    #[test]
    fn test_unknown_column() {
        let table = RawTable::new(headers(&["a"]), vec![]).unwrap();
        assert!(table.column("missing").is_none());
        assert_eq!(table.column_index("a"), Some(0));
    }
}
