//! Categorical domains shared by label and one-hot encoding

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Sorted, de-duplicated set of categories seen during training.
///
/// A category's label code is its index in this list, which matches a
/// label encoder fitted on the same values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct CategoryDomain(Vec<String>);

impl CategoryDomain {
    /// Fit a domain from the present values of a column
    pub fn fit<'a>(values: impl IntoIterator<Item = Option<&'a str>>) -> Self {
        let set: BTreeSet<&str> = values.into_iter().flatten().collect();
        Self(set.into_iter().map(str::to_string).collect())
    }

    /// Rebuild a domain from persisted categories, restoring sort order
    pub fn from_categories(categories: Vec<String>) -> Self {
        let set: BTreeSet<String> = categories.into_iter().collect();
        Self(set.into_iter().collect())
    }

    pub fn categories(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, value: &str) -> bool {
        self.index_of(value).is_some()
    }

    /// Label code for a category
    pub fn index_of(&self, value: &str) -> Option<usize> {
        self.0
            .binary_search_by(|candidate| candidate.as_str().cmp(value))
            .ok()
    }

    /// Indicator vector for a resolved label code; `None` gives all zeros
    pub fn one_hot(&self, index: Option<usize>) -> Vec<f64> {
        let mut row = vec![0.0; self.0.len()];
        if let Some(slot) = index.and_then(|i| row.get_mut(i)) {
            *slot = 1.0;
        }
        row
    }
}

impl From<Vec<String>> for CategoryDomain {
    fn from(categories: Vec<String>) -> Self {
        Self::from_categories(categories)
    }
}

impl From<CategoryDomain> for Vec<String> {
    fn from(domain: CategoryDomain) -> Self {
        domain.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_sorts_and_dedups() {
        let domain = CategoryDomain::fit(vec![Some("Night"), Some("Day"), None, Some("Night")]);
        assert_eq!(domain.categories(), &["Day".to_string(), "Night".to_string()]);
        assert_eq!(domain.len(), 2);
    }

    #[test]
    fn test_label_codes_follow_sort_order() {
        let domain = CategoryDomain::fit(vec![Some("Type_C"), Some("Type_A"), Some("Type_B")]);
        assert_eq!(domain.index_of("Type_A"), Some(0));
        assert_eq!(domain.index_of("Type_C"), Some(2));
        assert_eq!(domain.index_of("Type_Z"), None);
    }

    #[test]
    fn test_one_hot() {
        let domain = CategoryDomain::fit(vec![Some("a"), Some("b"), Some("c")]);
        assert_eq!(domain.one_hot(domain.index_of("b")), vec![0.0, 1.0, 0.0]);
        assert_eq!(domain.one_hot(domain.index_of("d")), vec![0.0; 3]);
        assert_eq!(domain.one_hot(Some(7)), vec![0.0; 3]);
    }

    #[test]
    fn test_from_categories_restores_order() {
        let domain = CategoryDomain::from_categories(vec!["z".into(), "a".into(), "z".into()]);
        assert_eq!(domain.categories(), &["a".to_string(), "z".to_string()]);
        assert!(domain.contains("z"));
    }

    #[test]
    fn test_deserialize_resorts_categories() {
        let domain: CategoryDomain = serde_json::from_str(r#"["b","a"]"#).unwrap();
        assert_eq!(domain.index_of("a"), Some(0));
        assert_eq!(serde_json::to_string(&domain).unwrap(), r#"["a","b"]"#);
    }
}
