//! Fill statistics for missing values

use std::collections::BTreeMap;

/// Mean of the present values, `None` when every value is missing
pub fn mean_of(values: &[Option<f64>]) -> Option<f64> {
    let present: Vec<f64> = values.iter().flatten().copied().collect();

    if present.is_empty() {
        return None;
    }

    Some(present.iter().sum::<f64>() / present.len() as f64)
}

/// Most frequent present value; ties go to the lexically smallest value
pub fn most_frequent<'a>(values: impl IntoIterator<Item = Option<&'a str>>) -> Option<String> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();

    for value in values.into_iter().flatten() {
        *counts.entry(value).or_insert(0) += 1;
    }

    // BTreeMap iterates in key order, so the first maximum wins ties
    let mut best: Option<(&str, usize)> = None;
    for (value, count) in counts {
        if best.is_none_or(|(_, c)| count > c) {
            best = Some((value, count));
        }
    }

    best.map(|(value, _)| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_ignores_missing() {
        let values = vec![Some(1.0), None, Some(3.0)];
        assert_eq!(mean_of(&values), Some(2.0));
    }

    #[test]
    fn test_mean_all_missing() {
        assert_eq!(mean_of(&[None, None]), None);
        assert_eq!(mean_of(&[]), None);
    }

    #[test]
    fn test_most_frequent() {
        let values = vec![Some("Night"), Some("Day"), None, Some("Night")];
        assert_eq!(most_frequent(values), Some("Night".to_string()));
    }

    #[test]
    fn test_most_frequent_tie_is_lexical() {
        let values = vec![Some("b"), Some("a"), Some("b"), Some("a")];
        assert_eq!(most_frequent(values), Some("a".to_string()));
    }

    #[test]
    fn test_most_frequent_all_missing() {
        assert_eq!(most_frequent(vec![None, None]), None);
    }
}
