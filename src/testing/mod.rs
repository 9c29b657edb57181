//! Statistical tests and multiple testing correction.
//!
//! ## Module Organization
//!
//! - **[`inference`]**: discrete tests for over-representation (hypergeometric)
//! - **[`correction`]**: p-value adjustment across all tests of one analysis

use single_utilities::traits::FloatOps;
use std::collections::HashMap;

pub mod correction;
pub mod inference;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alternative {
    TwoSided,
    Less,
    Greater,
}

#[derive(Debug, Clone)]
pub struct TestResult<T> {
    /// The test statistic value (e.g. -log10 p for over-representation)
    pub statistic: T,
    /// The p-value of the test
    pub p_value: T,
    /// Effect size measurement (fold enrichment for over-representation)
    pub effect_size: Option<T>,
    /// Additional test-specific information
    pub metadata: HashMap<String, T>,
}

impl<T> TestResult<T>
where
    T: FloatOps,
{
    /// Create a new test result with minimal information
    pub fn new(statistic: T, p_value: T) -> Self {
        TestResult {
            statistic,
            p_value,
            effect_size: None,
            metadata: HashMap::new(),
        }
    }

    /// Create a new test result with effect size
    pub fn with_effect_size(statistic: T, p_value: T, effect_size: T) -> Self {
        TestResult {
            statistic,
            p_value,
            effect_size: Some(effect_size),
            metadata: HashMap::new(),
        }
    }

    /// Add additional metadata
    pub fn with_metadata(mut self, key: &str, value: T) -> Self {
        self.metadata.insert(key.to_string(), value);
        self
    }

    pub fn metadata_value(&self, key: &str) -> Option<T> {
        self.metadata.get(key).copied()
    }

    /// Check if the result is statistically significant at the given threshold
    pub fn is_significant(&self, alpha: T) -> bool {
        self.p_value < alpha
    }
}

#[derive(Debug, Clone)]
pub struct MultipleTestResults<T> {
    /// Test statistics for each regulon
    pub statistics: Vec<T>,
    /// Raw (unadjusted) p-values
    pub p_values: Vec<T>,
    /// Adjusted p-values (after multiple testing correction)
    pub adjusted_p_values: Option<Vec<T>>,
    /// Global metadata about the test
    pub global_metadata: HashMap<String, String>,
}

impl<T> MultipleTestResults<T>
where
    T: FloatOps,
{
    /// Create a new results object from p-values
    pub fn new(statistics: Vec<T>, p_values: Vec<T>) -> Self {
        MultipleTestResults {
            statistics,
            p_values,
            adjusted_p_values: None,
            global_metadata: HashMap::new(),
        }
    }

    /// Add adjusted p-values to the results
    pub fn with_adjusted_p_values(mut self, adjusted_p_values: Vec<T>) -> Self {
        self.adjusted_p_values = Some(adjusted_p_values);
        self
    }

    /// Add global metadata about the test
    pub fn with_global_metadata(mut self, key: &str, value: &str) -> Self {
        self.global_metadata
            .insert(key.to_string(), value.to_string());
        self
    }

    /// Adjusted p-values when present, raw p-values otherwise
    pub fn effective_p_values(&self) -> &[T] {
        match &self.adjusted_p_values {
            Some(adj_p) => adj_p,
            None => &self.p_values,
        }
    }

    /// Get indices of significant features at the given threshold
    pub fn significant_indices(&self, alpha: T) -> Vec<usize> {
        self.effective_p_values()
            .iter()
            .enumerate()
            .filter_map(|(i, &p)| if p < alpha { Some(i) } else { None })
            .collect()
    }

    /// Get the number of significant features at the given threshold
    pub fn num_significant(&self, alpha: T) -> usize {
        self.significant_indices(alpha).len()
    }

    /// All indices ordered by ascending (adjusted) p-value, ties broken by raw p-value
    pub fn ranked_indices(&self) -> Vec<usize> {
        let p_values = self.effective_p_values();
        let mut indices: Vec<usize> = (0..p_values.len()).collect();
        indices.sort_by(|&a, &b| {
            p_values[a]
                .partial_cmp(&p_values[b])
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| {
                    self.p_values[a]
                        .partial_cmp(&self.p_values[b])
                        .unwrap_or(std::cmp::Ordering::Equal)
                })
        });
        indices
    }

    /// Get top n features by p-value
    pub fn top_features(&self, n: usize) -> Vec<usize> {
        let mut indices = self.ranked_indices();
        indices.truncate(n);
        indices
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranking_prefers_adjusted_p_values() {
        let results = MultipleTestResults::new(vec![1.0, 2.0, 3.0], vec![0.04, 0.01, 0.2])
            .with_adjusted_p_values(vec![0.06, 0.03, 0.2])
            .with_global_metadata("test_type", "hypergeometric");

        assert_eq!(results.ranked_indices(), vec![1, 0, 2]);
        assert_eq!(results.top_features(2), vec![1, 0]);
        assert_eq!(results.significant_indices(0.05), vec![1]);
        assert_eq!(results.num_significant(0.05), 1);
        assert_eq!(results.global_metadata["test_type"], "hypergeometric");
    }

    #[test]
    fn test_ties_fall_back_to_raw_p_values() {
        let results = MultipleTestResults::new(vec![0.0; 3], vec![0.03, 0.02, 0.01])
            .with_adjusted_p_values(vec![0.03, 0.03, 0.03]);
        assert_eq!(results.ranked_indices(), vec![2, 1, 0]);
    }

    #[test]
    fn test_result_significance() {
        let result = TestResult::with_effect_size(2.0, 0.01, 3.5).with_metadata("expected", 0.4);
        assert!(result.is_significant(0.05));
        assert_eq!(result.metadata_value("expected"), Some(0.4));
        assert_eq!(result.metadata_value("missing"), None);
    }
}
