use anyhow::{Result, anyhow};
use serde::Deserialize;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Multiple testing correction methods to control for false positives
/// when testing every regulon of a network in one analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CorrectionMethod {
    #[default]
    BenjaminiHochberg,
    BenjaminiYekutieli,
    Bonferroni,
    Holm,
}

impl CorrectionMethod {
    pub fn apply(self, p_values: &[f64]) -> Result<Vec<f64>> {
        match self {
            CorrectionMethod::BenjaminiHochberg => benjamini_hochberg_correction(p_values),
            CorrectionMethod::BenjaminiYekutieli => benjamini_yekutieli_correction(p_values),
            CorrectionMethod::Bonferroni => bonferroni_correction(p_values),
            CorrectionMethod::Holm => holm_bonferroni_correction(p_values),
        }
    }
}

impl FromStr for CorrectionMethod {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "benjamini-hochberg" | "bh" | "fdr" => Ok(CorrectionMethod::BenjaminiHochberg),
            "benjamini-yekutieli" | "by" => Ok(CorrectionMethod::BenjaminiYekutieli),
            "bonferroni" => Ok(CorrectionMethod::Bonferroni),
            "holm" => Ok(CorrectionMethod::Holm),
            _ => Err(anyhow!("Unknown correction method: {}", s)),
        }
    }
}

impl fmt::Display for CorrectionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CorrectionMethod::BenjaminiHochberg => write!(f, "benjamini-hochberg"),
            CorrectionMethod::BenjaminiYekutieli => write!(f, "benjamini-yekutieli"),
            CorrectionMethod::Bonferroni => write!(f, "bonferroni"),
            CorrectionMethod::Holm => write!(f, "holm"),
        }
    }
}

fn validate(p_values: &[f64]) -> Result<()> {
    if p_values.is_empty() {
        return Err(anyhow!("Empty p-value array"));
    }

    for (i, &p) in p_values.iter().enumerate() {
        if !(0.0..=1.0).contains(&p) {
            return Err(anyhow!("Invalid p-value at index {}: {}", i, p));
        }
    }
    Ok(())
}

/// Index-value pairs sorted by p-value in ascending order
fn sorted_ascending(p_values: &[f64]) -> Vec<(usize, f64)> {
    let mut indexed_p_values: Vec<(usize, f64)> =
        p_values.iter().enumerate().map(|(i, &p)| (i, p)).collect();
    indexed_p_values.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));
    indexed_p_values
}

/// Apply Bonferroni correction to p-values
///
/// Multiplies each p-value by the number of tests, capping at 1.0.
pub fn bonferroni_correction(p_values: &[f64]) -> Result<Vec<f64>> {
    validate(p_values)?;
    let n = p_values.len();

    let adjusted = p_values.iter().map(|&p| (p * n as f64).min(1.0)).collect();

    Ok(adjusted)
}

/// Apply Benjamini-Hochberg (BH) procedure for controlling false discovery rate
///
/// The BH procedure controls the false discovery rate (FDR), which is the expected
/// proportion of false positives among all rejected null hypotheses. Adjusted values
/// are non-decreasing in the raw p-values.
///
/// # Example
/// ```
/// use single_regulon::testing::correction::benjamini_hochberg_correction;
///
/// let p_values = vec![0.01, 0.03, 0.05];
/// let adjusted = benjamini_hochberg_correction(&p_values).unwrap();
/// assert!((adjusted[0] - 0.03).abs() < 1e-12);
/// assert!((adjusted[2] - 0.05).abs() < 1e-12);
/// ```
pub fn benjamini_hochberg_correction(p_values: &[f64]) -> Result<Vec<f64>> {
    validate(p_values)?;
    step_up(p_values, 1.0)
}

/// Apply Benjamini-Yekutieli (BY) procedure for controlling false discovery rate under dependence
///
/// A more conservative variant of BH, valid under arbitrary dependence between tests.
/// Regulons sharing targets are not independent, so this is the safer choice when
/// overlapping regulons dominate the network.
pub fn benjamini_yekutieli_correction(p_values: &[f64]) -> Result<Vec<f64>> {
    validate(p_values)?;
    let c_n: f64 = (1..=p_values.len()).map(|i| 1.0 / i as f64).sum();
    step_up(p_values, c_n)
}

/// Shared step-up pass of BH and BY, processing from largest to smallest p-value
fn step_up(p_values: &[f64], factor: f64) -> Result<Vec<f64>> {
    let n = p_values.len();
    let indexed_p_values = sorted_ascending(p_values);

    let mut adjusted_p_values = vec![0.0; n];
    let mut current_min = 1.0;

    for i in (0..n).rev() {
        let (orig_idx, p_val) = indexed_p_values[i];
        let rank = i + 1;

        let adjustment = (p_val * factor * n as f64 / rank as f64).min(1.0);
        current_min = adjustment.min(current_min);
        adjusted_p_values[orig_idx] = current_min;
    }

    Ok(adjusted_p_values)
}

/// Apply Holm-Bonferroni (step-down) method for controlling family-wise error rate
///
/// Uniformly more powerful than plain Bonferroni. Adjusted values are made
/// monotone by carrying the running maximum down the sorted list.
pub fn holm_bonferroni_correction(p_values: &[f64]) -> Result<Vec<f64>> {
    validate(p_values)?;
    let n = p_values.len();
    let indexed_p_values = sorted_ascending(p_values);

    let mut adjusted_p_values = vec![0.0; n];
    let mut current_max: f64 = 0.0;

    for (i, &(idx, p_val)) in indexed_p_values.iter().enumerate() {
        let adjusted_p = (p_val * (n - i) as f64).min(1.0);
        current_max = current_max.max(adjusted_p);
        adjusted_p_values[idx] = current_max;
    }

    Ok(adjusted_p_values)
}
