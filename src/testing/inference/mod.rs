//! Hypothesis tests used by the enrichment methods.
//!
//! - **[`discrete`]**: hypergeometric (one-tailed Fisher exact) test on count data

pub mod discrete;

pub use discrete::hypergeometric_test;
