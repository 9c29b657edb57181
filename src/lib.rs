//! # single-regulon
//!
//! Transcription factor regulon enrichment for reference gene sets, part of
//! the single-rust ecosystem.
//!
//! A curated TF-target network is filtered to high-confidence edges whose
//! source is a known transcription factor. Each TF's regulon is then tested
//! for over-representation of a reference gene set (ageing genes, disease
//! genes, ...) with a one-tailed hypergeometric test. P-values are corrected
//! per reference set and TFs are ranked by FDR.
//!
//! ## Core Features
//!
//! - **Regulon network**: confidence filtering, likelihood weights and a sparse
//!   TF × target `CsrMatrix` from nalgebra-sparse
//! - **Over-Representation Analysis**: hypergeometric test per regulon within the
//!   universe of regulon targets
//! - **Multiple Testing Correction**: Benjamini-Hochberg (default),
//!   Benjamini-Yekutieli, Bonferroni and Holm
//! - **Reports**: SVG bar charts of -log10(FDR), ranked tables and significant
//!   edge exports for network viewers
//!
//! ## Quick Start
//!
//! ```rust
//! use single_regulon::analysis::{EnrichmentOptions, run_enrichment};
//! use single_regulon::genes::ReferenceGeneSet;
//! use single_regulon::regulon::{Confidence, ModeOfRegulation, RawInteraction, build_regulons};
//!
//! let raw = |tf: &str, target: &str| RawInteraction {
//!     tf: tf.to_string(),
//!     target: target.to_string(),
//!     confidence: Confidence::A,
//!     mode_of_regulation: ModeOfRegulation::Activation,
//! };
//! let interactions = vec![raw("TFA", "G1"), raw("TFA", "G2"), raw("TFB", "G3")];
//! let tfs = ReferenceGeneSet::from_raw("transcription_factors", ["TFA", "TFB"]);
//! let regulons = build_regulons(&interactions, &tfs, &Confidence::HIGH).unwrap();
//!
//! let ageing = ReferenceGeneSet::from_raw("ageing", ["G1", "G2"]);
//! let result = run_enrichment(&ageing, &regulons, &EnrichmentOptions::default()).unwrap();
//! assert_eq!(result.rows[0].tf.as_str(), "TFA");
//! ```
//!
//! ## Module Organization
//!
//! - **[`genes`]**: normalized gene symbols and reference gene sets
//! - **[`loaders`]**: delimited table readers for gene sets, the TF list and interactions
//! - **[`regulon`]**: confidence tiers, regulatory edges and the regulon network
//! - **[`enrichment`]**: over-representation analysis of regulons
//! - **[`testing`]**: hypergeometric test and multiple testing correction
//! - **[`analysis`]**: per-TF statistics, correction and ranking for one gene set
//! - **[`report`]**: charts and flat-file exports
//! - **[`config`]**, **[`pipeline`]**, **[`logging`]**: configured end-to-end runs

pub mod analysis;
pub mod config;
pub mod enrichment;
pub mod error;
pub mod genes;
pub mod loaders;
pub mod logging;
pub mod pipeline;
pub mod regulon;
pub mod report;
pub mod testing;

pub use analysis::{EnrichmentOptions, RankedResult, TfEnrichment, run_enrichment};
pub use config::AnalysisConfig;
pub use error::{AnalysisError, Result};
pub use genes::{GeneSymbol, ReferenceGeneSet};
pub use pipeline::{PipelineReport, run_pipeline};
pub use regulon::{RegulonSet, build_regulons};
