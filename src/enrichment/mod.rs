//! Gene set enrichment analysis methods for transcription factor regulons.
//!
//! Each regulon is treated as a gene set and tested against a reference gene
//! set (e.g. ageing-associated genes) within the universe of genes that any
//! regulon targets.
//!
//! ## Available Methods
//!
//! - **ORA** (`ora`): Over-Representation Analysis using hypergeometric testing
//!
//! ## Quick Example
//!
//! ```rust
//! use single_regulon::enrichment::{OraOptions, ora};
//! use single_regulon::genes::{GeneSymbol, ReferenceGeneSet};
//! use single_regulon::regulon::{ModeOfRegulation, RegulatoryEdge, RegulonSet};
//!
//! let edge = |s: &str, t: &str| RegulatoryEdge {
//!     source: GeneSymbol::new(s).unwrap(),
//!     target: GeneSymbol::new(t).unwrap(),
//!     mode_of_regulation: ModeOfRegulation::Activation,
//!     likelihood: 1.0,
//! };
//! let network = RegulonSet::from_edges(vec![edge("TFA", "GENE1"), edge("TFB", "GENE2")]);
//! let ageing = ReferenceGeneSet::from_raw("ageing", ["gene1"]);
//!
//! let records = ora(&network, &ageing, &OraOptions::default()).unwrap();
//! assert_eq!(records[0].observed, 1);
//! ```

mod ora;
pub(crate) mod utils;

pub use ora::{OraOptions, OraRecord, ora};
pub use utils::universe;
