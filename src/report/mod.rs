//! Bar charts and flat-file exports of ranked regulon enrichment.
//!
//! - **[`chart`]**: SVG bar chart of -log10(FDR) for the top TFs of one analysis
//! - **[`export`]**: significant regulon edges and ranked tables as delimited text

pub mod chart;
pub mod export;

pub use chart::{render_bar_chart, write_bar_chart};
pub use export::{SIGNIFICANT_EDGES_FILE, write_edges, write_ranked};
