//! Error types for loading, building and testing regulons.
//!
//! Every variant carries the input (path, column, line or gene set) that
//! caused it, so a failed run can be diagnosed from the message alone.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AnalysisError>;

#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Input file missing or unreadable, or an output could not be written
    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Delimited table could not be parsed or written
    #[error("table error in '{}': {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Workbook could not be opened or its first sheet read
    #[error("spreadsheet error in '{}': {source}", path.display())]
    Spreadsheet {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },

    /// Expected column absent from the header row
    #[error("column '{column}' not found in '{}' (available: {})", path.display(), available.join(", "))]
    MissingColumn {
        path: PathBuf,
        column: String,
        available: Vec<String>,
    },

    /// Cell value outside the allowed domain (confidence tier, mode of regulation)
    #[error("malformed value '{value}' in column '{column}' of '{}' (line {line})", path.display())]
    MalformedValue {
        path: PathBuf,
        line: u64,
        column: String,
        value: String,
    },

    #[error("reference gene set '{name}' loaded from '{}' is empty", path.display())]
    EmptyReferenceSet { name: String, path: PathBuf },

    /// No interaction survived confidence and TF filtering
    #[error("regulon network is empty after filtering {total} interactions")]
    EmptyNetwork { total: usize },

    /// Reference set shares no gene with any regulon target
    #[error("gene set '{gene_set}' has no overlap with the {population} regulon targets")]
    EmptyUniverse { gene_set: String, population: usize },

    #[error("statistics error: {0}")]
    Statistics(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl AnalysisError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AnalysisError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        AnalysisError::Csv {
            path: path.into(),
            source,
        }
    }
}

impl From<anyhow::Error> for AnalysisError {
    fn from(err: anyhow::Error) -> Self {
        AnalysisError::Statistics(format!("{err:#}"))
    }
}
