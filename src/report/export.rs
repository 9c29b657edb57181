use std::path::Path;

use csv::WriterBuilder;
use serde::Serialize;
use tracing::info;

use crate::analysis::RankedResult;
use crate::error::{AnalysisError, Result};
use crate::loaders::infer_delimiter;
use crate::regulon::RegulatoryEdge;

/// Default file name of the significant ageing regulon edges.
pub const SIGNIFICANT_EDGES_FILE: &str = "TF_Ageing_Regulon_SigEdges.csv";

#[derive(Debug, Serialize)]
struct RankedRow<'a> {
    tf: &'a str,
    regulon_size: usize,
    hits: usize,
    expected: Option<f64>,
    fold_enrichment: Option<f64>,
    p_value: Option<f64>,
    score: Option<f64>,
    fdr: Option<f64>,
}

fn write_rows<I, R>(path: &Path, rows: I) -> Result<usize>
where
    I: IntoIterator<Item = R>,
    R: Serialize,
{
    let mut writer = WriterBuilder::new()
        .delimiter(infer_delimiter(path))
        .from_path(path)
        .map_err(|e| AnalysisError::csv(path, e))?;
    let mut count = 0;
    for row in rows {
        writer
            .serialize(row)
            .map_err(|e| AnalysisError::csv(path, e))?;
        count += 1;
    }
    writer.flush().map_err(|e| AnalysisError::io(path, e))?;
    Ok(count)
}

/// Write edges as `source, target, mode_of_regulation, likelihood` for
/// network visualization tools. The header is written even when no edge
/// is significant.
pub fn write_edges<'a, I>(path: &Path, edges: I) -> Result<usize>
where
    I: IntoIterator<Item = &'a RegulatoryEdge>,
{
    let mut edges = edges.into_iter().peekable();
    let count = if edges.peek().is_none() {
        let mut writer = WriterBuilder::new()
            .delimiter(infer_delimiter(path))
            .from_path(path)
            .map_err(|e| AnalysisError::csv(path, e))?;
        writer
            .write_record(["source", "target", "mode_of_regulation", "likelihood"])
            .map_err(|e| AnalysisError::csv(path, e))?;
        writer.flush().map_err(|e| AnalysisError::io(path, e))?;
        0
    } else {
        write_rows(path, edges)?
    };
    info!(path = %path.display(), edges = count, "Exported regulon edges");
    Ok(count)
}

/// Write the full ranked table of one analysis. Undefined values are empty cells.
pub fn write_ranked(path: &Path, result: &RankedResult) -> Result<usize> {
    let count = write_rows(
        path,
        result.rows.iter().map(|r| RankedRow {
            tf: r.tf.as_str(),
            regulon_size: r.regulon_size,
            hits: r.hits,
            expected: r.expected,
            fold_enrichment: r.fold_enrichment,
            p_value: r.p_value,
            score: r.score,
            fdr: r.fdr,
        }),
    )?;
    info!(path = %path.display(), rows = count, gene_set = %result.gene_set, "Exported ranked table");
    Ok(count)
}
