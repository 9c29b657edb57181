//! End-to-end run: load inputs, build regulons, run one enrichment per
//! reference gene set and write the reports.

use std::path::PathBuf;

use tracing::{info, instrument, warn};

use crate::analysis::{RankedResult, run_enrichment};
use crate::config::{AnalysisConfig, GeneSetConfig, delimiter_byte};
use crate::error::{AnalysisError, Result};
use crate::loaders::{load_gene_set, load_interactions, load_tf_set};
use crate::regulon::{RegulonSet, build_regulons};
use crate::report::{write_bar_chart, write_edges, write_ranked};

/// Outcome of one gene set analysis and the files written for it.
#[derive(Debug, Clone)]
pub struct GeneSetReport {
    pub result: RankedResult,
    pub significant_tfs: usize,
    pub chart: Option<PathBuf>,
    pub ranked_table: Option<PathBuf>,
    /// Path and edge count of the significant edge export
    pub edges: Option<(PathBuf, usize)>,
}

#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub regulons: RegulonSet,
    pub gene_sets: Vec<GeneSetReport>,
}

impl PipelineReport {
    pub fn gene_set(&self, name: &str) -> Option<&GeneSetReport> {
        self.gene_sets.iter().find(|r| r.result.gene_set == name)
    }
}

/// Build the regulon network from the TF list and interaction table.
pub fn load_regulons(config: &AnalysisConfig) -> Result<RegulonSet> {
    let tf_config = &config.transcription_factors;
    let tfs = load_tf_set(
        &tf_config.path,
        &tf_config.flag_column,
        &tf_config.symbol_column,
        delimiter_byte(tf_config.delimiter)?,
    )?;
    let interactions = load_interactions(
        &config.interactions.path,
        &config.interactions.columns(),
        delimiter_byte(config.interactions.delimiter)?,
    )?;
    build_regulons(&interactions, &tfs, &config.interactions.tiers()?)
}

/// Run every configured analysis. Any failing stage aborts the run.
pub fn run_pipeline(config: &AnalysisConfig) -> Result<PipelineReport> {
    config.validate()?;
    let regulons = load_regulons(config)?;

    let out_dir = &config.output.dir;
    std::fs::create_dir_all(out_dir).map_err(|e| AnalysisError::io(out_dir, e))?;

    let gene_sets = config
        .gene_sets
        .iter()
        .map(|set| analyze_gene_set(config, set, &regulons))
        .collect::<Result<Vec<_>>>()?;

    info!(
        gene_sets = gene_sets.len(),
        output_dir = %out_dir.display(),
        "Pipeline finished"
    );
    Ok(PipelineReport { regulons, gene_sets })
}

#[instrument(skip_all, fields(gene_set = %set.name))]
fn analyze_gene_set(
    config: &AnalysisConfig,
    set: &GeneSetConfig,
    regulons: &RegulonSet,
) -> Result<GeneSetReport> {
    let reference = load_gene_set(
        &set.name,
        &set.path,
        &set.symbol_column,
        delimiter_byte(set.delimiter)?,
    )?;
    let result = run_enrichment(&reference, regulons, &config.enrichment_options())?;

    let threshold = config.analysis.fdr_threshold;
    let significant_tfs = result.significant_tfs(threshold).len();
    if significant_tfs == 0 {
        warn!(fdr_threshold = threshold, "No TF regulon passed the FDR threshold");
    }

    let out_dir = &config.output.dir;
    let chart = if config.output.charts {
        let path = out_dir.join(format!("{}_top_tfs.svg", set.name));
        write_bar_chart(&path, &result, config.analysis.top_n, threshold)?;
        info!(path = %path.display(), "Wrote bar chart");
        Some(path)
    } else {
        None
    };

    let ranked_table = if config.output.ranked_tables {
        let path = out_dir.join(format!("{}_ranked.tsv", set.name));
        write_ranked(&path, &result)?;
        Some(path)
    } else {
        None
    };

    let edges = match &set.export_edges {
        Some(file) => {
            let path = out_dir.join(file);
            let count = write_edges(&path, result.significant_edges(regulons, threshold))?;
            Some((path, count))
        }
        None => None,
    };

    Ok(GeneSetReport {
        result,
        significant_tfs,
        chart,
        ranked_table,
        edges,
    })
}
