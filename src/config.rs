//! Analysis configuration.
//!
//! Loaded from a TOML file; every field has a default so a config only needs
//! to name what differs. Relative input and output paths are resolved
//! against the directory of the config file.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::analysis::EnrichmentOptions;
use crate::error::{AnalysisError, Result};
use crate::loaders::{InteractionColumns, parse_tiers};
use crate::regulon::Confidence;
use crate::report::SIGNIFICANT_EDGES_FILE;
use crate::testing::Alternative;
use crate::testing::correction::CorrectionMethod;

/// The configuration written by `single-regulon default-config`.
pub const DEFAULT_CONFIG: &str = r#"[transcription_factors]
path = "data/human_tfs.xlsx"
flag_column = "Is TF?"
symbol_column = "HGNC symbol"

[interactions]
path = "data/dorothea_hs.csv"
tf_column = "tf"
target_column = "target"
confidence_column = "confidence"
mor_column = "mor"
confidence = ["A", "B"]

[[gene_sets]]
name = "ageing"
path = "data/ageing_genes.csv"
symbol_column = "symbol"
export_edges = "TF_Ageing_Regulon_SigEdges.csv"

[[gene_sets]]
name = "alzheimers"
path = "data/alzheimers_genes.xlsx"
symbol_column = "Symbol"

[analysis]
correction = "benjamini-hochberg"
fdr_threshold = 0.05
top_n = 15
min_regulon_size = 1

[output]
dir = "results"
charts = true
ranked_tables = true
"#;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TfTableConfig {
    pub path: PathBuf,
    pub flag_column: String,
    pub symbol_column: String,
    pub delimiter: Option<char>,
}

impl Default for TfTableConfig {
    fn default() -> Self {
        TfTableConfig {
            path: PathBuf::from("data/human_tfs.xlsx"),
            flag_column: "Is TF?".to_string(),
            symbol_column: "HGNC symbol".to_string(),
            delimiter: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InteractionConfig {
    pub path: PathBuf,
    pub tf_column: String,
    pub target_column: String,
    pub confidence_column: String,
    pub mor_column: String,
    /// Confidence tiers kept when building regulons
    pub confidence: Vec<String>,
    pub delimiter: Option<char>,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        let columns = InteractionColumns::default();
        InteractionConfig {
            path: PathBuf::from("data/dorothea_hs.csv"),
            tf_column: columns.tf,
            target_column: columns.target,
            confidence_column: columns.confidence,
            mor_column: columns.mode_of_regulation,
            confidence: Confidence::HIGH.iter().map(|c| c.to_string()).collect(),
            delimiter: None,
        }
    }
}

impl InteractionConfig {
    pub fn columns(&self) -> InteractionColumns {
        InteractionColumns {
            tf: self.tf_column.clone(),
            target: self.target_column.clone(),
            confidence: self.confidence_column.clone(),
            mode_of_regulation: self.mor_column.clone(),
        }
    }

    pub fn tiers(&self) -> Result<Vec<Confidence>> {
        parse_tiers(&self.confidence)
    }
}

/// One reference gene set to test the regulons against.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GeneSetConfig {
    pub name: String,
    pub path: PathBuf,
    #[serde(default = "default_symbol_column")]
    pub symbol_column: String,
    #[serde(default)]
    pub delimiter: Option<char>,
    /// File name (inside the output directory) for this set's significant edges
    #[serde(default)]
    pub export_edges: Option<String>,
}

fn default_symbol_column() -> String {
    "symbol".to_string()
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StatisticsConfig {
    pub correction: CorrectionMethod,
    pub fdr_threshold: f64,
    pub top_n: usize,
    pub min_regulon_size: usize,
}

impl Default for StatisticsConfig {
    fn default() -> Self {
        StatisticsConfig {
            correction: CorrectionMethod::BenjaminiHochberg,
            fdr_threshold: 0.05,
            top_n: 15,
            min_regulon_size: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub dir: PathBuf,
    pub charts: bool,
    pub ranked_tables: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            dir: PathBuf::from("results"),
            charts: true,
            ranked_tables: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    pub transcription_factors: TfTableConfig,
    pub interactions: InteractionConfig,
    pub gene_sets: Vec<GeneSetConfig>,
    pub analysis: StatisticsConfig,
    pub output: OutputConfig,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            transcription_factors: TfTableConfig::default(),
            interactions: InteractionConfig::default(),
            gene_sets: vec![
                GeneSetConfig {
                    name: "ageing".to_string(),
                    path: PathBuf::from("data/ageing_genes.csv"),
                    symbol_column: "symbol".to_string(),
                    delimiter: None,
                    export_edges: Some(SIGNIFICANT_EDGES_FILE.to_string()),
                },
                GeneSetConfig {
                    name: "alzheimers".to_string(),
                    path: PathBuf::from("data/alzheimers_genes.xlsx"),
                    symbol_column: "Symbol".to_string(),
                    delimiter: None,
                    export_edges: None,
                },
            ],
            analysis: StatisticsConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl AnalysisConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: AnalysisConfig =
            toml::from_str(content).map_err(|e| AnalysisError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, validate and resolve relative paths against the file's directory.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| AnalysisError::io(path, e))?;
        let mut config = Self::from_toml_str(&content).map_err(|e| match e {
            AnalysisError::Config(msg) => AnalysisError::Config(format!("{}: {msg}", path.display())),
            other => other,
        })?;
        if let Some(base) = path.parent() {
            config.resolve_paths(base);
        }
        Ok(config)
    }

    pub fn resolve_paths(&mut self, base: &Path) {
        let resolve = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };
        resolve(&mut self.transcription_factors.path);
        resolve(&mut self.interactions.path);
        for set in &mut self.gene_sets {
            resolve(&mut set.path);
        }
        resolve(&mut self.output.dir);
    }

    pub fn validate(&self) -> Result<()> {
        let fdr = self.analysis.fdr_threshold;
        if !(fdr > 0.0 && fdr <= 1.0) {
            return Err(AnalysisError::Config(format!(
                "fdr_threshold must be in (0, 1], got {fdr}"
            )));
        }
        if self.analysis.top_n == 0 {
            return Err(AnalysisError::Config("top_n must be positive".to_string()));
        }
        if self.gene_sets.is_empty() {
            return Err(AnalysisError::Config(
                "at least one gene set is required".to_string(),
            ));
        }
        let mut names = HashSet::new();
        for set in &self.gene_sets {
            if set.name.trim().is_empty() {
                return Err(AnalysisError::Config("gene set name is empty".to_string()));
            }
            if !names.insert(set.name.as_str()) {
                return Err(AnalysisError::Config(format!(
                    "duplicate gene set name '{}'",
                    set.name
                )));
            }
            delimiter_byte(set.delimiter)?;
        }
        delimiter_byte(self.transcription_factors.delimiter)?;
        delimiter_byte(self.interactions.delimiter)?;
        if self.interactions.confidence.is_empty() {
            return Err(AnalysisError::Config(
                "at least one confidence tier is required".to_string(),
            ));
        }
        self.interactions.tiers()?;
        Ok(())
    }

    pub fn enrichment_options(&self) -> EnrichmentOptions {
        EnrichmentOptions {
            correction: self.analysis.correction,
            min_regulon_size: self.analysis.min_regulon_size,
            alternative: Alternative::Greater,
            fdr_threshold: self.analysis.fdr_threshold,
        }
    }
}

/// Convert a configured delimiter to the byte the table reader expects.
pub fn delimiter_byte(delimiter: Option<char>) -> Result<Option<u8>> {
    match delimiter {
        None => Ok(None),
        Some(c) if c.is_ascii() => Ok(Some(c as u8)),
        Some(c) => Err(AnalysisError::Config(format!(
            "delimiter '{c}' is not a single ASCII character"
        ))),
    }
}
