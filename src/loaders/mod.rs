//! Loaders for the reference gene sets and the TF-target interaction table.
//!
//! Every input is a table with a header row: delimited text, or a workbook
//! (`.xlsx`, `.xls`, `.ods`, ...) read from its first sheet, as the disease
//! gene list and TF annotation table are distributed. Any missing file,
//! missing column or out-of-domain value aborts the load; there is no
//! partial recovery.

use std::path::Path;

use tracing::{debug, info};

use crate::error::{AnalysisError, Result};
use crate::genes::{GeneSymbol, ReferenceGeneSet};
use crate::regulon::{Confidence, ModeOfRegulation, RawInteraction};

mod table;

pub use table::{Table, infer_delimiter, is_spreadsheet};

/// Header names of the interaction table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InteractionColumns {
    pub tf: String,
    pub target: String,
    pub confidence: String,
    pub mode_of_regulation: String,
}

impl Default for InteractionColumns {
    fn default() -> Self {
        InteractionColumns {
            tf: "tf".to_string(),
            target: "target".to_string(),
            confidence: "confidence".to_string(),
            mode_of_regulation: "mor".to_string(),
        }
    }
}

/// Load a reference gene set from one symbol column.
pub fn load_gene_set(
    name: &str,
    path: &Path,
    column: &str,
    delimiter: Option<u8>,
) -> Result<ReferenceGeneSet> {
    let table = Table::read(path, delimiter)?;
    let col = table.column(column)?;
    let set = ReferenceGeneSet::new(
        name,
        table
            .rows()
            .filter_map(|(_, record)| GeneSymbol::new(Table::cell(record, col))),
    );
    ensure_not_empty(set, path)
}

/// Load the transcription factor list, keeping rows flagged "yes" in
/// `flag_column`.
pub fn load_tf_set(
    path: &Path,
    flag_column: &str,
    symbol_column: &str,
    delimiter: Option<u8>,
) -> Result<ReferenceGeneSet> {
    let table = Table::read(path, delimiter)?;
    let flag = table.column(flag_column)?;
    let symbol = table.column(symbol_column)?;

    let flagged = table
        .rows()
        .filter(|(_, record)| Table::cell(record, flag).trim().eq_ignore_ascii_case("yes"));
    let set = ReferenceGeneSet::new(
        "transcription_factors",
        flagged.filter_map(|(_, record)| GeneSymbol::new(Table::cell(record, symbol))),
    );
    debug!(rows = table.len(), tfs = set.len(), "Filtered TF annotation table");
    ensure_not_empty(set, path)
}

/// Load every row of the interaction table.
pub fn load_interactions(
    path: &Path,
    columns: &InteractionColumns,
    delimiter: Option<u8>,
) -> Result<Vec<RawInteraction>> {
    let table = Table::read(path, delimiter)?;
    let tf = table.column(&columns.tf)?;
    let target = table.column(&columns.target)?;
    let confidence = table.column(&columns.confidence)?;
    let mor = table.column(&columns.mode_of_regulation)?;

    let malformed = |line: u64, column: &str, value: &str| AnalysisError::MalformedValue {
        path: path.to_path_buf(),
        line,
        column: column.to_string(),
        value: value.to_string(),
    };

    let mut interactions = Vec::with_capacity(table.len());
    for (line, record) in table.rows() {
        let raw_confidence = Table::cell(record, confidence);
        let raw_mor = Table::cell(record, mor);
        interactions.push(RawInteraction {
            tf: Table::cell(record, tf).to_string(),
            target: Table::cell(record, target).to_string(),
            confidence: raw_confidence
                .parse()
                .map_err(|_| malformed(line, &columns.confidence, raw_confidence))?,
            mode_of_regulation: raw_mor
                .parse::<ModeOfRegulation>()
                .map_err(|_| malformed(line, &columns.mode_of_regulation, raw_mor))?,
        });
    }

    info!(path = %path.display(), interactions = interactions.len(), "Loaded interaction table");
    Ok(interactions)
}

fn ensure_not_empty(set: ReferenceGeneSet, path: &Path) -> Result<ReferenceGeneSet> {
    if set.is_empty() {
        return Err(AnalysisError::EmptyReferenceSet {
            name: set.name().to_string(),
            path: path.to_path_buf(),
        });
    }
    info!(name = set.name(), genes = set.len(), path = %path.display(), "Loaded gene set");
    Ok(set)
}

/// Parse confidence tiers from their letters (e.g. `["A", "B"]`).
pub fn parse_tiers<S: AsRef<str>>(letters: &[S]) -> Result<Vec<Confidence>> {
    letters
        .iter()
        .map(|l| {
            l.as_ref()
                .parse::<Confidence>()
                .map_err(AnalysisError::Config)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_load_gene_set_normalizes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ageing.csv");
        std::fs::write(&path, "symbol,name\nSirt1,a\nSIRT1,b\n foxo3 ,c\n,d\n").unwrap();

        let set = load_gene_set("ageing", &path, "symbol", None).unwrap();
        assert_eq!(set.len(), 2);
        assert!(set.contains("SIRT1"));
        assert!(set.contains("FOXO3"));
    }

    #[test]
    fn test_load_tf_set_keeps_flagged_rows() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tfs.tsv");
        std::fs::write(
            &path,
            "Ensembl ID\tHGNC symbol\tIs TF?\nENSG1\tKlf4\tYes\nENSG2\tSox2\tyes\nENSG3\tGAPDH\tNo\n",
        )
        .unwrap();

        let set = load_tf_set(&path, "Is TF?", "HGNC symbol", None).unwrap();
        assert_eq!(set.len(), 2);
        assert!(set.contains("KLF4"));
        assert!(set.contains("SOX2"));
        assert!(!set.contains("GAPDH"));
    }

    #[test]
    fn test_load_tf_set_from_workbook() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("human_tfs.xlsx");
        let mut workbook = rust_xlsxwriter::Workbook::new();
        let sheet = workbook.add_worksheet();
        for (row, cells) in [
            ["Ensembl ID", "HGNC symbol", "Is TF?"],
            ["ENSG1", "Klf4", "Yes"],
            ["ENSG2", "GAPDH", "No"],
            ["ENSG3", "foxo3", "Yes"],
        ]
        .iter()
        .enumerate()
        {
            for (col, value) in cells.iter().enumerate() {
                sheet.write_string(row as u32, col as u16, *value).unwrap();
            }
        }
        workbook.save(&path).unwrap();

        let set = load_tf_set(&path, "Is TF?", "HGNC symbol", None).unwrap();
        assert_eq!(set.len(), 2);
        assert!(set.contains("KLF4"));
        assert!(set.contains("FOXO3"));
        assert!(!set.contains("GAPDH"));
    }

    #[test]
    fn test_empty_tf_set_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tfs.csv");
        std::fs::write(&path, "HGNC symbol,Is TF?\nGAPDH,No\n").unwrap();

        let err = load_tf_set(&path, "Is TF?", "HGNC symbol", None).unwrap_err();
        assert!(matches!(err, AnalysisError::EmptyReferenceSet { .. }));
    }

    #[test]
    fn test_load_interactions() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dorothea.csv");
        std::fs::write(
            &path,
            "tf,confidence,target,mor\nKLF4,A,NANOG,1\nSOX2,C,POU5F1,-1\n",
        )
        .unwrap();

        let interactions = load_interactions(&path, &InteractionColumns::default(), None).unwrap();
        assert_eq!(interactions.len(), 2);
        assert_eq!(interactions[0].confidence, Confidence::A);
        assert_eq!(interactions[1].mode_of_regulation, ModeOfRegulation::Repression);
        assert_eq!(interactions[1].target, "POU5F1");
    }

    #[test]
    fn test_out_of_domain_confidence_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dorothea.csv");
        std::fs::write(&path, "tf,confidence,target,mor\nKLF4,A,NANOG,1\nSOX2,Z,POU5F1,1\n").unwrap();

        let err = load_interactions(&path, &InteractionColumns::default(), None).unwrap_err();
        match err {
            AnalysisError::MalformedValue { line, column, value, .. } => {
                assert_eq!(line, 3);
                assert_eq!(column, "confidence");
                assert_eq!(value, "Z");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_tiers() {
        assert_eq!(parse_tiers(&["A", "b"]).unwrap(), vec![Confidence::A, Confidence::B]);
        assert!(parse_tiers(&["X"]).is_err());
    }
}
