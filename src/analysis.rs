//! Ranked regulon enrichment for one reference gene set.
//!
//! [`run_enrichment`] is the single entry point used for every reference
//! set (ageing genes, disease genes, ...). Runs share nothing but the
//! immutable [`RegulonSet`]: each derives its own universe, corrects its own
//! p-values and yields its own significant TFs.

use std::collections::{BTreeSet, HashMap};

use tracing::{info, instrument};

use crate::enrichment::{OraOptions, OraRecord, ora, universe};
use crate::error::Result;
use crate::genes::{GeneSymbol, ReferenceGeneSet};
use crate::regulon::{RegulatoryEdge, RegulonSet};
use crate::testing::correction::CorrectionMethod;
use crate::testing::{Alternative, MultipleTestResults};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnrichmentOptions {
    pub correction: CorrectionMethod,
    pub min_regulon_size: usize,
    pub alternative: Alternative,
    /// FDR cutoff used when summarizing a run
    pub fdr_threshold: f64,
}

impl Default for EnrichmentOptions {
    fn default() -> Self {
        EnrichmentOptions {
            correction: CorrectionMethod::BenjaminiHochberg,
            min_regulon_size: 1,
            alternative: Alternative::Greater,
            fdr_threshold: 0.05,
        }
    }
}

/// Size and hit count of one regulon within a universe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegulonStats {
    pub regulon_size: usize,
    pub hits: usize,
}

/// Per-TF regulon size (distinct targets) and hits (targets in `universe`),
/// counted directly from the network.
pub fn regulon_statistics(
    regulons: &RegulonSet,
    universe: &BTreeSet<GeneSymbol>,
) -> HashMap<GeneSymbol, RegulonStats> {
    regulons
        .sources()
        .iter()
        .map(|tf| {
            let targets = regulons.targets_of(tf.as_str());
            let hits = targets.iter().filter(|t| universe.contains(**t)).count();
            (
                tf.clone(),
                RegulonStats {
                    regulon_size: targets.len(),
                    hits,
                },
            )
        })
        .collect()
}

/// One ranked row. `p_value`, `score` and `fdr` are `None` for regulons
/// that were not tested.
#[derive(Debug, Clone, PartialEq)]
pub struct TfEnrichment {
    pub tf: GeneSymbol,
    pub regulon_size: usize,
    pub hits: usize,
    pub expected: Option<f64>,
    pub fold_enrichment: Option<f64>,
    pub p_value: Option<f64>,
    pub score: Option<f64>,
    pub fdr: Option<f64>,
}

impl TfEnrichment {
    pub fn is_significant(&self, threshold: f64) -> bool {
        self.fdr.is_some_and(|q| q < threshold)
    }
}

/// Enrichment of every TF against one reference set, sorted by ascending FDR.
#[derive(Debug, Clone)]
pub struct RankedResult {
    pub gene_set: String,
    pub universe_size: usize,
    pub population_size: usize,
    pub correction: CorrectionMethod,
    pub rows: Vec<TfEnrichment>,
}

impl RankedResult {
    pub fn top(&self, n: usize) -> &[TfEnrichment] {
        let tested = self.rows.iter().take_while(|r| r.fdr.is_some()).count();
        &self.rows[..n.min(tested)]
    }

    pub fn get(&self, tf: &str) -> Option<&TfEnrichment> {
        self.rows.iter().find(|r| r.tf.as_str() == tf)
    }

    pub fn significant_tfs(&self, threshold: f64) -> BTreeSet<GeneSymbol> {
        self.rows
            .iter()
            .filter(|r| r.is_significant(threshold))
            .map(|r| r.tf.clone())
            .collect()
    }

    /// Edges of `regulons` whose source TF is significant in this run.
    pub fn significant_edges<'a>(
        &self,
        regulons: &'a RegulonSet,
        threshold: f64,
    ) -> Vec<&'a RegulatoryEdge> {
        let significant = self.significant_tfs(threshold);
        regulons.edges_from(&significant).collect()
    }
}

/// Run ORA of every regulon against `reference`, join the per-TF counts,
/// correct the p-values and rank.
#[instrument(skip_all, fields(gene_set = reference.name()))]
pub fn run_enrichment(
    reference: &ReferenceGeneSet,
    regulons: &RegulonSet,
    options: &EnrichmentOptions,
) -> Result<RankedResult> {
    let records = ora(
        regulons,
        reference,
        &OraOptions {
            min_regulon_size: options.min_regulon_size,
            alternative: options.alternative,
        },
    )?;
    let universe = universe(regulons, reference);
    let stats = regulon_statistics(regulons, &universe);

    let (tested, untested): (Vec<OraRecord>, Vec<OraRecord>) =
        records.into_iter().partition(|r| r.test.is_some());

    let statistics: Vec<f64> = tested.iter().filter_map(OraRecord::score).collect();
    let p_values: Vec<f64> = tested.iter().filter_map(OraRecord::p_value).collect();
    let mut results = MultipleTestResults::new(statistics, p_values)
        .with_global_metadata("test_type", "hypergeometric")
        .with_global_metadata("gene_set", reference.name());
    if !results.p_values.is_empty() {
        let adjusted = options.correction.apply(&results.p_values)?;
        results = results.with_adjusted_p_values(adjusted);
    }

    let row = |record: &OraRecord, fdr: Option<f64>| {
        let counts = stats.get(&record.tf).copied().unwrap_or(RegulonStats {
            regulon_size: record.draws,
            hits: record.observed,
        });
        TfEnrichment {
            tf: record.tf.clone(),
            regulon_size: counts.regulon_size,
            hits: counts.hits,
            expected: record.expected(),
            fold_enrichment: record.fold_enrichment(),
            p_value: record.p_value(),
            score: record.score(),
            fdr,
        }
    };

    let adjusted = results.effective_p_values();
    let mut rows: Vec<TfEnrichment> = results
        .ranked_indices()
        .into_iter()
        .map(|i| row(&tested[i], Some(adjusted[i])))
        .collect();
    // equal FDR and p-value: order by symbol so reruns are identical
    rows.sort_by(|a, b| {
        a.fdr
            .partial_cmp(&b.fdr)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| {
                a.p_value
                    .partial_cmp(&b.p_value)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .then_with(|| a.tf.cmp(&b.tf))
    });
    rows.extend(untested.iter().map(|r| row(r, None)));

    let significant = rows
        .iter()
        .filter(|r| r.is_significant(options.fdr_threshold))
        .count();
    info!(
        tfs = rows.len(),
        tested = tested.len(),
        universe = universe.len(),
        significant,
        fdr_threshold = options.fdr_threshold,
        correction = %options.correction,
        "Ranked regulon enrichment"
    );

    Ok(RankedResult {
        gene_set: reference.name().to_string(),
        universe_size: universe.len(),
        population_size: regulons.population_size(),
        correction: options.correction,
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::regulon::{Confidence, ModeOfRegulation, RawInteraction, build_regulons};
    use approx::assert_relative_eq;

    fn raw(tf: &str, target: &str, confidence: Confidence, mor: i8) -> RawInteraction {
        RawInteraction {
            tf: tf.to_string(),
            target: target.to_string(),
            confidence,
            mode_of_regulation: if mor > 0 {
                ModeOfRegulation::Activation
            } else {
                ModeOfRegulation::Repression
            },
        }
    }

    fn scenario() -> RegulonSet {
        let tfs = ReferenceGeneSet::from_raw("tfs", ["TFA", "TFB"]);
        let interactions = vec![
            raw("TFA", "GENE1", Confidence::A, 1),
            raw("TFA", "GENE2", Confidence::A, 1),
            raw("TFB", "GENE3", Confidence::B, -1),
            raw("OCT4", "GENE1", Confidence::A, 1),
        ];
        build_regulons(&interactions, &tfs, &Confidence::HIGH).unwrap()
    }

    #[test]
    fn test_scenario_ranking() {
        let reference = ReferenceGeneSet::from_raw("ageing", ["GENE1", "GENE2"]);
        let ranked = run_enrichment(&reference, &scenario(), &EnrichmentOptions::default()).unwrap();

        assert_eq!(ranked.universe_size, 2);
        assert_eq!(ranked.population_size, 3);
        assert_eq!(ranked.rows.len(), 2);

        let tfa = &ranked.rows[0];
        assert_eq!(tfa.tf.as_str(), "TFA");
        assert_eq!((tfa.regulon_size, tfa.hits), (2, 2));
        assert_relative_eq!(tfa.p_value.unwrap(), 1.0 / 3.0, epsilon = 1e-9);
        assert_relative_eq!(tfa.fdr.unwrap(), 2.0 / 3.0, epsilon = 1e-9);

        let tfb = &ranked.rows[1];
        assert_eq!(tfb.tf.as_str(), "TFB");
        assert_eq!((tfb.regulon_size, tfb.hits), (1, 0));
        assert_eq!(tfb.p_value, Some(1.0));
        assert_eq!(tfb.fdr, Some(1.0));

        assert!(ranked.get("OCT4").is_none());
    }

    #[test]
    fn test_every_tf_appears_once() {
        let reference = ReferenceGeneSet::from_raw("ageing", ["GENE3"]);
        let regulons = scenario();
        let ranked = run_enrichment(&reference, &regulons, &EnrichmentOptions::default()).unwrap();

        let names: BTreeSet<&str> = ranked.rows.iter().map(|r| r.tf.as_str()).collect();
        assert_eq!(names.len(), ranked.rows.len());
        assert_eq!(names.len(), regulons.n_sources());
        assert_eq!(ranked.rows[0].tf.as_str(), "TFB");
    }

    #[test]
    fn test_fdr_monotone_in_p_value() {
        let tfs = ReferenceGeneSet::from_raw("tfs", ["T1", "T2", "T3", "T4"]);
        let mut interactions = Vec::new();
        for (tf, n_hits, n_other) in [("T1", 6, 0), ("T2", 3, 3), ("T3", 1, 5), ("T4", 4, 1)] {
            for g in 0..n_hits {
                interactions.push(raw(tf, &format!("HIT{g}"), Confidence::A, 1));
            }
            for g in 0..n_other {
                interactions.push(raw(tf, &format!("{tf}_OTHER{g}"), Confidence::A, 1));
            }
        }
        for g in 0..30 {
            interactions.push(raw("T1", &format!("BACKGROUND{g}"), Confidence::B, 1));
        }
        let regulons = build_regulons(&interactions, &tfs, &Confidence::HIGH).unwrap();
        let reference = ReferenceGeneSet::new(
            "ageing",
            (0..6).filter_map(|g| GeneSymbol::new(&format!("HIT{g}"))),
        );
        let ranked = run_enrichment(&reference, &regulons, &EnrichmentOptions::default()).unwrap();

        let mut pairs: Vec<(f64, f64)> = ranked
            .rows
            .iter()
            .map(|r| (r.p_value.unwrap(), r.fdr.unwrap()))
            .collect();
        for w in ranked.rows.windows(2) {
            assert!(w[0].fdr.unwrap() <= w[1].fdr.unwrap());
        }
        pairs.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap());
        for w in pairs.windows(2) {
            assert!(w[0].1 <= w[1].1);
        }
    }

    #[test]
    fn test_significant_edges_only_from_significant_sources() {
        let tfs = ReferenceGeneSet::from_raw("tfs", ["SIG", "KLF4"]);
        let mut interactions = Vec::new();
        for g in 0..8 {
            interactions.push(raw("SIG", &format!("AGE{g}"), Confidence::A, 1));
        }
        for g in 0..40 {
            interactions.push(raw("KLF4", &format!("OTHER{g}"), Confidence::A, -1));
        }
        interactions.push(raw("KLF4", "AGE0", Confidence::B, 1));
        let regulons = build_regulons(&interactions, &tfs, &Confidence::HIGH).unwrap();
        let reference = ReferenceGeneSet::new(
            "ageing",
            (0..8).filter_map(|g| GeneSymbol::new(&format!("AGE{g}"))),
        );

        let ranked = run_enrichment(&reference, &regulons, &EnrichmentOptions::default()).unwrap();
        let significant = ranked.significant_tfs(0.05);
        assert!(significant.contains("SIG"));
        assert!(!significant.contains("KLF4"));

        let edges = ranked.significant_edges(&regulons, 0.05);
        assert_eq!(edges.len(), 8);
        assert!(edges.iter().all(|e| e.source.as_str() == "SIG"));
    }

    #[test]
    fn test_significant_edges_outlive_ranked_result() {
        let regulons = scenario();
        let reference = ReferenceGeneSet::from_raw("ageing", ["GENE1", "GENE2"]);
        let edges = {
            let ranked =
                run_enrichment(&reference, &regulons, &EnrichmentOptions::default()).unwrap();
            ranked.significant_edges(&regulons, 0.7)
        };
        assert_eq!(edges.len(), 2);
        assert!(edges.iter().all(|e| e.source.as_str() == "TFA"));
    }

    #[test]
    fn test_untested_rows_rank_last() {
        let reference = ReferenceGeneSet::from_raw("ageing", ["GENE1", "GENE2"]);
        let options = EnrichmentOptions {
            min_regulon_size: 2,
            ..EnrichmentOptions::default()
        };
        let ranked = run_enrichment(&reference, &scenario(), &options).unwrap();

        assert_eq!(ranked.rows.len(), 2);
        assert_eq!(ranked.rows[1].tf.as_str(), "TFB");
        assert_eq!(ranked.rows[1].fdr, None);
        assert_eq!(ranked.rows[1].regulon_size, 1);
        assert_eq!(ranked.top(15).len(), 1);
        assert_relative_eq!(ranked.rows[0].fdr.unwrap(), 1.0 / 3.0, epsilon = 1e-9);
    }

    #[test]
    fn test_regulon_statistics_counts_universe_hits() {
        let regulons = scenario();
        let universe: BTreeSet<GeneSymbol> = [GeneSymbol::new("GENE2").unwrap()].into();
        let stats = regulon_statistics(&regulons, &universe);
        let tfa = stats[&GeneSymbol::new("TFA").unwrap()];
        assert_eq!(tfa, RegulonStats { regulon_size: 2, hits: 1 });
    }
}
