// Over-representation analysis of regulons, following the ORA method of decoupler
// (https://github.com/scverse/decoupler) with every reference gene in the network as a hit.

use tracing::{debug, instrument, warn};

use crate::enrichment::utils::{count_hits, hit_indicator};
use crate::error::{AnalysisError, Result};
use crate::genes::{GeneSymbol, ReferenceGeneSet};
use crate::regulon::RegulonSet;
use crate::testing::inference::hypergeometric_test;
use crate::testing::{Alternative, TestResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OraOptions {
    /// Regulons with fewer distinct targets are not tested
    pub min_regulon_size: usize,
    pub alternative: Alternative,
}

impl Default for OraOptions {
    fn default() -> Self {
        OraOptions {
            min_regulon_size: 1,
            alternative: Alternative::Greater,
        }
    }
}

/// Enrichment of one regulon. `test` is `None` when the regulon was too
/// small to test; such a row never carries a p-value.
#[derive(Debug, Clone)]
pub struct OraRecord {
    pub tf: GeneSymbol,
    pub draws: usize,
    pub observed: usize,
    pub test: Option<TestResult<f64>>,
}

impl OraRecord {
    pub fn p_value(&self) -> Option<f64> {
        self.test.as_ref().map(|t| t.p_value)
    }

    /// -log10(p), the ORA enrichment estimate
    pub fn score(&self) -> Option<f64> {
        self.test.as_ref().map(|t| t.statistic)
    }

    pub fn fold_enrichment(&self) -> Option<f64> {
        self.test.as_ref().and_then(|t| t.effect_size)
    }

    pub fn expected(&self) -> Option<f64> {
        self.test.as_ref().and_then(|t| t.metadata_value("expected"))
    }
}

/// Test every regulon for over-representation of `reference` genes.
///
/// The population is the set of distinct targets across all regulons and
/// the successes are the reference genes within it. Returns one record per
/// TF in network order. Fails with [`AnalysisError::EmptyUniverse`] when the
/// reference set shares no gene with the network.
#[instrument(skip_all, fields(gene_set = reference.name()))]
pub fn ora(
    regulons: &RegulonSet,
    reference: &ReferenceGeneSet,
    options: &OraOptions,
) -> Result<Vec<OraRecord>> {
    let hits = hit_indicator(regulons, reference);
    let population = regulons.population_size();
    let successes = hits.iter().filter(|&&h| h).count();

    if successes == 0 {
        return Err(AnalysisError::EmptyUniverse {
            gene_set: reference.name().to_string(),
            population,
        });
    }
    debug!(population, successes, "Universe overlap");

    let min_size = options.min_regulon_size.max(1);
    let mut records = Vec::with_capacity(regulons.n_sources());
    let mut untested = 0usize;

    for (i, tf) in regulons.sources().iter().enumerate() {
        let regulon = regulons.regulon(i);
        let draws = regulon.len();
        let observed = count_hits(regulon, &hits);

        let test = if draws < min_size {
            untested += 1;
            None
        } else {
            Some(hypergeometric_test(
                observed as u64,
                draws as u64,
                successes as u64,
                population as u64,
                options.alternative,
            )?)
        };

        records.push(OraRecord {
            tf: tf.clone(),
            draws,
            observed,
            test,
        });
    }

    if untested > 0 {
        warn!(untested, min_size, "Regulons below the minimum size were not tested");
    }
    Ok(records)
}
