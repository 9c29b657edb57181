use std::collections::{BTreeMap, BTreeSet, HashSet};

use nalgebra_sparse::{CooMatrix, CsrMatrix};
use tracing::{debug, info};

use crate::error::{AnalysisError, Result};
use crate::genes::{GeneSymbol, ReferenceGeneSet};
use crate::regulon::{Confidence, RawInteraction, RegulatoryEdge};

/// Filtered regulatory network, indexed as a sparse TF × target matrix.
///
/// Row `i` is the regulon of `sources[i]`; column `j` is `targets[j]`. The
/// distinct targets form the population of every enrichment test run on
/// this network.
#[derive(Debug, Clone)]
pub struct RegulonSet {
    edges: Vec<RegulatoryEdge>,
    sources: Vec<GeneSymbol>,
    targets: Vec<GeneSymbol>,
    adjacency: CsrMatrix<f64>,
}

impl RegulonSet {
    /// Index a set of edges. Sources and targets are sorted; a repeated
    /// (source, target) pair keeps the weight of its first edge.
    pub fn from_edges(edges: Vec<RegulatoryEdge>) -> Self {
        let sources: Vec<GeneSymbol> = edges
            .iter()
            .map(|e| e.source.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let targets: Vec<GeneSymbol> = edges
            .iter()
            .map(|e| e.target.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let source_idx: BTreeMap<&str, usize> = sources
            .iter()
            .enumerate()
            .map(|(i, s)| (s.as_str(), i))
            .collect();
        let target_idx: BTreeMap<&str, usize> = targets
            .iter()
            .enumerate()
            .map(|(j, t)| (t.as_str(), j))
            .collect();

        let mut seen: HashSet<(usize, usize)> = HashSet::with_capacity(edges.len());
        let mut coo = CooMatrix::new(sources.len(), targets.len());
        for edge in &edges {
            let i = source_idx[edge.source.as_str()];
            let j = target_idx[edge.target.as_str()];
            if seen.insert((i, j)) {
                coo.push(i, j, edge.weight());
            }
        }
        let adjacency = CsrMatrix::from(&coo);

        RegulonSet {
            edges,
            sources,
            targets,
            adjacency,
        }
    }

    pub fn edges(&self) -> &[RegulatoryEdge] {
        &self.edges
    }

    pub fn sources(&self) -> &[GeneSymbol] {
        &self.sources
    }

    pub fn targets(&self) -> &[GeneSymbol] {
        &self.targets
    }

    pub fn adjacency(&self) -> &CsrMatrix<f64> {
        &self.adjacency
    }

    pub fn n_sources(&self) -> usize {
        self.sources.len()
    }

    /// Number of distinct targets across all regulons.
    pub fn population_size(&self) -> usize {
        self.targets.len()
    }

    pub fn source_index(&self, tf: &str) -> Option<usize> {
        self.sources.binary_search_by(|s| s.as_str().cmp(tf)).ok()
    }

    /// Column indices of the distinct targets of the TF in row `source`.
    pub fn regulon(&self, source: usize) -> &[usize] {
        let offsets = self.adjacency.row_offsets();
        &self.adjacency.col_indices()[offsets[source]..offsets[source + 1]]
    }

    /// Distinct targets of a TF by symbol; empty when the TF is unknown.
    pub fn targets_of(&self, tf: &str) -> Vec<&GeneSymbol> {
        match self.source_index(tf) {
            Some(i) => self.regulon(i).iter().map(|&j| &self.targets[j]).collect(),
            None => Vec::new(),
        }
    }

    /// Edges whose source is in `tfs`, in original table order.
    pub fn edges_from<'a, 'b>(
        &'a self,
        tfs: &'b BTreeSet<GeneSymbol>,
    ) -> impl Iterator<Item = &'a RegulatoryEdge> + use<'a, 'b> {
        self.edges.iter().filter(move |e| tfs.contains(&e.source))
    }
}

/// Filter raw interactions into a regulon network.
///
/// Keeps edges whose confidence is in `tiers`, normalizes both symbols,
/// maps confidence to likelihood and drops edges whose source is not a
/// known transcription factor.
pub fn build_regulons(
    interactions: &[RawInteraction],
    tfs: &ReferenceGeneSet,
    tiers: &[Confidence],
) -> Result<RegulonSet> {
    let mut low_confidence = 0usize;
    let mut unknown_source = 0usize;
    let mut blank = 0usize;
    let mut dropped_sources: BTreeSet<GeneSymbol> = BTreeSet::new();
    let mut edges = Vec::new();

    for raw in interactions {
        if !tiers.contains(&raw.confidence) {
            low_confidence += 1;
            continue;
        }
        let (Some(source), Some(target)) = (GeneSymbol::new(&raw.tf), GeneSymbol::new(&raw.target))
        else {
            blank += 1;
            continue;
        };
        if !tfs.contains(source.as_str()) {
            unknown_source += 1;
            dropped_sources.insert(source);
            continue;
        }
        edges.push(RegulatoryEdge {
            source,
            target,
            mode_of_regulation: raw.mode_of_regulation,
            likelihood: raw.confidence.likelihood(),
        });
    }

    if !dropped_sources.is_empty() {
        debug!(
            sources = ?dropped_sources.iter().map(GeneSymbol::as_str).collect::<Vec<_>>(),
            "Sources absent from the transcription factor list"
        );
    }

    if edges.is_empty() {
        return Err(AnalysisError::EmptyNetwork {
            total: interactions.len(),
        });
    }

    let set = RegulonSet::from_edges(edges);
    info!(
        total = interactions.len(),
        kept = set.edges().len(),
        low_confidence,
        unknown_source,
        blank,
        regulons = set.n_sources(),
        targets = set.population_size(),
        "Built regulon network"
    );
    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::regulon::ModeOfRegulation;

    fn raw(tf: &str, target: &str, confidence: Confidence, mor: ModeOfRegulation) -> RawInteraction {
        RawInteraction {
            tf: tf.to_string(),
            target: target.to_string(),
            confidence,
            mode_of_regulation: mor,
        }
    }

    fn tf_list() -> ReferenceGeneSet {
        ReferenceGeneSet::from_raw("tfs", ["TFA", "TFB", "KLF4"])
    }

    #[test]
    fn test_only_high_confidence_edges_survive() {
        let interactions = vec![
            raw("TFA", "GENE1", Confidence::A, ModeOfRegulation::Activation),
            raw("TFA", "GENE2", Confidence::C, ModeOfRegulation::Activation),
            raw("TFB", "GENE3", Confidence::B, ModeOfRegulation::Repression),
            raw("TFB", "GENE4", Confidence::E, ModeOfRegulation::Repression),
        ];
        let set = build_regulons(&interactions, &tf_list(), &Confidence::HIGH).unwrap();

        assert_eq!(set.edges().len(), 2);
        for edge in set.edges() {
            assert!(edge.likelihood == 1.0 || edge.likelihood == 0.75);
        }
        assert_eq!(set.targets_of("TFB")[0].as_str(), "GENE3");
        assert_eq!(set.edges()[1].weight(), -0.75);
    }

    #[test]
    fn test_source_outside_tf_list_is_dropped() {
        let interactions = vec![
            raw("Pou5f1", "NANOG", Confidence::A, ModeOfRegulation::Activation),
            raw("klf4", "nanog", Confidence::A, ModeOfRegulation::Activation),
        ];
        let set = build_regulons(&interactions, &tf_list(), &Confidence::HIGH).unwrap();

        assert_eq!(set.sources().len(), 1);
        assert_eq!(set.sources()[0].as_str(), "KLF4");
        assert_eq!(set.edges()[0].target.as_str(), "NANOG");
        assert!(set.source_index("POU5F1").is_none());
        assert!(set.edges().iter().all(|e| tf_list().contains(e.source.as_str())));
    }

    #[test]
    fn test_duplicate_pairs_counted_once() {
        let interactions = vec![
            raw("TFA", "GENE1", Confidence::A, ModeOfRegulation::Activation),
            raw("TFA", "GENE1", Confidence::B, ModeOfRegulation::Repression),
            raw("TFA", "GENE2", Confidence::A, ModeOfRegulation::Activation),
        ];
        let set = build_regulons(&interactions, &tf_list(), &Confidence::HIGH).unwrap();

        assert_eq!(set.edges().len(), 3);
        assert_eq!(set.regulon(0).len(), 2);
        assert_eq!(set.population_size(), 2);
        assert_eq!(set.adjacency().row(0).values()[0], 1.0);
    }

    #[test]
    fn test_empty_network_is_an_error() {
        let interactions = vec![raw("TFA", "GENE1", Confidence::D, ModeOfRegulation::Activation)];
        let err = build_regulons(&interactions, &tf_list(), &Confidence::HIGH).unwrap_err();
        assert!(matches!(err, AnalysisError::EmptyNetwork { total: 1 }));
    }

    #[test]
    fn test_edges_from_selects_sources() {
        let interactions = vec![
            raw("TFA", "GENE1", Confidence::A, ModeOfRegulation::Activation),
            raw("TFB", "GENE2", Confidence::A, ModeOfRegulation::Activation),
        ];
        let set = build_regulons(&interactions, &tf_list(), &Confidence::HIGH).unwrap();
        let selected: BTreeSet<GeneSymbol> = [GeneSymbol::new("TFB").unwrap()].into();

        let edges: Vec<_> = set.edges_from(&selected).collect();
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].target.as_str(), "GENE2");
    }
}
