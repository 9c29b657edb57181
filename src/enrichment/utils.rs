use std::collections::BTreeSet;

use ndarray::Array1;

use crate::genes::{GeneSymbol, ReferenceGeneSet};
use crate::regulon::RegulonSet;

/// Reference genes that are the target of at least one regulon.
pub fn universe(regulons: &RegulonSet, reference: &ReferenceGeneSet) -> BTreeSet<GeneSymbol> {
    regulons
        .targets()
        .iter()
        .filter(|t| reference.contains(t.as_str()))
        .cloned()
        .collect()
}

/// Binary hit indicator over the target columns of `regulons`.
pub fn hit_indicator(regulons: &RegulonSet, reference: &ReferenceGeneSet) -> Array1<bool> {
    regulons
        .targets()
        .iter()
        .map(|t| reference.contains(t.as_str()))
        .collect()
}

pub fn count_hits(regulon: &[usize], hits: &Array1<bool>) -> usize {
    regulon.iter().filter(|&&j| hits[j]).count()
}
