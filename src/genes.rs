//! Gene symbols and reference gene sets.

use std::borrow::Borrow;
use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

/// A normalized (trimmed, uppercase) gene identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct GeneSymbol(String);

impl GeneSymbol {
    /// Normalize a raw symbol. Blank input yields `None`.
    pub fn new(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(GeneSymbol(trimmed.to_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GeneSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for GeneSymbol {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for GeneSymbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A named, immutable set of unique gene symbols (ageing genes, disease
/// genes, the transcription factor list).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceGeneSet {
    name: String,
    genes: BTreeSet<GeneSymbol>,
}

impl ReferenceGeneSet {
    pub fn new(name: impl Into<String>, genes: impl IntoIterator<Item = GeneSymbol>) -> Self {
        ReferenceGeneSet {
            name: name.into(),
            genes: genes.into_iter().collect(),
        }
    }

    /// Build a set from raw strings, normalizing and dropping blanks.
    pub fn from_raw<'a>(name: impl Into<String>, raw: impl IntoIterator<Item = &'a str>) -> Self {
        Self::new(name, raw.into_iter().filter_map(GeneSymbol::new))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.genes.contains(symbol)
    }

    pub fn iter(&self) -> impl Iterator<Item = &GeneSymbol> {
        self.genes.iter()
    }
}
