//! Transcription factor regulons.
//!
//! A regulon is the set of target genes a transcription factor directly
//! regulates. Regulons are derived from a curated TF-target interaction
//! table in which every edge carries a confidence tier (A = strongest
//! evidence, E = weakest) and a mode of regulation (activation or
//! repression).
//!
//! ## Module Organization
//!
//! - **[`network`]**: filtering interactions into a [`RegulonSet`] and its sparse TF × target index

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::genes::GeneSymbol;

pub mod network;

pub use network::{RegulonSet, build_regulons};

/// Evidence tier of a TF-target interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Confidence {
    A,
    B,
    C,
    D,
    E,
}

impl Confidence {
    /// Tiers retained by default.
    pub const HIGH: [Confidence; 2] = [Confidence::A, Confidence::B];

    /// Fixed tier → likelihood table.
    pub fn likelihood(self) -> f64 {
        match self {
            Confidence::A => 1.0,
            Confidence::B => 0.75,
            Confidence::C => 0.5,
            Confidence::D => 0.25,
            Confidence::E => 0.05,
        }
    }
}

impl FromStr for Confidence {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" => Ok(Confidence::A),
            "B" => Ok(Confidence::B),
            "C" => Ok(Confidence::C),
            "D" => Ok(Confidence::D),
            "E" => Ok(Confidence::E),
            other => Err(format!("unknown confidence tier '{other}'")),
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            Confidence::A => "A",
            Confidence::B => "B",
            Confidence::C => "C",
            Confidence::D => "D",
            Confidence::E => "E",
        };
        f.write_str(letter)
    }
}

/// Sign of the regulatory effect on the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModeOfRegulation {
    Activation,
    Repression,
}

impl ModeOfRegulation {
    pub fn sign(self) -> i8 {
        match self {
            ModeOfRegulation::Activation => 1,
            ModeOfRegulation::Repression => -1,
        }
    }
}

impl FromStr for ModeOfRegulation {
    type Err = String;

    /// Accepts `1`, `+1`, `-1` and their float spellings (`1.0`, `-1.0`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: f64 = s
            .trim()
            .parse()
            .map_err(|_| format!("mode of regulation '{}' is not numeric", s.trim()))?;
        if value == 1.0 {
            Ok(ModeOfRegulation::Activation)
        } else if value == -1.0 {
            Ok(ModeOfRegulation::Repression)
        } else {
            Err(format!("mode of regulation must be +1 or -1, got {value}"))
        }
    }
}

impl Serialize for ModeOfRegulation {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i8(self.sign())
    }
}

/// One row of the interaction table as read from disk, before filtering.
#[derive(Debug, Clone, PartialEq)]
pub struct RawInteraction {
    pub tf: String,
    pub target: String,
    pub confidence: Confidence,
    pub mode_of_regulation: ModeOfRegulation,
}

/// A filtered TF → target edge.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegulatoryEdge {
    pub source: GeneSymbol,
    pub target: GeneSymbol,
    pub mode_of_regulation: ModeOfRegulation,
    pub likelihood: f64,
}

impl RegulatoryEdge {
    /// Signed edge weight stored in the incidence matrix.
    pub fn weight(&self) -> f64 {
        f64::from(self.mode_of_regulation.sign()) * self.likelihood
    }
}
