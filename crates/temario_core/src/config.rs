use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::node::Level;

/// Recommended word-count band for a description.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct WordRange {
    pub min: usize,
    pub max: usize,
}

impl WordRange {
    pub fn contains(&self, words: usize) -> bool {
        words >= self.min && words <= self.max
    }
}

/// Explicit configuration for the validator and analyzer.
///
/// Passed into constructors instead of being read from process-wide state,
/// so repeated runs with different thresholds never interfere.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CurationConfig {
    /// Hard minimum keyword count; fewer is a warning.
    pub min_keywords: usize,
    /// Recommended keyword band; outside it is a (milder) warning.
    pub recommended_keywords: WordRange,
    /// Absolute description word-count bounds, any level.
    pub description_words: WordRange,
    /// Per-level recommended description word-count bands.
    pub l1_description_words: WordRange,
    pub l2_description_words: WordRange,
    pub l3_description_words: WordRange,
    /// Branching imbalance ratios (max/min) that trigger a warning.
    pub l2_imbalance_ratio: f64,
    pub l3_imbalance_ratio: f64,
    /// Share of generic keywords above which a node is flagged.
    pub generic_keyword_ratio: f64,
    /// Sibling keyword-overlap ratio above which a pair is flagged.
    pub keyword_overlap_ratio: f64,
    /// Cosine similarity above which sibling descriptions are redundant.
    pub similarity_threshold: f32,
    /// Pair count for the human-readable "top N" similarity view.
    pub top_pairs: usize,
    /// Terms considered too generic to distinguish themes.
    pub generic_keywords: BTreeSet<String>,
}

impl Default for CurationConfig {
    fn default() -> Self {
        CurationConfig {
            min_keywords: 5,
            recommended_keywords: WordRange { min: 8, max: 15 },
            description_words: WordRange { min: 30, max: 200 },
            l1_description_words: WordRange { min: 80, max: 200 },
            l2_description_words: WordRange { min: 50, max: 150 },
            l3_description_words: WordRange { min: 30, max: 100 },
            l2_imbalance_ratio: 3.0,
            l3_imbalance_ratio: 5.0,
            generic_keyword_ratio: 0.3,
            keyword_overlap_ratio: 0.5,
            similarity_threshold: 0.85,
            top_pairs: 10,
            generic_keywords: default_generic_keywords(),
        }
    }
}

impl CurationConfig {
    /// Parse a TOML document, falling back to defaults for absent keys.
    pub fn from_toml(content: &str) -> Result<CurationConfig, String> {
        toml::from_str(content).map_err(|e| format!("parse curation config: {}", e))
    }

    /// Recommended description band for a level.
    pub fn recommended_description_words(&self, level: Level) -> WordRange {
        match level {
            Level::L1 => self.l1_description_words,
            Level::L2 => self.l2_description_words,
            Level::L3 => self.l3_description_words,
        }
    }
}

fn default_generic_keywords() -> BTreeSet<String> {
    [
        "brasil",
        "governo",
        "federal",
        "nacional",
        "brasileiro",
        "brasileira",
        "país",
        "estado",
        "município",
        "público",
        "pública",
        "programa",
        "projeto",
        "ação",
        "política",
        "políticas",
        "sistema",
        "serviço",
    ]
    .into_iter()
    .map(|s| s.to_string())
    .collect()
}
