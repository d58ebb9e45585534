use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use temario_core::{walk, CurationConfig, Finding, Level, ThemeNode, ThemeTree};
use temario_embed::{similarity_matrix, EmbedError, EmbedProvider};

/// Tunables for a similarity run. The threshold may be overridden per call.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct AnalyzerOptions {
    pub threshold: f32,
    pub top_n: usize,
}

impl Default for AnalyzerOptions {
    fn default() -> Self {
        AnalyzerOptions {
            threshold: 0.85,
            top_n: 10,
        }
    }
}

impl From<&CurationConfig> for AnalyzerOptions {
    fn from(config: &CurationConfig) -> Self {
        AnalyzerOptions {
            threshold: config.similarity_threshold,
            top_n: config.top_pairs,
        }
    }
}

/// How much a redundant pair matters. Subtopics (L2) are expected to be
/// reasonably distinct; leaf categories (L3) naturally cluster more
/// tightly, so the same numeric threshold carries a looser implied
/// tolerance there.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PairSeverity {
    Medium,
    Low,
}

impl std::fmt::Display for PairSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PairSeverity::Medium => f.write_str("medium"),
            PairSeverity::Low => f.write_str("low"),
        }
    }
}

/// Two sibling nodes whose descriptions scored above the threshold.
/// Derived and ephemeral: produced per analysis run, never part of the tree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimilarityPair {
    pub code_a: String,
    pub label_a: String,
    pub code_b: String,
    pub label_b: String,
    pub level: Level,
    pub parent: String,
    pub score: f32,
    pub severity: PairSeverity,
}

/// Outcome of analyzing one hierarchy level.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LevelAnalysis {
    pub level: Level,
    /// Sibling groups large enough to compare (≥ 2 embeddable nodes).
    pub groups_compared: usize,
    pub pairs: Vec<SimilarityPair>,
    /// Data-quality notes (nodes skipped for missing descriptions).
    pub notes: Vec<Finding>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalyzerReport {
    pub threshold: f32,
    pub l2_pair_count: usize,
    pub l3_pair_count: usize,
    /// All flagged pairs across levels, ranked by descending score.
    pub pairs: Vec<SimilarityPair>,
    pub notes: Vec<Finding>,
}

impl AnalyzerReport {
    /// Human-summary view: the highest-scoring pairs only.
    pub fn top(&self, n: usize) -> &[SimilarityPair] {
        &self.pairs[..self.pairs.len().min(n)]
    }
}

/// Detects sibling nodes with semantically redundant descriptions, using
/// embedding cosine similarity as the redundancy proxy.
pub struct SimilarityAnalyzer<P> {
    provider: P,
    options: AnalyzerOptions,
}

impl<P: EmbedProvider> SimilarityAnalyzer<P> {
    pub fn new(provider: P, options: AnalyzerOptions) -> SimilarityAnalyzer<P> {
        SimilarityAnalyzer { provider, options }
    }

    pub fn options(&self) -> AnalyzerOptions {
        self.options
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Analyze one level with the configured threshold.
    pub fn analyze_level(
        &self,
        tree: &ThemeTree,
        level: Level,
    ) -> Result<LevelAnalysis, EmbedError> {
        self.analyze_level_with_threshold(tree, level, self.options.threshold)
    }

    /// Analyze one level with an explicit threshold override.
    pub fn analyze_level_with_threshold(
        &self,
        tree: &ThemeTree,
        level: Level,
        threshold: f32,
    ) -> Result<LevelAnalysis, EmbedError> {
        let severity = severity_for(level);
        let mut analysis = LevelAnalysis {
            level,
            groups_compared: 0,
            pairs: Vec::new(),
            notes: Vec::new(),
        };

        for (parent, siblings) in group_siblings(tree, level) {
            // A node without a description cannot be embedded meaningfully;
            // record the omission and compare the rest of the group.
            let mut embeddable: Vec<&ThemeNode> = Vec::new();
            for node in siblings {
                if node.description_text().is_some() {
                    embeddable.push(node);
                } else {
                    analysis.notes.push(Finding::info(
                        "sibling-similarity/missing-description",
                        &node.code,
                        "description empty or missing; node skipped from similarity analysis"
                            .to_string(),
                    ));
                }
            }
            if embeddable.len() <= 1 {
                continue;
            }
            analysis.groups_compared += 1;

            let descriptions: Vec<String> = embeddable
                .iter()
                .map(|n| n.description_text().unwrap_or_default().to_string())
                .collect();
            let embeddings = self.provider.encode(&descriptions)?;
            if embeddings.len() != descriptions.len() {
                return Err(EmbedError::Protocol(format!(
                    "provider returned {} vectors for {} descriptions",
                    embeddings.len(),
                    descriptions.len()
                )));
            }

            let matrix = similarity_matrix(&embeddings);
            // Strict upper triangle: self-pairs are excluded from
            // enumeration, not merely filtered out of the report.
            for i in 0..embeddable.len() {
                for j in (i + 1)..embeddable.len() {
                    let score = matrix[i][j];
                    if score > threshold {
                        analysis.pairs.push(SimilarityPair {
                            code_a: embeddable[i].code.clone(),
                            label_a: embeddable[i].label.clone(),
                            code_b: embeddable[j].code.clone(),
                            label_b: embeddable[j].label.clone(),
                            level,
                            parent: parent.clone(),
                            score,
                            severity,
                        });
                    }
                }
            }
        }

        rank_pairs(&mut analysis.pairs);
        Ok(analysis)
    }

    /// Analyze L2 then L3 siblings and merge into one ranked report.
    pub fn run(&self, tree: &ThemeTree) -> Result<AnalyzerReport, EmbedError> {
        let l2 = self.analyze_level(tree, Level::L2)?;
        let l3 = self.analyze_level(tree, Level::L3)?;

        let l2_pair_count = l2.pairs.len();
        let l3_pair_count = l3.pairs.len();

        let mut pairs = l2.pairs;
        pairs.extend(l3.pairs);
        rank_pairs(&mut pairs);

        let mut notes = l2.notes;
        notes.extend(l3.notes);

        Ok(AnalyzerReport {
            threshold: self.options.threshold,
            l2_pair_count,
            l3_pair_count,
            pairs,
            notes,
        })
    }
}

/// Partition the nodes of one level into sibling groups keyed by the parent
/// code implied by their own codes. Groups of one cannot be compared but
/// are still returned, so callers can account for skipped nodes.
pub fn group_siblings(tree: &ThemeTree, level: Level) -> BTreeMap<String, Vec<&ThemeNode>> {
    let mut groups: BTreeMap<String, Vec<&ThemeNode>> = BTreeMap::new();
    for visit in walk(tree) {
        if visit.node.level() != Some(level) {
            continue;
        }
        let parent = visit
            .node
            .implied_parent_code()
            .unwrap_or_else(|| "ROOT".to_string());
        groups.entry(parent).or_default().push(visit.node);
    }
    groups
}

fn severity_for(level: Level) -> PairSeverity {
    match level {
        Level::L3 => PairSeverity::Low,
        _ => PairSeverity::Medium,
    }
}

fn rank_pairs(pairs: &mut [SimilarityPair]) {
    pairs.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.code_a.cmp(&b.code_a))
            .then_with(|| a.code_b.cmp(&b.code_b))
    });
}
