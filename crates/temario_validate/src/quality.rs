use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use temario_core::{walk, CurationConfig, Finding, Level, ThemeTree};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct LevelWordStats {
    pub nodes: usize,
    pub mean: f64,
    pub median: f64,
    pub min: usize,
    pub max: usize,
}

/// Description word-count statistics per level.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct WordStats {
    pub per_level: BTreeMap<Level, LevelWordStats>,
}

/// Check description lengths against the absolute bounds and the per-level
/// recommended bands. Everything here is a quality signal (warnings);
/// missing descriptions belong to the required-field check.
pub fn check_description_quality(
    tree: &ThemeTree,
    config: &CurationConfig,
) -> (WordStats, Vec<Finding>) {
    let mut counts_per_level: BTreeMap<Level, Vec<usize>> = BTreeMap::new();
    let mut findings = Vec::new();

    for visit in walk(tree) {
        let node = visit.node;
        let Some(level) = node.level() else {
            continue;
        };
        let Some(text) = node.description_text() else {
            continue;
        };

        let words = word_count(text);
        counts_per_level.entry(level).or_default().push(words);

        let absolute = config.description_words;
        if words < absolute.min {
            findings.push(Finding::warning(
                "description-quality/too-short",
                &node.code,
                format!("description has {} words, minimum is {}", words, absolute.min),
            ));
        } else if words > absolute.max {
            findings.push(Finding::warning(
                "description-quality/too-long",
                &node.code,
                format!("description has {} words, maximum is {}", words, absolute.max),
            ));
        }

        let recommended = config.recommended_description_words(level);
        if words < recommended.min {
            findings.push(Finding::warning(
                "description-quality/below-recommended",
                &node.code,
                format!(
                    "{} words, below the {} recommendation of {}-{}",
                    words, level, recommended.min, recommended.max
                ),
            ));
        } else if words > recommended.max {
            findings.push(Finding::warning(
                "description-quality/above-recommended",
                &node.code,
                format!(
                    "{} words, above the {} recommendation of {}-{}",
                    words, level, recommended.min, recommended.max
                ),
            ));
        }
    }

    let mut stats = WordStats::default();
    for (level, mut counts) in counts_per_level {
        counts.sort_unstable();
        let n = counts.len();
        let mean = counts.iter().sum::<usize>() as f64 / n as f64;
        let median = if n % 2 == 1 {
            counts[n / 2] as f64
        } else {
            (counts[n / 2 - 1] + counts[n / 2]) as f64 / 2.0
        };
        stats.per_level.insert(
            level,
            LevelWordStats {
                nodes: n,
                mean,
                median,
                min: counts[0],
                max: counts[n - 1],
            },
        );
    }

    (stats, findings)
}

fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}
