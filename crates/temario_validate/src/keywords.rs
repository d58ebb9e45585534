use std::collections::{BTreeMap, BTreeSet};

use temario_core::{walk, CurationConfig, Finding, Level, ThemeNode, ThemeTree};

/// Keyword-quality signals: count bands, overly generic terms, and sibling
/// overlap. All warnings; the hard minimum lives in the required-field
/// check so a sparse node is flagged exactly once.
pub fn check_keywords(tree: &ThemeTree, config: &CurationConfig) -> Vec<Finding> {
    let mut findings = Vec::new();

    for visit in walk(tree) {
        let node = visit.node;
        if node.keywords.is_empty() {
            continue;
        }

        let count = node.keywords.len();
        if count >= config.min_keywords {
            let band = config.recommended_keywords;
            if count < band.min {
                findings.push(Finding::warning(
                    "keyword-quality/below-recommended",
                    &node.code,
                    format!(
                        "{} keywords, below the recommended {}-{}",
                        count, band.min, band.max
                    ),
                ));
            } else if count > band.max {
                findings.push(Finding::warning(
                    "keyword-quality/too-many",
                    &node.code,
                    format!(
                        "{} keywords, above the recommended {}-{}",
                        count, band.min, band.max
                    ),
                ));
            }
        }

        let generic: Vec<&str> = node
            .keywords
            .iter()
            .map(|k| k.trim())
            .filter(|k| config.generic_keywords.contains(&k.to_lowercase()))
            .collect();
        if !generic.is_empty() {
            let ratio = generic.len() as f64 / count as f64;
            if ratio > config.generic_keyword_ratio {
                findings.push(Finding::warning(
                    "keyword-quality/generic-terms",
                    &node.code,
                    format!(
                        "{} of {} keywords are generic ({}): add distinctive terms",
                        generic.len(),
                        count,
                        generic.join(", ")
                    ),
                ));
            }
        }
    }

    findings.extend(check_sibling_overlap(tree, Level::L2, config));
    findings.extend(check_sibling_overlap(tree, Level::L3, config));
    findings
}

fn check_sibling_overlap(
    tree: &ThemeTree,
    level: Level,
    config: &CurationConfig,
) -> Vec<Finding> {
    let mut groups: BTreeMap<String, Vec<&ThemeNode>> = BTreeMap::new();
    for visit in walk(tree) {
        if visit.node.level() == Some(level) {
            if let Some(parent) = visit.node.implied_parent_code() {
                groups.entry(parent).or_default().push(visit.node);
            }
        }
    }

    let mut findings = Vec::new();
    for siblings in groups.values() {
        if siblings.len() <= 1 {
            continue;
        }
        for (i, a) in siblings.iter().enumerate() {
            let set_a = lowercase_set(&a.keywords);
            if set_a.is_empty() {
                continue;
            }
            for b in &siblings[i + 1..] {
                let set_b = lowercase_set(&b.keywords);
                if set_b.is_empty() {
                    continue;
                }
                let shared: Vec<&String> = set_a.intersection(&set_b).collect();
                let ratio = shared.len() as f64 / set_a.len().min(set_b.len()) as f64;
                if ratio > config.keyword_overlap_ratio {
                    findings.push(Finding::warning(
                        "keyword-quality/sibling-overlap",
                        &a.code,
                        format!(
                            "siblings `{}` and `{}` share {} keyword(s) ({:.0}%): {}",
                            a.code,
                            b.code,
                            shared.len(),
                            ratio * 100.0,
                            shared
                                .iter()
                                .map(|s| s.as_str())
                                .collect::<Vec<_>>()
                                .join(", ")
                        ),
                    ));
                }
            }
        }
    }
    findings
}

fn lowercase_set(keywords: &[String]) -> BTreeSet<String> {
    keywords.iter().map(|k| k.trim().to_lowercase()).collect()
}
