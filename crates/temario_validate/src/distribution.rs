use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use temario_core::{CurationConfig, Finding, ThemeTree};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct DistributionStats {
    pub min: usize,
    pub max: usize,
    pub mean: f64,
}

impl DistributionStats {
    fn from_counts<I: Iterator<Item = usize>>(counts: I) -> DistributionStats {
        let (mut min, mut max, mut sum, mut n) = (usize::MAX, 0usize, 0usize, 0usize);
        for c in counts {
            min = min.min(c);
            max = max.max(c);
            sum += c;
            n += 1;
        }
        if n == 0 {
            return DistributionStats::default();
        }
        DistributionStats {
            min,
            max,
            mean: sum as f64 / n as f64,
        }
    }

    /// Max/min ratio, or 0 when the minimum is 0 (no meaningful ratio).
    pub fn imbalance(&self) -> f64 {
        if self.min == 0 {
            0.0
        } else {
            self.max as f64 / self.min as f64
        }
    }
}

/// One L1 theme with its branching counts, for report tables.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct L1Row {
    pub code: String,
    pub label: String,
    pub l2_count: usize,
    pub l3_total: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Distribution {
    pub l1: Vec<L1Row>,
    pub l2_per_l1: BTreeMap<String, usize>,
    pub l3_per_l2: BTreeMap<String, usize>,
    pub l2_stats: DistributionStats,
    pub l3_stats: DistributionStats,
}

/// Count L2 children per L1 and L3 children per L2, and flag branching
/// imbalance above the configured max/min ratios. The ratios are heuristic
/// taxonomy-design smells, so violations are warnings.
pub fn calculate_distribution_stats(
    tree: &ThemeTree,
    config: &CurationConfig,
) -> (Distribution, Vec<Finding>) {
    let mut dist = Distribution::default();

    for l1 in &tree.themes {
        let mut l3_total = 0;
        for l2 in &l1.children {
            l3_total += l2.children.len();
            dist.l3_per_l2.insert(l2.code.clone(), l2.children.len());
        }
        dist.l2_per_l1.insert(l1.code.clone(), l1.children.len());
        dist.l1.push(L1Row {
            code: l1.code.clone(),
            label: l1.label.clone(),
            l2_count: l1.children.len(),
            l3_total,
        });
    }

    dist.l2_stats = DistributionStats::from_counts(dist.l2_per_l1.values().copied());
    dist.l3_stats = DistributionStats::from_counts(dist.l3_per_l2.values().copied());

    let mut findings = Vec::new();
    let l2_ratio = dist.l2_stats.imbalance();
    if l2_ratio > config.l2_imbalance_ratio {
        findings.push(Finding::warning(
            "tree-distribution/l2-imbalance",
            "",
            format!(
                "L2-per-L1 branching is skewed: ratio {:.1}:1 (min {}, max {})",
                l2_ratio, dist.l2_stats.min, dist.l2_stats.max
            ),
        ));
    }
    let l3_ratio = dist.l3_stats.imbalance();
    if l3_ratio > config.l3_imbalance_ratio {
        findings.push(Finding::warning(
            "tree-distribution/l3-imbalance",
            "",
            format!(
                "L3-per-L2 branching is skewed: ratio {:.1}:1 (min {}, max {})",
                l3_ratio, dist.l3_stats.min, dist.l3_stats.max
            ),
        ));
    }

    (dist, findings)
}
