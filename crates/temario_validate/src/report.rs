use serde::{Deserialize, Serialize};

use temario_core::{CurationConfig, Finding, Severity, ThemeTree};

use crate::distribution::{calculate_distribution_stats, Distribution};
use crate::fields::validate_required_fields;
use crate::keywords::check_keywords;
use crate::quality::{check_description_quality, WordStats};
use crate::structure::{validate_hierarchy, validate_uniqueness, LevelCounts};

/// Structural and content-quality validation of a loaded theme tree.
///
/// All checks accumulate their findings; nothing stops at the first
/// problem, so one run surfaces the complete problem set.
#[derive(Debug, Clone)]
pub struct TreeValidator {
    config: CurationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValidationReport {
    pub counts: LevelCounts,
    pub distribution: Distribution,
    pub word_stats: WordStats,
    pub findings: Vec<Finding>,
}

impl ValidationReport {
    pub fn errors(&self) -> impl Iterator<Item = &Finding> {
        self.findings
            .iter()
            .filter(|f| f.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Finding> {
        self.findings
            .iter()
            .filter(|f| f.severity == Severity::Warning)
    }

    pub fn error_count(&self) -> usize {
        self.errors().count()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings().count()
    }

    /// False iff at least one error was recorded. Warnings never fail a run.
    pub fn passed(&self) -> bool {
        self.error_count() == 0
    }
}

impl TreeValidator {
    pub fn new(config: CurationConfig) -> TreeValidator {
        TreeValidator { config }
    }

    pub fn config(&self) -> &CurationConfig {
        &self.config
    }

    pub fn validate_uniqueness(&self, tree: &ThemeTree) -> Vec<Finding> {
        validate_uniqueness(tree)
    }

    pub fn validate_hierarchy(&self, tree: &ThemeTree) -> (LevelCounts, Vec<Finding>) {
        validate_hierarchy(tree)
    }

    pub fn validate_required_fields(&self, tree: &ThemeTree) -> Vec<Finding> {
        validate_required_fields(tree, &self.config)
    }

    pub fn calculate_distribution_stats(
        &self,
        tree: &ThemeTree,
    ) -> (Distribution, Vec<Finding>) {
        calculate_distribution_stats(tree, &self.config)
    }

    /// Run every check and collect one deterministic report.
    pub fn run(&self, tree: &ThemeTree) -> ValidationReport {
        let mut findings = validate_uniqueness(tree);

        let (counts, hierarchy_findings) = validate_hierarchy(tree);
        findings.extend(hierarchy_findings);

        findings.extend(validate_required_fields(tree, &self.config));

        let (distribution, dist_findings) = calculate_distribution_stats(tree, &self.config);
        findings.extend(dist_findings);

        let (word_stats, quality_findings) = check_description_quality(tree, &self.config);
        findings.extend(quality_findings);

        findings.extend(check_keywords(tree, &self.config));

        // Deterministic order: anchored code first, then rule, keeping the
        // per-check emission order for ties.
        findings.sort_by(|a, b| a.code.cmp(&b.code).then_with(|| a.rule_id.cmp(&b.rule_id)));

        ValidationReport {
            counts,
            distribution,
            word_stats,
            findings,
        }
    }
}
