//! Markdown rendering for validation and similarity reports.
//!
//! Human-facing only; the JSON output is the stable contract.

use temario_similarity::AnalyzerReport;
use temario_validate::ValidationReport;

pub fn render_validation(report: &ValidationReport, source: &str, generated_at: &str) -> String {
    let mut out: Vec<String> = Vec::new();

    out.push("# Theme Tree Validation Report".to_string());
    out.push(String::new());
    out.push(format!("- Source: `{}`", source));
    out.push(format!("- Generated: {}", generated_at));
    out.push(String::new());

    out.push("## Summary".to_string());
    out.push(String::new());
    out.push(format!("- L1 themes: {}", report.counts.l1));
    out.push(format!("- L2 subthemes: {}", report.counts.l2));
    out.push(format!("- L3 categories: {}", report.counts.l3));
    out.push(format!("- Total nodes: {}", report.counts.total()));
    out.push(format!("- Errors: {}", report.error_count()));
    out.push(format!("- Warnings: {}", report.warning_count()));
    out.push(String::new());

    let status = if !report.passed() {
        format!("FAILED: {} error(s)", report.error_count())
    } else if report.warning_count() > 0 {
        format!("PASSED WITH WARNINGS: {} warning(s)", report.warning_count())
    } else {
        "PASSED: no problems found".to_string()
    };
    out.push(format!("**Status:** {}", status));
    out.push(String::new());

    if report.error_count() > 0 {
        out.push("## Errors".to_string());
        out.push(String::new());
        for (i, f) in report.errors().enumerate() {
            out.push(format!("{}. `{}` {}", i + 1, f.rule_id, f.message));
        }
        out.push(String::new());
    }

    if report.warning_count() > 0 {
        out.push("## Warnings".to_string());
        out.push(String::new());
        for (i, f) in report.warnings().enumerate() {
            out.push(format!("{}. `{}` {}", i + 1, f.rule_id, f.message));
        }
        out.push(String::new());
    }

    out.push("## Distribution".to_string());
    out.push(String::new());
    out.push("### L2 per L1".to_string());
    out.push(String::new());
    let l2 = &report.distribution.l2_stats;
    out.push(format!("- Min: {}", l2.min));
    out.push(format!("- Max: {}", l2.max));
    out.push(format!("- Mean: {:.1}", l2.mean));
    out.push(String::new());
    out.push("### L3 per L2".to_string());
    out.push(String::new());
    let l3 = &report.distribution.l3_stats;
    out.push(format!("- Min: {}", l3.min));
    out.push(format!("- Max: {}", l3.max));
    out.push(format!("- Mean: {:.1}", l3.mean));
    out.push(String::new());

    out.push("### Per-theme detail".to_string());
    out.push(String::new());
    out.push("| Code | Theme | L2 | L3 total |".to_string());
    out.push("|------|-------|---:|---------:|".to_string());
    for row in &report.distribution.l1 {
        out.push(format!(
            "| {} | {} | {} | {} |",
            row.code, row.label, row.l2_count, row.l3_total
        ));
    }
    out.push(String::new());

    if !report.word_stats.per_level.is_empty() {
        out.push("## Description length by level".to_string());
        out.push(String::new());
        out.push("| Level | Nodes | Mean | Median | Min | Max |".to_string());
        out.push("|-------|------:|-----:|-------:|----:|----:|".to_string());
        for (level, stats) in &report.word_stats.per_level {
            out.push(format!(
                "| {} | {} | {:.1} | {:.1} | {} | {} |",
                level, stats.nodes, stats.mean, stats.median, stats.min, stats.max
            ));
        }
        out.push(String::new());
    }

    out.join("\n")
}

pub fn render_similarity(
    report: &AnalyzerReport,
    source: &str,
    model: &str,
    generated_at: &str,
) -> String {
    let mut out: Vec<String> = Vec::new();

    out.push("# Sibling Similarity Report".to_string());
    out.push(String::new());
    out.push(format!("- Source: `{}`", source));
    out.push(format!("- Embedding model: `{}`", model));
    out.push(format!("- Threshold: {}", report.threshold));
    out.push(format!("- Generated: {}", generated_at));
    out.push(String::new());

    out.push("## Summary".to_string());
    out.push(String::new());
    out.push(format!("- L2 pairs above threshold: {}", report.l2_pair_count));
    out.push(format!("- L3 pairs above threshold: {}", report.l3_pair_count));
    out.push(format!("- Skipped nodes: {}", report.notes.len()));
    out.push(String::new());

    if report.pairs.is_empty() {
        out.push("No sibling pair exceeded the similarity threshold.".to_string());
        out.push(String::new());
    } else {
        out.push("## Flagged pairs".to_string());
        out.push(String::new());
        out.push("| Code A | Label A | Code B | Label B | Level | Severity | Score |".to_string());
        out.push("|--------|---------|--------|---------|-------|----------|------:|".to_string());
        for pair in &report.pairs {
            out.push(format!(
                "| {} | {} | {} | {} | {} | {} | {:.3} |",
                pair.code_a,
                pair.label_a,
                pair.code_b,
                pair.label_b,
                pair.level,
                pair.severity,
                pair.score
            ));
        }
        out.push(String::new());

        out.push("## Recommendations".to_string());
        out.push(String::new());
        if report.l2_pair_count > 0 {
            out.push(
                "- Review the flagged L2 subthemes and add distinguishing terms to their \
                 descriptions; near-duplicate subthemes confuse classification."
                    .to_string(),
            );
        }
        if report.l3_pair_count > 0 {
            out.push(
                "- Consider more specific keywords for the flagged L3 categories to keep \
                 leaf boundaries separable."
                    .to_string(),
            );
        }
        out.push(String::new());
    }

    if !report.notes.is_empty() {
        out.push("## Skipped nodes".to_string());
        out.push(String::new());
        for note in &report.notes {
            out.push(format!("- `{}`: {}", note.code, note.message));
        }
        out.push(String::new());
    }

    out.join("\n")
}
