use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use temario_core::{walk, Finding, ThemeTree};

/// Node totals per hierarchy level, filled in during the hierarchy check.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LevelCounts {
    pub l1: usize,
    pub l2: usize,
    pub l3: usize,
}

impl LevelCounts {
    pub fn total(&self) -> usize {
        self.l1 + self.l2 + self.l3
    }
}

/// Check that codes are unique tree-wide (duplicates are errors) and that
/// labels are unique (duplicates are warnings: redundant concepts, not
/// structural damage).
pub fn validate_uniqueness(tree: &ThemeTree) -> Vec<Finding> {
    let mut code_occurrences: BTreeMap<String, Vec<String>> = BTreeMap::new();
    let mut label_counts: BTreeMap<String, usize> = BTreeMap::new();

    for visit in walk(tree) {
        let location = format!("{} -> {}", visit.parent_code(), visit.node.label);
        code_occurrences
            .entry(visit.node.code.clone())
            .or_default()
            .push(location);
        if !visit.node.label.is_empty() {
            *label_counts.entry(visit.node.label.clone()).or_insert(0) += 1;
        }
    }

    let mut findings = Vec::new();

    for (code, locations) in &code_occurrences {
        if locations.len() > 1 {
            findings.push(Finding::error(
                "tree-structure/duplicate-code",
                code,
                format!(
                    "code `{}` appears {} times: {}",
                    code,
                    locations.len(),
                    locations.join(", ")
                ),
            ));
        }
    }

    for (label, count) in &label_counts {
        if *count > 1 {
            findings.push(Finding::warning(
                "tree-structure/duplicate-label",
                "",
                format!("label `{}` appears {} times", label, count),
            ));
        }
    }

    findings
}

/// Check parent/child code numbering level by level and count nodes.
///
/// An L2 code must extend its L1 parent's code with a dot, and likewise for
/// L3 under L2. This catches both true orphans and ghost parent/child
/// mismatches from partial edits. L3 nodes must be leaves.
pub fn validate_hierarchy(tree: &ThemeTree) -> (LevelCounts, Vec<Finding>) {
    let mut counts = LevelCounts::default();
    let mut findings = Vec::new();

    for l1 in &tree.themes {
        counts.l1 += 1;
        check_code_depth(&l1.code, 1, &mut findings);

        for l2 in &l1.children {
            counts.l2 += 1;
            check_prefix(&l2.code, &l1.code, "L2", &mut findings);
            check_code_depth(&l2.code, 2, &mut findings);

            for l3 in &l2.children {
                counts.l3 += 1;
                check_prefix(&l3.code, &l2.code, "L3", &mut findings);
                check_code_depth(&l3.code, 3, &mut findings);

                if !l3.children.is_empty() {
                    findings.push(Finding::error(
                        "tree-structure/too-deep",
                        &l3.code,
                        format!(
                            "L3 node `{}` has {} children; the tree is three levels deep",
                            l3.code,
                            l3.children.len()
                        ),
                    ));
                }
            }
        }
    }

    (counts, findings)
}

fn check_prefix(child_code: &str, parent_code: &str, level: &str, findings: &mut Vec<Finding>) {
    let expected = format!("{}.", parent_code);
    if !child_code.starts_with(&expected) {
        findings.push(Finding::error(
            "tree-structure/code-prefix-mismatch",
            child_code,
            format!(
                "{} node `{}` is not numbered under its parent `{}`",
                level, child_code, parent_code
            ),
        ));
    }
}

fn check_code_depth(code: &str, expected: usize, findings: &mut Vec<Finding>) {
    if code.is_empty() {
        // Missing codes are reported by the required-field check.
        return;
    }
    let depth = code.split('.').count();
    if depth != expected {
        findings.push(Finding::error(
            "tree-structure/bad-depth",
            code,
            format!(
                "code `{}` has {} segment(s) but sits at depth {}",
                code, depth, expected
            ),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use temario_core::{load_tree_str, Severity};

    fn tree(yaml: &str) -> ThemeTree {
        load_tree_str(yaml).unwrap()
    }

    #[test]
    fn unique_tree_has_no_findings() {
        let t = tree(
            r#"
themes:
  - code: "01"
    label: Saúde
    children:
      - code: "01.01"
        label: Atenção Básica
  - code: "02"
    label: Educação
"#,
        );
        assert!(validate_uniqueness(&t).is_empty());
    }

    #[test]
    fn duplicate_code_is_one_error_naming_the_code() {
        let t = tree(
            r#"
themes:
  - code: "01"
    label: Saúde
    children:
      - code: "01.01"
        label: Atenção Básica
      - code: "01.01"
        label: Hospitais
"#,
        );
        let findings = validate_uniqueness(&t);
        let errors: Vec<_> = findings
            .iter()
            .filter(|f| f.severity == Severity::Error)
            .collect();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].code, "01.01");
        assert!(errors[0].message.contains("2 times"));
        assert!(errors[0].message.contains("01 -> Atenção Básica"));
    }

    #[test]
    fn duplicate_label_is_warning_not_error() {
        let t = tree(
            r#"
themes:
  - code: "01"
    label: Saúde
  - code: "02"
    label: Saúde
"#,
        );
        let findings = validate_uniqueness(&t);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Warning);
        assert_eq!(findings[0].rule_id, "tree-structure/duplicate-label");
    }

    #[test]
    fn mis_prefixed_l2_is_exactly_one_error() {
        let t = tree(
            r#"
themes:
  - code: "01"
    label: Saúde
    children:
      - code: "01.01"
        label: Atenção Básica
      - code: "02.01"
        label: Hospitais
"#,
        );
        let (counts, findings) = validate_hierarchy(&t);
        assert_eq!(counts.l1, 1);
        assert_eq!(counts.l2, 2);
        let errors: Vec<_> = findings
            .iter()
            .filter(|f| f.rule_id == "tree-structure/code-prefix-mismatch")
            .collect();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].code, "02.01");
    }

    #[test]
    fn l3_prefix_checked_against_l2_parent() {
        let t = tree(
            r#"
themes:
  - code: "03"
    label: Economia
    children:
      - code: "03.01"
        label: Tributos
        children:
          - code: "03.01.01"
            label: Imposto de Renda
          - code: "03.02.01"
            label: Reforma Tributária
"#,
        );
        let (counts, findings) = validate_hierarchy(&t);
        assert_eq!(counts.l3, 2);
        let errors: Vec<_> = findings
            .iter()
            .filter(|f| f.rule_id == "tree-structure/code-prefix-mismatch")
            .collect();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].code, "03.02.01");
    }

    #[test]
    fn children_under_l3_are_rejected() {
        let t = tree(
            r#"
themes:
  - code: "01"
    label: Saúde
    children:
      - code: "01.01"
        label: Atenção Básica
        children:
          - code: "01.01.01"
            label: Postos
            children:
              - code: "01.01.01.01"
                label: Demais
"#,
        );
        let (_, findings) = validate_hierarchy(&t);
        assert!(findings
            .iter()
            .any(|f| f.rule_id == "tree-structure/too-deep" && f.code == "01.01.01"));
    }

    #[test]
    fn code_depth_must_match_position() {
        let t = tree(
            r#"
themes:
  - code: "01.02"
    label: Deslocado
"#,
        );
        let (_, findings) = validate_hierarchy(&t);
        assert!(findings
            .iter()
            .any(|f| f.rule_id == "tree-structure/bad-depth" && f.code == "01.02"));
    }
}
