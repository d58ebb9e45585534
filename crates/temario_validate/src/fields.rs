use std::collections::BTreeMap;

use temario_core::{walk, CurationConfig, Finding, Level, ThemeTree};

const REQUIRED_FIELDS: [&str; 4] = ["code", "label", "description", "keywords"];
const LISTED_CODES: usize = 5;

/// Check that every node carries the required fields, that keyword counts
/// reach the hard minimum, and that L1 nodes declare scope boundaries.
///
/// Absent required fields are errors aggregated per field name; sparse
/// keywords and missing includes/excludes are warnings.
pub fn validate_required_fields(tree: &ThemeTree, config: &CurationConfig) -> Vec<Finding> {
    let mut missing_by_field: BTreeMap<&'static str, Vec<String>> = BTreeMap::new();
    let mut findings = Vec::new();

    for visit in walk(tree) {
        let node = visit.node;
        let code_or_path = if node.code.is_empty() {
            visit.path()
        } else {
            node.code.clone()
        };

        if node.code.is_empty() {
            missing_by_field.entry("code").or_default().push(visit.path());
        }
        if node.label.is_empty() {
            missing_by_field
                .entry("label")
                .or_default()
                .push(code_or_path.clone());
        }
        if node.description_text().is_none() {
            missing_by_field
                .entry("description")
                .or_default()
                .push(code_or_path.clone());
        }
        if node.keywords.is_empty() {
            missing_by_field
                .entry("keywords")
                .or_default()
                .push(code_or_path.clone());
        } else if node.keywords.len() < config.min_keywords {
            findings.push(Finding::warning(
                "tree-fields/insufficient-keywords",
                &node.code,
                format!(
                    "only {} keyword(s), minimum is {}",
                    node.keywords.len(),
                    config.min_keywords
                ),
            ));
        }

        if node.level() == Some(Level::L1) {
            if node.includes.is_empty() {
                findings.push(Finding::warning(
                    "tree-fields/missing-includes",
                    &node.code,
                    "L1 node has no `includes` scope boundary".to_string(),
                ));
            }
            if node.excludes.is_empty() {
                findings.push(Finding::warning(
                    "tree-fields/missing-excludes",
                    &node.code,
                    "L1 node has no `excludes` scope boundary".to_string(),
                ));
            }
        }
    }

    for field in REQUIRED_FIELDS {
        let Some(codes) = missing_by_field.get(field) else {
            continue;
        };
        let mut listed = codes
            .iter()
            .take(LISTED_CODES)
            .cloned()
            .collect::<Vec<_>>()
            .join(", ");
        if codes.len() > LISTED_CODES {
            listed.push_str(&format!(", +{} more", codes.len() - LISTED_CODES));
        }
        findings.push(Finding::error(
            "tree-fields/missing-required-field",
            "",
            format!(
                "field `{}` missing or empty on {} node(s): {}",
                field,
                codes.len(),
                listed
            ),
        ));
    }

    findings
}

#[cfg(test)]
mod tests {
    use super::*;
    use temario_core::{load_tree_str, Severity};

    fn config() -> CurationConfig {
        CurationConfig::default()
    }

    #[test]
    fn complete_node_yields_nothing() {
        let tree = load_tree_str(
            r#"
themes:
  - code: "01"
    label: Saúde
    description: Políticas públicas de saúde, rede hospitalar e vigilância sanitária no país.
    keywords: [sus, hospitais, vacinação, vigilância, médicos]
    includes: [Campanhas de vacinação]
    excludes: [Pesquisa acadêmica]
"#,
        )
        .unwrap();
        assert!(validate_required_fields(&tree, &config()).is_empty());
    }

    #[test]
    fn three_keywords_is_exactly_one_insufficient_warning() {
        let tree = load_tree_str(
            r#"
themes:
  - code: "01"
    label: Saúde
    description: Políticas públicas de saúde, rede hospitalar e vigilância sanitária no país.
    keywords: [a, b, c]
    includes: [x]
    excludes: [y]
"#,
        )
        .unwrap();
        let findings = validate_required_fields(&tree, &config());
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].rule_id, "tree-fields/insufficient-keywords");
        assert_eq!(findings[0].severity, Severity::Warning);
        assert!(findings[0].message.contains("only 3"));
    }

    #[test]
    fn missing_fields_aggregate_per_field() {
        let tree = load_tree_str(
            r#"
themes:
  - code: "01"
    label: Saúde
    description: Texto.
    keywords: [sus, hospitais, vacinação, vigilância, médicos]
    includes: [x]
    excludes: [y]
    children:
      - code: "01.01"
      - code: "01.02"
"#,
        )
        .unwrap();
        let findings = validate_required_fields(&tree, &config());
        let errors: Vec<_> = findings
            .iter()
            .filter(|f| f.rule_id == "tree-fields/missing-required-field")
            .collect();
        // label, description, keywords each missing on the two L2 nodes.
        assert_eq!(errors.len(), 3);
        for e in &errors {
            assert!(e.message.contains("2 node(s)"));
            assert!(e.message.contains("01.01"));
            assert!(e.message.contains("01.02"));
        }
    }

    #[test]
    fn l1_without_scope_boundaries_is_warned() {
        let tree = load_tree_str(
            r#"
themes:
  - code: "02"
    label: Educação
    description: Ensino básico e superior, financiamento estudantil e formação docente.
    keywords: [escolas, enem, universidades, professores, merenda]
"#,
        )
        .unwrap();
        let findings = validate_required_fields(&tree, &config());
        assert!(findings
            .iter()
            .any(|f| f.rule_id == "tree-fields/missing-includes" && f.code == "02"));
        assert!(findings
            .iter()
            .any(|f| f.rule_id == "tree-fields/missing-excludes" && f.code == "02"));
    }

    #[test]
    fn l2_nodes_are_not_held_to_scope_boundaries() {
        let tree = load_tree_str(
            r#"
themes:
  - code: "02"
    label: Educação
    description: Ensino básico e superior, financiamento estudantil e formação docente.
    keywords: [escolas, enem, universidades, professores, merenda]
    includes: [x]
    excludes: [y]
    children:
      - code: "02.01"
        label: Ensino Superior
        description: Universidades federais, acesso e financiamento estudantil.
        keywords: [universidades, fies, prouni, sisu, reitoria]
"#,
        )
        .unwrap();
        let findings = validate_required_fields(&tree, &config());
        assert!(findings.is_empty(), "unexpected: {findings:?}");
    }
}
