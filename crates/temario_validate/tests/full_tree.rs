use temario_core::{load_tree_str, CurationConfig, Severity};
use temario_validate::TreeValidator;

const FIXTURE: &str = include_str!("../testdata/themes_tree.yaml");

#[test]
fn curated_fixture_passes_validation() {
    let tree = load_tree_str(FIXTURE).unwrap();
    let report = TreeValidator::new(CurationConfig::default()).run(&tree);

    assert!(
        report.passed(),
        "unexpected errors: {:#?}",
        report.errors().collect::<Vec<_>>()
    );
    assert_eq!(report.counts.l1, 2);
    assert_eq!(report.counts.l2, 4);
    assert_eq!(report.counts.l3, 2);
    assert_eq!(report.counts.total(), 8);
}

#[test]
fn breaking_one_prefix_yields_exactly_one_hierarchy_error() {
    let mut tree = load_tree_str(FIXTURE).unwrap();
    tree.themes[0].children[1].code = "07.02".to_string();

    let report = TreeValidator::new(CurationConfig::default()).run(&tree);
    assert!(!report.passed());
    let prefix_errors: Vec<_> = report
        .findings
        .iter()
        .filter(|f| f.rule_id == "tree-structure/code-prefix-mismatch")
        .collect();
    assert_eq!(prefix_errors.len(), 1);
    assert_eq!(prefix_errors[0].code, "07.02");
    assert_eq!(prefix_errors[0].severity, Severity::Error);
}

#[test]
fn emptying_a_description_is_a_field_error() {
    let mut tree = load_tree_str(FIXTURE).unwrap();
    tree.themes[1].children[0].description = Some("   ".to_string());

    let report = TreeValidator::new(CurationConfig::default()).run(&tree);
    assert!(!report.passed());
    let missing: Vec<_> = report
        .findings
        .iter()
        .filter(|f| f.rule_id == "tree-fields/missing-required-field")
        .collect();
    assert_eq!(missing.len(), 1);
    assert!(missing[0].message.contains("description"));
    assert!(missing[0].message.contains("02.01"));
}

#[test]
fn tighter_config_turns_clean_nodes_into_warnings() {
    let tree = load_tree_str(FIXTURE).unwrap();
    let strict = CurationConfig::from_toml("min_keywords = 9").unwrap();
    let report = TreeValidator::new(strict).run(&tree);

    // Every node in the fixture has 5-8 keywords.
    assert!(report.passed());
    assert!(report
        .findings
        .iter()
        .any(|f| f.rule_id == "tree-fields/insufficient-keywords"));
}

#[test]
fn distribution_is_reported_per_theme() {
    let tree = load_tree_str(FIXTURE).unwrap();
    let report = TreeValidator::new(CurationConfig::default()).run(&tree);

    assert_eq!(report.distribution.l1.len(), 2);
    let saude = &report.distribution.l1[0];
    assert_eq!(saude.code, "01");
    assert_eq!(saude.l2_count, 2);
    assert_eq!(saude.l3_total, 2);
    assert_eq!(report.distribution.l2_stats.imbalance(), 1.0);
}
