use std::path::Path;

use crate::error::LoadError;
use crate::node::ThemeTree;

/// Load the theme tree from a YAML file.
pub fn load_tree(path: &Path) -> Result<ThemeTree, LoadError> {
    let bytes = std::fs::read(path)
        .map_err(|e| LoadError::Io(format!("{}: {}", path.display(), e)))?;
    let text = std::str::from_utf8(&bytes).map_err(|e| LoadError::Encoding(e.to_string()))?;
    load_tree_str(text)
}

/// Parse the theme tree from YAML text.
pub fn load_tree_str(text: &str) -> Result<ThemeTree, LoadError> {
    serde_yaml::from_str(text).map_err(|e| LoadError::Parse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_minimal_tree() {
        let tree = load_tree_str(
            r#"
version: "2.1"
themes:
  - code: "01"
    label: Saúde
    description: Políticas de saúde pública, atenção básica e vigilância sanitária.
    keywords: [sus, hospitais, vacinação, vigilância, atenção básica]
    includes:
      - Campanhas de vacinação
    excludes:
      - Pesquisa acadêmica em medicina
"#,
        )
        .unwrap();

        assert_eq!(tree.version.as_deref(), Some("2.1"));
        assert_eq!(tree.themes.len(), 1);
        let l1 = &tree.themes[0];
        assert_eq!(l1.code, "01");
        assert_eq!(l1.keywords.len(), 5);
        assert_eq!(l1.includes.len(), 1);
        assert!(l1.children.is_empty());
    }

    #[test]
    fn missing_fields_default_to_empty() {
        let tree = load_tree_str("themes:\n  - code: \"07\"\n").unwrap();
        let node = &tree.themes[0];
        assert_eq!(node.label, "");
        assert!(node.description.is_none());
        assert!(node.keywords.is_empty());
    }

    #[test]
    fn syntax_error_is_parse_error() {
        let err = load_tree_str("themes: [unclosed").unwrap_err();
        assert!(matches!(err, LoadError::Parse(_)));
    }

    #[test]
    fn non_utf8_file_is_encoding_error() {
        let dir = std::env::temp_dir().join("temario_core_load_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("latin1.yaml");
        std::fs::write(&path, [0x74u8, 0x65, 0x6d, 0x61, 0xE7, 0xE3, 0x6f]).unwrap();
        let err = load_tree(&path).unwrap_err();
        assert!(matches!(err, LoadError::Encoding(_)));
        std::fs::remove_file(&path).ok();
    }
}
