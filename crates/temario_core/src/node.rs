use serde::{Deserialize, Serialize};

/// Hierarchy level of a theme node, derived from the depth of its code.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    L1,
    L2,
    L3,
}

impl Level {
    /// Level implied by a dot-delimited code (`"01"` -> L1, `"01.02"` -> L2, ...).
    ///
    /// Returns `None` for an empty code or a depth outside 1..=3.
    pub fn from_code(code: &str) -> Option<Level> {
        if code.is_empty() {
            return None;
        }
        match code.split('.').count() {
            1 => Some(Level::L1),
            2 => Some(Level::L2),
            3 => Some(Level::L3),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Level::L1 => "L1",
            Level::L2 => "L2",
            Level::L3 => "L3",
        }
    }

    /// Structural depth of this level (number of code segments).
    pub fn depth(self) -> usize {
        match self {
            Level::L1 => 1,
            Level::L2 => 2,
            Level::L3 => 3,
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The theme-tree document: a top-level `themes` sequence of L1 nodes.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ThemeTree {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default)]
    pub themes: Vec<ThemeNode>,
}

/// A single node of the theme tree.
///
/// Field presence is modeled explicitly: missing keys deserialize to empty
/// strings/collections or `None`, so required-field checks operate on the
/// record instead of on raw key membership.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ThemeNode {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
    /// Scope boundaries, recommended on L1 nodes.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub includes: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub excludes: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ThemeNode>,
}

impl ThemeNode {
    /// Level implied by this node's code.
    pub fn level(&self) -> Option<Level> {
        Level::from_code(&self.code)
    }

    /// Description text, treating blank strings as absent.
    pub fn description_text(&self) -> Option<&str> {
        match self.description.as_deref() {
            Some(text) if !text.trim().is_empty() => Some(text),
            _ => None,
        }
    }

    /// Code of the parent implied by this node's own code
    /// (`"01.02.03"` -> `"01.02"`); `None` for L1 codes.
    pub fn implied_parent_code(&self) -> Option<String> {
        let (parent, _last) = self.code.rsplit_once('.')?;
        Some(parent.to_string())
    }
}
