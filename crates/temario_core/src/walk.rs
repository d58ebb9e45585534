use crate::node::{ThemeNode, ThemeTree};

/// One step of a pre-order traversal: the node plus the codes of its
/// ancestors, outermost first.
#[derive(Debug, Clone)]
pub struct NodeVisit<'a> {
    pub node: &'a ThemeNode,
    pub ancestors: Vec<&'a str>,
}

impl<'a> NodeVisit<'a> {
    /// Code of the structural parent, or `"ROOT"` for top-level nodes.
    pub fn parent_code(&self) -> &'a str {
        self.ancestors.last().copied().unwrap_or("ROOT")
    }

    /// Slash-joined ancestor path including this node's own code.
    pub fn path(&self) -> String {
        let mut parts: Vec<&str> = self.ancestors.clone();
        parts.push(self.node.code.as_str());
        parts.join("/")
    }

    /// Structural depth (1 for top-level nodes).
    pub fn depth(&self) -> usize {
        self.ancestors.len() + 1
    }
}

/// Lazy pre-order traversal over every node of the tree.
///
/// Each item carries its ancestor-code path, so callers never share a
/// mutable accumulator with the traversal itself.
pub fn walk(tree: &ThemeTree) -> Walk<'_> {
    let mut stack: Vec<(&ThemeNode, Vec<&str>)> = Vec::new();
    for node in tree.themes.iter().rev() {
        stack.push((node, Vec::new()));
    }
    Walk { stack }
}

pub struct Walk<'a> {
    stack: Vec<(&'a ThemeNode, Vec<&'a str>)>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = NodeVisit<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let (node, ancestors) = self.stack.pop()?;
        let mut child_ancestors = ancestors.clone();
        child_ancestors.push(node.code.as_str());
        for child in node.children.iter().rev() {
            self.stack.push((child, child_ancestors.clone()));
        }
        Some(NodeVisit { node, ancestors })
    }
}
