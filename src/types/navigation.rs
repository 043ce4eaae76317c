//! Navigation tree and manifest rendering.

use serde::{Deserialize, Serialize};

/// Manifest header line
pub const NAV_HEADER: &str = "nav:";

/// One menu entry in the documentation site navigation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationNode {
    pub title: String,
    pub path: String,
    pub children: Vec<NavigationNode>,
}

impl NavigationNode {
    pub fn new(title: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            path: path.into(),
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<NavigationNode>) -> Self {
        self.children = children;
        self
    }

    /// Depth of the subtree rooted here (a leaf has depth 1)
    pub fn depth(&self) -> usize {
        1 + self.children.iter().map(|c| c.depth()).max().unwrap_or(0)
    }

    /// Append this node's manifest lines at the given nesting depth.
    ///
    /// A node with children renders as a titled group whose first entry is the
    /// node's own page, because a manifest entry cannot carry both a path and
    /// nested entries.
    fn render_into(&self, lines: &mut Vec<String>, depth: usize) {
        let indent = "  ".repeat(depth + 1);
        if self.children.is_empty() {
            lines.push(format!("{}- {}: {}", indent, self.title, self.path));
            return;
        }

        lines.push(format!("{}- {}:", indent, self.title));
        lines.push(format!("{}  - {}: {}", indent, self.title, self.path));
        for child in &self.children {
            child.render_into(lines, depth + 1);
        }
    }
}

/// Render an ordered navigation tree as a `nav:` manifest
pub fn render_manifest(nodes: &[NavigationNode]) -> String {
    let mut lines = vec![NAV_HEADER.to_string()];
    for node in nodes {
        node.render_into(&mut lines, 0);
    }
    lines.join("\n")
}
