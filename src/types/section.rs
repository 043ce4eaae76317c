//! Section records produced by heading extraction.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A heading plus its trailing body text until the next heading of any level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Sanitized heading text (at most 100 characters, no newline)
    pub title: String,
    /// Literal `#` marker count, 1 through 6
    pub level: u8,
    /// Non-heading lines following the heading, trimmed and newline-joined
    pub content: String,
    /// Output path relative to the docs root, assigned by the path allocator
    pub path: String,
    /// Nested subsections (empty until the list passes through `SectionTree`)
    pub children: Vec<Section>,
    /// Open key/value map reserved for callers
    pub metadata: BTreeMap<String, String>,
}

impl Section {
    pub fn new(title: impl Into<String>, level: u8) -> Self {
        Self {
            title: title.into(),
            level,
            content: String::new(),
            path: String::new(),
            children: Vec::new(),
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Persistence/debugging view of this section
    pub fn descriptor(&self) -> SectionDescriptor {
        SectionDescriptor {
            title: self.title.clone(),
            level: self.level,
            path: self.path.clone(),
            children_count: self.children.len(),
        }
    }
}

/// `(title, level, path, children_count)` record handed to collaborators
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionDescriptor {
    pub title: String,
    pub level: u8,
    pub path: String,
    pub children_count: usize,
}
