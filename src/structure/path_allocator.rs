//! Path Allocator
//!
//! Derives a filesystem-safe `.md` path per section.
//!
//! Two layouts exist:
//! - `TitlePrefix`: level 1 → `<slug>.md`, deeper levels →
//!   `<prefix-slug>/<slug>.md` where the prefix slug comes from the first 30
//!   characters of the section's own title
//! - `Nested`: deeper levels live under their real parent's path stem
//!
//! Identical slugs overwrite each other unless `CollisionPolicy::Suffix` is
//! selected, in which case later arrivals get `-2`, `-3`, ... in first-seen
//! order.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::LazyLock;
use tracing::debug;

use crate::constants::paths::{EXTENSION, FALLBACK_SLUG, PARENT_PREFIX_CHARS};
use crate::types::Section;

/// Characters of the title considered for the file slug
const SLUG_TITLE_CHARS: usize = 50;

static UNSAFE_CHARS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^A-Za-z0-9_\s-]").expect("UNSAFE_CHARS_RE: hardcoded regex is valid")
});

static SEPARATOR_RUN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[-_\s]+").expect("SEPARATOR_RUN_RE: hardcoded regex is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum PathLayout {
    #[default]
    TitlePrefix,
    Nested,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CollisionPolicy {
    /// Keep duplicates as-is; later sections overwrite earlier targets
    #[default]
    Overwrite,
    /// Append `-2`, `-3`, ... to repeats
    Suffix,
}

/// Lowercase, hyphen-delimited slug restricted to `[a-z0-9-]`
pub fn slugify(title: &str) -> String {
    let stripped = UNSAFE_CHARS_RE.replace_all(title, "");
    let collapsed = SEPARATOR_RUN_RE.replace_all(&stripped, "-");
    let slug = collapsed.trim_matches('-').to_lowercase();

    if slug.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        slug
    }
}

fn first_line(title: &str) -> &str {
    title.lines().next().unwrap_or("").trim()
}

fn take_chars(s: &str, n: usize) -> String {
    s.chars().take(n).collect::<String>().trim().to_string()
}

fn with_extension(slug: String) -> String {
    if slug.ends_with(EXTENSION) {
        slug
    } else {
        format!("{}{}", slug, EXTENSION)
    }
}

/// Tracks seen keys and applies the collision policy
#[derive(Debug, Default)]
pub struct Disambiguator {
    policy: CollisionPolicy,
    seen: HashMap<String, usize>,
}

impl Disambiguator {
    pub fn new(policy: CollisionPolicy) -> Self {
        Self {
            policy,
            seen: HashMap::new(),
        }
    }

    /// Resolve a plain key such as a TOC anchor
    pub fn resolve(&mut self, key: String) -> String {
        self.resolve_with(key, |base, n| format!("{}-{}", base, n))
    }

    /// Resolve a path, placing the suffix before the extension
    pub fn resolve_path(&mut self, path: String) -> String {
        self.resolve_with(path, |base, n| match base.strip_suffix(EXTENSION) {
            Some(stem) => format!("{}-{}{}", stem, n, EXTENSION),
            None => format!("{}-{}", base, n),
        })
    }

    fn resolve_with<F>(&mut self, key: String, suffixed: F) -> String
    where
        F: Fn(&str, usize) -> String,
    {
        if self.policy == CollisionPolicy::Overwrite {
            return key;
        }

        let count = self.seen.entry(key.clone()).or_insert(0);
        *count += 1;
        if *count == 1 {
            return key;
        }

        let mut n = *count;
        loop {
            let candidate = suffixed(&key, n);
            if !self.seen.contains_key(&candidate) {
                self.seen.insert(candidate.clone(), 1);
                debug!("Disambiguated '{}' as '{}'", key, candidate);
                return candidate;
            }
            n += 1;
        }
    }
}

/// Assigns paths to sections
#[derive(Debug)]
pub struct PathAllocator {
    layout: PathLayout,
    disambiguator: Disambiguator,
}

impl Default for PathAllocator {
    fn default() -> Self {
        Self::new(PathLayout::default(), CollisionPolicy::default())
    }
}

impl PathAllocator {
    pub fn new(layout: PathLayout, collisions: CollisionPolicy) -> Self {
        Self {
            layout,
            disambiguator: Disambiguator::new(collisions),
        }
    }

    /// Pure title/level → path mapping for the title-prefix layout
    pub fn allocate(title: &str, level: u8) -> String {
        let line = first_line(title);
        let filename = with_extension(slugify(&take_chars(line, SLUG_TITLE_CHARS)));

        if level <= 1 {
            return filename;
        }

        let prefix = slugify(&take_chars(line, PARENT_PREFIX_CHARS));
        format!("{}/{}", prefix, filename)
    }

    /// Path under an explicit parent path; roots land at the top level
    pub fn allocate_nested(parent_path: Option<&str>, title: &str) -> String {
        let filename = with_extension(slugify(&take_chars(first_line(title), SLUG_TITLE_CHARS)));
        match parent_path {
            Some(parent) => {
                let stem = parent.strip_suffix(EXTENSION).unwrap_or(parent);
                format!("{}/{}", stem, filename)
            }
            None => filename,
        }
    }

    /// Annotate a document-ordered flat list of sections with paths
    pub fn assign(&mut self, sections: &mut [Section]) {
        let mut ancestors: Vec<(u8, String)> = Vec::new();

        for section in sections.iter_mut() {
            let candidate = match self.layout {
                PathLayout::TitlePrefix => Self::allocate(&section.title, section.level),
                PathLayout::Nested => {
                    while ancestors
                        .last()
                        .is_some_and(|(level, _)| *level >= section.level)
                    {
                        ancestors.pop();
                    }
                    let parent = ancestors.last().map(|(_, path)| path.as_str());
                    Self::allocate_nested(parent, &section.title)
                }
            };

            section.path = self.disambiguator.resolve_path(candidate);
            if self.layout == PathLayout::Nested {
                ancestors.push((section.level, section.path.clone()));
            }
        }
    }
}
