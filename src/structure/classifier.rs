//! Section classification strategies.
//!
//! A classifier decides which sections become top-level navigation pages.
//! The synthesizer only depends on the trait, so alternative heuristics can be
//! swapped in without touching the rest of the pipeline.

use tracing::debug;

use super::path_allocator::PathAllocator;
use super::tree::SectionTree;
use crate::constants::navigation::{MAX_SYNTHETIC_TITLE_CHARS, NARRATIVE_WORDS};
use crate::types::Section;

pub trait SectionClassifier: Send + Sync {
    /// Pick the navigable top-level pages from a nested section forest.
    /// Returned sections keep whatever children should appear under them.
    fn classify(&self, roots: &[Section]) -> Vec<Section>;

    fn name(&self) -> &str;
}

/// Level-1 sections are pages. Without any, short non-narrative headings from
/// anywhere in the document are promoted to flat synthetic pages.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicClassifier;

impl HeuristicClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Whether a heading reads like a page title rather than narrative content
    pub fn looks_like_page(title: &str) -> bool {
        let clean = title.lines().next().unwrap_or("").trim();
        if clean.chars().count() >= MAX_SYNTHETIC_TITLE_CHARS {
            return false;
        }
        let lower = clean.to_lowercase();
        !NARRATIVE_WORDS.iter().any(|word| lower.contains(word))
    }
}

impl SectionClassifier for HeuristicClassifier {
    fn classify(&self, roots: &[Section]) -> Vec<Section> {
        let pages: Vec<Section> = roots.iter().filter(|s| s.level == 1).cloned().collect();
        if !pages.is_empty() {
            return pages;
        }

        let synthetic: Vec<Section> = SectionTree::flatten(roots)
            .into_iter()
            .filter(|s| Self::looks_like_page(&s.title))
            .map(|s| {
                let title = s.title.lines().next().unwrap_or("").trim().to_string();
                let path = PathAllocator::allocate(&title, 1);
                Section::new(title, 1)
                    .with_content(s.content.clone())
                    .with_path(path)
            })
            .collect();

        debug!(
            "No level-1 headings; promoted {} synthetic pages",
            synthetic.len()
        );
        synthetic
    }

    fn name(&self) -> &str {
        "heuristic"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structure::HeadingParser;

    fn forest(text: &str) -> Vec<Section> {
        let mut flat = HeadingParser::new().parse(text);
        PathAllocator::default().assign(&mut flat);
        SectionTree::build(flat)
    }

    #[test]
    fn test_level_one_sections_are_pages() {
        let pages = HeuristicClassifier::new().classify(&forest("# Home\n## How it works\n# FAQ"));

        let titles: Vec<&str> = pages.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["Home", "FAQ"]);
        assert_eq!(pages[0].children.len(), 1);
    }

    #[test]
    fn test_synthetic_pages_filter_narrative_titles() {
        let pages = HeuristicClassifier::new().classify(&forest(
            "## Overview\n### How to deploy\n## Payroll Compensation\n### Contacts\n## Onboarding Guide",
        ));

        let titles: Vec<&str> = pages.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["Overview", "Contacts"]);
        assert_eq!(pages[0].path, "overview.md");
        assert!(pages.iter().all(|p| p.children.is_empty() && p.level == 1));
    }

    #[test]
    fn test_long_titles_rejected() {
        let long = "Quarterly Planning Notes For The Infrastructure Team";
        assert!(long.chars().count() >= 50);
        assert!(!HeuristicClassifier::looks_like_page(long));
        assert!(HeuristicClassifier::looks_like_page("Tools"));
    }

    #[test]
    fn test_blacklist_matches_substrings() {
        // "show" contains "how"
        assert!(!HeuristicClassifier::looks_like_page("Showcase"));
    }
}
