//! Navigation Synthesizer
//!
//! Builds the document structure analysis: sections with paths, the nested
//! section tree, the navigation tree, cross references, a suggested file
//! layout, a template recommendation, and heading statistics.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use tracing::info;

use super::classifier::{HeuristicClassifier, SectionClassifier};
use super::heading_parser::HeadingParser;
use super::path_allocator::{CollisionPolicy, PathAllocator, PathLayout};
use super::tree::SectionTree;
use crate::constants::navigation::SECTIONS_PER_PAGE;
use crate::constants::templates::{
    DEFAULT_PROFILE, PROJECT_KEYWORDS, PROJECT_PROFILE, TECHNICAL_KEYWORDS, TECHNICAL_PROFILE,
};
use crate::types::{NavigationNode, Section, SectionDescriptor, render_manifest};

static LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").expect("LINK_RE: hardcoded regex is valid")
});

/// Inline link found in a section body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrossReference {
    pub from: String,
    pub to: String,
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationships {
    pub cross_references: Vec<CrossReference>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileOrganization {
    pub files: Vec<String>,
    pub directories: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructureMetadata {
    pub total_sections: usize,
    pub max_depth: u8,
    pub estimated_pages: usize,
}

/// Complete structure analysis of one document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentStructure {
    /// Flat, document-ordered sections with paths
    pub sections: Vec<Section>,
    /// The same sections nested by heading level
    pub tree: Vec<Section>,
    pub navigation: Vec<NavigationNode>,
    pub relationships: Relationships,
    pub file_organization: FileOrganization,
    pub suggested_template: String,
    pub metadata: StructureMetadata,
}

impl DocumentStructure {
    /// Per-section descriptors in document order, with real child counts
    pub fn descriptors(&self) -> Vec<SectionDescriptor> {
        SectionTree::flatten(&self.tree)
            .into_iter()
            .map(Section::descriptor)
            .collect()
    }

    /// Render the `nav:` manifest
    pub fn manifest(&self) -> String {
        render_manifest(&self.navigation)
    }
}

pub struct NavigationSynthesizer {
    parser: HeadingParser,
    layout: PathLayout,
    collisions: CollisionPolicy,
    classifier: Box<dyn SectionClassifier>,
}

impl Default for NavigationSynthesizer {
    fn default() -> Self {
        Self::new(PathLayout::default(), CollisionPolicy::default())
    }
}

impl NavigationSynthesizer {
    pub fn new(layout: PathLayout, collisions: CollisionPolicy) -> Self {
        Self {
            parser: HeadingParser::new(),
            layout,
            collisions,
            classifier: Box::new(HeuristicClassifier::new()),
        }
    }

    /// Replace the top-level page classifier
    pub fn with_classifier(mut self, classifier: impl SectionClassifier + 'static) -> Self {
        self.classifier = Box::new(classifier);
        self
    }

    pub fn analyze(&self, text: &str) -> DocumentStructure {
        let mut sections = self.parser.parse(text);
        PathAllocator::new(self.layout, self.collisions).assign(&mut sections);

        let tree = SectionTree::build(sections.clone());
        let pages = self.classifier.classify(&tree);
        let navigation = pages.iter().map(to_navigation_node).collect();

        let structure = DocumentStructure {
            relationships: analyze_relationships(&sections),
            file_organization: suggest_file_organization(&sections),
            suggested_template: suggest_template(&sections).to_string(),
            metadata: self.extract_metadata(text),
            sections,
            tree,
            navigation,
        };

        info!(
            "Document structure analyzed: {} sections found ({} classifier), suggested template {}",
            structure.sections.len(),
            self.classifier.name(),
            structure.suggested_template
        );
        structure
    }

    /// Analyze and render the manifest in one step
    pub fn generate_navigation(&self, text: &str) -> String {
        self.analyze(text).manifest()
    }

    fn extract_metadata(&self, text: &str) -> StructureMetadata {
        let stats = self.parser.stats(text);
        StructureMetadata {
            total_sections: stats.total,
            max_depth: stats.max_depth,
            estimated_pages: (stats.total / SECTIONS_PER_PAGE).max(1),
        }
    }
}

fn to_navigation_node(section: &Section) -> NavigationNode {
    NavigationNode::new(section.title.clone(), section.path.clone())
        .with_children(section.children.iter().map(to_navigation_node).collect())
}

fn analyze_relationships(sections: &[Section]) -> Relationships {
    let cross_references = sections
        .iter()
        .flat_map(|section| {
            LINK_RE
                .captures_iter(&section.content)
                .map(move |caps| CrossReference {
                    from: section.title.clone(),
                    to: caps[1].to_string(),
                    url: caps[2].to_string(),
                })
        })
        .collect();

    Relationships { cross_references }
}

fn suggest_file_organization(sections: &[Section]) -> FileOrganization {
    let mut organization = FileOrganization::default();

    for section in sections {
        match section.level {
            1 => organization.files.push(section.path.clone()),
            2 => {
                let directory = section
                    .path
                    .strip_suffix("/index.md")
                    .unwrap_or(&section.path);
                organization.directories.push(directory.to_string());
                organization.files.push(section.path.clone());
            }
            _ => {}
        }
    }

    organization
}

/// Keyword classifier over all section titles; first matching rule wins
pub fn suggest_template(sections: &[Section]) -> &'static str {
    let titles = sections
        .iter()
        .map(|s| s.title.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ");

    if TECHNICAL_KEYWORDS.iter().any(|k| titles.contains(k)) {
        TECHNICAL_PROFILE
    } else if PROJECT_KEYWORDS.iter().any(|k| titles.contains(k)) {
        PROJECT_PROFILE
    } else {
        DEFAULT_PROFILE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HANDBOOK: &str = "# Home\nWelcome, see [the FAQ](faq.md).\n## About\nWho we are\n### History\nFounded\n# FAQ\nAsk [Ops](https://ops.example.com) or [HR](hr.md)";

    #[test]
    fn test_analyze_sections_and_paths() {
        let structure = NavigationSynthesizer::default().analyze(HANDBOOK);

        let paths: Vec<&str> = structure.sections.iter().map(|s| s.path.as_str()).collect();
        assert_eq!(
            paths,
            vec!["home.md", "about/about.md", "history/history.md", "faq.md"]
        );
        assert_eq!(structure.tree.len(), 2);
    }

    #[test]
    fn test_cross_references() {
        let refs = NavigationSynthesizer::default()
            .analyze(HANDBOOK)
            .relationships
            .cross_references;

        assert_eq!(refs.len(), 3);
        assert_eq!(
            refs[0],
            CrossReference {
                from: "Home".to_string(),
                to: "the FAQ".to_string(),
                url: "faq.md".to_string(),
            }
        );
        assert_eq!(refs[2].from, "FAQ");
        assert_eq!(refs[2].url, "hr.md");
    }

    #[test]
    fn test_file_organization() {
        let org = NavigationSynthesizer::default()
            .analyze(HANDBOOK)
            .file_organization;
        assert_eq!(org.files, vec!["home.md", "about/about.md", "faq.md"]);
        assert_eq!(org.directories, vec!["about/about.md"]);
    }

    #[test]
    fn test_directories_follow_each_level_two_path() {
        let org = NavigationSynthesizer::default()
            .analyze("# A\n## About\n# B\n## About")
            .file_organization;
        assert_eq!(org.directories, vec!["about/about.md", "about/about.md"]);
    }

    #[test]
    fn test_metadata() {
        let metadata = NavigationSynthesizer::default().analyze(HANDBOOK).metadata;
        assert_eq!(metadata.total_sections, 4);
        assert_eq!(metadata.max_depth, 3);
        assert_eq!(metadata.estimated_pages, 1);

        let empty = NavigationSynthesizer::default().analyze("").metadata;
        assert_eq!(empty.estimated_pages, 1);
    }

    #[test]
    fn test_suggest_template_technical_first() {
        let structure = NavigationSynthesizer::default().analyze("# API Reference Guide");
        assert_eq!(structure.suggested_template, "technical_docs");

        let mixed = NavigationSynthesizer::default().analyze("# Team\n# Code Review");
        assert_eq!(mixed.suggested_template, "technical_docs");
    }

    #[test]
    fn test_suggest_template_project_and_default() {
        let project = NavigationSynthesizer::default().analyze("# Goals\n# Our Team");
        assert_eq!(project.suggested_template, "project_docs");

        let standard = NavigationSynthesizer::default().analyze("# Home\n# FAQ");
        assert_eq!(standard.suggested_template, "standard_docs");
    }

    #[test]
    fn test_manifest_nests_level_one_pages() {
        let manifest = NavigationSynthesizer::default().generate_navigation(HANDBOOK);
        let expected = [
            "nav:",
            "  - Home:",
            "    - Home: home.md",
            "    - About:",
            "      - About: about/about.md",
            "      - History: history/history.md",
            "  - FAQ: faq.md",
        ]
        .join("\n");
        assert_eq!(manifest, expected);
    }

    #[test]
    fn test_manifest_synthetic_pages_are_flat() {
        let manifest = NavigationSynthesizer::default()
            .generate_navigation("## Tools\n### Slack\n## Why we exist");
        assert_eq!(manifest, "nav:\n  - Tools: tools.md\n  - Slack: slack.md");
    }

    struct NothingNavigable;

    impl SectionClassifier for NothingNavigable {
        fn classify(&self, _roots: &[Section]) -> Vec<Section> {
            Vec::new()
        }

        fn name(&self) -> &str {
            "nothing"
        }
    }

    #[test]
    fn test_custom_classifier() {
        let synthesizer = NavigationSynthesizer::default().with_classifier(NothingNavigable);
        assert_eq!(synthesizer.generate_navigation(HANDBOOK), "nav:");
    }

    #[test]
    fn test_descriptors_report_children() {
        let structure = NavigationSynthesizer::default().analyze(HANDBOOK);
        let counts: Vec<usize> = structure
            .descriptors()
            .iter()
            .map(|d| d.children_count)
            .collect();
        assert_eq!(counts, vec![1, 1, 0, 0]);
    }
}
