//! Template Merger
//!
//! Renders a document body under a profile: heading style, optional YAML
//! frontmatter before the content, optional table of contents after it.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use tracing::{info, warn};

use super::profile::{HeadingStyle, TemplateProfile};
use super::registry::TemplateRegistry;
use crate::constants::templates::{DEFAULT_DOC_TITLE, TOC_HEADER};
use crate::structure::{CollisionPolicy, Disambiguator};

/// Permissive heading form used when re-rendering (no space required)
static MERGE_HEADING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(#{1,6})\s*(.+)$").expect("MERGE_HEADING_RE: hardcoded regex is valid")
});

static ANCHOR_STRIP_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^\w\s-]").expect("ANCHOR_STRIP_RE: hardcoded regex is valid")
});

static WHITESPACE_RUN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("WHITESPACE_RUN_RE: hardcoded regex is valid"));

/// Caller-supplied document metadata for the frontmatter block
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrontmatterMetadata {
    pub title: Option<String>,
    pub description: Option<String>,
    pub created: Option<String>,
    pub updated: Option<String>,
    pub author: Option<String>,
    pub tags: Vec<String>,
}

impl FrontmatterMetadata {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }
}

/// Serialized frontmatter in fixed key order; empty values are omitted
#[derive(Serialize)]
struct Frontmatter<'a> {
    title: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    description: &'a str,
    template: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    created: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    updated: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    author: &'a str,
    #[serde(skip_serializing_if = "<[String]>::is_empty")]
    tags: &'a [String],
}

/// A heading line found while formatting
struct HeadingLine {
    level: usize,
    title: String,
}

pub struct TemplateMerger<'a> {
    registry: &'a TemplateRegistry,
    anchor_collisions: CollisionPolicy,
}

impl<'a> TemplateMerger<'a> {
    pub fn new(registry: &'a TemplateRegistry) -> Self {
        Self {
            registry,
            anchor_collisions: CollisionPolicy::default(),
        }
    }

    pub fn with_anchor_collisions(mut self, policy: CollisionPolicy) -> Self {
        self.anchor_collisions = policy;
        self
    }

    pub fn apply(&self, content: &str, profile_name: &str, metadata: &FrontmatterMetadata) -> String {
        let profile = self.registry.get(profile_name);
        info!("Applying template '{}' to content", profile_name);

        let (mut formatted, headings) = format_content(content, profile.formatting.heading_style);

        if profile.structure.frontmatter {
            match render_frontmatter(profile, metadata) {
                Some(frontmatter) => formatted = format!("{}\n\n{}", frontmatter, formatted),
                None => warn!("Frontmatter serialization failed; emitting body without it"),
            }
        }

        if profile.structure.toc {
            let toc = self.render_toc(&headings);
            formatted = format!("{}\n\n{}", formatted, toc);
        }

        formatted
    }

    fn render_toc(&self, headings: &[HeadingLine]) -> String {
        let mut anchors = Disambiguator::new(self.anchor_collisions);
        let mut lines = vec![TOC_HEADER.to_string(), String::new()];

        for heading in headings {
            let indent = "  ".repeat(heading.level.saturating_sub(1));
            let anchor = anchors.resolve(anchor_for(&heading.title));
            lines.push(format!("{}- [{}](#{})", indent, heading.title, anchor));
        }

        lines.join("\n")
    }
}

/// Anchor slug: lowercase, non-word characters dropped, whitespace runs to `-`
pub fn anchor_for(title: &str) -> String {
    let lower = title.to_lowercase();
    let stripped = ANCHOR_STRIP_RE.replace_all(&lower, "");
    WHITESPACE_RUN_RE
        .replace_all(&stripped, "-")
        .trim_matches('-')
        .to_string()
}

/// Re-render heading lines and collect them for the table of contents.
/// Headings are collected from the source form, so setext output still gets a TOC.
fn format_content(content: &str, style: HeadingStyle) -> (String, Vec<HeadingLine>) {
    let mut headings = Vec::new();

    let lines: Vec<String> = content
        .split('\n')
        .map(|line| {
            let trimmed = line.trim();
            if !trimmed.starts_with('#') {
                return line.to_string();
            }
            let Some(caps) = MERGE_HEADING_RE.captures(trimmed) else {
                return line.to_string();
            };

            let level = caps[1].len();
            let title = caps[2].trim().to_string();
            let rendered = match style {
                HeadingStyle::Atx => format!("{} {}", "#".repeat(level), title),
                HeadingStyle::Setext => {
                    let underline = if level == 1 { "=" } else { "-" };
                    format!("{}\n{}", title, underline.repeat(title.chars().count()))
                }
            };
            headings.push(HeadingLine { level, title });
            rendered
        })
        .collect();

    (lines.join("\n"), headings)
}

fn render_frontmatter(profile: &TemplateProfile, metadata: &FrontmatterMetadata) -> Option<String> {
    let frontmatter = Frontmatter {
        title: metadata
            .title
            .as_deref()
            .filter(|t| !t.is_empty())
            .unwrap_or(DEFAULT_DOC_TITLE),
        description: metadata.description.as_deref().unwrap_or_default(),
        template: &profile.name,
        created: metadata.created.as_deref().unwrap_or_default(),
        updated: metadata.updated.as_deref().unwrap_or_default(),
        author: metadata.author.as_deref().unwrap_or_default(),
        tags: &metadata.tags,
    };

    let yaml = serde_yaml::to_string(&frontmatter).ok()?;
    Some(format!("---\n{}---", yaml))
}
