//! Heading Parser
//!
//! Turns ATX heading-annotated text into an ordered, flat list of sections.
//! Lines are trimmed before inspection and blank lines are skipped. Lines
//! before the first heading have no owning section and are dropped.

use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

use crate::constants::heading::{MAX_TITLE_CHARS, TITLE_BREAK_POINTS};
use crate::types::Section;

static HEADING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(#{1,6})\s+(.+)$").expect("HEADING_RE: hardcoded regex is valid")
});

/// Looser pattern used for document statistics (no space required after markers)
static HEADING_STAT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(#{1,6})\s*(.+)$").expect("HEADING_STAT_RE: hardcoded regex is valid")
});

/// Heading counts gathered from raw text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HeadingStats {
    pub total: usize,
    pub max_depth: u8,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HeadingParser;

impl HeadingParser {
    pub fn new() -> Self {
        Self
    }

    /// Split text into sections in document order. Paths are left empty.
    pub fn parse(&self, text: &str) -> Vec<Section> {
        let mut sections = Vec::new();
        let mut current: Option<Section> = None;
        let mut buffer: Vec<&str> = Vec::new();

        for raw in text.lines() {
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }

            if let Some((level, title)) = match_heading(line) {
                if let Some(mut open) = current.take() {
                    open.content = buffer.join("\n").trim().to_string();
                    sections.push(open);
                }
                buffer.clear();
                current = Some(Section::new(sanitize_title(title), level));
            } else if current.is_some() {
                buffer.push(line);
            }
        }

        if let Some(mut open) = current {
            open.content = buffer.join("\n").trim().to_string();
            sections.push(open);
        }

        debug!("Parsed {} sections", sections.len());
        sections
    }

    /// Count heading-like lines and the deepest marker run
    pub fn stats(&self, text: &str) -> HeadingStats {
        let mut stats = HeadingStats::default();
        for line in text.lines() {
            if let Some(caps) = HEADING_STAT_RE.captures(line.trim()) {
                stats.total += 1;
                stats.max_depth = stats.max_depth.max(caps[1].len() as u8);
            }
        }
        stats
    }
}

/// Match a trimmed line against the ATX heading pattern
pub(crate) fn match_heading(line: &str) -> Option<(u8, &str)> {
    let caps = HEADING_RE.captures(line)?;
    let level = caps.get(1)?.as_str().len() as u8;
    let title = caps.get(2)?.as_str().trim();
    Some((level, title))
}

/// Cap a heading title at 100 characters.
///
/// Oversized titles are cut at the first `.`, then `!`, `?`, or newline,
/// whichever is found first in that priority order; anything still too long
/// is hard-truncated.
pub fn sanitize_title(raw: &str) -> String {
    let mut title = raw.trim().to_string();
    if title.chars().count() <= MAX_TITLE_CHARS {
        return title.replace('\n', " ");
    }

    if let Some(bp) = TITLE_BREAK_POINTS.iter().find(|bp| title.contains(**bp))
        && let Some((head, _)) = title.split_once(*bp)
    {
        title = head.trim().to_string();
    }

    if title.chars().count() > MAX_TITLE_CHARS {
        title = title.chars().take(MAX_TITLE_CHARS).collect::<String>();
        title = title.trim().to_string();
    }

    title.replace('\n', " ")
}
