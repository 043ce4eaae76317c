//! Navigation manifest validation.
//!
//! Line-oriented checks over a `nav:` manifest. Every check runs; only a
//! missing header makes a manifest invalid, everything else is advisory.

use std::collections::HashSet;

use crate::constants::paths::EXTENSION;
use crate::types::{NAV_HEADER, ValidationReport};

const INDENT: &str = "  ";

#[derive(Debug, Clone, Copy, Default)]
pub struct NavigationValidator;

impl NavigationValidator {
    pub fn new() -> Self {
        Self
    }

    pub fn validate(&self, manifest: &str) -> ValidationReport {
        let mut report = ValidationReport::default();

        let mut lines = manifest
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty());

        // The remaining checks still run over the body when the header is wrong
        if !matches!(lines.next(), Some((_, first)) if first.trim() == NAV_HEADER) {
            report.add_error("Navigation must start with 'nav:'");
        }

        let mut seen = HashSet::new();
        let mut duplicates = false;
        let mut malformed_links = false;

        for (index, line) in lines {
            if !line.starts_with(INDENT) {
                report.add_warning(format!("Line {}: Inconsistent indentation", index + 1));
            }

            let entry = line.trim();
            if !seen.insert(entry) {
                duplicates = true;
            }
            if entry.contains(EXTENSION) && !entry.ends_with(EXTENSION) {
                malformed_links = true;
            }
        }

        if duplicates {
            report.add_warning("Duplicate navigation entries found");
        }
        if malformed_links {
            report.add_suggestion("Check .md file references for proper formatting");
        }

        report
    }
}
