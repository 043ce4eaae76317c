//! Validate Command
//!
//! Checks a navigation manifest file and prints the report.

use std::path::Path;

use crate::cli::util::read_input;
use crate::cli::Output;
use crate::structure::NavigationValidator;
use crate::types::Result;

/// Returns whether the manifest is valid
pub fn run(file: &Path) -> Result<bool> {
    let out = Output::new();
    let manifest = read_input(file)?;
    let report = NavigationValidator::new().validate(&manifest);

    out.header(&format!("Validating {}", file.display()));
    out.report(&report);
    if report.is_valid && !report.has_issues() {
        out.success("No issues found");
    }

    Ok(report.is_valid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_validate_reports_missing_header() {
        let dir = TempDir::new().unwrap();
        let good = dir.path().join("good.yml");
        let bad = dir.path().join("bad.yml");
        std::fs::write(&good, "nav:\n  - Home: home.md").unwrap();
        std::fs::write(&bad, "  - Home: home.md").unwrap();

        assert!(run(&good).unwrap());
        assert!(!run(&bad).unwrap());
    }
}
