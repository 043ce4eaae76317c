use console::style;

use crate::types::{Section, ValidationReport};

pub struct Output;

impl Output {
    pub fn new() -> Self {
        Self
    }

    pub fn success(&self, message: &str) {
        println!("{} {}", style("✓").green(), message);
    }

    pub fn error(&self, message: &str) {
        eprintln!("{} {}", style("✗").red(), message);
    }

    pub fn warning(&self, message: &str) {
        println!("{} {}", style("⚠").yellow(), message);
    }

    pub fn info(&self, message: &str) {
        println!("{} {}", style("ℹ").blue(), message);
    }

    pub fn header(&self, message: &str) {
        println!("\n{}", style(message).bold().underlined());
    }

    pub fn section(&self, message: &str) {
        println!("\n{}", style(message).bold());
        println!("{}", "─".repeat(40));
    }

    pub fn field(&self, label: &str, value: impl std::fmt::Display) {
        println!("  {:<18} {}", style(label).dim(), value);
    }

    /// Sections indented by heading level, with their paths
    pub fn sections(&self, sections: &[Section]) {
        for section in sections {
            let indent = "  ".repeat(usize::from(section.level.saturating_sub(1)));
            println!(
                "  {}{} {}",
                indent,
                section.title,
                style(format!("→ {}", section.path)).dim()
            );
        }
    }

    pub fn report(&self, report: &ValidationReport) {
        if report.is_valid {
            self.success("Navigation validation: PASS");
        } else {
            self.error("Navigation validation: FAIL");
        }
        for error in &report.errors {
            self.error(error);
        }
        for warning in &report.warnings {
            self.warning(warning);
        }
        for suggestion in &report.suggestions {
            self.info(suggestion);
        }
    }
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}
