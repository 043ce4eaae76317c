//! Analyze Command
//!
//! Structure analysis of a heading-annotated text file.
//!
//! Usage:
//!   docweave analyze <file> [-o dir]

use std::path::{Path, PathBuf};

use crate::cli::util::{read_input, write_output};
use crate::cli::{CommandContext, Output};
use crate::pipeline::NAVIGATION_FILE;
use crate::structure::{
    DocumentStructure, HeadingParser, HeadingStats, NavigationSynthesizer, NavigationValidator,
};
use crate::types::Result;

pub fn run(ctx: &CommandContext, file: &Path, output: Option<PathBuf>) -> Result<()> {
    let out = Output::new();
    let text = read_input(file)?;

    let synthesizer = NavigationSynthesizer::new(
        ctx.config.structure.path_layout,
        ctx.config.structure.path_collisions,
    );
    let structure = synthesizer.analyze(&text);
    let stats = HeadingParser::new().stats(&text);

    out.header(&format!("Structure of {}", file.display()));
    for (label, value) in summary(&structure, &stats) {
        out.field(label, value);
    }

    out.section("Sections");
    out.sections(&structure.sections);

    let navigation = structure.manifest();
    let report = NavigationValidator::new().validate(&navigation);
    out.section("Validation");
    out.report(&report);

    let dir = ctx.output_dir(output);
    let path = write_output(&dir, NAVIGATION_FILE, &navigation)?;

    out.section("Navigation");
    println!("{}", navigation);
    println!();
    out.success(&format!("Navigation written to {}", path.display()));

    Ok(())
}

/// Labelled figures printed above the section listing
fn summary(structure: &DocumentStructure, stats: &HeadingStats) -> Vec<(&'static str, String)> {
    vec![
        ("headings", stats.total.to_string()),
        ("sections", structure.sections.len().to_string()),
        ("max depth", structure.metadata.max_depth.to_string()),
        ("estimated pages", structure.metadata.estimated_pages.to_string()),
        ("template", structure.suggested_template.clone()),
        (
            "cross references",
            structure.relationships.cross_references.len().to_string(),
        ),
    ]
}
