//! Templates Command
//!
//! Lists registered template profiles, or shows one in detail.

use crate::cli::{CommandContext, Output};
use crate::types::Result;

pub fn run(ctx: &CommandContext, template: Option<&str>) -> Result<()> {
    let out = Output::new();
    let registry = ctx
        .registry
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner());

    let Some(name) = template else {
        out.header("Available templates");
        for summary in registry.list() {
            println!(
                "  {:<16} {} [{}]",
                summary.name, summary.display_name, summary.kind
            );
            println!("  {:<16} {}", "", summary.description);
        }
        return Ok(());
    };

    if !registry.contains(name) {
        out.warning(&format!(
            "Unknown template '{}', showing the default profile",
            name
        ));
    }
    let profile = registry.get(name);

    out.header(&profile.name);
    println!("  {}", profile.description);

    out.section("Structure");
    out.field("frontmatter", profile.structure.frontmatter);
    out.field("toc", profile.structure.toc);
    out.field("breadcrumbs", profile.structure.breadcrumbs);
    out.field("edit_uri", profile.structure.edit_uri);

    out.section("Formatting");
    out.field("heading_style", format!("{:?}", profile.formatting.heading_style));
    out.field("code_blocks", profile.formatting.code_blocks);
    out.field("admonitions", profile.formatting.admonitions);
    out.field("tables", profile.formatting.tables);

    out.section("Sections");
    for section in &profile.sections {
        let marker = if section.required { "required" } else { "optional" };
        println!(
            "  {}{} ({})",
            "  ".repeat(usize::from(section.level.saturating_sub(1))),
            section.title,
            marker
        );
    }

    Ok(())
}
