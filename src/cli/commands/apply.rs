//! Apply Command
//!
//! Renders a text file through a template profile.

use std::path::{Path, PathBuf};

use crate::cli::util::{formatted_name, read_input, write_output};
use crate::cli::{CommandContext, Output};
use crate::pipeline::artifact_stem;
use crate::template::{FrontmatterMetadata, TemplateMerger};
use crate::types::Result;

pub fn run(
    ctx: &CommandContext,
    file: &Path,
    template: Option<String>,
    output: Option<PathBuf>,
) -> Result<PathBuf> {
    let out = Output::new();
    let content = read_input(file)?;
    let template = ctx.template_for(template, &content);

    let display = file.display().to_string();
    let metadata = FrontmatterMetadata {
        description: Some(format!("Content from {}", display)),
        ..FrontmatterMetadata::titled(artifact_stem(&display))
    };

    let rendered = {
        let registry = ctx
            .registry
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if !registry.contains(&template) {
            out.warning(&format!(
                "Unknown template '{}', using the default profile",
                template
            ));
        }
        TemplateMerger::new(&registry)
            .with_anchor_collisions(ctx.config.structure.anchor_collisions)
            .apply(&content, &template, &metadata)
    };

    let path = write_output(&ctx.output_dir(output), &formatted_name(file), &rendered)?;
    out.success(&format!(
        "Applied '{}' template: {}",
        template,
        path.display()
    ));

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use tempfile::TempDir;

    #[test]
    fn test_apply_writes_formatted_file() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("guide.md");
        std::fs::write(&input, "# Intro\nHello\n## Setup\n").unwrap();

        let ctx = CommandContext::from_config(Config::default()).unwrap();
        let path = run(
            &ctx,
            &input,
            Some("minimal".to_string()),
            Some(dir.path().join("out")),
        )
        .unwrap();

        assert!(path.ends_with("guide_formatted.md"));
        let body = std::fs::read_to_string(path).unwrap();
        assert!(body.contains("# Intro"));
        assert!(!body.contains("## Table of Contents"));
    }

    #[test]
    fn test_apply_resolves_auto_template() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("api.md");
        std::fs::write(&input, "# API Reference\nCalls\n## Endpoints\n").unwrap();

        let mut config = Config::default();
        config.template.default = "auto".to_string();
        let ctx = CommandContext::from_config(config).unwrap();
        let path = run(&ctx, &input, None, Some(dir.path().join("out"))).unwrap();

        let body = std::fs::read_to_string(path).unwrap();
        assert!(body.contains("template: Technical Documentation"));
    }
}
