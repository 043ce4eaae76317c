//! Process Command
//!
//! Runs the full pipeline for one local document: fetch, optional HTML
//! salvage, conversion, structure analysis, templating and publishing.
//!
//! Usage:
//!   docweave process <file> [-t template|auto] [-o dir] [--dry-run] [--github]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::info;

use crate::cli::{CommandContext, Output};
use crate::convert::{OpenAiConverter, StructuralConverter, TextConverter};
use crate::pipeline::{DocumentPipeline, ProcessOptions, ProcessOutcome};
use crate::publish::{DirectoryPublisher, GithubPublisher, Publisher};
use crate::source::{FileSource, TableMode};
use crate::types::Result;

#[derive(Debug, Clone, Default)]
pub struct ProcessArgs {
    pub template: Option<String>,
    pub output: Option<PathBuf>,
    pub dry_run: bool,
    pub github: bool,
}

pub async fn run(ctx: &CommandContext, file: &Path, args: ProcessArgs) -> Result<ProcessOutcome> {
    let out = Output::new();

    let converter: Arc<dyn TextConverter> = if ctx.config.llm.enabled {
        Arc::new(OpenAiConverter::from_config(&ctx.config.llm)?)
    } else {
        Arc::new(StructuralConverter::new(TableMode::Placeholder))
    };

    let publisher: Arc<dyn Publisher> = if args.github {
        Arc::new(GithubPublisher::from_config(&ctx.config.github)?)
    } else {
        Arc::new(DirectoryPublisher::new(ctx.output_dir(args.output)))
    };
    info!("Publishing through {}", publisher.name());

    let pipeline = DocumentPipeline::new(
        Arc::new(FileSource::new()),
        converter,
        ctx.registry.clone(),
        ctx.config.clone(),
    )
    .with_publisher(publisher);

    let options = ProcessOptions {
        template: args.template,
        dry_run: args.dry_run,
        ..ProcessOptions::default()
    };
    let outcome = pipeline.process(&file.to_string_lossy(), options).await?;

    out.header(&format!("Processed '{}'", outcome.title));
    out.field("template", &outcome.template);
    out.field("sections", outcome.structure.metadata.total_sections);
    out.field("estimated pages", outcome.structure.metadata.estimated_pages);
    if outcome.used_fallback {
        out.info("Recovered content from the HTML export");
    }

    out.section("Validation");
    out.report(&outcome.report);

    if args.dry_run {
        out.section("Navigation");
        println!("{}", outcome.navigation);
        out.info("Dry run: nothing was rendered or published");
    } else {
        out.section("Published");
        for location in &outcome.published {
            out.success(location);
        }
    }

    Ok(outcome)
}
