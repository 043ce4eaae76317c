use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tokio::runtime::Runtime;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use docweave::cli::CommandContext;
use docweave::cli::commands::{self, process::ProcessArgs};

#[derive(Parser)]
#[command(name = "docweave")]
#[command(
    version,
    about = "Structure heading-annotated documents into navigable, templated documentation"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, global = true)]
    verbose: bool,

    #[arg(long, short, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List available templates
    Templates {
        #[arg(long, short, help = "Show details of one template")]
        template: Option<String>,
    },

    /// Analyze document structure and write the navigation manifest
    Analyze {
        #[arg(help = "Heading-annotated text file")]
        file: PathBuf,
        #[arg(long, short, help = "Output directory (default: output.dir)")]
        output: Option<PathBuf>,
    },

    /// Apply a template to a text file
    Apply {
        #[arg(help = "Heading-annotated text file")]
        file: PathBuf,
        #[arg(long, short, help = "Template name (default: template.default)")]
        template: Option<String>,
        #[arg(long, short, help = "Output directory (default: output.dir)")]
        output: Option<PathBuf>,
    },

    /// Run the full pipeline for one document
    Process {
        #[arg(help = "Source file (.md, .txt, .json content model, or .html export)")]
        file: PathBuf,
        #[arg(long, short, help = "Template name, or 'auto' to use the suggestion")]
        template: Option<String>,
        #[arg(long, short, help = "Output directory (default: output.dir)")]
        output: Option<PathBuf>,
        #[arg(long = "dry-run", help = "Analyze only; render and publish nothing")]
        dry_run: bool,
        #[arg(long, help = "Publish to the configured GitHub repository")]
        github: bool,
    },

    /// Validate a navigation manifest
    Validate {
        #[arg(help = "Navigation file (nav: manifest)")]
        file: PathBuf,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration (merged from all sources)
    Show {
        #[arg(
            short = 'f',
            long,
            default_value = "toml",
            help = "Output format: toml, json"
        )]
        format: String,
    },
    /// Show configuration file paths
    Path,
    /// Initialize project configuration
    Init {
        #[arg(long, help = "Overwrite existing config")]
        force: bool,
    },
}

/// Set up panic handler for graceful error reporting
fn setup_panic_handler() {
    let default_hook = std::panic::take_hook();

    std::panic::set_hook(Box::new(move |panic_info| {
        let message = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };

        eprintln!("\n\x1b[1;31m━━━ PANIC ━━━\x1b[0m");
        eprintln!("\x1b[31mdocweave encountered an unexpected error:\x1b[0m");
        eprintln!("  {}", message);

        if let Some(location) = panic_info.location() {
            eprintln!(
                "\x1b[90mLocation: {}:{}:{}\x1b[0m",
                location.file(),
                location.line(),
                location.column()
            );
        }
        eprintln!();

        // Default hook prints the backtrace when RUST_BACKTRACE=1
        default_hook(panic_info);
    }));
}

fn main() -> ExitCode {
    setup_panic_handler();

    match run_cli() {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("\x1b[31mError:\x1b[0m {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Returns `false` when the command ran but its verdict is a failure
fn run_cli() -> anyhow::Result<bool> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Templates { template } => {
            let ctx = CommandContext::load()?;
            commands::templates::run(&ctx, template.as_deref())?;
        }
        Commands::Analyze { file, output } => {
            let ctx = CommandContext::load()?;
            commands::analyze::run(&ctx, &file, output)?;
        }
        Commands::Apply {
            file,
            template,
            output,
        } => {
            let ctx = CommandContext::load()?;
            commands::apply::run(&ctx, &file, template, output)?;
        }
        Commands::Process {
            file,
            template,
            output,
            dry_run,
            github,
        } => {
            let ctx = CommandContext::load()?;
            let args = ProcessArgs {
                template,
                output,
                dry_run,
                github,
            };
            let rt = Runtime::new()?;
            rt.block_on(commands::process::run(&ctx, &file, args))?;
        }
        Commands::Validate { file } => {
            return Ok(commands::validate::run(&file)?);
        }
        Commands::Config { action } => match action {
            ConfigAction::Show { format } => commands::config::show(&format)?,
            ConfigAction::Path => commands::config::path()?,
            ConfigAction::Init { force } => commands::config::init(force)?,
        },
    }

    Ok(true)
}
