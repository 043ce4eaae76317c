//! Config Command
//!
//! Manage docweave configuration.
//!
//! Usage:
//!   docweave config show [-f toml|json]
//!   docweave config path
//!   docweave config init [--force]

use crate::cli::Output;
use crate::config::ConfigLoader;
use crate::types::{DocError, Result};

/// Show the merged effective configuration
pub fn show(format: &str) -> Result<()> {
    let as_json = match format {
        "toml" => false,
        "json" => true,
        other => {
            return Err(DocError::Config(format!(
                "Unknown format '{}'. Valid values: toml, json",
                other
            )));
        }
    };

    let config = ConfigLoader::load()?;
    println!("{}", ConfigLoader::render(&config, as_json)?);
    Ok(())
}

/// Show configuration file locations and whether they exist
pub fn path() -> Result<()> {
    let out = Output::new();
    out.header("Configuration files");

    match ConfigLoader::global_config_path() {
        Some(global) => out.field("global", describe(&global)),
        None => out.field("global", "(no config directory)"),
    }
    out.field("project", describe(&ConfigLoader::project_config_path()));
    Ok(())
}

/// Write the default project configuration
pub fn init(force: bool) -> Result<()> {
    let out = Output::new();
    let path = ConfigLoader::project_config_path();
    if ConfigLoader::init_at(&path, force)? {
        out.success("Initialized project configuration");
    } else {
        out.warning("Project configuration already exists (use --force to overwrite)");
    }
    out.field("config", path.display());
    Ok(())
}

fn describe(path: &std::path::Path) -> String {
    let state = if path.exists() { "exists" } else { "missing" };
    format!("{} ({})", path.display(), state)
}
