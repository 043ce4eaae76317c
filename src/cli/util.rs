//! CLI Common Utilities
//!
//! Shared configuration and registry setup for command handlers.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::config::{Config, ConfigLoader};
use crate::pipeline::{AUTO_TEMPLATE, artifact_stem, resolve_template};
use crate::structure::NavigationSynthesizer;
use crate::template::{SharedRegistry, TemplateRegistry};
use crate::types::{DocError, Result};

/// Command execution context
#[derive(Clone)]
pub struct CommandContext {
    /// Loaded configuration
    pub config: Config,
    /// Built-in plus configured custom templates
    pub registry: SharedRegistry,
}

impl CommandContext {
    /// Load configuration and register custom templates from `template.custom_dir`
    pub fn load() -> Result<Self> {
        Self::from_config(ConfigLoader::load()?)
    }

    pub fn from_config(config: Config) -> Result<Self> {
        let mut registry = TemplateRegistry::new();
        if let Some(dir) = &config.template.custom_dir {
            if dir.is_dir() {
                let loaded = registry.load_dir(dir)?;
                info!("Registered {} custom templates from {}", loaded, dir.display());
            } else {
                return Err(DocError::Config(format!(
                    "template.custom_dir is not a directory: {}",
                    dir.display()
                )));
            }
        }

        Ok(Self {
            config,
            registry: registry.into_shared(),
        })
    }

    /// Explicit output directory, or the configured one
    pub fn output_dir(&self, requested: Option<PathBuf>) -> PathBuf {
        requested.unwrap_or_else(|| self.config.output.dir.clone())
    }

    /// Requested or configured template, with `auto` resolved against `text`
    pub fn template_for(&self, requested: Option<String>, text: &str) -> String {
        let name = requested.unwrap_or_else(|| self.config.template.default.clone());
        if name != AUTO_TEMPLATE {
            return name;
        }
        let structure = NavigationSynthesizer::new(
            self.config.structure.path_layout,
            self.config.structure.path_collisions,
        )
        .analyze(text);
        resolve_template(&name, &structure)
    }
}

/// Read a UTF-8 input file
pub fn read_input(path: &Path) -> Result<String> {
    if !path.is_file() {
        return Err(DocError::Source(format!("File not found: {}", path.display())));
    }
    Ok(fs::read_to_string(path)?)
}

/// Write one artefact into the output directory, creating it if needed
pub fn write_output(dir: &Path, name: &str, content: &str) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(name);
    fs::write(&path, content)?;
    Ok(path)
}

/// `<stem>_formatted.md` for an input path
pub fn formatted_name(input: &Path) -> String {
    format!("{}_formatted.md", artifact_stem(&input.to_string_lossy()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_context_registers_custom_dir() {
        let dir = TempDir::new().unwrap();
        let registry = TemplateRegistry::new();
        registry
            .save("minimal", &dir.path().join("bare.yaml"))
            .unwrap();

        let mut config = Config::default();
        config.template.custom_dir = Some(dir.path().to_path_buf());
        let ctx = CommandContext::from_config(config).unwrap();

        assert!(ctx.registry.read().unwrap().contains("bare"));
    }

    #[test]
    fn test_context_rejects_missing_custom_dir() {
        let mut config = Config::default();
        config.template.custom_dir = Some(PathBuf::from("/nonexistent/docweave/templates"));
        assert!(CommandContext::from_config(config).is_err());
    }

    #[test]
    fn test_configured_auto_template_resolves() {
        let mut config = Config::default();
        config.template.default = "auto".to_string();
        let ctx = CommandContext::from_config(config).unwrap();

        assert_eq!(ctx.template_for(None, "# API Reference\n## Endpoints"), "technical_docs");
        assert_eq!(ctx.template_for(Some("minimal".to_string()), "# API"), "minimal");
    }

    #[test]
    fn test_output_helpers() {
        let dir = TempDir::new().unwrap();
        let path = write_output(&dir.path().join("out"), "navigation.yml", "nav:").unwrap();
        assert_eq!(read_input(&path).unwrap(), "nav:");
        assert_eq!(formatted_name(Path::new("docs/handbook.md")), "handbook_formatted.md");
        assert!(read_input(&dir.path().join("missing.md")).is_err());
    }
}
