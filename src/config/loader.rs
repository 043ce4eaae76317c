//! Configuration Loader (Figment-based)
//!
//! Loads and merges configuration from multiple sources using Figment:
//! 1. Built-in defaults (Serialized)
//! 2. Global config (`$XDG_CONFIG_HOME/docweave/config.toml`)
//! 3. Project config (`.docweave/config.toml`)
//! 4. Environment variables (`DOCWEAVE_*`, nested keys split on `__`)

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::types::Config;
use crate::types::{DocError, Result};

const ENV_PREFIX: &str = "DOCWEAVE_";

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with full resolution chain:
    /// defaults → global → project → env vars
    pub fn load() -> Result<Config> {
        Self::load_from(
            Self::global_config_path().as_deref(),
            &Self::project_config_path(),
        )
    }

    /// Resolution chain with explicit file locations
    pub fn load_from(global: Option<&Path>, project: &Path) -> Result<Config> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        if let Some(global_path) = global
            && global_path.exists()
        {
            debug!("Loading global config from: {}", global_path.display());
            figment = figment.merge(Toml::file(global_path));
        }

        if project.exists() {
            debug!("Loading project config from: {}", project.display());
            figment = figment.merge(Toml::file(project));
        }

        // DOCWEAVE_FALLBACK__RATIO -> fallback.ratio
        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__").lowercase(true));

        let config: Config = figment
            .extract()
            .map_err(|e| DocError::Config(format!("Configuration error: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Load configuration from a specific file only
    pub fn load_from_file(path: &Path) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(path))
            .extract()
            .map_err(|e| DocError::Config(format!("Configuration error: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    // =========================================================================
    // Path Management
    // =========================================================================

    /// Get path to global config directory (`~/.config/docweave/`)
    pub fn global_dir() -> Option<PathBuf> {
        env::var("XDG_CONFIG_HOME")
            .ok()
            .map(PathBuf::from)
            .or_else(|| {
                env::var("HOME")
                    .ok()
                    .map(|home| PathBuf::from(home).join(".config"))
            })
            .map(|p| p.join("docweave"))
    }

    /// Get path to global config file
    pub fn global_config_path() -> Option<PathBuf> {
        Self::global_dir().map(|dir| dir.join("config.toml"))
    }

    /// Get path to project config file
    pub fn project_config_path() -> PathBuf {
        Self::project_dir().join("config.toml")
    }

    /// Get project data directory
    pub fn project_dir() -> PathBuf {
        PathBuf::from(".docweave")
    }

    // =========================================================================
    // Config Commands
    // =========================================================================

    /// Render the effective configuration as TOML or JSON
    pub fn render(config: &Config, as_json: bool) -> Result<String> {
        if as_json {
            Ok(serde_json::to_string_pretty(config)?)
        } else {
            toml::to_string_pretty(config).map_err(|e| DocError::Config(e.to_string()))
        }
    }

    // =========================================================================
    // Initialization
    // =========================================================================

    /// Write a starter config file; an existing one is kept unless `force`
    pub fn init_at(path: &Path, force: bool) -> Result<bool> {
        if path.exists() && !force {
            info!("Config exists: {}", path.display());
            return Ok(false);
        }

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, Self::default_project_config())?;
        info!("Created config: {}", path.display());
        Ok(true)
    }


    // =========================================================================
    // Internal
    // =========================================================================

    fn default_project_config() -> String {
        r#"# docweave configuration
# Project settings override ~/.config/docweave/config.toml.
# Environment overrides use DOCWEAVE_<SECTION>__<KEY>, e.g. DOCWEAVE_FALLBACK__RATIO=3.0

version = "1.0"

[structure]
path_layout = "title-prefix"   # or "nested"
path_collisions = "overwrite"  # or "suffix"
anchor_collisions = "overwrite"

[fallback]
enabled = true
ratio = 2.0
top_level_headers = []

[template]
default = "standard_docs"
# custom_dir = ".docweave/templates"

[output]
dir = "output"

# API key is read from OPENAI_API_KEY
[llm]
enabled = false
model = "gpt-4o-mini"
temperature = 0.3
max_tokens = 4000

# Token is read from GITHUB_TOKEN
[github]
# repo = "owner/docs"
branch = "main"
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structure::{CollisionPolicy, PathLayout};
    use tempfile::TempDir;

    #[test]
    fn test_load_without_files_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let config =
            ConfigLoader::load_from(None, &dir.path().join("missing.toml")).unwrap();
        assert_eq!(config.version, "1.0");
        assert_eq!(config.output.dir, PathBuf::from("output"));
    }

    #[test]
    fn test_project_overrides_global() {
        let dir = TempDir::new().unwrap();
        let global = dir.path().join("global.toml");
        let project = dir.path().join("project.toml");
        fs::write(
            &global,
            "[fallback]\nratio = 3.0\ntop_level_headers = [\"Home\"]\n[template]\ndefault = \"minimal\"\n",
        )
        .unwrap();
        fs::write(
            &project,
            "[template]\ndefault = \"technical_docs\"\n[structure]\npath_layout = \"nested\"\npath_collisions = \"suffix\"\n",
        )
        .unwrap();

        let config = ConfigLoader::load_from(Some(&global), &project).unwrap();
        assert_eq!(config.fallback.ratio, 3.0);
        assert_eq!(config.fallback.top_level_headers, vec!["Home"]);
        assert_eq!(config.template.default, "technical_docs");
        assert_eq!(config.structure.path_layout, PathLayout::Nested);
        assert_eq!(config.structure.path_collisions, CollisionPolicy::Suffix);
    }

    #[test]
    fn test_invalid_file_fails_validation() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[fallback]\nratio = -1.0\n").unwrap();

        assert!(matches!(
            ConfigLoader::load_from_file(&path),
            Err(DocError::Config(_))
        ));
    }

    #[test]
    fn test_init_writes_loadable_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".docweave/config.toml");

        assert!(ConfigLoader::init_at(&path, false).unwrap());
        assert!(!ConfigLoader::init_at(&path, false).unwrap());
        assert!(ConfigLoader::init_at(&path, true).unwrap());

        let config = ConfigLoader::load_from_file(&path).unwrap();
        assert_eq!(config.github.branch, "main");
        assert!(!config.llm.enabled);
    }

    #[test]
    fn test_env_override() {
        let dir = TempDir::new().unwrap();
        // SAFETY: This test runs in isolation
        unsafe {
            std::env::set_var("DOCWEAVE_LLM__MODEL", "test-model");
        }
        let config = ConfigLoader::load_from(None, &dir.path().join("none.toml")).unwrap();
        assert_eq!(config.llm.model, "test-model");
        unsafe {
            std::env::remove_var("DOCWEAVE_LLM__MODEL");
        }
    }

    #[test]
    fn test_render_formats() {
        let config = Config::default();
        let toml = ConfigLoader::render(&config, false).unwrap();
        assert!(toml.contains("[fallback]"));
        let json = ConfigLoader::render(&config, true).unwrap();
        assert!(json.contains("\"path_layout\": \"title-prefix\""));
    }
}
