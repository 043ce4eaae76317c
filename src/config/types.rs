//! Configuration Types
//!
//! All configuration structures with sensible defaults.
//! Supports global (`$XDG_CONFIG_HOME/docweave/`) and project (`.docweave/`)
//! level configuration. Credentials never live here; they are read from the
//! environment on demand.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::constants::fallback::DEFAULT_RATIO;
use crate::constants::templates::DEFAULT_PROFILE;
use crate::structure::{CollisionPolicy, PathLayout};
use crate::types::{DocError, Result};

pub const OPENAI_KEY_ENV: &str = "OPENAI_API_KEY";
pub const GITHUB_TOKEN_ENV: &str = "GITHUB_TOKEN";

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Configuration version
    pub version: String,

    /// Path allocation and collision handling
    pub structure: StructureConfig,

    /// HTML salvage path
    pub fallback: FallbackConfig,

    /// Template selection and custom profiles
    pub template: TemplateConfig,

    /// Local artefact output
    pub output: OutputConfig,

    /// LLM-backed text conversion
    pub llm: LlmConfig,

    /// Publishing target
    pub github: GithubConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            structure: StructureConfig::default(),
            fallback: FallbackConfig::default(),
            template: TemplateConfig::default(),
            output: OutputConfig::default(),
            llm: LlmConfig::default(),
            github: GithubConfig::default(),
        }
    }
}

impl Config {
    /// Validate configuration values are within acceptable ranges.
    /// Returns `DocError::Config` on validation failure.
    pub fn validate(&self) -> Result<()> {
        if self.fallback.ratio.is_nan() || self.fallback.ratio <= 0.0 {
            return Err(DocError::Config(format!(
                "fallback ratio must be greater than 0, got {}",
                self.fallback.ratio
            )));
        }

        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(DocError::Config(format!(
                "LLM temperature must be between 0.0 and 2.0, got {}",
                self.llm.temperature
            )));
        }

        if self.llm.timeout_secs == 0 {
            return Err(DocError::Config(
                "LLM timeout_secs must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

// =============================================================================
// Structure Configuration
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StructureConfig {
    /// `title-prefix` or `nested`
    pub path_layout: PathLayout,

    /// `overwrite` or `suffix`
    pub path_collisions: CollisionPolicy,

    /// `overwrite` or `suffix`
    pub anchor_collisions: CollisionPolicy,
}

// =============================================================================
// Fallback Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FallbackConfig {
    pub enabled: bool,

    /// Salvaged text must be longer than `ratio` × primary text length
    pub ratio: f64,

    /// Titles forced to level 1 after salvage
    pub top_level_headers: Vec<String>,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ratio: DEFAULT_RATIO,
            top_level_headers: Vec::new(),
        }
    }
}

// =============================================================================
// Template Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    /// Profile used when none is requested
    pub default: String,

    /// Directory of YAML profiles registered at start-up
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_dir: Option<PathBuf>,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            default: DEFAULT_PROFILE.to_string(),
            custom_dir: None,
        }
    }
}

// =============================================================================
// Output Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("output"),
        }
    }
}

// =============================================================================
// LLM Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Route conversion through the LLM instead of structural normalization
    pub enabled: bool,

    pub api_base: String,

    /// Model name
    pub model: String,

    /// Lower values keep conversions consistent between runs
    pub temperature: f32,

    pub max_tokens: usize,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            api_base: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            temperature: 0.3,
            max_tokens: 4000,
            timeout_secs: 120,
        }
    }
}

impl LlmConfig {
    /// API key from the environment
    pub fn api_key(&self) -> Option<SecretString> {
        secret_from_env(OPENAI_KEY_ENV)
    }
}

// =============================================================================
// GitHub Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GithubConfig {
    /// `owner/name`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repo: Option<String>,

    pub branch: String,

    pub api_base: String,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            repo: None,
            branch: "main".to_string(),
            api_base: "https://api.github.com".to_string(),
        }
    }
}

impl GithubConfig {
    /// Token from the environment
    pub fn token(&self) -> Option<SecretString> {
        secret_from_env(GITHUB_TOKEN_ENV)
    }
}

fn secret_from_env(var: &str) -> Option<SecretString> {
    std::env::var(var)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .map(SecretString::from)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.version, "1.0");
        assert_eq!(config.template.default, "standard_docs");
        assert_eq!(config.structure.path_layout, PathLayout::TitlePrefix);
        assert_eq!(config.structure.path_collisions, CollisionPolicy::Overwrite);
        assert!(config.fallback.enabled);
        assert!(config.fallback.top_level_headers.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_ratio() {
        let mut config = Config::default();
        config.fallback.ratio = 0.0;
        assert!(matches!(config.validate(), Err(DocError::Config(_))));

        config.fallback.ratio = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_llm_ranges() {
        let mut config = Config::default();
        config.llm.temperature = 2.5;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.llm.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_roundtrip_keeps_kebab_enums() {
        let mut config = Config::default();
        config.structure.path_layout = PathLayout::Nested;
        config.structure.anchor_collisions = CollisionPolicy::Suffix;

        let rendered = toml::to_string_pretty(&config).unwrap();
        assert!(rendered.contains("path_layout = \"nested\""));
        assert!(rendered.contains("anchor_collisions = \"suffix\""));

        let parsed: Config = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed.structure.path_layout, PathLayout::Nested);
    }
}
