//! Template Registry
//!
//! Holds the built-in profiles plus caller-registered custom ones. Custom
//! profiles shadow built-ins of the same name. Unknown names resolve to the
//! default profile instead of failing.
//!
//! The registry is a plain value; wrap it in [`SharedRegistry`] when several
//! tasks need it (one writer, many readers).

use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::Path;
use std::sync::{Arc, RwLock};
use tracing::{debug, info, warn};

use super::profile::{TemplateProfile, builtin_profiles};
use crate::constants::templates::DEFAULT_PROFILE;
use crate::types::{DocError, Result};

pub type SharedRegistry = Arc<RwLock<TemplateRegistry>>;

const REQUIRED_KEYS: [&str; 5] = ["name", "description", "structure", "sections", "formatting"];
const STRUCTURE_KEYS: [&str; 4] = ["frontmatter", "toc", "breadcrumbs", "edit_uri"];
const FORMATTING_KEYS: [&str; 4] = ["heading_style", "code_blocks", "admonitions", "tables"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateKind {
    Default,
    Custom,
}

impl std::fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Default => write!(f, "default"),
            Self::Custom => write!(f, "custom"),
        }
    }
}

/// Listing entry for one registered profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateSummary {
    pub name: String,
    pub display_name: String,
    pub description: String,
    pub kind: TemplateKind,
}

#[derive(Debug, Clone)]
pub struct TemplateRegistry {
    builtins: Vec<(String, TemplateProfile)>,
    custom: Vec<(String, TemplateProfile)>,
    fallback: TemplateProfile,
}

impl Default for TemplateRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateRegistry {
    pub fn new() -> Self {
        let builtins: Vec<(String, TemplateProfile)> = builtin_profiles()
            .into_iter()
            .map(|(key, profile)| (key.to_string(), profile))
            .collect();
        let fallback = builtins
            .iter()
            .find(|(key, _)| key == DEFAULT_PROFILE)
            .map(|(_, profile)| profile.clone())
            .unwrap_or_else(|| builtins[0].1.clone());

        Self {
            builtins,
            custom: Vec::new(),
            fallback,
        }
    }

    pub fn into_shared(self) -> SharedRegistry {
        Arc::new(RwLock::new(self))
    }

    fn find(&self, name: &str) -> Option<&TemplateProfile> {
        self.custom
            .iter()
            .chain(self.builtins.iter())
            .find(|(key, _)| key == name)
            .map(|(_, profile)| profile)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    /// Look up a profile, falling back to the default profile
    pub fn get(&self, name: &str) -> &TemplateProfile {
        if let Some(profile) = self.find(name) {
            return profile;
        }
        debug!("Template '{}' not found, using '{}'", name, DEFAULT_PROFILE);
        &self.fallback
    }

    /// Built-ins first in registration order, then custom profiles
    pub fn list(&self) -> Vec<TemplateSummary> {
        let builtins = self
            .builtins
            .iter()
            .map(|(key, profile)| summarize(key, profile, TemplateKind::Default));
        let custom = self
            .custom
            .iter()
            .map(|(key, profile)| summarize(key, profile, TemplateKind::Custom));
        builtins.chain(custom).collect()
    }

    /// Register a typed custom profile, replacing any custom one of the same name
    pub fn register(&mut self, name: impl Into<String>, profile: TemplateProfile) -> Result<()> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DocError::template(name, "template name must not be empty"));
        }

        match self.custom.iter_mut().find(|(key, _)| *key == name) {
            Some(slot) => slot.1 = profile,
            None => self.custom.push((name.clone(), profile)),
        }
        info!("Custom template '{}' registered", name);
        Ok(())
    }

    /// Validate and register an untyped profile (parsed JSON or YAML)
    pub fn register_value(&mut self, name: &str, value: Value) -> Result<()> {
        let profile = parse_profile(name, value)?;
        self.register(name, profile)
    }

    /// Write a profile as YAML
    pub fn save(&self, name: &str, path: &Path) -> Result<()> {
        let yaml = serde_yaml::to_string(self.get(name))?;
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, yaml)?;
        info!("Template '{}' saved to {}", name, path.display());
        Ok(())
    }

    /// Read and validate a YAML profile without registering it
    pub fn load(path: &Path) -> Result<TemplateProfile> {
        let name = profile_name_from_path(path);
        let raw = fs::read_to_string(path)?;
        let yaml: serde_yaml::Value = serde_yaml::from_str(&raw)?;
        let value = serde_json::to_value(yaml)?;
        let profile = parse_profile(&name, value)?;
        info!("Template loaded from {}", path.display());
        Ok(profile)
    }

    /// Register every `*.yml` / `*.yaml` profile in a directory under its file
    /// stem. Invalid files are skipped with a warning.
    pub fn load_dir(&mut self, dir: &Path) -> Result<usize> {
        let mut entries: Vec<_> = fs::read_dir(dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| {
                path.extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| ext == "yml" || ext == "yaml")
            })
            .collect();
        entries.sort();

        let mut loaded = 0;
        for path in entries {
            match Self::load(&path) {
                Ok(profile) => {
                    self.register(profile_name_from_path(&path), profile)?;
                    loaded += 1;
                }
                Err(e) => warn!("Skipping template {}: {}", path.display(), e),
            }
        }
        Ok(loaded)
    }
}

fn summarize(key: &str, profile: &TemplateProfile, kind: TemplateKind) -> TemplateSummary {
    TemplateSummary {
        name: key.to_string(),
        display_name: profile.name.clone(),
        description: profile.description.clone(),
        kind,
    }
}

fn profile_name_from_path(path: &Path) -> String {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or_default()
        .to_string()
}

/// Structural check naming the first missing key, then typed deserialization
fn parse_profile(name: &str, value: Value) -> Result<TemplateProfile> {
    validate_value(&value).map_err(|reason| DocError::template(name, reason))?;
    serde_json::from_value(value).map_err(|e| DocError::template(name, e.to_string()))
}

fn validate_value(value: &Value) -> std::result::Result<(), String> {
    let Some(root) = value.as_object() else {
        return Err("template must be a mapping".to_string());
    };

    if let Some(key) = REQUIRED_KEYS.iter().find(|k| !root.contains_key(**k)) {
        return Err(format!("missing required key: {}", key));
    }

    let structure = &root["structure"];
    if let Some(key) = STRUCTURE_KEYS.iter().find(|k| structure.get(**k).is_none()) {
        return Err(format!("missing structure key: {}", key));
    }

    if !root["sections"].is_array() {
        return Err("sections must be a list".to_string());
    }

    let formatting = &root["formatting"];
    if let Some(key) = FORMATTING_KEYS.iter().find(|k| formatting.get(**k).is_none()) {
        return Err(format!("missing formatting key: {}", key));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn valid_value() -> Value {
        json!({
            "name": "Runbook",
            "description": "Operational runbooks",
            "structure": {"frontmatter": false, "toc": true, "breadcrumbs": false, "edit_uri": false},
            "sections": [{"level": 1, "title": "Alerts", "required": true}],
            "formatting": {"heading_style": "setext", "code_blocks": true, "admonitions": true, "tables": false}
        })
    }

    #[test]
    fn test_unknown_name_falls_back_to_default() {
        let registry = TemplateRegistry::new();
        assert_eq!(registry.get("nonexistent").name, "Standard Documentation");
        assert_eq!(registry.get("minimal").name, "Minimal Documentation");
    }

    #[test]
    fn test_list_builtins_then_custom() {
        let mut registry = TemplateRegistry::new();
        registry.register_value("runbook", valid_value()).unwrap();

        let listed = registry.list();
        assert_eq!(listed.len(), 5);
        assert_eq!(listed[0].name, "standard_docs");
        assert_eq!(listed[0].kind, TemplateKind::Default);
        assert_eq!(listed[4].name, "runbook");
        assert_eq!(listed[4].display_name, "Runbook");
        assert_eq!(listed[4].kind, TemplateKind::Custom);
    }

    #[test]
    fn test_custom_shadows_builtin() {
        let mut registry = TemplateRegistry::new();
        registry.register_value("minimal", valid_value()).unwrap();
        assert_eq!(registry.get("minimal").name, "Runbook");
    }

    #[test]
    fn test_register_value_reports_first_missing_key() {
        let mut registry = TemplateRegistry::new();

        let mut value = valid_value();
        value.as_object_mut().unwrap().remove("formatting");
        let err = registry.register_value("broken", value).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid template 'broken': missing required key: formatting"
        );
        assert!(!registry.contains("broken"));

        let mut value = valid_value();
        value["structure"].as_object_mut().unwrap().remove("toc");
        let err = registry.register_value("broken", value).unwrap_err();
        assert!(err.to_string().ends_with("missing structure key: toc"));

        let mut value = valid_value();
        value["sections"] = json!("Alerts");
        let err = registry.register_value("broken", value).unwrap_err();
        assert!(err.to_string().ends_with("sections must be a list"));

        let mut value = valid_value();
        value["formatting"].as_object_mut().unwrap().remove("tables");
        let err = registry.register_value("broken", value).unwrap_err();
        assert!(err.to_string().ends_with("missing formatting key: tables"));
    }

    #[test]
    fn test_register_rejects_empty_name() {
        let mut registry = TemplateRegistry::new();
        let profile = registry.get("minimal").clone();
        assert!(matches!(
            registry.register("  ", profile),
            Err(DocError::TemplateValidation { .. })
        ));
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("technical.yaml");

        let registry = TemplateRegistry::new();
        registry.save("technical_docs", &path).unwrap();

        let loaded = TemplateRegistry::load(&path).unwrap();
        assert_eq!(&loaded, registry.get("technical_docs"));
    }

    #[test]
    fn test_load_rejects_incomplete_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("partial.yml");
        fs::write(&path, "name: Partial\ndescription: no structure\n").unwrap();

        let err = TemplateRegistry::load(&path).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid template 'partial': missing required key: structure"
        );
    }

    #[test]
    fn test_load_dir_registers_valid_files() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("runbook.yaml"),
            serde_yaml::to_string(&valid_value()).unwrap(),
        )
        .unwrap();
        fs::write(dir.path().join("broken.yml"), "name: Broken\n").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let mut registry = TemplateRegistry::new();
        assert_eq!(registry.load_dir(dir.path()).unwrap(), 1);
        assert!(registry.contains("runbook"));
        assert!(!registry.contains("broken"));
    }

    #[test]
    fn test_shared_registry_readers_see_writes() {
        let shared = TemplateRegistry::new().into_shared();
        shared
            .write()
            .unwrap()
            .register_value("runbook", valid_value())
            .unwrap();
        assert!(shared.read().unwrap().contains("runbook"));
    }
}
