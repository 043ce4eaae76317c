//! Configuration Management
//!
//! Unified configuration system with hierarchical resolution:
//! 1. Built-in defaults
//! 2. Global config (`$XDG_CONFIG_HOME/docweave/config.toml`)
//! 3. Project config (`.docweave/config.toml`)
//! 4. Environment variables (`DOCWEAVE_*`)
//! 5. CLI arguments (highest priority)

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::*;
