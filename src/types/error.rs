//! Unified Error Type System
//!
//! Centralized error types for the entire application.
//!
//! ## Error Categories
//!
//! - **Core**: template registration is the only hard failure inside the
//!   structuring pipeline; everything else degrades into data
//! - **Extraction**: HTML salvage stage failures, caught by the extractor
//! - **Collaborators**: source, converter, and publisher failures, surfaced to
//!   the caller of the pipeline
//!
//! Transient collaborator failures can be retried; see [`DocError::is_transient`].

use thiserror::Error;

// =============================================================================
// Application Error
// =============================================================================

#[derive(Debug, Error)]
pub enum DocError {
    // -------------------------------------------------------------------------
    // System Errors (auto From impl)
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("HTTP error: {0}")]
    Http(String),

    // -------------------------------------------------------------------------
    // Core Errors
    // -------------------------------------------------------------------------
    /// A custom profile is missing required structural or formatting keys
    #[error("Invalid template '{name}': {reason}")]
    TemplateValidation { name: String, reason: String },

    /// A fallback extraction stage failed; never escapes the extractor
    #[error("Extraction stage '{stage}' failed: {message}")]
    Extraction { stage: String, message: String },

    #[error("Config error: {0}")]
    Config(String),

    // -------------------------------------------------------------------------
    // Collaborator Errors
    // -------------------------------------------------------------------------
    #[error("Source error: {0}")]
    Source(String),

    #[error("Conversion error: {0}")]
    Convert(String),

    #[error("Publish error for {path}: {message}")]
    Publish {
        path: String,
        message: String,
        transient: bool,
    },
}

pub type Result<T> = std::result::Result<T, DocError>;

// =============================================================================
// Helper Functions
// =============================================================================

impl DocError {
    /// Create a template validation error
    pub fn template(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::TemplateValidation {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create an extraction stage error
    pub fn extraction(stage: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Extraction {
            stage: stage.into(),
            message: message.into(),
        }
    }

    /// Create a publish error that should not be retried
    pub fn publish(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Publish {
            path: path.into(),
            message: message.into(),
            transient: false,
        }
    }

    /// Create a publish error worth retrying (5xx, 429, connection resets)
    pub fn publish_transient(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Publish {
            path: path.into(),
            message: message.into(),
            transient: true,
        }
    }

    /// Check if this error is worth retrying
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Publish { transient, .. } => *transient,
            Self::Http(_) => true,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for DocError {
    fn from(err: reqwest::Error) -> Self {
        DocError::Http(err.to_string())
    }
}

/// Context extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn with_context<C: Into<String>>(self, context: C) -> Result<T>;

    /// Add context using a closure (lazy evaluation)
    fn with_context_fn<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T, E: std::error::Error + Send + Sync + 'static> ResultExt<T> for std::result::Result<T, E> {
    fn with_context<C: Into<String>>(self, context: C) -> Result<T> {
        self.map_err(|e| DocError::Source(format!("{}: {}", context.into(), e)))
    }

    fn with_context_fn<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.map_err(|e| DocError::Source(format!("{}: {}", f().into(), e)))
    }
}

// =============================================================================
// Tests
// =============================================================================
