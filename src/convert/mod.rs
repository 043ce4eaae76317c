//! Text converters: turn a fetched source into heading-marked text.
//!
//! The structural converter is deterministic. The OpenAI converter is an
//! opaque, possibly lossy transformer and is only used when enabled.

mod openai;

pub use openai::OpenAiConverter;

use async_trait::async_trait;

use crate::source::{SourceDocument, TableMode};
use crate::types::Result;

#[async_trait]
pub trait TextConverter: Send + Sync {
    async fn convert(&self, doc: &SourceDocument) -> Result<String>;

    fn name(&self) -> &str;
}

/// Best text representation available without external help
pub fn structural_text(doc: &SourceDocument, tables: TableMode) -> String {
    match (&doc.structured, &doc.text) {
        (Some(structured), _) => structured.to_heading_text(tables),
        (None, Some(text)) => text.clone(),
        (None, None) => String::new(),
    }
}

/// Normalizes structured content locally
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuralConverter {
    tables: TableMode,
}

impl StructuralConverter {
    pub fn new(tables: TableMode) -> Self {
        Self { tables }
    }
}

#[async_trait]
impl TextConverter for StructuralConverter {
    async fn convert(&self, doc: &SourceDocument) -> Result<String> {
        Ok(structural_text(doc, self.tables))
    }

    fn name(&self) -> &str {
        "structural"
    }
}
