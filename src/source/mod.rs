//! Document sources and the structured content model.

pub mod content_model;
pub mod fetcher;

pub use content_model::{ContentDocument, TableMode};
pub use fetcher::{FileSource, SourceDocument, SourceFetcher};
