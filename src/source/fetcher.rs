//! Source fetchers.
//!
//! A fetcher resolves a document identifier to its title plus whatever
//! representations are available: structured content, heading text, and a raw
//! HTML export for the fallback path.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::content_model::ContentDocument;
use crate::types::{DocError, Result, ResultExt};

/// Everything a source knows about one document
#[derive(Debug, Clone, Default)]
pub struct SourceDocument {
    pub title: String,
    pub structured: Option<ContentDocument>,
    pub text: Option<String>,
    pub raw_html: Option<String>,
}

impl SourceDocument {
    pub fn from_text(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            text: Some(text.into()),
            ..Self::default()
        }
    }

    pub fn with_raw_html(mut self, html: impl Into<String>) -> Self {
        self.raw_html = Some(html.into());
        self
    }
}

#[async_trait]
pub trait SourceFetcher: Send + Sync {
    async fn fetch(&self, id: &str) -> Result<SourceDocument>;

    fn name(&self) -> &str;
}

/// Reads documents from the local filesystem.
///
/// `.json` files are parsed as structured content, `.html`/`.htm` files are
/// treated as raw exports, anything else as heading text. A sibling
/// `<stem>.html` next to a non-HTML source is attached as its raw export.
#[derive(Debug, Clone, Default)]
pub struct FileSource {
    root: Option<PathBuf>,
}

impl FileSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve relative identifiers against a base directory
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    fn resolve(&self, id: &str) -> PathBuf {
        let path = Path::new(id);
        match &self.root {
            Some(root) if path.is_relative() => root.join(path),
            _ => path.to_path_buf(),
        }
    }
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default()
}

#[async_trait]
impl SourceFetcher for FileSource {
    async fn fetch(&self, id: &str) -> Result<SourceDocument> {
        let path = self.resolve(id);
        if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
            return Err(DocError::Source(format!("File not found: {}", path.display())));
        }

        let raw = tokio::fs::read_to_string(&path)
            .await
            .with_context_fn(|| format!("reading {}", path.display()))?;
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_string();

        let mut doc = SourceDocument {
            title: stem.clone(),
            ..SourceDocument::default()
        };

        match extension_of(&path).as_str() {
            "json" => {
                let structured = ContentDocument::from_json(&raw)?;
                if !structured.title.trim().is_empty() {
                    doc.title = structured.title.clone();
                }
                doc.structured = Some(structured);
            }
            "html" | "htm" => {
                doc.raw_html = Some(raw);
                return Ok(doc);
            }
            _ => doc.text = Some(raw),
        }

        let sibling = path.with_file_name(format!("{}.html", stem));
        if tokio::fs::try_exists(&sibling).await.unwrap_or(false) {
            debug!("Attaching HTML export {}", sibling.display());
            doc.raw_html = Some(
                tokio::fs::read_to_string(&sibling)
                    .await
                    .with_context_fn(|| format!("reading {}", sibling.display()))?,
            );
        }

        Ok(doc)
    }

    fn name(&self) -> &str {
        "file"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_text_source_uses_stem_as_title() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("handbook.md"), "# Home\nbody").unwrap();

        let doc = FileSource::with_root(dir.path())
            .fetch("handbook.md")
            .await
            .unwrap();
        assert_eq!(doc.title, "handbook");
        assert_eq!(doc.text.as_deref(), Some("# Home\nbody"));
        assert!(doc.raw_html.is_none());
        assert!(doc.structured.is_none());
    }

    #[tokio::test]
    async fn test_json_source_with_sibling_export() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("doc.json"),
            r#"{"title": "Team Handbook", "body": {"content": []}}"#,
        )
        .unwrap();
        std::fs::write(dir.path().join("doc.html"), "<h1>Team Handbook</h1>").unwrap();

        let path = dir.path().join("doc.json");
        let doc = FileSource::new()
            .fetch(path.to_str().unwrap())
            .await
            .unwrap();
        assert_eq!(doc.title, "Team Handbook");
        assert!(doc.structured.is_some());
        assert_eq!(doc.raw_html.as_deref(), Some("<h1>Team Handbook</h1>"));
    }

    #[tokio::test]
    async fn test_html_source_is_raw_export() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("export.HTML"), "<p>x</p>").unwrap();

        let doc = FileSource::with_root(dir.path())
            .fetch("export.HTML")
            .await
            .unwrap();
        assert_eq!(doc.raw_html.as_deref(), Some("<p>x</p>"));
        assert!(doc.text.is_none());
    }

    #[tokio::test]
    async fn test_missing_file_is_source_error() {
        let dir = TempDir::new().unwrap();
        let err = FileSource::with_root(dir.path())
            .fetch("absent.md")
            .await
            .unwrap_err();
        assert!(matches!(err, DocError::Source(_)));
    }
}
