//! Local directory publisher.

use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

use super::{PublishRequest, Publisher};
use crate::types::{DocError, Result};

/// Writes each request under a root directory, creating parents as needed
#[derive(Debug, Clone)]
pub struct DirectoryPublisher {
    root: PathBuf,
}

impl DirectoryPublisher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Reject absolute paths and parent traversal
    fn target(&self, relative: &str) -> Result<PathBuf> {
        let path = Path::new(relative);
        let safe = !relative.is_empty()
            && path
                .components()
                .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
        if !safe {
            return Err(DocError::publish(relative, "path escapes the output directory"));
        }
        Ok(self.root.join(path))
    }
}

#[async_trait]
impl Publisher for DirectoryPublisher {
    async fn publish(&self, request: &PublishRequest) -> Result<String> {
        let target = self.target(&request.path)?;
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&target, &request.content).await?;
        debug!("Wrote {}", target.display());
        Ok(target.display().to_string())
    }

    fn name(&self) -> &str {
        "directory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_publish_creates_and_overwrites() {
        let dir = TempDir::new().unwrap();
        let publisher = DirectoryPublisher::new(dir.path());

        let location = publisher
            .publish(&PublishRequest::new("about/about.md", "v1"))
            .await
            .unwrap();
        publisher
            .publish(&PublishRequest::new("about/about.md", "v2"))
            .await
            .unwrap();

        assert!(location.ends_with("about.md"));
        let written = std::fs::read_to_string(dir.path().join("about/about.md")).unwrap();
        assert_eq!(written, "v2");
    }

    #[tokio::test]
    async fn test_rejects_traversal() {
        let dir = TempDir::new().unwrap();
        let publisher = DirectoryPublisher::new(dir.path());

        for path in ["../escape.md", "/etc/passwd", ""] {
            let err = publisher
                .publish(&PublishRequest::new(path, "x"))
                .await
                .unwrap_err();
            assert!(matches!(err, DocError::Publish { transient: false, .. }));
        }
    }
}
