//! Document Pipeline
//!
//! fetch → convert → (HTML fallback) → structure → validate → merge → publish
//!
//! Collaborator failures (source, converter, publisher) propagate to the
//! caller. Everything inside the structuring core degrades into data: a
//! failed fallback stage yields partial text, navigation issues land in the
//! validation report.

use chrono::Utc;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::Config;
use crate::convert::TextConverter;
use crate::publish::{PublishRequest, Publisher};
use crate::source::{SourceDocument, SourceFetcher};
use crate::structure::{
    DocumentStructure, HtmlFallbackExtractor, NavigationSynthesizer, NavigationValidator,
    StructureMetadata, should_adopt,
};
use crate::template::{FrontmatterMetadata, SharedRegistry, TemplateMerger};
use crate::types::{Result, SectionDescriptor, ValidationReport};

/// Template name that selects the structure's suggestion
pub const AUTO_TEMPLATE: &str = "auto";

pub const NAVIGATION_FILE: &str = "navigation.yml";

#[derive(Debug, Clone, Default)]
pub struct ProcessOptions {
    /// Profile name, `auto`, or `None` for the configured default
    pub template: Option<String>,
    /// Analyze only: no body is rendered and nothing is published
    pub dry_run: bool,
    pub metadata: FrontmatterMetadata,
}

#[derive(Debug, Clone)]
pub struct ProcessOutcome {
    pub title: String,
    /// Profile actually applied
    pub template: String,
    pub used_fallback: bool,
    pub structure: DocumentStructure,
    /// Rendered `nav:` manifest
    pub navigation: String,
    pub report: ValidationReport,
    pub body: Option<String>,
    /// Locations returned by the publisher, in artefact order
    pub published: Vec<String>,
}

/// Persisted per-section summary of a run
#[derive(Debug, Serialize)]
pub struct StructureArtifact<'a> {
    pub title: &'a str,
    pub sections: Vec<SectionDescriptor>,
    pub suggested_template: &'a str,
    pub metadata: StructureMetadata,
}

impl ProcessOutcome {
    pub fn structure_artifact(&self) -> StructureArtifact<'_> {
        StructureArtifact {
            title: &self.title,
            sections: self.structure.descriptors(),
            suggested_template: &self.structure.suggested_template,
            metadata: self.structure.metadata,
        }
    }
}

pub struct DocumentPipeline {
    fetcher: Arc<dyn SourceFetcher>,
    converter: Arc<dyn TextConverter>,
    publisher: Option<Arc<dyn Publisher>>,
    registry: SharedRegistry,
    config: Config,
}

impl DocumentPipeline {
    pub fn new(
        fetcher: Arc<dyn SourceFetcher>,
        converter: Arc<dyn TextConverter>,
        registry: SharedRegistry,
        config: Config,
    ) -> Self {
        Self {
            fetcher,
            converter,
            publisher: None,
            registry,
            config,
        }
    }

    pub fn with_publisher(mut self, publisher: Arc<dyn Publisher>) -> Self {
        self.publisher = Some(publisher);
        self
    }

    pub async fn process(&self, id: &str, options: ProcessOptions) -> Result<ProcessOutcome> {
        info!(
            "Processing '{}' (source: {}, converter: {})",
            id,
            self.fetcher.name(),
            self.converter.name()
        );

        let doc = self.fetcher.fetch(id).await?;
        let primary = self.converter.convert(&doc).await?;
        let (text, used_fallback) = self.choose_text(&doc, primary);

        let synthesizer = NavigationSynthesizer::new(
            self.config.structure.path_layout,
            self.config.structure.path_collisions,
        );
        let structure = synthesizer.analyze(&text);
        let navigation = structure.manifest();
        let report = NavigationValidator::new().validate(&navigation);

        let template = self.resolve_template(options.template.as_deref(), &structure);
        debug!("Using template '{}'", template);

        let mut outcome = ProcessOutcome {
            title: doc.title.clone(),
            template,
            used_fallback,
            structure,
            navigation,
            report,
            body: None,
            published: Vec::new(),
        };

        if options.dry_run {
            info!("Dry run: skipping render and publish for '{}'", id);
            return Ok(outcome);
        }

        let metadata = complete_metadata(options.metadata, &doc.title);
        outcome.body = Some(self.render(&text, &outcome.template, &metadata));

        if let Some(publisher) = &self.publisher {
            for request in self.artifacts(id, &outcome)? {
                let location = publisher.publish(&request).await?;
                outcome.published.push(location);
            }
            info!(
                "Published {} artefacts via {}",
                outcome.published.len(),
                publisher.name()
            );
        }

        Ok(outcome)
    }

    /// Primary text unless the HTML export recovers substantially more
    fn choose_text(&self, doc: &SourceDocument, primary: String) -> (String, bool) {
        let Some(html) = doc.raw_html.as_deref() else {
            return (primary, false);
        };
        if !self.config.fallback.enabled && !primary.trim().is_empty() {
            return (primary, false);
        }

        let extractor = HtmlFallbackExtractor::new(self.config.fallback.top_level_headers.clone());
        let salvaged = extractor.extract(html);
        let primary_len = primary_size(doc, &primary);

        if should_adopt(primary_len, salvaged.chars().count(), self.config.fallback.ratio) {
            (salvaged, true)
        } else {
            (primary, false)
        }
    }

    fn resolve_template(&self, requested: Option<&str>, structure: &DocumentStructure) -> String {
        resolve_template(requested.unwrap_or(&self.config.template.default), structure)
    }

    fn render(&self, text: &str, template: &str, metadata: &FrontmatterMetadata) -> String {
        let registry = self
            .registry
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        TemplateMerger::new(&registry)
            .with_anchor_collisions(self.config.structure.anchor_collisions)
            .apply(text, template, metadata)
    }

    fn artifacts(&self, id: &str, outcome: &ProcessOutcome) -> Result<Vec<PublishRequest>> {
        let stem = artifact_stem(id);
        let message = |path: &str| format!("Update {} from '{}'", path, outcome.title);

        let mut requests = Vec::with_capacity(3);
        if let Some(body) = &outcome.body {
            let path = format!("{}_formatted.md", stem);
            requests.push(PublishRequest::new(&path, body.clone()).with_message(message(&path)));
        }
        requests.push(
            PublishRequest::new(NAVIGATION_FILE, outcome.navigation.clone())
                .with_message(message(NAVIGATION_FILE)),
        );
        let path = format!("{}_structure.json", stem);
        let json = serde_json::to_string_pretty(&outcome.structure_artifact())?;
        requests.push(PublishRequest::new(&path, json).with_message(message(&path)));

        Ok(requests)
    }
}

/// Size signal for the fallback decision: the structured plain text when
/// available, the converted text otherwise
fn primary_size(doc: &SourceDocument, primary: &str) -> usize {
    match &doc.structured {
        Some(structured) => structured.plain_text().chars().count(),
        None => primary.chars().count(),
    }
}

fn complete_metadata(mut metadata: FrontmatterMetadata, title: &str) -> FrontmatterMetadata {
    let title = metadata
        .title
        .get_or_insert_with(|| title.to_string())
        .clone();
    metadata
        .description
        .get_or_insert_with(|| format!("Documentation from {}", title));
    metadata
        .created
        .get_or_insert_with(|| Utc::now().to_rfc3339());
    metadata
}

/// Concrete profile name: `auto` becomes the structure's suggestion
pub fn resolve_template(name: &str, structure: &DocumentStructure) -> String {
    match name {
        AUTO_TEMPLATE => structure.suggested_template.clone(),
        name => name.to_string(),
    }
}

/// File stem of a path-like identifier, or the identifier itself
pub fn artifact_stem(id: &str) -> String {
    Path::new(id)
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or(id)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::StructuralConverter;
    use crate::source::ContentDocument;
    use crate::template::TemplateRegistry;
    use crate::types::DocError;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct MemorySource(HashMap<String, SourceDocument>);

    impl MemorySource {
        fn single(id: &str, doc: SourceDocument) -> Arc<Self> {
            Arc::new(Self(HashMap::from([(id.to_string(), doc)])))
        }
    }

    #[async_trait]
    impl SourceFetcher for MemorySource {
        async fn fetch(&self, id: &str) -> Result<SourceDocument> {
            self.0
                .get(id)
                .cloned()
                .ok_or_else(|| DocError::Source(format!("unknown document {}", id)))
        }

        fn name(&self) -> &str {
            "memory"
        }
    }

    #[derive(Default)]
    struct RecordingPublisher(Mutex<Vec<PublishRequest>>);

    #[async_trait]
    impl Publisher for RecordingPublisher {
        async fn publish(&self, request: &PublishRequest) -> Result<String> {
            self.0.lock().unwrap().push(request.clone());
            Ok(format!("mem://{}", request.path))
        }

        fn name(&self) -> &str {
            "recording"
        }
    }

    const HANDBOOK: &str = "# API Reference\nEndpoints\n## Auth\nTokens\n# FAQ\nAsk";

    fn pipeline(source: Arc<MemorySource>, config: Config) -> DocumentPipeline {
        DocumentPipeline::new(
            source,
            Arc::new(StructuralConverter::default()),
            TemplateRegistry::new().into_shared(),
            config,
        )
    }

    #[tokio::test]
    async fn test_process_auto_template_and_artifacts() {
        let publisher = Arc::new(RecordingPublisher::default());
        let source = MemorySource::single("docs/handbook.md", SourceDocument::from_text("Handbook", HANDBOOK));
        let pipeline = pipeline(source, Config::default()).with_publisher(publisher.clone());

        let options = ProcessOptions {
            template: Some(AUTO_TEMPLATE.to_string()),
            ..Default::default()
        };
        let outcome = pipeline.process("docs/handbook.md", options).await.unwrap();

        assert_eq!(outcome.template, "technical_docs");
        assert!(!outcome.used_fallback);
        assert!(outcome.report.is_valid);
        assert_eq!(outcome.structure.sections.len(), 3);
        assert_eq!(
            outcome.published,
            vec![
                "mem://handbook_formatted.md",
                "mem://navigation.yml",
                "mem://handbook_structure.json"
            ]
        );

        let body = outcome.body.unwrap();
        assert!(body.starts_with("---\ntitle: Handbook\ndescription: Documentation from Handbook\ntemplate: Technical Documentation\ncreated: "));
        assert!(body.ends_with("- [FAQ](#faq)"));

        let requests = publisher.0.lock().unwrap();
        assert_eq!(requests[1].content, outcome.navigation);
        let json: serde_json::Value = serde_json::from_str(&requests[2].content).unwrap();
        assert_eq!(json["title"], "Handbook");
        assert_eq!(json["sections"][0]["children_count"], 1);
        assert_eq!(json["sections"][1]["path"], "auth/auth.md");
        assert_eq!(json["metadata"]["total_sections"], 3);
    }

    #[tokio::test]
    async fn test_dry_run_renders_and_publishes_nothing() {
        let publisher = Arc::new(RecordingPublisher::default());
        let source = MemorySource::single("h", SourceDocument::from_text("H", HANDBOOK));
        let pipeline = pipeline(source, Config::default()).with_publisher(publisher.clone());

        let options = ProcessOptions {
            dry_run: true,
            ..Default::default()
        };
        let outcome = pipeline.process("h", options).await.unwrap();

        assert!(outcome.body.is_none());
        assert!(outcome.published.is_empty());
        assert!(publisher.0.lock().unwrap().is_empty());
        assert_eq!(outcome.template, "standard_docs");
        assert!(outcome.navigation.starts_with("nav:\n  - API Reference:"));
    }

    #[tokio::test]
    async fn test_truncated_primary_adopts_fallback() {
        let structured = ContentDocument::from_json(
            r#"{"title": "Handbook", "body": {"content": [{"paragraph": {"elements": [{"textRun": {"content": "Home\n"}}], "paragraphStyle": {"namedStyleType": "HEADING_1"}}}]}}"#,
        )
        .unwrap();
        let doc = SourceDocument {
            title: "Handbook".to_string(),
            structured: Some(structured),
            text: None,
            raw_html: Some("<h1>Home</h1><p>Welcome aboard</p><h1>Operations</h1><p>On-call rota</p>".to_string()),
        };
        let outcome = pipeline(MemorySource::single("d", doc), Config::default())
            .process("d", ProcessOptions::default())
            .await
            .unwrap();

        assert!(outcome.used_fallback);
        let titles: Vec<&str> = outcome
            .structure
            .sections
            .iter()
            .map(|s| s.title.as_str())
            .collect();
        assert_eq!(titles, vec!["Home", "Operations"]);
    }

    #[tokio::test]
    async fn test_fallback_disabled_keeps_primary() {
        let doc = SourceDocument::from_text("H", "# Home")
            .with_raw_html("<h1>Home</h1><p>much longer salvaged body text</p>");
        let mut config = Config::default();
        config.fallback.enabled = false;

        let outcome = pipeline(MemorySource::single("d", doc), config)
            .process("d", ProcessOptions::default())
            .await
            .unwrap();
        assert!(!outcome.used_fallback);
        assert_eq!(outcome.structure.sections[0].content, "");
    }

    #[tokio::test]
    async fn test_html_only_source_always_salvaged() {
        let doc = SourceDocument::default().with_raw_html("<h2>Tools</h2><p>Slack</p>");
        let mut config = Config::default();
        config.fallback.enabled = false;
        config.fallback.top_level_headers = vec!["Tools".to_string()];

        let outcome = pipeline(MemorySource::single("d", doc), config)
            .process("d", ProcessOptions::default())
            .await
            .unwrap();
        assert!(outcome.used_fallback);
        assert_eq!(outcome.structure.sections[0].level, 1);
    }

    #[tokio::test]
    async fn test_explicit_template_and_metadata() {
        let source = MemorySource::single("d", SourceDocument::from_text("H", "# Home\nhi"));
        let options = ProcessOptions {
            template: Some("minimal".to_string()),
            metadata: FrontmatterMetadata::titled("Custom"),
            ..Default::default()
        };
        let outcome = pipeline(source, Config::default())
            .process("d", options)
            .await
            .unwrap();
        assert_eq!(outcome.body.as_deref(), Some("# Home\nhi"));
    }

    #[tokio::test]
    async fn test_fetch_failure_propagates() {
        let source = MemorySource::single("d", SourceDocument::default());
        let err = pipeline(source, Config::default())
            .process("missing", ProcessOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DocError::Source(_)));
    }

    #[test]
    fn test_artifact_stem() {
        assert_eq!(artifact_stem("docs/handbook.json"), "handbook");
        assert_eq!(artifact_stem("1AbCdEf"), "1AbCdEf");
    }

    #[test]
    fn test_complete_metadata_keeps_caller_values() {
        let metadata = complete_metadata(
            FrontmatterMetadata {
                description: Some("Given".to_string()),
                ..Default::default()
            },
            "Handbook",
        );
        assert_eq!(metadata.title.as_deref(), Some("Handbook"));
        assert_eq!(metadata.description.as_deref(), Some("Given"));
        assert!(metadata.created.is_some());
    }
}
