//! docweave - Heading-Driven Documentation Structuring
//!
//! Turns a flat, heading-annotated document into a documentation site layout:
//! sections with output paths, a nested `nav:` manifest, and pages rendered
//! through template profiles.
//!
//! ## Core Features
//!
//! - **Heading Extraction**: Markdown-style headings into document-ordered sections
//! - **Path Allocation**: Stable, slug-based output paths with collision policies
//! - **Navigation Synthesis**: Nested `nav:` manifests, validated line by line
//! - **HTML Salvage**: Multi-stage recovery when the primary extraction loses content
//! - **Template Profiles**: Frontmatter, heading style, and table of contents rendering
//!
//! ## Quick Start
//!
//! ```ignore
//! use docweave::{NavigationSynthesizer, TemplateMerger, TemplateRegistry};
//! use docweave::template::FrontmatterMetadata;
//!
//! let structure = NavigationSynthesizer::default().analyze(text);
//! println!("{}", structure.manifest());
//!
//! let registry = TemplateRegistry::new();
//! let page = TemplateMerger::new(&registry)
//!     .apply(text, "standard_docs", &FrontmatterMetadata::titled("Handbook"));
//! ```
//!
//! ## Modules
//!
//! - [`structure`]: heading parsing, path allocation, navigation, HTML salvage
//! - [`template`]: template profiles, registry, and rendering
//! - [`source`]: source documents and the structured content model
//! - [`convert`]: text converters (structural and LLM-backed)
//! - [`publish`]: artefact publishers (directory and GitHub)
//! - [`pipeline`]: end-to-end document processing

pub mod cli;
pub mod config;
pub mod constants;
pub mod convert;
pub mod pipeline;
pub mod publish;
pub mod source;
pub mod structure;
pub mod template;
pub mod types;

// =============================================================================
// Core Re-exports
// =============================================================================

// Configuration
pub use config::{Config, ConfigLoader};

// Error Types
pub use types::error::{DocError, Result, ResultExt};

// Domain Types
pub use types::{NavigationNode, Section, SectionDescriptor, ValidationReport};

// =============================================================================
// Structuring Re-exports
// =============================================================================

pub use structure::{
    CollisionPolicy, DocumentStructure, HeadingParser, HtmlFallbackExtractor,
    NavigationSynthesizer, NavigationValidator, PathAllocator, PathLayout, SectionClassifier,
};

pub use template::{SharedRegistry, TemplateMerger, TemplateProfile, TemplateRegistry};

// =============================================================================
// Pipeline Re-exports
// =============================================================================

pub use pipeline::{DocumentPipeline, ProcessOptions, ProcessOutcome};

pub use convert::TextConverter;
pub use publish::Publisher;
pub use source::SourceFetcher;
