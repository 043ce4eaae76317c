//! Document structuring: heading extraction, nesting, paths, navigation
//! synthesis, manifest validation, and the HTML salvage path.

pub mod classifier;
pub mod heading_parser;
pub mod html_fallback;
pub mod path_allocator;
pub mod synthesizer;
pub mod tree;
pub mod validator;

pub use classifier::{HeuristicClassifier, SectionClassifier};
pub use heading_parser::{HeadingParser, HeadingStats, sanitize_title};
pub use html_fallback::{Extraction, ExtractionStage, HtmlFallbackExtractor, should_adopt};
pub use path_allocator::{CollisionPolicy, Disambiguator, PathAllocator, PathLayout, slugify};
pub use synthesizer::{
    CrossReference, DocumentStructure, FileOrganization, NavigationSynthesizer, Relationships,
    StructureMetadata, suggest_template,
};
pub use tree::SectionTree;
pub use validator::NavigationValidator;
