//! Global Constants
//!
//! Centralized constants for the structuring pipeline.
//! All magic numbers and keyword tables are defined here with documentation.

/// Heading extraction constants
pub mod heading {
    /// Maximum stored title length (characters)
    pub const MAX_TITLE_CHARS: usize = 100;

    /// Break points tried, in priority order, when a title is oversized
    pub const TITLE_BREAK_POINTS: [char; 4] = ['.', '!', '?', '\n'];

    /// Deepest ATX heading level
    pub const MAX_LEVEL: u8 = 6;
}

/// Path allocation constants
pub mod paths {
    /// Slug used when a title has no slug-safe characters
    pub const FALLBACK_SLUG: &str = "section";

    /// File extension appended to every allocated path
    pub const EXTENSION: &str = ".md";

    /// Characters of the containing title used for the parent directory slug
    pub const PARENT_PREFIX_CHARS: usize = 30;
}

/// Navigation synthesis constants
pub mod navigation {
    /// Titles at or above this length are never promoted to synthetic pages
    pub const MAX_SYNTHETIC_TITLE_CHARS: usize = 50;

    /// Words marking a heading as narrative/process content rather than a page
    pub const NARRATIVE_WORDS: [&str; 9] = [
        "how",
        "what",
        "when",
        "where",
        "why",
        "guide",
        "flow",
        "tracking",
        "compensation",
    ];

    /// Sections per page used for the page estimate
    pub const SECTIONS_PER_PAGE: usize = 3;
}

/// Template classification constants
pub mod templates {
    /// Profile used when lookup fails
    pub const DEFAULT_PROFILE: &str = "standard_docs";

    pub const TECHNICAL_PROFILE: &str = "technical_docs";

    pub const PROJECT_PROFILE: &str = "project_docs";

    pub const MINIMAL_PROFILE: &str = "minimal";

    /// Title keywords selecting the technical profile (checked first)
    pub const TECHNICAL_KEYWORDS: [&str; 4] = ["api", "reference", "technical", "code"];

    /// Title keywords selecting the project profile
    pub const PROJECT_KEYWORDS: [&str; 4] = ["team", "process", "project", "goals"];

    /// Header line of the generated table of contents
    pub const TOC_HEADER: &str = "## Table of Contents";

    /// Frontmatter title when the caller supplies none
    pub const DEFAULT_DOC_TITLE: &str = "Documentation";
}

/// HTML fallback constants
pub mod fallback {
    /// Salvaged text must exceed the primary text by this factor to be adopted
    pub const DEFAULT_RATIO: f64 = 2.0;

    /// Placeholder emitted for tables when no pipe rendering is requested
    pub const TABLE_PLACEHOLDER: &str = "[Table content here]";
}

/// Publisher constants
pub mod publish {
    /// Maximum attempts for a single file upsert
    pub const MAX_ATTEMPTS: usize = 3;

    /// Base delay for exponential backoff (milliseconds)
    pub const BASE_DELAY_MS: u64 = 500;

    /// Maximum delay between retries (seconds)
    pub const MAX_DELAY_SECS: u64 = 10;
}
