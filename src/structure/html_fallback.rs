//! HTML Fallback Extractor
//!
//! Salvages heading/paragraph structure from an HTML export when the
//! structured source looks truncated. The output is heading-marked text ready
//! for [`HeadingParser`](super::HeadingParser).
//!
//! Stages run strictly in order over the whole document:
//!
//! 1. strip style/script blocks, list-style selector rules and comments
//! 2. `h1`..`h6` → `#`..`######` surrounded by blank lines
//! 3. paragraphs, breaks, lists and bold/italic → plain-text markers
//! 4. strip remaining tags
//! 5. decode a fixed entity table
//! 6. normalize whitespace
//! 7. drop CSS-rule residue (`selector { ... }`)
//! 8. force configured top-level titles to level 1
//!
//! A failing stage ends the run; the output of the last successful stage is
//! returned.

use regex::{Captures, Regex};
use std::sync::LazyLock;
use tracing::{debug, info, warn};

use crate::types::Result;

static STYLE_BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<(style|script)\b[^>]*>.*?</(?:style|script)>")
        .expect("STYLE_BLOCK_RE: hardcoded regex is valid")
});

static LIST_STYLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\.lst-[\w-]+[^{}]*\{[^{}]*\}").expect("LIST_STYLE_RE: hardcoded regex is valid")
});

static COMMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<!--.*?-->").expect("COMMENT_RE: hardcoded regex is valid")
});

static HEADING_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<h([1-6])\b[^>]*>(.*?)</h[1-6]\s*>")
        .expect("HEADING_TAG_RE: hardcoded regex is valid")
});

static BREAK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>").expect("BREAK_RE: hardcoded regex is valid"));

static PARA_OPEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<p\b[^>]*>").expect("PARA_OPEN_RE: hardcoded regex is valid"));

static BLOCK_CLOSE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)</(?:p|div)\s*>").expect("BLOCK_CLOSE_RE: hardcoded regex is valid")
});

static LIST_WRAPPER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)</?(?:ul|ol)\b[^>]*>").expect("LIST_WRAPPER_RE: hardcoded regex is valid")
});

static LIST_ITEM_OPEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<li\b[^>]*>").expect("LIST_ITEM_OPEN_RE: hardcoded regex is valid")
});

static LIST_ITEM_CLOSE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)</li\s*>").expect("LIST_ITEM_CLOSE_RE: hardcoded regex is valid")
});

static BOLD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<(?:b|strong)\b[^>]*>(.*?)</(?:b|strong)\s*>")
        .expect("BOLD_RE: hardcoded regex is valid")
});

static ITALIC_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<(?:i|em)\b[^>]*>(.*?)</(?:i|em)\s*>")
        .expect("ITALIC_RE: hardcoded regex is valid")
});

static ANY_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("ANY_TAG_RE: hardcoded regex is valid"));

static INLINE_SPACE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[ \t\u{a0}]+").expect("INLINE_SPACE_RE: hardcoded regex is valid")
});

static EDGE_SPACE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^ +| +$").expect("EDGE_SPACE_RE: hardcoded regex is valid")
});

static BLANK_RUN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("BLANK_RUN_RE: hardcoded regex is valid"));

/// A selector token (with optional combinators) directly before a block of
/// `property: value` declarations, or an emptied at-rule block
static CSS_RULE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"[.#]?[A-Za-z_][\w-]*(?:[ \t]*[,>:.#][ \t]*[.#]?[\w-]+)*[ \t]*\{\s*(?:[\w-]+\s*:[^{}]*)?\}|@[\w-]+[^{}\n]*\{\s*\}",
    )
    .expect("CSS_RULE_RE: hardcoded regex is valid")
});

/// Upper bound on residue-stripping passes
const MAX_CSS_PASSES: usize = 64;

/// Entities decoded in stage 5. `&amp;` forms come last so that an escaped
/// entity such as `&amp;lt;` decodes only once.
const ENTITY_TABLE: [(&str, &str); 30] = [
    ("&nbsp;", " "),
    ("&#160;", " "),
    ("&lt;", "<"),
    ("&#60;", "<"),
    ("&gt;", ">"),
    ("&#62;", ">"),
    ("&quot;", "\""),
    ("&#34;", "\""),
    ("&apos;", "'"),
    ("&#39;", "'"),
    ("&lsquo;", "\u{2018}"),
    ("&#8216;", "\u{2018}"),
    ("&rsquo;", "\u{2019}"),
    ("&#8217;", "\u{2019}"),
    ("&ldquo;", "\u{201c}"),
    ("&#8220;", "\u{201c}"),
    ("&rdquo;", "\u{201d}"),
    ("&#8221;", "\u{201d}"),
    ("&ndash;", "\u{2013}"),
    ("&#8211;", "\u{2013}"),
    ("&mdash;", "\u{2014}"),
    ("&#8212;", "\u{2014}"),
    ("&hellip;", "\u{2026}"),
    ("&#8230;", "\u{2026}"),
    ("&bull;", "\u{2022}"),
    ("&#8226;", "\u{2022}"),
    ("&copy;", "\u{a9}"),
    ("&#169;", "\u{a9}"),
    ("&amp;", "&"),
    ("&#38;", "&"),
];

/// One whole-document transformation step
pub trait ExtractionStage: Send + Sync {
    fn name(&self) -> &'static str;

    fn apply(&self, input: &str) -> Result<String>;
}

/// Result of a fallback run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub text: String,
    pub completed_stages: Vec<&'static str>,
    /// Name of the stage that failed, if any
    pub failed_stage: Option<&'static str>,
}

impl Extraction {
    pub fn is_complete(&self) -> bool {
        self.failed_stage.is_none()
    }
}

pub struct HtmlFallbackExtractor {
    stages: Vec<Box<dyn ExtractionStage>>,
}

impl std::fmt::Debug for HtmlFallbackExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.stages.iter().map(|s| s.name()).collect();
        f.debug_struct("HtmlFallbackExtractor")
            .field("stages", &names)
            .finish()
    }
}

impl Default for HtmlFallbackExtractor {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl HtmlFallbackExtractor {
    /// Build the standard eight-stage pipeline. `top_level_headers` lists
    /// titles that must come out as level-1 headings wherever they appear.
    pub fn new(top_level_headers: Vec<String>) -> Self {
        Self {
            stages: vec![
                Box::new(StripNoise),
                Box::new(ConvertHeadings),
                Box::new(ConvertBlocks),
                Box::new(StripTags),
                Box::new(DecodeEntities),
                Box::new(NormalizeWhitespace),
                Box::new(DropCssResidue),
                Box::new(PromoteTopLevel::new(top_level_headers)),
            ],
        }
    }

    /// Append a custom stage after the standard ones
    pub fn with_stage(mut self, stage: impl ExtractionStage + 'static) -> Self {
        self.stages.push(Box::new(stage));
        self
    }

    /// Run all stages and return the best text produced
    pub fn extract(&self, html: &str) -> String {
        self.run(html).text
    }

    /// Run all stages, reporting how far the pipeline got
    pub fn run(&self, html: &str) -> Extraction {
        let mut text = html.to_string();
        let mut completed = Vec::with_capacity(self.stages.len());

        for stage in &self.stages {
            match stage.apply(&text) {
                Ok(next) => {
                    text = next;
                    completed.push(stage.name());
                }
                Err(e) => {
                    warn!(
                        "Fallback extraction stopped at stage '{}': {}",
                        stage.name(),
                        e
                    );
                    return Extraction {
                        text,
                        completed_stages: completed,
                        failed_stage: Some(stage.name()),
                    };
                }
            }
        }

        debug!("Fallback extraction produced {} chars", text.len());
        Extraction {
            text,
            completed_stages: completed,
            failed_stage: None,
        }
    }
}

/// Whether salvaged text should replace the primary text
pub fn should_adopt(primary_len: usize, salvaged_len: usize, ratio: f64) -> bool {
    let adopt = salvaged_len as f64 > primary_len as f64 * ratio;
    if adopt {
        info!(
            "Primary content looks truncated ({} chars vs {} salvaged), using HTML fallback",
            primary_len, salvaged_len
        );
    }
    adopt
}

// =============================================================================
// Stages
// =============================================================================

struct StripNoise;

impl ExtractionStage for StripNoise {
    fn name(&self) -> &'static str {
        "strip-noise"
    }

    fn apply(&self, input: &str) -> Result<String> {
        let text = STYLE_BLOCK_RE.replace_all(input, "");
        let text = LIST_STYLE_RE.replace_all(&text, "");
        Ok(COMMENT_RE.replace_all(&text, "").into_owned())
    }
}

struct ConvertHeadings;

impl ExtractionStage for ConvertHeadings {
    fn name(&self) -> &'static str {
        "headings"
    }

    fn apply(&self, input: &str) -> Result<String> {
        let text = HEADING_TAG_RE.replace_all(input, |caps: &Captures| {
            let level = caps[1].parse::<usize>().unwrap_or(1);
            let inner = caps[2].split_whitespace().collect::<Vec<_>>().join(" ");
            format!("\n\n{} {}\n\n", "#".repeat(level), inner)
        });
        Ok(text.into_owned())
    }
}

struct ConvertBlocks;

impl ExtractionStage for ConvertBlocks {
    fn name(&self) -> &'static str {
        "blocks"
    }

    fn apply(&self, input: &str) -> Result<String> {
        let text = BREAK_RE.replace_all(input, "\n");
        let text = PARA_OPEN_RE.replace_all(&text, "");
        let text = BLOCK_CLOSE_RE.replace_all(&text, "\n\n");
        let text = LIST_WRAPPER_RE.replace_all(&text, "\n");
        let text = LIST_ITEM_OPEN_RE.replace_all(&text, "* ");
        let text = LIST_ITEM_CLOSE_RE.replace_all(&text, "\n");
        let text = BOLD_RE.replace_all(&text, |caps: &Captures| wrap_marker(&caps[1], "**"));
        let text = ITALIC_RE.replace_all(&text, |caps: &Captures| wrap_marker(&caps[1], "*"));
        Ok(text.into_owned())
    }
}

fn wrap_marker(inner: &str, marker: &str) -> String {
    if inner.trim().is_empty() {
        inner.to_string()
    } else {
        format!("{}{}{}", marker, inner, marker)
    }
}

struct StripTags;

impl ExtractionStage for StripTags {
    fn name(&self) -> &'static str {
        "strip-tags"
    }

    fn apply(&self, input: &str) -> Result<String> {
        Ok(ANY_TAG_RE.replace_all(input, "").into_owned())
    }
}

struct DecodeEntities;

impl ExtractionStage for DecodeEntities {
    fn name(&self) -> &'static str {
        "entities"
    }

    fn apply(&self, input: &str) -> Result<String> {
        let mut text = input.to_string();
        for (entity, replacement) in ENTITY_TABLE {
            if text.contains(entity) {
                text = text.replace(entity, replacement);
            }
        }
        Ok(text)
    }
}

struct NormalizeWhitespace;

impl ExtractionStage for NormalizeWhitespace {
    fn name(&self) -> &'static str {
        "whitespace"
    }

    fn apply(&self, input: &str) -> Result<String> {
        Ok(normalize_whitespace(input))
    }
}

fn normalize_whitespace(input: &str) -> String {
    let text = input.replace("\r\n", "\n");
    let text = INLINE_SPACE_RE.replace_all(&text, " ");
    let text = EDGE_SPACE_RE.replace_all(&text, "");
    let text = BLANK_RUN_RE.replace_all(&text, "\n\n");
    text.trim().to_string()
}

struct DropCssResidue;

impl ExtractionStage for DropCssResidue {
    fn name(&self) -> &'static str {
        "css-residue"
    }

    fn apply(&self, input: &str) -> Result<String> {
        let mut text = input.to_string();
        // Rules packed on one line are peeled off one per pass
        for _ in 0..MAX_CSS_PASSES {
            if !text.contains('{') {
                break;
            }
            let next = CSS_RULE_RE.replace_all(&text, "").into_owned();
            if next == text {
                break;
            }
            text = next;
        }
        Ok(normalize_whitespace(&text))
    }
}

struct PromoteTopLevel {
    titles: Vec<String>,
}

impl PromoteTopLevel {
    fn new(titles: Vec<String>) -> Self {
        Self {
            titles: titles
                .into_iter()
                .map(|t| t.trim().to_lowercase())
                .filter(|t| !t.is_empty())
                .collect(),
        }
    }
}

impl ExtractionStage for PromoteTopLevel {
    fn name(&self) -> &'static str {
        "promote-top-level"
    }

    fn apply(&self, input: &str) -> Result<String> {
        if self.titles.is_empty() {
            return Ok(input.to_string());
        }

        let lines: Vec<String> = input
            .lines()
            .map(|line| {
                let bare = line.trim_start_matches('#').trim();
                if self.titles.contains(&bare.to_lowercase()) {
                    format!("# {}", bare)
                } else {
                    line.to_string()
                }
            })
            .collect();
        Ok(lines.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structure::HeadingParser;
    use crate::types::DocError;

    const EXPORT: &str = r#"<html><head><style>.c1{color:red} .lst-kix_abc-0 > li:before{content:"-"}</style></head>
<body><!-- exported --><h1 class="t"><span>Team   Handbook</span></h1>
<p>Welcome&nbsp;to the <b>team</b> &amp; <i>friends</i>.</p>
<h2>Onboarding</h2><ul><li>Laptop</li><li>Accounts</li></ul>
<p>Line one<br/>Line two</p><p>Tom&rsquo;s notes &hellip;</p></body></html>"#;

    #[test]
    fn test_extract_full_export() {
        let text = HtmlFallbackExtractor::default().extract(EXPORT);

        assert!(text.starts_with("# Team Handbook"));
        assert!(text.contains("Welcome to the **team** & *friends*."));
        assert!(text.contains("## Onboarding"));
        assert!(text.contains("* Laptop\n"));
        assert!(text.contains("* Accounts"));
        assert!(text.contains("Line one\nLine two"));
        assert!(text.contains("Tom\u{2019}s notes \u{2026}"));
        assert!(!text.contains('<'));
        assert!(!text.contains("color:red"));
        assert!(!text.contains("\n\n\n"));
    }

    #[test]
    fn test_extracted_text_parses_into_sections() {
        let text = HtmlFallbackExtractor::default().extract(EXPORT);
        let sections = HeadingParser::new().parse(&text);

        let titles: Vec<&str> = sections.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["Team Handbook", "Onboarding"]);
        assert_eq!(sections[1].level, 2);
    }

    #[test]
    fn test_amp_decoded_once() {
        let text = HtmlFallbackExtractor::default().extract("<p>a &amp;lt; b</p>");
        assert_eq!(text, "a &lt; b");
    }

    #[test]
    fn test_css_residue_removed() {
        let text = HtmlFallbackExtractor::default().extract("<p>Intro</p>\n.title { font-size: 26pt }\n<p>Body</p>");
        assert_eq!(text, "Intro\n\nBody");
    }

    #[test]
    fn test_prose_with_braces_survives() {
        let extractor = HtmlFallbackExtractor::default();
        assert_eq!(
            extractor.extract("<p>Set the greeting to {name} before sending</p>"),
            "Set the greeting to {name} before sending"
        );

        let text = extractor.extract("<p>Use {placeholder} here</p>\n.c2 > li:before { content: none }.c3{color:red}");
        assert_eq!(text, "Use {placeholder} here");
    }

    #[test]
    fn test_configured_titles_promoted() {
        let extractor = HtmlFallbackExtractor::new(vec!["Operations".to_string()]);
        let text = extractor.extract("<h3>Operations</h3><p>x</p><p>operations</p>");

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "# Operations");
        assert!(lines.contains(&"# operations"));
    }

    struct Exploding;

    impl ExtractionStage for Exploding {
        fn name(&self) -> &'static str {
            "exploding"
        }

        fn apply(&self, _input: &str) -> Result<String> {
            Err(DocError::extraction("exploding", "boom"))
        }
    }

    #[test]
    fn test_failing_stage_returns_partial() {
        let extraction = HtmlFallbackExtractor::default()
            .with_stage(Exploding)
            .run("<h1>Title</h1><p>Body</p>");

        assert_eq!(extraction.failed_stage, Some("exploding"));
        assert_eq!(extraction.completed_stages.len(), 8);
        assert_eq!(extraction.text, "# Title\n\nBody");
        assert!(!extraction.is_complete());
    }

    #[test]
    fn test_should_adopt_ratio() {
        assert!(should_adopt(100, 201, 2.0));
        assert!(!should_adopt(100, 200, 2.0));
        assert!(should_adopt(0, 1, 2.0));
    }
}
