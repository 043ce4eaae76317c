//! Template profiles: named bundles of structure and formatting flags.

use serde::{Deserialize, Serialize};

use crate::constants::templates::{
    DEFAULT_PROFILE, MINIMAL_PROFILE, PROJECT_PROFILE, TECHNICAL_PROFILE,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum HeadingStyle {
    /// `# Title`
    #[default]
    Atx,
    /// `Title` underlined with `=` or `-`
    Setext,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructureFlags {
    pub frontmatter: bool,
    pub toc: bool,
    pub breadcrumbs: bool,
    pub edit_uri: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub search: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormattingFlags {
    pub heading_style: HeadingStyle,
    pub code_blocks: bool,
    pub admonitions: bool,
    pub tables: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub syntax_highlighting: bool,
}

/// Expected section outline entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileSection {
    pub level: u8,
    pub title: String,
    #[serde(default)]
    pub required: bool,
}

impl ProfileSection {
    fn top(title: &str, required: bool) -> Self {
        Self {
            level: 1,
            title: title.to_string(),
            required,
        }
    }
}

/// A rendering profile. `name` is the human-readable display name; the
/// registry key lives outside the profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateProfile {
    pub name: String,
    pub description: String,
    pub structure: StructureFlags,
    pub sections: Vec<ProfileSection>,
    pub formatting: FormattingFlags,
}

impl TemplateProfile {
    pub fn required_sections(&self) -> impl Iterator<Item = &ProfileSection> {
        self.sections.iter().filter(|s| s.required)
    }
}

fn outline(entries: &[(&str, bool)]) -> Vec<ProfileSection> {
    entries
        .iter()
        .map(|(title, required)| ProfileSection::top(title, *required))
        .collect()
}

/// Built-in profiles in registration order
pub fn builtin_profiles() -> Vec<(&'static str, TemplateProfile)> {
    vec![
        (
            DEFAULT_PROFILE,
            TemplateProfile {
                name: "Standard Documentation".to_string(),
                description: "General purpose documentation template".to_string(),
                structure: StructureFlags {
                    frontmatter: true,
                    toc: true,
                    breadcrumbs: true,
                    edit_uri: true,
                    search: false,
                },
                sections: outline(&[
                    ("Home", true),
                    ("About", false),
                    ("Team", false),
                    ("Operations", false),
                    ("Tools", false),
                    ("FAQ", false),
                ]),
                formatting: FormattingFlags {
                    heading_style: HeadingStyle::Atx,
                    code_blocks: true,
                    admonitions: true,
                    tables: true,
                    syntax_highlighting: false,
                },
            },
        ),
        (
            TECHNICAL_PROFILE,
            TemplateProfile {
                name: "Technical Documentation".to_string(),
                description: "API and technical reference documentation".to_string(),
                structure: StructureFlags {
                    frontmatter: true,
                    toc: true,
                    breadcrumbs: true,
                    edit_uri: true,
                    search: true,
                },
                sections: outline(&[
                    ("Overview", true),
                    ("Getting Started", true),
                    ("API Reference", false),
                    ("Examples", false),
                    ("Configuration", false),
                    ("Troubleshooting", false),
                ]),
                formatting: FormattingFlags {
                    heading_style: HeadingStyle::Atx,
                    code_blocks: true,
                    admonitions: true,
                    tables: true,
                    syntax_highlighting: true,
                },
            },
        ),
        (
            PROJECT_PROFILE,
            TemplateProfile {
                name: "Project Documentation".to_string(),
                description: "Project management and process documentation".to_string(),
                structure: StructureFlags {
                    frontmatter: true,
                    toc: true,
                    breadcrumbs: true,
                    edit_uri: false,
                    search: false,
                },
                sections: outline(&[
                    ("Home", true),
                    ("About", false),
                    ("Goals", false),
                    ("Processes", false),
                    ("Team", false),
                    ("Progress", false),
                ]),
                formatting: FormattingFlags {
                    heading_style: HeadingStyle::Atx,
                    code_blocks: false,
                    admonitions: true,
                    tables: true,
                    syntax_highlighting: false,
                },
            },
        ),
        (
            MINIMAL_PROFILE,
            TemplateProfile {
                name: "Minimal Documentation".to_string(),
                description: "Simple, minimal documentation template".to_string(),
                structure: StructureFlags {
                    frontmatter: false,
                    toc: false,
                    breadcrumbs: false,
                    edit_uri: false,
                    search: false,
                },
                sections: outline(&[("Home", true)]),
                formatting: FormattingFlags {
                    heading_style: HeadingStyle::Atx,
                    code_blocks: true,
                    admonitions: false,
                    tables: true,
                    syntax_highlighting: false,
                },
            },
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_order_and_flags() {
        let profiles = builtin_profiles();
        let keys: Vec<&str> = profiles.iter().map(|(k, _)| *k).collect();
        assert_eq!(
            keys,
            vec!["standard_docs", "technical_docs", "project_docs", "minimal"]
        );

        let technical = &profiles[1].1;
        assert!(technical.formatting.syntax_highlighting);
        assert!(technical.structure.search);
        assert_eq!(technical.required_sections().count(), 2);

        let minimal = &profiles[3].1;
        assert!(!minimal.structure.frontmatter);
        assert!(!minimal.structure.toc);
    }

    #[test]
    fn test_optional_flags_default_off() {
        let yaml = "name: Custom\ndescription: d\nstructure:\n  frontmatter: true\n  toc: false\n  breadcrumbs: false\n  edit_uri: false\nsections: []\nformatting:\n  heading_style: setext\n  code_blocks: true\n  admonitions: false\n  tables: true\n";
        let profile: TemplateProfile = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(profile.formatting.heading_style, HeadingStyle::Setext);
        assert!(!profile.formatting.syntax_highlighting);
        assert!(!profile.structure.search);
    }
}
