//! Rendering profiles, the profile registry, and the template merger.

pub mod merger;
pub mod profile;
pub mod registry;

pub use merger::{FrontmatterMetadata, TemplateMerger, anchor_for};
pub use profile::{
    FormattingFlags, HeadingStyle, ProfileSection, StructureFlags, TemplateProfile,
    builtin_profiles,
};
pub use registry::{SharedRegistry, TemplateKind, TemplateRegistry, TemplateSummary};
