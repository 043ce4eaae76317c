pub mod error;
pub mod navigation;
pub mod report;
pub mod section;

pub use error::{DocError, Result, ResultExt};
pub use navigation::{NAV_HEADER, NavigationNode, render_manifest};
pub use report::ValidationReport;
pub use section::{Section, SectionDescriptor};
