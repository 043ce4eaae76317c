pub mod analyze;
pub mod apply;
pub mod config;
pub mod process;
pub mod templates;
pub mod validate;
