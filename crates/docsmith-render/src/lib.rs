//! Markdown documentation pages for dbt projects
//!
//! This crate handles:
//! - Normalizing record values for display (placeholders, markers, id paths)
//! - Rendering model, seed, source, test and macro pages with minijinja
//! - Assembling the whole site in memory and writing it out

pub mod normalize;
pub mod context;
pub mod templates;
pub mod renderer;
pub mod site;
pub mod writer;

pub use renderer::{DocumentRenderer, RenderError};
pub use site::{package_path, test_path, Document, Site, SiteBuilder};
pub use writer::DocumentWriter;
