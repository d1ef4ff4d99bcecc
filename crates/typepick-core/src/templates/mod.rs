//! Template catalogues and fetching
//!
//! This module provides:
//! - Template records and the `template.yaml` catalogue format
//! - The `TemplateSource` trait consumed by the selection session
//! - A fetcher merging catalogues from remote URLs and local directories

pub mod fetcher;
pub mod manifest;

pub use fetcher::{SourceLocation, TemplateFetcher, TemplateSource, CATALOGUE_FILE};
pub use manifest::{Catalogue, TemplateRecord};
