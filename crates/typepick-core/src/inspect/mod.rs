//! Project inspection: guess the type and language of an existing directory

pub mod markers;

use crate::error::InspectError;
use crate::selection::DetectedHint;
use std::path::Path;

pub use markers::MarkerInspector;

/// Produces a best-effort type/language guess for a project directory
pub trait ProjectInspector: Send + Sync + 'static {
    /// `Ok(None)` when the directory is not recognised
    fn detect(&self, path: &Path) -> Result<Option<DetectedHint>, InspectError>;
}
