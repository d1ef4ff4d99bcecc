//! Project type and language selection
//!
//! This module provides:
//! - The type to language index built from a template catalogue
//! - The selection state machine driven by user picks and detection hints
//! - Display names and display ordering for ids

pub mod index;
pub mod model;
pub mod order;

pub use index::TypeLanguageIndex;
pub use model::{CatalogueStatus, DetectedHint, HintOutcome, Selection, SelectionModel, UNKNOWN};
pub use order::{sort_languages, sort_types, BuiltinNames, DisplayNameResolver};
