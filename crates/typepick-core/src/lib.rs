//! Typepick Core - project type and language selection over template catalogues
//!
//! This library derives the selectable project types, and the languages offered for each,
//! from the templates advertised by one or more template repositories. It keeps a single
//! consistent type/language selection while the catalogue is refreshed and while detection
//! hints arrive from inspecting an existing project directory.
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! - **Layer 1: Selection** - `SelectionModel`, a pure state machine with no I/O
//! - **Layer 2: Collaborators** - template fetching, repository configuration, project inspection
//! - **Layer 3: Session** - `WizardSession` wiring collaborators to the model
//! - **Layer 4: CLI/TUI Interface** - Optional cliclack-based prompts (feature-gated)
//!
//! # Feature Flags
//!
//! - `tui` (default): Enables the cliclack-based TUI prompts module
//!
//! # Example Usage (without TUI)
//!
//! ```ignore
//! use typepick_core::{MarkerInspector, TemplateFetcher, WizardSession};
//!
//! let fetcher = TemplateFetcher::from_local("templates/codewind".into(), "typepick");
//! let mut session = WizardSession::new(fetcher, MarkerInspector::new());
//! session.refresh(false).await?;
//! session.set_project_path(Some("my-app".into())).await;
//! session.model_mut().select_type(Some("nodejs"))?;
//! ```

pub mod config;
pub mod error;
pub mod inspect;
pub mod product;
pub mod selection;
pub mod session;
pub mod templates;

#[cfg(feature = "tui")]
pub mod tui;

// Re-export main types for convenience
pub use config::{RepoChange, RepositoryInfo, RepositoryManager};
pub use error::{CatalogueError, InspectError, RepositoryError, SelectionError, SourceError};
pub use inspect::{MarkerInspector, ProjectInspector};
pub use product::ProductConfig;
pub use selection::{
    BuiltinNames, CatalogueStatus, DetectedHint, DisplayNameResolver, HintOutcome, Selection,
    SelectionModel, TypeLanguageIndex, UNKNOWN,
};
pub use session::{DetectionRequest, WizardSession};
pub use templates::{Catalogue, SourceLocation, TemplateFetcher, TemplateRecord, TemplateSource};

#[cfg(feature = "tui")]
pub use tui::run;
