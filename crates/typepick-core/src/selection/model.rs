//! The project type / language selection state machine
//!
//! `SelectionModel` owns the type to language index and the current selection. Every
//! mutation goes through one of its methods, and every method leaves the selection valid
//! against the current index:
//!
//! - at most one type and one language are selected
//! - a language is only kept while it belongs to the selected type
//! - types with zero or one language never expose a language picker
//!
//! The model performs no I/O. Callers fetch templates and inspect project directories,
//! then hand the results to [`SelectionModel::rebuild_index`] and
//! [`SelectionModel::apply_detected_hint`].

use super::index::TypeLanguageIndex;
use super::order::{sort_languages, sort_types, DisplayNameResolver};
use crate::error::SelectionError;
use crate::templates::TemplateRecord;

/// Reserved id returned when no type or language is selected
pub const UNKNOWN: &str = "unknown";

/// Currently selected type and language
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub project_type: Option<String>,
    pub language: Option<String>,
}

impl Selection {
    pub fn is_empty(&self) -> bool {
        self.project_type.is_none() && self.language.is_none()
    }
}

/// Best-effort guess of type and language for an existing project directory
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetectedHint {
    pub project_type: Option<String>,
    pub language: Option<String>,
}

impl DetectedHint {
    pub fn new(project_type: &str, language: Option<&str>) -> Self {
        Self {
            project_type: Some(project_type.to_string()),
            language: language.map(str::to_string),
        }
    }
}

/// State of the catalogue behind the index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogueStatus {
    /// No catalogue has been loaded successfully
    Unavailable,
    /// The catalogue loaded but offers no project types
    Empty,
    Ready,
}

impl CatalogueStatus {
    /// User-facing message for states that need one
    pub fn message(&self) -> Option<&'static str> {
        match self {
            CatalogueStatus::Unavailable => {
                Some("The list of project types could not be retrieved.")
            }
            CatalogueStatus::Empty => Some("There are no project types available."),
            CatalogueStatus::Ready => None,
        }
    }
}

/// What happened to a detection hint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HintOutcome {
    /// The hint seeded the selection
    Applied,
    /// The hinted type is not in the catalogue, selection untouched
    Ignored,
    /// The user already picked explicitly for this path
    Overridden,
    /// No catalogue yet; the hint is applied on the next rebuild
    Deferred,
    /// A newer path was requested before this hint arrived
    Stale,
}

/// Project type / language selection for one wizard session
#[derive(Debug, Clone, Default)]
pub struct SelectionModel {
    index: Option<TypeLanguageIndex>,
    selection: Selection,
    /// Set once the user picks a type or language; cleared when the path changes
    explicit_pick: bool,
    /// Last hint for the current path
    hint: Option<DetectedHint>,
}

/// Language to keep after `project_type` becomes selected.
///
/// Zero languages means none, a single language is chosen automatically, and with several
/// the previous language survives only if the new type offers it.
fn derive_language(
    index: &TypeLanguageIndex,
    project_type: &str,
    previous: Option<String>,
) -> Option<String> {
    let languages = index.languages(project_type)?;
    match languages.len() {
        0 => None,
        1 => languages.iter().next().cloned(),
        _ => previous.filter(|language| languages.contains(language)),
    }
}

impl SelectionModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// The current index, `None` until a catalogue has been loaded
    pub fn index(&self) -> Option<&TypeLanguageIndex> {
        self.index.as_ref()
    }

    pub fn status(&self) -> CatalogueStatus {
        match &self.index {
            None => CatalogueStatus::Unavailable,
            Some(index) if index.is_empty() => CatalogueStatus::Empty,
            Some(_) => CatalogueStatus::Ready,
        }
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn has_explicit_pick(&self) -> bool {
        self.explicit_pick
    }

    /// Replace the index with one built from `templates` and re-validate the selection
    pub fn rebuild_index(&mut self, templates: &[TemplateRecord]) -> CatalogueStatus {
        let index = TypeLanguageIndex::from_templates(templates);
        tracing::debug!(
            templates = templates.len(),
            types = index.len(),
            "rebuilt project type index"
        );
        self.index = Some(index);
        self.revalidate();
        self.status()
    }

    fn revalidate(&mut self) {
        let Some(index) = &self.index else {
            return;
        };

        match self.selection.project_type.take() {
            Some(project_type) if index.contains_type(&project_type) => {
                self.selection.language =
                    derive_language(index, &project_type, self.selection.language.take());
                self.selection.project_type = Some(project_type);
            }
            Some(project_type) => {
                tracing::debug!(%project_type, "selected project type is no longer available");
                self.selection = Selection::default();
                // The vanished pick no longer blocks the hint for this path
                self.explicit_pick = false;
                self.reseed_from_hint();
            }
            None => {
                self.selection.language = None;
                if !self.explicit_pick {
                    self.reseed_from_hint();
                }
            }
        }
    }

    fn reseed_from_hint(&mut self) {
        if let Some(hint) = self.hint.clone() {
            self.seed_from_hint(&hint);
        }
    }

    /// Returns `false` if the hinted type is not in the index
    fn seed_from_hint(&mut self, hint: &DetectedHint) -> bool {
        let Some(index) = &self.index else {
            return false;
        };
        let Some(project_type) = hint
            .project_type
            .as_deref()
            .filter(|t| index.contains_type(t))
        else {
            tracing::warn!(hint = ?hint.project_type, "detected project type not in catalogue");
            return false;
        };

        // Same derivation as a user pick, so a later identical rebuild leaves it unchanged
        self.selection.language = derive_language(index, project_type, hint.language.clone());
        self.selection.project_type = Some(project_type.to_string());
        true
    }

    /// Forget explicit picks and hints from the previous project path
    pub fn begin_path(&mut self) {
        self.explicit_pick = false;
        self.hint = None;
    }

    /// Seed the selection from a detection hint unless the user already picked for this path
    pub fn apply_detected_hint(&mut self, hint: DetectedHint) -> HintOutcome {
        self.hint = Some(hint.clone());

        if self.explicit_pick {
            return HintOutcome::Overridden;
        }
        if self.index.is_none() {
            return HintOutcome::Deferred;
        }
        if self.seed_from_hint(&hint) {
            HintOutcome::Applied
        } else {
            HintOutcome::Ignored
        }
    }

    /// Select a type, or clear the selection with `None`
    pub fn select_type(&mut self, project_type: Option<&str>) -> Result<(), SelectionError> {
        let Some(project_type) = project_type else {
            self.selection = Selection::default();
            self.explicit_pick = true;
            return Ok(());
        };

        let index = self
            .index
            .as_ref()
            .filter(|index| index.contains_type(project_type))
            .ok_or_else(|| SelectionError::UnknownType(project_type.to_string()))?;

        self.selection.language =
            derive_language(index, project_type, self.selection.language.take());
        self.selection.project_type = Some(project_type.to_string());
        self.explicit_pick = true;
        Ok(())
    }

    /// Select a language for the current type, or clear it with `None`
    pub fn select_language(&mut self, language: Option<&str>) -> Result<(), SelectionError> {
        let project_type = self
            .selection
            .project_type
            .as_deref()
            .ok_or(SelectionError::NoTypeSelected)?;

        if let Some(language) = language {
            let available = self
                .index
                .as_ref()
                .is_some_and(|index| index.has_language(project_type, language));
            if !available {
                return Err(SelectionError::UnknownLanguage {
                    project_type: project_type.to_string(),
                    language: language.to_string(),
                });
            }
        }

        self.selection.language = language.map(str::to_string);
        self.explicit_pick = true;
        Ok(())
    }

    /// Whether the user has to choose among several languages for the selected type
    pub fn language_picker_active(&self) -> bool {
        match (&self.index, &self.selection.project_type) {
            (Some(index), Some(project_type)) => index
                .languages(project_type)
                .is_some_and(|languages| languages.len() > 1),
            _ => false,
        }
    }

    /// A type is required to finish; the language is optional
    pub fn can_finish(&self) -> bool {
        self.selection.project_type.is_some()
    }

    /// The selected type, or [`UNKNOWN`] if none is selected
    pub fn project_type(&self) -> &str {
        match &self.selection.project_type {
            Some(project_type) => project_type.as_str(),
            None => {
                // Callers check can_finish() first
                tracing::error!("project type requested with no type selected");
                UNKNOWN
            }
        }
    }

    /// The selected language, or [`UNKNOWN`] if none is selected
    pub fn language(&self) -> &str {
        self.selection.language.as_deref().unwrap_or(UNKNOWN)
    }

    /// Types in display order
    pub fn type_choices<R: DisplayNameResolver + ?Sized>(&self, resolver: &R) -> Vec<String> {
        match &self.index {
            Some(index) => sort_types(resolver, index.type_ids()),
            None => Vec::new(),
        }
    }

    /// Languages of the selected type in display order
    pub fn language_choices<R: DisplayNameResolver + ?Sized>(&self, resolver: &R) -> Vec<String> {
        match (&self.index, &self.selection.project_type) {
            (Some(index), Some(project_type)) => {
                sort_languages(resolver, index.language_ids(project_type))
            }
            _ => Vec::new(),
        }
    }
}
