//! Wizard session: connects the template source and project inspector to the selection model
//!
//! The session is the only place that performs I/O on behalf of the model. Fetches are
//! awaited in place; inspection runs on the blocking pool. Each project path change bumps a
//! generation counter, and detection results from older generations are dropped.

use crate::config::RepositoryManager;
use crate::error::{CatalogueError, RepositoryUpdateError};
use crate::inspect::ProjectInspector;
use crate::selection::{CatalogueStatus, DetectedHint, HintOutcome, SelectionModel};
use crate::templates::{TemplateFetcher, TemplateSource};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A pending inspection of one project path
#[derive(Debug)]
pub struct DetectionRequest<I> {
    generation: u64,
    path: PathBuf,
    inspector: Arc<I>,
}

impl<I: ProjectInspector> DetectionRequest<I> {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run the inspector on the blocking pool. Failures are logged and become "no hint"
    pub async fn run(self) -> (u64, Option<DetectedHint>) {
        let DetectionRequest {
            generation,
            path,
            inspector,
        } = self;
        let shown = path.display().to_string();

        let result = tokio::task::spawn_blocking(move || inspector.detect(&path)).await;
        let hint = match result {
            Ok(Ok(hint)) => hint,
            Ok(Err(e)) => {
                tracing::error!(path = %shown, error = %e, "failed to detect project type");
                None
            }
            Err(e) => {
                tracing::error!(path = %shown, error = %e, "project detection task failed");
                None
            }
        };
        (generation, hint)
    }
}

/// Selection state plus the collaborators that feed it
pub struct WizardSession<S, I> {
    source: S,
    inspector: Arc<I>,
    model: SelectionModel,
    project_path: Option<PathBuf>,
    generation: u64,
}

impl<S, I> WizardSession<S, I>
where
    S: TemplateSource,
    I: ProjectInspector,
{
    pub fn new(source: S, inspector: I) -> Self {
        Self {
            source,
            inspector: Arc::new(inspector),
            model: SelectionModel::new(),
            project_path: None,
            generation: 0,
        }
    }

    pub fn model(&self) -> &SelectionModel {
        &self.model
    }

    /// Direct access for user picks
    pub fn model_mut(&mut self) -> &mut SelectionModel {
        &mut self.model
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn project_path(&self) -> Option<&Path> {
        self.project_path.as_deref()
    }

    /// Fetch templates and rebuild the index.
    ///
    /// On failure the model is left as it was: never loaded stays `Unavailable`, and a
    /// previously loaded index keeps its selection.
    pub async fn refresh(
        &mut self,
        force_refresh: bool,
    ) -> Result<CatalogueStatus, CatalogueError> {
        match self.source.fetch_templates(force_refresh).await {
            Ok(templates) => Ok(self.model.rebuild_index(&templates)),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    "an error occurred trying to get the list of templates"
                );
                Err(CatalogueError::SourceUnavailable(e))
            }
        }
    }

    /// Switch to a new project path. Any detection still running for an older path becomes
    /// stale. Returns `None` when the path is cleared
    pub fn begin_detection(&mut self, path: Option<PathBuf>) -> Option<DetectionRequest<I>> {
        self.generation += 1;
        self.model.begin_path();
        self.project_path = path.clone();

        path.map(|path| DetectionRequest {
            generation: self.generation,
            path,
            inspector: Arc::clone(&self.inspector),
        })
    }

    /// Apply a detection result if it belongs to the current path
    pub fn complete_detection(
        &mut self,
        generation: u64,
        hint: Option<DetectedHint>,
    ) -> HintOutcome {
        if generation != self.generation {
            tracing::debug!(
                generation,
                current = self.generation,
                "discarding stale detection result"
            );
            return HintOutcome::Stale;
        }

        match hint {
            Some(hint) => self.model.apply_detected_hint(hint),
            None => HintOutcome::Ignored,
        }
    }

    /// Set the project path and wait for its detection hint
    pub async fn set_project_path(&mut self, path: Option<PathBuf>) -> HintOutcome {
        let Some(request) = self.begin_detection(path) else {
            return HintOutcome::Ignored;
        };
        let (generation, hint) = request.run().await;
        self.complete_detection(generation, hint)
    }
}

impl<I: ProjectInspector> WizardSession<TemplateFetcher, I> {
    /// Commit staged repository changes and, if anything changed, refetch the catalogue
    /// bypassing the cache. Returns the new status, or `None` when nothing changed
    pub async fn apply_repository_changes(
        &mut self,
        manager: &mut RepositoryManager,
    ) -> Result<Option<CatalogueStatus>, RepositoryUpdateError> {
        if !manager.has_changes() {
            return Ok(None);
        }
        // Resolve the new list before it is persisted
        let preview = manager.preview()?;
        self.source.set_repositories(&preview.repositories)?;

        let changed = match manager.apply() {
            Ok(changed) => changed,
            Err(e) => {
                self.source.set_repositories(manager.repositories())?;
                return Err(e.into());
            }
        };
        if !changed {
            return Ok(None);
        }

        let status = self.refresh(true).await?;
        Ok(Some(status))
    }
}
