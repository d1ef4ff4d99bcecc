//! Error types for the selection core and its collaborators

use std::path::PathBuf;
use thiserror::Error;

/// Failure to obtain a template catalogue from one of the configured locations
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("invalid template location '{0}'")]
    InvalidLocation(String),

    #[error("failed to fetch template catalogue from {url}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to fetch template catalogue from {url}: HTTP {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("failed to read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse template catalogue from {location}")]
    Parse {
        location: String,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Outcome of a catalogue rebuild that could not produce an index
#[derive(Debug, Error)]
pub enum CatalogueError {
    #[error("template source unavailable")]
    SourceUnavailable(#[from] SourceError),
}

/// Rejected selection requests
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("unknown project type '{0}'")]
    UnknownType(String),

    #[error("language '{language}' is not available for project type '{project_type}'")]
    UnknownLanguage {
        project_type: String,
        language: String,
    },

    #[error("a project type must be selected before a language")]
    NoTypeSelected,
}

/// Failure while inspecting an existing project directory
#[derive(Debug, Error)]
pub enum InspectError {
    #[error("project path does not exist: {}", .0.display())]
    Missing(PathBuf),

    #[error("failed to inspect {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Repository configuration errors
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("failed to read repository configuration {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write repository configuration {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse repository configuration {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("failed to serialize repository configuration")]
    Serialize(#[source] serde_yaml::Error),

    #[error("invalid repository location '{0}'")]
    InvalidLocation(String),

    #[error("repository already configured: {0}")]
    Duplicate(String),

    #[error("repository not found: {0}")]
    NotFound(String),

    #[error("repository cannot be removed: {0}")]
    Protected(String),
}

/// Failure to commit repository changes and refresh the catalogue
#[derive(Debug, Error)]
pub enum RepositoryUpdateError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error("failed to refresh project types")]
    Refresh(#[from] CatalogueError),
}
