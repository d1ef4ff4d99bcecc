//! Template catalogue fetching from remote (HTTP) or local repositories
//!
//! Every repository exposes a `template.yaml` catalogue at its root:
//! - Remote: fetched from `<base url>/template.yaml`, query parameters preserved
//! - Local: read from `<directory>/template.yaml`
//!
//! The merged list of records is cached until a forced refresh.

use super::manifest::{Catalogue, TemplateRecord};
use crate::config::RepositoryInfo;
use crate::error::SourceError;
use std::future::Future;
use std::path::PathBuf;
use tokio::fs;
use url::Url;

/// Name of the catalogue file inside every repository
pub const CATALOGUE_FILE: &str = "template.yaml";

/// Provider of the current list of template records
pub trait TemplateSource {
    /// Fetch every template record. `force_refresh` bypasses any cached result
    fn fetch_templates(
        &mut self,
        force_refresh: bool,
    ) -> impl Future<Output = Result<Vec<TemplateRecord>, SourceError>> + Send;
}

/// Repository location - either remote URL or local directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceLocation {
    Remote(Url),
    Local(PathBuf),
}

impl SourceLocation {
    /// Interpret a repository URL: http(s) is remote, `file://` and bare paths are local
    pub fn parse(location: &str) -> Result<Self, SourceError> {
        let trimmed = location.trim();
        if trimmed.is_empty() {
            return Err(SourceError::InvalidLocation(location.to_string()));
        }

        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            let url = Url::parse(trimmed)
                .map_err(|_| SourceError::InvalidLocation(location.to_string()))?;
            return Ok(Self::Remote(url));
        }

        if trimmed.starts_with("file://") {
            let url = Url::parse(trimmed)
                .map_err(|_| SourceError::InvalidLocation(location.to_string()))?;
            let path = url
                .to_file_path()
                .map_err(|_| SourceError::InvalidLocation(location.to_string()))?;
            return Ok(Self::Local(path));
        }

        Ok(Self::Local(PathBuf::from(trimmed)))
    }

    /// Create a local repository location from a path
    pub fn local(path: PathBuf) -> Self {
        Self::Local(path)
    }
}

impl std::fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceLocation::Remote(url) => write!(f, "{}", url),
            SourceLocation::Local(path) => write!(f, "{}", path.display()),
        }
    }
}

/// A named location the fetcher reads from
#[derive(Debug, Clone)]
struct Repository {
    name: String,
    location: SourceLocation,
}

/// Template fetcher - merges catalogues from every enabled repository
pub struct TemplateFetcher {
    repositories: Vec<Repository>,
    client: reqwest::Client,
    /// Records from the last successful fetch
    cache: Option<Vec<TemplateRecord>>,
}

impl TemplateFetcher {
    /// Create a fetcher over the given named locations
    pub fn new(repositories: Vec<(String, SourceLocation)>, user_agent: &str) -> Self {
        Self {
            repositories: repositories
                .into_iter()
                .map(|(name, location)| Repository { name, location })
                .collect(),
            client: reqwest::Client::builder()
                .user_agent(user_agent)
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
            cache: None,
        }
    }

    /// Create a fetcher from configured repositories, skipping disabled ones
    pub fn from_repositories(
        repositories: &[RepositoryInfo],
        user_agent: &str,
    ) -> Result<Self, SourceError> {
        let mut fetcher = Self::new(Vec::new(), user_agent);
        fetcher.repositories = Self::resolve(repositories)?;
        Ok(fetcher)
    }

    fn resolve(repositories: &[RepositoryInfo]) -> Result<Vec<Repository>, SourceError> {
        repositories
            .iter()
            .filter(|r| r.enabled)
            .map(|r| {
                Ok(Repository {
                    name: r.display_name().to_string(),
                    location: SourceLocation::parse(&r.url)?,
                })
            })
            .collect()
    }

    /// Create a fetcher for a single local template directory
    pub fn from_local(path: PathBuf, user_agent: &str) -> Self {
        let name = path.display().to_string();
        Self::new(vec![(name, SourceLocation::local(path))], user_agent)
    }

    /// Replace the repository list (e.g. after the repository configuration changed).
    /// The cache is kept until the next forced refresh
    pub fn set_repositories(&mut self, repositories: &[RepositoryInfo]) -> Result<(), SourceError> {
        self.repositories = Self::resolve(repositories)?;
        Ok(())
    }

    /// Locations this fetcher reads from
    pub fn locations(&self) -> impl Iterator<Item = &SourceLocation> {
        self.repositories.iter().map(|r| &r.location)
    }

    /// Build a URL by appending a path segment, preserving query parameters
    fn build_url(base: &Url, path_segment: &str) -> Result<Url, SourceError> {
        let mut url = base.clone();
        url.path_segments_mut()
            .map_err(|_| SourceError::InvalidLocation(base.to_string()))?
            .pop_if_empty()
            .push(path_segment);
        Ok(url)
    }

    /// Fetch and parse one repository's catalogue
    async fn fetch_catalogue(&self, repository: &Repository) -> Result<Catalogue, SourceError> {
        let catalogue = match &repository.location {
            SourceLocation::Remote(base_url) => {
                let url = Self::build_url(base_url, CATALOGUE_FILE)?;
                let response = self.client.get(url.clone()).send().await.map_err(|source| {
                    SourceError::Request {
                        url: url.to_string(),
                        source,
                    }
                })?;

                if !response.status().is_success() {
                    return Err(SourceError::Status {
                        url: url.to_string(),
                        status: response.status(),
                    });
                }

                let content = response
                    .text()
                    .await
                    .map_err(|source| SourceError::Request {
                        url: url.to_string(),
                        source,
                    })?;
                Catalogue::parse(&content).map_err(|source| SourceError::Parse {
                    location: url.to_string(),
                    source,
                })?
            }
            SourceLocation::Local(path) => {
                let manifest_path = path.join(CATALOGUE_FILE);
                let content = fs::read_to_string(&manifest_path)
                    .await
                    .map_err(|source| SourceError::Read {
                        path: manifest_path.clone(),
                        source,
                    })?;
                Catalogue::parse(&content).map_err(|source| SourceError::Parse {
                    location: manifest_path.display().to_string(),
                    source,
                })?
            }
        };

        Ok(catalogue.with_source(&repository.name))
    }
}

impl TemplateSource for TemplateFetcher {
    async fn fetch_templates(
        &mut self,
        force_refresh: bool,
    ) -> Result<Vec<TemplateRecord>, SourceError> {
        if !force_refresh {
            if let Some(cached) = &self.cache {
                return Ok(cached.clone());
            }
        }

        let mut records = Vec::new();
        for repository in &self.repositories {
            let catalogue = self.fetch_catalogue(repository).await?;
            tracing::debug!(
                repository = %repository.name,
                templates = catalogue.templates.len(),
                "loaded template catalogue"
            );
            records.extend(catalogue.templates);
        }

        if records.is_empty() {
            tracing::info!("the list of templates is empty");
        }

        self.cache = Some(records.clone());
        Ok(records)
    }
}
