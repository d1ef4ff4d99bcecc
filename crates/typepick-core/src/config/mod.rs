//! Configuration: repository list location and environment overrides

pub mod repositories;

use crate::error::RepositoryError;
use crate::product::ProductConfig;
use std::path::PathBuf;

pub use repositories::{RepoChange, RepositoryConfig, RepositoryInfo, RepositoryManager};

/// File name of the persisted repository list
pub const REPOSITORIES_FILE: &str = "repositories.yaml";

/// Default location of the repository list: `<config dir>/<product>/repositories.yaml`
pub fn default_repositories_path<C: ProductConfig>(config: &C) -> Option<PathBuf> {
    dirs_next::config_dir().map(|dir| dir.join(config.name()).join(REPOSITORIES_FILE))
}

/// The product's built-in repository
pub fn default_repository<C: ProductConfig>(config: &C) -> RepositoryInfo {
    RepositoryInfo {
        description: format!("Default {} templates", config.display_name()),
        protected: true,
        ..RepositoryInfo::new(config.default_template_url(), "Default templates")
    }
}

/// Open the repository list for a product.
///
/// If the product's template URL env var is set it replaces the list with a single,
/// unsaved repository. Otherwise the list is read from `path` (or the default location).
pub fn open_repositories<C: ProductConfig>(
    config: &C,
    path: Option<PathBuf>,
) -> Result<RepositoryManager, RepositoryError> {
    if let Ok(url) = std::env::var(config.template_url_env()) {
        if !url.trim().is_empty() {
            tracing::debug!(%url, "using template URL from environment");
            let repo = RepositoryInfo {
                protected: true,
                ..RepositoryInfo::new(url, "Environment override")
            };
            return Ok(RepositoryManager::new(
                RepositoryConfig {
                    repositories: vec![repo],
                },
                None,
            ));
        }
    }

    match path.or_else(|| default_repositories_path(config)) {
        Some(path) => RepositoryManager::open(path, default_repository(config)),
        None => Ok(RepositoryManager::new(
            RepositoryConfig {
                repositories: vec![default_repository(config)],
            },
            None,
        )),
    }
}
