//! Template repository configuration and staged edits

use crate::error::RepositoryError;
use crate::templates::SourceLocation;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

fn enabled_by_default() -> bool {
    true
}

/// A template repository the catalogue is assembled from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryInfo {
    /// Base URL or directory containing `template.yaml`
    pub url: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub description: String,

    /// Disabled repositories are kept in the list but not fetched
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,

    /// Protected repositories (the product default) cannot be removed
    #[serde(default)]
    pub protected: bool,
}

impl RepositoryInfo {
    pub fn new(url: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            name: name.into(),
            description: String::new(),
            enabled: true,
            protected: false,
        }
    }

    /// Name shown to users, falling back to the URL
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.url
        } else {
            &self.name
        }
    }
}

/// On-disk repository list (`repositories.yaml`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryConfig {
    #[serde(default)]
    pub repositories: Vec<RepositoryInfo>,
}

impl RepositoryConfig {
    /// Load the repository list, or `None` if the file does not exist yet
    pub fn load(path: &Path) -> Result<Option<Self>, RepositoryError> {
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(path).map_err(|source| RepositoryError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = serde_yaml::from_str(&content).map_err(|source| RepositoryError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Some(config))
    }

    /// Load the repository list, seeding it with `default` when no file exists
    pub fn load_or_default(path: &Path, default: RepositoryInfo) -> Result<Self, RepositoryError> {
        Ok(Self::load(path)?.unwrap_or_else(|| Self {
            repositories: vec![default],
        }))
    }

    /// Write the repository list, creating parent directories as needed
    pub fn save(&self, path: &Path) -> Result<(), RepositoryError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|source| RepositoryError::Write {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }
        let content = serde_yaml::to_string(self).map_err(RepositoryError::Serialize)?;
        std::fs::write(path, content).map_err(|source| RepositoryError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    fn position(&self, url: &str) -> Option<usize> {
        self.repositories.iter().position(|r| r.url == url)
    }
}

/// A single staged edit to the repository list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoChange {
    Add(RepositoryInfo),
    Remove(String),
    SetEnabled { url: String, enabled: bool },
}

impl RepoChange {
    fn apply_to(&self, config: &mut RepositoryConfig) -> Result<(), RepositoryError> {
        match self {
            RepoChange::Add(repo) => {
                if config.position(&repo.url).is_some() {
                    return Err(RepositoryError::Duplicate(repo.url.clone()));
                }
                if SourceLocation::parse(&repo.url).is_err() {
                    return Err(RepositoryError::InvalidLocation(repo.url.clone()));
                }
                config.repositories.push(repo.clone());
            }
            RepoChange::Remove(url) => {
                let idx = config
                    .position(url)
                    .ok_or_else(|| RepositoryError::NotFound(url.clone()))?;
                if config.repositories[idx].protected {
                    return Err(RepositoryError::Protected(url.clone()));
                }
                config.repositories.remove(idx);
            }
            RepoChange::SetEnabled { url, enabled } => {
                let idx = config
                    .position(url)
                    .ok_or_else(|| RepositoryError::NotFound(url.clone()))?;
                config.repositories[idx].enabled = *enabled;
            }
        }
        Ok(())
    }
}

/// Stages edits to the repository list and persists them on `apply`
#[derive(Debug, Clone)]
pub struct RepositoryManager {
    /// `None` when the list comes from an override and is not persisted
    path: Option<PathBuf>,
    config: RepositoryConfig,
    staged: Vec<RepoChange>,
}

impl RepositoryManager {
    pub fn new(config: RepositoryConfig, path: Option<PathBuf>) -> Self {
        Self {
            path,
            config,
            staged: Vec::new(),
        }
    }

    /// Load from `path`, seeding with `default` when the file is missing
    pub fn open(path: PathBuf, default: RepositoryInfo) -> Result<Self, RepositoryError> {
        let config = RepositoryConfig::load_or_default(&path, default)?;
        Ok(Self::new(config, Some(path)))
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// The committed repository list
    pub fn repositories(&self) -> &[RepositoryInfo] {
        &self.config.repositories
    }

    /// The repository list as it would look after `apply`
    pub fn preview(&self) -> Result<RepositoryConfig, RepositoryError> {
        let mut preview = self.config.clone();
        for change in &self.staged {
            change.apply_to(&mut preview)?;
        }
        Ok(preview)
    }

    /// Stage a change, rejecting it if it does not apply cleanly on top of earlier ones
    pub fn stage(&mut self, change: RepoChange) -> Result<(), RepositoryError> {
        let mut preview = self.preview()?;
        change.apply_to(&mut preview)?;
        self.staged.push(change);
        Ok(())
    }

    pub fn has_changes(&self) -> bool {
        !self.staged.is_empty()
    }

    /// Drop all staged changes
    pub fn discard(&mut self) {
        self.staged.clear();
    }

    /// Commit staged changes. Returns `true` if the committed list changed
    pub fn apply(&mut self) -> Result<bool, RepositoryError> {
        if self.staged.is_empty() {
            return Ok(false);
        }
        let updated = self.preview()?;
        if let Some(path) = &self.path {
            updated.save(path)?;
        }
        let changed = updated != self.config;
        self.config = updated;
        self.staged.clear();
        tracing::debug!(changed, "applied repository changes");
        Ok(changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_repo() -> RepositoryInfo {
        RepositoryInfo {
            protected: true,
            ..RepositoryInfo::new("https://example.com/templates", "Default templates")
        }
    }

    #[test]
    fn test_missing_file_seeds_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("repositories.yaml");
        let config = RepositoryConfig::load_or_default(&path, default_repo()).unwrap();
        assert_eq!(config.repositories, vec![default_repo()]);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("repositories.yaml");
        let config = RepositoryConfig {
            repositories: vec![default_repo(), RepositoryInfo::new("/srv/templates", "")],
        };
        config.save(&path).unwrap();
        assert_eq!(RepositoryConfig::load(&path).unwrap(), Some(config));
    }

    #[test]
    fn test_enabled_defaults_to_true() {
        let config: RepositoryConfig =
            serde_yaml::from_str("repositories:\n  - url: /srv/templates\n").unwrap();
        assert!(config.repositories[0].enabled);
        assert!(!config.repositories[0].protected);
        assert_eq!(config.repositories[0].display_name(), "/srv/templates");
    }

    #[test]
    fn test_stage_and_apply() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("repositories.yaml");
        let mut manager = RepositoryManager::open(path.clone(), default_repo()).unwrap();
        assert!(!manager.has_changes());

        manager
            .stage(RepoChange::Add(RepositoryInfo::new("/srv/templates", "Local")))
            .unwrap();
        manager
            .stage(RepoChange::SetEnabled {
                url: "https://example.com/templates".to_string(),
                enabled: false,
            })
            .unwrap();
        assert!(manager.has_changes());
        assert_eq!(manager.repositories().len(), 1);

        assert!(manager.apply().unwrap());
        assert!(!manager.has_changes());
        assert_eq!(manager.repositories().len(), 2);
        assert!(!manager.repositories()[0].enabled);

        let reloaded = RepositoryConfig::load(&path).unwrap().unwrap();
        assert_eq!(reloaded.repositories, manager.repositories());
    }

    #[test]
    fn test_rejected_changes() {
        let mut manager = RepositoryManager::new(
            RepositoryConfig {
                repositories: vec![default_repo()],
            },
            None,
        );

        assert!(matches!(
            manager.stage(RepoChange::Remove("https://example.com/templates".to_string())),
            Err(RepositoryError::Protected(_))
        ));
        assert!(matches!(
            manager.stage(RepoChange::Add(default_repo())),
            Err(RepositoryError::Duplicate(_))
        ));
        assert!(matches!(
            manager.stage(RepoChange::Remove("/nope".to_string())),
            Err(RepositoryError::NotFound(_))
        ));
        assert!(!manager.has_changes());
    }

    #[test]
    fn test_invalid_location_rejected_at_stage_time() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("repositories.yaml");
        let mut manager = RepositoryManager::open(path.clone(), default_repo()).unwrap();

        for url in ["   ", "https://exa mple.com/templates"] {
            assert!(matches!(
                manager.stage(RepoChange::Add(RepositoryInfo::new(url, "Broken"))),
                Err(RepositoryError::InvalidLocation(_))
            ));
        }
        assert!(!manager.has_changes());
        assert!(!manager.apply().unwrap());
        assert!(!path.exists());
    }

    #[test]
    fn test_apply_without_effective_change() {
        let mut manager = RepositoryManager::new(
            RepositoryConfig {
                repositories: vec![default_repo()],
            },
            None,
        );
        manager
            .stage(RepoChange::SetEnabled {
                url: "https://example.com/templates".to_string(),
                enabled: true,
            })
            .unwrap();
        assert!(!manager.apply().unwrap());
    }
}
