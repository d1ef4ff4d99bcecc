use std::fs;
use std::path::Path;
use tempfile::TempDir;
use typepick_core::config::RepositoryConfig;
use typepick_core::error::RepositoryUpdateError;
use typepick_core::{
    BuiltinNames, CatalogueStatus, HintOutcome, MarkerInspector, RepoChange, RepositoryError,
    RepositoryInfo, RepositoryManager, TemplateFetcher, WizardSession,
};

const NODE_AND_DOCKER: &str = r#"
templates:
  - label: Express
    url: https://example.com/express
    projectType: nodejs
    language: javascript
  - label: Express TypeScript
    url: https://example.com/express-ts
    projectType: nodejs
    language: typescript
  - label: Flask
    url: https://example.com/flask
    projectType: docker
    language: python
"#;

const SPRING: &str = r#"
templates:
  - label: Spring Boot
    url: https://example.com/spring
    project_type: spring
    language: java
"#;

fn catalogue(content: &str) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("template.yaml"), content).unwrap();
    dir
}

fn typescript_project() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("package.json"),
        r#"{"name": "app", "devDependencies": {"typescript": "^5"}}"#,
    )
    .unwrap();
    fs::write(dir.path().join("tsconfig.json"), "{}").unwrap();
    dir
}

fn url_of(dir: &Path) -> String {
    dir.display().to_string()
}

#[tokio::test]
async fn test_detected_project_seeds_selection_from_local_catalogue() {
    let templates = catalogue(NODE_AND_DOCKER);
    let project = typescript_project();

    let fetcher = TemplateFetcher::from_local(templates.path().to_path_buf(), "typepick-test");
    let mut session = WizardSession::new(fetcher, MarkerInspector::new());

    assert_eq!(session.refresh(false).await.unwrap(), CatalogueStatus::Ready);
    assert_eq!(
        session.model().type_choices(&BuiltinNames),
        vec!["docker", "nodejs"]
    );

    let outcome = session
        .set_project_path(Some(project.path().to_path_buf()))
        .await;
    assert_eq!(outcome, HintOutcome::Applied);
    assert_eq!(session.model().project_type(), "nodejs");
    assert_eq!(session.model().language(), "typescript");
    assert!(session.model().language_picker_active());

    // Docker offers a single language, which is picked automatically
    session.model_mut().select_type(Some("docker")).unwrap();
    assert_eq!(session.model().language(), "python");
    assert!(!session.model().language_picker_active());
    assert!(session.model().can_finish());
}

#[tokio::test]
async fn test_missing_project_directory_leaves_selection_empty() {
    let templates = catalogue(NODE_AND_DOCKER);
    let fetcher = TemplateFetcher::from_local(templates.path().to_path_buf(), "typepick-test");
    let mut session = WizardSession::new(fetcher, MarkerInspector::new());
    session.refresh(false).await.unwrap();

    let missing = templates.path().join("does-not-exist");
    assert_eq!(
        session.set_project_path(Some(missing)).await,
        HintOutcome::Ignored
    );
    assert!(session.model().selection().is_empty());
    assert!(!session.model().can_finish());
}

#[tokio::test]
async fn test_missing_catalogue_is_unavailable() {
    let empty = tempfile::tempdir().unwrap();
    let fetcher = TemplateFetcher::from_local(empty.path().to_path_buf(), "typepick-test");
    let mut session = WizardSession::new(fetcher, MarkerInspector::new());

    assert!(session.refresh(false).await.is_err());
    assert_eq!(session.model().status(), CatalogueStatus::Unavailable);
    assert!(session.model().type_choices(&BuiltinNames).is_empty());
}

#[tokio::test]
async fn test_repository_changes_refresh_the_catalogue() {
    let node = catalogue(NODE_AND_DOCKER);
    let spring = catalogue(SPRING);
    let config_dir = tempfile::tempdir().unwrap();
    let repositories_file = config_dir.path().join("repositories.yaml");

    let default = RepositoryInfo {
        protected: true,
        ..RepositoryInfo::new(url_of(node.path()), "Default templates")
    };
    let mut repos = RepositoryManager::open(repositories_file.clone(), default).unwrap();

    let fetcher =
        TemplateFetcher::from_repositories(repos.repositories(), "typepick-test").unwrap();
    let mut session = WizardSession::new(fetcher, MarkerInspector::new());
    session.refresh(false).await.unwrap();
    session.model_mut().select_type(Some("docker")).unwrap();

    repos
        .stage(RepoChange::Add(RepositoryInfo::new(url_of(spring.path()), "Spring")))
        .unwrap();
    let status = session.apply_repository_changes(&mut repos).await.unwrap();
    assert_eq!(status, Some(CatalogueStatus::Ready));
    assert_eq!(
        session.model().type_choices(&BuiltinNames),
        vec!["docker", "nodejs", "spring"]
    );
    // The existing pick is still offered and survives the refresh
    assert_eq!(session.model().project_type(), "docker");
    assert!(repositories_file.exists());

    // Disabling the default repository drops docker, which clears the selection
    repos
        .stage(RepoChange::SetEnabled {
            url: url_of(node.path()),
            enabled: false,
        })
        .unwrap();
    session.apply_repository_changes(&mut repos).await.unwrap();
    assert_eq!(session.model().type_choices(&BuiltinNames), vec!["spring"]);
    assert!(session.model().selection().is_empty());

    // The protected default can be disabled but never removed
    assert!(matches!(
        repos.stage(RepoChange::Remove(url_of(node.path()))),
        Err(RepositoryError::Protected(_))
    ));

    // A location that cannot be fetched never reaches the saved list
    assert!(matches!(
        repos.stage(RepoChange::Add(RepositoryInfo::new("   ", "Blank"))),
        Err(RepositoryError::InvalidLocation(_))
    ));
    assert_eq!(
        session.apply_repository_changes(&mut repos).await.unwrap(),
        None
    );

    let reopened =
        RepositoryManager::open(repositories_file, RepositoryInfo::new("unused", "")).unwrap();
    assert_eq!(reopened.repositories().len(), 2);
    assert!(!reopened.repositories()[0].enabled);
    let fetcher = TemplateFetcher::from_repositories(reopened.repositories(), "typepick-test");
    assert!(fetcher.is_ok());
}

#[tokio::test]
async fn test_unresolvable_repository_list_is_not_persisted() {
    let node = catalogue(NODE_AND_DOCKER);
    let config_dir = tempfile::tempdir().unwrap();
    let repositories_file = config_dir.path().join("repositories.yaml");

    let fetcher = TemplateFetcher::from_local(node.path().to_path_buf(), "typepick-test");
    let mut session = WizardSession::new(fetcher, MarkerInspector::new());
    session.refresh(false).await.unwrap();

    // A hand-edited list may already hold an entry that cannot be resolved
    let mut repos = RepositoryManager::new(
        RepositoryConfig {
            repositories: vec![RepositoryInfo::new(" ", "Blank")],
        },
        Some(repositories_file.clone()),
    );
    repos
        .stage(RepoChange::Add(RepositoryInfo::new(url_of(node.path()), "Node")))
        .unwrap();

    assert!(matches!(
        session.apply_repository_changes(&mut repos).await,
        Err(RepositoryUpdateError::Source(_))
    ));
    assert!(!repositories_file.exists());
    assert!(repos.has_changes());
    assert_eq!(session.model().status(), CatalogueStatus::Ready);
}
