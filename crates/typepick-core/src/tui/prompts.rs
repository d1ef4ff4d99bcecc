//! Charm-style CLI prompts using cliclack

use crate::config::{self, RepoChange, RepositoryInfo, RepositoryManager};
use crate::inspect::MarkerInspector;
use crate::product::ProductConfig;
use crate::selection::{sort_languages, BuiltinNames, DisplayNameResolver, HintOutcome, Selection};
use crate::session::WizardSession;
use crate::templates::TemplateFetcher;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

type Session = WizardSession<TemplateFetcher, MarkerInspector>;

/// Value of the extra entry in the type prompt that opens repository management
const MANAGE_REPOSITORIES: &str = "\u{0}manage-repositories";

/// CLI arguments for the select command
#[derive(Debug, Clone, Default)]
pub struct SelectArgs {
    /// Local directory to use for templates instead of the configured repositories
    pub template_dir: Option<PathBuf>,

    /// Repository list file (defaults to the product config directory)
    pub repositories_file: Option<PathBuf>,

    /// Existing project directory to detect the type from
    pub directory: Option<PathBuf>,

    /// Project type to select without prompting
    pub project_type: Option<String>,

    /// Language to select without prompting
    pub language: Option<String>,

    /// Bypass the cached template list
    pub force_refresh: bool,

    /// Auto-confirm all prompts (non-interactive mode)
    pub yes: bool,
}

/// Run the selection wizard with interactive prompts
pub async fn run<C: ProductConfig>(config: &C, args: SelectArgs) -> Result<Selection> {
    cliclack::intro(config.display_name())?;

    // Step 1: Setup repositories and the template fetcher
    let mut repos = config::open_repositories(config, args.repositories_file.clone())
        .context("Failed to load the repository configuration")?;
    let fetcher = setup_fetcher(config, &args, &repos)?;
    let mut session = WizardSession::new(fetcher, MarkerInspector::new());

    // Step 2: Load project types
    load_project_types(&mut session, args.force_refresh).await?;

    // Step 3: Detect the type of an existing project
    if let Some(dir) = &args.directory {
        detect_project(&mut session, dir).await?;
    }

    // Step 4: Select project type (repository management is reachable from here)
    select_type(&mut session, &mut repos, &args).await?;

    // Step 5: Select language when the type offers a choice
    select_language(&mut session, &args)?;

    finish(&session)
}

fn setup_fetcher<C: ProductConfig>(
    config: &C,
    args: &SelectArgs,
    repos: &RepositoryManager,
) -> Result<TemplateFetcher> {
    let fetcher = match &args.template_dir {
        Some(path) => {
            cliclack::log::info(format!("Using local templates from {}", path.display()))?;
            TemplateFetcher::from_local(path.clone(), config.user_agent())
        }
        None => {
            let enabled = repos.repositories().iter().filter(|r| r.enabled).count();
            cliclack::log::info(format!("Using {} enabled template repositories", enabled))?;
            TemplateFetcher::from_repositories(repos.repositories(), config.user_agent())?
        }
    };

    Ok(fetcher)
}

async fn load_project_types(session: &mut Session, force_refresh: bool) -> Result<()> {
    let spinner = cliclack::spinner();
    spinner.start("Loading project types...");

    match session.refresh(force_refresh).await {
        Ok(status) => {
            let count = session.model().index().map_or(0, |index| index.len());
            spinner.stop(format!("Loaded {} project type(s)", count));
            if let Some(message) = status.message() {
                cliclack::log::warning(message)?;
            }
            Ok(())
        }
        Err(e) => {
            spinner.stop("Failed to load project types");
            Err(e).context("The list of project types could not be retrieved")
        }
    }
}

fn describe_type(session: &Session, project_type: &str) -> String {
    let languages = session
        .model()
        .index()
        .map(|index| sort_languages(&BuiltinNames, index.language_ids(project_type)))
        .unwrap_or_default();
    languages
        .iter()
        .map(|l| BuiltinNames.language_display_name(l).into_owned())
        .collect::<Vec<_>>()
        .join(", ")
}

async fn detect_project(session: &mut Session, dir: &Path) -> Result<()> {
    let current_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let path = if dir.is_absolute() {
        dir.to_path_buf()
    } else {
        current_dir.join(dir)
    };

    let spinner = cliclack::spinner();
    spinner.start(format!("Inspecting {}...", path.display()));

    match session.set_project_path(Some(path)).await {
        HintOutcome::Applied => {
            let model = session.model();
            spinner.stop(format!(
                "Detected project type: {}",
                BuiltinNames.type_display_name(model.project_type())
            ));
        }
        HintOutcome::Deferred | HintOutcome::Ignored => {
            spinner.stop("Could not determine the project type");
        }
        HintOutcome::Overridden | HintOutcome::Stale => {
            spinner.stop("Keeping the current selection");
        }
    }

    Ok(())
}

async fn select_type(
    session: &mut Session,
    repos: &mut RepositoryManager,
    args: &SelectArgs,
) -> Result<()> {
    // If a type was specified via --type flag, use it directly
    if let Some(project_type) = &args.project_type {
        session
            .model_mut()
            .select_type(Some(project_type))
            .with_context(|| {
                let available = session.model().type_choices(&BuiltinNames).join(", ");
                format!("Available project types: {}", available)
            })?;
        cliclack::log::info(format!(
            "Using project type: {}",
            BuiltinNames.type_display_name(project_type)
        ))?;
        return Ok(());
    }

    // Repository changes only make sense when the catalogue comes from repositories
    let can_manage = args.template_dir.is_none() && repos.path().is_some();

    loop {
        let choices = session.model().type_choices(&BuiltinNames);

        if args.yes {
            if session.model().can_finish() {
                return Ok(());
            }
            if let [only] = choices.as_slice() {
                session.model_mut().select_type(Some(only))?;
                return Ok(());
            }
            anyhow::bail!("A project type is required in non-interactive mode (use --type).");
        }

        if choices.is_empty() && !can_manage {
            anyhow::bail!("No project types available.");
        }

        let mut select = cliclack::select("Select a project type");
        for id in &choices {
            select = select.item(
                id.clone(),
                BuiltinNames.type_display_name(id),
                describe_type(session, id),
            );
        }
        if can_manage {
            select = select.item(
                MANAGE_REPOSITORIES.to_string(),
                "Manage template repositories...",
                "",
            );
        }
        if let Some(current) = &session.model().selection().project_type {
            select = select.initial_value(current.clone());
        }

        let picked: String = select.interact()?;
        if picked == MANAGE_REPOSITORIES {
            manage_repositories(session, repos).await?;
            continue;
        }

        session.model_mut().select_type(Some(&picked))?;
        return Ok(());
    }
}

fn select_language(session: &mut Session, args: &SelectArgs) -> Result<()> {
    if let Some(language) = &args.language {
        session.model_mut().select_language(Some(language))?;
        return Ok(());
    }

    // Zero or one language is resolved automatically, and the language is optional
    if !session.model().language_picker_active() || args.yes {
        return Ok(());
    }

    let mut select = cliclack::select("Select a language");
    for id in session.model().language_choices(&BuiltinNames) {
        let label = BuiltinNames.language_display_name(&id).into_owned();
        select = select.item(Some(id), label, "");
    }
    select = select.item(None, "No preference", "");
    if let Some(current) = &session.model().selection().language {
        select = select.initial_value(Some(current.clone()));
    }

    let picked: Option<String> = select.interact()?;
    session.model_mut().select_language(picked.as_deref())?;
    Ok(())
}

fn list_repositories(repos: &RepositoryManager) -> Result<()> {
    let preview = repos.preview()?;
    let lines: Vec<String> = preview
        .repositories
        .iter()
        .map(|r| {
            format!(
                "{} {} ({})",
                if r.enabled { "[x]" } else { "[ ]" },
                r.display_name(),
                r.url
            )
        })
        .collect();
    cliclack::log::info(format!("Repositories:\n{}", lines.join("\n")))?;
    Ok(())
}

/// One pass through the repository management menu
enum RepoAction {
    Stage(RepoChange),
    Nothing,
    Done,
}

fn prompt_repository_change(repos: &RepositoryManager) -> Result<RepoAction> {
    let action: &str = cliclack::select("Manage template repositories")
        .item("add", "Add a repository", "")
        .item("toggle", "Enable or disable a repository", "")
        .item("remove", "Remove a repository", "")
        .item("done", "Done", "")
        .interact()?;

    let preview = repos.preview()?;
    match action {
        "add" => {
            let url: String = cliclack::input("Repository URL or directory").interact()?;
            let name: String = cliclack::input("Repository name")
                .placeholder(&url)
                .default_input(&url)
                .interact()?;
            Ok(RepoAction::Stage(RepoChange::Add(RepositoryInfo::new(
                url.trim(),
                name.trim(),
            ))))
        }
        "toggle" => {
            let mut select = cliclack::select("Select a repository");
            for repo in &preview.repositories {
                let state = if repo.enabled { "enabled" } else { "disabled" };
                select = select.item(repo.url.clone(), repo.display_name(), state);
            }
            let url: String = select.interact()?;
            let enabled = preview
                .repositories
                .iter()
                .find(|r| r.url == url)
                .is_some_and(|r| r.enabled);
            Ok(RepoAction::Stage(RepoChange::SetEnabled {
                url,
                enabled: !enabled,
            }))
        }
        "remove" => {
            let removable: Vec<_> = preview
                .repositories
                .iter()
                .filter(|r| !r.protected)
                .collect();
            if removable.is_empty() {
                cliclack::log::warning("There are no repositories that can be removed")?;
                return Ok(RepoAction::Nothing);
            }
            let mut select = cliclack::select("Select a repository to remove");
            for repo in removable {
                select = select.item(repo.url.clone(), repo.display_name(), &repo.url);
            }
            Ok(RepoAction::Stage(RepoChange::Remove(select.interact()?)))
        }
        _ => Ok(RepoAction::Done),
    }
}

async fn manage_repositories(session: &mut Session, repos: &mut RepositoryManager) -> Result<()> {
    loop {
        list_repositories(repos)?;
        match prompt_repository_change(repos)? {
            RepoAction::Stage(change) => {
                if let Err(e) = repos.stage(change) {
                    cliclack::log::error(format!("{}", e))?;
                }
            }
            RepoAction::Nothing => {}
            RepoAction::Done => break,
        }
    }

    if !repos.has_changes() {
        return Ok(());
    }

    let spinner = cliclack::spinner();
    spinner.start("Updating repositories and refreshing project types...");

    match session.apply_repository_changes(repos).await {
        Ok(Some(status)) => {
            spinner.stop("Project types refreshed");
            if let Some(message) = status.message() {
                cliclack::log::warning(message)?;
            }
        }
        Ok(None) => spinner.stop("No repository changes"),
        Err(e) => {
            spinner.stop("Repository update failed");
            cliclack::log::error(format!("{:#}", anyhow::Error::new(e)))?;
        }
    }

    Ok(())
}

fn finish(session: &Session) -> Result<Selection> {
    let model = session.model();
    if !model.can_finish() {
        anyhow::bail!("No project type selected.");
    }

    cliclack::log::success(format!(
        "Project type: {}, language: {}",
        BuiltinNames.type_display_name(model.project_type()),
        BuiltinNames.language_display_name(model.language())
    ))?;
    cliclack::outro("Selection complete")?;

    Ok(model.selection().clone())
}
