//! typepick CLI - choose a project type and language from template repositories

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use typepick_core::config::{self, RepoChange, RepositoryInfo, RepositoryManager};
use typepick_core::tui::SelectArgs;
use typepick_core::{
    BuiltinNames, CatalogueStatus, DisplayNameResolver, MarkerInspector, ProductConfig,
    ProjectInspector, TemplateFetcher, TemplateSource, TypeLanguageIndex,
};

/// typepick product configuration
#[derive(Clone)]
pub struct TypepickConfig;

impl ProductConfig for TypepickConfig {
    fn name(&self) -> &'static str {
        "typepick"
    }

    fn display_name(&self) -> &'static str {
        "typepick"
    }

    fn default_template_url(&self) -> &'static str {
        "https://raw.githubusercontent.com/typepick/templates/main/codewind"
    }

    fn template_url_env(&self) -> &'static str {
        "TYPEPICK_TEMPLATE_URL"
    }

    fn cli_description(&self) -> &'static str {
        "CLI for choosing a project type and language from template repositories"
    }
}

#[derive(Parser, Debug)]
#[command(name = "typepick")]
#[command(about = "CLI for choosing a project type and language from template repositories")]
#[command(version)]
pub struct Args {
    /// Repository list file (defaults to the user config directory)
    #[arg(long = "repositories", global = true)]
    pub repositories_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Select a project type and language
    Select(CliSelectArgs),
    /// List available project types and their languages
    List(ListArgs),
    /// Detect the project type and language of an existing directory
    Detect {
        /// Project directory to inspect
        path: PathBuf,
    },
    /// Manage template repositories
    #[command(subcommand)]
    Repos(ReposCommand),
}

#[derive(Parser, Debug)]
pub struct CliSelectArgs {
    /// Local directory to use for templates instead of the configured repositories (for development use)
    #[arg(long = "template-dir")]
    pub template_dir: Option<PathBuf>,

    /// Existing project directory to detect the type from
    #[arg(short, long)]
    pub directory: Option<PathBuf>,

    /// Project type to select
    #[arg(short = 't', long = "type")]
    pub project_type: Option<String>,

    /// Language to select
    #[arg(short, long)]
    pub language: Option<String>,

    /// Bypass the cached template list
    #[arg(long)]
    pub force_refresh: bool,

    /// Auto-confirm all prompts (non-interactive mode)
    #[arg(short, long)]
    pub yes: bool,
}

impl CliSelectArgs {
    fn into_select_args(self, repositories_file: Option<PathBuf>) -> SelectArgs {
        SelectArgs {
            template_dir: self.template_dir,
            repositories_file,
            directory: self.directory,
            project_type: self.project_type,
            language: self.language,
            force_refresh: self.force_refresh,
            yes: self.yes,
        }
    }
}

#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Local directory to use for templates instead of the configured repositories (for development use)
    #[arg(long = "template-dir")]
    pub template_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum ReposCommand {
    /// Show configured repositories
    List,
    /// Add a repository
    Add {
        /// Base URL or directory containing template.yaml
        url: String,
        /// Display name
        #[arg(short, long)]
        name: Option<String>,
        /// Description
        #[arg(short, long)]
        description: Option<String>,
    },
    /// Remove a repository
    Remove { url: String },
    /// Enable a repository
    Enable { url: String },
    /// Disable a repository
    Disable { url: String },
}

async fn list_types(
    config: &TypepickConfig,
    args: ListArgs,
    repositories_file: Option<PathBuf>,
) -> Result<()> {
    let mut fetcher = match args.template_dir {
        Some(path) => TemplateFetcher::from_local(path, config.user_agent()),
        None => {
            let repos = config::open_repositories(config, repositories_file)?;
            TemplateFetcher::from_repositories(repos.repositories(), config.user_agent())?
        }
    };

    let templates = fetcher
        .fetch_templates(true)
        .await
        .context("The list of project types could not be retrieved")?;
    let index = TypeLanguageIndex::from_templates(&templates);

    if index.is_empty() {
        let message = CatalogueStatus::Empty.message().unwrap_or_default();
        println!("{}", message.yellow());
        return Ok(());
    }

    let names = BuiltinNames;
    for project_type in typepick_core::selection::sort_types(&names, index.type_ids()) {
        let languages: Vec<String> =
            typepick_core::selection::sort_languages(&names, index.language_ids(&project_type))
                .iter()
                .map(|l| names.language_display_name(l).into_owned())
                .collect();
        println!(
            "  {} {} {}",
            "->".blue(),
            names.type_display_name(&project_type).bold(),
            format!("({})", project_type).dimmed()
        );
        if !languages.is_empty() {
            println!("       {}", languages.join(", "));
        }
    }

    Ok(())
}

fn detect(path: PathBuf) -> Result<()> {
    let hint = MarkerInspector::new()
        .detect(&path)
        .with_context(|| format!("Failed to inspect {}", path.display()))?;

    match hint {
        Some(hint) => {
            let names = BuiltinNames;
            let project_type = hint.project_type.as_deref().unwrap_or(typepick_core::UNKNOWN);
            let language = hint.language.as_deref().unwrap_or(typepick_core::UNKNOWN);
            println!(
                "{} {}",
                "Type:".green().bold(),
                names.type_display_name(project_type)
            );
            println!(
                "{} {}",
                "Language:".green().bold(),
                names.language_display_name(language)
            );
        }
        None => println!("{}", "Could not determine the project type".yellow()),
    }

    Ok(())
}

fn print_repositories(repos: &RepositoryManager) {
    for repo in repos.repositories() {
        let state = if repo.enabled {
            "enabled".green()
        } else {
            "disabled".red()
        };
        println!("  {} {} [{}]", "->".blue(), repo.display_name().bold(), state);
        println!("       {}", repo.url.dimmed());
        if !repo.description.is_empty() {
            println!("       {}", repo.description);
        }
    }
}

fn manage_repos(
    config: &TypepickConfig,
    command: ReposCommand,
    repositories_file: Option<PathBuf>,
) -> Result<()> {
    let mut repos = config::open_repositories(config, repositories_file)?;

    let change = match command {
        ReposCommand::List => {
            print_repositories(&repos);
            return Ok(());
        }
        ReposCommand::Add {
            url,
            name,
            description,
        } => RepoChange::Add(RepositoryInfo {
            description: description.unwrap_or_default(),
            ..RepositoryInfo::new(url, name.unwrap_or_default())
        }),
        ReposCommand::Remove { url } => RepoChange::Remove(url),
        ReposCommand::Enable { url } => RepoChange::SetEnabled { url, enabled: true },
        ReposCommand::Disable { url } => RepoChange::SetEnabled {
            url,
            enabled: false,
        },
    };

    if repos.path().is_none() {
        anyhow::bail!(
            "Repositories are overridden by {}; unset it to manage repositories",
            config.template_url_env()
        );
    }

    repos.stage(change)?;
    if repos.apply()? {
        println!("{}", "Repositories updated".green().bold());
    } else {
        println!("{}", "No changes".dimmed());
    }
    print_repositories(&repos);

    Ok(())
}

async fn select(config: &TypepickConfig, args: SelectArgs) -> Result<()> {
    let result = typepick_core::run(config, args).await;

    // Ensure cursor is visible on normal exit
    let _ = console::Term::stderr().show_cursor();

    let selection = result?;
    println!(
        "{}={}",
        "type".bold(),
        selection.project_type.as_deref().unwrap_or(typepick_core::UNKNOWN)
    );
    println!(
        "{}={}",
        "language".bold(),
        selection.language.as_deref().unwrap_or(typepick_core::UNKNOWN)
    );
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Ensure terminal cursor is restored on panic
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = console::Term::stderr().show_cursor();
        default_panic(info);
    }));

    // Handle Ctrl+C gracefully
    ctrlc::set_handler(move || {
        let _ = console::Term::stderr().show_cursor();
        std::process::exit(130);
    })
    .ok();

    let args = Args::parse();
    let config = TypepickConfig;

    // Initialize logging (stderr, so prompt output stays clean)
    let log_level = if args.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .init();

    tracing::debug!(command = ?args.command, "starting {}", config.cli_description());

    match args.command {
        Some(Command::Select(select_args)) => {
            select(&config, select_args.into_select_args(args.repositories_file)).await
        }
        Some(Command::List(list_args)) => {
            list_types(&config, list_args, args.repositories_file).await
        }
        Some(Command::Detect { path }) => detect(path),
        Some(Command::Repos(command)) => manage_repos(&config, command, args.repositories_file),
        None => {
            // No subcommand provided, default to select behavior (interactive mode)
            let select_args = SelectArgs {
                repositories_file: args.repositories_file,
                ..SelectArgs::default()
            };
            select(&config, select_args).await
        }
    }
}
