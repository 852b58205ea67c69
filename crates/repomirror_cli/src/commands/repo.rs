//! Repository registration and inspection.

use clap::Subcommand;
use chrono::{DateTime, Utc};
use repomirror::platform::RepoCoordinates;
use repomirror::{PlatformType, RepositoryModel, connect_and_migrate, store};

/// Repository subcommands.
#[derive(Subcommand)]
pub enum RepoAction {
    /// Start tracking a repository
    Add {
        /// Repository as owner/name
        repository: String,

        /// Hosting platform
        #[arg(short, long, default_value_t = PlatformType::GitHub)]
        platform: PlatformType,
    },
    /// List tracked repositories
    List {
        /// Only show repositories picked up by `sync all`
        #[arg(long)]
        active: bool,
    },
    /// Show one repository with its checkpoints and mirrored counts
    Show {
        /// Repository as owner/name
        repository: String,
    },
    /// Include a repository in `sync all`
    Enable {
        /// Repository as owner/name
        repository: String,
    },
    /// Exclude a repository from `sync all`
    Disable {
        /// Repository as owner/name
        repository: String,
    },
}

/// Split `owner/name`, rejecting anything else.
pub(crate) fn parse_full_name(value: &str) -> Result<RepoCoordinates, Box<dyn std::error::Error>> {
    RepoCoordinates::parse(value.trim())
        .ok_or_else(|| format!("Expected a repository as owner/name, got {:?}", value).into())
}

fn format_checkpoint(at: Option<DateTime<Utc>>) -> String {
    at.map(|at| at.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| "never".to_string())
}

fn list_line(repo: &RepositoryModel) -> String {
    format!(
        "{:<40} {:<9} {:<8} issues: {:<23} commits: {}",
        repo.full_name,
        repo.platform,
        if repo.active { "active" } else { "inactive" },
        format_checkpoint(repo.issues_checkpoint()),
        format_checkpoint(repo.commits_checkpoint()),
    )
}

pub(crate) async fn handle_repo(
    action: RepoAction,
    database_url: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let db = connect_and_migrate(database_url).await?;

    match action {
        RepoAction::Add {
            repository,
            platform,
        } => {
            let coords = parse_full_name(&repository)?;
            let repo = store::repos::create(&db, platform, &coords.owner, &coords.name).await?;
            tracing::info!(repository = %repo.full_name, id = %repo.id, "Tracking repository");
            println!("Added {} ({})", repo.full_name, repo.id);
        }
        RepoAction::List { active } => {
            let repos = if active {
                store::repos::list_active(&db).await?
            } else {
                store::repos::list(&db).await?
            };
            if repos.is_empty() {
                println!("No repositories tracked. Add one with `repomirror repo add owner/name`.");
            }
            for repo in &repos {
                println!("{}", list_line(repo));
            }
        }
        RepoAction::Show { repository } => {
            let coords = parse_full_name(&repository)?;
            let repo = store::repos::get_by_full_name(&db, &coords.full_name()).await?;
            let issues = store::repos::count_issues(&db, repo.id).await?;
            let commits = store::repos::count_commits(&db, repo.id).await?;

            println!("{}", repo.full_name);
            println!("  id:             {}", repo.id);
            println!("  platform:       {}", repo.platform);
            println!("  active:         {}", repo.active);
            if let Some(description) = &repo.description {
                println!("  description:    {}", description);
            }
            println!("  default branch: {}", repo.default_branch);
            println!("  stars / forks:  {} / {}", repo.stars_count, repo.forks_count);
            println!("  issues:         {} mirrored", issues);
            println!("  commits:        {} mirrored", commits);
            println!(
                "  last synced:    metadata {}, issues {}, commits {}",
                format_checkpoint(repo.last_sync_metadata_at.map(|at| at.with_timezone(&Utc))),
                format_checkpoint(repo.issues_checkpoint()),
                format_checkpoint(repo.commits_checkpoint()),
            );
        }
        RepoAction::Enable { repository } => {
            set_active(&db, &repository, true).await?;
        }
        RepoAction::Disable { repository } => {
            set_active(&db, &repository, false).await?;
        }
    }

    Ok(())
}

async fn set_active(
    db: &sea_orm::DatabaseConnection,
    repository: &str,
    active: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let coords = parse_full_name(repository)?;
    let repo = store::repos::get_by_full_name(db, &coords.full_name()).await?;
    let repo = store::repos::set_active(db, repo.id, active).await?;
    println!(
        "{} {}",
        if repo.active { "Enabled" } else { "Disabled" },
        repo.full_name
    );
    Ok(())
}
