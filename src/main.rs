use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use repovault::{Config, GitHubClient, SyncEngine};

#[derive(Parser)]
#[command(name = "repovault")]
#[command(about = "Bare-mirror backup for all repositories of a GitHub account")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Account whose repositories are mirrored (falls back to GITHUB_USERNAME)
    #[arg(short, long)]
    user: Option<String>,

    /// Directory the bare mirrors are placed beneath (falls back to REPO_DIR)
    #[arg(short, long)]
    directory: Option<String>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Mirror every repository of the account (default)
    Sync,

    /// List the account's repositories without touching local mirrors
    List,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Seed the environment from a .env file when one is present.
    dotenv::dotenv().ok();

    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    info!("Starting RepoVault v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::resolve(cli.user, cli.directory)?;

    match cli.command.unwrap_or(Commands::Sync) {
        Commands::Sync => cmd_sync(&config).await,
        Commands::List => cmd_list(&config).await,
    }
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    Ok(())
}

/// Run the full listing + reconciliation pass.
///
/// A listing failure is fatal; per-repository sync failures are logged and
/// never affect the exit code.
async fn cmd_sync(config: &Config) -> Result<()> {
    let client = GitHubClient::new(config);
    let repos = client
        .list_repositories()
        .await
        .context("Failed to fetch repositories")?;

    info!(
        "Mirroring {} repositories into {}",
        repos.len(),
        config.target_dir.display()
    );

    let engine = SyncEngine::new(config);
    engine.run(&repos).await;

    Ok(())
}

/// List repositories the sync pass would mirror.
async fn cmd_list(config: &Config) -> Result<()> {
    let client = GitHubClient::new(config);
    let repos = client
        .list_repositories()
        .await
        .context("Failed to fetch repositories")?;

    println!("Repositories ({}):", repos.len());

    for repo in &repos {
        match repo.description_text() {
            "" => println!("  {}", repo.name),
            description => println!("  {} - {}", repo.name, description),
        }
    }

    Ok(())
}
