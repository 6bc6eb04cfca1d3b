//! # userlist
//!
//! Command-line front end for the offline-first user list.
//!
//! ## Commands
//!
//! - `load`: Load the user list (falls back to the saved copy when offline)
//! - `refresh`: Same cycle, started as a pull-to-refresh
//! - `clear-cache`: Delete the saved copy and load again
//! - `status`: Show what is saved locally
//! - `show`: Show one user's details from the saved copy
//!
//! ## Example
//!
//! ```bash
//! # Fetch and save the list
//! userlist load
//!
//! # Simulate the server being unreachable
//! userlist --mock load
//!
//! # Retry automatically if the prompt offers it
//! userlist load --on-prompt retry
//!
//! # Details of user 3, from the saved copy
//! userlist show 3
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use userlist_sync_client::{
    HttpRemote, KeyValueStore, MockRemote, RemoteDataSource, SqliteStore, SyncController,
};
use userlist_sync_core::{LoadMode, PromptAction};

mod commands;
mod config;

use commands::{clear, load, show, status};
use config::{Config, CONFIG_FILE_NAME};

/// Offline-first user list.
#[derive(Parser, Debug)]
#[command(name = "userlist")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Data directory holding the config file and the local database
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Config file (default: <data-dir>/userlist.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Use an unreachable mock remote instead of HTTP (for testing/demo)
    #[arg(long, global = true)]
    mock: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Load the user list
    Load {
        /// Action to take if the result comes with a prompt
        #[arg(long, value_enum)]
        on_prompt: Option<Choice>,
    },

    /// Refresh the user list
    Refresh {
        /// Action to take if the result comes with a prompt
        #[arg(long, value_enum)]
        on_prompt: Option<Choice>,
    },

    /// Delete the saved list and load again
    ClearCache {
        /// Action to take if the result comes with a prompt
        #[arg(long, value_enum)]
        on_prompt: Option<Choice>,
    },

    /// Show what is saved locally
    Status,

    /// Show one user's details from the saved list
    Show {
        /// User id
        id: u64,
    },
}

/// Prompt action selectable from the command line.
#[derive(Clone, Copy, Debug, ValueEnum)]
enum Choice {
    Retry,
    Continue,
    Cancel,
    Acknowledge,
}

impl From<Choice> for PromptAction {
    fn from(choice: Choice) -> Self {
        match choice {
            Choice::Retry => PromptAction::Retry,
            Choice::Continue => PromptAction::Continue,
            Choice::Cancel => PromptAction::Cancel,
            Choice::Acknowledge => PromptAction::Acknowledge,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Determine data directory
    let data_dir = match cli.data_dir {
        Some(dir) => dir,
        None => default_data_dir()?,
    };

    // Ensure data directory exists
    tokio::fs::create_dir_all(&data_dir)
        .await
        .context("Failed to create data directory")?;

    let config_path = cli
        .config
        .unwrap_or_else(|| data_dir.join(CONFIG_FILE_NAME));
    let config = Config::load_or_default(&config_path)?;

    init_logging(&config.logging.log_filter);
    tracing::debug!(data_dir = %data_dir.display(), config = %config_path.display(), "starting");

    let database = config.database_path(&data_dir);
    let store = SqliteStore::new(&database)
        .await
        .with_context(|| format!("Failed to open database {}", database.display()))?;

    if cli.mock {
        let controller = SyncController::new(config.sync_config(), MockRemote::new(), store);
        execute(cli.command, &controller, &database).await
    } else {
        let remote = HttpRemote::new(&config.remote).context("Failed to build HTTP client")?;
        let controller = SyncController::new(config.sync_config(), remote, store);
        execute(cli.command, &controller, &database).await
    }
}

async fn execute<R, K>(
    command: Commands,
    controller: &SyncController<R, K>,
    database: &Path,
) -> Result<()>
where
    R: RemoteDataSource,
    K: KeyValueStore,
{
    match command {
        Commands::Load { on_prompt } => {
            load::run(controller, LoadMode::Initial, on_prompt.map(Into::into)).await?;
        }
        Commands::Refresh { on_prompt } => {
            load::run(controller, LoadMode::Refresh, on_prompt.map(Into::into)).await?;
        }
        Commands::ClearCache { on_prompt } => {
            clear::run(controller, on_prompt.map(Into::into)).await?;
        }
        Commands::Status => {
            status::run(controller.cache(), database).await?;
        }
        Commands::Show { id } => {
            show::run(controller.cache(), id).await?;
        }
    }

    Ok(())
}

/// Install the log subscriber. `RUST_LOG` wins over the configured filter.
fn init_logging(configured: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(configured))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Get the default data directory for userlist.
fn default_data_dir() -> Result<PathBuf> {
    let dirs = directories::ProjectDirs::from("io", "ydun", "userlist")
        .context("Could not determine home directory")?;
    Ok(dirs.data_dir().to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_commands() {
        let cli = Cli::try_parse_from(["userlist", "--mock", "load", "--on-prompt", "retry"])
            .unwrap();
        assert!(cli.mock);
        assert!(matches!(
            cli.command,
            Commands::Load {
                on_prompt: Some(Choice::Retry)
            }
        ));

        let cli = Cli::try_parse_from(["userlist", "show", "7", "--data-dir", "/tmp/u"]).unwrap();
        assert!(matches!(cli.command, Commands::Show { id: 7 }));
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/u")));

        let cli = Cli::try_parse_from(["userlist", "clear-cache"]).unwrap();
        assert!(matches!(cli.command, Commands::ClearCache { on_prompt: None }));
    }

    #[test]
    fn show_requires_numeric_id() {
        assert!(Cli::try_parse_from(["userlist", "show", "ana"]).is_err());
    }

    #[test]
    fn choice_maps_to_prompt_action() {
        assert_eq!(PromptAction::from(Choice::Retry), PromptAction::Retry);
        assert_eq!(PromptAction::from(Choice::Acknowledge), PromptAction::Acknowledge);
    }

    #[tokio::test]
    async fn execute_against_local_store() {
        let dir = tempfile::tempdir().unwrap();
        let database = dir.path().join("userlist.db");
        let store = SqliteStore::new(&database).await.unwrap();
        let controller =
            SyncController::new(Config::default().sync_config(), MockRemote::new(), store);

        execute(Commands::Load { on_prompt: None }, &controller, &database)
            .await
            .unwrap();
        execute(Commands::Status, &controller, &database)
            .await
            .unwrap();
        assert!(execute(Commands::Show { id: 1 }, &controller, &database)
            .await
            .is_err());
    }
}
