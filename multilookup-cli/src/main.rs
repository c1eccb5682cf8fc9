//! multilookup command-line driver
//!
//! Opens a lookup session for one host record against a Web API endpoint and
//! runs a single command on it.
//!
//! Usage:
//!   multilookup --config multilookup.toml search "acme"
//!   multilookup apply "Acme Corp" "Globex"

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use multilookup_cli::output::{render_options, render_report, render_selection};
use multilookup_cli::{AppConfig, DEFAULT_CONFIG_FILE};
use multilookup_engine::LookupSession;
use multilookup_store::{RemoteStoreClient, WebApiClient};
use multilookup_types::RecordId;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "multilookup")]
#[command(about = "Search and edit a many-to-many relationship of one record")]
struct Args {
    /// Path to the TOML config file
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Bearer token; overrides the config file
    #[arg(long, env = "MULTILOOKUP_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the options shown before typing
    Initial,
    /// Search the target collection
    Search { query: String },
    /// Show the linked records
    Selection,
    /// Make the linked records exactly the given ones
    Apply {
        values: Vec<String>,
        /// Treat values as record ids instead of display values
        #[arg(long)]
        ids: bool,
    },
    /// Unlink one record by display value
    Remove { value: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let default_level = if args.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();

    let config = AppConfig::load(&args.config)?.with_token(args.token);
    debug!("Loaded config from {}", args.config.display());

    let client: Arc<dyn RemoteStoreClient> = Arc::new(
        WebApiClient::new(config.store.clone()).context("Failed to create Web API client")?,
    );
    let settings = config.lookup.to_settings();
    let mut session = LookupSession::open(client, settings)
        .await
        .context("Failed to open lookup session")?;
    if session.metadata().is_none() {
        bail!(
            "Metadata for {} is unavailable; check the target entity and credentials",
            config.lookup.target_entity
        );
    }

    info!("Session open for {}", session.settings().host);
    session.load_initial().await;

    match args.command {
        Command::Initial => print!("{}", render_options(&session)),
        Command::Search { query } => {
            session.on_input(&query).await;
            session.settle().await;
            print!("{}", render_options(&session));
        }
        Command::Selection => print!("{}", render_selection(&session.selection().await)),
        Command::Apply { values, ids } => {
            let report = if ids {
                let ids: Vec<RecordId> = values
                    .iter()
                    .map(|v| RecordId::parse(v))
                    .collect::<Result<_, _>>()
                    .context("Invalid record id")?;
                session.apply_selection_ids(&ids).await
            } else {
                session.apply_selection(&values).await
            };
            print!("{}", render_report(&report));
            print!("{}", render_selection(&session.selection().await));
        }
        Command::Remove { value } => {
            let report = session.remove(&value).await;
            print!("{}", render_report(&report));
            print!("{}", render_selection(&session.selection().await));
        }
    }

    Ok(())
}
