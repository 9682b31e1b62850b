//! album-share CLI entrypoint.
//!
//! This is the main entrypoint for the album-share command-line tool.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use album_share::cli::{Cli, Commands, OutputFormatter, RemoteArgs};
use album_share::config::{load_dotenv, ClientConfig};
use album_share::error::Result;
use album_share::exporter::StateExporter;
use album_share::reconciler::Reconciler;
use album_share::remote::AlbumClient;
use album_share::table::{default_output_path, read_desired_states, write_export};

use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

/// Main entrypoint.
fn main() -> ExitCode {
    // Connection flags may come from .env, so it must be loaded before parsing
    if let Err(e) = load_dotenv(".") {
        eprintln!("Error: {e}");
        return ExitCode::FAILURE;
    }

    let cli = Cli::parse_args();

    // Initialize logging
    init_logging(cli.verbose);

    // Run async runtime
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to create async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Initializes the logging system.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Main async entry point.
async fn run(cli: Cli) -> Result<()> {
    let formatter = OutputFormatter::new(cli.format);

    match cli.command {
        Commands::ListAll { remote, output } => cmd_list_all(&remote, output, &formatter).await,
        Commands::ShareAlbums {
            remote,
            input,
            dry_run,
        } => cmd_share_albums(&remote, &input, dry_run, &formatter).await,
    }
}

/// Builds the API client from connection flags.
fn connect(remote: &RemoteArgs) -> Result<AlbumClient> {
    let config = ClientConfig::new(&remote.url, &remote.api_key)?.with_timeout(remote.timeout);
    debug!("Using photo service at {}", config.base_url);
    AlbumClient::new(&config)
}

/// Export every album to a table.
async fn cmd_list_all(
    remote: &RemoteArgs,
    output: Option<PathBuf>,
    formatter: &OutputFormatter,
) -> Result<()> {
    let client = connect(remote)?;

    let report = StateExporter::new(&client).export().await?;
    if report.albums == 0 {
        info!("No albums found");
    }

    let path = output.unwrap_or_else(|| default_output_path(chrono::Local::now()));
    write_export(&path, &report.rows)?;

    eprintln!("{}", formatter.format_export(&report, &path));
    Ok(())
}

/// Apply the sharing permissions listed in a table.
async fn cmd_share_albums(
    remote: &RemoteArgs,
    input: &Path,
    dry_run: bool,
    formatter: &OutputFormatter,
) -> Result<()> {
    // The table is validated before any network call
    let desired = read_desired_states(input)?;
    if desired.is_empty() {
        warn!("No albums listed in {}", input.display());
    }

    let client = connect(remote)?;

    info!("Fetching user email to ID mapping...");
    client.load_user_directory().await?;

    let summary = Reconciler::new(&client)
        .with_dry_run(dry_run)
        .reconcile(&desired)
        .await?;

    if dry_run {
        eprintln!("Dry run: no changes were applied.");
    }
    eprintln!("{}", formatter.format_summary(&summary));
    Ok(())
}
