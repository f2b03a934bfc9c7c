//! Updraft - self-update companion CLI.
//!
//! Thin front-end over the update subsystem: checks the release host,
//! prints release details, and drives the backup-then-install sequence.

use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use log::debug;

use updraft_backend::{AppVersion, UpdateError};
use updraft_core::{InstallLayout, InstallOutcome, StagedInstall, UpdateCoordinator, UpdateSettings};
use updraft_github::GitHubReleases;
use updraft_platform::{InstallPaths, InstallPathsError};

mod cli;
mod logging;

use cli::{Cli, Commands};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Update(#[from] UpdateError),
    #[error(transparent)]
    Paths(#[from] InstallPathsError),
    #[error("Could not build HTTP client: {0}")]
    HttpClient(String),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let paths = InstallPaths::new().ok();
    let settings_path = cli
        .settings
        .clone()
        .or_else(|| paths.as_ref().map(InstallPaths::settings_file));
    let settings = settings_path
        .as_deref()
        .map(UpdateSettings::load)
        .unwrap_or_default();

    logging::init(
        paths.as_ref().map(InstallPaths::log_file).as_deref(),
        cli.verbose || settings.debug_logging,
    );

    match run(cli.command, &settings, paths).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("Error: {error}");
            ExitCode::FAILURE
        }
    }
}

async fn run(
    command: Commands,
    settings: &UpdateSettings,
    paths: Option<InstallPaths>,
) -> Result<(), CliError> {
    let coordinator = build_coordinator(settings, paths)?;

    match command {
        Commands::Check => {
            if coordinator.check_for_updates(true).await? {
                let release = coordinator.release().await?;
                let tag = release.map_or_else(String::new, |release| release.tag);
                println!(
                    "Update available: {tag} (running {})",
                    coordinator.current_version()
                );
            } else {
                println!("Up to date ({})", coordinator.current_version());
            }
        }
        Commands::Latest => {
            let Some(release) = coordinator.release().await? else {
                println!("No release information available");
                return Ok(());
            };
            println!("{} ({})", release.tag, release.version);
            if let Some(published_at) = release.published_at {
                println!("Published: {published_at}");
            }
            for asset in &release.assets {
                println!("  {} ({} bytes)", asset.name, asset.size);
            }
            if let Some(notes) = release.notes.filter(|notes| !notes.is_empty()) {
                println!("\n{notes}");
            }
        }
        Commands::Install => match coordinator.install_update().await? {
            InstallOutcome::Installed => {
                println!(
                    "Previous installation backed up; release staged in {}",
                    coordinator.download_dir().display()
                );
            }
            InstallOutcome::UpToDate => {
                println!("Already up to date ({})", coordinator.current_version());
            }
            InstallOutcome::AlreadyInProgress => {
                println!("An install is already in progress");
            }
        },
    }

    Ok(())
}

fn build_coordinator(
    settings: &UpdateSettings,
    paths: Option<InstallPaths>,
) -> Result<UpdateCoordinator, CliError> {
    let layout = resolve_layout(settings, paths)?;
    debug!(
        "Using binary dir {}, appdata dir {}, rollback dir {}",
        layout.binary_dir.display(),
        layout.appdata_dir.display(),
        layout.rollback_dir.display()
    );

    let current_version = settings
        .current_version
        .as_deref()
        .map(str::parse::<AppVersion>)
        .transpose()
        .map_err(UpdateError::from)?;

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(settings.http_timeout_secs))
        .build()
        .map_err(|error| CliError::HttpClient(error.to_string()))?;
    let source = GitHubReleases::with_client(
        settings.repository_owner.clone(),
        settings.repository_name.clone(),
        client,
    );

    Ok(UpdateCoordinator::new(
        Box::new(source),
        Box::new(StagedInstall),
        current_version,
        layout,
    )?)
}

fn resolve_layout(
    settings: &UpdateSettings,
    paths: Option<InstallPaths>,
) -> Result<InstallLayout, CliError> {
    // Every directory can be overridden in settings; anything left out
    // falls back to the platform defaults.
    if let (Some(binary_dir), Some(appdata_dir), Some(rollback_dir)) = (
        settings.binary_dir.clone(),
        settings.appdata_dir.clone(),
        settings.rollback_dir.clone(),
    ) {
        return Ok(InstallLayout {
            binary_dir,
            appdata_dir,
            rollback_dir,
        });
    }

    let paths = match paths {
        Some(paths) => paths,
        None => InstallPaths::new()?,
    };
    paths.ensure_dirs().map_err(UpdateError::from)?;

    Ok(InstallLayout {
        binary_dir: settings.binary_dir.clone().unwrap_or(paths.binary_dir),
        appdata_dir: settings.appdata_dir.clone().unwrap_or(paths.appdata_dir),
        rollback_dir: settings.rollback_dir.clone().unwrap_or(paths.rollback_dir),
    })
}
