use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Self-update companion for the Updraft desktop application.
#[derive(Parser, Debug)]
#[command(name = "updraft", version, about)]
pub struct Cli {
    /// Settings file (defaults to the platform settings location)
    #[arg(long, global = true)]
    pub settings: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Query the release host and report whether an update is available
    Check,

    /// Show the latest published release and its assets
    Latest,

    /// Back up the current installation and hand off to the install strategy
    Install,
}
