//! Core self-update logic for Updraft.
//!
//! This crate carries the pieces of the update subsystem that are
//! independent of any release host or platform installer:
//! - The update coordinator: cached release, the one-shot install guard,
//!   and the check/install operations.
//! - The rollback archiver that backs up the running installation.
//! - The staging install strategy used when no platform installer is wired.
//! - The on-disk updater settings.

mod config;
mod coordinator;
mod rollback;
mod strategy;

/// Updater settings model with serde defaults.
pub use config::UpdateSettings;
/// Coordinator, its directory layout, and install outcomes.
pub use coordinator::{InstallLayout, InstallOutcome, UpdateCoordinator};
/// Rollback archiver operations.
pub use rollback::{ArchiveOp, archive};
/// Manifest-staging install strategy.
pub use strategy::StagedInstall;
