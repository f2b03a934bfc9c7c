//! Shared contracts and types for the Updraft self-update subsystem.
//!
//! This crate defines the pieces every other Updraft crate agrees on:
//! - The application version model and its parsing/ordering rules.
//! - The release record produced by release-hosting services.
//! - The `ReleaseSource` and `InstallStrategy` capability traits.
//! - The error taxonomy surfaced by update operations.

mod error;
mod traits;
mod types;

pub use error::{NetworkStage, UpdateError};
pub use traits::{InstallStrategy, ReleaseSource};
pub use types::{AppVersion, Release, ReleaseAsset, VersionComponent, VersionParseError};
