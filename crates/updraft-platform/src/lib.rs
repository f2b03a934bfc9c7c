//! Platform path resolution for the Updraft self-update subsystem.

mod paths;

pub use paths::{InstallPaths, InstallPathsError};
