use async_trait::async_trait;
use std::path::Path;

use crate::error::UpdateError;
use crate::types::Release;

/// Query contract of a release-hosting service.
///
/// Implementations answer a single question: what is the most recently
/// published release for the configured organization/product pair.
#[async_trait]
pub trait ReleaseSource: Send + Sync {
    fn name(&self) -> &'static str;

    /// Fetch the latest published release.
    ///
    /// # Errors
    /// Returns an error when the service is unreachable, the response cannot
    /// be interpreted, no release has ever been published, or the release tag
    /// does not parse as a version.
    async fn latest_release(&self) -> Result<Release, UpdateError>;
}

/// Platform-specific installation procedure.
///
/// The coordinator backs up the running installation and then hands the
/// resolved release to a strategy. What "install" means (binary replacement,
/// privilege elevation, process restart) is entirely the strategy's business.
#[async_trait]
pub trait InstallStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    /// Replace the current installation with `release`.
    ///
    /// `download_dir` is a per-process scratch directory the strategy may use
    /// for downloaded artifacts; it exists for the lifetime of the
    /// coordinator.
    ///
    /// # Errors
    /// Returns an error when the platform-specific procedure fails; the
    /// coordinator does not retry.
    async fn install(&self, release: &Release, download_dir: &Path) -> Result<(), UpdateError>;
}
