use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use log::{debug, info};
use tempfile::TempDir;
use tokio::sync::Mutex;

use updraft_backend::{AppVersion, InstallStrategy, Release, ReleaseSource, UpdateError};

use crate::rollback::{self, ArchiveOp};

/// Directories the coordinator backs up before an install.
#[derive(Debug, Clone)]
pub struct InstallLayout {
    /// Where the running binaries live; vacated into the rollback tree.
    pub binary_dir: PathBuf,
    /// Where application data lives; copied into the rollback tree.
    pub appdata_dir: PathBuf,
    /// Root under which version-named rollback directories are created.
    pub rollback_dir: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallOutcome {
    /// The backup was taken and the install strategy completed.
    Installed,
    /// The cached release is not newer than the running version.
    UpToDate,
    /// Another caller already won the install guard; nothing was done.
    AlreadyInProgress,
}

/// Orchestrates update checks and the one-shot install sequence.
///
/// One coordinator is constructed per process. It owns the cached latest
/// release, the install guard, and the scratch download directory; the
/// release source and install strategy are injected capabilities.
pub struct UpdateCoordinator {
    source: Box<dyn ReleaseSource>,
    strategy: Box<dyn InstallStrategy>,
    current_version: AppVersion,
    layout: InstallLayout,
    cached: Mutex<Option<Release>>,
    install_started: AtomicBool,
    download_dir: TempDir,
}

impl UpdateCoordinator {
    /// Build a coordinator, creating the rollback root and the per-process
    /// scratch download directory eagerly.
    ///
    /// `current_version` defaults to the version this crate was built as.
    ///
    /// # Errors
    /// Returns an error when a directory cannot be created or the built-in
    /// version string does not parse.
    pub fn new(
        source: Box<dyn ReleaseSource>,
        strategy: Box<dyn InstallStrategy>,
        current_version: Option<AppVersion>,
        layout: InstallLayout,
    ) -> Result<Self, UpdateError> {
        let current_version = match current_version {
            Some(version) => version,
            None => env!("CARGO_PKG_VERSION").parse()?,
        };

        std::fs::create_dir_all(&layout.rollback_dir)?;
        let download_dir = tempfile::Builder::new()
            .prefix("updraft-download-")
            .tempdir()?;

        debug!(
            "Update coordinator ready: current version {current_version}, scratch dir {}",
            download_dir.path().display()
        );

        Ok(Self {
            source,
            strategy,
            current_version,
            layout,
            cached: Mutex::new(None),
            install_started: AtomicBool::new(false),
            download_dir,
        })
    }

    #[must_use]
    pub fn current_version(&self) -> AppVersion {
        self.current_version
    }

    /// Scratch directory install strategies may download into. Lives until
    /// the coordinator is dropped.
    #[must_use]
    pub fn download_dir(&self) -> &Path {
        self.download_dir.path()
    }

    /// Report whether a release newer than the running version is published.
    ///
    /// The release source is only queried when `forced` is set or nothing is
    /// cached yet; otherwise the cached release is authoritative. Once an
    /// install has begun the answer is pinned to `false` for the remainder
    /// of the process lifetime.
    ///
    /// # Errors
    /// Surfaces release-source failures; the cache is left unchanged by a
    /// failed query.
    pub async fn check_for_updates(&self, forced: bool) -> Result<bool, UpdateError> {
        if self.install_started.load(Ordering::SeqCst) {
            return Ok(false);
        }
        Ok(self.newer_release(forced).await?.is_some())
    }

    /// The cached latest release, checking the source first if nothing has
    /// been cached yet.
    ///
    /// # Errors
    /// Surfaces release-source failures from the initial check.
    pub async fn release(&self) -> Result<Option<Release>, UpdateError> {
        {
            let cached = self.cached.lock().await;
            if cached.is_some() {
                return Ok(cached.clone());
            }
        }

        self.check_for_updates(true).await?;
        Ok(self.cached.lock().await.clone())
    }

    /// Back up the current installation and hand the cached release to the
    /// install strategy.
    ///
    /// At most one caller ever executes the backup-then-install sequence;
    /// everyone else gets [`InstallOutcome::AlreadyInProgress`]. The guard is
    /// consumed even when the sequence fails, so a failed install disables
    /// further attempts for this process.
    ///
    /// # Errors
    /// Propagates filesystem errors from the backup and any error from the
    /// install strategy.
    pub async fn install_update(&self) -> Result<InstallOutcome, UpdateError> {
        if self
            .install_started
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            debug!("Install already in progress, ignoring request");
            return Ok(InstallOutcome::AlreadyInProgress);
        }

        // Winning the guard only proves exclusivity. Re-verify against the
        // cache that an update is actually still pending.
        let Some(release) = self.newer_release(false).await? else {
            info!("No update pending, nothing to install");
            return Ok(InstallOutcome::UpToDate);
        };

        self.setup_rollback()?;

        info!(
            "Installing {} via {} strategy",
            release.tag,
            self.strategy.name()
        );
        self.strategy
            .install(&release, self.download_dir.path())
            .await?;

        Ok(InstallOutcome::Installed)
    }

    async fn newer_release(&self, forced: bool) -> Result<Option<Release>, UpdateError> {
        let mut cached = self.cached.lock().await;

        if forced || cached.is_none() {
            let release = self.source.latest_release().await?;
            debug!(
                "Latest release on {} is {} (running {})",
                self.source.name(),
                release.tag,
                self.current_version
            );
            *cached = Some(release);
        }

        Ok(cached
            .as_ref()
            .filter(|release| release.version > self.current_version)
            .cloned())
    }

    fn setup_rollback(&self) -> Result<(), UpdateError> {
        let version_dir = self
            .layout
            .rollback_dir
            .join(format!("{}-old", self.current_version));

        info!(
            "Backing up version {} to {}",
            self.current_version,
            version_dir.display()
        );

        rollback::archive(
            &self.layout.binary_dir,
            &self.layout.rollback_dir,
            &version_dir,
            "bin",
            ArchiveOp::Move,
        )?;
        rollback::archive(
            &self.layout.appdata_dir,
            &self.layout.rollback_dir,
            &version_dir,
            "appdata",
            ArchiveOp::Copy,
        )?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use updraft_backend::{
        AppVersion, InstallStrategy, Release, ReleaseSource, UpdateError,
    };

    use super::{InstallLayout, InstallOutcome, UpdateCoordinator};

    struct ScriptedSource {
        tag: &'static str,
        fail: bool,
        queries: Arc<AtomicUsize>,
    }

    impl ScriptedSource {
        fn new(tag: &'static str) -> Self {
            Self {
                tag,
                fail: false,
                queries: Arc::new(AtomicUsize::new(0)),
            }
        }

        fn failing() -> Self {
            Self {
                tag: "v0.0",
                fail: true,
                queries: Arc::new(AtomicUsize::new(0)),
            }
        }

        fn query_counter(&self) -> Arc<AtomicUsize> {
            Arc::clone(&self.queries)
        }
    }

    #[async_trait]
    impl ReleaseSource for ScriptedSource {
        fn name(&self) -> &'static str {
            "scripted"
        }

        async fn latest_release(&self) -> Result<Release, UpdateError> {
            self.queries.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(UpdateError::network_request("latest release query", "down"));
            }
            Ok(Release {
                tag: self.tag.to_string(),
                version: self.tag.parse().expect("valid tag in test"),
                assets: Vec::new(),
                notes: None,
                published_at: None,
            })
        }
    }

    struct NoopStrategy;

    #[async_trait]
    impl InstallStrategy for NoopStrategy {
        fn name(&self) -> &'static str {
            "noop"
        }

        async fn install(
            &self,
            _release: &Release,
            _download_dir: &Path,
        ) -> Result<(), UpdateError> {
            Ok(())
        }
    }

    fn layout(root: &Path) -> InstallLayout {
        let layout = InstallLayout {
            binary_dir: root.join("bin"),
            appdata_dir: root.join("appdata"),
            rollback_dir: root.join("appdata").join("rollback"),
        };
        std::fs::create_dir_all(&layout.binary_dir).expect("binary dir should be creatable");
        std::fs::create_dir_all(&layout.appdata_dir).expect("appdata dir should be creatable");
        layout
    }

    fn coordinator(source: ScriptedSource, current: &str, root: &Path) -> UpdateCoordinator {
        UpdateCoordinator::new(
            Box::new(source),
            Box::new(NoopStrategy),
            Some(current.parse::<AppVersion>().expect("valid version in test")),
            layout(root),
        )
        .expect("coordinator should construct")
    }

    #[tokio::test]
    async fn newer_release_reports_update_available() {
        let temp = tempfile::tempdir().expect("tempdir should be created");
        let coordinator = coordinator(ScriptedSource::new("v1.3.0.0"), "1.2.0.0", temp.path());

        assert!(
            coordinator
                .check_for_updates(true)
                .await
                .expect("check should succeed")
        );
    }

    #[tokio::test]
    async fn equal_release_reports_no_update() {
        let temp = tempfile::tempdir().expect("tempdir should be created");
        let coordinator = coordinator(ScriptedSource::new("v1.3.0.0"), "1.3.0.0", temp.path());

        assert!(
            !coordinator
                .check_for_updates(true)
                .await
                .expect("check should succeed")
        );
    }

    #[tokio::test]
    async fn unforced_check_reuses_cached_release() {
        let temp = tempfile::tempdir().expect("tempdir should be created");
        let source = ScriptedSource::new("v2.0.0.0");
        let queries = source.query_counter();
        let coordinator = coordinator(source, "1.0.0.0", temp.path());

        assert!(coordinator.check_for_updates(true).await.unwrap());
        assert!(coordinator.check_for_updates(false).await.unwrap());
        assert!(coordinator.check_for_updates(false).await.unwrap());
        assert_eq!(queries.load(Ordering::SeqCst), 1);

        let release = coordinator
            .release()
            .await
            .expect("release should be cached")
            .expect("a release should be present");
        assert_eq!(release.tag, "v2.0.0.0");
        assert_eq!(queries.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn forced_check_queries_again() {
        let temp = tempfile::tempdir().expect("tempdir should be created");
        let source = ScriptedSource::new("v2.0.0.0");
        let queries = source.query_counter();
        let coordinator = coordinator(source, "1.0.0.0", temp.path());

        assert!(coordinator.check_for_updates(true).await.unwrap());
        assert!(coordinator.check_for_updates(true).await.unwrap());
        assert_eq!(queries.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn failed_query_surfaces_error_and_keeps_cache_empty() {
        let temp = tempfile::tempdir().expect("tempdir should be created");
        let coordinator = coordinator(ScriptedSource::failing(), "1.0.0.0", temp.path());

        let error = coordinator
            .check_for_updates(true)
            .await
            .expect_err("failing source should surface an error");
        assert!(matches!(error, UpdateError::Network { .. }));

        // release() retries the check and fails again rather than serving a
        // release that was never fetched.
        assert!(coordinator.release().await.is_err());
    }

    #[tokio::test]
    async fn install_reverifies_and_skips_when_up_to_date() {
        let temp = tempfile::tempdir().expect("tempdir should be created");
        let coordinator = coordinator(ScriptedSource::new("v1.0.0.0"), "1.0.0.0", temp.path());

        let outcome = coordinator
            .install_update()
            .await
            .expect("install should not error");
        assert_eq!(outcome, InstallOutcome::UpToDate);

        // The guard is consumed even though nothing was installed.
        assert!(!coordinator.check_for_updates(true).await.unwrap());
        let outcome = coordinator.install_update().await.unwrap();
        assert_eq!(outcome, InstallOutcome::AlreadyInProgress);
    }

    #[tokio::test]
    async fn checks_are_suppressed_after_install_begins() {
        let temp = tempfile::tempdir().expect("tempdir should be created");
        let coordinator = coordinator(ScriptedSource::new("v3.0.0.0"), "1.0.0.0", temp.path());

        assert!(coordinator.check_for_updates(true).await.unwrap());
        let outcome = coordinator.install_update().await.unwrap();
        assert_eq!(outcome, InstallOutcome::Installed);

        assert!(!coordinator.check_for_updates(true).await.unwrap());
        assert!(!coordinator.check_for_updates(false).await.unwrap());
    }

    #[tokio::test]
    async fn install_creates_version_named_rollback_directory() {
        let temp = tempfile::tempdir().expect("tempdir should be created");
        let layout = layout(temp.path());
        std::fs::write(layout.binary_dir.join("app"), b"binary")
            .expect("binary fixture should be written");
        std::fs::write(layout.appdata_dir.join("settings.json"), b"{}")
            .expect("appdata fixture should be written");

        let coordinator = UpdateCoordinator::new(
            Box::new(ScriptedSource::new("v1.3.0.0")),
            Box::new(NoopStrategy),
            Some(AppVersion::new(1, 2, 0, 0)),
            layout.clone(),
        )
        .expect("coordinator should construct");

        let outcome = coordinator.install_update().await.unwrap();
        assert_eq!(outcome, InstallOutcome::Installed);

        let version_dir = layout.rollback_dir.join("1.2.0.0-old");
        assert_eq!(
            std::fs::read(version_dir.join("bin/app")).expect("binary should be archived"),
            b"binary"
        );
        assert_eq!(
            std::fs::read(version_dir.join("appdata/settings.json"))
                .expect("appdata should be archived"),
            b"{}"
        );
        // Binaries are vacated, application data stays in place.
        assert!(!layout.binary_dir.join("app").exists());
        assert!(layout.appdata_dir.join("settings.json").exists());
    }

    #[tokio::test]
    async fn scratch_download_dir_exists_from_construction() {
        let temp = tempfile::tempdir().expect("tempdir should be created");
        let coordinator = coordinator(ScriptedSource::new("v1.0.0.0"), "1.0.0.0", temp.path());

        assert!(coordinator.download_dir().is_dir());
    }
}
