use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InstallPathsError {
    #[error("Could not determine executable directory")]
    ExeDirUnavailable,
    #[error("Could not determine home directory")]
    HomeDirUnavailable,
    #[error("Could not determine data directory")]
    DataDirUnavailable,
}

/// Directories an installation of the application occupies.
///
/// The rollback directory lives inside the application-data directory, so
/// backup operations over `appdata_dir` must skip it explicitly.
pub struct InstallPaths {
    pub binary_dir: PathBuf,
    pub appdata_dir: PathBuf,
    pub rollback_dir: PathBuf,
}

impl InstallPaths {
    /// Resolve installation paths for the current platform.
    ///
    /// # Errors
    /// Returns an error when the running executable's directory or the
    /// platform data directory cannot be determined.
    pub fn new() -> Result<Self, InstallPathsError> {
        let exe = std::env::current_exe().map_err(|_| InstallPathsError::ExeDirUnavailable)?;
        let binary_dir = exe
            .parent()
            .ok_or(InstallPathsError::ExeDirUnavailable)?
            .to_path_buf();

        #[cfg(target_os = "macos")]
        let appdata_dir = dirs::home_dir()
            .ok_or(InstallPathsError::HomeDirUnavailable)?
            .join("Library/Application Support/updraft");

        #[cfg(not(target_os = "macos"))]
        let appdata_dir = dirs::data_dir()
            .ok_or(InstallPathsError::DataDirUnavailable)?
            .join("updraft");

        let rollback_dir = appdata_dir.join("rollback");

        Ok(Self {
            binary_dir,
            appdata_dir,
            rollback_dir,
        })
    }

    #[must_use]
    pub fn settings_file(&self) -> PathBuf {
        self.appdata_dir.join("updater.json")
    }

    #[must_use]
    pub fn log_file(&self) -> PathBuf {
        self.appdata_dir.join("updater.log")
    }

    /// Ensure the application-data and rollback directories exist on disk.
    ///
    /// # Errors
    /// Returns an error if a directory cannot be created.
    pub fn ensure_dirs(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.appdata_dir)?;
        std::fs::create_dir_all(&self.rollback_dir)?;
        Ok(())
    }
}
