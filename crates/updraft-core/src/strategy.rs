use async_trait::async_trait;
use log::info;
use serde::Serialize;
use std::path::Path;

use updraft_backend::{InstallStrategy, Release, UpdateError};

/// Fallback strategy for front-ends that have not wired a platform
/// installer: records the resolved release as a manifest in the scratch
/// download directory so an external installer can pick it up.
pub struct StagedInstall;

#[derive(Debug, Serialize)]
struct StagedManifest<'a> {
    tag: &'a str,
    version: String,
    assets: Vec<StagedAsset<'a>>,
}

#[derive(Debug, Serialize)]
struct StagedAsset<'a> {
    name: &'a str,
    download_url: &'a str,
    size: u64,
}

impl StagedInstall {
    const MANIFEST_NAME: &'static str = "staged-release.json";

    #[must_use]
    pub fn manifest_path(download_dir: &Path) -> std::path::PathBuf {
        download_dir.join(Self::MANIFEST_NAME)
    }
}

#[async_trait]
impl InstallStrategy for StagedInstall {
    fn name(&self) -> &'static str {
        "staged"
    }

    async fn install(&self, release: &Release, download_dir: &Path) -> Result<(), UpdateError> {
        let manifest = StagedManifest {
            tag: &release.tag,
            version: release.version.to_string(),
            assets: release
                .assets
                .iter()
                .map(|asset| StagedAsset {
                    name: &asset.name,
                    download_url: &asset.download_url,
                    size: asset.size,
                })
                .collect(),
        };

        let contents = serde_json::to_vec_pretty(&manifest)
            .map_err(|error| UpdateError::install_failed("staging", error.to_string()))?;
        let path = Self::manifest_path(download_dir);
        tokio::fs::write(&path, contents).await?;

        info!(
            "Staged release {} for installation at {}",
            release.tag,
            path.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use updraft_backend::{AppVersion, InstallStrategy, Release, ReleaseAsset};

    use super::StagedInstall;

    #[tokio::test]
    async fn staging_writes_manifest_with_assets() {
        let temp = tempfile::tempdir().expect("tempdir should be created");
        let release = Release {
            tag: "v1.4.0.0".to_string(),
            version: AppVersion::new(1, 4, 0, 0),
            assets: vec![ReleaseAsset {
                name: "updraft-1.4.0.0-linux-x64.tar.gz".to_string(),
                download_url: "https://example.invalid/download".to_string(),
                size: 512,
            }],
            notes: None,
            published_at: None,
        };

        StagedInstall
            .install(&release, temp.path())
            .await
            .expect("staging should succeed");

        let manifest = std::fs::read_to_string(StagedInstall::manifest_path(temp.path()))
            .expect("manifest should be written");
        let parsed: serde_json::Value =
            serde_json::from_str(&manifest).expect("manifest should be valid json");

        assert_eq!(parsed["tag"], "v1.4.0.0");
        assert_eq!(parsed["version"], "1.4.0.0");
        assert_eq!(parsed["assets"][0]["size"], 512);
    }
}
