//! GitHub-backed implementation of the Updraft release source contract.

mod client;

pub use client::{GitHubAsset, GitHubRelease, GitHubReleases};
