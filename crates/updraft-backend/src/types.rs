use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AppVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
    pub build: u32,
}

impl AppVersion {
    #[must_use]
    pub const fn new(major: u32, minor: u32, patch: u32, build: u32) -> Self {
        Self {
            major,
            minor,
            patch,
            build,
        }
    }
}

impl Ord for AppVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.major
            .cmp(&other.major)
            .then(self.minor.cmp(&other.minor))
            .then(self.patch.cmp(&other.patch))
            .then(self.build.cmp(&other.build))
    }
}

impl PartialOrd for AppVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for AppVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}.{}", self.major, self.minor, self.patch, self.build)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionComponent {
    Major,
    Minor,
    Patch,
    Build,
}

impl fmt::Display for VersionComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Major => write!(f, "major"),
            Self::Minor => write!(f, "minor"),
            Self::Patch => write!(f, "patch"),
            Self::Build => write!(f, "build"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VersionParseError {
    #[error("Expected X.Y, X.Y.Z or X.Y.Z.W format, got: {input}")]
    InvalidFormat { input: String },
    #[error("Invalid {component} version: {value}")]
    InvalidComponent {
        component: VersionComponent,
        value: String,
    },
}

impl FromStr for AppVersion {
    type Err = VersionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        // Release tags carry at most one non-numeric prefix character,
        // conventionally a leading `v`.
        let digits = match s.chars().next() {
            Some(prefix) if !prefix.is_ascii_digit() => &s[prefix.len_utf8()..],
            _ => s,
        };

        let parts: Vec<&str> = digits.split('.').collect();
        if parts.len() < 2 || parts.len() > 4 {
            return Err(VersionParseError::InvalidFormat {
                input: s.to_string(),
            });
        }

        const COMPONENTS: [VersionComponent; 4] = [
            VersionComponent::Major,
            VersionComponent::Minor,
            VersionComponent::Patch,
            VersionComponent::Build,
        ];

        let mut values = [0_u32; 4];
        for (index, part) in parts.iter().enumerate() {
            values[index] =
                part.parse()
                    .map_err(|_| VersionParseError::InvalidComponent {
                        component: COMPONENTS[index],
                        value: (*part).to_string(),
                    })?;
        }

        Ok(Self::new(values[0], values[1], values[2], values[3]))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseAsset {
    pub name: String,
    pub download_url: String,
    pub size: u64,
}

/// A published application release, as reported by a [`ReleaseSource`].
///
/// [`ReleaseSource`]: crate::ReleaseSource
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Release {
    pub tag: String,
    pub version: AppVersion,
    pub assets: Vec<ReleaseAsset>,
    pub notes: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
}

impl Release {
    /// Find an asset whose file name contains `fragment`.
    #[must_use]
    pub fn find_asset(&self, fragment: &str) -> Option<&ReleaseAsset> {
        self.assets.iter().find(|asset| asset.name.contains(fragment))
    }
}
