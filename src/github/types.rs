use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Read-only snapshot of repository metadata
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct RepositorySummary {
    pub name: String,
    #[serde(default)]
    pub full_name: String,
    pub owner: Owner,
    #[serde(default)]
    pub html_url: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub homepage: Option<String>,
    #[serde(default)]
    pub license: Option<License>,
    #[serde(default)]
    pub stargazers_count: u64,
    #[serde(default)]
    pub forks_count: u64,
    /// Watchers in the GitHub UI sense; `watchers_count` is an alias of stars.
    #[serde(default)]
    pub subscribers_count: u64,
}

impl RepositorySummary {
    /// GitHub sends `""` for a cleared homepage.
    pub fn homepage(&self) -> Option<&str> {
        self.homepage.as_deref().filter(|h| !h.trim().is_empty())
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Owner {
    pub login: String,
    #[serde(default)]
    pub avatar_url: String,
    #[serde(default)]
    pub html_url: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct License {
    #[serde(default)]
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub spdx_id: Option<String>,
}

/// Represents a GitHub release asset
#[derive(Deserialize, Serialize, Debug, PartialEq, Clone, Default)]
pub struct ReleaseAsset {
    pub name: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub download_count: u64,
    #[serde(default)]
    pub browser_download_url: String,
}

/// Represents a GitHub release
#[derive(Deserialize, Serialize, Debug, PartialEq, Clone, Default)]
pub struct Release {
    pub id: u64,
    #[serde(default)]
    pub tag_name: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub html_url: String,
    #[serde(default)]
    pub draft: bool,
    #[serde(default)]
    pub prerelease: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Absent for drafts
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub assets: Vec<ReleaseAsset>,
    /// Derived by [`classify_latest`](crate::release::classify_latest), never read from the wire.
    #[serde(skip_deserializing, default)]
    pub latest: bool,
}

impl Release {
    /// Sum of `download_count` over all assets.
    pub fn download_count(&self) -> u64 {
        self.assets.iter().map(|a| a.download_count).sum()
    }

    /// Release title, falling back to the tag when the title is missing or blank.
    pub fn display_name(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => &self.tag_name,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct StargazerUser {
    pub login: String,
}

/// One entry of the stargazers list, as returned with the
/// `application/vnd.github.star+json` media type.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Stargazer {
    pub starred_at: DateTime<Utc>,
    /// `null` for deleted accounts
    #[serde(default)]
    pub user: Option<StargazerUser>,
}
