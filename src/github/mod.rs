//! GitHub REST API access: repository key, payload types, and the client.

mod client;
mod repo;
mod types;

#[cfg(test)]
pub use client::MockGetReleases;
pub use client::{
    DEFAULT_API_URL, GetReleases, GitHub, MAX_PER_PAGE, STARGAZERS_PER_PAGE,
};
pub use repo::GitHubRepo;
pub use types::{License, Owner, Release, ReleaseAsset, RepositorySummary, Stargazer, StargazerUser};
