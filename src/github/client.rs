use anyhow::Result;
use async_trait::async_trait;
use log::debug;

use crate::http::HttpClient;

use super::repo::GitHubRepo;
use super::types::{Release, RepositorySummary, Stargazer};

pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// GitHub caps `per_page` at 100 for every list endpoint.
pub const MAX_PER_PAGE: usize = 100;

pub const STARGAZERS_PER_PAGE: usize = 100;

const STAR_MEDIA_TYPE: &str = "application/vnd.github.star+json";

/// Read-only access to the GitHub endpoints the dashboard needs.
///
/// Page indices are zero-based here; the one-based GitHub `page` parameter
/// is an implementation detail of [`GitHub`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GetReleases: Send + Sync {
    async fn get_repository(&self, repo: &GitHubRepo) -> Result<RepositorySummary>;
    async fn get_release_page(
        &self,
        repo: &GitHubRepo,
        page: usize,
        per_page: usize,
    ) -> Result<Vec<Release>>;
    async fn get_stargazer_page(&self, repo: &GitHubRepo, page: usize) -> Result<Vec<Stargazer>>;
}

pub struct GitHub {
    pub client: HttpClient,
    pub api_url: String,
}

impl GitHub {
    #[tracing::instrument(skip(client, api_url))]
    pub fn new(client: HttpClient, api_url: Option<String>) -> Self {
        let api_url = api_url
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        Self { client, api_url }
    }

    /// Base URL without a trailing slash.
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    fn repo_url(&self, repo: &GitHubRepo) -> String {
        format!("{}/repos/{}/{}", self.api_url, repo.owner, repo.repo)
    }
}

#[async_trait]
impl GetReleases for GitHub {
    #[tracing::instrument(skip(self))]
    async fn get_repository(&self, repo: &GitHubRepo) -> Result<RepositorySummary> {
        let url = self.repo_url(repo);
        debug!("Fetching repository summary from {}...", url);
        self.client.get_json(&url).await
    }

    #[tracing::instrument(skip(self))]
    async fn get_release_page(
        &self,
        repo: &GitHubRepo,
        page: usize,
        per_page: usize,
    ) -> Result<Vec<Release>> {
        let url = format!("{}/releases", self.repo_url(repo));
        let per_page = per_page.clamp(1, MAX_PER_PAGE).to_string();
        let github_page = (page + 1).to_string();

        debug!("Fetching releases page {} from {}...", page, url);

        let releases: Vec<Release> = self
            .client
            .get_json_with_query(&url, &[("per_page", &per_page), ("page", &github_page)])
            .await?;

        debug!("Releases page {} has {} entries", page, releases.len());
        Ok(releases)
    }

    #[tracing::instrument(skip(self))]
    async fn get_stargazer_page(&self, repo: &GitHubRepo, page: usize) -> Result<Vec<Stargazer>> {
        let url = format!("{}/stargazers", self.repo_url(repo));
        let per_page = STARGAZERS_PER_PAGE.to_string();
        let github_page = (page + 1).to_string();

        debug!("Fetching stargazers page {} from {}...", page, url);

        self.client
            .get_json_with_accept(
                &url,
                &[("per_page", &per_page), ("page", &github_page)],
                STAR_MEDIA_TYPE,
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::FetchError;
    use reqwest::Client;

    fn test_repo() -> GitHubRepo {
        GitHubRepo::new("test-owner", "test-repo")
    }

    fn github(url: &str) -> GitHub {
        GitHub::new(HttpClient::new(Client::new()), Some(url.to_string()))
    }

    #[test]
    fn test_new_defaults_api_url() {
        let github = GitHub::new(HttpClient::new(Client::new()), None);
        assert_eq!(github.api_url(), "https://api.github.com");
    }

    #[test]
    fn test_new_trims_trailing_slash() {
        let github = github("http://localhost:1234/");
        assert_eq!(github.api_url(), "http://localhost:1234");
    }

    #[tokio::test]
    async fn test_get_repository() {
        let mut server = mockito::Server::new_async().await;

        let mock = server
            .mock("GET", "/repos/test-owner/test-repo")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "name": "test-repo",
                    "full_name": "test-owner/test-repo",
                    "owner": {
                        "login": "test-owner",
                        "avatar_url": "https://avatars.example.com/u/1",
                        "html_url": "https://github.com/test-owner"
                    },
                    "html_url": "https://github.com/test-owner/test-repo",
                    "description": "A test repo",
                    "homepage": "https://example.com",
                    "license": { "key": "mit", "name": "MIT License", "spdx_id": "MIT" },
                    "stargazers_count": 1234,
                    "forks_count": 56,
                    "subscribers_count": 7,
                    "watchers_count": 1234
                }"#,
            )
            .create_async()
            .await;

        let summary = github(&server.url())
            .get_repository(&test_repo())
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(summary.full_name, "test-owner/test-repo");
        assert_eq!(summary.owner.login, "test-owner");
        assert_eq!(summary.description.as_deref(), Some("A test repo"));
        assert_eq!(summary.homepage(), Some("https://example.com"));
        assert_eq!(
            summary.license.and_then(|l| l.spdx_id).as_deref(),
            Some("MIT")
        );
        assert_eq!(summary.stargazers_count, 1234);
        assert_eq!(summary.forks_count, 56);
        assert_eq!(summary.subscribers_count, 7);
    }

    #[tokio::test]
    async fn test_get_repository_not_found() {
        let mut server = mockito::Server::new_async().await;

        let mock = server
            .mock("GET", "/repos/test-owner/test-repo")
            .with_status(404)
            .create_async()
            .await;

        let result = github(&server.url()).get_repository(&test_repo()).await;

        mock.assert_async().await;
        assert!(FetchError::from_error(&result.unwrap_err()).is_not_found());
    }

    #[tokio::test]
    async fn test_get_release_page_zero_maps_to_first_github_page() {
        let mut server = mockito::Server::new_async().await;

        let mock = server
            .mock(
                "GET",
                "/repos/test-owner/test-repo/releases?per_page=30&page=1",
            )
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"[
                    {
                        "id": 2,
                        "tag_name": "v1.0.0",
                        "draft": false,
                        "prerelease": false,
                        "published_at": "2024-03-01T10:00:00Z",
                        "assets": [
                            {"name": "app.tar.gz", "size": 10, "download_count": 5},
                            {"name": "app.zip", "size": 12, "download_count": 10}
                        ]
                    },
                    {
                        "id": 1,
                        "tag_name": "v0.9.0",
                        "draft": false,
                        "prerelease": true,
                        "published_at": "2024-02-01T10:00:00Z",
                        "assets": []
                    }
                ]"#,
            )
            .create_async()
            .await;

        let releases = github(&server.url())
            .get_release_page(&test_repo(), 0, 30)
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(releases.len(), 2);
        assert_eq!(releases[0].tag_name, "v1.0.0");
        assert_eq!(releases[0].download_count(), 15);
        assert!(releases[1].prerelease);
        assert!(!releases[0].latest);
    }

    #[tokio::test]
    async fn test_get_release_page_clamps_per_page() {
        let mut server = mockito::Server::new_async().await;

        let mock = server
            .mock(
                "GET",
                "/repos/test-owner/test-repo/releases?per_page=100&page=3",
            )
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("[]")
            .create_async()
            .await;

        let releases = github(&server.url())
            .get_release_page(&test_repo(), 2, 500)
            .await
            .unwrap();

        mock.assert_async().await;
        assert!(releases.is_empty());
    }

    #[tokio::test]
    async fn test_get_release_page_server_error() {
        let mut server = mockito::Server::new_async().await;

        let mock = server
            .mock(
                "GET",
                "/repos/test-owner/test-repo/releases?per_page=30&page=1",
            )
            .with_status(502)
            .create_async()
            .await;

        let result = github(&server.url())
            .get_release_page(&test_repo(), 0, 30)
            .await;

        mock.assert_async().await;
        assert!(matches!(
            FetchError::from_error(&result.unwrap_err()),
            FetchError::FetchFailed(_)
        ));
    }

    #[tokio::test]
    async fn test_get_stargazer_page() {
        let mut server = mockito::Server::new_async().await;

        let mock = server
            .mock(
                "GET",
                "/repos/test-owner/test-repo/stargazers?per_page=100&page=1",
            )
            .match_header("accept", "application/vnd.github.star+json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"[
                    {"starred_at": "2024-01-01T08:00:00Z", "user": {"login": "alice"}},
                    {"starred_at": "2024-01-03T09:30:00Z", "user": {"login": "bob"}}
                ]"#,
            )
            .create_async()
            .await;

        let stargazers = github(&server.url())
            .get_stargazer_page(&test_repo(), 0)
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(stargazers.len(), 2);
        assert_eq!(
            stargazers[1].user.as_ref().map(|u| u.login.as_str()),
            Some("bob")
        );
    }
}
