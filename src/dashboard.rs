//! Per-repository query cache driving the GitHub client.

use anyhow::Result;
use chrono::Utc;
use log::{debug, info, warn};

use crate::github::{
    GetReleases, GitHubRepo, Release, RepositorySummary, STARGAZERS_PER_PAGE, Stargazer,
};
use crate::http::FetchError;
use crate::release::{PageOutcome, ReleaseFeed};
use crate::stars::{MAX_STARGAZER_PAGES, StarHistory};

/// Cached state of a unary query.
#[derive(Debug, Clone, PartialEq)]
pub enum Query<T> {
    Idle,
    Loaded(T),
    Failed(FetchError),
}

impl<T> Query<T> {
    pub fn loaded(&self) -> Option<&T> {
        match self {
            Query::Loaded(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&FetchError> {
        match self {
            Query::Failed(error) => Some(error),
            _ => None,
        }
    }

    fn result(&self) -> Result<&T> {
        match self {
            Query::Loaded(value) => Ok(value),
            Query::Failed(error) => Err(error.clone().into()),
            Query::Idle => anyhow::bail!("query has not run"),
        }
    }
}

/// Everything cached for the repository currently on screen.
///
/// The cache holds exactly one repository key. [`open`](Self::open) with a
/// different key evicts all of it, so no data leaks between repositories.
pub struct Dashboard<G: GetReleases> {
    github: G,
    repository: Query<RepositorySummary>,
    releases: ReleaseFeed,
    stars: Query<StarHistory>,
}

impl<G: GetReleases> Dashboard<G> {
    pub fn new(github: G, repo: GitHubRepo, per_page: usize) -> Self {
        Self {
            github,
            repository: Query::Idle,
            releases: ReleaseFeed::new(repo, per_page),
            stars: Query::Idle,
        }
    }

    pub fn repo(&self) -> &GitHubRepo {
        self.releases.repo()
    }

    /// Switches to `repo`. Returns `true` if cached state was evicted.
    pub fn open(&mut self, repo: GitHubRepo) -> bool {
        if self.releases.repo() == &repo {
            debug!("{} already open, keeping cache", repo);
            return false;
        }
        info!("Switching dashboard from {} to {}", self.releases.repo(), repo);
        self.repository = Query::Idle;
        self.stars = Query::Idle;
        self.releases.reset(repo);
        true
    }

    /// Fetches the repository summary unless it is already cached.
    /// A failed attempt is not cached; calling again refetches.
    #[tracing::instrument(skip(self), fields(repo = %self.releases.repo()))]
    pub async fn load_repository(&mut self) -> Result<&RepositorySummary> {
        if self.repository.loaded().is_none() {
            let repo = self.releases.repo().clone();
            self.repository = match self.github.get_repository(&repo).await {
                Ok(summary) => Query::Loaded(summary),
                Err(e) => {
                    let error = FetchError::from_error(&e);
                    warn!("Failed to load repository {}: {}", repo, error);
                    Query::Failed(error)
                }
            };
        }
        self.repository.result()
    }

    /// Requests the next release page. Returns `None` when pagination has
    /// ended or a page is already being fetched.
    #[tracing::instrument(skip(self), fields(repo = %self.releases.repo()))]
    pub async fn load_next_releases(&mut self) -> Option<PageOutcome> {
        let ticket = self.releases.begin_next_page()?;
        let result = self
            .github
            .get_release_page(ticket.repo(), ticket.page(), ticket.per_page())
            .await;
        Some(self.releases.complete(ticket, result))
    }

    /// Loads pages until the end, a failure, or `max_pages` pages were
    /// requested by this call (`None` = no cap).
    #[tracing::instrument(skip(self), fields(repo = %self.releases.repo()))]
    pub async fn load_releases(&mut self, max_pages: Option<usize>) -> Result<()> {
        let mut requested = 0;
        while max_pages.is_none_or(|max| requested < max) {
            requested += 1;
            match self.load_next_releases().await {
                None | Some(PageOutcome::Exhausted { .. }) => break,
                Some(PageOutcome::Appended { .. }) => {}
                Some(PageOutcome::Failed(error)) => return Err(error.into()),
                Some(PageOutcome::Discarded) => break,
            }
        }
        debug!(
            "{} releases loaded across {} pages, more: {}",
            self.releases.releases().len(),
            self.releases.pages_loaded(),
            self.releases.has_next_page()
        );
        Ok(())
    }

    /// Fetches up to `max_pages` stargazer pages and builds the star history.
    /// Needs the repository summary for the total star count.
    #[tracing::instrument(skip(self), fields(repo = %self.releases.repo()))]
    pub async fn load_star_history(&mut self, max_pages: usize) -> Result<&StarHistory> {
        if self.stars.loaded().is_none() {
            let total_stars = self.load_repository().await?.stargazers_count;
            let repo = self.releases.repo().clone();
            let max_pages = max_pages.min(MAX_STARGAZER_PAGES);

            self.stars = match fetch_stargazers(&self.github, &repo, max_pages).await {
                Ok(stargazers) => Query::Loaded(StarHistory::from_stargazers(
                    &stargazers,
                    total_stars,
                    Utc::now().date_naive(),
                )),
                Err(e) => {
                    let error = FetchError::from_error(&e);
                    warn!("Failed to load stargazers of {}: {}", repo, error);
                    Query::Failed(error)
                }
            };
        }
        self.stars.result()
    }

    pub fn repository(&self) -> &Query<RepositorySummary> {
        &self.repository
    }

    pub fn feed(&self) -> &ReleaseFeed {
        &self.releases
    }

    /// Accumulated releases with `latest` flags set.
    pub fn releases(&self) -> &[Release] {
        self.releases.releases()
    }

    pub fn star_history(&self) -> &Query<StarHistory> {
        &self.stars
    }
}

async fn fetch_stargazers<G: GetReleases>(
    github: &G,
    repo: &GitHubRepo,
    max_pages: usize,
) -> Result<Vec<Stargazer>> {
    let mut stargazers = Vec::new();
    for page in 0..max_pages {
        let batch = github.get_stargazer_page(repo, page).await?;
        let len = batch.len();
        stargazers.extend(batch);
        if len < STARGAZERS_PER_PAGE {
            break;
        }
    }
    debug!("Fetched {} stargazers of {}", stargazers.len(), repo);
    Ok(stargazers)
}
