//! Incremental, page-by-page accumulation of a repository's releases.

use anyhow::Result;
use log::{debug, warn};

use crate::github::{GitHubRepo, MAX_PER_PAGE, Release};
use crate::http::FetchError;

use super::classify::{classify_latest, latest_release};

/// GitHub's own default page size for the releases endpoint.
pub const DEFAULT_PER_PAGE: usize = 30;

/// Permission to fetch one page, issued by [`ReleaseFeed::begin_next_page`].
///
/// A ticket remembers which feed generation and repository it was issued for,
/// so a response that arrives after [`ReleaseFeed::reset`] is recognised as
/// stale and dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageTicket {
    repo: GitHubRepo,
    page: usize,
    per_page: usize,
    generation: u64,
}

impl PageTicket {
    /// Zero-based page index.
    pub fn page(&self) -> usize {
        self.page
    }

    pub fn per_page(&self) -> usize {
        self.per_page
    }

    pub fn repo(&self) -> &GitHubRepo {
        &self.repo
    }
}

/// What [`ReleaseFeed::complete`] did with a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    /// The page was merged into the accumulation.
    Appended { page: usize, count: usize },
    /// The page was empty; pagination has ended.
    Exhausted { page: usize },
    /// The fetch failed; the same page can be requested again.
    Failed(FetchError),
    /// The response belonged to another repository or an earlier generation.
    Discarded,
}

/// Accumulates release pages for one repository key.
///
/// Pages are requested strictly in order and at most one request is
/// outstanding at a time. The accumulated releases always carry up-to-date
/// `latest` flags, and the download total is kept in step with them.
#[derive(Debug)]
pub struct ReleaseFeed {
    repo: GitHubRepo,
    per_page: usize,
    generation: u64,
    releases: Vec<Release>,
    pages_loaded: usize,
    first_page_len: Option<usize>,
    total_downloads: u64,
    in_flight: Option<usize>,
    exhausted: bool,
    last_error: Option<FetchError>,
}

impl ReleaseFeed {
    /// `per_page` is clamped to what GitHub will actually return per page.
    pub fn new(repo: GitHubRepo, per_page: usize) -> Self {
        Self {
            repo,
            per_page: per_page.clamp(1, MAX_PER_PAGE),
            generation: 0,
            releases: Vec::new(),
            pages_loaded: 0,
            first_page_len: None,
            total_downloads: 0,
            in_flight: None,
            exhausted: false,
            last_error: None,
        }
    }

    pub fn repo(&self) -> &GitHubRepo {
        &self.repo
    }

    pub fn per_page(&self) -> usize {
        self.per_page
    }

    /// Drops everything accumulated and rescopes the feed to `repo`.
    ///
    /// Tickets issued before the reset are invalidated, even when `repo` is
    /// the same key as before.
    pub fn reset(&mut self, repo: GitHubRepo) {
        debug!("Resetting release feed {} -> {}", self.repo, repo);
        let generation = self.generation + 1;
        *self = ReleaseFeed::new(repo, self.per_page);
        self.generation = generation;
    }

    /// Issues a ticket for the next page, or `None` if a fetch is already in
    /// flight or pagination has ended.
    pub fn begin_next_page(&mut self) -> Option<PageTicket> {
        if let Some(page) = self.in_flight {
            debug!("Page {} of {} still in flight, not requesting another", page, self.repo);
            return None;
        }
        if self.exhausted {
            debug!("No more release pages for {}", self.repo);
            return None;
        }

        let page = self.pages_loaded;
        self.in_flight = Some(page);
        Some(PageTicket {
            repo: self.repo.clone(),
            page,
            per_page: self.per_page,
            generation: self.generation,
        })
    }

    /// Applies the result of the fetch `ticket` was issued for.
    ///
    /// On failure the accumulation is left exactly as it was and the same page
    /// will be issued again by the next [`begin_next_page`](Self::begin_next_page).
    pub fn complete(&mut self, ticket: PageTicket, result: Result<Vec<Release>>) -> PageOutcome {
        if ticket.generation != self.generation || ticket.repo != self.repo {
            debug!(
                "Discarding stale page {} of {} (feed is now {})",
                ticket.page, ticket.repo, self.repo
            );
            return PageOutcome::Discarded;
        }
        if self.in_flight != Some(ticket.page) {
            debug!("Discarding unexpected page {} of {}", ticket.page, self.repo);
            return PageOutcome::Discarded;
        }
        self.in_flight = None;

        let page = match result {
            Ok(page) => page,
            Err(e) => {
                let error = FetchError::from_error(&e);
                warn!("Failed to fetch releases page {} of {}: {}", ticket.page, self.repo, error);
                self.last_error = Some(error.clone());
                return PageOutcome::Failed(error);
            }
        };
        self.last_error = None;

        if ticket.page == 0 {
            self.first_page_len = Some(page.len());
        }

        if page.is_empty() {
            debug!("Page {} of {} is empty, pagination finished", ticket.page, self.repo);
            self.exhausted = true;
            return PageOutcome::Exhausted { page: ticket.page };
        }

        let count = page.len();
        // A short page is the last one GitHub has
        if count < self.per_page {
            self.exhausted = true;
        }

        self.total_downloads += page.iter().map(Release::download_count).sum::<u64>();
        self.releases.extend(page);
        self.pages_loaded += 1;
        classify_latest(&mut self.releases);

        debug!(
            "Merged page {} of {} ({} releases, {} total)",
            ticket.page,
            self.repo,
            count,
            self.releases.len()
        );
        PageOutcome::Appended {
            page: ticket.page,
            count,
        }
    }

    /// All releases fetched so far, in fetch order, with `latest` flags set.
    pub fn releases(&self) -> &[Release] {
        &self.releases
    }

    pub fn latest(&self) -> Option<&Release> {
        latest_release(&self.releases)
    }

    pub fn total_downloads(&self) -> u64 {
        self.total_downloads
    }

    pub fn has_next_page(&self) -> bool {
        !self.exhausted
    }

    pub fn is_fetching(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn pages_loaded(&self) -> usize {
        self.pages_loaded
    }

    /// True once page 0 came back empty, i.e. the repository has no releases.
    pub fn is_empty_repository(&self) -> bool {
        self.first_page_len == Some(0)
    }

    pub fn last_error(&self) -> Option<&FetchError> {
        self.last_error.as_ref()
    }
}
