use anyhow::Result;
use log::{debug, warn};

use crate::config::Config;
use crate::dashboard::Dashboard;
use crate::github::{GetReleases, GitHubRepo};
use crate::http::FetchError;
use crate::output::{Snapshot, render_json, render_text};

/// What to load and how to print it.
#[derive(Debug, Clone)]
pub struct Options {
    /// `owner/repo`
    pub repo: String,
    /// Release pages to load; `None` loads until the end.
    pub pages: Option<usize>,
    pub per_page: usize,
    pub stars: bool,
    pub star_pages: usize,
    pub json: bool,
    pub api_url: Option<String>,
    pub token: Option<String>,
}

#[tracing::instrument(skip(options), fields(repo = %options.repo))]
pub async fn run(options: Options) -> Result<()> {
    let config = Config::new(options.token.as_deref(), options.api_url.clone())?;
    debug!("Using GitHub API at {}", config.github.api_url());
    let output = execute(config.github, &options).await?;
    print!("{}", output);
    Ok(())
}

/// Loads the dashboard for `options.repo` and renders it.
///
/// A missing repository, or a first release page that cannot be fetched, is
/// an error. Later failures are reported inside the rendered output next to
/// whatever did load.
pub async fn execute<G: GetReleases>(github: G, options: &Options) -> Result<String> {
    let repo = options.repo.parse::<GitHubRepo>()?;
    let mut dashboard = Dashboard::new(github, repo, options.per_page);

    let loaded = dashboard.load_repository().await.map(|_| ());
    if let Err(e) = loaded {
        if FetchError::from_error(&e).is_not_found() {
            return Err(e.context(format!("Repository {} not found", dashboard.repo())));
        }
        warn!("Continuing without repository details: {:#}", e);
    }

    if let Err(e) = dashboard.load_releases(options.pages).await {
        if dashboard.feed().pages_loaded() == 0 {
            return Err(e.context(format!("Failed to load releases of {}", dashboard.repo())));
        }
        warn!("Showing partial release list: {:#}", e);
    }

    if options.stars {
        let loaded = dashboard.load_star_history(options.star_pages).await.map(|_| ());
        if let Err(e) = loaded {
            warn!("Continuing without star history: {:#}", e);
        }
    }

    let snapshot = Snapshot::from_dashboard(&dashboard);
    debug!(
        "Rendering {} releases ({} errors)",
        snapshot.releases.len(),
        snapshot.errors.len()
    );
    if options.json {
        render_json(&snapshot).map(|json| json + "\n")
    } else {
        Ok(render_text(&snapshot))
    }
}
