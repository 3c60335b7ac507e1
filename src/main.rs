use anyhow::Result;
use clap::Parser;
use ghrs::app::{Options, run};
use ghrs::github::MAX_PER_PAGE;
use ghrs::release::DEFAULT_PER_PAGE;

/// ghrs - GitHub Release Stats
///
/// Shows download totals, a cumulative downloads table, the release list and
/// optionally star history for a GitHub repository.
///
/// If the GITHUB_TOKEN environment variable is set, it will be used for authentication.
/// This is useful for avoiding rate limits.
///
/// Examples:
///   ghrs owner/repo              # First page of releases
///   ghrs owner/repo --all        # Every release
///   ghrs owner/repo --stars      # Include star history
#[derive(Parser, Debug)]
#[command(author, version = env!("GHRS_VERSION"), about)]
struct Cli {
    /// The GitHub repository in the format "owner/repo"
    #[arg(value_name = "OWNER/REPO")]
    repo: String,

    /// Number of release pages to load
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u64).range(1..))]
    pages: u64,

    /// Load every release page
    #[arg(long, conflicts_with = "pages")]
    all: bool,

    /// Releases per page (GitHub allows at most 100)
    #[arg(
        long,
        default_value_t = DEFAULT_PER_PAGE as u64,
        value_parser = clap::value_parser!(u64).range(1..=MAX_PER_PAGE as u64)
    )]
    per_page: u64,

    /// Also fetch stargazers and print star history
    #[arg(long)]
    stars: bool,

    /// Maximum stargazer pages (100 stars each) to fetch for the history
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u64).range(1..=400))]
    star_pages: u64,

    /// Print JSON instead of text
    #[arg(long)]
    json: bool,

    /// GitHub API URL (defaults to https://api.github.com)
    #[arg(long = "api-url", value_name = "URL", env = "GHRS_API_URL")]
    api_url: Option<String>,

    /// GitHub token
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    token: Option<String>,
}

impl From<Cli> for Options {
    fn from(cli: Cli) -> Self {
        Options {
            repo: cli.repo,
            pages: if cli.all { None } else { Some(cli.pages as usize) },
            per_page: cli.per_page as usize,
            stars: cli.stars,
            star_pages: cli.star_pages as usize,
            json: cli.json,
            api_url: cli.api_url,
            token: cli.token,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    run(cli.into()).await
}
