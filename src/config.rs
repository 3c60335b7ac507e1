use anyhow::Result;
use log::debug;
use reqwest::{
    Client,
    header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue},
};

use crate::github::{GetReleases, GitHub};
use crate::http::HttpClient;

pub const USER_AGENT: &str = "ghrs-cli";

pub struct Config<G: GetReleases> {
    pub github: G,
    pub client: Client,
}

impl Config<GitHub> {
    /// Builds the HTTP client and GitHub API handle.
    ///
    /// `token` is usually `GITHUB_TOKEN`; without it requests are anonymous
    /// and subject to GitHub's lower rate limit.
    pub fn new(token: Option<&str>, api_url: Option<String>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        if let Some(token) = token.filter(|t| !t.is_empty()) {
            let mut auth_value = HeaderValue::from_str(&format!("Bearer {}", token))?;
            auth_value.set_sensitive(true);
            headers.insert(AUTHORIZATION, auth_value);
            debug!("Using GITHUB_TOKEN for authentication: {}", mask_token(token));
        }

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()?;

        let github = GitHub::new(HttpClient::new(client.clone()), api_url);

        Ok(Self { github, client })
    }
}

/// Keeps the first 8 and last 4 characters of long tokens for log output.
fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 12 {
        return "*********".to_string();
    }
    let head: String = chars[..8].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}*********{}", head, tail)
}
