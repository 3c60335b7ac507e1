//! Error taxonomy for requests against the GitHub API.

use reqwest::StatusCode;

/// A request that did not produce usable data.
///
/// Both variants are terminal for the request that produced them; nothing in
/// this crate retries automatically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The repository or user does not exist upstream (HTTP 404)
    NotFound(String),
    /// Any other non-success status, transport failure, or undecodable body
    FetchFailed(String),
}

impl FetchError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, FetchError::NotFound(_))
    }

    /// Recovers the typed error carried inside an `anyhow::Error`.
    /// Anything that was not a `FetchError` becomes `FetchFailed`.
    pub fn from_error(error: &anyhow::Error) -> Self {
        match error.downcast_ref::<FetchError>() {
            Some(fetch_error) => fetch_error.clone(),
            None => FetchError::FetchFailed(format!("{:#}", error)),
        }
    }
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchError::NotFound(msg) => write!(f, "Not found: {}", msg),
            FetchError::FetchFailed(msg) => write!(f, "Request failed: {}", msg),
        }
    }
}

impl std::error::Error for FetchError {}

/// Maps a non-success HTTP status to a `FetchError`.
/// Returns `None` for success statuses.
pub fn classify_status(status: StatusCode, url: &str, body: &str) -> Option<FetchError> {
    if status.is_success() {
        return None;
    }

    let error = match status {
        StatusCode::NOT_FOUND => FetchError::NotFound(url.to_string()),
        StatusCode::UNAUTHORIZED => FetchError::FetchFailed(format!(
            "HTTP 401 from {}: authentication failed. Check your GITHUB_TOKEN.",
            url
        )),
        StatusCode::TOO_MANY_REQUESTS => FetchError::FetchFailed(format!(
            "HTTP 429 from {}: rate limit exceeded. Try again later or set GITHUB_TOKEN.",
            url
        )),
        StatusCode::FORBIDDEN if body.to_lowercase().contains("rate limit") => {
            FetchError::FetchFailed(format!(
                "HTTP 403 from {}: GitHub API rate limit exceeded. Try again later or set GITHUB_TOKEN.",
                url
            ))
        }
        StatusCode::FORBIDDEN => FetchError::FetchFailed(format!(
            "HTTP 403 from {}: access forbidden. You may need authentication.",
            url
        )),
        s => FetchError::FetchFailed(format!("HTTP {} from {}", s.as_u16(), url)),
    };

    Some(error)
}

/// Converts a reqwest transport or decoding error into the taxonomy.
pub fn classify_error(error: reqwest::Error, url: &str) -> anyhow::Error {
    if let Some(status) = error.status() {
        if let Some(fetch_error) = classify_status(status, url, "") {
            return anyhow::Error::from(fetch_error);
        }
    }

    let msg = if error.is_decode() {
        format!("invalid response body from {}: {}", url, error)
    } else {
        format!("{}: {}", url, error)
    };
    anyhow::Error::from(FetchError::FetchFailed(msg))
}
