//! HTTP client module with GitHub error classification.

mod client;
mod error;

pub use client::HttpClient;
pub use error::{FetchError, classify_error, classify_status};
