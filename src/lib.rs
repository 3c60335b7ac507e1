pub mod app;
pub mod config;
pub mod dashboard;
pub mod format;
pub mod github;
pub mod http;
pub mod output;
pub mod release;
pub mod stars;
