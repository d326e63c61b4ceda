//! Sub-Skimmer: top posts and top comments from Reddit, as CSV
//!
//! This crate authenticates against the Reddit API, walks the top posts of a
//! list of subreddits, keeps the first few comments of each post and writes
//! the collected rows out as CSV tables.

pub mod config;
pub mod reddit;
pub mod scraper;
pub mod table;

use thiserror::Error;

/// Main error type for Sub-Skimmer operations
#[derive(Debug, Error)]
pub enum SkimmerError {
    #[error("Authentication error: {0}")]
    Authentication(#[from] AuthError),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Reddit API returned HTTP {status} for {url}")]
    Api { url: String, status: u16 },

    #[error("Unexpected response from {url}: {message}")]
    Response { url: String, message: String },

    #[error("Invalid subreddit name '{0}'")]
    InvalidSubreddit(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),
}

/// Authentication-specific errors
///
/// Everything that can go wrong between naming a bot and holding a usable
/// access token ends up here.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{0}")]
    Credentials(#[from] CredentialsError),

    #[error("No credentials for bot '{bot}' in {path}")]
    UnknownBot { bot: String, path: String },

    #[error("Token request rejected with HTTP {status}")]
    TokenRejected { status: u16 },

    #[error("Token response did not contain an access token: {0}")]
    MissingToken(String),

    #[error("Token request failed: {0}")]
    Transport(#[source] reqwest::Error),
}

/// Credentials file errors
#[derive(Debug, Error)]
pub enum CredentialsError {
    #[error("Failed to read credentials file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in credentials: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Sub-Skimmer operations
pub type Result<T> = std::result::Result<T, SkimmerError>;

/// Result type alias for authentication
pub type AuthResult<T> = std::result::Result<T, AuthError>;

/// Result type alias for credentials loading
pub type CredentialsResult<T> = std::result::Result<T, CredentialsError>;

// Re-export commonly used types
pub use config::BotCredentials;
pub use reddit::{RedditApi, RedditClient};
pub use scraper::{CollectOptions, ScrapeReport, Scraper};
pub use table::{PostRecord, Table};
