//! Credentials module for Sub-Skimmer
//!
//! This module loads and validates the TOML credentials file. Each top-level
//! table in the file describes one registered application ("bot"), and the
//! scraper only ever refers to a bot by its table name.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use sub_skimmer::config::load_credentials;
//!
//! let creds = load_credentials(Path::new("reddit.toml"), "bot1").unwrap();
//! println!("Requests will identify as: {}", creds.user_agent);
//! ```

mod parser;
mod types;
mod validation;

pub use types::{BotCredentials, CredentialsFile, DEFAULT_OAUTH_URL, DEFAULT_REDDIT_URL};

pub use parser::{load_credentials, load_credentials_file};
pub use validation::validate;
