use serde::Deserialize;
use std::collections::HashMap;

/// Host that issues access tokens
pub const DEFAULT_REDDIT_URL: &str = "https://www.reddit.com";

/// Host that serves authenticated API requests
pub const DEFAULT_OAUTH_URL: &str = "https://oauth.reddit.com";

/// A whole credentials file, keyed by bot name
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct CredentialsFile {
    pub bots: HashMap<String, BotCredentials>,
}

/// Credentials for a single registered Reddit application
#[derive(Debug, Clone, Deserialize)]
pub struct BotCredentials {
    /// OAuth client ID of the application
    #[serde(rename = "client-id")]
    pub client_id: String,

    /// OAuth client secret of the application
    #[serde(rename = "client-secret")]
    pub client_secret: String,

    /// User agent sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Account name for the password grant
    #[serde(default)]
    pub username: Option<String>,

    /// Account password for the password grant
    #[serde(default)]
    pub password: Option<String>,

    /// Base URL of the token endpoint host
    #[serde(rename = "reddit-url", default = "default_reddit_url")]
    pub reddit_url: String,

    /// Base URL of the API host
    #[serde(rename = "oauth-url", default = "default_oauth_url")]
    pub oauth_url: String,
}

impl BotCredentials {
    /// Username and password, when the bot acts on behalf of an account
    pub fn account(&self) -> Option<(&str, &str)> {
        match (&self.username, &self.password) {
            (Some(username), Some(password)) => Some((username.as_str(), password.as_str())),
            _ => None,
        }
    }
}

fn default_reddit_url() -> String {
    DEFAULT_REDDIT_URL.to_string()
}

fn default_oauth_url() -> String {
    DEFAULT_OAUTH_URL.to_string()
}
