//! OAuth2 token exchange
//!
//! Reddit hands out bearer tokens from `/api/v1/access_token`. Script apps
//! with an account configured use the `password` grant; everything else falls
//! back to the app-only `client_credentials` grant, which is enough for
//! reading public listings.

use crate::config::BotCredentials;
use crate::AuthError;
use reqwest::Client;
use serde::Deserialize;

/// A bearer token for the API host
#[derive(Clone)]
pub struct AccessToken {
    value: String,
    expires_in: Option<u64>,
}

impl AccessToken {
    pub fn new(value: impl Into<String>, expires_in: Option<u64>) -> Self {
        Self {
            value: value.into(),
            expires_in,
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Lifetime in seconds, as announced by the token endpoint
    pub fn expires_in(&self) -> Option<u64> {
        self.expires_in
    }
}

// Keep the token itself out of logs
impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("value", &"<redacted>")
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    expires_in: Option<u64>,
    #[serde(default)]
    error: Option<String>,
}

/// Exchanges bot credentials for an access token
///
/// # Arguments
///
/// * `client` - HTTP client carrying the bot's user agent
/// * `creds` - Validated bot credentials
///
/// # Returns
///
/// * `Ok(AccessToken)` - Token for the API host
/// * `Err(AuthError)` - The request failed or Reddit refused the credentials
pub async fn authenticate(client: &Client, creds: &BotCredentials) -> Result<AccessToken, AuthError> {
    let url = format!(
        "{}/api/v1/access_token",
        creds.reddit_url.trim_end_matches('/')
    );

    let form: Vec<(&str, &str)> = match creds.account() {
        Some((username, password)) => vec![
            ("grant_type", "password"),
            ("username", username),
            ("password", password),
        ],
        None => vec![("grant_type", "client_credentials")],
    };

    tracing::debug!(
        "Requesting access token from {} ({} grant)",
        url,
        form[0].1
    );

    let response = client
        .post(&url)
        .basic_auth(&creds.client_id, Some(&creds.client_secret))
        .form(&form)
        .send()
        .await
        .map_err(AuthError::Transport)?;

    let status = response.status();
    if !status.is_success() {
        return Err(AuthError::TokenRejected {
            status: status.as_u16(),
        });
    }

    let body = response.text().await.map_err(AuthError::Transport)?;
    let token: TokenResponse =
        serde_json::from_str(&body).map_err(|e| AuthError::MissingToken(e.to_string()))?;

    // Bad passwords come back as HTTP 200 with an "error" field
    match token.access_token {
        Some(value) if !value.is_empty() => Ok(AccessToken::new(value, token.expires_in)),
        _ => Err(AuthError::MissingToken(
            token
                .error
                .unwrap_or_else(|| "no access_token field".to_string()),
        )),
    }
}
