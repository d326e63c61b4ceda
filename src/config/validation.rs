use crate::config::types::BotCredentials;
use crate::CredentialsError;
use url::Url;

/// Validates the credentials of a single bot
pub fn validate(creds: &BotCredentials) -> Result<(), CredentialsError> {
    validate_required("client-id", &creds.client_id)?;
    validate_required("client-secret", &creds.client_secret)?;
    validate_required("user-agent", &creds.user_agent)?;
    validate_account(creds)?;
    validate_base_url("reddit-url", &creds.reddit_url)?;
    validate_base_url("oauth-url", &creds.oauth_url)?;
    Ok(())
}

/// Rejects empty or whitespace-only values
fn validate_required(key: &str, value: &str) -> Result<(), CredentialsError> {
    if value.trim().is_empty() {
        return Err(CredentialsError::Validation(format!(
            "{} cannot be empty",
            key
        )));
    }
    Ok(())
}

/// Username and password only make sense together
fn validate_account(creds: &BotCredentials) -> Result<(), CredentialsError> {
    match (&creds.username, &creds.password) {
        (Some(username), Some(password)) => {
            validate_required("username", username)?;
            validate_required("password", password)?;
            Ok(())
        }
        (None, None) => Ok(()),
        (Some(_), None) => Err(CredentialsError::Validation(
            "username is set but password is missing".to_string(),
        )),
        (None, Some(_)) => Err(CredentialsError::Validation(
            "password is set but username is missing".to_string(),
        )),
    }
}

/// Base URLs must parse and speak HTTP
fn validate_base_url(key: &str, value: &str) -> Result<(), CredentialsError> {
    let url = Url::parse(value)
        .map_err(|e| CredentialsError::InvalidUrl(format!("Invalid {} '{}': {}", key, value, e)))?;

    if url.scheme() != "https" && url.scheme() != "http" {
        return Err(CredentialsError::InvalidUrl(format!(
            "{} '{}' must use http or https",
            key, value
        )));
    }

    Ok(())
}
