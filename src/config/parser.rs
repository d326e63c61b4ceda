use crate::config::types::{BotCredentials, CredentialsFile};
use crate::config::validation::validate;
use crate::{AuthError, CredentialsError};
use std::path::Path;

/// Loads and parses a whole credentials file
///
/// No validation happens here; sections are only validated once a bot is
/// selected, so a broken section does not block the others.
///
/// # Arguments
///
/// * `path` - Path to the TOML credentials file
///
/// # Returns
///
/// * `Ok(CredentialsFile)` - Every bot section in the file
/// * `Err(CredentialsError)` - Failed to read or parse the file
pub fn load_credentials_file(path: &Path) -> Result<CredentialsFile, CredentialsError> {
    let content = std::fs::read_to_string(path)?;
    let file: CredentialsFile = toml::from_str(&content)?;
    Ok(file)
}

/// Loads the credentials of one bot from a credentials file
///
/// # Arguments
///
/// * `path` - Path to the TOML credentials file
/// * `bot` - Name of the section holding the bot's credentials
///
/// # Returns
///
/// * `Ok(BotCredentials)` - Validated credentials for `bot`
/// * `Err(AuthError)` - The file is unusable or has no valid section for `bot`
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use sub_skimmer::config::load_credentials;
///
/// let creds = load_credentials(Path::new("reddit.toml"), "bot1").unwrap();
/// println!("Client ID: {}", creds.client_id);
/// ```
pub fn load_credentials(path: &Path, bot: &str) -> Result<BotCredentials, AuthError> {
    let mut file = load_credentials_file(path)?;

    let creds = file
        .bots
        .remove(bot)
        .ok_or_else(|| AuthError::UnknownBot {
            bot: bot.to_string(),
            path: path.display().to_string(),
        })?;

    validate(&creds)?;

    Ok(creds)
}
