//! Bot API connection settings.

/// Public Bot API host.
pub const DEFAULT_API_URL: &str = "https://api.telegram.org";

/// Bot API connection configuration.
#[derive(Clone)]
pub struct BotConfig {
    /// Bot token issued by `@BotFather`.
    pub token: String,

    /// Scheme and host of the Bot API server.
    pub api_url: String,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_owned()
}

impl BotConfig {
    /// Creates a configuration pointing at the public Bot API.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            api_url: default_api_url(),
        }
    }

    /// Replaces the API host (self-hosted Bot API servers, test doubles).
    #[must_use]
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// Creates configuration from environment variables.
    ///
    /// Expects `TELEGRAM_BOT_TOKEN` to be set. `TELEGRAM_API_URL` is optional.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is missing or blank.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Creates configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let token = lookup("TELEGRAM_BOT_TOKEN")
            .ok_or(ConfigError::MissingEnvVar("TELEGRAM_BOT_TOKEN"))?;

        if token.trim().is_empty() {
            return Err(ConfigError::EmptyToken);
        }

        let api_url = lookup("TELEGRAM_API_URL")
            .filter(|url| !url.trim().is_empty())
            .map_or_else(default_api_url, |url| url.trim_end_matches('/').to_owned());

        Ok(Self { token, api_url })
    }
}

impl std::fmt::Debug for BotConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BotConfig")
            .field("token", &"<redacted>")
            .field("api_url", &self.api_url)
            .finish()
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Bot token is empty")]
    EmptyToken,
}
