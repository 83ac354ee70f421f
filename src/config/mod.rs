//! Configuration module for the Bot API client.
//!
//! Handles loading the bot token and API host from the environment.

mod settings;

pub use settings::{BotConfig, ConfigError, DEFAULT_API_URL};
