//! Configuration module for handling environment variables and .env files

use crate::client::{RedditClient, RedditClientError, Result, DEFAULT_API_BASE, DEFAULT_AUTH_BASE};
use dotenv::dotenv;
use log::{info, warn};
use std::env;
use std::path::PathBuf;

/// Application configuration derived from environment variables and .env file
#[derive(Debug, Clone)]
pub struct AppConfig {
    // Reddit API credentials
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,

    // Reddit API settings
    pub user_agent: String,
    pub oauth_port: Option<u16>,
    pub api_base: String,
    pub auth_base: String,
    pub token_dir: Option<PathBuf>,

    // OAuth tokens (if provided directly)
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub token_expires_in: u64,

    // Default subreddit for controller commands
    pub subreddit: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            client_id: None,
            client_secret: None,
            username: None,
            password: None,
            user_agent: String::new(),
            oauth_port: None,
            api_base: DEFAULT_API_BASE.to_string(),
            auth_base: DEFAULT_AUTH_BASE.to_string(),
            token_dir: None,
            access_token: None,
            refresh_token: None,
            token_expires_in: 3600,
            subreddit: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables and .env file
    pub fn load() -> Self {
        match dotenv() {
            Ok(_) => info!("Loaded environment from .env file"),
            Err(_) => info!("No .env file found, using system environment variables only"),
        }

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a configuration from any key lookup; `load` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        config.client_id = lookup("REDDIT_CLIENT_ID");
        config.client_secret = lookup("REDDIT_CLIENT_SECRET");
        config.username = lookup("REDDIT_USERNAME");
        config.password = lookup("REDDIT_PASSWORD");
        config.access_token = lookup("REDDIT_ACCESS_TOKEN");
        config.refresh_token = lookup("REDDIT_REFRESH_TOKEN");
        config.subreddit = lookup("REDDIT_SUBREDDIT");
        config.token_dir = lookup("REDDIT_TOKEN_DIR").map(PathBuf::from);

        if let Some(user_agent) = lookup("REDDIT_USER_AGENT") {
            config.user_agent = user_agent;
        }
        if let Some(api_base) = lookup("REDDIT_API_BASE") {
            config.api_base = api_base;
        }
        if let Some(auth_base) = lookup("REDDIT_AUTH_BASE") {
            config.auth_base = auth_base;
        }

        if let Some(port_str) = lookup("REDDIT_OAUTH_PORT") {
            match port_str.parse::<u16>() {
                Ok(port) => config.oauth_port = Some(port),
                Err(_) => warn!("Ignoring invalid REDDIT_OAUTH_PORT: {}", port_str),
            }
        }

        if let Some(expires_str) = lookup("REDDIT_TOKEN_EXPIRES_IN") {
            match expires_str.parse::<u64>() {
                Ok(expires) => config.token_expires_in = expires,
                Err(_) => warn!("Ignoring invalid REDDIT_TOKEN_EXPIRES_IN: {}", expires_str),
            }
        }

        config
    }

    fn require(value: &Option<String>, key: &str) -> Result<String> {
        value.clone().ok_or_else(|| {
            RedditClientError::ConfigError(format!("{} environment variable must be set", key))
        })
    }

    pub fn require_client_id(&self) -> Result<String> {
        Self::require(&self.client_id, "REDDIT_CLIENT_ID")
    }

    pub fn require_client_secret(&self) -> Result<String> {
        Self::require(&self.client_secret, "REDDIT_CLIENT_SECRET")
    }

    pub fn require_username(&self) -> Result<String> {
        Self::require(&self.username, "REDDIT_USERNAME")
    }

    pub fn require_password(&self) -> Result<String> {
        Self::require(&self.password, "REDDIT_PASSWORD")
    }

    pub fn require_subreddit(&self) -> Result<String> {
        Self::require(&self.subreddit, "REDDIT_SUBREDDIT")
    }

    /// Whether the script-app password grant can be attempted.
    pub fn has_script_credentials(&self) -> bool {
        self.client_id.is_some()
            && self.client_secret.is_some()
            && self.username.is_some()
            && self.password.is_some()
    }

    /// Create a RedditClient from this configuration
    pub fn create_client(&self) -> Result<RedditClient> {
        RedditClient::from_config(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_point_at_reddit() {
        let config = config_from(&[]);
        assert_eq!(config.api_base, "https://oauth.reddit.com");
        assert_eq!(config.auth_base, "https://www.reddit.com");
        assert_eq!(config.token_expires_in, 3600);
        assert!(config.require_client_id().is_err());
    }

    #[test]
    fn reads_credentials_and_overrides() {
        let config = config_from(&[
            ("REDDIT_CLIENT_ID", "app"),
            ("REDDIT_REFRESH_TOKEN", "refresh"),
            ("REDDIT_SUBREDDIT", "rustjerk"),
            ("REDDIT_API_BASE", "http://127.0.0.1:9999"),
            ("REDDIT_OAUTH_PORT", "9090"),
        ]);
        assert_eq!(config.require_client_id().unwrap(), "app");
        assert_eq!(config.refresh_token.as_deref(), Some("refresh"));
        assert_eq!(config.require_subreddit().unwrap(), "rustjerk");
        assert_eq!(config.api_base, "http://127.0.0.1:9999");
        assert_eq!(config.oauth_port, Some(9090));
        assert!(!config.has_script_credentials());
    }

    #[test]
    fn invalid_numbers_fall_back_to_defaults() {
        let config = config_from(&[
            ("REDDIT_OAUTH_PORT", "not-a-port"),
            ("REDDIT_TOKEN_EXPIRES_IN", "soon"),
        ]);
        assert_eq!(config.oauth_port, None);
        assert_eq!(config.token_expires_in, 3600);
    }

    #[test]
    fn missing_values_name_the_variable() {
        let err = config_from(&[]).require_password().unwrap_err();
        assert!(err.to_string().contains("REDDIT_PASSWORD"));
    }

    #[test]
    fn refresh_token_is_seeded_into_token_storage() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config_from(&[
            ("REDDIT_CLIENT_ID", "app"),
            ("REDDIT_REFRESH_TOKEN", "refresh"),
        ]);
        config.token_dir = Some(dir.path().to_path_buf());

        let client = config.create_client().unwrap();
        let storage = client.token_storage.unwrap();
        assert_eq!(storage.client_id, "app");
        assert_eq!(storage.refresh_token.as_deref(), Some("refresh"));
        assert!(client.access_token.is_none());
    }

    #[test]
    fn configured_access_token_carries_its_expiry() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config_from(&[
            ("REDDIT_CLIENT_ID", "app"),
            ("REDDIT_ACCESS_TOKEN", "short-lived"),
            ("REDDIT_TOKEN_EXPIRES_IN", "60"),
        ]);
        config.token_dir = Some(dir.path().to_path_buf());

        let client = config.create_client().unwrap();
        let storage = client.token_storage.unwrap();
        assert_eq!(client.access_token.as_deref(), Some("short-lived"));
        assert_eq!(storage.access_token.as_deref(), Some("short-lived"));
        // Inside the five-minute margin, so the next request refreshes it
        assert!(!storage.is_access_token_valid());
    }
}
